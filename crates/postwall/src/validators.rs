//! 🔍 Shape validators — the bouncers at the door of the view model.
//!
//! 🎬 COLD OPEN — EXT. JSON NIGHTCLUB — 11:58 PM
//!
//! A `serde_json::Value` walks up. It claims to be a post. It has an `id`. It has a
//! `title`. Its `userId` is the string `"1"`. The bouncer looks at the list, looks at
//! the string, and says: "Numbers only tonight, pal."
//!
//! Each raw record has a `narrow` constructor that checks every consumed field for
//! presence and primitive type, then copies them out. The `is_*` predicates are just
//! `narrow(..).is_some()`, so the check and the extraction can never drift apart.
//!
//! 🧠 Knowledge graph:
//! - Numeric fields must be JSON numbers with a non-negative whole value. `1`, `1.0` and
//!   `1e0` all read as id 1. `"1"`, `1.5`, `-1`, `true` and `null` are all turned away:
//!   ids are join keys and path segments, and neither has a use for fractions or signs.
//! - String fields must be JSON strings. `null` is not a string, no matter how it dresses.
//! - Extra fields are ignored everywhere. The API may grow; we only check what we read.

use serde_json::{Map, Value};

use crate::model::{Author, Comment};

/// 💬 A comment exactly as `/comments` or `/posts/{id}/comments` hands it over.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RawComment {
    pub post_id: u64,
    pub id: u64,
    pub name: String,
    pub email: String,
    pub body: String,
}

/// ✍️ A user as `/users` serves it. Only the fields we consume are kept.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RawUser {
    pub id: u64,
    pub name: String,
}

/// 📰 A post as `/posts` serves it.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RawPost {
    pub user_id: u64,
    pub id: u64,
    pub title: String,
    pub body: String,
}

fn number_field(object: &Map<String, Value>, key: &str) -> Option<u64> {
    let value = object.get(key)?;
    // -- 🔢 `1`, `1.0` and `1e0` are the same id. strings, null, fractions and negatives are not ids.
    value.as_u64().or_else(|| {
        value
            .as_f64()
            .filter(|number| number.fract() == 0.0 && *number >= 0.0 && *number < u64::MAX as f64)
            .map(|number| number as u64)
    })
}

fn string_field(object: &Map<String, Value>, key: &str) -> Option<String> {
    object.get(key)?.as_str().map(str::to_owned)
}

impl RawComment {
    pub fn narrow(candidate: &Value) -> Option<Self> {
        let object = candidate.as_object()?;
        Some(Self {
            post_id: number_field(object, "postId")?,
            id: number_field(object, "id")?,
            name: string_field(object, "name")?,
            email: string_field(object, "email")?,
            body: string_field(object, "body")?,
        })
    }

    /// 🔄 Drop the join key; keep the display data.
    pub fn into_comment(self) -> Comment {
        Comment {
            id: self.id,
            name: self.name,
            email: self.email,
            body: self.body,
        }
    }
}

impl RawUser {
    pub fn narrow(candidate: &Value) -> Option<Self> {
        let object = candidate.as_object()?;
        Some(Self {
            id: number_field(object, "id")?,
            name: string_field(object, "name")?,
        })
    }

    pub fn into_author(self) -> Author {
        Author {
            id: self.id,
            name: self.name,
        }
    }
}

impl RawPost {
    pub fn narrow(candidate: &Value) -> Option<Self> {
        let object = candidate.as_object()?;
        Some(Self {
            user_id: number_field(object, "userId")?,
            id: number_field(object, "id")?,
            title: string_field(object, "title")?,
            body: string_field(object, "body")?,
        })
    }
}

/// ✅ Does this look like a comment? Every field, every type, no exceptions.
pub fn is_comment(candidate: &Value) -> bool {
    RawComment::narrow(candidate).is_some()
}

/// ✅ Does this look like a user? Only `id` and `name` are checked.
pub fn is_user(candidate: &Value) -> bool {
    RawUser::narrow(candidate).is_some()
}

/// ✅ Does this look like a post?
pub fn is_post(candidate: &Value) -> bool {
    RawPost::narrow(candidate).is_some()
}
