//! 📦 The view model — what the page layer actually gets to hold.
//!
//! Raw API records live and die inside one aggregation call. What survives is in here:
//! denormalized, owned, and ready to render. Authors are embedded by value because they're
//! tiny and never change. Comments lose their `postId` on the way in; it was only ever a
//! join key. 🦆

use serde::Serialize;

/// ✍️ Who wrote the post.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Author {
    pub id: u64,
    pub name: String,
}

/// 💬 One comment, minus the `postId` it arrived with.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Comment {
    pub id: u64,
    pub name: String,
    pub email: String,
    pub body: String,
}

/// 📰 A post with its author and comments already joined in.
///
/// `comments` keeps the order the API returned them in.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Post {
    pub id: u64,
    pub title: String,
    pub body: String,
    pub comments: Vec<Comment>,
    pub author: Author,
}
