//! 💀 Errors — the taxonomy of everything that can go sideways between "GET /posts" and a
//! rendered wall of posts.
//!
//! 🎬 *[a response arrives. it is `{}`. it was supposed to be an array.]*
//! *[somewhere, a validator sighs and reaches for the right variant.]*
//!
//! Every variant here renders as the exact message the page layer shows the user, so the
//! `Display` strings are load-bearing. Change one and a test somewhere will tell on you. 🦆
//!
//! 🧠 Knowledge graph:
//! - `Transport` wraps `reqwest::Error` transparently — no "request failed: request failed"
//!   onion, the caller sees the original error and can `match` it away from validation errors.
//! - `UnexpectedData` / `ExpectedArray` carry the [`Endpoint`] that misbehaved.
//! - `MissingUserForPost` / `CommentPostIdMismatch` are referential-integrity failures.
//! - `MissingPostId` / `InvalidPostNumber` fire before any network call.

use std::fmt;

/// 📡 Which endpoint handed us the bad news. Renders as the word used in error messages.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Endpoint {
    /// `/posts`
    Posts,
    /// `/posts/{id}`
    Post,
    /// `/users`
    Users,
    /// `/users/{id}`
    User,
    /// `/comments` and `/posts/{id}/comments`
    Comments,
}

impl fmt::Display for Endpoint {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let the_word = match self {
            Endpoint::Posts => "posts",
            Endpoint::Post => "post",
            Endpoint::Users => "users",
            Endpoint::User => "user",
            Endpoint::Comments => "comments",
        };
        f.write_str(the_word)
    }
}

/// 💀 Everything the aggregation layer can reject with.
///
/// No partial results ride along with any of these. If you got a `FeedError`, you got
/// nothing else. That's the deal.
#[derive(Debug, thiserror::Error)]
pub enum FeedError {
    /// 📡 The network said no. Passed through untouched.
    #[error(transparent)]
    Transport(#[from] reqwest::Error),

    /// 🦆 Body wasn't JSON, or an element failed its shape check.
    #[error("Unexpected data received from {endpoint} endpoint")]
    UnexpectedData { endpoint: Endpoint },

    /// 📦 A bulk endpoint returned something that isn't an array.
    #[error("Expected {endpoint} endpoint to return an array")]
    ExpectedArray { endpoint: Endpoint },

    /// 🔍 A post points at a user nobody has heard of.
    #[error("Couldn't retrieve user for post")]
    MissingUserForPost,

    /// 🔒 A comment showed up under the wrong post.
    #[error("Expected candidate postId to equal requested postId")]
    CommentPostIdMismatch,

    #[error("PostId must be provided")]
    MissingPostId,

    #[error("Invalid post number")]
    InvalidPostNumber,
}

impl FeedError {
    pub(crate) fn unexpected(endpoint: Endpoint) -> Self {
        FeedError::UnexpectedData { endpoint }
    }

    pub(crate) fn expected_array(endpoint: Endpoint) -> Self {
        FeedError::ExpectedArray { endpoint }
    }

    /// ✅ True when the failure came from the network rather than from the data.
    pub fn is_transport(&self) -> bool {
        matches!(self, FeedError::Transport(_))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn the_one_where_every_message_reads_exactly_like_the_page_expects() {
        let the_cases = vec![
            (
                FeedError::unexpected(Endpoint::Posts),
                "Unexpected data received from posts endpoint",
            ),
            (
                FeedError::unexpected(Endpoint::User),
                "Unexpected data received from user endpoint",
            ),
            (
                FeedError::expected_array(Endpoint::Comments),
                "Expected comments endpoint to return an array",
            ),
            (
                FeedError::expected_array(Endpoint::Users),
                "Expected users endpoint to return an array",
            ),
            (FeedError::MissingUserForPost, "Couldn't retrieve user for post"),
            (
                FeedError::CommentPostIdMismatch,
                "Expected candidate postId to equal requested postId",
            ),
            (FeedError::MissingPostId, "PostId must be provided"),
            (FeedError::InvalidPostNumber, "Invalid post number"),
        ];

        for (the_error, the_message) in the_cases {
            assert_eq!(the_error.to_string(), the_message);
            assert!(!the_error.is_transport());
        }
    }
}
