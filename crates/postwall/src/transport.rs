//! 🔌 Transport — where the real I/O happens.
//!
//! 🎭 This module is the casting agency. Need posts from the real internet? `HttpTransport`.
//! Need posts from a hash map because it's a test and the internet is flaky? `InMemoryTransport`.
//! The aggregation layer doesn't care which one shows up, as long as it can say "GET" and
//! get text back.
//!
//! # Contract 📜
//! - `get_text(path)` issues exactly one GET for `path` (relative to the base URL).
//! - The body comes back as text, status code unexamined. A 404 with `{}` is still text,
//!   and the decoder gets to be the one who says "that's not a post".
//! - Anything that stops us from getting text at all is `FeedError::Transport`, verbatim.

use async_trait::async_trait;

use crate::app_config::ApiConfig;
use crate::errors::FeedError;

pub mod http;
pub mod in_mem;

pub use http::HttpTransport;
pub use in_mem::InMemoryTransport;

/// 📡 One GET in, one body of text out.
#[async_trait]
pub trait Transport: std::fmt::Debug + Send + Sync {
    async fn get_text(&self, path: &str) -> Result<String, FeedError>;
}

/// 🎭 The many faces of a Transport. Dispatches to the concrete backend so callers can
/// hold one type no matter where the bytes come from.
#[derive(Debug, Clone)]
pub enum TransportBackend {
    Http(HttpTransport),
    InMemory(InMemoryTransport),
}

impl TransportBackend {
    /// 🏗️ The production default: an HTTP client pointed at `api.base_url`.
    pub fn from_config(config: &ApiConfig) -> Result<Self, FeedError> {
        Ok(TransportBackend::Http(HttpTransport::new(config)?))
    }
}

#[async_trait]
impl Transport for TransportBackend {
    async fn get_text(&self, path: &str) -> Result<String, FeedError> {
        match self {
            TransportBackend::Http(transport) => transport.get_text(path).await,
            TransportBackend::InMemory(transport) => transport.get_text(path).await,
        }
    }
}

/// 🗺️ Every path the aggregation layer is allowed to ask for. One place, no typos.
pub(crate) mod paths {
    pub(crate) const POSTS: &str = "/posts";
    pub(crate) const USERS: &str = "/users";
    pub(crate) const COMMENTS: &str = "/comments";

    pub(crate) fn post(post_id: u64) -> String {
        format!("/posts/{post_id}")
    }

    pub(crate) fn user(user_id: u64) -> String {
        format!("/users/{user_id}")
    }

    pub(crate) fn post_comments(post_id: u64) -> String {
        format!("/posts/{post_id}/comments")
    }
}
