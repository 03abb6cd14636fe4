//! 🔄 Aggregation — three endpoints walk into a join.
//!
//! 🎬 COLD OPEN — INT. DATA DESK — 2:47 AM
//!
//! Posts on one endpoint. Users on another. Comments on a third. None of them know about
//! each other, none of them promise to be well-formed, and the page wants one tidy list of
//! posts with their author and comments already attached. This module is the desk where
//! that happens.
//!
//! ```text
//!   GET /posts ──┐
//!   GET /users ──┼──▶ decode ─▶ validate ─▶ index ─▶ join ─▶ Vec<Post>
//!   GET /comments┘
//!
//!   GET /posts/{id} ─▶ GET /users/{userId} ──┐
//!   GET /posts/{id}/comments ────────────────┴──▶ join ─▶ Post
//! ```
//!
//! ## Rules of the desk 📜
//! - All or nothing. One bad element anywhere and the whole call fails; nobody gets a
//!   half-joined post.
//! - A post whose author can't be found is an error. A post with no comments is not.
//! - Comments keep the order the API sent them in.
//! - Independent fetches are polled concurrently inside one task. The join waits for all of
//!   them, and when several fail at once the error reported is the first in a fixed order
//!   (posts, users, comments / post+author, comments), so the same bad input always gets the
//!   same message.

use std::collections::HashMap;

use serde_json::Value;
use tracing::{debug, trace};

use crate::errors::{Endpoint, FeedError};
use crate::model::{Author, Comment, Post};
use crate::transport::{Transport, TransportBackend, paths};
use crate::validators::{RawComment, RawPost, RawUser};

type AuthorsById = HashMap<u64, Author>;
type CommentsByPostId = HashMap<u64, Vec<Comment>>;

/// 📰 The data-access surface for the page layer.
#[derive(Debug, Clone)]
pub struct PostFeed<T = TransportBackend> {
    transport: T,
}

impl<T: Transport> PostFeed<T> {
    pub fn new(transport: T) -> Self {
        Self { transport }
    }

    pub fn transport(&self) -> &T {
        &self.transport
    }

    /// 🚀 Every post, each with its author and comments.
    ///
    /// Fires `/posts`, `/users` and `/comments` without waiting on each other, then joins.
    /// Result order is the order of `/posts`.
    pub async fn fetch_all_posts_aggregated(&self) -> Result<Vec<Post>, FeedError> {
        debug!("📡 Fetching posts, users and comments");
        let (posts, authors, comments) = futures::join!(
            self.fetch_raw_posts(),
            self.fetch_authors_by_id(),
            self.fetch_comments_by_post_id(),
        );
        let posts = posts?;
        let authors = authors?;
        let comments = comments?;

        let joined = posts
            .into_iter()
            .map(|raw_post| join_post(raw_post, &authors, &comments))
            .collect::<Result<Vec<_>, _>>()?;

        debug!("✅ Joined {} posts", joined.len());
        Ok(joined)
    }

    /// 🎯 One post, its author and its comments.
    ///
    /// `None` fails straight away with [`FeedError::MissingPostId`] and touches no network.
    /// The author fetch needs the post's `userId`, so it waits for the post; the comments
    /// fetch runs alongside that chain.
    pub async fn fetch_one_post_aggregated(&self, post_id: Option<u64>) -> Result<Post, FeedError> {
        let post_id = post_id.ok_or(FeedError::MissingPostId)?;
        debug!("📡 Fetching post {} with its author and comments", post_id);

        let post_and_author = async {
            let raw_post = self.fetch_raw_post(post_id).await?;
            let author = self.fetch_author(raw_post.user_id).await?;
            Ok::<_, FeedError>((raw_post, author))
        };
        let (post_and_author, comments) =
            futures::join!(post_and_author, self.fetch_comments_for_post(Some(post_id)));
        let (raw_post, author) = post_and_author?;
        let comments = comments?;

        Ok(Post {
            id: raw_post.id,
            title: raw_post.title,
            body: raw_post.body,
            comments,
            author,
        })
    }

    /// 💬 The comments of one post, in API order.
    ///
    /// Every comment must carry `postId == post_id`; one stray comment fails the call with
    /// [`FeedError::CommentPostIdMismatch`].
    pub async fn fetch_comments_for_post(
        &self,
        post_id: Option<u64>,
    ) -> Result<Vec<Comment>, FeedError> {
        let post_id = post_id.ok_or(FeedError::MissingPostId)?;
        let body = self.transport.get_text(&paths::post_comments(post_id)).await?;
        let candidates = decode_array(&body, Endpoint::Comments)?;

        candidates
            .iter()
            .map(|candidate| {
                let raw = RawComment::narrow(candidate)
                    .ok_or_else(|| FeedError::unexpected(Endpoint::Comments))?;
                if raw.post_id != post_id {
                    return Err(FeedError::CommentPostIdMismatch);
                }
                Ok(raw.into_comment())
            })
            .collect()
    }

    async fn fetch_raw_posts(&self) -> Result<Vec<RawPost>, FeedError> {
        let body = self.transport.get_text(paths::POSTS).await?;
        let candidates = decode_array(&body, Endpoint::Posts)?;
        let posts = candidates
            .iter()
            .map(|candidate| {
                RawPost::narrow(candidate).ok_or_else(|| FeedError::unexpected(Endpoint::Posts))
            })
            .collect::<Result<Vec<_>, _>>()?;
        trace!("📦 {} posts validated", posts.len());
        Ok(posts)
    }

    async fn fetch_authors_by_id(&self) -> Result<AuthorsById, FeedError> {
        let body = self.transport.get_text(paths::USERS).await?;
        let candidates = decode_array(&body, Endpoint::Users)?;

        let mut authors = AuthorsById::with_capacity(candidates.len());
        for candidate in &candidates {
            let author = RawUser::narrow(candidate)
                .ok_or_else(|| FeedError::unexpected(Endpoint::Users))?
                .into_author();
            authors.insert(author.id, author);
        }
        trace!("📦 {} authors indexed", authors.len());
        Ok(authors)
    }

    async fn fetch_comments_by_post_id(&self) -> Result<CommentsByPostId, FeedError> {
        let body = self.transport.get_text(paths::COMMENTS).await?;
        let candidates = decode_array(&body, Endpoint::Comments)?;

        let mut comments = CommentsByPostId::new();
        for candidate in &candidates {
            let raw = RawComment::narrow(candidate)
                .ok_or_else(|| FeedError::unexpected(Endpoint::Comments))?;
            comments.entry(raw.post_id).or_default().push(raw.into_comment());
        }
        trace!("📦 comments grouped under {} posts", comments.len());
        Ok(comments)
    }

    async fn fetch_raw_post(&self, post_id: u64) -> Result<RawPost, FeedError> {
        let body = self.transport.get_text(&paths::post(post_id)).await?;
        let candidate = decode(&body, Endpoint::Post)?;
        RawPost::narrow(&candidate).ok_or_else(|| FeedError::unexpected(Endpoint::Post))
    }

    async fn fetch_author(&self, user_id: u64) -> Result<Author, FeedError> {
        let body = self.transport.get_text(&paths::user(user_id)).await?;
        // -- 💀 an unparseable user body fails right here, same as every other endpoint.
        let candidate = decode(&body, Endpoint::User)?;
        RawUser::narrow(&candidate)
            .map(RawUser::into_author)
            .ok_or_else(|| FeedError::unexpected(Endpoint::User))
    }
}

fn decode(body: &str, endpoint: Endpoint) -> Result<Value, FeedError> {
    serde_json::from_str(body).map_err(|parse_error| {
        trace!("🦆 {} endpoint sent something that isn't JSON: {}", endpoint, parse_error);
        FeedError::unexpected(endpoint)
    })
}

fn decode_array(body: &str, endpoint: Endpoint) -> Result<Vec<Value>, FeedError> {
    match decode(body, endpoint)? {
        Value::Array(items) => Ok(items),
        _ => Err(FeedError::expected_array(endpoint)),
    }
}

fn join_post(
    raw_post: RawPost,
    authors: &AuthorsById,
    comments: &CommentsByPostId,
) -> Result<Post, FeedError> {
    let author = authors
        .get(&raw_post.user_id)
        .cloned()
        .ok_or(FeedError::MissingUserForPost)?;

    Ok(Post {
        id: raw_post.id,
        title: raw_post.title,
        body: raw_post.body,
        comments: comments.get(&raw_post.id).cloned().unwrap_or_default(),
        author,
    })
}
