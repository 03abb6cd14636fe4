//! 🔍 Search — the shared "who are we looking for" value, and the filter that uses it.
//!
//! No globals here. A [`SearchContext`] is an explicit object holding the current term and
//! an updater, passed to whoever needs it. Under the hood it's a `tokio::sync::watch`
//! channel, so a page can subscribe and re-render whenever the term moves.

use std::sync::Arc;

use tokio::sync::watch;
use tracing::debug;

use crate::model::Post;

/// 🔍 Current search term, where it started, and a way to change it.
#[derive(Debug, Clone)]
pub struct SearchContext {
    initial_term: String,
    term: Arc<watch::Sender<String>>,
}

impl Default for SearchContext {
    fn default() -> Self {
        Self::new("")
    }
}

impl SearchContext {
    pub fn new(initial_term: impl Into<String>) -> Self {
        let initial_term = initial_term.into();
        let (term, _) = watch::channel(initial_term.clone());
        Self {
            initial_term,
            term: Arc::new(term),
        }
    }

    /// The term this context started with. Search bars seed their display from it.
    pub fn initial_term(&self) -> &str {
        &self.initial_term
    }

    pub fn term(&self) -> String {
        self.term.borrow().clone()
    }

    pub fn update(&self, new_term: impl Into<String>) {
        let new_term = new_term.into();
        debug!("🔍 Search term is now {:?}", new_term);
        // -- 📣 send_replace, not send: nobody subscribing is not an error
        self.term.send_replace(new_term);
    }

    /// 🔧 The updater as a standalone closure, ready to hand to a `Debouncer`.
    pub fn updater(&self) -> impl Fn(String) + Send + Sync + 'static {
        let context = self.clone();
        move |new_term| context.update(new_term)
    }

    pub fn subscribe(&self) -> watch::Receiver<String> {
        self.term.subscribe()
    }

    /// 🎯 Posts whose author matches the current term.
    pub fn filter<'a>(&self, posts: &'a [Post]) -> Vec<&'a Post> {
        filter_by_author(posts, &self.term())
    }
}

/// 🎯 Case-insensitive substring match of `term` against each author's name.
/// An empty term keeps everything. Order is preserved.
pub fn filter_by_author<'a>(posts: &'a [Post], term: &str) -> Vec<&'a Post> {
    let needle = term.to_lowercase();
    posts
        .iter()
        .filter(|post| needle.is_empty() || post.author.name.to_lowercase().contains(&needle))
        .collect()
}
