//! 📰 postwall — posts, their authors and their comments, fetched from three REST endpoints
//! and joined into one wall you can actually render.
//!
//! 🧠 Knowledge graph:
//! - [`validators`] check raw JSON records field by field.
//! - [`aggregate::PostFeed`] fetches, validates and joins; it is the only data-access surface.
//! - [`loader::Loader`] drives fetches per identity and drops stale deliveries.
//! - [`debounce::Debouncer`] and [`search::SearchContext`] turn keystrokes into a filter term.
//! - [`app_config`] loads everything above's knobs. 🦆

pub mod aggregate;
pub mod app_config;
pub mod debounce;
pub mod errors;
pub mod loader;
pub mod logging;
pub mod model;
pub mod search;
pub mod transport;
pub mod utils;
pub mod validators;

#[cfg(test)]
mod test_fixtures;

pub use aggregate::PostFeed;
pub use app_config::{AppConfig, load_config};
pub use errors::{Endpoint, FeedError};
pub use model::{Author, Comment, Post};

use transport::TransportBackend;

/// 🚀 A feed over HTTP, configured from `api.*`.
pub fn feed_from_config(config: &AppConfig) -> Result<PostFeed<TransportBackend>, FeedError> {
    Ok(PostFeed::new(TransportBackend::from_config(&config.api)?))
}
