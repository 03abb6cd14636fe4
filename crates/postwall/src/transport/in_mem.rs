//! # Previously, on Postwall...
//!
//! 🎬 The API was down. Or slow. Or in a test that runs on a plane with no WiFi. Someone
//! had to serve posts anyway. Someone had to be brave. Someone had to write a transport so
//! simple it lives entirely in a `HashMap`, gone the moment you drop it.
//!
//! That someone was this module.
//!
//! `InMemoryTransport` answers from canned bodies keyed by path and keeps a log of every
//! path it was asked for, so tests can count network calls without a network. Unknown
//! paths get `{}`, which is what the real API says about posts that don't exist.
//!
//! ✅ No sockets. No DNS. No heartbeat. Just vibes and heap memory. 🦆

use std::collections::HashMap;
use std::sync::{Arc, Mutex, PoisonError};

use async_trait::async_trait;

use super::Transport;
use crate::errors::FeedError;

/// 🗃️ Canned responses plus a call log.
///
/// Clone-able with shared state, so a test can hand one clone to the feed and keep the
/// other to peek at what was requested.
#[derive(Debug, Clone, Default)]
pub struct InMemoryTransport {
    responses: Arc<HashMap<String, String>>,
    calls: Arc<Mutex<Vec<String>>>,
}

impl InMemoryTransport {
    pub fn new() -> Self {
        Self::default()
    }

    /// 📦 Register a body for `path`. Builder-style; call before sharing the transport.
    pub fn with_response(mut self, path: impl Into<String>, body: impl Into<String>) -> Self {
        Arc::make_mut(&mut self.responses).insert(path.into(), body.into());
        self
    }

    /// 📋 Every path requested so far, in order.
    pub fn calls(&self) -> Vec<String> {
        self.calls
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .clone()
    }

    pub fn call_count(&self) -> usize {
        self.calls
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .len()
    }
}

#[async_trait]
impl Transport for InMemoryTransport {
    async fn get_text(&self, path: &str) -> Result<String, FeedError> {
        self.calls
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .push(path.to_string());

        Ok(self
            .responses
            .get(path)
            .cloned()
            .unwrap_or_else(|| "{}".to_string()))
    }
}
