//! HTTP transport capability
//!
//! The engine issues plain GETs for JSON and owns its caching policy
//! (it sends no-cache headers itself), so the transport needs no cache
//! or dedupe logic of its own.

use async_trait::async_trait;
use parking_lot::{Mutex, RwLock};
use serde_json::Value;
use std::collections::HashMap;
use thiserror::Error;

/// Transport errors
#[derive(Debug, Clone, Error)]
pub enum TransportError {
    /// Request never completed (DNS, connect, timeout...)
    #[error("network error: {0}")]
    Network(String),

    /// Non-success HTTP status
    #[error("unexpected status: {0}")]
    Status(u16),

    /// Response body was not the expected JSON shape
    #[error("body decode error: {0}")]
    Decode(String),
}

/// HTTP GET capability consumed by the engine
#[async_trait]
pub trait Transport: Send + Sync {
    /// Perform a GET and decode the body as JSON
    async fn get_json(
        &self,
        url: &str,
        headers: &[(String, String)],
    ) -> Result<Value, TransportError>;
}

/// Canned-response transport for tests and offline development.
///
/// Unrouted URLs fail with a network error, which doubles as the way to
/// simulate remote outages. Every request URL is recorded so tests can
/// assert how many fetches a code path performed.
pub struct StaticTransport {
    routes: RwLock<HashMap<String, Value>>,
    requests: Mutex<Vec<String>>,
}

impl StaticTransport {
    /// Create an empty transport (every request fails)
    pub fn new() -> Self {
        Self {
            routes: RwLock::new(HashMap::new()),
            requests: Mutex::new(Vec::new()),
        }
    }

    /// Serve `body` for GETs of `url`
    pub fn route(&self, url: impl Into<String>, body: Value) {
        self.routes.write().insert(url.into(), body);
    }

    /// Stop serving `url`; subsequent GETs fail
    pub fn unroute(&self, url: &str) {
        self.routes.write().remove(url);
    }

    /// URLs requested so far, in order
    pub fn requests(&self) -> Vec<String> {
        self.requests.lock().clone()
    }

    /// Number of requests seen so far
    pub fn request_count(&self) -> usize {
        self.requests.lock().len()
    }
}

impl Default for StaticTransport {
    fn default() -> Self {
        Self::new()
    }
}

#[async_trait]
impl Transport for StaticTransport {
    async fn get_json(
        &self,
        url: &str,
        _headers: &[(String, String)],
    ) -> Result<Value, TransportError> {
        self.requests.lock().push(url.to_string());
        self.routes
            .read()
            .get(url)
            .cloned()
            .ok_or_else(|| TransportError::Network(format!("no route to {url}")))
    }
}
