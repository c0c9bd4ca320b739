//! The `HttpTransport` trait — the seam between the dispatcher and the network.

use std::time::Duration;

use async_trait::async_trait;
use url::Url;

use crate::error::TransportError;

/// A raw HTTP response: status code and body text.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct HttpResponse {
    pub status: u16,
    pub body: String,
}

impl HttpResponse {
    pub fn new(status: u16, body: impl Into<String>) -> Self {
        Self {
            status,
            body: body.into(),
        }
    }

    pub fn ok(body: impl Into<String>) -> Self {
        Self::new(200, body)
    }

    /// Returns `true` for 2xx statuses.
    pub fn is_success(&self) -> bool {
        (200..300).contains(&self.status)
    }
}

/// Performs a single HTTP `GET`.
///
/// Non-2xx responses are returned as `Ok`; the dispatcher decides what they
/// mean. Implementations must be cancel-safe: the dispatcher drops the
/// returned future when the caller cancels, and that must abort the request.
///
/// The trait is object-safe and is stored as `Arc<dyn HttpTransport>`.
#[async_trait]
pub trait HttpTransport: Send + Sync + 'static {
    async fn get(&self, url: &Url, timeout: Duration) -> Result<HttpResponse, TransportError>;

    /// Identifier used in logs.
    fn name(&self) -> &str {
        "http"
    }
}
