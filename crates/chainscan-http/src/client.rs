//! HTTP transport backed by `reqwest`.
//!
//! Features:
//! - Per-request timeout (the dispatcher passes the configured value)
//! - Connection reuse across calls (one `reqwest::Client` per transport)
//! - Errors stripped of the request URL, which carries the API key

use async_trait::async_trait;
use std::time::Duration;
use url::Url;

use chainscan_core::error::TransportError;
use chainscan_core::transport::{HttpResponse, HttpTransport};

/// Configuration for `ReqwestTransport`.
#[derive(Debug, Clone)]
pub struct HttpTransportConfig {
    pub connect_timeout: Duration,
    pub user_agent: String,
}

impl Default for HttpTransportConfig {
    fn default() -> Self {
        Self {
            connect_timeout: Duration::from_secs(10),
            user_agent: concat!("chainscan/", env!("CARGO_PKG_VERSION")).to_string(),
        }
    }
}

/// `HttpTransport` over a shared `reqwest::Client`.
#[derive(Debug, Clone)]
pub struct ReqwestTransport {
    http: reqwest::Client,
}

impl ReqwestTransport {
    pub fn new(config: HttpTransportConfig) -> Result<Self, TransportError> {
        let http = reqwest::Client::builder()
            .connect_timeout(config.connect_timeout)
            .user_agent(config.user_agent)
            .build()
            .map_err(|e| TransportError::Http(format!("failed to build HTTP client: {e}")))?;
        Ok(Self { http })
    }

    pub fn with_defaults() -> Result<Self, TransportError> {
        Self::new(HttpTransportConfig::default())
    }

    /// Wrap an existing client (custom TLS roots, proxies, ...).
    pub fn with_client(http: reqwest::Client) -> Self {
        Self { http }
    }
}

fn map_error(err: reqwest::Error, timeout: Duration) -> TransportError {
    if err.is_timeout() {
        TransportError::Timeout {
            ms: timeout.as_millis() as u64,
        }
    } else {
        TransportError::Http(err.without_url().to_string())
    }
}

#[async_trait]
impl HttpTransport for ReqwestTransport {
    async fn get(&self, url: &Url, timeout: Duration) -> Result<HttpResponse, TransportError> {
        let resp = self
            .http
            .get(url.clone())
            .timeout(timeout)
            .send()
            .await
            .map_err(|e| map_error(e, timeout))?;

        let status = resp.status().as_u16();
        let body = resp.text().await.map_err(|e| map_error(e, timeout))?;

        tracing::trace!(status, bytes = body.len(), "http response");
        Ok(HttpResponse { status, body })
    }

    fn name(&self) -> &str {
        "reqwest"
    }
}
