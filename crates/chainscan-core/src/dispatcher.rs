//! Request dispatcher: query composition, pacing, transport call, classification.
//!
//! ```text
//! send() → build_url → [RateGate acquire] → transport.get → [release] → envelope → classify
//! ```
//!
//! The gate is held for the whole HTTP call. Pacing is defined on request
//! starts and only one request may be in flight, so the permit is released
//! only once the transport has answered, failed, timed out or been cancelled.

use std::sync::Arc;

use serde::de::DeserializeOwned;
use tokio_util::sync::CancellationToken;

use crate::config::ClientConfig;
use crate::envelope::ResponseEnvelope;
use crate::error::{Result, ScanError};
use crate::policy::RateGate;
use crate::query::{build_url, QueryParams};
use crate::transport::{HttpResponse, HttpTransport};

/// Single entry point for every API call made by one client instance.
pub struct Dispatcher {
    config: ClientConfig,
    gate: RateGate,
    transport: Arc<dyn HttpTransport>,
}

impl Dispatcher {
    /// Validate `config` and build a dispatcher with its own rate gate.
    pub fn new(config: ClientConfig, transport: Arc<dyn HttpTransport>) -> Result<Self> {
        config.validate()?;
        let gate = RateGate::for_key(&config.api_key, config.pacing);
        tracing::debug!(
            transport = transport.name(),
            keyed = config.api_key.is_set(),
            pacing = gate.is_enabled(),
            min_interval_ms = gate.min_interval().as_millis() as u64,
            "dispatcher ready"
        );
        Ok(Self {
            config,
            gate,
            transport,
        })
    }

    pub fn config(&self) -> &ClientConfig {
        &self.config
    }

    pub fn gate(&self) -> &RateGate {
        &self.gate
    }

    /// Call `module`/`action` and decode the envelope's result into `T`.
    pub async fn send<T: DeserializeOwned>(
        &self,
        module: &str,
        action: &str,
        params: &QueryParams,
        cancel: &CancellationToken,
    ) -> Result<T> {
        let envelope = self.fetch(module, action, params, cancel).await?;
        let result = envelope.classify().into_result();
        if let Err(e) = &result {
            tracing::debug!(module, action, error = %e, "api call failed");
        }
        result
    }

    /// Perform the paced HTTP call and decode the envelope, without
    /// interpreting its status.
    pub async fn fetch(
        &self,
        module: &str,
        action: &str,
        params: &QueryParams,
        cancel: &CancellationToken,
    ) -> Result<ResponseEnvelope> {
        let url = build_url(&self.config.base_url, module, action, &self.config.api_key, params);

        let response = {
            let _permit = self.gate.acquire(cancel).await?;
            tracing::debug!(module, action, "sending request");
            self.get(&url, cancel).await
        }
        .map_err(|e| {
            tracing::warn!(module, action, error = %e, "request did not complete");
            e
        })?;

        if !response.is_success() {
            tracing::warn!(module, action, status = response.status, "unexpected HTTP status");
            return Err(ScanError::Api(format!(
                "API responded with HTTP {}",
                response.status
            )));
        }

        serde_json::from_str(&response.body)
            .map_err(|e| ScanError::Api(format!("failed to parse response: {e}")))
    }

    async fn get(&self, url: &url::Url, cancel: &CancellationToken) -> Result<HttpResponse> {
        let timeout = self.config.request_timeout();
        let timed_out = ScanError::TimedOut {
            ms: timeout.as_millis() as u64,
        };

        tokio::select! {
            biased;
            _ = cancel.cancelled() => Err(ScanError::Cancelled),
            res = tokio::time::timeout(timeout, self.transport.get(url, timeout)) => match res {
                Ok(inner) => inner.map_err(ScanError::from),
                Err(_) => Err(timed_out),
            },
        }
    }
}
