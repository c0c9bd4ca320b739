//! The `Etherscan` client handle.

use std::sync::Arc;
use std::time::Duration;

use chainscan_core::{ClientConfig, Dispatcher, HttpTransport, Result, ScanError};
use chainscan_http::ReqwestTransport;

use crate::account::Account;
use crate::stats::Stats;

/// Etherscan API client.
///
/// Cheap to clone; clones share one dispatcher and therefore one rate gate.
/// Separately constructed clients pace independently.
#[derive(Clone)]
pub struct Etherscan {
    dispatcher: Arc<Dispatcher>,
}

impl Etherscan {
    /// Build a client that talks HTTP through `reqwest`.
    pub fn new(config: ClientConfig) -> Result<Self> {
        let transport = ReqwestTransport::with_defaults()
            .map_err(|e| ScanError::Config(e.to_string()))?;
        Self::with_transport(config, Arc::new(transport))
    }

    /// Build a client on top of a custom transport.
    pub fn with_transport(config: ClientConfig, transport: Arc<dyn HttpTransport>) -> Result<Self> {
        Ok(Self {
            dispatcher: Arc::new(Dispatcher::new(config, transport)?),
        })
    }

    /// Client configured from `ETHERSCAN_*` environment variables.
    pub fn from_env() -> Result<Self> {
        Self::new(ClientConfig::from_env()?)
    }

    pub fn account(&self) -> Account<'_> {
        Account::new(&self.dispatcher)
    }

    pub fn stats(&self) -> Stats<'_> {
        Stats::new(&self.dispatcher)
    }

    /// Minimum spacing between request starts for this client's key tier.
    pub fn min_interval(&self) -> Duration {
        self.dispatcher.gate().min_interval()
    }

    pub fn config(&self) -> &ClientConfig {
        self.dispatcher.config()
    }

    /// The underlying dispatcher, for actions without a typed wrapper.
    pub fn dispatcher(&self) -> &Dispatcher {
        &self.dispatcher
    }
}

impl std::fmt::Debug for Etherscan {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Etherscan")
            .field("config", self.config())
            .finish()
    }
}
