//! `stats` module: network-wide figures.

use alloy_primitives::U256;
use chainscan_core::{CancellationToken, Dispatcher, QueryParams, Result};

use crate::de::parse_scalar;
use crate::types::EthPrice;

const MODULE: &str = "stats";

/// Handle for `module=stats` actions.
pub struct Stats<'a> {
    dispatcher: &'a Dispatcher,
}

impl<'a> Stats<'a> {
    pub(crate) fn new(dispatcher: &'a Dispatcher) -> Self {
        Self { dispatcher }
    }

    /// Total ether supply in wei.
    pub async fn total_supply(&self, cancel: &CancellationToken) -> Result<U256> {
        let raw: String = self
            .dispatcher
            .send(MODULE, "ethsupply", &QueryParams::new(), cancel)
            .await?;
        parse_scalar(&raw)
    }

    /// Latest ETH price in BTC and USD.
    pub async fn price(&self, cancel: &CancellationToken) -> Result<EthPrice> {
        self.dispatcher
            .send(MODULE, "ethprice", &QueryParams::new(), cancel)
            .await
    }
}
