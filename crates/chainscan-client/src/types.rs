//! Value objects decoded from API results.
//!
//! Etherscan encodes every number as a decimal string; the `de` helpers
//! turn them into `U256`, `u64` and timestamps.

use alloy_primitives::U256;
use chrono::{DateTime, Utc};
use serde::de::DeserializeOwned;
use serde::Deserialize;

/// One entry of a `balancemulti` result.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
pub struct AccountBalance {
    #[serde(default)]
    pub account: String,
    #[serde(deserialize_with = "crate::de::from_str_or_zero")]
    pub balance: U256,
}

/// ETH price quote from `stats/ethprice`.
#[derive(Debug, Clone, PartialEq, Deserialize)]
pub struct EthPrice {
    #[serde(rename = "ethbtc", deserialize_with = "crate::de::from_str")]
    pub btc: f64,
    #[serde(rename = "ethbtc_timestamp", deserialize_with = "crate::de::unix_seconds")]
    pub btc_timestamp: DateTime<Utc>,
    #[serde(rename = "ethusd", deserialize_with = "crate::de::from_str")]
    pub usd: f64,
    #[serde(rename = "ethusd_timestamp", deserialize_with = "crate::de::unix_seconds")]
    pub usd_timestamp: DateTime<Utc>,
}

/// Fields shared by every token transfer event.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct TokenTransfer {
    #[serde(deserialize_with = "crate::de::from_str")]
    pub block_number: u64,
    #[serde(deserialize_with = "crate::de::unix_seconds")]
    pub time_stamp: DateTime<Utc>,
    pub hash: String,
    #[serde(deserialize_with = "crate::de::from_str_or_zero")]
    pub nonce: u64,
    pub block_hash: String,
    pub from: String,
    pub to: String,
    pub contract_address: String,
    #[serde(default)]
    pub token_name: String,
    #[serde(default)]
    pub token_symbol: String,
    #[serde(deserialize_with = "crate::de::from_str_or_zero")]
    pub token_decimal: u8,
    /// Index of the transaction within its block.
    #[serde(deserialize_with = "crate::de::from_str_or_zero")]
    pub transaction_index: u64,
    #[serde(deserialize_with = "crate::de::from_str_or_zero")]
    pub gas: U256,
    #[serde(deserialize_with = "crate::de::from_str_or_zero")]
    pub gas_price: U256,
    #[serde(deserialize_with = "crate::de::from_str_or_zero")]
    pub gas_used: U256,
    #[serde(deserialize_with = "crate::de::from_str_or_zero")]
    pub cumulative_gas_used: U256,
    #[serde(default)]
    pub input: String,
    #[serde(deserialize_with = "crate::de::from_str_or_zero")]
    pub confirmations: u64,
}

/// ERC-20 transfer (`account/tokentx`).
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
pub struct Erc20Transfer {
    #[serde(flatten)]
    pub transfer: TokenTransfer,
    #[serde(deserialize_with = "crate::de::from_str")]
    pub value: U256,
}

/// ERC-721 transfer (`account/tokennfttx`).
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
pub struct Erc721Transfer {
    #[serde(flatten)]
    pub transfer: TokenTransfer,
    #[serde(rename = "tokenID", deserialize_with = "crate::de::from_str")]
    pub token_id: U256,
}

/// A transfer event type and the account action that lists it.
pub trait TransferKind: DeserializeOwned + Send + 'static {
    const ACTION: &'static str;

    fn transfer(&self) -> &TokenTransfer;
}

impl TransferKind for Erc20Transfer {
    const ACTION: &'static str = "tokentx";

    fn transfer(&self) -> &TokenTransfer {
        &self.transfer
    }
}

impl TransferKind for Erc721Transfer {
    const ACTION: &'static str = "tokennfttx";

    fn transfer(&self) -> &TokenTransfer {
        &self.transfer
    }
}
