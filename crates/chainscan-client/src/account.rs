//! `account` module: balances and token transfer history.

use alloy_primitives::U256;
use chainscan_core::{CancellationToken, Dispatcher, QueryParams, Result, ScanError};

use crate::de::parse_scalar;
use crate::types::{AccountBalance, TransferKind};

const MODULE: &str = "account";

/// Upper bound on addresses in a single `balancemulti` call.
pub const MAX_BATCH_ADDRESSES: usize = 20;

/// Result ordering for list actions.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SortOrder {
    Asc,
    Desc,
}

impl std::fmt::Display for SortOrder {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Asc => write!(f, "asc"),
            Self::Desc => write!(f, "desc"),
        }
    }
}

impl std::str::FromStr for SortOrder {
    type Err = String;

    fn from_str(s: &str) -> std::result::Result<Self, Self::Err> {
        match s.to_ascii_lowercase().as_str() {
            "asc" => Ok(Self::Asc),
            "desc" => Ok(Self::Desc),
            other => Err(format!("unknown sort order: {other}")),
        }
    }
}

/// Optional filters for token transfer listings.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct TransferQuery {
    /// Only transfers of this token contract.
    pub contract_address: Option<String>,
    pub start_block: Option<u64>,
    pub end_block: Option<u64>,
    pub sort: Option<SortOrder>,
    /// 1-based page number. Sent only together with `offset`.
    pub page: Option<u32>,
    /// Page size. Sent only together with `page`.
    pub offset: Option<u32>,
}

impl TransferQuery {
    pub fn contract(mut self, address: impl Into<String>) -> Self {
        self.contract_address = Some(address.into());
        self
    }

    pub fn blocks(mut self, start: u64, end: u64) -> Self {
        self.start_block = Some(start);
        self.end_block = Some(end);
        self
    }

    pub fn sort(mut self, sort: SortOrder) -> Self {
        self.sort = Some(sort);
        self
    }

    pub fn paginate(mut self, page: u32, offset: u32) -> Self {
        self.page = Some(page);
        self.offset = Some(offset);
        self
    }

    fn to_params(&self, address: &str) -> QueryParams {
        let mut params = QueryParams::new().with("address", address);
        params.push_opt(
            "contractaddress",
            self.contract_address
                .as_deref()
                .map(str::trim)
                .filter(|c| !c.is_empty()),
        );
        params.push_opt("startblock", self.start_block);
        params.push_opt("endblock", self.end_block);
        params.push_opt("sort", self.sort);
        if let (Some(page), Some(offset)) = (self.page, self.offset) {
            params.push("page", page.to_string());
            params.push("offset", offset.to_string());
        }
        params
    }
}

/// Handle for `module=account` actions.
pub struct Account<'a> {
    dispatcher: &'a Dispatcher,
}

impl<'a> Account<'a> {
    pub(crate) fn new(dispatcher: &'a Dispatcher) -> Self {
        Self { dispatcher }
    }

    /// Ether balance of `address` in wei.
    pub async fn balance(&self, address: &str, cancel: &CancellationToken) -> Result<U256> {
        let address = require_address(address)?;
        let params = QueryParams::new().with("address", address).with("tag", "latest");
        let raw: String = self
            .dispatcher
            .send(MODULE, "balance", &params, cancel)
            .await?;
        parse_scalar(&raw)
    }

    /// Ether balances of up to [`MAX_BATCH_ADDRESSES`] addresses in one call.
    pub async fn balances(
        &self,
        addresses: &[&str],
        cancel: &CancellationToken,
    ) -> Result<Vec<AccountBalance>> {
        if addresses.len() > MAX_BATCH_ADDRESSES {
            return Err(ScanError::InvalidArgument(format!(
                "no more than {MAX_BATCH_ADDRESSES} addresses are supported in a single batch, got {}",
                addresses.len()
            )));
        }
        let addresses = addresses
            .iter()
            .map(|a| require_address(a))
            .collect::<Result<Vec<_>>>()?;
        tracing::debug!(count = addresses.len(), "batched balance lookup");

        let params = QueryParams::new()
            .with("address", addresses.join(","))
            .with("tag", "latest");
        self.dispatcher
            .send(MODULE, "balancemulti", &params, cancel)
            .await
    }

    /// Token transfer events involving `address`.
    ///
    /// `E` selects the token standard: [`Erc20Transfer`](crate::Erc20Transfer)
    /// or [`Erc721Transfer`](crate::Erc721Transfer). An address with no
    /// transfers yields an empty list.
    pub async fn token_transfers<E: TransferKind>(
        &self,
        address: &str,
        query: &TransferQuery,
        cancel: &CancellationToken,
    ) -> Result<Vec<E>> {
        let address = require_address(address)?;
        self.dispatcher
            .send(MODULE, E::ACTION, &query.to_params(address), cancel)
            .await
    }
}

fn require_address(address: &str) -> Result<&str> {
    let address = address.trim();
    if address.is_empty() {
        return Err(ScanError::InvalidArgument(
            "address must be a non-empty string".into(),
        ));
    }
    Ok(address)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn transfer_query_params() {
        let params = TransferQuery::default()
            .contract("0x9f8f72aa9304c8b593d555f12ef6589cc3a579a2")
            .blocks(100, 200)
            .sort(SortOrder::Desc)
            .paginate(2, 50)
            .to_params("0xabc");

        assert_eq!(params.get("address"), Some("0xabc"));
        assert_eq!(params.get("contractaddress"), Some("0x9f8f72aa9304c8b593d555f12ef6589cc3a579a2"));
        assert_eq!(params.get("startblock"), Some("100"));
        assert_eq!(params.get("endblock"), Some("200"));
        assert_eq!(params.get("sort"), Some("desc"));
        assert_eq!(params.get("page"), Some("2"));
        assert_eq!(params.get("offset"), Some("50"));
    }

    #[test]
    fn pagination_needs_both_values() {
        let query = TransferQuery {
            page: Some(3),
            ..Default::default()
        };
        let params = query.to_params("0xabc");
        assert_eq!(params.get("page"), None);
        assert_eq!(params.get("offset"), None);
    }

    #[test]
    fn blank_contract_is_omitted() {
        let params = TransferQuery::default().contract("  ").to_params("0xabc");
        assert_eq!(params.len(), 1);
    }

    #[test]
    fn sort_order_parses() {
        assert_eq!("ASC".parse::<SortOrder>().unwrap(), SortOrder::Asc);
        assert_eq!("desc".parse::<SortOrder>().unwrap(), SortOrder::Desc);
        assert!("up".parse::<SortOrder>().is_err());
    }

    #[test]
    fn blank_address_rejected() {
        assert!(matches!(require_address("  "), Err(ScanError::InvalidArgument(_))));
        assert_eq!(require_address(" 0xabc ").unwrap(), "0xabc");
    }
}
