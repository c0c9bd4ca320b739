//! chainscan-client — typed operations over the Etherscan API.
//!
//! Each API module (`account`, `stats`) is a thin handle that maps typed
//! arguments onto query parameters and asks the shared [`Dispatcher`] for a
//! decoded result. Pacing, envelope handling and error classification all
//! live in `chainscan-core`.
//!
//! # Quick start
//! ```rust,no_run
//! use chainscan_client::{CancellationToken, ClientConfig, Etherscan};
//!
//! # async fn run() -> Result<(), chainscan_client::ScanError> {
//! let client = Etherscan::new(ClientConfig::new("YOUR_API_KEY"))?;
//! let cancel = CancellationToken::new();
//! let wei = client
//!     .account()
//!     .balance("0xde0b295669a9fd93d5f28d9ec85e40f4cb697bae", &cancel)
//!     .await?;
//! println!("{wei}");
//! # Ok(())
//! # }
//! ```

pub mod account;
pub mod client;
mod de;
pub mod stats;
pub mod types;

pub use account::{Account, SortOrder, TransferQuery, MAX_BATCH_ADDRESSES};
pub use client::Etherscan;
pub use stats::Stats;
pub use types::{AccountBalance, Erc20Transfer, Erc721Transfer, EthPrice, TokenTransfer, TransferKind};

pub use alloy_primitives::U256;
pub use chainscan_core::{
    ApiKey, CancellationToken, ClientConfig, Dispatcher, ErrorKind, Result, ScanError,
};
