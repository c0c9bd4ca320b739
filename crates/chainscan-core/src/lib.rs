//! chainscan-core — request pacing, envelope classification and dispatch.
//!
//! # Overview
//!
//! ChainScan talks to Etherscan-style block explorer APIs: a single
//! `GET` endpoint routed by `module` / `action` query parameters that answers
//! with a `{status, message, result}` JSON envelope. The core crate defines:
//!
//! - [`Dispatcher`] — the single entry point every typed operation goes through
//! - [`RateGate`] — one request in flight, minimum spacing between starts
//! - [`ResponseEnvelope`] / [`Classification`] — envelope interpretation
//! - [`HttpTransport`] — the injected transport seam
//! - [`ScanError`] — structured error type
//! - [`ClientConfig`] — immutable client configuration

pub mod config;
pub mod dispatcher;
pub mod envelope;
pub mod error;
pub mod policy;
pub mod query;
pub mod transport;

pub use config::{ApiKey, ClientConfig, DEFAULT_BASE_URL, PLACEHOLDER_API_KEY};
pub use dispatcher::Dispatcher;
pub use envelope::{Classification, ResponseEnvelope};
pub use error::{ErrorKind, Result, ScanError, TransportError};
pub use policy::{GatePermit, RateGate};
pub use query::QueryParams;
pub use transport::{HttpResponse, HttpTransport};

pub use tokio_util::sync::CancellationToken;
