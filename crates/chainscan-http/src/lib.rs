//! chainscan-http — `HttpTransport` implementation backed by `reqwest`.
//!
//! # Quick start
//! ```rust,no_run
//! use chainscan_http::ReqwestTransport;
//! use std::sync::Arc;
//!
//! let transport = Arc::new(ReqwestTransport::with_defaults().unwrap());
//! ```

pub mod client;

pub use client::{HttpTransportConfig, ReqwestTransport};
