//! Request policies applied by the dispatcher.
//!
//! ```text
//! Request → [RateGate] → [Transport] → release
//! ```

pub mod rate_gate;

pub use rate_gate::{GatePermit, RateGate, KEYED_INTERVAL, UNKEYED_INTERVAL};
