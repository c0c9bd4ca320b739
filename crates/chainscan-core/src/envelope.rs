//! The `{status, message, result}` response envelope and its classification.
//!
//! The API reports many "nothing found" conditions as failures carrying an
//! empty-but-valid payload (`status: "0"`, `result: []`). Those are recovered
//! into successes; every other non-`"1"` status is an error.

use serde::de::DeserializeOwned;
use serde::{Deserialize, Deserializer};
use serde_json::Value;

use crate::error::{ErrorKind, Result, ScanError};

const RATE_LIMIT_MARKER: &str = "rate limit";
const INVALID_KEY_MARKER: &str = "invalid api key";

/// Outer JSON object every response is wrapped in.
#[derive(Debug, Clone, Deserialize)]
pub struct ResponseEnvelope {
    #[serde(default, deserialize_with = "status_text")]
    pub status: String,
    #[serde(default)]
    pub message: String,
    #[serde(default)]
    pub result: Value,
}

/// Outcome of interpreting an envelope, before the payload is decoded.
#[derive(Debug, Clone, PartialEq)]
pub enum Classification {
    /// `status == "1"`.
    Success(Value),
    /// A failure the API marks with a recognisable result text.
    KnownFailure { kind: ErrorKind, message: String },
    /// Any other failure. `result` is kept for empty-payload recovery.
    UnknownFailure { message: String, result: Value },
}

impl ResponseEnvelope {
    pub fn is_ok(&self) -> bool {
        self.status == "1"
    }

    /// The result as text: strings verbatim, anything else as compact JSON.
    pub fn result_text(&self) -> String {
        match &self.result {
            Value::String(s) => s.clone(),
            other => other.to_string(),
        }
    }

    pub fn classify(self) -> Classification {
        if self.is_ok() {
            return Classification::Success(self.result);
        }

        let text = self.result_text();
        let lower = text.to_lowercase();

        if lower.contains(RATE_LIMIT_MARKER) {
            return Classification::KnownFailure {
                kind: ErrorKind::RateLimited,
                message: text,
            };
        }
        if lower.contains(INVALID_KEY_MARKER) {
            return Classification::KnownFailure {
                kind: ErrorKind::InvalidKey,
                message: text,
            };
        }

        let message = if self.message.is_empty() {
            text
        } else {
            self.message
        };
        Classification::UnknownFailure {
            message,
            result: self.result,
        }
    }
}

impl Classification {
    /// Decode the payload into `T`, or turn the failure into a [`ScanError`].
    pub fn into_result<T: DeserializeOwned>(self) -> Result<T> {
        match self {
            Self::Success(value) => serde_json::from_value(value)
                .map_err(|e| ScanError::Api(format!("failed to parse result: {e}"))),
            Self::KnownFailure { kind, message } => Err(ScanError::from_kind(kind, message)),
            Self::UnknownFailure { message, result } => match recover_empty(result) {
                Some(value) => Ok(value),
                None => Err(ScanError::Api(message)),
            },
        }
    }
}

/// An empty list in a failure envelope means "no results".
fn recover_empty<T: DeserializeOwned>(result: Value) -> Option<T> {
    match &result {
        Value::Array(items) if items.is_empty() => serde_json::from_value(result).ok(),
        _ => None,
    }
}

/// Accept `"1"` as well as a bare `1`.
fn status_text<'de, D: Deserializer<'de>>(de: D) -> std::result::Result<String, D::Error> {
    Ok(match Value::deserialize(de)? {
        Value::String(s) => s,
        Value::Null => String::new(),
        other => other.to_string(),
    })
}
