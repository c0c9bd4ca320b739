//! Deserializers for Etherscan's string-encoded fields.

use std::fmt::Display;
use std::str::FromStr;

use chrono::{DateTime, Utc};
use serde::de::Error as _;
use serde::{Deserialize, Deserializer};

/// `"123"` → `T` via `FromStr`.
pub(crate) fn from_str<'de, D, T>(de: D) -> Result<T, D::Error>
where
    D: Deserializer<'de>,
    T: FromStr,
    T::Err: Display,
{
    let raw = String::deserialize(de)?;
    raw.trim().parse().map_err(D::Error::custom)
}

/// `""` → `0`, otherwise as [`from_str`].
pub(crate) fn from_str_or_zero<'de, D, T>(de: D) -> Result<T, D::Error>
where
    D: Deserializer<'de>,
    T: FromStr + Default,
    T::Err: Display,
{
    let raw = String::deserialize(de)?;
    let raw = raw.trim();
    if raw.is_empty() {
        return Ok(T::default());
    }
    raw.parse().map_err(D::Error::custom)
}

/// Unix seconds as a string → UTC timestamp.
pub(crate) fn unix_seconds<'de, D: Deserializer<'de>>(de: D) -> Result<DateTime<Utc>, D::Error> {
    let secs: i64 = from_str(de)?;
    DateTime::from_timestamp(secs, 0)
        .ok_or_else(|| D::Error::custom(format!("timestamp out of range: {secs}")))
}

/// Parse a scalar result that arrives as a decimal string.
pub(crate) fn parse_scalar<T>(raw: &str) -> chainscan_core::Result<T>
where
    T: FromStr,
    T::Err: Display,
{
    raw.trim()
        .parse()
        .map_err(|e| chainscan_core::ScanError::Api(format!("failed to parse result: {e}")))
}
