//! Client configuration.

use std::time::Duration;

use serde::{Deserialize, Serialize};
use url::Url;

use crate::error::{Result, ScanError};

/// Default Etherscan API endpoint.
pub const DEFAULT_BASE_URL: &str = "https://api.etherscan.io/api";

/// The key Etherscan documents for anonymous use. Sent on the wire when no
/// key is configured.
pub const PLACEHOLDER_API_KEY: &str = "YourApiKeyToken";

/// An API key, or the "no key" sentinel.
///
/// Empty keys and the documented placeholder both parse to [`ApiKey::Unset`].
/// `Debug` never prints the key itself.
#[derive(Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(from = "String", into = "String")]
pub enum ApiKey {
    #[default]
    Unset,
    Key(String),
}

impl ApiKey {
    /// Returns `true` for a real (non-placeholder) key.
    pub fn is_set(&self) -> bool {
        matches!(self, Self::Key(_))
    }

    /// The value sent as the `apikey` query parameter.
    pub fn as_query_value(&self) -> &str {
        match self {
            Self::Unset => PLACEHOLDER_API_KEY,
            Self::Key(k) => k,
        }
    }
}

impl From<&str> for ApiKey {
    fn from(raw: &str) -> Self {
        let key = raw.trim();
        if key.is_empty() || key == PLACEHOLDER_API_KEY {
            Self::Unset
        } else {
            Self::Key(key.to_string())
        }
    }
}

impl From<String> for ApiKey {
    fn from(raw: String) -> Self {
        Self::from(raw.as_str())
    }
}

impl From<ApiKey> for String {
    fn from(key: ApiKey) -> Self {
        match key {
            ApiKey::Unset => String::new(),
            ApiKey::Key(k) => k,
        }
    }
}

impl std::fmt::Debug for ApiKey {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Unset => write!(f, "ApiKey::Unset"),
            Self::Key(_) => write!(f, "ApiKey::Key(****)"),
        }
    }
}

/// Configuration for a client instance. Fixed once the client is built.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ClientConfig {
    /// API key; [`ApiKey::Unset`] selects the anonymous tier.
    #[serde(default)]
    pub api_key: ApiKey,
    /// Endpoint every request is sent to.
    #[serde(default = "default_base_url")]
    pub base_url: Url,
    /// Upper bound on a single HTTP call (milliseconds).
    #[serde(default = "default_request_timeout_ms")]
    pub request_timeout_ms: u64,
    /// Serialize and space requests according to the key's tier.
    #[serde(default = "default_pacing")]
    pub pacing: bool,
}

fn default_base_url() -> Url {
    Url::parse(DEFAULT_BASE_URL).expect("default base URL is valid")
}

fn default_request_timeout_ms() -> u64 {
    30_000
}

fn default_pacing() -> bool {
    true
}

impl Default for ClientConfig {
    fn default() -> Self {
        Self {
            api_key: ApiKey::Unset,
            base_url: default_base_url(),
            request_timeout_ms: default_request_timeout_ms(),
            pacing: default_pacing(),
        }
    }
}

impl ClientConfig {
    /// Default configuration with the given key.
    pub fn new(api_key: impl Into<ApiKey>) -> Self {
        Self {
            api_key: api_key.into(),
            ..Self::default()
        }
    }

    pub fn with_base_url(mut self, base_url: Url) -> Self {
        self.base_url = base_url;
        self
    }

    pub fn with_timeout(mut self, timeout: Duration) -> Self {
        self.request_timeout_ms = timeout.as_millis() as u64;
        self
    }

    pub fn with_pacing(mut self, pacing: bool) -> Self {
        self.pacing = pacing;
        self
    }

    pub fn request_timeout(&self) -> Duration {
        Duration::from_millis(self.request_timeout_ms)
    }

    /// Build a configuration from `ETHERSCAN_*` environment variables.
    ///
    /// | Variable                 | Field                |
    /// |--------------------------|----------------------|
    /// | `ETHERSCAN_API_KEY`      | `api_key`            |
    /// | `ETHERSCAN_BASE_URL`     | `base_url`           |
    /// | `ETHERSCAN_TIMEOUT_SECS` | `request_timeout_ms` |
    /// | `ETHERSCAN_PACING`       | `pacing`             |
    pub fn from_env() -> Result<Self> {
        Self::from_lookup(|name| std::env::var(name).ok())
    }

    fn from_lookup(lookup: impl Fn(&str) -> Option<String>) -> Result<Self> {
        let mut config = Self::default();

        if let Some(key) = lookup("ETHERSCAN_API_KEY") {
            config.api_key = ApiKey::from(key);
        }
        if let Some(raw) = lookup("ETHERSCAN_BASE_URL") {
            config.base_url = Url::parse(raw.trim())
                .map_err(|e| ScanError::Config(format!("ETHERSCAN_BASE_URL: {e}")))?;
        }
        if let Some(raw) = lookup("ETHERSCAN_TIMEOUT_SECS") {
            let secs: u64 = raw
                .trim()
                .parse()
                .map_err(|e| ScanError::Config(format!("ETHERSCAN_TIMEOUT_SECS: {e}")))?;
            config.request_timeout_ms = secs.saturating_mul(1000);
        }
        if let Some(raw) = lookup("ETHERSCAN_PACING") {
            config.pacing = parse_flag(&raw)
                .ok_or_else(|| ScanError::Config(format!("ETHERSCAN_PACING: not a boolean: {raw}")))?;
        }

        config.validate()?;
        Ok(config)
    }

    /// Reject configurations no request could be built from.
    pub fn validate(&self) -> Result<()> {
        if self.base_url.cannot_be_a_base() {
            return Err(ScanError::Config(format!(
                "base URL cannot carry a query: {}",
                self.base_url
            )));
        }
        if !matches!(self.base_url.scheme(), "http" | "https") {
            return Err(ScanError::Config(format!(
                "unsupported base URL scheme: {}",
                self.base_url.scheme()
            )));
        }
        if self.request_timeout_ms == 0 {
            return Err(ScanError::Config("request timeout must be non-zero".into()));
        }
        Ok(())
    }
}

fn parse_flag(raw: &str) -> Option<bool> {
    match raw.trim().to_ascii_lowercase().as_str() {
        "1" | "true" | "yes" | "on" => Some(true),
        "0" | "false" | "no" | "off" => Some(false),
        _ => None,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashMap;

    fn lookup_from(vars: &[(&str, &str)]) -> impl Fn(&str) -> Option<String> {
        let map: HashMap<String, String> = vars
            .iter()
            .map(|(k, v)| (k.to_string(), v.to_string()))
            .collect();
        move |name| map.get(name).cloned()
    }

    #[test]
    fn placeholder_and_empty_keys_are_unset() {
        assert_eq!(ApiKey::from(""), ApiKey::Unset);
        assert_eq!(ApiKey::from("   "), ApiKey::Unset);
        assert_eq!(ApiKey::from(PLACEHOLDER_API_KEY), ApiKey::Unset);
        assert_eq!(ApiKey::from("  ABC123 "), ApiKey::Key("ABC123".into()));
    }

    #[test]
    fn unset_key_sends_placeholder() {
        assert_eq!(ApiKey::Unset.as_query_value(), PLACEHOLDER_API_KEY);
        assert_eq!(ApiKey::from("k").as_query_value(), "k");
    }

    #[test]
    fn debug_redacts_key() {
        let dbg = format!("{:?}", ApiKey::from("SECRET"));
        assert!(!dbg.contains("SECRET"));
    }

    #[test]
    fn defaults() {
        let config = ClientConfig::default();
        assert_eq!(config.base_url.as_str(), DEFAULT_BASE_URL);
        assert_eq!(config.request_timeout(), Duration::from_secs(30));
        assert!(config.pacing);
        assert!(config.validate().is_ok());
    }

    #[test]
    fn from_lookup_reads_all_fields() {
        let config = ClientConfig::from_lookup(lookup_from(&[
            ("ETHERSCAN_API_KEY", "KEY"),
            ("ETHERSCAN_BASE_URL", "https://api-sepolia.etherscan.io/api"),
            ("ETHERSCAN_TIMEOUT_SECS", "5"),
            ("ETHERSCAN_PACING", "off"),
        ]))
        .unwrap();
        assert!(config.api_key.is_set());
        assert_eq!(config.base_url.host_str(), Some("api-sepolia.etherscan.io"));
        assert_eq!(config.request_timeout(), Duration::from_secs(5));
        assert!(!config.pacing);
    }

    #[test]
    fn from_lookup_rejects_bad_flag() {
        let err = ClientConfig::from_lookup(lookup_from(&[("ETHERSCAN_PACING", "maybe")]))
            .unwrap_err();
        assert!(matches!(err, ScanError::Config(_)));
    }

    #[test]
    fn validate_rejects_non_http_base() {
        let config = ClientConfig::default().with_base_url(Url::parse("data:text/plain,x").unwrap());
        assert!(config.validate().is_err());
        let config = ClientConfig::default().with_base_url(Url::parse("ftp://example.com/api").unwrap());
        assert!(config.validate().is_err());
    }

    #[test]
    fn deserializes_with_defaults() {
        let config: ClientConfig = serde_json::from_str(r#"{"api_key": "abc"}"#).unwrap();
        assert_eq!(config.api_key, ApiKey::Key("abc".into()));
        assert!(config.pacing);
        assert_eq!(config.request_timeout_ms, 30_000);
    }
}
