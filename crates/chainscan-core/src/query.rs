//! Query-string composition.

use url::Url;

use crate::config::ApiKey;

/// Parameters the dispatcher always sets itself.
pub const RESERVED_KEYS: [&str; 3] = ["module", "action", "apikey"];

/// Ordered operation parameters for one request.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct QueryParams {
    pairs: Vec<(String, String)>,
}

impl QueryParams {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with(mut self, key: impl Into<String>, value: impl Into<String>) -> Self {
        self.push(key, value);
        self
    }

    pub fn push(&mut self, key: impl Into<String>, value: impl Into<String>) {
        self.pairs.push((key.into(), value.into()));
    }

    /// Push `key` only when `value` is present.
    pub fn push_opt<V: ToString>(&mut self, key: impl Into<String>, value: Option<V>) {
        if let Some(value) = value {
            self.push(key, value.to_string());
        }
    }

    pub fn get(&self, key: &str) -> Option<&str> {
        self.pairs
            .iter()
            .find(|(k, _)| k == key)
            .map(|(_, v)| v.as_str())
    }

    pub fn iter(&self) -> impl Iterator<Item = (&str, &str)> {
        self.pairs.iter().map(|(k, v)| (k.as_str(), v.as_str()))
    }

    pub fn len(&self) -> usize {
        self.pairs.len()
    }

    pub fn is_empty(&self) -> bool {
        self.pairs.is_empty()
    }
}

impl<K: Into<String>, V: Into<String>> FromIterator<(K, V)> for QueryParams {
    fn from_iter<I: IntoIterator<Item = (K, V)>>(iter: I) -> Self {
        let mut params = Self::new();
        for (k, v) in iter {
            params.push(k, v);
        }
        params
    }
}

pub(crate) fn is_reserved(key: &str) -> bool {
    RESERVED_KEYS.iter().any(|r| r.eq_ignore_ascii_case(key))
}

/// Build the request URL: base query, caller parameters, then the reserved ones.
///
/// Base-URL pairs and caller parameters that collide with a reserved key are
/// dropped, so each reserved key appears exactly once.
pub fn build_url(
    base: &Url,
    module: &str,
    action: &str,
    api_key: &ApiKey,
    params: &QueryParams,
) -> Url {
    let base_pairs: Vec<(String, String)> = base
        .query_pairs()
        .filter(|(key, _)| !is_reserved(key))
        .map(|(k, v)| (k.into_owned(), v.into_owned()))
        .collect();

    let mut url = base.clone();
    url.set_query(None);
    {
        let mut query = url.query_pairs_mut();
        for (key, value) in &base_pairs {
            query.append_pair(key, value);
        }
        for (key, value) in params.iter() {
            if is_reserved(key) {
                tracing::warn!(key, module, action, "dropping parameter that shadows a reserved key");
                continue;
            }
            query.append_pair(key, value);
        }
        query
            .append_pair("module", module)
            .append_pair("action", action)
            .append_pair("apikey", api_key.as_query_value());
    }
    url
}

#[cfg(test)]
mod tests {
    use super::*;

    fn base() -> Url {
        Url::parse("https://api.etherscan.io/api").unwrap()
    }

    fn pairs(url: &Url) -> Vec<(String, String)> {
        url.query_pairs()
            .map(|(k, v)| (k.into_owned(), v.into_owned()))
            .collect()
    }

    #[test]
    fn appends_reserved_after_caller_params() {
        let params = QueryParams::new().with("address", "0xabc").with("tag", "latest");
        let url = build_url(&base(), "account", "balance", &ApiKey::from("KEY"), &params);
        assert_eq!(
            pairs(&url),
            vec![
                ("address".to_string(), "0xabc".to_string()),
                ("tag".to_string(), "latest".to_string()),
                ("module".to_string(), "account".to_string()),
                ("action".to_string(), "balance".to_string()),
                ("apikey".to_string(), "KEY".to_string()),
            ]
        );
    }

    #[test]
    fn reserved_keys_win_over_caller_params() {
        let params: QueryParams = [("apikey", "stolen"), ("MODULE", "proxy"), ("action", "x"), ("page", "2")]
            .into_iter()
            .collect();
        let url = build_url(&base(), "stats", "ethsupply", &ApiKey::Unset, &params);
        let pairs = pairs(&url);

        assert_eq!(pairs.len(), 4);
        assert!(pairs.contains(&("page".into(), "2".into())));
        assert!(pairs.contains(&("module".into(), "stats".into())));
        assert!(pairs.contains(&("apikey".into(), "YourApiKeyToken".into())));
        assert!(!pairs.iter().any(|(_, v)| v == "stolen" || v == "proxy"));
    }

    #[test]
    fn reserved_keys_in_base_url_are_replaced() {
        let base = Url::parse("https://host/api?apikey=OLD&module=proxy&chainid=1").unwrap();
        let url = build_url(&base, "stats", "ethsupply", &ApiKey::from("NEW"), &QueryParams::new());
        assert_eq!(
            pairs(&url),
            vec![
                ("chainid".to_string(), "1".to_string()),
                ("module".to_string(), "stats".to_string()),
                ("action".to_string(), "ethsupply".to_string()),
                ("apikey".to_string(), "NEW".to_string()),
            ]
        );
    }

    #[test]
    fn values_are_percent_encoded() {
        let params = QueryParams::new().with("address", "0xa,0xb");
        let url = build_url(&base(), "account", "balancemulti", &ApiKey::Unset, &params);
        assert!(url.as_str().contains("address=0xa%2C0xb"));
    }

    #[test]
    fn push_opt_skips_none() {
        let mut params = QueryParams::new();
        params.push_opt("startblock", Some(10u64));
        params.push_opt::<u64>("endblock", None);
        assert_eq!(params.len(), 1);
        assert_eq!(params.get("startblock"), Some("10"));
        assert_eq!(params.get("endblock"), None);
    }
}
