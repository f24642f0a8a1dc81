//! Storefront configuration.
//!
//! Values come from the process environment; see [`StorefrontConfig::from_env`].

use crate::session::AccessToken;
use crate::types::TransactionId;
use std::time::Duration;
use thiserror::Error;

/// Backend base URL; unset means the in-memory sample backend
pub const API_URL_VAR: &str = "STOREFRONT_API_URL";
/// Bearer token used by the demo binary
pub const API_TOKEN_VAR: &str = "STOREFRONT_API_TOKEN";
/// Per-request timeout in milliseconds
pub const FETCH_TIMEOUT_VAR: &str = "STOREFRONT_FETCH_TIMEOUT_MS";
/// Order the demo binary opens
pub const TRANSACTION_ID_VAR: &str = "STOREFRONT_TRANSACTION_ID";

/// Configuration errors
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum ConfigError {
    /// A variable is set to an unusable value
    #[error("Invalid {key}={value:?}: {reason}")]
    Invalid {
        /// Variable name
        key: &'static str,
        /// Value found
        value: String,
        /// What is wrong with it
        reason: String,
    },
}

/// Storefront configuration
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct StorefrontConfig {
    /// Backend base URL (e.g. `http://localhost:8000/api`)
    ///
    /// Default: none (in-memory sample orders)
    pub api_url: Option<String>,

    /// Bearer token for backend calls
    ///
    /// Default: none (demo signs in with a placeholder token)
    pub api_token: Option<AccessToken>,

    /// Per-request timeout
    ///
    /// Default: 10 seconds
    pub fetch_timeout: Duration,

    /// Order the demo binary opens
    ///
    /// Default: `TX1`
    pub transaction_id: TransactionId,
}

impl Default for StorefrontConfig {
    fn default() -> Self {
        Self {
            api_url: None,
            api_token: None,
            fetch_timeout: Duration::from_millis(10_000),
            transaction_id: TransactionId::new("TX1"),
        }
    }
}

impl StorefrontConfig {
    /// Reads configuration from the process environment
    ///
    /// # Errors
    ///
    /// Returns [`ConfigError::Invalid`] for an unparsable timeout, an empty
    /// transaction id or a URL without an `http(s)://` scheme.
    pub fn from_env() -> Result<Self, ConfigError> {
        Self::from_lookup(|key| std::env::var(key).ok())
    }

    /// Reads configuration through `lookup`
    ///
    /// Empty values count as unset, except for the transaction id.
    ///
    /// # Errors
    ///
    /// Same as [`StorefrontConfig::from_env`].
    pub fn from_lookup<F>(lookup: F) -> Result<Self, ConfigError>
    where
        F: Fn(&str) -> Option<String>,
    {
        let mut config = Self::default();
        let non_empty = |key: &str| lookup(key).filter(|v| !v.trim().is_empty());

        if let Some(url) = non_empty(API_URL_VAR) {
            if !(url.starts_with("http://") || url.starts_with("https://")) {
                return Err(ConfigError::Invalid {
                    key: API_URL_VAR,
                    value: url,
                    reason: "expected an http:// or https:// URL".to_string(),
                });
            }
            config.api_url = Some(url);
        }

        config.api_token = non_empty(API_TOKEN_VAR).map(AccessToken::new);

        if let Some(raw) = non_empty(FETCH_TIMEOUT_VAR) {
            let millis = raw.trim().parse::<u64>().map_err(|e| ConfigError::Invalid {
                key: FETCH_TIMEOUT_VAR,
                value: raw.clone(),
                reason: e.to_string(),
            })?;
            if millis == 0 {
                return Err(ConfigError::Invalid {
                    key: FETCH_TIMEOUT_VAR,
                    value: raw,
                    reason: "timeout must be positive".to_string(),
                });
            }
            config.fetch_timeout = Duration::from_millis(millis);
        }

        if let Some(id) = lookup(TRANSACTION_ID_VAR) {
            if id.trim().is_empty() {
                return Err(ConfigError::Invalid {
                    key: TRANSACTION_ID_VAR,
                    value: id,
                    reason: "transaction id must not be empty".to_string(),
                });
            }
            config.transaction_id = TransactionId::new(id.trim());
        }

        Ok(config)
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;
    use std::collections::HashMap;

    fn lookup(vars: &[(&str, &str)]) -> impl Fn(&str) -> Option<String> {
        let map: HashMap<String, String> = vars
            .iter()
            .map(|(k, v)| ((*k).to_string(), (*v).to_string()))
            .collect();
        move |key| map.get(key).cloned()
    }

    #[test]
    fn defaults_when_unset() {
        let config = StorefrontConfig::from_lookup(lookup(&[])).unwrap();
        assert_eq!(config, StorefrontConfig::default());
        assert_eq!(config.fetch_timeout, Duration::from_secs(10));
        assert_eq!(config.transaction_id, TransactionId::new("TX1"));
    }

    #[test]
    fn reads_every_variable() {
        let config = StorefrontConfig::from_lookup(lookup(&[
            (API_URL_VAR, "https://shop.example.com/api"),
            (API_TOKEN_VAR, "abc"),
            (FETCH_TIMEOUT_VAR, "2500"),
            (TRANSACTION_ID_VAR, " TX42 "),
        ]))
        .unwrap();

        assert_eq!(config.api_url.as_deref(), Some("https://shop.example.com/api"));
        assert_eq!(config.api_token, Some(AccessToken::new("abc")));
        assert_eq!(config.fetch_timeout, Duration::from_millis(2500));
        assert_eq!(config.transaction_id, TransactionId::new("TX42"));
    }

    #[test]
    fn rejects_bad_values() {
        let bad_timeout = StorefrontConfig::from_lookup(lookup(&[(FETCH_TIMEOUT_VAR, "soon")]));
        assert!(matches!(
            bad_timeout,
            Err(ConfigError::Invalid { key: FETCH_TIMEOUT_VAR, .. })
        ));

        let zero = StorefrontConfig::from_lookup(lookup(&[(FETCH_TIMEOUT_VAR, "0")]));
        assert!(zero.is_err());

        let url = StorefrontConfig::from_lookup(lookup(&[(API_URL_VAR, "localhost:8000")]));
        assert_eq!(
            url.unwrap_err().to_string(),
            r#"Invalid STOREFRONT_API_URL="localhost:8000": expected an http:// or https:// URL"#
        );

        let empty_id = StorefrontConfig::from_lookup(lookup(&[(TRANSACTION_ID_VAR, "  ")]));
        assert!(empty_id.is_err());
    }

    #[test]
    fn blank_optional_values_count_as_unset() {
        let config =
            StorefrontConfig::from_lookup(lookup(&[(API_URL_VAR, ""), (API_TOKEN_VAR, " ")])).unwrap();
        assert_eq!(config.api_url, None);
        assert_eq!(config.api_token, None);
    }
}
