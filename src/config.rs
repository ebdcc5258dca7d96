//! Configuration from environment variables

use crate::stream_core::SortKey;
use std::env;

pub const DEFAULT_LEDGER_API_URL: &str = "https://fullnode.testnet.aptoslabs.com/v1";

#[derive(Debug)]
pub enum ConfigError {
    MissingVariable(String),
    InvalidValue(String),
}

impl std::fmt::Display for ConfigError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            ConfigError::MissingVariable(var) => write!(f, "Missing environment variable: {}", var),
            ConfigError::InvalidValue(msg) => write!(f, "Invalid configuration value: {}", msg),
        }
    }
}

impl std::error::Error for ConfigError {}

/// Ledger endpoint and streaming module coordinates
#[derive(Debug, Clone)]
pub struct LedgerConfig {
    pub api_url: String,
    pub module_address: String,
    pub module_name: String,
    /// Account holding the module event store; required for stream history
    pub resource_account: Option<String>,
    pub request_timeout_secs: u64,
}

#[derive(Debug, Clone)]
pub struct Config {
    pub ledger: LedgerConfig,
    /// Account whose streams the monitor follows
    pub account_address: Option<String>,
    /// How often the stream book is refetched from the ledger
    pub fetch_interval_secs: u64,
    /// How often the cached book is re-evaluated against the clock
    pub refresh_interval_ms: u64,
    pub sort_key: SortKey,
    pub currency_symbol: String,
    /// Default log filter when `RUST_LOG` is not set
    pub rust_log: String,
}

impl Config {
    /// Load configuration from environment variables
    ///
    /// Environment variables:
    /// - `LEDGER_API_URL` (default: Aptos testnet fullnode)
    /// - `MODULE_ADDRESS` (required)
    /// - `MODULE_NAME` (required)
    /// - `RESOURCE_ACCOUNT_ADDRESS` (optional)
    /// - `ACCOUNT_ADDRESS` (optional)
    /// - `FETCH_INTERVAL_SECS` (default: 30)
    /// - `REFRESH_INTERVAL_MS` (default: 1000)
    /// - `REQUEST_TIMEOUT_SECS` (default: 10)
    /// - `SORT_KEY` (default: "Most Recent")
    /// - `CURRENCY_SYMBOL` (default: APT)
    /// - `RUST_LOG` (default: info)
    pub fn from_env() -> Result<Self, ConfigError> {
        Self::from_lookup(|key| env::var(key).ok())
    }

    /// Load configuration through an arbitrary variable lookup
    pub fn from_lookup<F>(lookup: F) -> Result<Self, ConfigError>
    where
        F: Fn(&str) -> Option<String>,
    {
        let api_url = lookup("LEDGER_API_URL")
            .unwrap_or_else(|| DEFAULT_LEDGER_API_URL.to_string())
            .trim_end_matches('/')
            .to_string();

        if !api_url.starts_with("http://") && !api_url.starts_with("https://") {
            return Err(ConfigError::InvalidValue(
                "LEDGER_API_URL must start with http:// or https://".to_string(),
            ));
        }

        let module_address = required(&lookup, "MODULE_ADDRESS")?;
        let module_name = required(&lookup, "MODULE_NAME")?;

        let ledger = LedgerConfig {
            api_url,
            module_address,
            module_name,
            resource_account: optional(&lookup, "RESOURCE_ACCOUNT_ADDRESS"),
            request_timeout_secs: parsed(&lookup, "REQUEST_TIMEOUT_SECS", 10)?,
        };

        let fetch_interval_secs = parsed(&lookup, "FETCH_INTERVAL_SECS", 30)?;
        let refresh_interval_ms = parsed(&lookup, "REFRESH_INTERVAL_MS", 1_000)?;
        if fetch_interval_secs == 0 || refresh_interval_ms == 0 {
            return Err(ConfigError::InvalidValue(
                "FETCH_INTERVAL_SECS and REFRESH_INTERVAL_MS must be > 0".to_string(),
            ));
        }

        let sort_key = lookup("SORT_KEY")
            .map(|s| SortKey::parse_or_default(s.trim()))
            .unwrap_or_default();

        Ok(Self {
            ledger,
            account_address: optional(&lookup, "ACCOUNT_ADDRESS"),
            fetch_interval_secs,
            refresh_interval_ms,
            sort_key,
            currency_symbol: lookup("CURRENCY_SYMBOL").unwrap_or_else(|| "APT".to_string()),
            rust_log: lookup("RUST_LOG").unwrap_or_else(|| "info".to_string()),
        })
    }
}

fn required<F>(lookup: &F, key: &str) -> Result<String, ConfigError>
where
    F: Fn(&str) -> Option<String>,
{
    optional(lookup, key).ok_or_else(|| ConfigError::MissingVariable(key.to_string()))
}

fn optional<F>(lookup: &F, key: &str) -> Option<String>
where
    F: Fn(&str) -> Option<String>,
{
    lookup(key)
        .map(|s| s.trim().to_string())
        .filter(|s| !s.is_empty())
}

fn parsed<F, T>(lookup: &F, key: &str, default: T) -> Result<T, ConfigError>
where
    F: Fn(&str) -> Option<String>,
    T: std::str::FromStr,
{
    match lookup(key) {
        Some(raw) => raw
            .trim()
            .parse()
            .map_err(|_| ConfigError::InvalidValue(format!("{}={}", key, raw))),
        None => Ok(default),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashMap;

    fn lookup_from(pairs: &[(&str, &str)]) -> impl Fn(&str) -> Option<String> {
        let vars: HashMap<String, String> = pairs
            .iter()
            .map(|(k, v)| (k.to_string(), v.to_string()))
            .collect();
        move |key| vars.get(key).cloned()
    }

    #[test]
    fn test_default_config() {
        let config = Config::from_lookup(lookup_from(&[
            ("MODULE_ADDRESS", "0xmod"),
            ("MODULE_NAME", "payments"),
        ]))
        .unwrap();

        assert_eq!(config.ledger.api_url, DEFAULT_LEDGER_API_URL);
        assert_eq!(config.ledger.resource_account, None);
        assert_eq!(config.ledger.request_timeout_secs, 10);
        assert_eq!(config.account_address, None);
        assert_eq!(config.fetch_interval_secs, 30);
        assert_eq!(config.refresh_interval_ms, 1_000);
        assert_eq!(config.sort_key, SortKey::MostRecent);
        assert_eq!(config.currency_symbol, "APT");
        assert_eq!(config.rust_log, "info");
    }

    #[test]
    fn test_custom_config() {
        let config = Config::from_lookup(lookup_from(&[
            ("LEDGER_API_URL", "http://localhost:8080/v1/"),
            ("MODULE_ADDRESS", "0xmod"),
            ("MODULE_NAME", "payments"),
            ("RESOURCE_ACCOUNT_ADDRESS", "0xres"),
            ("ACCOUNT_ADDRESS", " 0xalice "),
            ("FETCH_INTERVAL_SECS", "5"),
            ("REFRESH_INTERVAL_MS", "250"),
            ("SORT_KEY", "Oldest"),
            ("RUST_LOG", "streampay=debug"),
        ]))
        .unwrap();

        assert_eq!(config.ledger.api_url, "http://localhost:8080/v1");
        assert_eq!(config.ledger.resource_account.as_deref(), Some("0xres"));
        assert_eq!(config.account_address.as_deref(), Some("0xalice"));
        assert_eq!(config.fetch_interval_secs, 5);
        assert_eq!(config.refresh_interval_ms, 250);
        assert_eq!(config.sort_key, SortKey::Oldest);
        assert_eq!(config.rust_log, "streampay=debug");
    }

    #[test]
    fn test_missing_module() {
        let err = Config::from_lookup(lookup_from(&[("MODULE_NAME", "payments")])).unwrap_err();
        assert!(matches!(err, ConfigError::MissingVariable(ref v) if v == "MODULE_ADDRESS"));
    }

    #[test]
    fn test_invalid_values() {
        let bad_url = Config::from_lookup(lookup_from(&[
            ("LEDGER_API_URL", "ftp://ledger"),
            ("MODULE_ADDRESS", "0xmod"),
            ("MODULE_NAME", "payments"),
        ]));
        assert!(matches!(bad_url, Err(ConfigError::InvalidValue(_))));

        let bad_interval = Config::from_lookup(lookup_from(&[
            ("MODULE_ADDRESS", "0xmod"),
            ("MODULE_NAME", "payments"),
            ("REFRESH_INTERVAL_MS", "soon"),
        ]));
        assert!(matches!(bad_interval, Err(ConfigError::InvalidValue(_))));
    }

    #[test]
    fn test_unknown_sort_key_falls_back() {
        let config = Config::from_lookup(lookup_from(&[
            ("MODULE_ADDRESS", "0xmod"),
            ("MODULE_NAME", "payments"),
            ("SORT_KEY", "Alphabetical"),
        ]))
        .unwrap();
        assert_eq!(config.sort_key, SortKey::MostRecent);
    }
}
