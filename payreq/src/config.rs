//! Configuration types for request construction.
//!
//! [`SiteConfig`] describes the site a request is issued on behalf of; the
//! validators use it for same-origin redirect checks and supported currency
//! lookups. [`LoggingConfig`] feeds [`crate::observability::init_tracing`].

use crate::errors::{PayreqError, Result};
use serde::{Deserialize, Serialize};
use std::collections::BTreeSet;
use std::path::Path;

/// Environment variable overriding the site URL.
pub const ENV_SITE_URL: &str = "PAYREQ_SITE_URL";
/// Environment variable overriding the log filter directive.
pub const ENV_LOG: &str = "PAYREQ_LOG";
/// Environment variable toggling JSON log output.
pub const ENV_LOG_JSON: &str = "PAYREQ_LOG_JSON";
/// Environment variable toggling dev mode.
pub const ENV_DEV_MODE: &str = "PAYREQ_DEV_MODE";
/// Environment variable toggling test mode.
pub const ENV_TEST_MODE: &str = "PAYREQ_TEST_MODE";

/// Site the requests are built for.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SiteConfig {
    /// Home URL of the site; its origin is the only accepted redirect origin.
    #[serde(default = "default_home_url")]
    pub home_url: String,
    /// Upper-case ISO 4217 codes the account can charge in.
    #[serde(default = "default_currencies")]
    pub supported_currencies: BTreeSet<String>,
    /// Whether the site runs in developer mode.
    #[serde(default)]
    pub dev_mode: bool,
    /// Whether the account is in test mode.
    #[serde(default)]
    pub test_mode: bool,
}

fn default_home_url() -> String {
    "http://localhost".to_string()
}

fn default_currencies() -> BTreeSet<String> {
    ["USD", "EUR", "GBP", "CAD", "AUD", "JPY"]
        .into_iter()
        .map(String::from)
        .collect()
}

impl Default for SiteConfig {
    fn default() -> Self {
        Self {
            home_url: default_home_url(),
            supported_currencies: default_currencies(),
            dev_mode: false,
            test_mode: false,
        }
    }
}

impl SiteConfig {
    /// Creates a site configuration for the given home URL.
    #[must_use]
    pub fn new(home_url: impl Into<String>) -> Self {
        Self {
            home_url: home_url.into(),
            ..Self::default()
        }
    }

    /// Replaces the supported currency set.
    #[must_use]
    pub fn with_currencies<I, S>(mut self, currencies: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: AsRef<str>,
    {
        self.supported_currencies = currencies
            .into_iter()
            .map(|c| c.as_ref().to_ascii_uppercase())
            .collect();
        self
    }

    /// Sets dev mode.
    #[must_use]
    pub fn with_dev_mode(mut self, dev_mode: bool) -> Self {
        self.dev_mode = dev_mode;
        self
    }

    /// Sets test mode.
    #[must_use]
    pub fn with_test_mode(mut self, test_mode: bool) -> Self {
        self.test_mode = test_mode;
        self
    }

    /// Returns true if the currency is supported (case-insensitive).
    #[must_use]
    pub fn supports_currency(&self, code: &str) -> bool {
        self.supported_currencies
            .contains(&code.to_ascii_uppercase())
    }
}

/// Logging configuration.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct LoggingConfig {
    /// `tracing_subscriber::EnvFilter` directive.
    #[serde(default = "default_filter")]
    pub filter: String,
    /// Emit JSON lines instead of the human-readable format.
    #[serde(default)]
    pub json: bool,
}

fn default_filter() -> String {
    "payreq=info".to_string()
}

impl Default for LoggingConfig {
    fn default() -> Self {
        Self {
            filter: default_filter(),
            json: false,
        }
    }
}

/// Top-level configuration.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct PayreqConfig {
    /// Site settings.
    #[serde(default)]
    pub site: SiteConfig,
    /// Logging settings.
    #[serde(default)]
    pub logging: LoggingConfig,
}

impl PayreqConfig {
    /// Parses configuration from a JSON document. Missing fields take defaults.
    pub fn from_json_str(json: &str) -> Result<Self> {
        serde_json::from_str(json).map_err(|e| PayreqError::Config(e.to_string()))
    }

    /// Reads configuration from a JSON file.
    pub fn from_file(path: impl AsRef<Path>) -> Result<Self> {
        let contents = std::fs::read_to_string(path)?;
        Self::from_json_str(&contents)
    }

    /// Applies overrides from the process environment.
    #[must_use]
    pub fn with_env_overrides(self) -> Self {
        self.with_overrides(|key| std::env::var(key).ok())
    }

    /// Applies overrides from an arbitrary lookup, keyed by the `ENV_*` names.
    #[must_use]
    pub fn with_overrides<F>(mut self, lookup: F) -> Self
    where
        F: Fn(&str) -> Option<String>,
    {
        if let Some(url) = lookup(ENV_SITE_URL) {
            self.site.home_url = url;
        }
        if let Some(filter) = lookup(ENV_LOG) {
            self.logging.filter = filter;
        }
        if let Some(json) = lookup(ENV_LOG_JSON) {
            self.logging.json = parse_flag(&json);
        }
        if let Some(dev) = lookup(ENV_DEV_MODE) {
            self.site.dev_mode = parse_flag(&dev);
        }
        if let Some(test) = lookup(ENV_TEST_MODE) {
            self.site.test_mode = parse_flag(&test);
        }
        self
    }
}

fn parse_flag(value: &str) -> bool {
    matches!(
        value.trim().to_ascii_lowercase().as_str(),
        "1" | "true" | "yes" | "on"
    )
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashMap;
    use std::io::Write;

    #[test]
    fn test_defaults_from_empty_json() {
        let config = PayreqConfig::from_json_str("{}").unwrap();
        assert_eq!(config, PayreqConfig::default());
        assert!(config.site.supports_currency("usd"));
    }

    #[test]
    fn test_partial_json() {
        let config = PayreqConfig::from_json_str(
            r#"{"site": {"home_url": "https://shop.example", "supported_currencies": ["EUR"]}}"#,
        )
        .unwrap();

        assert_eq!(config.site.home_url, "https://shop.example");
        assert!(config.site.supports_currency("EUR"));
        assert!(!config.site.supports_currency("USD"));
        assert_eq!(config.logging.filter, "payreq=info");
    }

    #[test]
    fn test_invalid_json_is_config_error() {
        let err = PayreqConfig::from_json_str("{not json").unwrap_err();
        assert!(matches!(err, PayreqError::Config(_)));
    }

    #[test]
    fn test_from_file() {
        let mut file = tempfile::NamedTempFile::new().unwrap();
        write!(file, r#"{{"logging": {{"json": true}}}}"#).unwrap();

        let config = PayreqConfig::from_file(file.path()).unwrap();
        assert!(config.logging.json);
    }

    #[test]
    fn test_overrides() {
        let env: HashMap<&str, &str> = [
            (ENV_SITE_URL, "https://store.example"),
            (ENV_DEV_MODE, "yes"),
            (ENV_LOG, "payreq=debug"),
        ]
        .into_iter()
        .collect();

        let config = PayreqConfig::default()
            .with_overrides(|key| env.get(key).map(|v| (*v).to_string()));

        assert_eq!(config.site.home_url, "https://store.example");
        assert!(config.site.dev_mode);
        assert!(!config.site.test_mode);
        assert_eq!(config.logging.filter, "payreq=debug");
    }

    #[test]
    fn test_with_currencies_uppercases() {
        let site = SiteConfig::new("https://a.example").with_currencies(["eur", "chf"]);
        assert!(site.supports_currency("CHF"));
        assert_eq!(site.supported_currencies.len(), 2);
    }
}
