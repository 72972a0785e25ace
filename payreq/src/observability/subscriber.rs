//! Global subscriber setup.

use crate::config::LoggingConfig;
use crate::errors::{PayreqError, Result};
use tracing_subscriber::layer::SubscriberExt;
use tracing_subscriber::util::SubscriberInitExt;
use tracing_subscriber::EnvFilter;

/// Builds the `EnvFilter` for `config`.
pub fn env_filter(config: &LoggingConfig) -> Result<EnvFilter> {
    EnvFilter::try_new(&config.filter).map_err(|e| {
        PayreqError::Config(format!("Invalid log filter '{}': {e}", config.filter))
    })
}

/// Installs the global tracing subscriber.
///
/// Fails if the filter directive does not parse or a global subscriber is
/// already installed.
pub fn init_tracing(config: &LoggingConfig) -> Result<()> {
    let filter = env_filter(config)?;
    let registry = tracing_subscriber::registry().with(filter);

    let installed = if config.json {
        registry
            .with(tracing_subscriber::fmt::layer().json().flatten_event(true))
            .try_init()
    } else {
        registry.with(tracing_subscriber::fmt::layer()).try_init()
    };
    installed.map_err(|e| PayreqError::Config(format!("Tracing already initialized: {e}")))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_env_filter_accepts_directives() {
        let config = LoggingConfig {
            filter: "payreq=debug,warn".to_string(),
            json: true,
        };
        assert!(env_filter(&config).is_ok());
    }

    #[test]
    fn test_env_filter_rejects_garbage() {
        let config = LoggingConfig {
            filter: "payreq=loud".to_string(),
            json: false,
        };
        let err = env_filter(&config).unwrap_err();
        assert_eq!(err.code(), crate::errors::codes::CONFIG);
    }
}
