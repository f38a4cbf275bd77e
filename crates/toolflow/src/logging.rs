//! Tracing subscriber setup.

use crate::config::{ConfigError, LoggingConfig};
use tracing_subscriber::EnvFilter;

/// Environment variable whose filter directives take precedence over the
/// configured level.
pub const LOG_FILTER_ENV: &str = "TOOLFLOW_LOG";

/// Builds the filter: `TOOLFLOW_LOG` if set and valid, else the configured level.
pub fn env_filter(config: &LoggingConfig) -> Result<EnvFilter, ConfigError> {
    if let Ok(filter) = EnvFilter::try_from_env(LOG_FILTER_ENV) {
        return Ok(filter);
    }
    EnvFilter::try_new(&config.level).map_err(|e| ConfigError::Invalid(e.to_string()))
}

/// Installs a global fmt subscriber.
///
/// Returns `Ok(false)` if a global subscriber was already installed.
pub fn init(config: &LoggingConfig) -> Result<bool, ConfigError> {
    let filter = env_filter(config)?;
    let installed = tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_ansi(config.ansi)
        .try_init()
        .is_ok();
    Ok(installed)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_init_twice() {
        let config = LoggingConfig {
            level: "debug".to_string(),
            ansi: false,
        };
        // the first call may lose to another test in this binary
        init(&config).unwrap();
        assert!(!init(&config).unwrap());
    }

    #[test]
    fn test_env_filter_from_level() {
        let config = LoggingConfig::default();
        assert!(env_filter(&config).is_ok());
    }
}
