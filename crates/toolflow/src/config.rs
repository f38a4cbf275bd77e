//! Engine configuration.
//!
//! Loaded from TOML, every field optional:
//!
//! ```toml
//! [retry]
//! max_attempts = 3
//! base_delay_ms = 100
//! max_delay_ms = 5000
//!
//! [logging]
//! level = "info"
//! ansi = true
//! ```

use serde::{Deserialize, Serialize};
use std::path::Path;
use std::time::Duration;
use thiserror::Error;
use toolflow_core::RetryConfig;

/// Overrides `retry.max_attempts`.
pub const ENV_MAX_ATTEMPTS: &str = "TOOLFLOW_MAX_ATTEMPTS";
/// Overrides `retry.base_delay_ms`.
pub const ENV_BASE_DELAY_MS: &str = "TOOLFLOW_BASE_DELAY_MS";
/// Overrides `retry.max_delay_ms`.
pub const ENV_MAX_DELAY_MS: &str = "TOOLFLOW_MAX_DELAY_MS";
/// Overrides `logging.level`.
pub const ENV_LOG_LEVEL: &str = "TOOLFLOW_LOG_LEVEL";

const LOG_LEVELS: [&str; 5] = ["trace", "debug", "info", "warn", "error"];

/// Errors raised while loading configuration.
#[derive(Error, Debug)]
#[non_exhaustive]
pub enum ConfigError {
    /// The configuration file does not exist.
    #[error("Config file not found: {0}")]
    NotFound(String),

    /// The configuration file exists but could not be read.
    #[error("Failed to read config file {path}: {source}")]
    Io {
        /// Path that was read.
        path: String,
        /// Underlying I/O failure.
        #[source]
        source: std::io::Error,
    },

    /// The configuration is not valid TOML or has the wrong shape.
    #[error("Config parse error: {0}")]
    Parse(String),

    /// A value is out of range.
    #[error("Invalid config: {0}")]
    Invalid(String),
}

/// Top-level engine configuration.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct EngineConfig {
    /// Backoff applied to steps with `retry: true`.
    #[serde(default)]
    pub retry: RetrySettings,
    /// Tracing subscriber settings.
    #[serde(default)]
    pub logging: LoggingConfig,
}

/// Retry settings as written in the config file.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct RetrySettings {
    /// Total attempts per retry-eligible step, including the first.
    #[serde(default = "default_max_attempts")]
    pub max_attempts: u32,
    /// Delay after the first failed attempt, in milliseconds.
    #[serde(default = "default_base_delay_ms")]
    pub base_delay_ms: u64,
    /// Upper bound on any single delay, in milliseconds.
    #[serde(default = "default_max_delay_ms")]
    pub max_delay_ms: u64,
}

impl Default for RetrySettings {
    fn default() -> Self {
        Self {
            max_attempts: default_max_attempts(),
            base_delay_ms: default_base_delay_ms(),
            max_delay_ms: default_max_delay_ms(),
        }
    }
}

fn default_max_attempts() -> u32 { 3 }
fn default_base_delay_ms() -> u64 { 100 }
fn default_max_delay_ms() -> u64 { 5000 }

/// Logging settings.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct LoggingConfig {
    /// Default level: `trace`, `debug`, `info`, `warn` or `error`.
    ///
    /// Per-target directives such as `toolflow=debug` go in the
    /// `TOOLFLOW_LOG` environment variable instead.
    #[serde(default = "default_log_level")]
    pub level: String,
    /// Colourise output.
    #[serde(default = "default_ansi")]
    pub ansi: bool,
}

impl Default for LoggingConfig {
    fn default() -> Self {
        Self {
            level: default_log_level(),
            ansi: default_ansi(),
        }
    }
}

fn default_log_level() -> String { "info".to_string() }
fn default_ansi() -> bool { true }

impl EngineConfig {
    /// Loads and validates a TOML file.
    pub fn load(path: &Path) -> Result<Self, ConfigError> {
        let content = std::fs::read_to_string(path).map_err(|e| match e.kind() {
            std::io::ErrorKind::NotFound => ConfigError::NotFound(path.display().to_string()),
            _ => ConfigError::Io {
                path: path.display().to_string(),
                source: e,
            },
        })?;
        Self::from_toml_str(&content)
    }

    /// Parses and validates TOML content.
    pub fn from_toml_str(content: &str) -> Result<Self, ConfigError> {
        let config: Self =
            toml::from_str(content).map_err(|e| ConfigError::Parse(e.to_string()))?;
        config.validate()?;
        Ok(config)
    }

    /// Applies `TOOLFLOW_*` environment variable overrides.
    pub fn apply_env_overrides(&mut self) -> Result<(), ConfigError> {
        self.apply_overrides_from(|key| std::env::var(key).ok())
    }

    /// Applies overrides from an arbitrary key lookup.
    ///
    /// All-or-nothing: on error `self` is left untouched.
    pub fn apply_overrides_from<F>(&mut self, lookup: F) -> Result<(), ConfigError>
    where
        F: Fn(&str) -> Option<String>,
    {
        let mut next = self.clone();
        if let Some(v) = lookup(ENV_MAX_ATTEMPTS) {
            next.retry.max_attempts = parse_number(ENV_MAX_ATTEMPTS, &v)?;
        }
        if let Some(v) = lookup(ENV_BASE_DELAY_MS) {
            next.retry.base_delay_ms = parse_number(ENV_BASE_DELAY_MS, &v)?;
        }
        if let Some(v) = lookup(ENV_MAX_DELAY_MS) {
            next.retry.max_delay_ms = parse_number(ENV_MAX_DELAY_MS, &v)?;
        }
        if let Some(v) = lookup(ENV_LOG_LEVEL) {
            next.logging.level = v.trim().to_ascii_lowercase();
        }
        next.validate()?;
        *self = next;
        Ok(())
    }

    /// Checks value ranges.
    pub fn validate(&self) -> Result<(), ConfigError> {
        self.retry_config()?;
        if !LOG_LEVELS.contains(&self.logging.level.as_str()) {
            return Err(ConfigError::Invalid(format!(
                "unknown log level '{}', expected one of {} (use TOOLFLOW_LOG for directives)",
                self.logging.level,
                LOG_LEVELS.join(", ")
            )));
        }
        Ok(())
    }

    /// Converts the retry settings into a validated [`RetryConfig`].
    pub fn retry_config(&self) -> Result<RetryConfig, ConfigError> {
        RetryConfig::new(
            self.retry.max_attempts,
            Duration::from_millis(self.retry.base_delay_ms),
            Duration::from_millis(self.retry.max_delay_ms),
        )
        .map_err(|e| ConfigError::Invalid(e.to_string()))
    }
}

fn parse_number<T: std::str::FromStr>(key: &str, value: &str) -> Result<T, ConfigError> {
    value
        .trim()
        .parse()
        .map_err(|_| ConfigError::Invalid(format!("{key} must be a number, got '{value}'")))
}
