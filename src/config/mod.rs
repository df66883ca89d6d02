//! Configuration module for gatewatch
//!
//! Provides layered configuration loading from files, environment variables, and defaults.
//!
//! # Configuration Precedence
//!
//! 1. CLI arguments (highest priority)
//! 2. Environment variables (`GATEWATCH_*`)
//! 3. Configuration file (TOML)
//! 4. Default values (lowest priority)
//!
//! # Example
//!
//! ```rust
//! use gatewatch::config::GatewatchConfig;
//!
//! // Load defaults
//! let config = GatewatchConfig::default();
//! assert_eq!(config.poll.interval_ms, 2000);
//!
//! // Parse from TOML
//! let toml = r#"
//! [api]
//! base_url = "http://gateway:8000"
//! "#;
//! let config: GatewatchConfig = toml::from_str(toml).unwrap();
//! assert_eq!(config.api.base_url, "http://gateway:8000");
//! ```

pub mod api;
pub mod error;
pub mod logging;
pub mod poll;

pub use api::ApiConfig;
pub use error::ConfigError;
pub use logging::{LogFormat, LoggingConfig};
pub use poll::{AuthFailurePolicy, PollConfig};

use serde::{Deserialize, Serialize};
use std::path::Path;

/// Unified configuration for the dashboard.
///
/// # Example
///
/// ```rust
/// use gatewatch::config::GatewatchConfig;
///
/// let config = GatewatchConfig::default();
/// assert_eq!(config.api.base_url, "http://localhost:8000");
/// assert_eq!(config.logging.level, "warn");
/// ```
#[derive(Debug, Clone, Serialize, Deserialize, Default)]
#[serde(default)]
pub struct GatewatchConfig {
    /// Gateway connection settings
    pub api: ApiConfig,
    /// Poll scheduler settings
    pub poll: PollConfig,
    /// Logging configuration
    pub logging: LoggingConfig,
}

impl GatewatchConfig {
    /// Load configuration from a TOML file
    ///
    /// If path is None, returns default configuration.
    /// If path doesn't exist, returns NotFound error.
    pub fn load(path: Option<&Path>) -> Result<Self, ConfigError> {
        match path {
            Some(p) => {
                if !p.exists() {
                    return Err(ConfigError::NotFound(p.to_path_buf()));
                }
                let content = std::fs::read_to_string(p)?;
                toml::from_str(&content).map_err(|e| ConfigError::Parse {
                    path: p.to_path_buf(),
                    message: e.to_string(),
                })
            }
            None => Ok(Self::default()),
        }
    }

    /// Apply environment variable overrides
    ///
    /// Supports GATEWATCH_* environment variables for common settings.
    /// Invalid values are silently ignored (defaults are kept).
    pub fn with_env_overrides(self) -> Self {
        self.with_overrides_from(|name| std::env::var(name).ok())
    }

    /// Apply GATEWATCH_* overrides read through `lookup` instead of the
    /// process environment.
    pub fn with_overrides_from(mut self, lookup: impl Fn(&str) -> Option<String>) -> Self {
        if let Some(url) = lookup("GATEWATCH_URL") {
            self.api.base_url = url;
        }
        if let Some(ms) = lookup("GATEWATCH_POLL_INTERVAL_MS").and_then(|v| v.parse().ok()) {
            self.poll.interval_ms = ms;
        }

        if let Some(level) = lookup("GATEWATCH_LOG_LEVEL") {
            self.logging.level = level;
        }
        if let Some(format) = lookup("GATEWATCH_LOG_FORMAT").and_then(|v| v.parse().ok()) {
            self.logging.format = format;
        }

        self
    }

    /// Validate configuration
    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.api.base_url.trim().is_empty() {
            return Err(ConfigError::Validation {
                field: "api.base_url".to_string(),
                message: "URL cannot be empty".to_string(),
            });
        }
        if let Err(e) = reqwest::Url::parse(&self.api.base_url) {
            return Err(ConfigError::Validation {
                field: "api.base_url".to_string(),
                message: e.to_string(),
            });
        }
        if self.api.timeout_seconds == 0 {
            return Err(ConfigError::Validation {
                field: "api.timeout_seconds".to_string(),
                message: "timeout must be non-zero".to_string(),
            });
        }
        if self.poll.interval_ms == 0 {
            return Err(ConfigError::Validation {
                field: "poll.interval_ms".to_string(),
                message: "interval must be non-zero".to_string(),
            });
        }

        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashMap;
    use std::path::Path;

    #[test]
    fn test_gatewatch_config_defaults() {
        let config = GatewatchConfig::default();
        assert_eq!(config.api.base_url, "http://localhost:8000");
        assert_eq!(config.poll.interval_ms, 2000);
        assert_eq!(config.poll.on_auth_failure, AuthFailurePolicy::KeepPolling);
        assert!(config.validate().is_ok());
    }

    #[test]
    fn test_config_parse_minimal_toml() {
        let toml = r#"
        [poll]
        interval_ms = 500
        "#;

        let config: GatewatchConfig = toml::from_str(toml).unwrap();
        assert_eq!(config.poll.interval_ms, 500);
        assert_eq!(config.api.base_url, "http://localhost:8000"); // Default
    }

    #[test]
    fn test_config_parse_full_toml() {
        let toml = include_str!("../../gatewatch.example.toml");
        let config: GatewatchConfig = toml::from_str(toml).unwrap();
        assert!(config.poll.interval_ms > 0);
        assert!(config.validate().is_ok());
    }

    #[test]
    fn test_config_load_from_file() {
        let temp = tempfile::NamedTempFile::new().unwrap();
        std::fs::write(
            temp.path(),
            "[api]\nbase_url = \"http://10.0.0.5:8000\"\ntimeout_seconds = 2",
        )
        .unwrap();

        let config = GatewatchConfig::load(Some(temp.path())).unwrap();
        assert_eq!(config.api.base_url, "http://10.0.0.5:8000");
        assert_eq!(config.api.timeout_seconds, 2);
    }

    #[test]
    fn test_config_load_invalid_toml() {
        let temp = tempfile::NamedTempFile::new().unwrap();
        std::fs::write(temp.path(), "[poll\ninterval_ms = ").unwrap();

        let err = GatewatchConfig::load(Some(temp.path())).unwrap_err();
        assert!(matches!(err, ConfigError::Parse { .. }));
        assert!(err
            .to_string()
            .contains(&temp.path().display().to_string()));
    }

    #[test]
    fn test_config_missing_file_error() {
        let result = GatewatchConfig::load(Some(Path::new("/nonexistent/gatewatch.toml")));
        assert!(matches!(result, Err(ConfigError::NotFound(_))));
    }

    #[test]
    fn test_config_load_none_returns_defaults() {
        let config = GatewatchConfig::load(None).unwrap();
        assert_eq!(config.poll.interval_ms, 2000);
    }

    fn env(vars: &[(&str, &str)]) -> impl Fn(&str) -> Option<String> {
        let vars: HashMap<String, String> = vars
            .iter()
            .map(|(k, v)| (k.to_string(), v.to_string()))
            .collect();
        move |name| vars.get(name).cloned()
    }

    #[test]
    fn test_config_env_override_url() {
        let config = GatewatchConfig::default()
            .with_overrides_from(env(&[("GATEWATCH_URL", "http://gateway.internal:9000")]));

        assert_eq!(config.api.base_url, "http://gateway.internal:9000");
    }

    #[test]
    fn test_config_env_override_interval() {
        let config = GatewatchConfig::default()
            .with_overrides_from(env(&[("GATEWATCH_POLL_INTERVAL_MS", "750")]));
        assert_eq!(config.poll.interval_ms, 750);

        // Invalid value keeps default
        let config = GatewatchConfig::default()
            .with_overrides_from(env(&[("GATEWATCH_POLL_INTERVAL_MS", "soon")]));
        assert_eq!(config.poll.interval_ms, 2000);
    }

    #[test]
    fn test_config_env_override_log_level() {
        let config = GatewatchConfig::default()
            .with_overrides_from(env(&[("GATEWATCH_LOG_LEVEL", "debug")]));

        assert_eq!(config.logging.level, "debug");
    }

    #[test]
    fn test_config_env_override_log_format() {
        let config = GatewatchConfig::default()
            .with_overrides_from(env(&[("GATEWATCH_LOG_FORMAT", "json")]));
        assert_eq!(config.logging.format, LogFormat::Json);

        let config = GatewatchConfig::default()
            .with_overrides_from(env(&[("GATEWATCH_LOG_FORMAT", "xml")]));
        assert_eq!(config.logging.format, LogFormat::Pretty);
    }

    #[test]
    fn test_config_no_overrides_keeps_file_values() {
        let mut config = GatewatchConfig::default();
        config.poll.interval_ms = 500;

        let config = config.with_overrides_from(env(&[]));
        assert_eq!(config.poll.interval_ms, 500);
        assert_eq!(config.api.base_url, "http://localhost:8000");
    }

    #[test]
    fn test_config_validation_empty_url() {
        let mut config = GatewatchConfig::default();
        config.api.base_url = "  ".to_string();

        let result = config.validate();
        assert!(matches!(
            result,
            Err(ConfigError::Validation { ref field, .. }) if field == "api.base_url"
        ));
    }

    #[test]
    fn test_config_validation_unparseable_url() {
        let mut config = GatewatchConfig::default();
        config.api.base_url = "gateway-without-scheme".to_string();

        assert!(matches!(
            config.validate(),
            Err(ConfigError::Validation { ref field, .. }) if field == "api.base_url"
        ));
    }

    #[test]
    fn test_config_validation_zero_interval() {
        let mut config = GatewatchConfig::default();
        config.poll.interval_ms = 0;

        assert!(matches!(
            config.validate(),
            Err(ConfigError::Validation { ref field, .. }) if field == "poll.interval_ms"
        ));
    }

    #[test]
    fn test_config_validation_zero_timeout() {
        let mut config = GatewatchConfig::default();
        config.api.timeout_seconds = 0;

        assert!(matches!(
            config.validate(),
            Err(ConfigError::Validation { ref field, .. }) if field == "api.timeout_seconds"
        ));
    }
}
