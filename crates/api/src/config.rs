//! Server configuration

use alerting::ENV_PREFIX;
use config::{Config, ConfigError, Environment};
use serde::Deserialize;
use std::str::FromStr;
use tracing::Level;

/// HTTP server and logging configuration
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
#[serde(default)]
pub struct ServerConfig {
    /// Listen address (default: 0.0.0.0:8080)
    pub bind_addr: String,
    /// Max tracing level (default: info)
    pub log_level: String,
    /// Emit logs as JSON lines
    pub log_json: bool,
    /// Install the Prometheus recorder and serve `/metrics`
    pub metrics_enabled: bool,
}

impl Default for ServerConfig {
    fn default() -> Self {
        Self {
            bind_addr: "0.0.0.0:8080".to_string(),
            log_level: "info".to_string(),
            log_json: false,
            metrics_enabled: true,
        }
    }
}

impl ServerConfig {
    /// Load from `MIDNIGHT_*` environment variables
    pub fn from_env() -> Result<Self, ConfigError> {
        Self::from_source(Environment::with_prefix(ENV_PREFIX))
    }

    /// Load from an environment source; unset or empty keys keep their defaults
    pub fn from_source(env: Environment) -> Result<Self, ConfigError> {
        let config: ServerConfig = Config::builder()
            .add_source(env.try_parsing(true).ignore_empty(true))
            .build()?
            .try_deserialize()?;
        config.max_level()?;
        Ok(config)
    }

    /// Parsed tracing level
    pub fn max_level(&self) -> Result<Level, ConfigError> {
        Level::from_str(&self.log_level).map_err(|_| {
            ConfigError::Message(format!("invalid log_level {:?}", self.log_level))
        })
    }
}
