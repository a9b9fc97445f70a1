//! ClawViz configuration management

use crate::error::{Error, Result};
use serde::{Deserialize, Serialize};
use std::path::Path;
use std::time::Duration;

/// Default OpenClaw Gateway URL
pub const DEFAULT_GATEWAY_URL: &str = "http://localhost:18789";

/// Main ClawViz configuration
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct ClawVizConfig {
    /// HTTP server configuration
    #[serde(default)]
    pub server: ServerConfig,

    /// OpenClaw Gateway integration configuration
    #[serde(default)]
    pub integration: IntegrationConfig,
}

impl ClawVizConfig {
    /// Load configuration from a TOML file
    pub fn load(path: &Path) -> Result<Self> {
        let content = std::fs::read_to_string(path)?;
        let config: Self = toml::from_str(&content)
            .map_err(|e| Error::Config(format!("{}: {}", path.display(), e)))?;
        config.validate()?;
        Ok(config)
    }

    /// Render the configuration as TOML
    pub fn to_toml(&self) -> Result<String> {
        toml::to_string_pretty(self).map_err(|e| Error::Config(e.to_string()))
    }

    /// Check value ranges that serde cannot express
    pub fn validate(&self) -> Result<()> {
        self.integration.validate()
    }
}

/// HTTP server configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct ServerConfig {
    /// Host to bind to
    pub host: String,

    /// Port to listen on
    pub port: u16,
}

impl Default for ServerConfig {
    fn default() -> Self {
        Self {
            host: "127.0.0.1".to_string(),
            port: 8000,
        }
    }
}

/// OpenClaw Gateway integration configuration
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct IntegrationConfig {
    /// Gateway base URL
    pub gateway_url: String,

    /// Seconds between poll ticks
    pub poll_interval: f64,

    /// Bearer token sent to the gateway
    #[serde(skip_serializing_if = "Option::is_none")]
    pub api_key: Option<String>,

    /// Per-request HTTP timeout in seconds
    pub timeout: f64,
}

impl Default for IntegrationConfig {
    fn default() -> Self {
        Self {
            gateway_url: DEFAULT_GATEWAY_URL.to_string(),
            poll_interval: 5.0,
            api_key: None,
            timeout: 10.0,
        }
    }
}

impl IntegrationConfig {
    /// Poll interval as a `Duration`; values `validate` rejects map to the default
    pub fn poll_interval(&self) -> Duration {
        seconds("poll_interval", self.poll_interval)
            .unwrap_or_else(|_| Duration::from_secs_f64(Self::default().poll_interval))
    }

    /// Request timeout as a `Duration`; values `validate` rejects map to the default
    pub fn timeout(&self) -> Duration {
        seconds("timeout", self.timeout)
            .unwrap_or_else(|_| Duration::from_secs_f64(Self::default().timeout))
    }

    pub fn validate(&self) -> Result<()> {
        if self.gateway_url.trim().is_empty() {
            return Err(Error::Config("gateway_url must not be empty".to_string()));
        }
        seconds("poll_interval", self.poll_interval)?;
        seconds("timeout", self.timeout)?;
        Ok(())
    }
}

/// Positive, representable number of seconds
fn seconds(field: &str, value: f64) -> Result<Duration> {
    match Duration::try_from_secs_f64(value) {
        Ok(duration) if !duration.is_zero() => Ok(duration),
        _ => Err(Error::Config(format!(
            "{} must be a positive number of seconds, got {}",
            field, value
        ))),
    }
}
