//! ClawViz error types

use serde::Serialize;
use thiserror::Error;

/// ClawViz error type
#[derive(Error, Debug)]
pub enum Error {
    /// Configuration error
    #[error("Configuration error: {0}")]
    Config(String),

    /// A gateway operation was attempted without a live connection
    #[error("Not connected to OpenClaw Gateway")]
    NotConnected,

    /// Gateway integration error
    #[error("Gateway error: {0}")]
    Gateway(String),

    /// HTTP error
    #[error("HTTP error: {0}")]
    Http(#[from] reqwest::Error),

    /// Serialization error
    #[error("Serialization error: {0}")]
    Serialization(#[from] serde_json::Error),

    /// IO error
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    /// Internal error
    #[error("Internal error: {0}")]
    Internal(String),
}

/// Result type alias for ClawViz operations
pub type Result<T> = std::result::Result<T, Error>;

/// Serialize a handler payload, falling back to an error object
pub fn to_json<T: Serialize>(value: T) -> serde_json::Value {
    serde_json::to_value(value).unwrap_or_else(
        |e| serde_json::json!({"error": {"code": "SERIALIZATION", "message": e.to_string()}}),
    )
}
