//! Error types for the relay system.

use thiserror::Error;

use crate::client::ClientError;
use crate::messaging::MessagingError;
use crate::storage::StorageError;

/// Top-level error type for relay components
#[derive(Debug, Error)]
pub enum RelayError {
    #[error("Configuration error: {0}")]
    Configuration(String),

    #[error("Database error: {0}")]
    Database(String),

    #[error("Messaging error: {0}")]
    Messaging(#[from] MessagingError),

    #[error("Storage error: {0}")]
    Storage(#[from] StorageError),

    #[error("Control plane client error: {0}")]
    Client(#[from] ClientError),

    #[error("Web server error: {0}")]
    WebServer(String),
}

impl From<sqlx::Error> for RelayError {
    fn from(err: sqlx::Error) -> Self {
        RelayError::Database(err.to_string())
    }
}

impl From<serde_json::Error> for RelayError {
    fn from(err: serde_json::Error) -> Self {
        RelayError::Configuration(format!("JSON serialization error: {err}"))
    }
}

impl From<config::ConfigError> for RelayError {
    fn from(err: config::ConfigError) -> Self {
        RelayError::Configuration(err.to_string())
    }
}

/// Result type alias for RelayError
pub type RelayResult<T> = std::result::Result<T, RelayError>;
