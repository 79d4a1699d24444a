//! Error types for Tether

use thiserror::Error;

/// Result type alias for Tether operations
pub type TetherResult<T> = Result<T, TetherError>;

/// Main error type for Tether
#[derive(Error, Debug, Clone)]
pub enum TetherError {
    /// Configuration related errors
    #[error("Configuration error: {0}")]
    Config(String),

    /// IO errors
    #[error("IO error: {0}")]
    Io(String),

    /// JSON serialization/deserialization errors
    #[error("JSON error: {0}")]
    Json(String),
}

impl TetherError {
    /// Create a new configuration error
    pub fn config(message: impl Into<String>) -> Self {
        Self::Config(message.into())
    }
}

impl From<std::io::Error> for TetherError {
    fn from(error: std::io::Error) -> Self {
        Self::Io(error.to_string())
    }
}

impl From<serde_json::Error> for TetherError {
    fn from(error: serde_json::Error) -> Self {
        Self::Json(error.to_string())
    }
}
