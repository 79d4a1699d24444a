//! Error types for session index storage and refresh

use thiserror::Error;

/// Session index cache errors
#[derive(Debug, Error)]
pub enum CacheError {
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("Serialization error: {0}")]
    Serialization(#[from] serde_json::Error),
}

/// Result type for cache operations
pub type CacheResult<T> = Result<T, CacheError>;

/// Why a refresh did not produce remote data
#[derive(Debug, Error)]
pub enum RefreshError {
    #[error("Failed to fetch sessions: {0}")]
    Remote(String),

    #[error("Failed to persist session index: {0}")]
    Cache(#[from] CacheError),
}

impl From<anyhow::Error> for RefreshError {
    fn from(error: anyhow::Error) -> Self {
        Self::Remote(format!("{error:#}"))
    }
}
