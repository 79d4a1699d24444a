//! Remote source of session indexes
//!
//! Implemented by the bridge RPC client. Retries and reconnects belong to the
//! implementation; the repository treats every error as a failed refresh.

use crate::model::SessionGroup;
use async_trait::async_trait;

/// Fetches the current session index of a host
#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait SessionIndexRemoteDataSource: Send + Sync {
    async fn fetch(&self, host_id: &str) -> anyhow::Result<Vec<SessionGroup>>;
}
