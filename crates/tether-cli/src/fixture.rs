//! Remote data sources backed by local files
//!
//! Stand-ins for the bridge RPC client so the repository can be exercised
//! without a running bridge.

use anyhow::Context;
use async_trait::async_trait;
use std::path::PathBuf;
use tether_session::{SessionGroup, SessionIndexRemoteDataSource};

/// Serves the session groups stored in a JSON file, for every host
#[derive(Debug, Clone)]
pub struct FixtureRemote {
    path: PathBuf,
}

impl FixtureRemote {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self { path: path.into() }
    }
}

#[async_trait]
impl SessionIndexRemoteDataSource for FixtureRemote {
    async fn fetch(&self, host_id: &str) -> anyhow::Result<Vec<SessionGroup>> {
        let content = tokio::fs::read_to_string(&self.path)
            .await
            .with_context(|| format!("Failed to read remote fixture {}", self.path.display()))?;
        let groups: Vec<SessionGroup> = serde_json::from_str(&content)
            .with_context(|| format!("Invalid remote fixture {}", self.path.display()))?;

        tracing::debug!(
            "Fixture served {} groups for {} from {:?}",
            groups.len(),
            host_id,
            self.path
        );
        Ok(groups)
    }
}

/// Remote that is never reachable
#[derive(Debug, Clone, Copy, Default)]
pub struct OfflineRemote;

#[async_trait]
impl SessionIndexRemoteDataSource for OfflineRemote {
    async fn fetch(&self, host_id: &str) -> anyhow::Result<Vec<SessionGroup>> {
        anyhow::bail!("no remote configured for host {}", host_id)
    }
}
