//! Local filesystem session index cache
//!
//! Stores one JSON file per host: `<cache_dir>/<sanitized host id>.json`.

use super::SessionIndexCache;
use crate::error::CacheResult;
use crate::model::CachedSessionIndex;
use async_trait::async_trait;
use std::path::{Path, PathBuf};
use tokio::fs;
use tracing::{debug, warn};

/// Replace every character outside `[A-Za-z0-9_-]` with `_`
pub fn sanitize_host_id(host_id: &str) -> String {
    host_id
        .chars()
        .map(|c| {
            if c.is_ascii_alphanumeric() || c == '_' || c == '-' {
                c
            } else {
                '_'
            }
        })
        .collect()
}

/// Session index cache backed by one file per host
#[derive(Debug, Clone)]
pub struct FileSessionIndexCache {
    cache_dir: PathBuf,
}

impl FileSessionIndexCache {
    pub fn new(cache_dir: impl Into<PathBuf>) -> Self {
        Self {
            cache_dir: cache_dir.into(),
        }
    }

    pub fn cache_dir(&self) -> &Path {
        &self.cache_dir
    }

    /// File holding the snapshot of `host_id`
    pub fn index_path(&self, host_id: &str) -> PathBuf {
        self.cache_dir
            .join(format!("{}.json", sanitize_host_id(host_id)))
    }
}

#[async_trait]
impl SessionIndexCache for FileSessionIndexCache {
    async fn read(&self, host_id: &str) -> Option<CachedSessionIndex> {
        let path = self.index_path(host_id);

        let content = match fs::read_to_string(&path).await {
            Ok(content) => content,
            Err(e) => {
                debug!("No session index cache at {:?}: {}", path, e);
                return None;
            }
        };

        match serde_json::from_str::<CachedSessionIndex>(&content) {
            // Different host ids can sanitize to the same file name
            Ok(index) if index.host_id != host_id => {
                warn!(
                    "Session index cache at {:?} belongs to host {}, not {}",
                    path, index.host_id, host_id
                );
                None
            }
            Ok(index) => {
                debug!("Loaded session index cache for {} from {:?}", host_id, path);
                Some(index)
            }
            Err(e) => {
                warn!("Ignoring corrupt session index cache at {:?}: {}", path, e);
                None
            }
        }
    }

    async fn write(&self, index: &CachedSessionIndex) -> CacheResult<()> {
        fs::create_dir_all(&self.cache_dir).await?;

        let path = self.index_path(&index.host_id);
        let temp_path = path.with_extension("json.tmp");
        let content = serde_json::to_string_pretty(index)?;

        fs::write(&temp_path, content).await?;
        fs::rename(&temp_path, &path).await?;

        debug!(
            "Saved session index for {} ({} groups) to {:?}",
            index.host_id,
            index.groups.len(),
            path
        );
        Ok(())
    }

    async fn remove(&self, host_id: &str) -> CacheResult<()> {
        let path = self.index_path(host_id);
        match fs::remove_file(&path).await {
            Ok(()) => {
                debug!("Removed session index cache {:?}", path);
                Ok(())
            }
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => Ok(()),
            Err(e) => Err(e.into()),
        }
    }
}
