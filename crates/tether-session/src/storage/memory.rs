//! Process-memory session index cache

use super::SessionIndexCache;
use crate::error::CacheResult;
use crate::model::CachedSessionIndex;
use async_trait::async_trait;
use parking_lot::RwLock;
use std::collections::HashMap;

/// Session index cache that lives as long as the process
#[derive(Debug, Default)]
pub struct InMemorySessionIndexCache {
    entries: RwLock<HashMap<String, CachedSessionIndex>>,
}

impl InMemorySessionIndexCache {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn len(&self) -> usize {
        self.entries.read().len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.read().is_empty()
    }
}

#[async_trait]
impl SessionIndexCache for InMemorySessionIndexCache {
    async fn read(&self, host_id: &str) -> Option<CachedSessionIndex> {
        self.entries.read().get(host_id).cloned()
    }

    async fn write(&self, index: &CachedSessionIndex) -> CacheResult<()> {
        self.entries
            .write()
            .insert(index.host_id.clone(), index.clone());
        Ok(())
    }

    async fn remove(&self, host_id: &str) -> CacheResult<()> {
        self.entries.write().remove(host_id);
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::model::{SessionGroup, SessionRecord};
    use std::sync::Arc;

    fn index(host_id: &str, cached_at: i64) -> CachedSessionIndex {
        CachedSessionIndex {
            host_id: host_id.to_string(),
            cached_at_epoch_ms: cached_at,
            groups: vec![Arc::new(SessionGroup::new(
                "/w",
                vec![SessionRecord::new("/s/1", "/w", "t0", "t1")],
            ))],
        }
    }

    #[tokio::test]
    async fn test_write_read_remove() {
        let cache = InMemorySessionIndexCache::new();
        assert!(cache.read("host").await.is_none());

        cache.write(&index("host", 1)).await.unwrap();
        cache.write(&index("host", 2)).await.unwrap();
        assert_eq!(cache.len(), 1);
        assert_eq!(cache.read("host").await.unwrap().cached_at_epoch_ms, 2);

        cache.remove("host").await.unwrap();
        assert!(cache.is_empty());
    }

    #[tokio::test]
    async fn test_hosts_are_separate() {
        let cache = InMemorySessionIndexCache::new();
        cache.write(&index("a", 1)).await.unwrap();
        cache.write(&index("b", 2)).await.unwrap();

        assert_eq!(cache.read("a").await.unwrap().host_id, "a");
        assert_eq!(cache.read("b").await.unwrap().cached_at_epoch_ms, 2);
    }
}
