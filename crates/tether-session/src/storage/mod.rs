//! Session index cache abstraction and implementations
//!
//! A cache holds one [`CachedSessionIndex`] per host. Reads never fail: a missing,
//! unreadable or corrupt entry is a miss. Writes replace the host's entry whole.

mod file;
mod memory;

pub use file::{FileSessionIndexCache, sanitize_host_id};
pub use memory::InMemorySessionIndexCache;

use crate::error::CacheResult;
use crate::model::CachedSessionIndex;
use async_trait::async_trait;

/// Durable per-host store of session index snapshots
#[async_trait]
pub trait SessionIndexCache: Send + Sync {
    /// Last snapshot written for `host_id`, or `None` on any kind of miss
    async fn read(&self, host_id: &str) -> Option<CachedSessionIndex>;

    /// Replace the snapshot of `index.host_id`
    async fn write(&self, index: &CachedSessionIndex) -> CacheResult<()>;

    /// Forget the snapshot of `host_id`; absent entries are not an error
    async fn remove(&self, host_id: &str) -> CacheResult<()>;
}
