//! Session index sync for Tether
//!
//! This crate provides the host session index used by the session browser:
//! - Session index model and newest-first ordering
//! - Identity-preserving merge of fetched snapshots
//! - Query filtering
//! - Per-host cache (in-memory and local file storage)
//! - Cache-then-network repository with observable per-host state

pub mod error;
pub mod filter;
pub mod merge;
pub mod model;
pub mod remote;
pub mod repository;
pub mod storage;

pub use error::{CacheError, CacheResult, RefreshError};
pub use filter::{filter_groups, filter_state};
pub use merge::merge_session_groups;
pub use model::{
    CachedSessionIndex, SessionGroup, SessionIndexSource, SessionIndexState, SessionRecord,
    newest_first,
};
pub use remote::SessionIndexRemoteDataSource;
pub use repository::{EpochClock, SessionIndexRepository};
pub use storage::{
    FileSessionIndexCache, InMemorySessionIndexCache, SessionIndexCache, sanitize_host_id,
};
