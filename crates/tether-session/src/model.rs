//! Session index data structures
//!
//! - SessionRecord: one persisted conversation on a host
//! - SessionGroup: sessions sharing a working directory
//! - CachedSessionIndex: the durable per-host snapshot
//! - SessionIndexState: the observable per-host view
//!
//! Records and groups are shared behind `Arc` so that unchanged data keeps its
//! allocation across refreshes; `Arc::ptr_eq` is the "row did not change" signal.

use chrono::DateTime;
use serde::{Deserialize, Serialize};
use std::cmp::Ordering;
use std::sync::Arc;

/// One persisted assistant conversation
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SessionRecord {
    /// Storage path of the session on the host; unique within a group
    pub session_path: String,

    /// Working directory the session ran in
    pub cwd: String,

    /// ISO-8601 creation timestamp
    pub created_at: String,

    /// ISO-8601 last update timestamp
    pub updated_at: String,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub display_name: Option<String>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub first_user_message_preview: Option<String>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub message_count: Option<u32>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub last_model: Option<String>,
}

impl SessionRecord {
    pub fn new(
        session_path: impl Into<String>,
        cwd: impl Into<String>,
        created_at: impl Into<String>,
        updated_at: impl Into<String>,
    ) -> Self {
        Self {
            session_path: session_path.into(),
            cwd: cwd.into(),
            created_at: created_at.into(),
            updated_at: updated_at.into(),
            display_name: None,
            first_user_message_preview: None,
            message_count: None,
            last_model: None,
        }
    }

    pub fn with_display_name(mut self, name: impl Into<String>) -> Self {
        self.display_name = Some(name.into());
        self
    }

    pub fn with_preview(mut self, preview: impl Into<String>) -> Self {
        self.first_user_message_preview = Some(preview.into());
        self
    }

    pub fn with_message_count(mut self, count: u32) -> Self {
        self.message_count = Some(count);
        self
    }

    pub fn with_last_model(mut self, model: impl Into<String>) -> Self {
        self.last_model = Some(model.into());
        self
    }
}

/// Newest-`updated_at`-first ordering.
///
/// Timestamps are compared as instants when they parse as RFC 3339, then as
/// plain strings (ISO-8601 sorts lexically when zones match). Unparseable
/// timestamps sort after parseable ones.
pub fn newest_first(a: &SessionRecord, b: &SessionRecord) -> Ordering {
    updated_at_key(b).cmp(&updated_at_key(a))
}

fn updated_at_key(record: &SessionRecord) -> (Option<i64>, &str) {
    let instant = DateTime::parse_from_rfc3339(&record.updated_at)
        .ok()
        .map(|time| time.timestamp_millis());
    (instant, record.updated_at.as_str())
}

/// Sessions of one host sharing a working directory
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SessionGroup {
    pub cwd: String,
    pub sessions: Vec<Arc<SessionRecord>>,
}

impl SessionGroup {
    pub fn new(cwd: impl Into<String>, sessions: Vec<SessionRecord>) -> Self {
        Self {
            cwd: cwd.into(),
            sessions: sessions.into_iter().map(Arc::new).collect(),
        }
    }
}

/// Durable snapshot of one host's session index
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CachedSessionIndex {
    pub host_id: String,
    pub cached_at_epoch_ms: i64,
    pub groups: Vec<Arc<SessionGroup>>,
}

/// Where the data currently held for a host came from
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "UPPERCASE")]
pub enum SessionIndexSource {
    /// Nothing loaded yet
    #[default]
    None,
    /// Served from the local cache
    Cache,
    /// Confirmed by a remote fetch
    Remote,
}

impl std::fmt::Display for SessionIndexSource {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::None => write!(f, "none"),
            Self::Cache => write!(f, "cache"),
            Self::Remote => write!(f, "remote"),
        }
    }
}

/// Observable, in-memory view of one host's session index
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SessionIndexState {
    pub host_id: String,
    pub groups: Vec<Arc<SessionGroup>>,
    /// A refresh is in flight; independent of `source`
    pub is_refreshing: bool,
    pub source: SessionIndexSource,
    pub last_updated_epoch_ms: Option<i64>,
    pub error_message: Option<String>,
}

impl SessionIndexState {
    /// Initial state of a host nothing is known about
    pub fn empty(host_id: impl Into<String>) -> Self {
        Self {
            host_id: host_id.into(),
            groups: Vec::new(),
            is_refreshing: false,
            source: SessionIndexSource::None,
            last_updated_epoch_ms: None,
            error_message: None,
        }
    }

    /// Total number of sessions across all groups
    pub fn session_count(&self) -> usize {
        self.groups.iter().map(|group| group.sessions.len()).sum()
    }
}
