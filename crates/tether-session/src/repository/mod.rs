//! Cache-then-network session index repository
//!
//! Holds one live [`SessionIndexState`] per host for the lifetime of the
//! repository. The state moves from `None` to `Cache` when a cached snapshot is
//! served and to `Remote` once a fetch succeeds; `is_refreshing` is set while a
//! fetch is in flight whatever the source.
//!
//! Refreshes of one host are serialized by a per-host mutex. Refreshes of
//! different hosts run independently; a failure only marks its own host's state.

mod registry;


use crate::error::RefreshError;
use crate::filter::filter_state;
use crate::merge::merge_session_groups;
use crate::model::{CachedSessionIndex, SessionGroup, SessionIndexSource, SessionIndexState};
use crate::remote::SessionIndexRemoteDataSource;
use crate::storage::SessionIndexCache;
use futures::Stream;
use registry::HostRegistry;
use std::sync::Arc;
use tokio::sync::{Mutex, watch};
use tokio_stream::StreamExt;
use tokio_stream::wrappers::WatchStream;
use tokio_util::task::TaskTracker;
use tracing::{debug, warn};

/// Wall-clock milliseconds since the Unix epoch
pub type EpochClock = Arc<dyn Fn() -> i64 + Send + Sync>;

type StateCell = Arc<watch::Sender<SessionIndexState>>;

/// Session index repository
///
/// Cloning is cheap and every clone shares the same per-host state.
#[derive(Clone)]
pub struct SessionIndexRepository {
    inner: Arc<RepositoryInner>,
}

struct RepositoryInner {
    remote: Arc<dyn SessionIndexRemoteDataSource>,
    cache: Arc<dyn SessionIndexCache>,
    states: HostRegistry<StateCell>,
    refresh_locks: HostRegistry<Arc<Mutex<()>>>,
    tasks: TaskTracker,
    clock: EpochClock,
}

impl SessionIndexRepository {
    pub fn new(
        remote: Arc<dyn SessionIndexRemoteDataSource>,
        cache: Arc<dyn SessionIndexCache>,
    ) -> Self {
        Self::with_clock(
            remote,
            cache,
            Arc::new(|| chrono::Utc::now().timestamp_millis()),
        )
    }

    pub fn with_clock(
        remote: Arc<dyn SessionIndexRemoteDataSource>,
        cache: Arc<dyn SessionIndexCache>,
        clock: EpochClock,
    ) -> Self {
        Self {
            inner: Arc::new(RepositoryInner {
                remote,
                cache,
                states: HostRegistry::new(),
                refresh_locks: HostRegistry::new(),
                tasks: TaskTracker::new(),
                clock,
            }),
        }
    }

    /// Serve the cached snapshot of `host_id`, then refresh in the background.
    ///
    /// Cached data is only published while the host has no data yet, so a
    /// second call never replaces remote data with an older snapshot.
    pub async fn initialize(&self, host_id: &str) {
        let state = self.inner.state(host_id);

        if let Some(cached) = self.inner.cache.read(host_id).await {
            let served = state.send_if_modified(|current| {
                if current.source != SessionIndexSource::None {
                    return false;
                }
                current.groups = cached.groups;
                current.source = SessionIndexSource::Cache;
                current.last_updated_epoch_ms = Some(cached.cached_at_epoch_ms);
                true
            });
            if served {
                debug!("Serving cached session index for {}", host_id);
            }
        }

        self.refresh_in_background(host_id);
    }

    /// Live view of `host_id`, filtered by `query`.
    ///
    /// Yields the current state immediately, then every later change.
    pub fn observe(
        &self,
        host_id: &str,
        query: &str,
    ) -> impl Stream<Item = SessionIndexState> + Send + use<> {
        let query = query.to_string();
        WatchStream::new(self.subscribe(host_id)).map(move |state| filter_state(&state, &query))
    }

    /// Unfiltered state receiver for `host_id`
    pub fn subscribe(&self, host_id: &str) -> watch::Receiver<SessionIndexState> {
        self.inner.state(host_id).subscribe()
    }

    /// Unfiltered snapshot of the current state of `host_id`
    pub fn current(&self, host_id: &str) -> SessionIndexState {
        self.inner.state(host_id).borrow().clone()
    }

    /// Fetch, merge, persist and publish the session index of `host_id`.
    ///
    /// Waits for any refresh of the same host already in flight. Failures are
    /// reported through `error_message`; the data held before is kept.
    pub async fn refresh(&self, host_id: &str) -> SessionIndexState {
        let lock = self.inner.refresh_lock(host_id);
        let _guard = lock.lock().await;

        let state = self.inner.state(host_id);
        state.send_modify(|current| {
            current.is_refreshing = true;
            current.error_message = None;
        });

        let existing = state.borrow().groups.clone();
        debug!("Refreshing session index for {}", host_id);

        match self.inner.fetch_and_persist(host_id, &existing).await {
            Ok((groups, fetched_at)) => {
                debug!(
                    "Session index for {} refreshed: {} groups",
                    host_id,
                    groups.len()
                );
                state.send_modify(|current| {
                    current.groups = groups;
                    current.is_refreshing = false;
                    current.source = SessionIndexSource::Remote;
                    current.last_updated_epoch_ms = Some(fetched_at);
                    current.error_message = None;
                });
            }
            Err(e) => {
                warn!("Session index refresh for {} failed: {}", host_id, e);
                state.send_modify(|current| {
                    current.is_refreshing = false;
                    current.error_message = Some(e.to_string());
                });
            }
        }

        let refreshed = state.borrow().clone();
        refreshed
    }

    /// Schedule [`Self::refresh`] without waiting for it.
    ///
    /// Must be called from within a Tokio runtime. Ignored after [`Self::shutdown`].
    pub fn refresh_in_background(&self, host_id: &str) {
        if self.inner.tasks.is_closed() {
            warn!(
                "Repository is shut down; not refreshing session index for {}",
                host_id
            );
            return;
        }

        let repository = self.clone();
        let host_id = host_id.to_string();
        self.inner.tasks.spawn(async move {
            repository.refresh(&host_id).await;
        });
    }

    /// Stop accepting background refreshes and wait for the ones in flight
    pub async fn shutdown(&self) {
        self.inner.tasks.close();
        self.inner.tasks.wait().await;
    }
}

impl RepositoryInner {
    fn state(&self, host_id: &str) -> StateCell {
        self.states.get_or_create(host_id, || {
            let (sender, _) = watch::channel(SessionIndexState::empty(host_id));
            Arc::new(sender)
        })
    }

    fn refresh_lock(&self, host_id: &str) -> Arc<Mutex<()>> {
        self.refresh_locks
            .get_or_create(host_id, || Arc::new(Mutex::new(())))
    }

    async fn fetch_and_persist(
        &self,
        host_id: &str,
        existing: &[Arc<SessionGroup>],
    ) -> Result<(Vec<Arc<SessionGroup>>, i64), RefreshError> {
        let incoming = self.remote.fetch(host_id).await?;
        let merged = merge_session_groups(existing, incoming);
        let now = (self.clock)();

        self.cache
            .write(&CachedSessionIndex {
                host_id: host_id.to_string(),
                cached_at_epoch_ms: now,
                groups: merged.clone(),
            })
            .await?;

        Ok((merged, now))
    }
}
