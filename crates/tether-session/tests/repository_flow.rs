//! Cache-then-network flows against the file-backed cache

use async_trait::async_trait;
use futures::StreamExt;
use parking_lot::Mutex;
use std::sync::Arc;
use std::time::Duration;
use tempfile::TempDir;
use tether_session::{
    FileSessionIndexCache, SessionGroup, SessionIndexCache, SessionIndexRemoteDataSource,
    SessionIndexRepository, SessionIndexSource, SessionRecord,
};

/// Remote whose answer can be swapped between refreshes
struct ScriptedRemote {
    next: Mutex<anyhow::Result<Vec<SessionGroup>>>,
}

impl ScriptedRemote {
    fn new(groups: Vec<SessionGroup>) -> Self {
        Self {
            next: Mutex::new(Ok(groups)),
        }
    }

    fn serve(&self, groups: Vec<SessionGroup>) {
        *self.next.lock() = Ok(groups);
    }

    fn fail(&self, message: &str) {
        *self.next.lock() = Err(anyhow::anyhow!(message.to_string()));
    }
}

#[async_trait]
impl SessionIndexRemoteDataSource for ScriptedRemote {
    async fn fetch(&self, _host_id: &str) -> anyhow::Result<Vec<SessionGroup>> {
        match &*self.next.lock() {
            Ok(groups) => Ok(groups.clone()),
            Err(e) => Err(anyhow::anyhow!(e.to_string())),
        }
    }
}

fn session(path: &str, cwd: &str, updated_at: &str, preview: &str) -> SessionRecord {
    SessionRecord::new(path, cwd, "2024-06-01T08:00:00Z", updated_at).with_preview(preview)
}

fn workspace_groups() -> Vec<SessionGroup> {
    vec![
        SessionGroup::new(
            "/srv/checkout",
            vec![
                session("/s/a", "/srv/checkout", "2024-06-01T09:00:00Z", "Payment webhook retries"),
                session("/s/b", "/srv/checkout", "2024-06-02T09:00:00Z", "Cart totals"),
            ],
        ),
        SessionGroup::new(
            "/srv/docs",
            vec![session("/s/c", "/srv/docs", "2024-06-03T09:00:00Z", "Update README")],
        ),
    ]
}

#[tokio::test]
async fn test_second_launch_serves_cache_before_network() {
    let temp = TempDir::new().unwrap();
    let remote = Arc::new(ScriptedRemote::new(workspace_groups()));

    // First launch: nothing cached, the network result is persisted
    {
        let cache = Arc::new(FileSessionIndexCache::new(temp.path()));
        let repository = SessionIndexRepository::new(remote.clone(), cache);
        repository.initialize("laptop").await;
        repository.shutdown().await;

        let state = repository.current("laptop");
        assert_eq!(state.source, SessionIndexSource::Remote);
        assert_eq!(state.session_count(), 3);
    }

    // Second launch with the bridge down: cached data is served and kept
    remote.fail("bridge offline");
    let cache = Arc::new(FileSessionIndexCache::new(temp.path()));
    let repository = SessionIndexRepository::new(remote.clone(), cache);

    repository.initialize("laptop").await;
    let cached = repository.current("laptop");
    assert_eq!(cached.source, SessionIndexSource::Cache);
    assert_eq!(cached.session_count(), 3);

    repository.shutdown().await;
    let after = repository.current("laptop");
    assert_eq!(after.source, SessionIndexSource::Cache);
    assert!(!after.is_refreshing);
    assert_eq!(after.groups, cached.groups);
    assert!(after.error_message.unwrap().contains("bridge offline"));
}

#[tokio::test]
async fn test_refresh_rewrites_cache_and_keeps_unchanged_groups() {
    let temp = TempDir::new().unwrap();
    let remote = Arc::new(ScriptedRemote::new(workspace_groups()));
    let cache = Arc::new(FileSessionIndexCache::new(temp.path()));
    let repository = SessionIndexRepository::new(remote.clone(), cache.clone());

    let first = repository.refresh("laptop").await;

    let mut changed = workspace_groups();
    changed[1].sessions.push(Arc::new(session(
        "/s/d",
        "/srv/docs",
        "2024-06-04T09:00:00Z",
        "Changelog",
    )));
    remote.serve(changed);
    let second = repository.refresh("laptop").await;

    // Groups ordered by cwd: checkout untouched, docs gained a session
    assert!(Arc::ptr_eq(&first.groups[0], &second.groups[0]));
    assert!(!Arc::ptr_eq(&first.groups[1], &second.groups[1]));
    assert!(Arc::ptr_eq(
        &first.groups[1].sessions[0],
        &second.groups[1].sessions[1]
    ));
    assert_eq!(second.groups[1].sessions[0].session_path, "/s/d");

    let persisted = cache.read("laptop").await.unwrap();
    assert_eq!(persisted.groups, second.groups);
    assert_eq!(
        Some(persisted.cached_at_epoch_ms),
        second.last_updated_epoch_ms
    );
}

#[tokio::test]
async fn test_observers_see_filtered_updates() {
    let temp = TempDir::new().unwrap();
    let remote = Arc::new(ScriptedRemote::new(workspace_groups()));
    let cache = Arc::new(FileSessionIndexCache::new(temp.path()));
    let repository = SessionIndexRepository::new(remote, cache);

    let mut payments = Box::pin(repository.observe("laptop", "PAYMENT"));
    let mut docs = Box::pin(repository.observe("laptop", "srv/docs"));

    repository.refresh("laptop").await;

    let payments_state = tokio::time::timeout(Duration::from_secs(5), async {
        loop {
            let state = payments.next().await.unwrap();
            if state.source == SessionIndexSource::Remote {
                return state;
            }
        }
    })
    .await
    .unwrap();
    assert_eq!(payments_state.session_count(), 1);
    assert_eq!(payments_state.groups[0].sessions[0].session_path, "/s/a");

    let docs_state = docs.next().await.unwrap();
    assert_eq!(docs_state.groups.len(), 1);
    assert_eq!(docs_state.groups[0].cwd, "/srv/docs");
    assert!(Arc::ptr_eq(
        &docs_state.groups[0],
        &repository.current("laptop").groups[1]
    ));
}
