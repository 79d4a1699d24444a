//! Cache-then-network session listing

use super::print_state;
use crate::fixture::{FixtureRemote, OfflineRemote};
use futures::StreamExt;
use std::path::Path;
use std::sync::Arc;
use tether_core::TetherConfig;
use tether_session::{
    FileSessionIndexCache, SessionIndexRemoteDataSource, SessionIndexRepository, filter_state,
};

/// Initialize the repository for `host_id` and print every state it publishes
/// until the refresh settles.
pub async fn execute(
    config: &TetherConfig,
    host_id: &str,
    query: &str,
    remote: Option<&Path>,
) -> anyhow::Result<()> {
    let remote: Arc<dyn SessionIndexRemoteDataSource> = match remote {
        Some(path) => Arc::new(FixtureRemote::new(path)),
        None => Arc::new(OfflineRemote),
    };
    let cache = Arc::new(FileSessionIndexCache::new(config.cache_dir()));
    tracing::debug!("Using session index cache at {:?}", cache.cache_dir());

    let repository = SessionIndexRepository::new(remote, cache);
    let mut states = Box::pin(repository.observe(host_id, query));

    repository.initialize(host_id).await;

    let settled = repository.shutdown();
    tokio::pin!(settled);

    let mut last_printed = None;
    loop {
        tokio::select! {
            Some(state) = states.next() => {
                if last_printed.as_ref() != Some(&state) {
                    print_state(&state);
                    last_printed = Some(state);
                }
            }
            () = &mut settled => break,
        }
    }

    let final_state = filter_state(&repository.current(host_id), query);
    if last_printed.as_ref() != Some(&final_state) {
        print_state(&final_state);
    }

    if let Some(error) = final_state.error_message {
        tracing::warn!("Session index for {} is stale: {}", host_id, error);
    }
    Ok(())
}
