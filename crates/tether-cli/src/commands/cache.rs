//! Session index cache commands

use super::print_state;
use anyhow::Context;
use colored::Colorize;
use tether_core::TetherConfig;
use tether_session::{
    FileSessionIndexCache, SessionIndexCache, SessionIndexSource, SessionIndexState,
};

/// Print the cached snapshot of `host_id`
pub async fn show(config: &TetherConfig, host_id: &str) -> anyhow::Result<()> {
    let cache = FileSessionIndexCache::new(config.cache_dir());
    let path = cache.index_path(host_id);

    let Some(index) = cache.read(host_id).await else {
        println!(
            "{} {}",
            "No cached session index at".yellow(),
            path.display()
        );
        return Ok(());
    };

    println!("{}", format!("Loaded {}", path.display()).dimmed());
    let state = SessionIndexState {
        groups: index.groups,
        source: SessionIndexSource::Cache,
        last_updated_epoch_ms: Some(index.cached_at_epoch_ms),
        ..SessionIndexState::empty(index.host_id)
    };
    print_state(&state);
    Ok(())
}

/// Delete the cached snapshot of `host_id`
pub async fn clear(config: &TetherConfig, host_id: &str) -> anyhow::Result<()> {
    let cache = FileSessionIndexCache::new(config.cache_dir());
    let path = cache.index_path(host_id);

    cache
        .remove(host_id)
        .await
        .with_context(|| format!("Failed to remove {}", path.display()))?;

    println!("{} {}", "Cleared".green(), path.display());
    Ok(())
}
