//! Command routing logic for CLI

use crate::args::{CacheAction, Cli, Commands, ConfigAction};
use crate::commands;
use anyhow::Context;
use tether_core::config::DEFAULT_CONFIG_FILE;
use tether_core::{ConfigLoader, TetherConfig};

/// Route CLI commands to their respective handlers
pub async fn route(cli: Cli) -> anyhow::Result<()> {
    let config = load_config(&cli)?;

    match cli.command {
        Commands::Sessions {
            host,
            query,
            remote,
        } => commands::sessions::execute(&config, &host, &query, remote.as_deref()).await,
        Commands::Replay {
            events,
            delay_ms,
            min_interval_ms,
        } => commands::replay::execute(&config, &events, delay_ms, min_interval_ms).await,
        Commands::Cache { action } => match action {
            CacheAction::Show { host } => commands::cache::show(&config, &host).await,
            CacheAction::Clear { host } => commands::cache::clear(&config, &host).await,
        },
        Commands::Config { action } => match action {
            ConfigAction::Show => commands::config::show(&config),
        },
    }
}

fn load_config(cli: &Cli) -> anyhow::Result<TetherConfig> {
    let loader = match &cli.config {
        Some(path) => ConfigLoader::new().with_file(path),
        None => ConfigLoader::new().with_optional_file(DEFAULT_CONFIG_FILE),
    };

    let mut config = loader
        .with_env()
        .load()
        .context("Failed to load configuration")?;

    if let Some(dir) = &cli.cache_dir {
        config.cache_dir = Some(dir.clone());
    }
    Ok(config)
}
