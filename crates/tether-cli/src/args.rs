//! CLI argument definitions using clap

use clap::{Parser, Subcommand};
use std::path::PathBuf;

#[derive(Parser)]
#[command(name = "tether")]
#[command(about = "Tether - session index and streaming text diagnostics")]
#[command(version)]
pub struct Cli {
    /// Path to configuration file (defaults to ./tether_config.json when present)
    #[arg(long, global = true)]
    pub config: Option<PathBuf>,

    /// Override the session index cache directory
    #[arg(long, global = true, env = "TETHER_CACHE_DIR")]
    pub cache_dir: Option<PathBuf>,

    #[command(subcommand)]
    pub command: Commands,
}

#[derive(Subcommand)]
pub enum Commands {
    /// Show the session index of a host, cache first then remote
    Sessions {
        /// Host identifier
        #[arg(long)]
        host: String,

        /// Case-insensitive filter over cwd, name and first message
        #[arg(long, short, default_value = "")]
        query: String,

        /// JSON file with the remote session groups (omit to run offline)
        #[arg(long)]
        remote: Option<PathBuf>,
    },

    /// Replay recorded bridge frames through the streaming text pipeline
    Replay {
        /// File with one JSON bridge frame per line
        events: PathBuf,

        /// Delay between frames in milliseconds
        #[arg(long, default_value_t = 0)]
        delay_ms: u64,

        /// Override the minimum interval between UI updates
        #[arg(long)]
        min_interval_ms: Option<u64>,
    },

    /// Inspect the local session index cache
    Cache {
        #[command(subcommand)]
        action: CacheAction,
    },

    /// Manage configuration
    Config {
        #[command(subcommand)]
        action: ConfigAction,
    },
}

#[derive(Subcommand, Clone)]
pub enum CacheAction {
    /// Print the cached snapshot of a host
    Show {
        #[arg(long)]
        host: String,
    },

    /// Delete the cached snapshot of a host
    Clear {
        #[arg(long)]
        host: String,
    },
}

#[derive(Subcommand, Clone)]
pub enum ConfigAction {
    /// Display the effective configuration
    Show,
}
