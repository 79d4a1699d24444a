//! Tether CLI
//!
//! Diagnostic front end for the Tether client core. It drives the session
//! index repository and the streaming text pipeline against local files:
//!
//! - `tether sessions --host <id>`: cache-then-network session listing
//! - `tether replay <events.jsonl>`: replay recorded bridge frames
//! - `tether cache show|clear --host <id>`: inspect the local index cache
//! - `tether config show`: print the effective configuration

mod args;
mod commands;
mod fixture;
mod router;

use args::Cli;
use clap::Parser;

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    // Set RUST_LOG=debug for verbose logging
    tracing_subscriber::fmt()
        .with_env_filter(tracing_subscriber::EnvFilter::from_default_env())
        .with_writer(std::io::stderr)
        .init();

    let cli = Cli::parse();
    router::route(cli).await
}
