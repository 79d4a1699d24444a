//! Configuration commands

use colored::Colorize;
use tether_core::TetherConfig;

/// Show the effective configuration
pub fn show(config: &TetherConfig) -> anyhow::Result<()> {
    println!("{}", "Configuration".bold().underline());
    println!("{}", serde_json::to_string_pretty(config)?);
    println!(
        "{} {}",
        "Session index cache:".dimmed(),
        config.cache_dir().display()
    );
    Ok(())
}
