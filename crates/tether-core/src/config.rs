//! Configuration loading and management
//!
//! Configuration is assembled from layered sources: built-in defaults, an optional
//! JSON file, then environment overrides. Later sources win.

use crate::error::{TetherError, TetherResult};
use serde::{Deserialize, Serialize};
use std::env;
use std::fs;
use std::path::{Path, PathBuf};

/// Default configuration file name
pub const DEFAULT_CONFIG_FILE: &str = "tether_config.json";

/// Environment variable overriding the session index cache directory
pub const ENV_CACHE_DIR: &str = "TETHER_CACHE_DIR";
/// Environment variable overriding the UI throttle interval
pub const ENV_MIN_INTERVAL_MS: &str = "TETHER_MIN_INTERVAL_MS";
/// Environment variable overriding the assembler message bound
pub const ENV_MAX_TRACKED_MESSAGES: &str = "TETHER_MAX_TRACKED_MESSAGES";

const DEFAULT_MIN_INTERVAL_MS: u64 = 50;
const DEFAULT_MAX_TRACKED_MESSAGES: usize = 32;

/// UI update cadence settings
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct ThrottleConfig {
    /// Minimum spacing between two emitted UI updates
    pub min_interval_ms: u64,
}

impl Default for ThrottleConfig {
    fn default() -> Self {
        Self {
            min_interval_ms: DEFAULT_MIN_INTERVAL_MS,
        }
    }
}

/// Streaming text assembler settings
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct AssemblerConfig {
    /// Number of distinct messages kept before the oldest is evicted
    pub max_tracked_messages: usize,
}

impl Default for AssemblerConfig {
    fn default() -> Self {
        Self {
            max_tracked_messages: DEFAULT_MAX_TRACKED_MESSAGES,
        }
    }
}

/// Top-level Tether configuration
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct TetherConfig {
    /// Directory holding one session index snapshot per host
    #[serde(skip_serializing_if = "Option::is_none")]
    pub cache_dir: Option<PathBuf>,
    pub throttle: ThrottleConfig,
    pub assembler: AssemblerConfig,
}

impl TetherConfig {
    /// Resolved cache directory, falling back to the platform cache location
    pub fn cache_dir(&self) -> PathBuf {
        match &self.cache_dir {
            Some(dir) => dir.clone(),
            None => default_cache_dir(dirs::cache_dir()),
        }
    }

    /// Check the configuration for values the runtime cannot work with
    pub fn validate(&self) -> TetherResult<()> {
        if self.assembler.max_tracked_messages == 0 {
            return Err(TetherError::config(
                "assembler.max_tracked_messages must be at least 1",
            ));
        }
        Ok(())
    }

    /// Apply overrides from a variable lookup (the process environment in production)
    pub fn apply_overrides<F>(&mut self, lookup: F) -> TetherResult<()>
    where
        F: Fn(&str) -> Option<String>,
    {
        if let Some(dir) = lookup(ENV_CACHE_DIR).filter(|v| !v.trim().is_empty()) {
            self.cache_dir = Some(PathBuf::from(dir));
        }

        if let Some(raw) = lookup(ENV_MIN_INTERVAL_MS) {
            self.throttle.min_interval_ms = raw.trim().parse().map_err(|_| {
                TetherError::config(format!("{ENV_MIN_INTERVAL_MS} is not a number: {raw}"))
            })?;
        }

        if let Some(raw) = lookup(ENV_MAX_TRACKED_MESSAGES) {
            self.assembler.max_tracked_messages = raw.trim().parse().map_err(|_| {
                TetherError::config(format!(
                    "{ENV_MAX_TRACKED_MESSAGES} is not a number: {raw}"
                ))
            })?;
        }

        Ok(())
    }
}

/// Source of configuration data
#[derive(Debug, Clone)]
pub enum ConfigSource {
    /// Configuration file; `required` files must exist
    File { path: PathBuf, required: bool },
    /// Environment variables
    Environment,
}

/// Configuration loader with support for multiple sources
#[derive(Debug, Default)]
pub struct ConfigLoader {
    sources: Vec<ConfigSource>,
}

impl ConfigLoader {
    /// Create a new config loader
    pub fn new() -> Self {
        Self::default()
    }

    /// Add a file source that must exist
    pub fn with_file<P: AsRef<Path>>(mut self, path: P) -> Self {
        self.sources.push(ConfigSource::File {
            path: path.as_ref().to_path_buf(),
            required: true,
        });
        self
    }

    /// Add a file source that is skipped when absent
    pub fn with_optional_file<P: AsRef<Path>>(mut self, path: P) -> Self {
        self.sources.push(ConfigSource::File {
            path: path.as_ref().to_path_buf(),
            required: false,
        });
        self
    }

    /// Add environment variables source
    pub fn with_env(mut self) -> Self {
        self.sources.push(ConfigSource::Environment);
        self
    }

    /// Load configuration from all sources
    pub fn load(self) -> TetherResult<TetherConfig> {
        let mut config = TetherConfig::default();

        for source in &self.sources {
            match source {
                ConfigSource::File { path, required } => {
                    if let Some(from_file) = load_file(path, *required)? {
                        tracing::debug!("Loaded configuration from {:?}", path);
                        config = from_file;
                    }
                }
                ConfigSource::Environment => {
                    config.apply_overrides(|key| env::var(key).ok())?;
                }
            }
        }

        config.validate()?;
        Ok(config)
    }
}

fn default_cache_dir(platform_cache: Option<PathBuf>) -> PathBuf {
    match platform_cache {
        Some(dir) => dir.join("tether").join("session-index"),
        None => PathBuf::from(".tether").join("session-index"),
    }
}

fn load_file(path: &Path, required: bool) -> TetherResult<Option<TetherConfig>> {
    if !path.exists() {
        if required {
            return Err(TetherError::config(format!(
                "Configuration file not found: {}",
                path.display()
            )));
        }
        return Ok(None);
    }

    let content = fs::read_to_string(path)?;
    let config = serde_json::from_str(&content).map_err(|e| {
        TetherError::config(format!("Invalid configuration in {}: {}", path.display(), e))
    })?;
    Ok(Some(config))
}
