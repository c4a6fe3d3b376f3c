//! Configuration loading and management.
//!
//! Loads briefpost configuration from `./briefpost.toml` (or
//! `$BRIEFPOST_CONFIG_PATH`). Environment variables override file values;
//! file values override defaults.
//!
//! Precedence: env vars > config file > defaults.

use std::path::PathBuf;

use anyhow::{Context, Result};
use serde::Deserialize;

use crate::types::Env;

/// Top-level briefpost configuration loaded from TOML.
///
/// Path: `./briefpost.toml` or `$BRIEFPOST_CONFIG_PATH`.
/// Env vars override file values; file values override defaults.
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(default)]
pub struct BriefpostConfig {
    /// Delivery endpoint credentials (`[endpoint]`).
    pub endpoint: Env,
    /// Filesystem paths (`[paths]`).
    pub paths: PathsConfig,
}

impl BriefpostConfig {
    /// Load configuration with precedence: env vars > TOML file > defaults.
    ///
    /// Config file path: `$BRIEFPOST_CONFIG_PATH` or `./briefpost.toml`.
    /// If the file does not exist, returns defaults.
    pub fn load() -> Result<Self> {
        let mut config = Self::load_from_file()?;
        config.apply_overrides(|key| std::env::var(key).ok());
        Ok(config)
    }

    /// Load from TOML file only, no env overrides.
    fn load_from_file() -> Result<Self> {
        let path = Self::config_path_with(|key| std::env::var(key).ok());
        match std::fs::read_to_string(&path) {
            Ok(contents) => {
                tracing::info!(path = %path.display(), "loading config from file");
                let config: BriefpostConfig =
                    toml::from_str(&contents).context("failed to parse config TOML")?;
                Ok(config)
            }
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => {
                tracing::info!("no config file found, using defaults");
                Ok(BriefpostConfig::default())
            }
            Err(e) => Err(anyhow::anyhow!("failed to read config file: {e}")),
        }
    }

    /// Resolve config path using a custom env resolver (for testing).
    fn config_path_with(env: impl Fn(&str) -> Option<String>) -> PathBuf {
        if let Some(p) = env("BRIEFPOST_CONFIG_PATH") {
            return PathBuf::from(p);
        }
        PathBuf::from("briefpost.toml")
    }

    /// Apply environment variable overrides (env > config > defaults).
    ///
    /// Takes a resolver function for testability (avoids unsafe `set_var`
    /// in tests).
    fn apply_overrides(&mut self, env: impl Fn(&str) -> Option<String>) {
        if let Some(v) = env("BRIEFPOST_API_KEY") {
            self.endpoint.api_key = v;
        }
        if let Some(v) = env("BRIEFPOST_IDENTIFIER") {
            self.endpoint.identifier = v;
        }
        if let Some(v) = env("BRIEFPOST_URL") {
            self.endpoint.url = v;
        }
        if let Some(v) = env("BRIEFPOST_LOGS_DIR") {
            self.paths.logs_dir = v;
        }
    }

    /// Parse a TOML string into config (for testing).
    pub fn from_toml(toml_str: &str) -> Result<Self> {
        let config: BriefpostConfig =
            toml::from_str(toml_str).context("failed to parse config TOML")?;
        Ok(config)
    }
}

/// Filesystem paths (`[paths]`).
#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct PathsConfig {
    /// Directory for rotated JSON log files.
    pub logs_dir: String,
}

impl Default for PathsConfig {
    fn default() -> Self {
        Self {
            logs_dir: "/tmp/briefpost-logs".to_string(),
        }
    }
}
