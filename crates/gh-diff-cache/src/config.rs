//! Diff cache configuration
//!
//! Settings are read from `.gh-diff-cache.toml` (current directory first,
//! then the home directory) and then overridden by environment variables.

use crate::error::{DiffCacheError, Result};
use serde::{Deserialize, Serialize};
use std::path::PathBuf;
use std::str::FromStr;

const CONFIG_FILE: &str = ".gh-diff-cache.toml";

/// Secret written when `CACHE_SECRET_NAME` is not set
pub const DEFAULT_SECRET_NAME: &str = "DIFF_CACHE";

/// What to do when the cache payload cannot be decoded
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum CorruptCachePolicy {
    /// Start over with an empty cache
    #[default]
    Discard,
    /// Abort the run
    Fail,
}

impl FromStr for CorruptCachePolicy {
    type Err = DiffCacheError;

    fn from_str(s: &str) -> Result<Self> {
        match s.trim().to_lowercase().as_str() {
            "discard" => Ok(Self::Discard),
            "fail" => Ok(Self::Fail),
            other => Err(DiffCacheError::Config(format!(
                "unknown corrupt cache policy `{}` (expected `discard` or `fail`)",
                other
            ))),
        }
    }
}

/// Diff cache configuration
#[derive(Debug, Serialize, Deserialize, Clone, PartialEq, Eq)]
pub struct CacheConfig {
    /// Repository secret holding the cache
    #[serde(default = "default_secret_name")]
    pub secret_name: String,

    /// Handling of an undecodable cache payload
    #[serde(default)]
    pub on_corrupt_cache: CorruptCachePolicy,

    /// Reject saves when another run updated the secret in the meantime
    #[serde(default)]
    pub guard_concurrent_writes: bool,

    /// GitHub API base URL
    #[serde(default = "default_api_url")]
    pub api_url: String,
}

fn default_secret_name() -> String {
    DEFAULT_SECRET_NAME.to_string()
}

fn default_api_url() -> String {
    gh_client::DEFAULT_API_URL.to_string()
}

impl Default for CacheConfig {
    fn default() -> Self {
        Self {
            secret_name: default_secret_name(),
            on_corrupt_cache: CorruptCachePolicy::default(),
            guard_concurrent_writes: false,
            api_url: default_api_url(),
        }
    }
}

impl CacheConfig {
    /// Load config from file (if any), then apply environment overrides
    pub fn load() -> Result<Self> {
        let mut config = match load_config_file() {
            Some(content) => match Self::from_toml(&content) {
                Ok(config) => {
                    log::info!("Loaded diff cache config from file");
                    config
                }
                Err(e) => {
                    log::warn!("Failed to parse config file: {}", e);
                    Self::default()
                }
            },
            None => {
                log::debug!("Using default diff cache config");
                Self::default()
            }
        };

        config.apply_overrides(|key| std::env::var(key).ok())?;
        Ok(config)
    }

    /// Parse a config from TOML content
    pub fn from_toml(content: &str) -> Result<Self> {
        toml::from_str(content).map_err(|e| DiffCacheError::Config(e.to_string()))
    }

    /// Apply overrides from a variable lookup (the process environment in production)
    ///
    /// Empty values are ignored so that unset action inputs keep the defaults.
    pub fn apply_overrides<F>(&mut self, lookup: F) -> Result<()>
    where
        F: Fn(&str) -> Option<String>,
    {
        let lookup = |key: &str| lookup(key).filter(|v| !v.trim().is_empty());

        if let Some(name) = lookup("CACHE_SECRET_NAME") {
            self.secret_name = name.trim().to_string();
        }
        if let Some(policy) = lookup("INPUT_ON_CORRUPT_CACHE") {
            self.on_corrupt_cache = policy.parse()?;
        }
        if let Some(guard) = lookup("INPUT_GUARD_CONCURRENT_WRITES") {
            self.guard_concurrent_writes = parse_bool(&guard)?;
        }
        if let Some(url) = lookup("GITHUB_API_URL") {
            self.api_url = url.trim().to_string();
        }
        Ok(())
    }
}

/// Booleans as GitHub Actions inputs spell them
fn parse_bool(value: &str) -> Result<bool> {
    match value.trim().to_lowercase().as_str() {
        "true" | "yes" | "1" => Ok(true),
        "false" | "no" | "0" => Ok(false),
        other => Err(DiffCacheError::Config(format!(
            "expected a boolean, got `{}`",
            other
        ))),
    }
}

/// Load config file content from CWD first, then home directory
fn load_config_file() -> Option<String> {
    if let Ok(content) = std::fs::read_to_string(CONFIG_FILE) {
        log::debug!("Loaded config from {}", CONFIG_FILE);
        return Some(content);
    }

    let home_config = std::env::var_os("HOME").map(|home| PathBuf::from(home).join(CONFIG_FILE))?;
    match std::fs::read_to_string(&home_config) {
        Ok(content) => {
            log::debug!("Loaded config from {}", home_config.display());
            Some(content)
        }
        Err(_) => None,
    }
}
