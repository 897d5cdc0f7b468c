//! Action inputs from the runner environment

use anyhow::{bail, Context, Result};
use gh_diff_cache::{Repository, TriggerEvent};
use std::path::PathBuf;

/// Everything the action reads from its environment, except secrets
#[derive(Debug, Clone)]
pub struct ActionInputs {
    pub include: String,
    pub exclude: String,
    pub repository: Repository,
    pub event_name: String,
    pub event_path: PathBuf,
    pub run_id: Option<u64>,
}

impl ActionInputs {
    pub fn from_env() -> Result<Self> {
        Self::from_lookup(|key| std::env::var(key).ok())
    }

    /// Read inputs through `lookup`, the process environment in production
    pub fn from_lookup<F>(lookup: F) -> Result<Self>
    where
        F: Fn(&str) -> Option<String>,
    {
        let required = |key: &str| {
            lookup(key)
                .filter(|v| !v.trim().is_empty())
                .with_context(|| format!("{} is not set", key))
        };

        let include = required("INPUT_INCLUDE").context("Input `include` is required")?;
        let exclude = lookup("INPUT_EXCLUDE").unwrap_or_default();
        let repository = required("GITHUB_REPOSITORY")?.parse()?;
        let event_name = required("GITHUB_EVENT_NAME")?;
        let event_path = PathBuf::from(required("GITHUB_EVENT_PATH")?);

        let run_id = match lookup("GITHUB_RUN_ID").filter(|v| !v.trim().is_empty()) {
            Some(id) => match id.trim().parse() {
                Ok(id) => Some(id),
                Err(_) => bail!("GITHUB_RUN_ID is not a number: {}", id),
            },
            None => None,
        };

        Ok(Self {
            include,
            exclude,
            repository,
            event_name,
            event_path,
            run_id,
        })
    }

    /// Parse the payload file of the triggering event
    pub fn read_event(&self) -> Result<TriggerEvent> {
        let payload = std::fs::read_to_string(&self.event_path).with_context(|| {
            format!("Failed to read event payload {}", self.event_path.display())
        })?;
        Ok(TriggerEvent::from_payload(&self.event_name, &payload)?)
    }
}
