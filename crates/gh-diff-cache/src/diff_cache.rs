//! Run orchestration
//!
//! A [`DiffCache`] walks one run through
//! `Authenticated → DiffComputed → CacheConsulted → Done`: it diffs the commit
//! range, filters the changed files, compares them against the cached list
//! for the same patterns (pruned to files still in the tree) and, when some
//! files are new, saves the pruned list with the new files appended.

use crate::codec::SecretCodec;
use crate::config::CacheConfig;
use crate::context::{Repository, RunContext};
use crate::error::{DiffCacheError, Result};
use crate::filter::PatternFilter;
use crate::revision::{RevisionPair, TriggerEvent};
use crate::store::CacheStore;
use crate::tree;
use gh_client::{ChangedFile, GitHubClient};
use log::{debug, info};
use std::collections::HashSet;
use std::sync::Arc;

/// Progress of a [`DiffCache`] through its single run
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RunState {
    Authenticated,
    DiffComputed,
    CacheConsulted,
    Done,
}

/// Cache key of a pattern pair, e.g. `.ts_` for include `.ts` without exclude
pub fn cache_key(include: &str, exclude: &str) -> String {
    format!("{}_{}", include, exclude)
}

/// Split a cached value into its paths
pub fn split_paths(value: &str) -> Vec<String> {
    value.split_whitespace().map(str::to_string).collect()
}

/// What a completed run found and wrote
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct RunOutcome {
    pub key: String,
    /// Changed files matching the patterns, in diff order
    pub changed: Vec<String>,
    /// Cached files still present in the target tree
    pub cached: Vec<String>,
    /// Files this run added to the cache
    pub written: Vec<String>,
    /// Value saved under `key`, empty when nothing was saved
    pub stored: Vec<String>,
}

/// Incremental lint cache for one repository and commit range
#[derive(Debug)]
pub struct DiffCache {
    ctx: RunContext,
    store: CacheStore,
    state: RunState,
}

impl DiffCache {
    /// Authenticate with a token and prepare a run
    ///
    /// # Arguments
    ///
    /// * `token` - API token of the run
    /// * `repository` - Repository owning the cache secret
    /// * `event` - Triggering event, source of the commit range
    /// * `config` - Cache settings
    /// * `payload` - Current cache payload as exposed by the runner
    pub async fn access(
        token: String,
        repository: Repository,
        event: &TriggerEvent,
        config: &CacheConfig,
        payload: Option<String>,
    ) -> Result<Self> {
        let client = gh_client::create_client(token, Some(config.api_url.as_str()))
            .map_err(|e| DiffCacheError::AuthFailed(format!("{:#}", e)))?;
        Self::access_with_client(Arc::new(client), repository, event, config, payload).await
    }

    /// Prepare a run over an existing client
    ///
    /// Fetches the repository key, which doubles as the credential check.
    pub async fn access_with_client(
        client: Arc<dyn GitHubClient>,
        repository: Repository,
        event: &TriggerEvent,
        config: &CacheConfig,
        payload: Option<String>,
    ) -> Result<Self> {
        let revisions = event.revisions();
        info!("Diffing {} in {}", revisions.range(), repository);
        let ctx = RunContext::new(client, repository, revisions);

        let key = ctx
            .client()
            .fetch_public_key(ctx.owner(), ctx.repo())
            .await
            .map_err(|e| {
                DiffCacheError::AuthFailed(format!("cannot read repository key: {:#}", e))
            })?;
        debug!("Using repository key {}", key.key_id);
        let codec = SecretCodec::new(&key)?;

        let mut store = CacheStore::new(&config.secret_name, payload)
            .with_codec(codec)
            .with_corrupt_policy(config.on_corrupt_cache);
        if config.guard_concurrent_writes {
            store.enable_write_guard(&ctx).await?;
        }

        Ok(Self {
            ctx,
            store,
            state: RunState::Authenticated,
        })
    }

    pub fn context(&self) -> &RunContext {
        &self.ctx
    }

    pub fn revisions(&self) -> &RevisionPair {
        self.ctx.revisions()
    }

    pub fn state(&self) -> RunState {
        self.state
    }

    pub fn store(&self) -> &CacheStore {
        &self.store
    }

    async fn changed_files(&self) -> Result<Vec<ChangedFile>> {
        let revisions = self.ctx.revisions();
        self.ctx
            .client()
            .compare_commits(
                self.ctx.owner(),
                self.ctx.repo(),
                &revisions.source,
                &revisions.target,
            )
            .await
            .map_err(DiffCacheError::DiffUnavailable)
    }

    /// Changed files of the commit range matching the patterns, space-joined
    pub async fn diff(&self, include: &str, exclude: &str) -> Result<String> {
        let filter = PatternFilter::new(include, exclude)?;
        let files = self.changed_files().await?;
        Ok(filter.filter(&files))
    }

    /// Cached value for `key`, empty if nothing was cached yet
    pub fn load(&mut self, key: &str) -> Result<String> {
        self.store.load(key)
    }

    /// Cache `value` under `key` and upload the cache
    pub async fn save(&mut self, key: &str, value: &str) -> Result<()> {
        self.store.save(&self.ctx, key, value).await
    }

    /// Drop paths missing from the target revision
    pub async fn remove_files_not_present(&self, paths: Vec<String>) -> Vec<String> {
        tree::prune(&self.ctx, paths).await
    }

    /// Diff, consult the cache and save the files it has not seen
    pub async fn run(&mut self, include: &str, exclude: &str) -> Result<RunOutcome> {
        if self.state != RunState::Authenticated {
            return Err(DiffCacheError::AlreadyRun);
        }

        let filter = PatternFilter::new(include, exclude)?;
        let files = self.changed_files().await?;
        let changed: Vec<String> = filter
            .filter_paths(&files)
            .into_iter()
            .map(str::to_string)
            .collect();
        info!("{} of {} changed files match", changed.len(), files.len());
        self.state = RunState::DiffComputed;

        let key = cache_key(include, exclude);
        let cached = split_paths(&self.store.load(&key)?);
        debug!("{} files cached under {}", cached.len(), key);
        let cached = tree::prune(&self.ctx, cached).await;
        self.state = RunState::CacheConsulted;

        let seen: HashSet<&str> = cached.iter().map(String::as_str).collect();
        let written: Vec<String> = changed
            .iter()
            .filter(|path| !seen.contains(path.as_str()))
            .cloned()
            .collect();

        let stored = if written.is_empty() {
            info!("No new files for {}", key);
            Vec::new()
        } else {
            info!("Caching {} new files under {}", written.len(), key);
            let stored: Vec<String> = cached.iter().chain(&written).cloned().collect();
            self.store.save(&self.ctx, &key, &stored.join(" ")).await?;
            stored
        };
        self.state = RunState::Done;

        Ok(RunOutcome {
            key,
            changed,
            cached,
            written,
            stored,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_cache_key() {
        assert_eq!(cache_key(".ts", ""), ".ts_");
        assert_eq!(cache_key(".json", "-lock.json"), ".json_-lock.json");
        assert_ne!(cache_key("a_", "b"), cache_key("a", "b"));
    }

    #[test]
    fn test_split_paths() {
        assert_eq!(split_paths("HalfLife3.cpp 15k.py"), vec!["HalfLife3.cpp", "15k.py"]);
        assert!(split_paths("").is_empty());
        assert!(split_paths("  ").is_empty());
    }
}
