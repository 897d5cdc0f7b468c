//! Scripted GitHub backend for the run scenarios

#![allow(dead_code)]

use async_trait::async_trait;
use base64::engine::general_purpose::STANDARD;
use base64::Engine as _;
use chrono::{DateTime, Utc};
use crypto_box::aead::OsRng;
use crypto_box::SecretKey;
use gh_client::{
    ChangedFile, GitHubClient, GitTree, RepoPublicKey, SecretMetadata, TreeEntry, WorkflowRun,
};
use gh_diff_cache::{CacheConfig, DiffCache, Repository, TriggerEvent};
use std::sync::{Arc, Mutex};

pub const KEY_ID: &str = "568250167242549743";

#[derive(Debug, Default)]
struct Backend {
    changed: Vec<String>,
    tree: Vec<String>,
    fail_compare: bool,
    fail_tree: bool,
    fail_public_key: bool,
    secret_updated_at: Option<DateTime<Utc>>,
    writes: Vec<(String, String)>,
    compared: Vec<(String, String)>,
    tree_calls: usize,
}

/// In-memory repository with a real secrets key pair
#[derive(Clone)]
pub struct MockGitHub {
    backend: Arc<Mutex<Backend>>,
    secret_key: SecretKey,
}

impl MockGitHub {
    pub fn new(changed: &[&str], tree: &[&str]) -> Self {
        let backend = Backend {
            changed: changed.iter().map(|p| p.to_string()).collect(),
            tree: tree.iter().map(|p| p.to_string()).collect(),
            ..Default::default()
        };
        Self {
            backend: Arc::new(Mutex::new(backend)),
            secret_key: SecretKey::generate(&mut OsRng),
        }
    }

    pub fn fail_compare(&self) {
        self.backend.lock().unwrap().fail_compare = true;
    }

    pub fn fail_tree(&self) {
        self.backend.lock().unwrap().fail_tree = true;
    }

    pub fn fail_public_key(&self) {
        self.backend.lock().unwrap().fail_public_key = true;
    }

    pub fn set_tree(&self, tree: &[&str]) {
        self.backend.lock().unwrap().tree = tree.iter().map(|p| p.to_string()).collect();
    }

    /// Simulate another run writing the secret
    pub fn touch_secret(&self) {
        self.backend.lock().unwrap().secret_updated_at = Some(Utc::now());
    }

    pub fn compare_calls(&self) -> usize {
        self.backend.lock().unwrap().compared.len()
    }

    /// `(base, head)` of every compare request
    pub fn compared(&self) -> Vec<(String, String)> {
        self.backend.lock().unwrap().compared.clone()
    }

    pub fn tree_calls(&self) -> usize {
        self.backend.lock().unwrap().tree_calls
    }

    pub fn save_count(&self) -> usize {
        self.backend.lock().unwrap().writes.len()
    }

    pub fn set_changed(&self, changed: &[&str]) {
        self.backend.lock().unwrap().changed = changed.iter().map(|p| p.to_string()).collect();
    }

    /// Secret names and decrypted values of all writes, oldest first
    pub fn decrypted_writes(&self) -> Vec<(String, String)> {
        let writes = self.backend.lock().unwrap().writes.clone();
        writes
            .into_iter()
            .map(|(name, sealed)| {
                let bytes = self
                    .secret_key
                    .unseal(&STANDARD.decode(sealed).unwrap())
                    .unwrap();
                (name, String::from_utf8(bytes).unwrap())
            })
            .collect()
    }

    /// The payload the runner would expose as `CACHE_SECRET` on the next run
    pub fn exposed_payload(&self) -> Option<String> {
        self.decrypted_writes().pop().map(|(_, value)| value)
    }
}

#[async_trait]
impl GitHubClient for MockGitHub {
    async fn compare_commits(
        &self,
        _owner: &str,
        _repo: &str,
        base: &str,
        head: &str,
    ) -> anyhow::Result<Vec<ChangedFile>> {
        let mut backend = self.backend.lock().unwrap();
        backend.compared.push((base.to_string(), head.to_string()));
        if backend.fail_compare {
            anyhow::bail!("HTTP 502 Bad Gateway");
        }
        Ok(backend.changed.iter().map(ChangedFile::new).collect())
    }

    async fn fetch_tree(&self, _owner: &str, _repo: &str, sha: &str) -> anyhow::Result<GitTree> {
        let mut backend = self.backend.lock().unwrap();
        backend.tree_calls += 1;
        if backend.fail_tree {
            anyhow::bail!("HTTP 409 Git Repository is empty");
        }
        Ok(GitTree {
            sha: sha.to_string(),
            tree: backend
                .tree
                .iter()
                .map(|path| TreeEntry {
                    path: path.clone(),
                    kind: "blob".to_string(),
                })
                .collect(),
            truncated: false,
        })
    }

    async fn fetch_public_key(&self, _owner: &str, _repo: &str) -> anyhow::Result<RepoPublicKey> {
        if self.backend.lock().unwrap().fail_public_key {
            anyhow::bail!("HTTP 401 Bad credentials");
        }
        Ok(RepoPublicKey {
            key_id: KEY_ID.to_string(),
            key: STANDARD.encode(self.secret_key.public_key().as_bytes()),
        })
    }

    async fn fetch_secret_metadata(
        &self,
        _owner: &str,
        _repo: &str,
        secret_name: &str,
    ) -> anyhow::Result<Option<SecretMetadata>> {
        let backend = self.backend.lock().unwrap();
        Ok(backend.secret_updated_at.map(|updated_at| SecretMetadata {
            name: secret_name.to_string(),
            created_at: updated_at,
            updated_at,
        }))
    }

    async fn put_secret(
        &self,
        _owner: &str,
        _repo: &str,
        secret_name: &str,
        encrypted_value: &str,
        key_id: &str,
    ) -> anyhow::Result<()> {
        anyhow::ensure!(key_id == KEY_ID, "unknown key id {}", key_id);
        let mut backend = self.backend.lock().unwrap();
        backend
            .writes
            .push((secret_name.to_string(), encrypted_value.to_string()));
        backend.secret_updated_at = Some(Utc::now());
        Ok(())
    }

    async fn fetch_workflow_run(
        &self,
        _owner: &str,
        _repo: &str,
        run_id: u64,
    ) -> anyhow::Result<WorkflowRun> {
        Ok(WorkflowRun {
            id: run_id,
            name: Some("Lint".to_string()),
            workflow_url: "https://api.github.com/repos/owner/repo/actions/workflows/1".to_string(),
            path: Some(".github/workflows/lint.yml".to_string()),
        })
    }
}

pub fn push_event(before: &str, after: &str) -> TriggerEvent {
    let payload = format!(r#"{{"before": "{}", "after": "{}"}}"#, before, after);
    TriggerEvent::from_payload("push", &payload).unwrap()
}

pub fn pull_request_event(base: &str, head: &str) -> TriggerEvent {
    let payload = format!(
        r#"{{"action": "opened", "pull_request": {{"base": {{"sha": "{}"}}, "head": {{"sha": "{}"}}}}}}"#,
        base, head
    );
    TriggerEvent::from_payload("pull_request", &payload).unwrap()
}

/// Prepare a run of `mock` for `event`
pub async fn access_event(
    mock: &MockGitHub,
    event: &TriggerEvent,
    config: &CacheConfig,
    payload: Option<String>,
) -> gh_diff_cache::Result<DiffCache> {
    DiffCache::access_with_client(
        Arc::new(mock.clone()),
        Repository::new("owner", "repo"),
        event,
        config,
        payload,
    )
    .await
}

/// Prepare a run of `mock` for a push from `A` to `B`
pub async fn access(
    mock: &MockGitHub,
    config: &CacheConfig,
    payload: Option<String>,
) -> gh_diff_cache::Result<DiffCache> {
    access_event(mock, &push_event("A", "B"), config, payload).await
}
