//! Test doubles shared by the unit tests of this crate

use crate::context::{Repository, RunContext};
use crate::revision::RevisionPair;
use async_trait::async_trait;
use chrono::{DateTime, Utc};
use gh_client::{
    ChangedFile, GitHubClient, GitTree, RepoPublicKey, SecretMetadata, TreeEntry, WorkflowRun,
};
use std::sync::{Arc, Mutex};

/// A secret write recorded by [`MockClient`]
#[derive(Debug, Clone)]
pub struct SecretWrite {
    pub name: String,
    pub encrypted_value: String,
    pub key_id: String,
}

#[derive(Debug, Default)]
struct MockState {
    tree: Option<Vec<String>>,
    secret_updated_at: Option<DateTime<Utc>>,
    writes: Vec<SecretWrite>,
    tree_calls: usize,
}

/// Mock client for testing
#[derive(Debug, Clone, Default)]
pub struct MockClient {
    state: Arc<Mutex<MockState>>,
}

impl MockClient {
    /// Tree listing returned for any commit; `None` makes the query fail
    pub fn with_tree(self, paths: Option<&[&str]>) -> Self {
        self.state.lock().unwrap().tree =
            paths.map(|paths| paths.iter().map(|p| p.to_string()).collect());
        self
    }

    pub fn set_secret_updated_at(&self, updated_at: Option<DateTime<Utc>>) {
        self.state.lock().unwrap().secret_updated_at = updated_at;
    }

    pub fn writes(&self) -> Vec<SecretWrite> {
        self.state.lock().unwrap().writes.clone()
    }

    pub fn tree_calls(&self) -> usize {
        self.state.lock().unwrap().tree_calls
    }

    pub fn context(&self) -> RunContext {
        RunContext::new(
            Arc::new(self.clone()),
            Repository::new("owner", "repo"),
            RevisionPair::new("A", "B"),
        )
    }
}

#[async_trait]
impl GitHubClient for MockClient {
    async fn compare_commits(
        &self,
        _owner: &str,
        _repo: &str,
        _base: &str,
        _head: &str,
    ) -> anyhow::Result<Vec<ChangedFile>> {
        Ok(vec![])
    }

    async fn fetch_tree(&self, _owner: &str, _repo: &str, sha: &str) -> anyhow::Result<GitTree> {
        let mut state = self.state.lock().unwrap();
        state.tree_calls += 1;
        let paths = state
            .tree
            .clone()
            .ok_or_else(|| anyhow::anyhow!("tree listing unavailable"))?;
        Ok(GitTree {
            sha: sha.to_string(),
            tree: paths
                .into_iter()
                .map(|path| TreeEntry {
                    path,
                    kind: "blob".to_string(),
                })
                .collect(),
            truncated: false,
        })
    }

    async fn fetch_public_key(&self, _owner: &str, _repo: &str) -> anyhow::Result<RepoPublicKey> {
        Err(anyhow::anyhow!("not used by unit tests"))
    }

    async fn fetch_secret_metadata(
        &self,
        _owner: &str,
        _repo: &str,
        secret_name: &str,
    ) -> anyhow::Result<Option<SecretMetadata>> {
        let state = self.state.lock().unwrap();
        Ok(state.secret_updated_at.map(|updated_at| SecretMetadata {
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
        let mut state = self.state.lock().unwrap();
        state.writes.push(SecretWrite {
            name: secret_name.to_string(),
            encrypted_value: encrypted_value.to_string(),
            key_id: key_id.to_string(),
        });
        state.secret_updated_at = Some(Utc::now());
        Ok(())
    }

    async fn fetch_workflow_run(
        &self,
        _owner: &str,
        _repo: &str,
        _run_id: u64,
    ) -> anyhow::Result<WorkflowRun> {
        Err(anyhow::anyhow!("not used by unit tests"))
    }
}
