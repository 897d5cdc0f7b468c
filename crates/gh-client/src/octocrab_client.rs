//! Octocrab-based GitHub API client
//!
//! Direct implementation of the `GitHubClient` trait using the octocrab library.

use crate::client::GitHubClient;
use crate::types::{
    ChangedFile, CommitComparison, GitTree, RepoPublicKey, SecretMetadata, WorkflowRun,
};
use async_trait::async_trait;
use log::debug;
use octocrab::models::repos::secrets::CreateRepositorySecret;
use octocrab::Octocrab;
use std::sync::Arc;

/// Direct GitHub API client using octocrab
#[derive(Debug, Clone)]
pub struct OctocrabClient {
    octocrab: Arc<Octocrab>,
}

impl OctocrabClient {
    /// Create a new client with the given octocrab instance
    pub fn new(octocrab: Arc<Octocrab>) -> Self {
        Self { octocrab }
    }

    /// Get a reference to the underlying octocrab instance
    pub fn octocrab(&self) -> &Octocrab {
        &self.octocrab
    }
}

#[async_trait]
impl GitHubClient for OctocrabClient {
    async fn compare_commits(
        &self,
        owner: &str,
        repo: &str,
        base: &str,
        head: &str,
    ) -> anyhow::Result<Vec<ChangedFile>> {
        debug!("Comparing {}...{} in {}/{}", base, head, owner, repo);

        // Slim DTO, only `files[].filename` is read
        let route = format!("/repos/{}/{}/compare/{}...{}", owner, repo, base, head);
        let comparison: CommitComparison = self.octocrab.get(route, None::<&()>).await?;

        let files = comparison.files.unwrap_or_default();
        debug!("{} files changed between {} and {}", files.len(), base, head);
        Ok(files)
    }

    async fn fetch_tree(&self, owner: &str, repo: &str, sha: &str) -> anyhow::Result<GitTree> {
        debug!("Fetching tree for {}/{} @ {}", owner, repo, sha);

        let route = format!("/repos/{}/{}/git/trees/{}", owner, repo, sha);
        let tree: GitTree = self
            .octocrab
            .get(route, Some(&[("recursive", "1")]))
            .await?;

        debug!("Tree {} has {} entries", tree.sha, tree.tree.len());
        Ok(tree)
    }

    async fn fetch_public_key(&self, owner: &str, repo: &str) -> anyhow::Result<RepoPublicKey> {
        debug!("Fetching secrets public key for {}/{}", owner, repo);

        let route = format!("/repos/{}/{}/actions/secrets/public-key", owner, repo);
        let key: RepoPublicKey = self.octocrab.get(route, None::<&()>).await?;
        Ok(key)
    }

    async fn fetch_secret_metadata(
        &self,
        owner: &str,
        repo: &str,
        secret_name: &str,
    ) -> anyhow::Result<Option<SecretMetadata>> {
        debug!("Fetching metadata of secret {} in {}/{}", secret_name, owner, repo);

        let route = format!("/repos/{}/{}/actions/secrets/{}", owner, repo, secret_name);
        match self.octocrab.get::<SecretMetadata, _, _>(route, None::<&()>).await {
            Ok(metadata) => Ok(Some(metadata)),
            Err(octocrab::Error::GitHub { source, .. }) if source.status_code.as_u16() == 404 => {
                debug!("Secret {} does not exist yet", secret_name);
                Ok(None)
            }
            Err(e) => Err(e.into()),
        }
    }

    async fn put_secret(
        &self,
        owner: &str,
        repo: &str,
        secret_name: &str,
        encrypted_value: &str,
        key_id: &str,
    ) -> anyhow::Result<()> {
        debug!("Writing secret {} in {}/{}", secret_name, owner, repo);

        let response = self
            .octocrab
            .repos(owner, repo)
            .secrets()
            .create_or_update_secret(
                secret_name,
                &CreateRepositorySecret {
                    key_id,
                    encrypted_value,
                },
            )
            .await?;

        debug!("Secret {} written: {:?}", secret_name, response);
        Ok(())
    }

    async fn fetch_workflow_run(
        &self,
        owner: &str,
        repo: &str,
        run_id: u64,
    ) -> anyhow::Result<WorkflowRun> {
        debug!("Fetching workflow run {} for {}/{}", run_id, owner, repo);

        let route = format!("/repos/{}/{}/actions/runs/{}", owner, repo, run_id);
        let run: WorkflowRun = self.octocrab.get(route, None::<&()>).await?;
        Ok(run)
    }
}
