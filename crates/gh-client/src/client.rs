//! GitHub client trait
//!
//! This module defines the core `GitHubClient` trait that all client
//! implementations must satisfy.

use crate::types::{ChangedFile, GitTree, RepoPublicKey, SecretMetadata, WorkflowRun};
use async_trait::async_trait;

/// GitHub API client trait
///
/// Defines the interface for interacting with the GitHub API.
/// Implementations can be direct (hitting the API) or test doubles
/// that record the calls made against them.
///
/// # Thread Safety
///
/// Implementations must be `Send + Sync` to allow sharing across
/// async tasks and threads.
///
/// # Example
///
/// ```rust,ignore
/// use gh_client::GitHubClient;
///
/// async fn changed(client: &dyn GitHubClient) -> anyhow::Result<usize> {
///     Ok(client.compare_commits("rust-lang", "rust", "abc", "def").await?.len())
/// }
/// ```
#[async_trait]
pub trait GitHubClient: Send + Sync {
    /// Compare two commits and list the files that changed between them
    ///
    /// # Arguments
    ///
    /// * `owner` - Repository owner (user or organization)
    /// * `repo` - Repository name
    /// * `base` - Commit the range starts at
    /// * `head` - Commit the range ends at
    ///
    /// # Returns
    ///
    /// The changed files in the order GitHub reports them. A comparison
    /// without a `files` field (identical revisions) yields an empty list.
    async fn compare_commits(
        &self,
        owner: &str,
        repo: &str,
        base: &str,
        head: &str,
    ) -> anyhow::Result<Vec<ChangedFile>>;

    /// Fetch the recursive git tree of a commit
    ///
    /// # Arguments
    ///
    /// * `owner` - Repository owner
    /// * `repo` - Repository name
    /// * `sha` - Commit (or tree) SHA to list
    async fn fetch_tree(&self, owner: &str, repo: &str, sha: &str) -> anyhow::Result<GitTree>;

    /// Fetch the public key used to encrypt repository secrets
    async fn fetch_public_key(&self, owner: &str, repo: &str) -> anyhow::Result<RepoPublicKey>;

    /// Fetch metadata of a repository secret
    ///
    /// # Returns
    ///
    /// `None` if the secret does not exist yet.
    async fn fetch_secret_metadata(
        &self,
        owner: &str,
        repo: &str,
        secret_name: &str,
    ) -> anyhow::Result<Option<SecretMetadata>>;

    /// Create or update a repository secret
    ///
    /// # Arguments
    ///
    /// * `owner` - Repository owner
    /// * `repo` - Repository name
    /// * `secret_name` - Name of the secret
    /// * `encrypted_value` - Base64 sealed box of the secret value
    /// * `key_id` - Id of the public key the value was sealed with
    async fn put_secret(
        &self,
        owner: &str,
        repo: &str,
        secret_name: &str,
        encrypted_value: &str,
        key_id: &str,
    ) -> anyhow::Result<()>;

    /// Fetch a GitHub Actions workflow run
    async fn fetch_workflow_run(
        &self,
        owner: &str,
        repo: &str,
        run_id: u64,
    ) -> anyhow::Result<WorkflowRun>;
}
