//! GitHub API client for the diff cache
//!
//! This crate provides a trait-based GitHub API client covering the handful
//! of endpoints the diff cache talks to: commit comparison, git trees,
//! repository secrets and workflow runs.
//!
//! # Architecture
//!
//! ```text
//! ┌─────────────────────────────────────────────────┐
//! │              GitHubClient trait                  │
//! │  - compare_commits()                             │
//! │  - fetch_tree()                                  │
//! │  - fetch_public_key() / put_secret()             │
//! └─────────────────────────────────────────────────┘
//!                        │
//!        ┌───────────────┴───────────────┐
//!        ▼                               ▼
//! ┌─────────────────┐         ┌─────────────────────┐
//! │ OctocrabClient  │         │ test doubles        │
//! │ (direct API)    │         │ (MockClient)        │
//! └─────────────────┘         └─────────────────────┘
//! ```
//!
//! # Example
//!
//! ```rust,no_run
//! use gh_client::{GitHubClient, OctocrabClient};
//! use std::sync::Arc;
//!
//! # async fn example() -> anyhow::Result<()> {
//! let octocrab = octocrab::Octocrab::builder()
//!     .personal_token("token".to_string())
//!     .build()?;
//!
//! let client = OctocrabClient::new(Arc::new(octocrab));
//! let files = client.compare_commits("owner", "repo", "abc", "def").await?;
//! # Ok(())
//! # }
//! ```

pub mod client;
pub mod client_manager;
pub mod octocrab_client;
pub mod types;

/// Default GitHub API endpoint (public GitHub)
pub const DEFAULT_API_URL: &str = "https://api.github.com";

pub use client::GitHubClient;
pub use client_manager::{create_client, TokenResolver};
pub use octocrab_client::OctocrabClient;
pub use types::{
    ChangedFile, CommitComparison, GitTree, RepoPublicKey, SecretMetadata, TreeEntry, WorkflowRun,
};

// Re-export octocrab so consumers don't need to depend on it directly
pub use octocrab;
