//! GitHub API data transfer objects
//!
//! These types represent the data returned from the GitHub API.
//! They only carry the fields the diff cache reads.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// A file entry of a commit comparison
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ChangedFile {
    /// Path of the file relative to the repository root
    pub filename: String,
}

impl ChangedFile {
    pub fn new(filename: impl Into<String>) -> Self {
        Self {
            filename: filename.into(),
        }
    }
}

/// Response of `GET /repos/{owner}/{repo}/compare/{basehead}`
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct CommitComparison {
    /// Changed files; GitHub omits the field when nothing changed
    #[serde(default)]
    pub files: Option<Vec<ChangedFile>>,
}

/// Response of `GET /repos/{owner}/{repo}/git/trees/{sha}`
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct GitTree {
    pub sha: String,

    /// Tree entries (blobs, subtrees and submodules)
    #[serde(default)]
    pub tree: Vec<TreeEntry>,

    /// Set when GitHub cut the listing short
    #[serde(default)]
    pub truncated: bool,
}

impl GitTree {
    /// Paths of all blobs (regular files) in the tree
    pub fn blob_paths(&self) -> impl Iterator<Item = &str> {
        self.tree
            .iter()
            .filter(|entry| entry.kind == "blob")
            .map(|entry| entry.path.as_str())
    }
}

/// A single entry of a git tree
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct TreeEntry {
    pub path: String,

    /// Entry type: "blob", "tree" or "commit"
    #[serde(rename = "type")]
    pub kind: String,
}

/// Repository public key for sealing Actions secrets
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct RepoPublicKey {
    /// Id that must accompany values sealed with this key
    pub key_id: String,

    /// Base64 encoded X25519 public key
    pub key: String,
}

/// Metadata of a repository secret (the value itself is never readable)
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SecretMetadata {
    pub name: String,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

/// A GitHub Actions workflow run
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct WorkflowRun {
    /// Workflow run ID
    pub id: u64,
    /// Name of the workflow
    #[serde(default)]
    pub name: Option<String>,
    /// API URL of the workflow definition
    pub workflow_url: String,
    /// Path of the workflow file (e.g. ".github/workflows/lint.yml")
    #[serde(default)]
    pub path: Option<String>,
}
