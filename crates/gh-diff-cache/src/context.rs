//! Per-run context shared by the cache components

use crate::error::{DiffCacheError, Result};
use crate::revision::RevisionPair;
use gh_client::GitHubClient;
use std::fmt;
use std::str::FromStr;
use std::sync::Arc;

/// A GitHub repository as `owner/name`
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Repository {
    pub owner: String,
    pub name: String,
}

impl Repository {
    pub fn new(owner: impl Into<String>, name: impl Into<String>) -> Self {
        Self {
            owner: owner.into(),
            name: name.into(),
        }
    }
}

impl FromStr for Repository {
    type Err = DiffCacheError;

    fn from_str(s: &str) -> Result<Self> {
        match s.trim().split_once('/') {
            Some((owner, name)) if !owner.is_empty() && !name.is_empty() && !name.contains('/') => {
                Ok(Self::new(owner, name))
            }
            _ => Err(DiffCacheError::Config(format!(
                "repository must be `owner/name`, got `{}`",
                s
            ))),
        }
    }
}

impl fmt::Display for Repository {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}/{}", self.owner, self.name)
    }
}

/// Everything a run needs to talk to GitHub
///
/// Built once by [`crate::DiffCache`] and handed by reference to the store
/// and the tree filter.
#[derive(Clone)]
pub struct RunContext {
    client: Arc<dyn GitHubClient>,
    repository: Repository,
    revisions: RevisionPair,
}

impl RunContext {
    pub fn new(
        client: Arc<dyn GitHubClient>,
        repository: Repository,
        revisions: RevisionPair,
    ) -> Self {
        Self {
            client,
            repository,
            revisions,
        }
    }

    pub fn client(&self) -> &dyn GitHubClient {
        self.client.as_ref()
    }

    pub fn repository(&self) -> &Repository {
        &self.repository
    }

    pub fn owner(&self) -> &str {
        &self.repository.owner
    }

    pub fn repo(&self) -> &str {
        &self.repository.name
    }

    pub fn revisions(&self) -> &RevisionPair {
        &self.revisions
    }
}

impl fmt::Debug for RunContext {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("RunContext")
            .field("repository", &self.repository)
            .field("revisions", &self.revisions)
            .finish_non_exhaustive()
    }
}
