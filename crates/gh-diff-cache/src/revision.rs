//! Commit range resolution from the triggering event
//!
//! Pull requests compare the base commit against the head commit, pushes
//! compare the commit before the push against the commit after it.

use crate::error::{DiffCacheError, Result};
use serde::Deserialize;

/// The commit range a run diffs
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RevisionPair {
    pub source: String,
    pub target: String,
}

impl RevisionPair {
    pub fn new(source: impl Into<String>, target: impl Into<String>) -> Self {
        Self {
            source: source.into(),
            target: target.into(),
        }
    }

    /// Three-dot range as used by the compare endpoint
    pub fn range(&self) -> String {
        format!("{}...{}", self.source, self.target)
    }
}

#[derive(Debug, Clone, Deserialize)]
pub struct CommitRef {
    pub sha: String,
}

#[derive(Debug, Clone, Deserialize)]
pub struct PullRequestRefs {
    pub base: CommitRef,
    pub head: CommitRef,
}

/// Payload of a `pull_request` event
#[derive(Debug, Clone, Deserialize)]
pub struct PullRequestEvent {
    pub pull_request: PullRequestRefs,
}

/// Payload of a `push` event
#[derive(Debug, Clone, Deserialize)]
pub struct PushEvent {
    pub before: String,
    pub after: String,
}

/// Events a run can be triggered by
#[derive(Debug, Clone)]
pub enum TriggerEvent {
    PullRequest(PullRequestEvent),
    Push(PushEvent),
}

impl TriggerEvent {
    /// Parse the event from its name (`GITHUB_EVENT_NAME`) and JSON payload
    pub fn from_payload(event_name: &str, payload: &str) -> Result<Self> {
        let invalid = |source| DiffCacheError::InvalidEventPayload {
            event: event_name.to_string(),
            source,
        };

        match event_name {
            "pull_request" => serde_json::from_str(payload)
                .map(TriggerEvent::PullRequest)
                .map_err(invalid),
            "push" => serde_json::from_str(payload)
                .map(TriggerEvent::Push)
                .map_err(invalid),
            other => Err(DiffCacheError::UnsupportedEventKind(other.to_string())),
        }
    }

    pub fn revisions(&self) -> RevisionPair {
        match self {
            TriggerEvent::PullRequest(event) => RevisionPair::new(
                &event.pull_request.base.sha,
                &event.pull_request.head.sha,
            ),
            TriggerEvent::Push(event) => RevisionPair::new(&event.before, &event.after),
        }
    }
}

/// Resolve the commit range of an event in one step
pub fn resolve_revisions(event_name: &str, payload: &str) -> Result<RevisionPair> {
    TriggerEvent::from_payload(event_name, payload).map(|event| event.revisions())
}
