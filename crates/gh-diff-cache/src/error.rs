//! Error types of the diff cache

use thiserror::Error;

/// Errors that can occur while diffing, filtering or caching
///
/// API failures arrive as `anyhow::Error` from the client layer and are
/// rendered with their full cause chain.
#[derive(Error, Debug)]
pub enum DiffCacheError {
    /// Bad token, unreachable API or unusable repository key
    #[error("Authentication failed: {0}")]
    AuthFailed(String),

    /// The workflow was triggered by an event that carries no commit range
    #[error("Unsupported event kind: {0}")]
    UnsupportedEventKind(String),

    #[error("Invalid {event} event payload: {source}")]
    InvalidEventPayload {
        event: String,
        #[source]
        source: serde_json::Error,
    },

    #[error("Invalid pattern `{pattern}`: {source}")]
    InvalidPattern {
        pattern: String,
        #[source]
        source: regex::Error,
    },

    #[error("Unable to check staged files: {0:#}")]
    DiffUnavailable(anyhow::Error),

    /// The cache payload could not be decoded
    #[error("Cache payload is corrupt: {0}")]
    CacheCorrupt(String),

    /// A save was attempted without repository key material
    #[error("Cannot write the cache before authenticating")]
    NotAuthenticated,

    #[error("Failed to list tree of {sha}: {cause:#}")]
    TreeQueryFailed { sha: String, cause: anyhow::Error },

    #[error("Failed to seal cache payload: {0}")]
    Seal(String),

    #[error("Failed to write secret {secret}: {cause:#}")]
    CacheWriteFailed {
        secret: String,
        cause: anyhow::Error,
    },

    #[error("Failed to read metadata of secret {secret}: {cause:#}")]
    SecretQueryFailed {
        secret: String,
        cause: anyhow::Error,
    },

    /// Another run updated the secret after this run loaded it
    #[error("Secret {secret} was updated by another run since it was loaded")]
    ConcurrentWrite { secret: String },

    #[error("This diff cache already completed its run")]
    AlreadyRun,

    #[error("Invalid configuration: {0}")]
    Config(String),
}

pub type Result<T> = std::result::Result<T, DiffCacheError>;
