//! Incremental lint cache for GitHub Actions
//!
//! Determines which files changed between two commits, filters them by an
//! include and an optional exclude pattern, and remembers the files already
//! seen for a pattern pair in an encrypted repository secret.
//!
//! # Architecture
//!
//! ```text
//! TriggerEvent ──► RevisionPair ──► compare ──► PatternFilter
//!                                                    │
//!                      CacheStore.load ◄─────────────┘
//!                             │
//!                      tree::prune ──► delta ──► CacheStore.save
//! ```
//!
//! [`DiffCache`] drives these steps for one run.
//!
//! # Example
//!
//! ```rust,no_run
//! use gh_diff_cache::{CacheConfig, DiffCache, Repository, TriggerEvent};
//!
//! # async fn example(payload: &str) -> gh_diff_cache::Result<()> {
//! let event = TriggerEvent::from_payload("push", payload)?;
//! let repository: Repository = "octo-org/lint-action".parse()?;
//! let config = CacheConfig::load()?;
//!
//! let mut cache = DiffCache::access(
//!     "token".to_string(),
//!     repository,
//!     &event,
//!     &config,
//!     std::env::var("CACHE_SECRET").ok(),
//! )
//! .await?;
//! let outcome = cache.run(r"\.ts$", "").await?;
//! println!("new files: {}", outcome.written.join(" "));
//! # Ok(())
//! # }
//! ```

pub mod codec;
pub mod config;
pub mod context;
pub mod diff_cache;
pub mod error;
pub mod filter;
pub mod revision;
pub mod store;
pub mod tree;

#[cfg(test)]
mod test_utils;

pub use codec::{CacheMap, SecretCodec};
pub use config::{CacheConfig, CorruptCachePolicy};
pub use context::{Repository, RunContext};
pub use diff_cache::{cache_key, DiffCache, RunOutcome, RunState};
pub use error::{DiffCacheError, Result};
pub use filter::{filter_with_regex, PatternFilter};
pub use revision::{resolve_revisions, RevisionPair, TriggerEvent};
pub use store::CacheStore;
