//! Cache store backed by a repository secret
//!
//! The whole cache lives in one secret. The runner exposes its decrypted
//! (still compressed) value to the workflow, the store decodes it on first
//! access and keeps the map in memory for the rest of the run. Every save
//! writes the full map back, so an interrupted run never leaves a partially
//! updated secret behind.

use crate::codec::{self, CacheMap, SecretCodec};
use crate::config::CorruptCachePolicy;
use crate::context::RunContext;
use crate::error::{DiffCacheError, Result};
use chrono::{DateTime, Utc};
use log::{debug, info, warn};

/// Environment variable the runner exposes the cache payload in
pub const CACHE_SECRET_ENV: &str = "CACHE_SECRET";

/// Last known `updated_at` of the secret, for detecting concurrent writers
#[derive(Debug, Clone)]
struct WriteGuard {
    known_version: Option<DateTime<Utc>>,
}

/// Lazily hydrated key-value cache persisted as a repository secret
#[derive(Debug)]
pub struct CacheStore {
    secret_name: String,
    payload: Option<String>,
    entries: Option<CacheMap>,
    dirty: bool,
    codec: Option<SecretCodec>,
    on_corrupt: CorruptCachePolicy,
    write_guard: Option<WriteGuard>,
    hydrations: usize,
}

impl CacheStore {
    /// Create a store over an already read payload
    ///
    /// # Arguments
    ///
    /// * `secret_name` - Secret saves are written to
    /// * `payload` - Compressed cache as exposed by the runner, if any
    pub fn new(secret_name: impl Into<String>, payload: Option<String>) -> Self {
        Self {
            secret_name: secret_name.into(),
            payload,
            entries: None,
            dirty: false,
            codec: None,
            on_corrupt: CorruptCachePolicy::default(),
            write_guard: None,
            hydrations: 0,
        }
    }

    /// Attach the repository key material needed for saving
    pub fn with_codec(mut self, codec: SecretCodec) -> Self {
        self.codec = Some(codec);
        self
    }

    pub fn with_corrupt_policy(mut self, policy: CorruptCachePolicy) -> Self {
        self.on_corrupt = policy;
        self
    }

    /// Reject saves if the secret changes after `known_version`
    pub fn with_write_guard(mut self, known_version: Option<DateTime<Utc>>) -> Self {
        self.write_guard = Some(WriteGuard { known_version });
        self
    }

    pub fn secret_name(&self) -> &str {
        &self.secret_name
    }

    /// Whether the in-memory map has changes not yet uploaded
    pub fn is_dirty(&self) -> bool {
        self.dirty
    }

    pub fn is_hydrated(&self) -> bool {
        self.entries.is_some()
    }

    fn hydrate(&mut self) -> Result<&mut CacheMap> {
        if self.entries.is_none() {
            let entries = match self.payload.as_deref().filter(|p| !p.trim().is_empty()) {
                None => {
                    debug!("No cache payload, starting with an empty cache");
                    CacheMap::new()
                }
                Some(payload) => match codec::open(payload) {
                    Ok(map) => {
                        info!("Loaded {} cache entries", map.len());
                        map
                    }
                    Err(e) => match self.on_corrupt {
                        CorruptCachePolicy::Discard => {
                            info!("{}; starting with an empty cache", e);
                            CacheMap::new()
                        }
                        CorruptCachePolicy::Fail => return Err(e),
                    },
                },
            };
            self.hydrations += 1;
            self.entries = Some(entries);
        }
        Ok(self.entries.get_or_insert_with(CacheMap::new))
    }

    /// Get the value stored under `key`, or an empty string
    pub fn load(&mut self, key: &str) -> Result<String> {
        Ok(self.hydrate()?.get(key).cloned().unwrap_or_default())
    }

    /// All entries of the cache
    pub fn entries(&mut self) -> Result<&CacheMap> {
        self.hydrate().map(|entries| &*entries)
    }

    /// Store `value` under `key` and upload the whole cache
    ///
    /// A save rejected before the upload leaves the map untouched. A failed
    /// upload keeps the value in memory and the store dirty.
    pub async fn save(&mut self, ctx: &RunContext, key: &str, value: &str) -> Result<()> {
        if self.codec.is_none() {
            return Err(DiffCacheError::NotAuthenticated);
        }

        if let Some(guard) = &self.write_guard {
            let current = self.remote_version(ctx).await?;
            if current > guard.known_version {
                return Err(DiffCacheError::ConcurrentWrite {
                    secret: self.secret_name.clone(),
                });
            }
        }

        self.hydrate()?.insert(key.to_string(), value.to_string());
        self.dirty = true;

        let codec = self.codec.as_ref().ok_or(DiffCacheError::NotAuthenticated)?;
        let entries = self.entries.as_ref().ok_or(DiffCacheError::NotAuthenticated)?;
        let sealed = codec.seal(entries)?;
        ctx.client()
            .put_secret(
                ctx.owner(),
                ctx.repo(),
                &self.secret_name,
                &sealed,
                codec.key_id(),
            )
            .await
            .map_err(|cause| DiffCacheError::CacheWriteFailed {
                secret: self.secret_name.clone(),
                cause,
            })?;
        self.dirty = false;
        info!("Saved {} cache entries to {}", entries.len(), self.secret_name);

        if self.write_guard.is_some() {
            match self.remote_version(ctx).await {
                Ok(version) => self.write_guard = Some(WriteGuard { known_version: version }),
                Err(e) => {
                    warn!("{}; concurrent write detection disabled for this run", e);
                    self.write_guard = None;
                }
            }
        }
        Ok(())
    }

    /// Guard writes against the secret's current remote version
    pub async fn enable_write_guard(&mut self, ctx: &RunContext) -> Result<()> {
        let known_version = self.remote_version(ctx).await?;
        debug!("Secret {} last updated at {:?}", self.secret_name, known_version);
        self.write_guard = Some(WriteGuard { known_version });
        Ok(())
    }

    async fn remote_version(&self, ctx: &RunContext) -> Result<Option<DateTime<Utc>>> {
        let metadata = ctx
            .client()
            .fetch_secret_metadata(ctx.owner(), ctx.repo(), &self.secret_name)
            .await
            .map_err(|cause| DiffCacheError::SecretQueryFailed {
                secret: self.secret_name.clone(),
                cause,
            })?;
        Ok(metadata.map(|m| m.updated_at))
    }
}
