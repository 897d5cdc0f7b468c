//! Cache payload encoding
//!
//! The cache map travels through a repository secret in two stages:
//!
//! ```text
//! map ──json──► bytes ──deflate+base64──► compressed ──sealed box+base64──► secret
//! ```
//!
//! GitHub decrypts the secret before exposing it to a workflow, so the value
//! a run reads back is the compressed string, and [`open`] only has to undo
//! the first stage.

use crate::error::{DiffCacheError, Result};
use base64::engine::general_purpose::STANDARD;
use base64::Engine as _;
use crypto_box::aead::OsRng;
use crypto_box::PublicKey;
use flate2::read::DeflateDecoder;
use flate2::write::DeflateEncoder;
use flate2::Compression;
use gh_client::RepoPublicKey;
use std::collections::BTreeMap;
use std::io::{Read, Write};

/// Cache contents: pattern key to space-separated file list
pub type CacheMap = BTreeMap<String, String>;

/// Seals cache payloads for one repository
#[derive(Debug, Clone)]
pub struct SecretCodec {
    public_key: PublicKey,
    key_id: String,
}

impl SecretCodec {
    /// Build a codec from the repository's secrets public key
    pub fn new(key: &RepoPublicKey) -> Result<Self> {
        let bytes = STANDARD.decode(key.key.trim()).map_err(|e| {
            DiffCacheError::AuthFailed(format!("missing repository key: not base64 ({})", e))
        })?;
        let bytes: [u8; 32] = bytes.as_slice().try_into().map_err(|_| {
            DiffCacheError::AuthFailed(format!(
                "missing repository key: expected 32 bytes, got {}",
                bytes.len()
            ))
        })?;

        Ok(Self {
            public_key: PublicKey::from(bytes),
            key_id: key.key_id.clone(),
        })
    }

    pub fn key_id(&self) -> &str {
        &self.key_id
    }

    /// Compress the map and seal it for upload
    pub fn seal(&self, map: &CacheMap) -> Result<String> {
        let compressed = compress(map)?;
        self.encrypt(&compressed)
    }

    /// Seal an arbitrary string with the repository key
    pub fn encrypt(&self, plaintext: &str) -> Result<String> {
        let sealed = self
            .public_key
            .seal(&mut OsRng, plaintext.as_bytes())
            .map_err(|e| DiffCacheError::Seal(e.to_string()))?;
        Ok(STANDARD.encode(sealed))
    }
}

/// Serialize and compress a cache map into its secret text form
pub fn compress(map: &CacheMap) -> Result<String> {
    let json = serde_json::to_vec(map).map_err(|e| DiffCacheError::Seal(e.to_string()))?;

    let mut encoder = DeflateEncoder::new(Vec::new(), Compression::best());
    encoder
        .write_all(&json)
        .map_err(|e| DiffCacheError::Seal(e.to_string()))?;
    let deflated = encoder
        .finish()
        .map_err(|e| DiffCacheError::Seal(e.to_string()))?;

    Ok(STANDARD.encode(deflated))
}

/// Decode a cache payload as exposed to the workflow (already decrypted)
pub fn open(compressed: &str) -> Result<CacheMap> {
    let deflated = STANDARD
        .decode(compressed.trim())
        .map_err(|e| DiffCacheError::CacheCorrupt(format!("not base64: {}", e)))?;

    let mut json = String::new();
    DeflateDecoder::new(deflated.as_slice())
        .read_to_string(&mut json)
        .map_err(|e| DiffCacheError::CacheCorrupt(format!("cannot decompress: {}", e)))?;

    serde_json::from_str(&json)
        .map_err(|e| DiffCacheError::CacheCorrupt(format!("not a cache map: {}", e)))
}
