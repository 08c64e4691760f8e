//! Artifact Record - content-addressed outputs of a run

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use sha2::{Digest, Sha256};

/// Artifact Record describes a stored run output.
///
/// The `cas_hash` has the form `sha256:<hex digest>` and identifies the
/// artifact bytes independently of the key they were logged under.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct ArtifactRecord {
    run_id: String,
    key: String,
    cas_hash: String,
    size_bytes: u64,
    created_at: DateTime<Utc>,
}

impl ArtifactRecord {
    /// Describe `contents` as artifact `key` of `run_id`.
    #[must_use]
    pub fn from_bytes(run_id: impl Into<String>, key: impl Into<String>, contents: &[u8]) -> Self {
        Self {
            run_id: run_id.into(),
            key: key.into(),
            cas_hash: cas_hash(contents),
            size_bytes: contents.len() as u64,
            created_at: Utc::now(),
        }
    }

    /// Get the run ID.
    #[must_use]
    pub fn run_id(&self) -> &str {
        &self.run_id
    }

    /// Get the artifact key.
    #[must_use]
    pub fn key(&self) -> &str {
        &self.key
    }

    /// Get the content hash.
    #[must_use]
    pub fn cas_hash(&self) -> &str {
        &self.cas_hash
    }

    /// Get the artifact size in bytes.
    #[must_use]
    pub const fn size_bytes(&self) -> u64 {
        self.size_bytes
    }

    /// Get the creation timestamp.
    #[must_use]
    pub const fn created_at(&self) -> DateTime<Utc> {
        self.created_at
    }

    /// True if `contents` hashes to this record's `cas_hash`.
    #[must_use]
    pub fn matches(&self, contents: &[u8]) -> bool {
        self.cas_hash == cas_hash(contents)
    }
}

/// `sha256:<hex>` digest of `contents`.
#[must_use]
pub fn cas_hash(contents: &[u8]) -> String {
    format!("sha256:{}", hex::encode(Sha256::digest(contents)))
}
