//! Snapshot fingerprinting for change detection.
//!
//! Fingerprints are taken over the canonical JSON form of a tree. Keyed
//! lists serialize in key order and VLAN sets in compressed ascending form,
//! so two trees that compare equal always produce the same digest.

use sha2::{Digest, Sha256};

use super::model::StpConfig;
use crate::error::{ReconcileError, Result};

/// Hasher for computing snapshot fingerprints.
#[derive(Debug, Default)]
pub struct ConfigHasher;

impl ConfigHasher {
    /// Creates a new snapshot hasher.
    #[must_use]
    pub const fn new() -> Self {
        Self
    }

    /// Computes the SHA-256 fingerprint of a tree.
    ///
    /// # Errors
    ///
    /// Returns an error if the tree cannot be serialized.
    pub fn hash_config(&self, config: &StpConfig) -> Result<String> {
        let canonical = serde_json::to_vec(config)
            .map_err(|e| ReconcileError::serialization(format!("Failed to encode tree: {e}")))?;

        let mut hasher = Sha256::new();
        hasher.update(&canonical);
        Ok(hex::encode(hasher.finalize()))
    }

    /// Computes a short hash (first 8 characters) for display purposes.
    #[must_use]
    pub fn short_hash(&self, hash: &str) -> String {
        hash.chars().take(8).collect()
    }

    /// Compares two hashes to determine if they are equal.
    #[must_use]
    pub fn hashes_match(hash1: &str, hash2: &str) -> bool {
        if hash1.len() != hash2.len() {
            return false;
        }

        hash1
            .bytes()
            .zip(hash2.bytes())
            .fold(0u8, |acc, (a, b)| acc | (a ^ b))
            == 0
    }
}
