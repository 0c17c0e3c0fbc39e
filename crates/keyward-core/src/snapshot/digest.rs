//! Digest computation for snapshots.
//!
//! The population digest is a SHA256 hash of the canonical JSON encoding of
//! the ordered account copies. It excludes the snapshot id and timestamp, so
//! two snapshots of an unchanged population share a digest.
//!
//! ## Determinism Guarantees
//!
//! - Same copies in the same order → same digest
//! - Different order → different digest (order-sensitive)

use crate::errors::Result;
use crate::model::AccountCopy;
use sha2::{Digest, Sha256};

/// Compute the population digest of ordered account copies.
///
/// ## Returns
///
/// Hex-encoded SHA256 digest (64 characters)
///
/// ## Errors
///
/// Returns `KeywardError::Serialization` if JSON serialization fails.
///
/// ## Example
///
/// ```
/// use keyward_core::model::AccountCopy;
/// use keyward_core::snapshot::digest::compute_population_digest;
///
/// let copies = vec![AccountCopy {
///     account_id: "a1".into(),
///     username: "alice".into(),
///     credential_digest: "d1".into(),
/// }];
/// let digest = compute_population_digest(&copies).unwrap();
/// assert_eq!(digest.len(), 64);
/// ```
pub fn compute_population_digest(accounts: &[AccountCopy]) -> Result<String> {
    let canonical = serde_json::to_string(accounts)?;
    Ok(hash_string(&canonical))
}

fn hash_string(input: &str) -> String {
    let mut hasher = Sha256::new();
    hasher.update(input.as_bytes());
    hex::encode(hasher.finalize())
}
