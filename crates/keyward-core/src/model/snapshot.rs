use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::errors::{KeywardError, Result};
use crate::snapshot::digest::compute_population_digest;

/// Snapshot-time copy of one account
///
/// Held by value: no live reference to the account, so the copy stays valid
/// after the account is updated or deleted.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct AccountCopy {
    pub account_id: String,
    pub username: String,
    pub credential_digest: String,
}

/// Immutable point-in-time copy of the whole account population
///
/// Fields are private: a snapshot can only be built from a population (which
/// computes its digest) or restored from storage (which verifies it).
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Snapshot {
    snapshot_id: String,
    captured_at: DateTime<Utc>,
    accounts: Vec<AccountCopy>,
    population_digest: String,
}

impl Snapshot {
    /// Build a new snapshot from account copies in population scan order
    ///
    /// # Errors
    ///
    /// Returns `Serialization` if the copies cannot be canonicalized.
    pub fn capture(
        snapshot_id: String,
        captured_at: DateTime<Utc>,
        accounts: Vec<AccountCopy>,
    ) -> Result<Self> {
        let population_digest = compute_population_digest(&accounts)?;
        Ok(Self {
            snapshot_id,
            captured_at,
            accounts,
            population_digest,
        })
    }

    /// Rebuild a snapshot read back from storage
    ///
    /// # Errors
    ///
    /// Returns `Internal` if the recorded digest does not match the copies,
    /// which means the stored row was altered after capture.
    pub fn restore(
        snapshot_id: String,
        captured_at: DateTime<Utc>,
        accounts: Vec<AccountCopy>,
        population_digest: String,
    ) -> Result<Self> {
        let computed = compute_population_digest(&accounts)?;
        if computed != population_digest {
            return Err(KeywardError::Internal {
                message: format!(
                    "snapshot {} failed integrity check: recorded {}, computed {}",
                    snapshot_id, population_digest, computed
                ),
            });
        }
        Ok(Self {
            snapshot_id,
            captured_at,
            accounts,
            population_digest,
        })
    }

    pub fn snapshot_id(&self) -> &str {
        &self.snapshot_id
    }

    pub fn captured_at(&self) -> DateTime<Utc> {
        self.captured_at
    }

    /// Account copies in capture order
    pub fn accounts(&self) -> &[AccountCopy] {
        &self.accounts
    }

    pub fn population_digest(&self) -> &str {
        &self.population_digest
    }

    pub fn len(&self) -> usize {
        self.accounts.len()
    }

    pub fn is_empty(&self) -> bool {
        self.accounts.is_empty()
    }

    /// Find the copy recorded for an account id
    pub fn find(&self, account_id: &str) -> Option<&AccountCopy> {
        self.accounts.iter().find(|c| c.account_id == account_id)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn copies() -> Vec<AccountCopy> {
        vec![
            AccountCopy {
                account_id: "a1".into(),
                username: "alice".into(),
                credential_digest: "d1".into(),
            },
            AccountCopy {
                account_id: "a2".into(),
                username: "bob".into(),
                credential_digest: "d2".into(),
            },
        ]
    }

    #[test]
    fn test_restore_accepts_matching_digest() {
        let snap = Snapshot::capture("s1".into(), Utc::now(), copies()).unwrap();
        let restored = Snapshot::restore(
            snap.snapshot_id().to_string(),
            snap.captured_at(),
            snap.accounts().to_vec(),
            snap.population_digest().to_string(),
        )
        .unwrap();
        assert_eq!(restored, snap);
    }

    #[test]
    fn test_restore_rejects_tampered_copies() {
        let snap = Snapshot::capture("s1".into(), Utc::now(), copies()).unwrap();
        let mut tampered = snap.accounts().to_vec();
        tampered[1].credential_digest = "forged".into();

        let err = Snapshot::restore(
            "s1".into(),
            snap.captured_at(),
            tampered,
            snap.population_digest().to_string(),
        )
        .unwrap_err();
        assert!(matches!(err, KeywardError::Internal { .. }));
    }

    #[test]
    fn test_find_by_account_id() {
        let snap = Snapshot::capture("s1".into(), Utc::now(), copies()).unwrap();
        assert_eq!(snap.find("a2").map(|c| c.username.as_str()), Some("bob"));
        assert!(snap.find("a3").is_none());
        assert_eq!(snap.len(), 2);
    }
}
