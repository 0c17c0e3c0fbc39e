//! Divergence computation engine.
//!
//! The core entry point is [`compute_divergence`], a pure function over an
//! already-loaded snapshot and population. Loading and audit logging live in
//! `keyward-engine`.

use chrono::{DateTime, Utc};
use std::collections::{HashMap, HashSet};

use crate::diff::model::{DivergenceReport, DivergentAccount};
use crate::model::{Account, AccountCopy, Snapshot};

/// Compare the current population against a snapshot.
///
/// For every current account whose id appears in the snapshot, the stored
/// digest is compared byte-for-byte with the snapshot's copy. Accounts only
/// in one side are reported separately and are never divergent.
pub fn compute_divergence(
    snapshot: &Snapshot,
    current: &[Account],
    compared_at: DateTime<Utc>,
) -> DivergenceReport {
    let recorded: HashMap<&str, &AccountCopy> = snapshot
        .accounts()
        .iter()
        .map(|c| (c.account_id.as_str(), c))
        .collect();

    let mut divergent = Vec::new();
    let mut untracked_account_ids = Vec::new();
    let mut seen = HashSet::with_capacity(current.len());

    for account in current {
        if !seen.insert(account.id.as_str()) {
            continue;
        }
        match recorded.get(account.id.as_str()) {
            Some(copy) if copy.credential_digest != account.credential_digest => {
                divergent.push(DivergentAccount {
                    account_id: account.id.clone(),
                    username: account.username.clone(),
                });
            }
            Some(_) => {}
            None => untracked_account_ids.push(account.id.clone()),
        }
    }

    let removed_account_ids = snapshot
        .accounts()
        .iter()
        .filter(|c| !seen.contains(c.account_id.as_str()))
        .map(|c| c.account_id.clone())
        .collect();

    DivergenceReport {
        snapshot_id: snapshot.snapshot_id().to_string(),
        snapshot_captured_at: snapshot.captured_at(),
        compared_at,
        divergent,
        untracked_account_ids,
        removed_account_ids,
    }
}
