//! Snapshot capture orchestration.
//!
//! ## Pipeline (in order):
//! 1. Read the whole account population once
//! 2. Copy each stored digest verbatim into a new snapshot (never re-derive)
//! 3. Append the snapshot to the snapshot store (the only write)
//!
//! A failure here never undoes the mutation that triggered the capture; the
//! lifecycle orchestrator reports it as a secondary warning.

use chrono::Utc;
use keyward_core::errors::ExError;
use keyward_core::model::Snapshot;
use keyward_core::ops::{AccountStore, SnapshotStore};
use keyward_core::snapshot::build_snapshot;
use keyward_core::{log_op_end, log_op_error, log_op_start};

use crate::Result;

/// Capture and persist a snapshot of the current account population
///
/// # Errors
///
/// Storage-class errors from either store; `Serialization` if the population
/// digest cannot be computed.
pub fn capture_snapshot(
    accounts: &dyn AccountStore,
    snapshots: &dyn SnapshotStore,
) -> Result<Snapshot> {
    log_op_start!("capture_snapshot");
    let start = std::time::Instant::now();

    let snapshot = capture_snapshot_impl(accounts, snapshots).map_err(|e| {
        log_op_error!(
            "capture_snapshot",
            e.clone(),
            duration_ms = start.elapsed().as_millis() as u64
        );
        e
    })?;

    log_op_end!(
        "capture_snapshot",
        duration_ms = start.elapsed().as_millis() as u64,
        snapshot_id = snapshot.snapshot_id(),
        population_len = snapshot.len()
    );

    Ok(snapshot)
}

fn capture_snapshot_impl(
    accounts: &dyn AccountStore,
    snapshots: &dyn SnapshotStore,
) -> Result<Snapshot> {
    let population = accounts.find_all()?;
    let snapshot = build_snapshot(&population, Utc::now()).map_err(ExError::from)?;
    snapshots.append(&snapshot)?;
    Ok(snapshot)
}

#[cfg(test)]
mod tests {
    use super::*;
    use keyward_core::ops::{MemoryAccountStore, MemorySnapshotStore};

    #[test]
    fn test_capture_copies_whole_population() {
        let accounts = MemoryAccountStore::new();
        let snapshots = MemorySnapshotStore::new();
        accounts.create("alice", "d1").unwrap();
        accounts.create("bob", "d2").unwrap();

        let snapshot = capture_snapshot(&accounts, &snapshots).unwrap();

        assert_eq!(snapshot.len(), 2);
        assert_eq!(snapshots.len(), 1);
        assert_eq!(
            snapshots.most_recent().unwrap().unwrap().snapshot_id(),
            snapshot.snapshot_id()
        );
    }

    #[test]
    fn test_capture_of_empty_population_is_valid() {
        let snapshot =
            capture_snapshot(&MemoryAccountStore::new(), &MemorySnapshotStore::new()).unwrap();
        assert!(snapshot.is_empty());
    }
}
