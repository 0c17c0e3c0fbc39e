//! Snapshot building from a population read.

use chrono::{DateTime, Utc};
use std::collections::HashSet;
use uuid::Uuid;

use crate::errors::Result;
use crate::model::{Account, Snapshot};

/// Build a snapshot from one read of the account population.
///
/// Copies are kept in population scan order. If the read returned the same
/// id twice (a store paging under concurrent writes), only the first copy is
/// kept.
///
/// # Errors
///
/// Returns `KeywardError::Serialization` if the population digest cannot be
/// computed.
pub fn build_snapshot(population: &[Account], captured_at: DateTime<Utc>) -> Result<Snapshot> {
    let mut seen = HashSet::with_capacity(population.len());
    let copies = population
        .iter()
        .filter(|account| seen.insert(account.id.as_str()))
        .map(Account::to_copy)
        .collect();

    Snapshot::capture(Uuid::now_v7().to_string(), captured_at, copies)
}
