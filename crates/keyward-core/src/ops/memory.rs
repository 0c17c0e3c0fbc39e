//! In-memory store implementations
//!
//! Mutex-guarded vectors: scan order is insertion order, which keeps
//! divergence reports and audit listings deterministic in tests.

use std::sync::{Mutex, MutexGuard};

use uuid::Uuid;

use crate::errors::{ExError, ExErrorKind};
use crate::model::{Account, AccountChanges, AccountFilter, AuditEvent, Snapshot};

use super::store::{AccountStore, AuditLog, SnapshotStore, StoreResult};

fn lock<'a, T>(mutex: &'a Mutex<T>, op: &str) -> StoreResult<MutexGuard<'a, T>> {
    mutex.lock().map_err(|_| {
        ExError::new(ExErrorKind::StorageFailure)
            .with_op(op)
            .with_message("in-memory store lock poisoned")
    })
}

fn username_taken(username: &str, op: &str) -> ExError {
    ExError::new(ExErrorKind::AlreadyExists)
        .with_op(op)
        .with_message(format!("Username already taken: {}", username))
}

/// Account population held in memory
#[derive(Debug, Default)]
pub struct MemoryAccountStore {
    accounts: Mutex<Vec<Account>>,
}

impl MemoryAccountStore {
    pub fn new() -> Self {
        Self::default()
    }
}

impl AccountStore for MemoryAccountStore {
    fn create(&self, username: &str, credential_digest: &str) -> StoreResult<Account> {
        let mut accounts = lock(&self.accounts, "account_create")?;
        if accounts.iter().any(|a| a.username == username) {
            return Err(username_taken(username, "account_create"));
        }
        let account = Account::new(
            Uuid::now_v7().to_string(),
            username.to_string(),
            credential_digest.to_string(),
        );
        accounts.push(account.clone());
        Ok(account)
    }

    fn find_by_id(&self, id: &str) -> StoreResult<Option<Account>> {
        let accounts = lock(&self.accounts, "account_find_by_id")?;
        Ok(accounts.iter().find(|a| a.id == id).cloned())
    }

    fn find_all(&self) -> StoreResult<Vec<Account>> {
        Ok(lock(&self.accounts, "account_find_all")?.clone())
    }

    fn find_by_filter(&self, filter: &AccountFilter) -> StoreResult<Vec<Account>> {
        let accounts = lock(&self.accounts, "account_find_by_filter")?;
        Ok(accounts
            .iter()
            .filter(|a| filter.matches(a))
            .cloned()
            .collect())
    }

    fn update(&self, id: &str, changes: &AccountChanges) -> StoreResult<Account> {
        let mut accounts = lock(&self.accounts, "account_update")?;
        if let Some(username) = &changes.username {
            if accounts.iter().any(|a| &a.username == username && a.id != id) {
                return Err(username_taken(username, "account_update"));
            }
        }
        let account = accounts.iter_mut().find(|a| a.id == id).ok_or_else(|| {
            ExError::new(ExErrorKind::NotFound)
                .with_op("account_update")
                .with_entity_id(id)
                .with_message("Account not found")
        })?;
        changes.apply_to(account);
        Ok(account.clone())
    }

    fn delete(&self, id: &str) -> StoreResult<Option<Account>> {
        let mut accounts = lock(&self.accounts, "account_delete")?;
        Ok(accounts
            .iter()
            .position(|a| a.id == id)
            .map(|idx| accounts.remove(idx)))
    }
}

/// Snapshot history held in memory
#[derive(Debug, Default)]
pub struct MemorySnapshotStore {
    snapshots: Mutex<Vec<Snapshot>>,
}

impl MemorySnapshotStore {
    pub fn new() -> Self {
        Self::default()
    }

    /// Number of snapshots appended so far
    pub fn len(&self) -> usize {
        self.snapshots.lock().map(|s| s.len()).unwrap_or(0)
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }
}

impl SnapshotStore for MemorySnapshotStore {
    fn append(&self, snapshot: &Snapshot) -> StoreResult<()> {
        lock(&self.snapshots, "snapshot_append")?.push(snapshot.clone());
        Ok(())
    }

    fn most_recent(&self) -> StoreResult<Option<Snapshot>> {
        Ok(lock(&self.snapshots, "snapshot_most_recent")?.last().cloned())
    }
}

/// Audit trail held in memory
#[derive(Debug, Default)]
pub struct MemoryAuditLog {
    events: Mutex<Vec<AuditEvent>>,
}

impl MemoryAuditLog {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn len(&self) -> usize {
        self.events.lock().map(|e| e.len()).unwrap_or(0)
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }
}

impl AuditLog for MemoryAuditLog {
    fn append(&self, event: &AuditEvent) -> StoreResult<()> {
        lock(&self.events, "audit_append")?.push(event.clone());
        Ok(())
    }

    fn all_ordered_descending(&self) -> StoreResult<Vec<AuditEvent>> {
        let events = lock(&self.events, "audit_list")?;
        Ok(events.iter().rev().cloned().collect())
    }
}
