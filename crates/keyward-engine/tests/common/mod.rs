#![allow(dead_code)]

use keyward_core::errors::{ExError, ExErrorKind};
use keyward_core::ops::{
    AccountStore, AuditLog, MemoryAccountStore, MemoryAuditLog, MemorySnapshotStore,
    SnapshotStore, StoreResult,
};
use keyward_core::{
    Account, AccountChanges, AccountFilter, AuditEvent, FingerprintConfig, FingerprintPolicy,
    Fingerprinter, Snapshot,
};
use keyward_core_types::{RequestContext, Sensitive};
use keyward_engine::Stores;

/// Salted fingerprinter with the cheapest valid Argon2 parameters
pub fn fast_fingerprinter() -> Fingerprinter {
    Fingerprinter::new(&FingerprintConfig {
        policy: FingerprintPolicy::Salted,
        memory_kib: 64,
        iterations: 1,
        parallelism: 1,
    })
    .unwrap()
}

pub fn secret(s: &str) -> Sensitive<String> {
    Sensitive::new(s.to_string())
}

pub fn ctx() -> RequestContext {
    RequestContext::new()
}

/// The three in-memory stores, owned together
#[derive(Default)]
pub struct MemoryBackend {
    pub accounts: MemoryAccountStore,
    pub snapshots: MemorySnapshotStore,
    pub audit: MemoryAuditLog,
}

impl MemoryBackend {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn stores(&self) -> Stores<'_> {
        Stores::new(&self.accounts, &self.snapshots, &self.audit)
    }
}

fn unavailable(op: &str) -> ExError {
    ExError::new(ExErrorKind::StorageFailure)
        .with_op(op)
        .with_message("backend unavailable: connection refused")
}

/// Snapshot store whose every call fails
pub struct FailingSnapshotStore;

impl SnapshotStore for FailingSnapshotStore {
    fn append(&self, _snapshot: &Snapshot) -> StoreResult<()> {
        Err(unavailable("snapshot_append"))
    }

    fn most_recent(&self) -> StoreResult<Option<Snapshot>> {
        Err(unavailable("snapshot_most_recent"))
    }
}

/// Audit log whose every call fails
pub struct FailingAuditLog;

impl AuditLog for FailingAuditLog {
    fn append(&self, _event: &AuditEvent) -> StoreResult<()> {
        Err(unavailable("audit_append"))
    }

    fn all_ordered_descending(&self) -> StoreResult<Vec<AuditEvent>> {
        Err(unavailable("audit_list"))
    }
}

/// Account store that reads fine but refuses every write
pub struct ReadOnlyAccountStore(pub MemoryAccountStore);

impl AccountStore for ReadOnlyAccountStore {
    fn create(&self, _username: &str, _credential_digest: &str) -> StoreResult<Account> {
        Err(unavailable("account_create"))
    }

    fn find_by_id(&self, id: &str) -> StoreResult<Option<Account>> {
        self.0.find_by_id(id)
    }

    fn find_all(&self) -> StoreResult<Vec<Account>> {
        self.0.find_all()
    }

    fn find_by_filter(&self, filter: &AccountFilter) -> StoreResult<Vec<Account>> {
        self.0.find_by_filter(filter)
    }

    fn update(&self, _id: &str, _changes: &AccountChanges) -> StoreResult<Account> {
        Err(unavailable("account_update"))
    }

    fn delete(&self, _id: &str) -> StoreResult<Option<Account>> {
        Err(unavailable("account_delete"))
    }
}

/// Overwrite a stored digest directly, bypassing the orchestrator
pub fn tamper_digest(accounts: &dyn AccountStore, account_id: &str, digest: &str) {
    accounts
        .update(
            account_id,
            &AccountChanges {
                username: None,
                credential_digest: Some(digest.to_string()),
            },
        )
        .unwrap();
}
