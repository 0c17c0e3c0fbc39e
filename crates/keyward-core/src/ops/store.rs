//! Store traits consumed by the engine
//!
//! Every method takes `&self` and each call is atomic on its own; no
//! implementation holds a lock across calls. Failures are reported as
//! `ExError` so a durable backend can attach storage detail without leaking
//! it into the public message.

use crate::errors::ExError;
use crate::model::{Account, AccountChanges, AccountFilter, AuditEvent, Snapshot};

/// Result type for store calls
pub type StoreResult<T> = std::result::Result<T, ExError>;

/// The live account population
pub trait AccountStore: Send + Sync {
    /// Insert a new account; the store assigns the id and timestamps
    ///
    /// # Errors
    ///
    /// `AlreadyExists` if the username is taken, storage-class kinds otherwise.
    fn create(&self, username: &str, credential_digest: &str) -> StoreResult<Account>;

    /// # Errors
    ///
    /// Storage-class kinds only; a missing account is `Ok(None)`.
    fn find_by_id(&self, id: &str) -> StoreResult<Option<Account>>;

    /// Every account, in a stable scan order (creation order)
    ///
    /// # Errors
    ///
    /// Storage-class kinds only.
    fn find_all(&self) -> StoreResult<Vec<Account>>;

    /// # Errors
    ///
    /// Storage-class kinds only.
    fn find_by_filter(&self, filter: &AccountFilter) -> StoreResult<Vec<Account>>;

    /// Apply changes and return the updated account
    ///
    /// # Errors
    ///
    /// `NotFound` for an unknown id, `AlreadyExists` if the new username is taken.
    fn update(&self, id: &str, changes: &AccountChanges) -> StoreResult<Account>;

    /// Remove an account, returning it if it existed
    ///
    /// # Errors
    ///
    /// Storage-class kinds only; a missing account is `Ok(None)`.
    fn delete(&self, id: &str) -> StoreResult<Option<Account>>;
}

/// Append-only snapshot history
pub trait SnapshotStore: Send + Sync {
    /// # Errors
    ///
    /// Storage-class kinds.
    fn append(&self, snapshot: &Snapshot) -> StoreResult<()>;

    /// The snapshot appended last, or `None` when the store is empty
    ///
    /// # Errors
    ///
    /// Storage-class kinds.
    fn most_recent(&self) -> StoreResult<Option<Snapshot>>;
}

/// Append-only audit trail
pub trait AuditLog: Send + Sync {
    /// # Errors
    ///
    /// Storage-class kinds.
    fn append(&self, event: &AuditEvent) -> StoreResult<()>;

    /// Every event, newest first
    ///
    /// # Errors
    ///
    /// Storage-class kinds.
    fn all_ordered_descending(&self) -> StoreResult<Vec<AuditEvent>>;
}
