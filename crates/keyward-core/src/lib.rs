//! Keyward Core - credential tracking kernel
//!
//! This crate provides the pieces the engine composes:
//! - Account, snapshot and audit event models
//! - The credential fingerprint function (salted Argon2id by default)
//! - Pure snapshot building and divergence computation
//! - Collaborator store traits with in-memory implementations
//! - The error facility and the structured logging facility
//!
//! Nothing here performs orchestration; see `keyward-engine`.

pub mod diff;
pub mod errors;
pub mod fingerprint;
pub mod logging_facility;
pub mod model;
pub mod ops;
pub mod snapshot;

// Re-export commonly used types
pub use diff::{compute_divergence, DivergenceReport, DivergentAccount};
pub use errors::{ExError, ExErrorKind, KeywardError, Result};
pub use fingerprint::{fingerprint_unsalted, FingerprintConfig, FingerprintPolicy, Fingerprinter};
pub use model::{
    Account, AccountChanges, AccountCopy, AccountFilter, AffectedEntity, AuditAction, AuditEvent,
    Snapshot,
};
pub use ops::{AccountStore, AuditLog, SnapshotStore, StoreResult};
