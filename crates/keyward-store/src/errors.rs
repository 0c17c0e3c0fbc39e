//! Error handling for keyward-store
//!
//! Wraps keyward-core ExError with store-specific helpers

use keyward_core::errors::{ExError, ExErrorKind, KeywardError};
use rusqlite::ffi;
use rusqlite::ErrorCode;

/// Result type alias using ExError
pub type Result<T> = std::result::Result<T, ExError>;

/// Create a migration error
pub fn migration_error(migration_id: &str, reason: &str) -> ExError {
    ExError::new(ExErrorKind::StorageFailure)
        .with_op("migration")
        .with_message(format!("Migration {} failed: {}", migration_id, reason))
}

/// Create a checksum mismatch error
pub fn checksum_mismatch(migration_id: &str, expected: &str, actual: &str) -> ExError {
    ExError::new(ExErrorKind::StorageFailure)
        .with_op("migration_checksum")
        .with_message(format!(
            "Checksum mismatch for migration {}: expected {}, got {}",
            migration_id, expected, actual
        ))
}

/// Create a database error from rusqlite::Error
///
/// Unique-key violations become `AlreadyExists`; busy or locked databases
/// become `Timeout`. Everything else is a `StorageFailure`.
pub fn from_rusqlite(err: rusqlite::Error) -> ExError {
    let kind = match &err {
        rusqlite::Error::SqliteFailure(e, _) => match e.code {
            ErrorCode::DatabaseBusy | ErrorCode::DatabaseLocked => ExErrorKind::Timeout,
            ErrorCode::ConstraintViolation
                if e.extended_code == ffi::SQLITE_CONSTRAINT_UNIQUE
                    || e.extended_code == ffi::SQLITE_CONSTRAINT_PRIMARYKEY =>
            {
                ExErrorKind::AlreadyExists
            }
            _ => ExErrorKind::StorageFailure,
        },
        _ => ExErrorKind::StorageFailure,
    };
    ExError::new(kind)
        .with_op("sqlite")
        .with_message(err.to_string())
}

/// Create a payload encode/decode error
pub fn serialization_error(op: &str, err: serde_json::Error) -> ExError {
    ExError::new(ExErrorKind::Serialization)
        .with_op(op.to_string())
        .with_message(err.to_string())
}

/// A stored row failed to rebuild into a domain value
pub fn integrity_error(entity_id: &str, err: KeywardError) -> ExError {
    ExError::new(ExErrorKind::StorageFailure)
        .with_op("integrity_check")
        .with_entity_id(entity_id)
        .with_message(err.to_string())
}
