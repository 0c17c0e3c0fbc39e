//! Keyward Store - durable persistence on SQLite
//!
//! Provides:
//! - Connection setup (WAL, busy timeout)
//! - Migrations framework with embedded SQL and checksum drift detection
//! - `SqliteStore`, which implements the account, snapshot and audit traits
//!
//! Snapshots and audit events are append-only at the schema level: triggers
//! abort any UPDATE or DELETE on those tables.

pub mod db;
pub mod errors;
pub mod migrations;
pub mod repo;

// Re-export key types
pub use errors::Result;
pub use repo::SqliteStore;
