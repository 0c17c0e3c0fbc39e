//! SQLite implementations of the collaborator store traits
//!
//! One `SqliteStore` backs all three traits. Each trait call takes the
//! connection mutex for exactly one statement or transaction.

mod account_repo;
mod audit_repo;
mod snapshot_repo;

use std::path::Path;
use std::sync::{Mutex, MutexGuard};

use chrono::{DateTime, SecondsFormat, Utc};
use keyward_core::errors::{ExError, ExErrorKind};
use rusqlite::Connection;

use crate::db;
use crate::errors::Result;
use crate::migrations::apply_migrations;

/// Durable account, snapshot and audit storage over one SQLite connection
pub struct SqliteStore {
    conn: Mutex<Connection>,
}

impl SqliteStore {
    /// Open (or create) a database file and bring its schema up to date
    pub fn open<P: AsRef<Path>>(path: P) -> Result<Self> {
        let conn = db::open(path)?;
        Self::from_connection(conn)
    }

    /// Fresh in-memory database (for testing)
    pub fn open_in_memory() -> Result<Self> {
        Self::from_connection(db::open_in_memory()?)
    }

    /// Configure an existing connection and apply pending migrations
    pub fn from_connection(mut conn: Connection) -> Result<Self> {
        db::configure(&conn)?;
        apply_migrations(&mut conn)?;
        Ok(Self {
            conn: Mutex::new(conn),
        })
    }

    fn conn(&self, op: &str) -> Result<MutexGuard<'_, Connection>> {
        self.conn.lock().map_err(|_| {
            ExError::new(ExErrorKind::StorageFailure)
                .with_op(op)
                .with_message("connection lock poisoned")
        })
    }
}

/// Timestamps are stored as RFC 3339 with nanoseconds, which sorts as text
pub(crate) fn encode_timestamp(ts: DateTime<Utc>) -> String {
    ts.to_rfc3339_opts(SecondsFormat::Nanos, true)
}

pub(crate) fn decode_timestamp(raw: &str, op: &str) -> Result<DateTime<Utc>> {
    DateTime::parse_from_rfc3339(raw)
        .map(|ts| ts.with_timezone(&Utc))
        .map_err(|e| {
            ExError::new(ExErrorKind::Serialization)
                .with_op(op.to_string())
                .with_message(format!("Invalid stored timestamp {}: {}", raw, e))
        })
}
