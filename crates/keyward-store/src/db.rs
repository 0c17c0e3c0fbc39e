//! SQLite connection setup

use crate::errors::{from_rusqlite, Result};
use rusqlite::Connection;
use std::path::Path;
use std::time::Duration;

/// How long a statement waits on a locked database before failing with `Timeout`
pub const BUSY_TIMEOUT: Duration = Duration::from_secs(5);

pub fn open<P: AsRef<Path>>(path: P) -> Result<Connection> {
    Connection::open(path).map_err(from_rusqlite)
}

/// Private in-memory database; gone when the connection drops
pub fn open_in_memory() -> Result<Connection> {
    Connection::open_in_memory().map_err(from_rusqlite)
}

/// Apply WAL journaling and the busy timeout
///
/// In-memory databases keep their "memory" journal mode.
pub fn configure(conn: &Connection) -> Result<()> {
    let mode: String = conn
        .pragma_update_and_check(None, "journal_mode", "WAL", |row| row.get(0))
        .map_err(from_rusqlite)?;
    tracing::debug!(journal_mode = mode.as_str(), "connection configured");

    conn.busy_timeout(BUSY_TIMEOUT).map_err(from_rusqlite)
}
