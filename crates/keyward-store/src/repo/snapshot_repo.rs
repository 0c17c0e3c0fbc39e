use keyward_core::model::{AccountCopy, Snapshot};
use keyward_core::ops::{SnapshotStore, StoreResult};
use rusqlite::OptionalExtension;

use super::{decode_timestamp, encode_timestamp, SqliteStore};
use crate::errors::{from_rusqlite, integrity_error, serialization_error};

impl SnapshotStore for SqliteStore {
    fn append(&self, snapshot: &Snapshot) -> StoreResult<()> {
        let accounts_json = serde_json::to_string(snapshot.accounts())
            .map_err(|e| serialization_error("snapshot_append", e))?;

        let conn = self.conn("snapshot_append")?;
        conn.execute(
            "INSERT INTO snapshots (snapshot_id, captured_at, population_digest, accounts_json)
             VALUES (?1, ?2, ?3, ?4)",
            rusqlite::params![
                snapshot.snapshot_id(),
                encode_timestamp(snapshot.captured_at()),
                snapshot.population_digest(),
                accounts_json,
            ],
        )
        .map_err(|e| from_rusqlite(e).with_op("snapshot_append"))?;

        tracing::debug!(
            snapshot_id = snapshot.snapshot_id(),
            population_len = snapshot.len(),
            "Persisted snapshot"
        );

        Ok(())
    }

    fn most_recent(&self) -> StoreResult<Option<Snapshot>> {
        let row: Option<(String, String, String, String)> = {
            let conn = self.conn("snapshot_most_recent")?;
            conn.query_row(
                "SELECT snapshot_id, captured_at, population_digest, accounts_json
                 FROM snapshots
                 ORDER BY captured_at DESC, seq DESC
                 LIMIT 1",
                [],
                |row| Ok((row.get(0)?, row.get(1)?, row.get(2)?, row.get(3)?)),
            )
            .optional()
            .map_err(from_rusqlite)?
        };

        let Some((snapshot_id, captured_at, population_digest, accounts_json)) = row else {
            return Ok(None);
        };

        let copies: Vec<AccountCopy> = serde_json::from_str(&accounts_json)
            .map_err(|e| serialization_error("snapshot_most_recent", e))?;
        let captured_at = decode_timestamp(&captured_at, "snapshot_most_recent")?;

        Snapshot::restore(snapshot_id.clone(), captured_at, copies, population_digest)
            .map(Some)
            .map_err(|e| integrity_error(&snapshot_id, e))
    }
}
