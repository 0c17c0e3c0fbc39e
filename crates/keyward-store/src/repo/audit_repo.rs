use keyward_core::model::{AffectedEntity, AuditEvent};
use keyward_core::ops::{AuditLog, StoreResult};

use super::{decode_timestamp, encode_timestamp, SqliteStore};
use crate::errors::{from_rusqlite, serialization_error};

impl AuditLog for SqliteStore {
    fn append(&self, event: &AuditEvent) -> StoreResult<()> {
        let affected_json = serde_json::to_string(&event.affected)
            .map_err(|e| serialization_error("audit_append", e))?;

        let conn = self.conn("audit_append")?;
        conn.execute(
            "INSERT INTO audit_events (event_id, recorded_at, description, affected_json)
             VALUES (?1, ?2, ?3, ?4)",
            rusqlite::params![
                event.event_id,
                encode_timestamp(event.recorded_at),
                event.description,
                affected_json,
            ],
        )
        .map_err(|e| from_rusqlite(e).with_op("audit_append"))?;

        Ok(())
    }

    fn all_ordered_descending(&self) -> StoreResult<Vec<AuditEvent>> {
        let rows: Vec<(String, String, String, String)> = {
            let conn = self.conn("audit_list")?;
            let mut stmt = conn
                .prepare(
                    "SELECT event_id, recorded_at, description, affected_json
                     FROM audit_events
                     ORDER BY recorded_at DESC, seq DESC",
                )
                .map_err(from_rusqlite)?;
            let rows = stmt
                .query_map([], |row| {
                    Ok((row.get(0)?, row.get(1)?, row.get(2)?, row.get(3)?))
                })
                .map_err(from_rusqlite)?
                .collect::<std::result::Result<Vec<_>, _>>()
                .map_err(from_rusqlite)?;
            rows
        };

        rows.into_iter()
            .map(|(event_id, recorded_at, description, affected_json)| {
                let affected: Vec<AffectedEntity> = serde_json::from_str(&affected_json)
                    .map_err(|e| serialization_error("audit_list", e))?;
                Ok(AuditEvent {
                    event_id,
                    recorded_at: decode_timestamp(&recorded_at, "audit_list")?,
                    description,
                    affected,
                })
            })
            .collect()
    }
}
