//! Divergence report types.
//!
//! Reports are transient: computed on demand, never persisted.

use chrono::{DateTime, Utc};
use keyward_core_types::schema;
use serde::Serialize;

use crate::model::AffectedEntity;

/// A tracked account whose current digest differs from the snapshot's
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct DivergentAccount {
    pub account_id: String,
    /// Current username (may differ from the one recorded in the snapshot)
    pub username: String,
}

/// Result of one comparison run
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct DivergenceReport {
    /// Snapshot the population was compared against
    pub snapshot_id: String,
    pub snapshot_captured_at: DateTime<Utc>,
    pub compared_at: DateTime<Utc>,
    /// Tracked accounts whose credential changed, in population scan order
    pub divergent: Vec<DivergentAccount>,
    /// Ids present now but absent from the snapshot (informational)
    pub untracked_account_ids: Vec<String>,
    /// Ids recorded in the snapshot but gone now (informational)
    pub removed_account_ids: Vec<String>,
}

impl DivergenceReport {
    pub fn has_divergence(&self) -> bool {
        !self.divergent.is_empty()
    }

    /// Divergent account ids in report order
    pub fn divergent_ids(&self) -> Vec<&str> {
        self.divergent.iter().map(|d| d.account_id.as_str()).collect()
    }

    /// Affected-entity list for the anomaly audit event
    pub fn affected_entities(&self) -> Vec<AffectedEntity> {
        self.divergent
            .iter()
            .map(|d| {
                AffectedEntity::account(&d.username, &d.account_id)
                    .with_context(schema::FIELD_SNAPSHOT_ID, &self.snapshot_id)
            })
            .collect()
    }
}
