//! Divergence detection orchestration.
//!
//! ## Pipeline (in order):
//! 1. Load the most recent snapshot (`NoSnapshotAvailable` if none; terminal)
//! 2. Load the full current population
//! 3. Compare digests for accounts present in both
//! 4. If anything diverged, append one audit event before returning
//!
//! Step 4 is not a secondary phase: if the audit append fails the whole call
//! fails, so a divergence is never observed without being recorded.

use chrono::Utc;
use keyward_core::diff::{compute_divergence, DivergenceReport};
use keyward_core::errors::{ExError, KeywardError};
use keyward_core::model::{AuditAction, AuditEvent};
use keyward_core::{log_op_end, log_op_error, log_op_start};
use keyward_core_types::{schema, RequestContext};

use crate::commands::lifecycle::Stores;
use crate::Result;

/// Compare the current population against the most recent snapshot
///
/// # Errors
///
/// - `NoSnapshotAvailable`: the snapshot store is empty (nothing is recorded)
/// - Storage-class kinds: a read failed, or the anomaly could not be recorded
pub fn detect_divergence(ctx: &RequestContext, stores: &Stores<'_>) -> Result<DivergenceReport> {
    log_op_start!("detect_divergence", request_id = ctx.request_id.as_str());
    let start = std::time::Instant::now();

    let report = detect_divergence_impl(ctx, stores).map_err(|e| {
        log_op_error!(
            "detect_divergence",
            e.clone(),
            duration_ms = start.elapsed().as_millis() as u64
        );
        e.with_request_id(ctx.request_id.clone())
    })?;

    log_op_end!(
        "detect_divergence",
        duration_ms = start.elapsed().as_millis() as u64,
        snapshot_id = report.snapshot_id.as_str(),
        divergent_len = report.divergent.len()
    );

    Ok(report)
}

fn detect_divergence_impl(ctx: &RequestContext, stores: &Stores<'_>) -> Result<DivergenceReport> {
    let snapshot = stores
        .snapshots
        .most_recent()?
        .ok_or_else(|| ExError::from(KeywardError::NoSnapshotAvailable))?;

    let current = stores.accounts.find_all()?;
    let report = compute_divergence(&snapshot, &current, Utc::now());

    if report.has_divergence() {
        tracing::warn!(
            snapshot_id = report.snapshot_id.as_str(),
            divergent = ?report.divergent_ids(),
            "credential divergence detected"
        );

        let affected = report
            .affected_entities()
            .into_iter()
            .map(|entity| entity.with_context(schema::FIELD_REQUEST_ID, ctx.request_id.as_str()))
            .collect();
        let event = AuditEvent::for_action(AuditAction::CredentialDivergenceDetected, affected);
        stores.audit.append(&event).map_err(|e| {
            ExError::new(e.kind())
                .with_op("detect_divergence_audit")
                .with_entity_id(report.snapshot_id.as_str())
                .with_message("divergence detected but could not be recorded")
                .with_source(e)
        })?;
    }

    Ok(report)
}
