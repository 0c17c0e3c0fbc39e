//! Human-readable summary renderer for divergence reports.

use crate::diff::model::DivergenceReport;

/// Render a plain-text summary of a [`DivergenceReport`].
///
/// Informational only; the structured report is authoritative.
pub fn render_human_summary(report: &DivergenceReport) -> String {
    let mut out = String::new();

    out.push_str(&format!(
        "Compared against snapshot {} ({})\n",
        report.snapshot_id,
        report.snapshot_captured_at.to_rfc3339()
    ));

    if report.divergent.is_empty() {
        out.push_str("No credential changes detected\n");
    } else {
        out.push_str(&format!(
            "Credential changes detected ({}):\n",
            report.divergent.len()
        ));
        for d in &report.divergent {
            out.push_str(&format!("  - {} ({})\n", d.username, d.account_id));
        }
    }

    if !report.untracked_account_ids.is_empty() {
        out.push_str(&format!(
            "Not yet snapshotted: {}\n",
            report.untracked_account_ids.len()
        ));
    }
    if !report.removed_account_ids.is_empty() {
        out.push_str(&format!(
            "Deleted since snapshot: {}\n",
            report.removed_account_ids.len()
        ));
    }

    out
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::diff::model::DivergentAccount;
    use chrono::Utc;

    fn report(divergent: Vec<DivergentAccount>) -> DivergenceReport {
        DivergenceReport {
            snapshot_id: "snap-1".into(),
            snapshot_captured_at: Utc::now(),
            compared_at: Utc::now(),
            divergent,
            untracked_account_ids: vec!["a9".into()],
            removed_account_ids: Vec::new(),
        }
    }

    #[test]
    fn test_summary_without_divergence() {
        let text = render_human_summary(&report(Vec::new()));
        assert!(text.contains("snap-1"));
        assert!(text.contains("No credential changes detected"));
        assert!(text.contains("Not yet snapshotted: 1"));
        assert!(!text.contains("Deleted since snapshot"));
    }

    #[test]
    fn test_summary_lists_divergent_accounts() {
        let text = render_human_summary(&report(vec![DivergentAccount {
            account_id: "a2".into(),
            username: "bob".into(),
        }]));
        assert!(text.contains("Credential changes detected (1)"));
        assert!(text.contains("bob (a2)"));
    }
}
