//! Audit log listing

use std::process::ExitCode;

use clap::Args;
use keyward_core::errors::ExError;
use keyward_core::model::AuditEvent;
use keyward_engine::{EngineCommand, EngineCommandResult};

use super::{print_json, print_warnings, unexpected_result, Session};

#[derive(Debug, Args)]
pub struct AuditArgs {
    /// Skip the snapshot normally taken before listing
    #[arg(long)]
    pub no_snapshot: bool,
}

/// List audit events, newest first
///
/// # Errors
///
/// Storage-class kinds if the audit log cannot be read.
pub fn execute(session: &Session, args: AuditArgs) -> Result<ExitCode, ExError> {
    let mut config = session.config().clone();
    if args.no_snapshot {
        config.audit.snapshot_on_read = false;
    }
    let outcome = match session.apply_with(EngineCommand::ListAuditEvents, &config)? {
        EngineCommandResult::AuditEvents(outcome) => outcome,
        other => return Err(unexpected_result(&other)),
    };
    print_warnings(&outcome.warnings);

    if session.json() {
        print_json(&outcome.value)?;
    } else if outcome.value.is_empty() {
        println!("No audit events");
    } else {
        for event in &outcome.value {
            println!("{}", format_event(event));
        }
    }
    Ok(ExitCode::SUCCESS)
}

fn format_event(event: &AuditEvent) -> String {
    let affected: Vec<String> = event
        .affected
        .iter()
        .map(|a| {
            let name = a.username.as_deref().unwrap_or("-");
            match &a.account_id {
                Some(id) => format!("{} ({})", name, id),
                None => name.to_string(),
            }
        })
        .collect();
    format!(
        "{}  {}  {}",
        event.recorded_at.to_rfc3339(),
        event.description,
        affected.join(", ")
    )
}
