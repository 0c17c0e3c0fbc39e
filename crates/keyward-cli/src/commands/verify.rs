//! Divergence check

use std::process::ExitCode;

use clap::Args;
use keyward_core::diff::render_human_summary;
use keyward_core::errors::ExError;
use keyward_engine::{EngineCommand, EngineCommandResult};

use super::{print_json, unexpected_result, Session};

/// Exit status when divergence was found and `--fail-on-divergence` is set
const DIVERGENCE_EXIT: u8 = 2;

#[derive(Debug, Args)]
pub struct VerifyArgs {
    /// Exit with status 2 when any credential diverged
    #[arg(long)]
    pub fail_on_divergence: bool,
}

/// Compare stored credentials with the most recent snapshot
///
/// # Errors
///
/// `NoSnapshotAvailable` if nothing has been snapshotted yet, storage-class
/// kinds if a read or the anomaly record fails.
pub fn execute(session: &Session, args: VerifyArgs) -> Result<ExitCode, ExError> {
    let report = match session.apply(EngineCommand::CheckForDivergence)? {
        EngineCommandResult::Divergence(report) => report,
        other => return Err(unexpected_result(&other)),
    };

    if session.json() {
        print_json(&report)?;
    } else {
        print!("{}", render_human_summary(&report));
    }

    if args.fail_on_divergence && report.has_divergence() {
        return Ok(ExitCode::from(DIVERGENCE_EXIT));
    }
    Ok(ExitCode::SUCCESS)
}
