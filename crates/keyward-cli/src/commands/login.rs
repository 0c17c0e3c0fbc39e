//! Credential check

use std::process::ExitCode;

use clap::Args;
use keyward_core::errors::ExError;
use keyward_engine::{EngineCommand, EngineCommandResult};

use super::{print_json, print_warnings, unexpected_result, CredentialInput, Session};

#[derive(Debug, Args)]
pub struct LoginArgs {
    pub username: String,

    #[command(flatten)]
    pub credential: CredentialInput,
}

/// Authenticate and record the login
///
/// # Errors
///
/// `CredentialMismatch` for an unknown user or a wrong credential.
pub fn execute(session: &Session, args: LoginArgs) -> Result<ExitCode, ExError> {
    let cmd = EngineCommand::Authenticate {
        username: args.username,
        credential: args.credential.require()?,
    };

    match session.apply(cmd)? {
        EngineCommandResult::Account(outcome) => {
            print_warnings(&outcome.warnings);
            if session.json() {
                print_json(&outcome)?;
            } else {
                println!("Authenticated: {}", outcome.value.username);
            }
            Ok(ExitCode::SUCCESS)
        }
        other => Err(unexpected_result(&other)),
    }
}
