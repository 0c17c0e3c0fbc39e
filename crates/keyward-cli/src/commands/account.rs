//! Account lifecycle subcommands

use std::process::ExitCode;

use clap::{Args, Subcommand};
use keyward_core::errors::ExError;
use keyward_core::model::Account;
use keyward_engine::{EngineCommand, EngineCommandResult, LifecycleOutcome};

use super::{print_json, print_warnings, unexpected_result, CredentialInput, Session};

#[derive(Debug, Args)]
pub struct AccountArgs {
    #[command(subcommand)]
    pub command: AccountCommand,
}

#[derive(Debug, Subcommand)]
pub enum AccountCommand {
    /// Self-service registration
    Register(NewAccountArgs),
    /// Administrative account creation
    Create(NewAccountArgs),
    /// Change an account's username and/or credential
    Update(UpdateArgs),
    /// Remove an account
    Delete(DeleteArgs),
    /// List every account
    List,
}

#[derive(Debug, Args)]
pub struct NewAccountArgs {
    pub username: String,

    #[command(flatten)]
    pub credential: CredentialInput,
}

#[derive(Debug, Args)]
pub struct UpdateArgs {
    pub account_id: String,

    #[arg(long)]
    pub username: Option<String>,

    #[command(flatten)]
    pub credential: CredentialInput,
}

#[derive(Debug, Args)]
pub struct DeleteArgs {
    pub account_id: String,
}

/// Run an account subcommand
///
/// # Errors
///
/// Any engine error; the account is unchanged when one is returned.
pub fn execute(session: &Session, args: AccountArgs) -> Result<ExitCode, ExError> {
    let (verb, cmd) = match args.command {
        AccountCommand::Register(a) => (
            "registered",
            EngineCommand::Register {
                username: a.username,
                credential: a.credential.require()?,
            },
        ),
        AccountCommand::Create(a) => (
            "created",
            EngineCommand::CreateAccount {
                username: a.username,
                credential: a.credential.require()?,
            },
        ),
        AccountCommand::Update(a) => (
            "updated",
            EngineCommand::UpdateAccount {
                account_id: a.account_id,
                username: a.username,
                credential: a.credential.read()?,
            },
        ),
        AccountCommand::Delete(a) => (
            "deleted",
            EngineCommand::DeleteAccount {
                account_id: a.account_id,
            },
        ),
        AccountCommand::List => return list(session),
    };

    match session.apply(cmd)? {
        EngineCommandResult::Account(outcome) => {
            print_outcome(session, verb, &outcome)?;
            Ok(ExitCode::SUCCESS)
        }
        other => Err(unexpected_result(&other)),
    }
}

fn print_outcome(
    session: &Session,
    verb: &str,
    outcome: &LifecycleOutcome<Account>,
) -> Result<(), ExError> {
    print_warnings(&outcome.warnings);
    if session.json() {
        return print_json(outcome);
    }
    println!("Account {}:", verb);
    println!("  account_id: {}", outcome.value.id);
    println!("  username: {}", outcome.value.username);
    Ok(())
}

fn list(session: &Session) -> Result<ExitCode, ExError> {
    let accounts = match session.apply(EngineCommand::ListAccounts)? {
        EngineCommandResult::Accounts(accounts) => accounts,
        other => return Err(unexpected_result(&other)),
    };

    if session.json() {
        print_json(&accounts)?;
    } else if accounts.is_empty() {
        println!("No accounts");
    } else {
        for account in &accounts {
            println!("{}  {}", account.id, account.username);
        }
    }
    Ok(ExitCode::SUCCESS)
}
