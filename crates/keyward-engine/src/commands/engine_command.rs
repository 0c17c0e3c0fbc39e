//! Engine-level commands: one entry point for every operation.

use keyward_core::diff::DivergenceReport;
use keyward_core::fingerprint::Fingerprinter;
use keyward_core::model::{Account, AuditEvent};
use keyward_core_types::{RequestContext, Sensitive};

use crate::commands::divergence::detect_divergence;
use crate::commands::lifecycle::{self, LifecycleOutcome, Stores};
use crate::config::EngineConfig;
use crate::Result;

/// Operations a transport can invoke
#[derive(Debug, Clone)]
pub enum EngineCommand {
    Register {
        username: String,
        credential: Sensitive<String>,
    },
    /// Administrative creation; audited separately from self-service registration
    CreateAccount {
        username: String,
        credential: Sensitive<String>,
    },
    UpdateAccount {
        account_id: String,
        username: Option<String>,
        credential: Option<Sensitive<String>>,
    },
    DeleteAccount {
        account_id: String,
    },
    Authenticate {
        username: String,
        credential: Sensitive<String>,
    },
    CheckForDivergence,
    ListAuditEvents,
    ListAccounts,
}

impl EngineCommand {
    /// Stable operation name for logs and dispatch
    pub fn name(&self) -> &'static str {
        match self {
            EngineCommand::Register { .. } => "register",
            EngineCommand::CreateAccount { .. } => "create_account",
            EngineCommand::UpdateAccount { .. } => "update_account",
            EngineCommand::DeleteAccount { .. } => "delete_account",
            EngineCommand::Authenticate { .. } => "authenticate",
            EngineCommand::CheckForDivergence => "check_for_divergence",
            EngineCommand::ListAuditEvents => "list_audit_events",
            EngineCommand::ListAccounts => "list_accounts",
        }
    }
}

/// Result of applying an engine command
#[derive(Debug, Clone)]
pub enum EngineCommandResult {
    /// Register, create, update, delete or authenticate
    Account(LifecycleOutcome<Account>),
    Divergence(DivergenceReport),
    AuditEvents(LifecycleOutcome<Vec<AuditEvent>>),
    Accounts(Vec<Account>),
}

/// Apply an engine command against a set of stores
///
/// # Errors
///
/// Whatever the dispatched operation returns; the error carries the
/// request id from `ctx`.
pub fn apply_engine_command(
    cmd: EngineCommand,
    ctx: &RequestContext,
    stores: &Stores<'_>,
    fingerprinter: &Fingerprinter,
    config: &EngineConfig,
) -> Result<EngineCommandResult> {
    tracing::debug!(
        command = cmd.name(),
        request_id = ctx.request_id.as_str(),
        "dispatching engine command"
    );

    match cmd {
        EngineCommand::Register {
            username,
            credential,
        } => lifecycle::register(ctx, stores, fingerprinter, &username, &credential)
            .map(EngineCommandResult::Account),
        EngineCommand::CreateAccount {
            username,
            credential,
        } => lifecycle::create_account(ctx, stores, fingerprinter, &username, &credential)
            .map(EngineCommandResult::Account),
        EngineCommand::UpdateAccount {
            account_id,
            username,
            credential,
        } => lifecycle::update_account(
            ctx,
            stores,
            fingerprinter,
            &account_id,
            username.as_deref(),
            credential.as_ref(),
        )
        .map(EngineCommandResult::Account),
        EngineCommand::DeleteAccount { account_id } => {
            lifecycle::delete_account(ctx, stores, &account_id).map(EngineCommandResult::Account)
        }
        EngineCommand::Authenticate {
            username,
            credential,
        } => lifecycle::authenticate(ctx, stores, fingerprinter, &username, &credential)
            .map(EngineCommandResult::Account),
        EngineCommand::CheckForDivergence => {
            detect_divergence(ctx, stores).map(EngineCommandResult::Divergence)
        }
        EngineCommand::ListAuditEvents => {
            lifecycle::list_audit_events(ctx, stores, config.snapshot_on_audit_read())
                .map(EngineCommandResult::AuditEvents)
        }
        EngineCommand::ListAccounts => {
            lifecycle::list_accounts(ctx, stores).map(EngineCommandResult::Accounts)
        }
    }
}
