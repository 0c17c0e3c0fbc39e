//! Account lifecycle orchestration.
//!
//! Every mutating operation runs three phases, strictly in order:
//!
//! 1. **Mutation** against the account store (credentials are fingerprinted
//!    first). A failure here aborts the operation; phases 2 and 3 never run.
//! 2. **Snapshot** of the whole population.
//! 3. **Audit** event naming the affected account.
//!
//! Once phase 1 has committed, the mutation stands. Failures in phases 2 and
//! 3 are returned as [`SecondaryWarning`]s next to the successful value; the
//! audit phase still runs when the snapshot phase failed.
//!
//! ## Logging Ownership
//!
//! Each public operation logs one start event and exactly one end or
//! end_error event. Secondary failures are logged at warn level.

use keyward_core::errors::{ExError, KeywardError};
use keyward_core::fingerprint::Fingerprinter;
use keyward_core::model::{
    Account, AccountChanges, AccountFilter, AffectedEntity, AuditAction, AuditEvent,
};
use keyward_core::ops::{AccountStore, AuditLog, SnapshotStore};
use keyward_core::{log_op_end, log_op_error, log_op_start, log_op_warn};
use keyward_core_types::{schema, RequestContext, Sensitive};
use serde::Serialize;

use crate::commands::snapshot::capture_snapshot;
use crate::Result;

/// The collaborator stores an operation runs against
#[derive(Clone, Copy)]
pub struct Stores<'a> {
    pub accounts: &'a dyn AccountStore,
    pub snapshots: &'a dyn SnapshotStore,
    pub audit: &'a dyn AuditLog,
}

impl<'a> Stores<'a> {
    pub fn new(
        accounts: &'a dyn AccountStore,
        snapshots: &'a dyn SnapshotStore,
        audit: &'a dyn AuditLog,
    ) -> Self {
        Self {
            accounts,
            snapshots,
            audit,
        }
    }

    /// Use one backend for all three roles
    pub fn shared<S>(store: &'a S) -> Self
    where
        S: AccountStore + SnapshotStore + AuditLog,
    {
        Self {
            accounts: store,
            snapshots: store,
            audit: store,
        }
    }
}

/// Secondary phase of a lifecycle operation
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum Phase {
    Snapshot,
    Audit,
}

/// A secondary phase that failed after the primary result was committed
#[derive(Debug, Clone, Serialize)]
pub struct SecondaryWarning {
    pub phase: Phase,
    pub code: &'static str,
    /// User-facing text; storage detail stays in `error`
    pub message: &'static str,
    #[serde(skip)]
    pub error: ExError,
}

impl SecondaryWarning {
    fn new(phase: Phase, error: ExError) -> Self {
        Self {
            phase,
            code: error.code(),
            message: error.public_message(),
            error,
        }
    }
}

/// Successful primary result plus any secondary failures
#[derive(Debug, Clone, Serialize)]
pub struct LifecycleOutcome<T> {
    pub value: T,
    pub warnings: Vec<SecondaryWarning>,
}

impl<T> LifecycleOutcome<T> {
    pub fn clean(value: T) -> Self {
        Self {
            value,
            warnings: Vec::new(),
        }
    }

    /// True when every secondary phase succeeded
    pub fn is_clean(&self) -> bool {
        self.warnings.is_empty()
    }

    pub fn warning_for(&self, phase: Phase) -> Option<&SecondaryWarning> {
        self.warnings.iter().find(|w| w.phase == phase)
    }

    pub fn into_value(self) -> T {
        self.value
    }
}

// ---------------------------------------------------------------------------
// Validation
// ---------------------------------------------------------------------------

fn validate_username(username: &str) -> std::result::Result<(), KeywardError> {
    if username.trim().is_empty() {
        return Err(KeywardError::InvalidUsername {
            reason: "username must not be blank".to_string(),
        });
    }
    if username.trim() != username {
        return Err(KeywardError::InvalidUsername {
            reason: "username must not start or end with whitespace".to_string(),
        });
    }
    Ok(())
}

fn validate_credential(credential: &Sensitive<String>) -> std::result::Result<(), KeywardError> {
    if credential.expose().is_empty() {
        return Err(KeywardError::InvalidCredential {
            reason: "credential must not be empty".to_string(),
        });
    }
    Ok(())
}

// ---------------------------------------------------------------------------
// Secondary phases
// ---------------------------------------------------------------------------

fn snapshot_phase(op: &str, stores: &Stores<'_>) -> Option<SecondaryWarning> {
    match capture_snapshot(stores.accounts, stores.snapshots) {
        Ok(_) => None,
        Err(error) => {
            log_op_warn!(op, "snapshot", &error);
            Some(SecondaryWarning::new(Phase::Snapshot, error))
        }
    }
}

fn audit_phase(op: &str, stores: &Stores<'_>, event: &AuditEvent) -> Option<SecondaryWarning> {
    match stores.audit.append(event) {
        Ok(()) => None,
        Err(error) => {
            log_op_warn!(op, "audit", &error);
            Some(SecondaryWarning::new(Phase::Audit, error))
        }
    }
}

/// Run phases 2 and 3 after a committed mutation
fn finish_mutation(
    op: &str,
    ctx: &RequestContext,
    stores: &Stores<'_>,
    account: Account,
    action: AuditAction,
    extra_context: &[(&str, String)],
) -> LifecycleOutcome<Account> {
    let mut warnings = Vec::new();
    warnings.extend(snapshot_phase(op, stores));

    let mut entity = AffectedEntity::account(&account.username, &account.id)
        .with_context(schema::FIELD_REQUEST_ID, ctx.request_id.as_str());
    for (key, value) in extra_context {
        entity = entity.with_context(*key, value);
    }
    let event = AuditEvent::for_action(action, vec![entity]);
    warnings.extend(audit_phase(op, stores, &event));

    LifecycleOutcome {
        value: account,
        warnings,
    }
}

/// Shared wrapper: start/end logging, request id on errors
fn run_logged<T>(
    op: &'static str,
    ctx: &RequestContext,
    body: impl FnOnce() -> Result<LifecycleOutcome<T>>,
) -> Result<LifecycleOutcome<T>> {
    log_op_start!(op, request_id = ctx.request_id.as_str());
    let start = std::time::Instant::now();

    let outcome = body().map_err(|e| {
        log_op_error!(op, e.clone(), duration_ms = start.elapsed().as_millis() as u64);
        e.with_request_id(ctx.request_id.clone())
    })?;

    log_op_end!(
        op,
        duration_ms = start.elapsed().as_millis() as u64,
        warnings = outcome.warnings.len()
    );

    Ok(outcome)
}

// ---------------------------------------------------------------------------
// Operations
// ---------------------------------------------------------------------------

fn create_impl(
    op: &'static str,
    action: AuditAction,
    ctx: &RequestContext,
    stores: &Stores<'_>,
    fingerprinter: &Fingerprinter,
    username: &str,
    credential: &Sensitive<String>,
) -> Result<LifecycleOutcome<Account>> {
    validate_username(username)?;
    validate_credential(credential)?;

    // Store uniqueness still backs this check under concurrent registration
    if !stores
        .accounts
        .find_by_filter(&AccountFilter::by_username(username))?
        .is_empty()
    {
        return Err(KeywardError::UsernameTaken {
            username: username.to_string(),
        }
        .into());
    }

    let digest = fingerprinter.fingerprint(credential)?;
    let account = stores.accounts.create(username, &digest)?;
    tracing::debug!(op, account_id = account.id.as_str(), "account persisted");

    Ok(finish_mutation(op, ctx, stores, account, action, &[]))
}

/// Self-service registration
///
/// # Errors
///
/// `ValidationFailure` for a blank username or empty credential,
/// `AlreadyExists` for a taken username, storage-class kinds if the insert fails.
pub fn register(
    ctx: &RequestContext,
    stores: &Stores<'_>,
    fingerprinter: &Fingerprinter,
    username: &str,
    credential: &Sensitive<String>,
) -> Result<LifecycleOutcome<Account>> {
    run_logged("register", ctx, || {
        create_impl(
            "register",
            AuditAction::AccountRegistered,
            ctx,
            stores,
            fingerprinter,
            username,
            credential,
        )
    })
}

/// Administrative account creation; same contract as [`register`]
///
/// # Errors
///
/// As for [`register`].
pub fn create_account(
    ctx: &RequestContext,
    stores: &Stores<'_>,
    fingerprinter: &Fingerprinter,
    username: &str,
    credential: &Sensitive<String>,
) -> Result<LifecycleOutcome<Account>> {
    run_logged("create_account", ctx, || {
        create_impl(
            "create_account",
            AuditAction::AccountCreated,
            ctx,
            stores,
            fingerprinter,
            username,
            credential,
        )
    })
}

/// Change an account's username, credential, or both
///
/// # Errors
///
/// `ValidationFailure` if neither field is given or a given field is invalid,
/// `NotFound` for an unknown id, `AlreadyExists` for a taken username.
pub fn update_account(
    ctx: &RequestContext,
    stores: &Stores<'_>,
    fingerprinter: &Fingerprinter,
    account_id: &str,
    username: Option<&str>,
    credential: Option<&Sensitive<String>>,
) -> Result<LifecycleOutcome<Account>> {
    run_logged("update_account", ctx, || {
        if username.is_none() && credential.is_none() {
            return Err(KeywardError::EmptyUpdate {
                account_id: account_id.to_string(),
            }
            .into());
        }
        if let Some(username) = username {
            validate_username(username)?;
        }
        if let Some(credential) = credential {
            validate_credential(credential)?;
        }

        if stores.accounts.find_by_id(account_id)?.is_none() {
            return Err(KeywardError::AccountNotFound {
                account_id: account_id.to_string(),
            }
            .into());
        }

        let changes = AccountChanges {
            username: username.map(str::to_string),
            credential_digest: credential
                .map(|c| fingerprinter.fingerprint(c))
                .transpose()?,
        };
        let account = stores.accounts.update(account_id, &changes)?;

        let mut changed = Vec::new();
        if changes.username.is_some() {
            changed.push("username");
        }
        if changes.credential_digest.is_some() {
            changed.push("credential");
        }

        Ok(finish_mutation(
            "update_account",
            ctx,
            stores,
            account,
            AuditAction::AccountUpdated,
            &[(schema::FIELD_CHANGED, changed.join(","))],
        ))
    })
}

/// Remove an account; its history stays in earlier snapshots
///
/// # Errors
///
/// `NotFound` for an unknown id (no snapshot, no audit event),
/// storage-class kinds if the delete fails.
pub fn delete_account(
    ctx: &RequestContext,
    stores: &Stores<'_>,
    account_id: &str,
) -> Result<LifecycleOutcome<Account>> {
    run_logged("delete_account", ctx, || {
        let account = stores.accounts.delete(account_id)?.ok_or_else(|| {
            ExError::from(KeywardError::AccountNotFound {
                account_id: account_id.to_string(),
            })
        })?;

        Ok(finish_mutation(
            "delete_account",
            ctx,
            stores,
            account,
            AuditAction::AccountDeleted,
            &[],
        ))
    })
}

/// Every audit event, newest first
///
/// With `snapshot_first` set, a fresh snapshot is captured before the read;
/// its failure is a warning, not an error.
///
/// # Errors
///
/// Storage-class kinds if the audit log cannot be read.
pub fn list_audit_events(
    ctx: &RequestContext,
    stores: &Stores<'_>,
    snapshot_first: bool,
) -> Result<LifecycleOutcome<Vec<AuditEvent>>> {
    run_logged("list_audit_events", ctx, || {
        let mut warnings = Vec::new();
        if snapshot_first {
            warnings.extend(snapshot_phase("list_audit_events", stores));
        }
        let events = stores.audit.all_ordered_descending()?;
        Ok(LifecycleOutcome {
            value: events,
            warnings,
        })
    })
}

/// Every account in scan order; read-only
///
/// # Errors
///
/// Storage-class kinds.
pub fn list_accounts(ctx: &RequestContext, stores: &Stores<'_>) -> Result<Vec<Account>> {
    run_logged("list_accounts", ctx, || {
        stores.accounts.find_all().map(LifecycleOutcome::clean)
    })
    .map(LifecycleOutcome::into_value)
}

/// Check a credential and record the login
///
/// Unknown usernames and wrong credentials fail identically, in error and in
/// cost: an unknown username is verified against a decoy digest. No snapshot is
/// taken; a failed audit append is a warning.
///
/// # Errors
///
/// `CredentialMismatch` on any authentication failure, storage-class kinds
/// if the account lookup fails.
pub fn authenticate(
    ctx: &RequestContext,
    stores: &Stores<'_>,
    fingerprinter: &Fingerprinter,
    username: &str,
    credential: &Sensitive<String>,
) -> Result<LifecycleOutcome<Account>> {
    run_logged("authenticate", ctx, || {
        let mismatch = || ExError::from(KeywardError::CredentialMismatch);

        let Some(account) = stores
            .accounts
            .find_by_filter(&AccountFilter::by_username(username))?
            .into_iter()
            .next()
        else {
            // Same Argon2 cost as a wrong credential
            fingerprinter.verify_decoy(credential);
            return Err(mismatch());
        };

        let verified = fingerprinter
            .verify(credential, &account.credential_digest)
            .map_err(|e| {
                // Unparseable digest: logged for operators, reported as a mismatch
                tracing::error!(
                    account_id = account.id.as_str(),
                    detail = %e,
                    "stored digest could not be verified"
                );
                mismatch()
            })?;
        if !verified {
            return Err(mismatch());
        }

        let entity = AffectedEntity::account(&account.username, &account.id)
            .with_context(schema::FIELD_REQUEST_ID, ctx.request_id.as_str());
        let event = AuditEvent::for_action(AuditAction::AccountLoggedIn, vec![entity]);
        let warnings = audit_phase("authenticate", stores, &event)
            .into_iter()
            .collect();

        Ok(LifecycleOutcome {
            value: account,
            warnings,
        })
    })
}
