//! Subcommand implementations
//!
//! Every subcommand builds one engine command, applies it against the
//! session's store, and prints the result. Secondary warnings go to stderr.

pub mod account;
pub mod audit;
pub mod login;
pub mod verify;

use std::io::BufRead;
use std::path::Path;

use clap::Args;
use keyward_core::errors::{ExError, ExErrorKind};
use keyward_core::fingerprint::Fingerprinter;
use keyward_core_types::{RequestContext, Sensitive};
use keyward_engine::commands::lifecycle::SecondaryWarning;
use keyward_engine::{
    apply_engine_command, EngineCommand, EngineCommandResult, EngineConfig, Phase, Stores,
};
use keyward_store::SqliteStore;
use serde::Serialize;

/// Everything one CLI invocation runs against
pub struct Session {
    store: SqliteStore,
    config: EngineConfig,
    fingerprinter: Fingerprinter,
    json: bool,
}

impl Session {
    /// Open the database (creating its directory) and build the fingerprinter
    ///
    /// # Errors
    ///
    /// `StorageFailure` if the database cannot be opened or migrated,
    /// `ValidationFailure` for bad fingerprint parameters.
    pub fn open(db: &Path, config: EngineConfig, json: bool) -> Result<Self, ExError> {
        if let Some(parent) = db.parent().filter(|p| !p.as_os_str().is_empty()) {
            std::fs::create_dir_all(parent).map_err(|e| {
                ExError::new(ExErrorKind::StorageFailure)
                    .with_op("open_database")
                    .with_message(format!("Cannot create {}: {}", parent.display(), e))
            })?;
        }
        let store = SqliteStore::open(db)?;
        let fingerprinter = config.fingerprinter()?;
        Ok(Self {
            store,
            config,
            fingerprinter,
            json,
        })
    }

    /// Apply one engine command with a fresh request context
    ///
    /// # Errors
    ///
    /// Whatever the engine returns.
    pub fn apply(&self, cmd: EngineCommand) -> Result<EngineCommandResult, ExError> {
        self.apply_with(cmd, &self.config)
    }

    /// Apply with per-invocation overrides of the loaded configuration
    ///
    /// # Errors
    ///
    /// Whatever the engine returns.
    pub fn apply_with(
        &self,
        cmd: EngineCommand,
        config: &EngineConfig,
    ) -> Result<EngineCommandResult, ExError> {
        let ctx = RequestContext::new();
        apply_engine_command(
            cmd,
            &ctx,
            &Stores::shared(&self.store),
            &self.fingerprinter,
            config,
        )
    }

    pub fn config(&self) -> &EngineConfig {
        &self.config
    }

    pub fn json(&self) -> bool {
        self.json
    }
}

/// Print a value as pretty JSON on stdout
///
/// # Errors
///
/// `Serialization` if the value cannot be encoded.
pub fn print_json<T: Serialize>(value: &T) -> Result<(), ExError> {
    let text = serde_json::to_string_pretty(value).map_err(|e| {
        ExError::new(ExErrorKind::Serialization)
            .with_op("print_json")
            .with_message(e.to_string())
    })?;
    println!("{}", text);
    Ok(())
}

pub fn print_warnings(warnings: &[SecondaryWarning]) {
    for w in warnings {
        let phase = match w.phase {
            Phase::Snapshot => "snapshot",
            Phase::Audit => "audit",
        };
        eprintln!("warning: {} phase failed: [{}] {}", phase, w.code, w.message);
    }
}

pub fn unexpected_result(result: &EngineCommandResult) -> ExError {
    ExError::new(ExErrorKind::Internal)
        .with_op("cli_dispatch")
        .with_message(format!("unexpected engine result: {:?}", result))
}

/// Where a credential comes from
#[derive(Debug, Args)]
pub struct CredentialInput {
    /// Credential value (visible in process listings; prefer --credential-stdin)
    #[arg(long, conflicts_with = "credential_stdin")]
    pub credential: Option<String>,

    /// Read the credential from the first line of stdin
    #[arg(long)]
    pub credential_stdin: bool,
}

impl CredentialInput {
    /// Resolve the credential, if one was supplied
    ///
    /// # Errors
    ///
    /// `ValidationFailure` if stdin cannot be read.
    pub fn read(self) -> Result<Option<Sensitive<String>>, ExError> {
        if self.credential_stdin {
            let mut line = String::new();
            std::io::stdin().lock().read_line(&mut line).map_err(|e| {
                ExError::new(ExErrorKind::ValidationFailure)
                    .with_op("read_credential")
                    .with_message(e.to_string())
            })?;
            let trimmed = line.trim_end_matches(['\r', '\n']).to_string();
            return Ok(Some(Sensitive::new(trimmed)));
        }
        Ok(self.credential.map(Sensitive::new))
    }

    /// Resolve a credential that must be present
    ///
    /// # Errors
    ///
    /// `ValidationFailure` if none was supplied or stdin cannot be read.
    pub fn require(self) -> Result<Sensitive<String>, ExError> {
        self.read()?.ok_or_else(|| {
            ExError::new(ExErrorKind::ValidationFailure)
                .with_op("read_credential")
                .with_message("a credential is required (--credential or --credential-stdin)")
        })
    }
}
