//! Keyward CLI
//!
//! Command-line interface for credential tracking and divergence checks

use std::path::PathBuf;
use std::process::ExitCode;

use clap::{Parser, Subcommand};
use keyward_core::errors::ExError;
use keyward_core::logging_facility;
use keyward_engine::EngineConfig;

mod commands;

use commands::Session;

#[derive(Debug, Parser)]
#[command(name = "keyward")]
#[command(about = "Keyward - credential tracking and divergence detection", long_about = None)]
struct Cli {
    /// SQLite database holding accounts, snapshots and the audit log
    #[arg(long, global = true, env = "KEYWARD_DB", default_value = ".keyward/keyward.db")]
    db: PathBuf,

    /// TOML configuration file
    #[arg(long, global = true, env = "KEYWARD_CONFIG")]
    config: Option<PathBuf>,

    /// Print results as JSON
    #[arg(long, global = true)]
    json: bool,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Debug, Subcommand)]
enum Commands {
    /// Account lifecycle operations
    Account(commands::account::AccountArgs),
    /// Check a credential for an account
    Login(commands::login::LoginArgs),
    /// Compare stored credentials against the most recent snapshot
    Verify(commands::verify::VerifyArgs),
    /// List audit events, newest first
    Audit(commands::audit::AuditArgs),
}

fn run(cli: Cli) -> Result<ExitCode, ExError> {
    let config = match &cli.config {
        Some(path) => EngineConfig::load(path)?,
        None => EngineConfig::default(),
    };
    logging_facility::init(config.logging.profile);

    let session = Session::open(&cli.db, config, cli.json)?;
    match cli.command {
        Commands::Account(args) => commands::account::execute(&session, args),
        Commands::Login(args) => commands::login::execute(&session, args),
        Commands::Verify(args) => commands::verify::execute(&session, args),
        Commands::Audit(args) => commands::audit::execute(&session, args),
    }
}

fn main() -> ExitCode {
    dotenvy::dotenv().ok();
    let cli = Cli::parse();

    match run(cli) {
        Ok(code) => code,
        Err(e) => {
            tracing::debug!(detail = %e, "command failed");
            eprintln!("[{}] {}", e.code(), e.public_message());
            ExitCode::FAILURE
        }
    }
}
