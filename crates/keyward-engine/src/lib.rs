//! Keyward Engine - Orchestration layer
//!
//! Composes the core's pure pieces (fingerprinting, snapshot building,
//! divergence computation) with the collaborator stores into the operations
//! callers invoke: account lifecycle, divergence checks and audit reads.

pub mod commands;
pub mod config;

use keyward_core::errors::ExError;

/// Result type for engine operations
pub type Result<T> = std::result::Result<T, ExError>;

pub use commands::engine_command::{apply_engine_command, EngineCommand, EngineCommandResult};
pub use commands::lifecycle::{LifecycleOutcome, Phase, SecondaryWarning, Stores};
pub use config::EngineConfig;
