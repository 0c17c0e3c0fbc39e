//! Command orchestration layer.
//!
//! Provides high-level command functions that coordinate between
//! core domain logic and the collaborator stores.
//!
//! ## Logging Ownership
//!
//! The engine owns lifecycle logging: `log_op_start!` at entry, then exactly
//! one of `log_op_end!` or `log_op_error!`. Lower layers use only
//! `tracing::debug!()` for internal detail.

pub mod divergence;
pub mod engine_command;
pub mod lifecycle;
pub mod snapshot;
