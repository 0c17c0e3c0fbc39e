//! Credential divergence engine.
//!
//! Compares the most recent snapshot against the current account population
//! and reports tracked accounts whose credential digest changed.
//!
//! ## Entry point
//!
//! ```ignore
//! use keyward_core::diff::engine::compute_divergence;
//!
//! let report = compute_divergence(&snapshot, &current, Utc::now());
//! let summary = keyward_core::diff::human_summary::render_human_summary(&report);
//! ```
//!
//! ## Guarantees
//!
//! - **Determinism**: identical inputs produce an identical report.
//! - **Tracked accounts only**: accounts added after the snapshot or deleted
//!   since it are listed separately and never count as divergent.
//! - **Scan order**: divergent accounts appear in current-population order.

pub mod engine;
pub mod human_summary;
pub mod model;

pub use engine::compute_divergence;
pub use human_summary::render_human_summary;
pub use model::{DivergenceReport, DivergentAccount};
