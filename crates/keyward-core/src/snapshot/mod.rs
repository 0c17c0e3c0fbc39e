//! Snapshot construction domain logic.
//!
//! Builds immutable population snapshots from the current account list and
//! computes the digest that guards them against later alteration.
//!
//! ## Responsibilities
//!
//! - Copy each account's stored digest verbatim (never re-derive secrets)
//! - Collapse duplicate ids so no account is counted twice
//! - Compute a deterministic population digest
//!
//! ## Non-Responsibilities
//!
//! - Persistence (handled by `keyward-store`)
//! - Orchestration (handled by `keyward-engine`)

pub mod builder;
pub mod digest;

pub use builder::build_snapshot;
pub use digest::compute_population_digest;
