//! Schema migrations
//!
//! Each embedded migration is applied once and recorded with a SHA256 of its
//! SQL. Re-running is a no-op; an applied migration whose SQL has since
//! changed is refused.

mod checksums;
mod embedded;
mod runner;

pub use runner::{applied_migrations, apply_migrations};
