pub mod account;
pub mod audit;
pub mod snapshot;

pub use account::{Account, AccountChanges, AccountFilter};
pub use audit::{AffectedEntity, AuditAction, AuditEvent};
pub use snapshot::{AccountCopy, Snapshot};
