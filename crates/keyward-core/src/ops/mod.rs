//! Collaborator store interfaces and their in-memory implementations

pub mod memory;
pub mod store;

pub use memory::{MemoryAccountStore, MemoryAuditLog, MemorySnapshotStore};
pub use store::{AccountStore, AuditLog, SnapshotStore, StoreResult};
