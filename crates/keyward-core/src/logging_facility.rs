//! Structured logging
//!
//! `init(profile)` installs the process subscriber once. The `log_op_*`
//! macros give every engine operation the same event shape (`component`,
//! `op`, `event`, `duration_ms`, `err.*`) so logs can be filtered per
//! operation. `test_capture` records events in memory for assertions.
//!
//! Plaintext credentials only ever reach a macro wrapped in
//! `keyward_core_types::Sensitive`, which prints as a redaction marker.
//!
//! ```rust
//! use keyward_core::logging_facility::{init, Profile};
//!
//! init(Profile::Development);
//! ```

pub mod init;
pub mod macros;
pub mod test_capture;

pub use init::{init, Profile};
pub use test_capture::{init_test_capture, CapturedEvent, TestCapture};
