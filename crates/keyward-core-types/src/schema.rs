//! Canonical schema constants for structured logging and audit context
//!
//! These constants keep log fields and audit entity context keys consistent.

// Canonical field keys for structured logging
pub const FIELD_OP: &str = "op";
pub const FIELD_EVENT: &str = "event";
pub const FIELD_DURATION_MS: &str = "duration_ms";
pub const FIELD_ERR_CODE: &str = "err.code";

// Audit entity context keys
pub const FIELD_REQUEST_ID: &str = "request_id";
pub const FIELD_SNAPSHOT_ID: &str = "snapshot_id";
pub const FIELD_CHANGED: &str = "changed";

// Canonical event names
pub const EVENT_START: &str = "start";
pub const EVENT_END: &str = "end";
pub const EVENT_END_ERROR: &str = "end_error";
pub const EVENT_SECONDARY_FAILURE: &str = "secondary_failure";
