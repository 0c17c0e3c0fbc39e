//! Operation logging macros
//!
//! An engine operation logs one `start`, then exactly one `end` or
//! `end_error`. A secondary phase that fails after the mutation committed
//! logs `secondary_failure` at warn level in between.

/// Log the start of an operation
///
/// ```
/// # use keyward_core::log_op_start;
/// log_op_start!("register");
/// log_op_start!("register", request_id = "req-1");
/// ```
#[macro_export]
macro_rules! log_op_start {
    ($op:expr $(, $($field:tt)*)?) => {
        tracing::info!(
            component = module_path!(),
            op = $op,
            event = keyward_core_types::schema::EVENT_START,
            $($($field)*)?
        );
    };
}

/// Log the successful end of an operation
///
/// ```
/// # use keyward_core::log_op_end;
/// log_op_end!("register", duration_ms = 42);
/// log_op_end!("register", duration_ms = 42, warnings = 1);
/// ```
#[macro_export]
macro_rules! log_op_end {
    ($op:expr, duration_ms = $duration:expr $(, $($field:tt)*)?) => {
        tracing::info!(
            component = module_path!(),
            op = $op,
            event = keyward_core_types::schema::EVENT_END,
            duration_ms = $duration,
            $($($field)*)?
        );
    };
}

/// Log the failed end of an operation
///
/// Anything convertible to `ExError` is accepted. Kind and code go out at
/// error level; the operational message, which may hold storage detail,
/// only at debug level.
///
/// ```
/// # use keyward_core::{log_op_error, errors::KeywardError};
/// let err = KeywardError::AccountNotFound { account_id: "a1".to_string() };
/// log_op_error!("delete_account", err, duration_ms = 10);
/// ```
#[macro_export]
macro_rules! log_op_error {
    ($op:expr, $err:expr, duration_ms = $duration:expr $(, $($field:tt)*)?) => {{
        let ex_err: $crate::errors::ExError = $err.into();
        tracing::error!(
            component = module_path!(),
            op = $op,
            event = keyward_core_types::schema::EVENT_END_ERROR,
            duration_ms = $duration,
            err.kind = ?ex_err.kind(),
            err.code = ex_err.code(),
            $($($field)*)?
        );
        tracing::debug!(op = $op, detail = %ex_err, "operation failed");
    }};
}

/// Log a snapshot or audit phase that failed after the mutation committed
///
/// ```
/// # use keyward_core::{log_op_warn, errors::{ExError, ExErrorKind}};
/// let err = ExError::new(ExErrorKind::StorageFailure);
/// log_op_warn!("register", "snapshot", &err);
/// ```
#[macro_export]
macro_rules! log_op_warn {
    ($op:expr, $phase:expr, $err:expr) => {{
        let ex_err: &$crate::errors::ExError = $err;
        tracing::warn!(
            component = module_path!(),
            op = $op,
            event = keyward_core_types::schema::EVENT_SECONDARY_FAILURE,
            phase = $phase,
            err.code = ex_err.code(),
        );
        tracing::debug!(op = $op, phase = $phase, detail = %ex_err, "secondary phase failed");
    }};
}
