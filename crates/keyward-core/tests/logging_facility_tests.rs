#![allow(clippy::unwrap_used, clippy::expect_used)]

use keyward_core::errors::KeywardError;
use keyward_core::logging_facility::test_capture::init_test_capture;
use keyward_core::{log_op_end, log_op_error, log_op_start};
use keyward_core_types::schema::{self, EVENT_END, EVENT_END_ERROR, EVENT_START};
use keyward_core_types::Sensitive;

#[test]
fn test_log_op_start_macro() {
    let capture = init_test_capture();
    let op_name = "test_log_op_start_unique_1";

    log_op_start!(op_name);

    capture.assert_event_exists(op_name, EVENT_START);
}

#[test]
fn test_log_op_end_macro() {
    let capture = init_test_capture();
    let op_name = "test_log_op_end_unique_2";

    log_op_end!(op_name, duration_ms = 42);

    let end_events: Vec<_> = capture
        .events_for_op(op_name)
        .into_iter()
        .filter(|e| e.event.as_deref() == Some(EVENT_END))
        .collect();

    assert_eq!(end_events.len(), 1, "Should have exactly one end event");
    assert_eq!(end_events[0].field(schema::FIELD_DURATION_MS), Some("42"));
}

#[test]
fn test_log_op_error_includes_code() {
    let capture = init_test_capture();
    let op_name = "test_log_op_error_unique_3";

    let err = KeywardError::AccountNotFound {
        account_id: "a1".to_string(),
    };
    log_op_error!(op_name, err, duration_ms = 10);

    let error_event = capture
        .events_for_op(op_name)
        .into_iter()
        .find(|e| e.event.as_deref() == Some(EVENT_END_ERROR))
        .expect("Should have error event");

    assert_eq!(error_event.field(schema::FIELD_ERR_CODE), Some("ERR_NOT_FOUND"));
    assert_eq!(error_event.field("err.kind"), Some("NotFound"));
}

#[test]
fn test_boundary_ownership_single_start_end() {
    let capture = init_test_capture();
    let op_name = "test_boundary_ownership_unique_4";

    log_op_start!(op_name, account_id = "a1");
    log_op_end!(op_name, duration_ms = 7);

    let starts = capture.count_events(|e| {
        e.op.as_deref() == Some(op_name) && e.event.as_deref() == Some(EVENT_START)
    });
    let ends = capture.count_events(|e| {
        e.op.as_deref() == Some(op_name) && e.event.as_deref() == Some(EVENT_END)
    });

    assert_eq!(starts, 1, "Should have exactly one start event");
    assert_eq!(ends, 1, "Should have exactly one end event");
}

#[test]
fn test_log_macros_with_multiple_fields() {
    let capture = init_test_capture();
    let op_name = "test_log_macros_fields_unique_5";

    log_op_start!(op_name, account_id = "a123", username = "alice");

    let start_event = capture
        .events_for_op(op_name)
        .into_iter()
        .next()
        .expect("Should have start event");

    assert_eq!(start_event.field("account_id"), Some("a123"));
    assert_eq!(start_event.field("username"), Some("alice"));
}

#[test]
fn test_sensitive_value_is_redacted_in_fields() {
    let capture = init_test_capture();
    let op_name = "test_sensitive_redaction_unique_6";
    let credential = Sensitive::new("hunter2".to_string());

    log_op_start!(op_name, credential = %credential);

    let event = capture
        .events_for_op(op_name)
        .into_iter()
        .next()
        .expect("Should have start event");

    let rendered = event.field("credential").unwrap();
    assert!(!rendered.contains("hunter2"));
    assert!(rendered.contains("REDACTED"));
}

#[test]
#[should_panic(expected = "Expected event")]
fn test_test_capture_assert_event_exists_fails() {
    let capture = init_test_capture();

    capture.assert_event_exists("nonexistent_op_truly_unique_999", EVENT_START);
}

#[test]
fn test_log_op_warn_records_phase_and_code() {
    use keyward_core::errors::{ExError, ExErrorKind};
    use keyward_core::log_op_warn;
    use keyward_core_types::schema::EVENT_SECONDARY_FAILURE;

    let capture = init_test_capture();
    let op_name = "test_log_op_warn_unique_7";
    let err = ExError::new(ExErrorKind::Timeout).with_message("database is locked");

    log_op_warn!(op_name, "audit", &err);

    let event = capture
        .events_for_op(op_name)
        .into_iter()
        .find(|e| e.event.as_deref() == Some(EVENT_SECONDARY_FAILURE))
        .expect("Should have secondary failure event");

    assert_eq!(event.level, tracing::Level::WARN);
    assert_eq!(event.field("phase"), Some("audit"));
    assert_eq!(event.field(schema::FIELD_ERR_CODE), Some("ERR_TIMEOUT"));
}
