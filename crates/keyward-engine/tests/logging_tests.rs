//! Log capture assertions; the capture subscriber is process-wide, so every
//! test here uses usernames no other test in this binary uses.

mod common;

use common::{ctx, fast_fingerprinter, secret, tamper_digest, MemoryBackend};
use keyward_core::logging_facility::init_test_capture;
use keyward_core_types::schema;
use keyward_engine::commands::divergence::detect_divergence;
use keyward_engine::commands::lifecycle::{authenticate, register};
use tracing::Level;

#[test]
fn test_register_logs_start_and_end_without_credential() {
    let capture = init_test_capture();
    let backend = MemoryBackend::new();

    register(
        &ctx(),
        &backend.stores(),
        &fast_fingerprinter(),
        "log-user-1",
        &secret("very-secret-credential"),
    )
    .unwrap();

    capture.assert_event_exists("register", "start");
    capture.assert_event_exists("register", "end");
    let leaked = capture.count_events(|e| {
        e.fields
            .values()
            .any(|v| v.contains("very-secret-credential"))
    });
    assert_eq!(leaked, 0);
}

#[test]
fn test_failed_authentication_logs_end_error() {
    let capture = init_test_capture();
    let backend = MemoryBackend::new();

    let _ = authenticate(
        &ctx(),
        &backend.stores(),
        &fast_fingerprinter(),
        "log-user-2",
        &secret("pw"),
    );

    let errors = capture.count_events(|e| {
        e.op.as_deref() == Some("authenticate")
            && e.event.as_deref() == Some("end_error")
            && e.field(schema::FIELD_ERR_CODE) == Some("ERR_CREDENTIAL_MISMATCH")
    });
    assert!(errors >= 1);
}

#[test]
fn test_divergence_logs_warning() {
    let capture = init_test_capture();
    let backend = MemoryBackend::new();
    let fp = fast_fingerprinter();
    let account = register(&ctx(), &backend.stores(), &fp, "log-user-3", &secret("pw"))
        .unwrap()
        .value;
    tamper_digest(&backend.accounts, &account.id, "forged");

    detect_divergence(&ctx(), &backend.stores()).unwrap();

    let warnings = capture.count_events(|e| {
        e.level == Level::WARN
            && e.field("divergent")
                .is_some_and(|v| v.contains(account.id.as_str()))
    });
    assert_eq!(warnings, 1);
}

#[test]
fn test_secondary_failure_logged_between_start_and_end() {
    use common::FailingSnapshotStore;
    use keyward_core::ops::{MemoryAccountStore, MemoryAuditLog};
    use keyward_core_types::schema::EVENT_SECONDARY_FAILURE;
    use keyward_engine::Stores;

    let capture = init_test_capture();
    let accounts = MemoryAccountStore::new();
    let audit = MemoryAuditLog::new();
    let stores = Stores::new(&accounts, &FailingSnapshotStore, &audit);

    let outcome = register(&ctx(), &stores, &fast_fingerprinter(), "log-user-4", &secret("pw"))
        .unwrap();
    assert_eq!(outcome.warnings.len(), 1);

    let failures = capture.count_events(|e| {
        e.level == Level::WARN
            && e.event.as_deref() == Some(EVENT_SECONDARY_FAILURE)
            && e.field("phase") == Some("snapshot")
            && e.field(schema::FIELD_ERR_CODE) == Some("ERR_STORAGE_FAILURE")
    });
    assert!(failures >= 1);
}
