mod common;

use common::{ctx, fast_fingerprinter, secret, tamper_digest, MemoryBackend};
use keyward_core::errors::ExErrorKind;
use keyward_core::ops::AuditLog;
use keyward_core::Fingerprinter;
use keyward_engine::commands::divergence::detect_divergence;
use keyward_engine::commands::lifecycle::{delete_account, register, update_account};

fn alter_outside_lifecycle(backend: &MemoryBackend, fp: &Fingerprinter, account_id: &str) {
    let forged = fp.fingerprint(&secret("forged")).unwrap();
    tamper_digest(&backend.accounts, account_id, &forged);
}

#[test]
fn test_empty_snapshot_store_is_no_snapshot_available() {
    let backend = MemoryBackend::new();

    let err = detect_divergence(&ctx(), &backend.stores()).unwrap_err();

    assert_eq!(err.kind(), ExErrorKind::NoSnapshotAvailable);
    assert_eq!(err.code(), "ERR_NO_SNAPSHOT_AVAILABLE");
    assert!(backend.audit.is_empty());
}

#[test]
fn test_update_through_lifecycle_is_not_divergence() {
    let backend = MemoryBackend::new();
    let fp = fast_fingerprinter();
    let alice = register(&ctx(), &backend.stores(), &fp, "alice", &secret("p1"))
        .unwrap()
        .value;
    update_account(
        &ctx(),
        &backend.stores(),
        &fp,
        &alice.id,
        None,
        Some(&secret("p2")),
    )
    .unwrap();
    let events_before = backend.audit.len();

    let report = detect_divergence(&ctx(), &backend.stores()).unwrap();

    assert!(!report.has_divergence());
    assert_eq!(backend.audit.len(), events_before);
}

#[test]
fn test_direct_mutation_is_reported_and_audited_once() {
    let backend = MemoryBackend::new();
    let fp = fast_fingerprinter();
    let bob = register(&ctx(), &backend.stores(), &fp, "bob", &secret("secret"))
        .unwrap()
        .value;
    let events_before = backend.audit.len();

    alter_outside_lifecycle(&backend, &fp, &bob.id);
    let report = detect_divergence(&ctx(), &backend.stores()).unwrap();

    assert_eq!(report.divergent_ids(), vec![bob.id.as_str()]);
    assert_eq!(report.divergent[0].username, "bob");
    assert_eq!(backend.audit.len(), events_before + 1);

    let event = &backend.audit.all_ordered_descending().unwrap()[0];
    assert_eq!(event.description, "credential divergence detected");
    assert_eq!(event.affected.len(), 1);
    assert!(event.mentions_account(&bob.id));
    assert_eq!(
        event.affected[0].context.get("snapshot_id"),
        Some(&report.snapshot_id)
    );
}

#[test]
fn test_only_tampered_accounts_are_flagged() {
    let backend = MemoryBackend::new();
    let fp = fast_fingerprinter();
    let mut ids = Vec::new();
    for name in ["u1", "u2", "u3", "u4"] {
        ids.push(
            register(&ctx(), &backend.stores(), &fp, name, &secret("pw"))
                .unwrap()
                .value
                .id,
        );
    }

    alter_outside_lifecycle(&backend, &fp, &ids[1]);
    alter_outside_lifecycle(&backend, &fp, &ids[3]);
    let report = detect_divergence(&ctx(), &backend.stores()).unwrap();

    assert_eq!(report.divergent_ids(), vec![ids[1].as_str(), ids[3].as_str()]);
    let event = &backend.audit.all_ordered_descending().unwrap()[0];
    assert_eq!(event.affected.len(), 2);
}

#[test]
fn test_repeated_detection_reports_same_set() {
    let backend = MemoryBackend::new();
    let fp = fast_fingerprinter();
    let bob = register(&ctx(), &backend.stores(), &fp, "bob", &secret("secret"))
        .unwrap()
        .value;
    alter_outside_lifecycle(&backend, &fp, &bob.id);

    let first = detect_divergence(&ctx(), &backend.stores()).unwrap();
    let second = detect_divergence(&ctx(), &backend.stores()).unwrap();

    assert_eq!(first.divergent, second.divergent);
    assert_eq!(first.snapshot_id, second.snapshot_id);
}

#[test]
fn test_lifecycle_mutation_after_tamper_clears_divergence() {
    let backend = MemoryBackend::new();
    let fp = fast_fingerprinter();
    let bob = register(&ctx(), &backend.stores(), &fp, "bob", &secret("secret"))
        .unwrap()
        .value;
    alter_outside_lifecycle(&backend, &fp, &bob.id);

    // Any lifecycle mutation snapshots the population as it stands
    register(&ctx(), &backend.stores(), &fp, "carol", &secret("pw")).unwrap();

    let report = detect_divergence(&ctx(), &backend.stores()).unwrap();
    assert!(!report.has_divergence());
}

#[test]
fn test_added_and_removed_accounts_are_not_divergent() {
    let backend = MemoryBackend::new();
    let fp = fast_fingerprinter();
    let alice = register(&ctx(), &backend.stores(), &fp, "alice", &secret("p1"))
        .unwrap()
        .value;
    register(&ctx(), &backend.stores(), &fp, "bob", &secret("p2")).unwrap();

    // Created directly: absent from every snapshot
    let ghost = {
        use keyward_core::ops::AccountStore;
        backend.accounts.create("ghost", "d").unwrap()
    };
    let events_before = backend.audit.len();

    let report = detect_divergence(&ctx(), &backend.stores()).unwrap();
    assert!(!report.has_divergence());
    assert_eq!(report.untracked_account_ids, vec![ghost.id.clone()]);
    assert_eq!(backend.audit.len(), events_before);

    delete_account(&ctx(), &backend.stores(), &alice.id).unwrap();
    let report = detect_divergence(&ctx(), &backend.stores()).unwrap();
    assert!(!report.has_divergence());
    assert!(report.removed_account_ids.is_empty());
}
