//! Transitive validity, lazy expiry and creation-time chain checks

mod common;

use common::{pck, Harness, ROOT_EXPIRY, SUB_EXPIRY, T0};
use saranyu_delegation::{Capacity, ErrorKind, LedgerTime, SubDelegationRequest};

async fn three_levels() -> Harness {
    let h = Harness::seeded().await;
    h.root("D1", 10).await;
    h.sub("SD1", "D1", "T1", 5).await.unwrap();
    h.sub("SD2", "SD1", "T2", 3).await.unwrap();
    h.sub("SD3", "SD2", "T3", 0).await.unwrap();
    h
}

#[tokio::test]
async fn test_revoking_any_ancestor_reaches_the_leaf() {
    for (ancestor, revoker) in [("SD1", "S1"), ("SD2", "T1")] {
        let h = three_levels().await;
        assert!(!h.ledger.is_sub_revoked(&pck("SD3")).await.unwrap());
        assert!(h.ledger.is_sub_valid(&pck("SD3")).await.unwrap());

        h.ledger
            .revoke_sub_delegation(&pck(ancestor), &pck(revoker))
            .await
            .unwrap();
        assert!(h.ledger.is_sub_revoked(&pck("SD3")).await.unwrap(), "{ancestor}");
        assert!(!h.ledger.is_sub_valid(&pck("SD3")).await.unwrap());
        assert!(!h.grant("SD3").await.revoked);
    }

    let h = three_levels().await;
    h.ledger
        .revoke_delegation(&pck("D1"), &pck("S2"))
        .await
        .unwrap();
    assert!(h.ledger.is_sub_revoked(&pck("SD3")).await.unwrap());
    assert!(h.ledger.is_revoked(&pck("D1")).await.unwrap());
}

#[tokio::test]
async fn test_root_checks_are_local() {
    let h = three_levels().await;
    h.ledger.suspend_sub_delegation(&pck("SD1")).await.unwrap();

    assert!(h.ledger.is_sub_suspended(&pck("SD3")).await.unwrap());
    assert!(!h.ledger.is_suspended(&pck("D1")).await.unwrap());
    assert!(h.ledger.is_valid(&pck("D1")).await.unwrap());

    h.ledger.suspend_delegation(&pck("D1")).await.unwrap();
    assert!(h.ledger.is_suspended(&pck("D1")).await.unwrap());
    assert!(!h.ledger.is_valid(&pck("D1")).await.unwrap());
}

#[tokio::test]
async fn test_inactive_ancestor_blocks_creation() {
    let h = three_levels().await;
    h.ledger.suspend_sub_delegation(&pck("SD1")).await.unwrap();
    let before = h.capacity("SD2").await;

    let err = h.sub("SD4", "SD2", "T4", 0).await.unwrap_err();
    assert_eq!(err.kind(), ErrorKind::AncestorInactive);
    assert_eq!(h.capacity("SD2").await, before);
}

#[tokio::test]
async fn test_validity_window_is_exclusive() {
    let h = Harness::seeded().await;
    h.root("D1", 2).await;

    h.clock.set(T0);
    assert!(!h.ledger.is_valid(&pck("D1")).await.unwrap());
    h.clock.set(T0 + 1);
    assert!(h.ledger.is_valid(&pck("D1")).await.unwrap());
    h.clock.set(ROOT_EXPIRY - 1);
    assert!(h.ledger.is_valid(&pck("D1")).await.unwrap());
    h.clock.set(ROOT_EXPIRY);
    assert!(!h.ledger.is_valid(&pck("D1")).await.unwrap());
}

#[tokio::test]
async fn test_lazy_expiry_settles_once() {
    let h = Harness::seeded().await;
    h.root("D1", 10).await;
    h.sub("SD1", "D1", "T1", 4).await.unwrap();
    assert_eq!(h.capacity("D1").await, 5);

    h.clock.set(SUB_EXPIRY - 1);
    assert!(!h.ledger.is_sub_expired(&pck("SD1")).await.unwrap());
    assert_eq!(h.capacity("D1").await, 5);

    h.clock.set(SUB_EXPIRY);
    assert!(!h.ledger.is_sub_valid(&pck("SD1")).await.unwrap());
    assert_eq!(h.capacity("D1").await, 10);
    assert!(h.grant("SD1").await.suspended);
    assert!(h.ledger.is_sub_suspended(&pck("SD1")).await.unwrap());

    assert!(h.ledger.is_sub_expired(&pck("SD1")).await.unwrap());
    h.ledger.suspend_sub_delegation(&pck("SD1")).await.unwrap();
    assert_eq!(h.capacity("D1").await, 10);
}

#[tokio::test]
async fn test_root_expiry_is_reported_without_mutation() {
    let h = Harness::seeded().await;
    h.root("D1", 3).await;
    h.clock.set(ROOT_EXPIRY + 5);

    assert!(h.ledger.is_expired(&pck("D1")).await.unwrap());
    let root = h.grant("D1").await;
    assert!(!root.suspended);
    assert!(!root.capacity_returned);
}

#[tokio::test]
async fn test_creation_time_rejections() {
    let h = Harness::seeded().await;
    h.root("D1", 10).await;
    h.ledger
        .destroy_tenant(&pck("T8"))
        .await
        .unwrap();

    let cases = [
        ("GHOST", "T1", ErrorKind::NotFound),
        ("T2", "T1", ErrorKind::NotFound),
        ("D1", "T8", ErrorKind::InvalidRecipient),
        ("D1", "S3", ErrorKind::InvalidRecipient),
        ("D1", "T99", ErrorKind::InvalidRecipient),
        ("D1", "S2", ErrorKind::InvalidRecipient),
    ];
    for (parent, recipient, kind) in cases {
        let err = h.sub("SDX", parent, recipient, 0).await.unwrap_err();
        assert_eq!(err.kind(), kind, "{parent} -> {recipient}");
    }

    h.sub("SD1", "D1", "T1", 2).await.unwrap();
    let err = h.sub("SDX", "SD1", "T1", 0).await.unwrap_err();
    assert_eq!(err.kind(), ErrorKind::SelfDelegation);

    let window = |issue: u64, expiry: u64| SubDelegationRequest {
        pck: pck("SDW"),
        parent: pck("SD1"),
        recipient: pck("T2"),
        subdel: Capacity::ZERO,
        issue: LedgerTime(issue),
        expiry: LedgerTime(expiry),
    };
    for request in [
        window(T0 - 1, SUB_EXPIRY),
        window(T0, SUB_EXPIRY + 1),
        window(T0 + 200, T0 + 100),
    ] {
        let err = h.ledger.register_sub_delegation(request).await.unwrap_err();
        assert_eq!(err.kind(), ErrorKind::WindowViolation);
    }

    let err = h
        .ledger
        .register_sub_delegation(window(T0, T0 + 10))
        .await
        .unwrap_err();
    assert_eq!(err.kind(), ErrorKind::AlreadyExpired);
    assert_eq!(h.capacity("SD1").await, 2);
}

#[tokio::test]
async fn test_typed_operations_reject_the_other_kind() {
    let h = Harness::seeded().await;
    h.root("D1", 10).await;
    h.sub("SD1", "D1", "T1", 0).await.unwrap();

    let err = h.ledger.suspend_delegation(&pck("SD1")).await.unwrap_err();
    assert_eq!(err.kind(), ErrorKind::InvalidArgument);
    let err = h.ledger.is_sub_valid(&pck("D1")).await.unwrap_err();
    assert_eq!(err.kind(), ErrorKind::InvalidArgument);
    let err = h.ledger.is_valid(&pck("T1")).await.unwrap_err();
    assert_eq!(err.kind(), ErrorKind::InvalidArgument);
    let err = h.ledger.is_revoked(&pck("D404")).await.unwrap_err();
    assert_eq!(err.kind(), ErrorKind::NotFound);
}
