//! Text-argument contract: parsing, charging and the identity registry

mod common;

use common::{pck, T0};
use saranyu_delegation::{
    DelegationContract, DelegationLedger, ErrorKind, LedgerConfig, Record, TransitionOutcome,
};
use saranyu_testkit::{ControllableClock, MemoryStorageHandler};

fn contract_at(now: u64) -> (
    DelegationContract<MemoryStorageHandler, ControllableClock>,
    ControllableClock,
) {
    let clock = ControllableClock::new(now);
    let ledger = DelegationLedger::new(MemoryStorageHandler::new(), clock.clone());
    (DelegationContract::new(ledger), clock)
}

#[tokio::test]
async fn test_charge_counts_completed_hours() {
    let (contract, clock) = contract_at(T0 + 1);
    contract.init_ledger().await.unwrap();
    let issue = T0.to_string();
    let expiry = (T0 + 7200).to_string();
    contract
        .register_delegation("D1", "S1", "S2", "3", &issue, &expiry)
        .await
        .unwrap();

    clock.set(T0 + 5400);
    assert_eq!(contract.compute_charge("D1", "4").await.unwrap(), 8);

    clock.set(T0);
    assert_eq!(contract.compute_charge("D1", "4").await.unwrap(), 0);

    clock.set(T0 + 100_000);
    assert_eq!(contract.compute_charge("D1", "4").await.unwrap(), 16);
}

#[tokio::test]
async fn test_charge_uses_configured_rate() {
    let config = LedgerConfig {
        charge_rate_per_hour: 3,
        charge_period_secs: 60,
        ..LedgerConfig::default()
    };
    let clock = ControllableClock::new(T0 + 1);
    let ledger = DelegationLedger::with_config(MemoryStorageHandler::new(), clock.clone(), &config);
    let contract = DelegationContract::new(ledger);
    contract.init_ledger().await.unwrap();
    contract
        .register_delegation("D1", "S1", "S2", "0", &T0.to_string(), &(T0 + 600).to_string())
        .await
        .unwrap();

    clock.set(T0 + 150);
    assert_eq!(contract.compute_charge("D1", "2").await.unwrap(), 12);
}

#[tokio::test]
async fn test_charge_rejects_sub_delegations() {
    let (contract, _clock) = contract_at(T0 + 1);
    contract.init_ledger().await.unwrap();
    let (issue, expiry) = (T0.to_string(), (T0 + 7200).to_string());
    contract
        .register_delegation("D1", "S1", "S2", "3", &issue, &expiry)
        .await
        .unwrap();
    contract
        .register_sub_delegation("SD1", "D1", "T1", "0", &issue, &expiry)
        .await
        .unwrap();

    let err = contract.compute_charge("SD1", "1").await.unwrap_err();
    assert_eq!(err.kind(), ErrorKind::InvalidArgument);
}

#[tokio::test]
async fn test_malformed_numbers_are_rejected_before_any_write() {
    let (contract, _clock) = contract_at(T0 + 1);
    contract.init_ledger().await.unwrap();
    let expiry = (T0 + 7200).to_string();
    let issue = T0.to_string();

    let cases = [
        ("256", issue.as_str(), expiry.as_str()),
        ("-1", issue.as_str(), expiry.as_str()),
        ("1", "", expiry.as_str()),
        ("1", issue.as_str(), "99999999999999999999"),
        ("1", "17e8", expiry.as_str()),
    ];
    for (subdel, issue, expiry) in cases {
        let err = contract
            .register_delegation("D1", "S1", "S2", subdel, issue, expiry)
            .await
            .unwrap_err();
        assert_eq!(err.kind(), ErrorKind::InvalidArgument, "{subdel} {issue} {expiry}");
    }
    assert_eq!(
        contract.read_record("D1").await.unwrap_err().kind(),
        ErrorKind::NotFound
    );

    contract
        .register_delegation("D1", "S1", "S2", "1", &issue, &expiry)
        .await
        .unwrap();
    let err = contract.compute_charge("D1", "four").await.unwrap_err();
    assert_eq!(err.kind(), ErrorKind::InvalidArgument);
}

#[tokio::test]
async fn test_root_registration_rules() {
    let (contract, _clock) = contract_at(T0 + 1);
    contract.init_ledger().await.unwrap();
    contract.unregister_service("S3").await.unwrap();
    let (issue, expiry) = (T0.to_string(), (T0 + 7200).to_string());

    let cases = [
        ("S1", "S1", ErrorKind::SelfDelegation),
        ("S3", "S1", ErrorKind::InvalidGrandor),
        ("T1", "S1", ErrorKind::InvalidGrandor),
        ("S1", "S3", ErrorKind::InvalidRecipient),
        ("S1", "T1", ErrorKind::InvalidRecipient),
    ];
    for (grandor, recipient, kind) in cases {
        let err = contract
            .register_delegation("D1", grandor, recipient, "1", &issue, &expiry)
            .await
            .unwrap_err();
        assert_eq!(err.kind(), kind, "{grandor} -> {recipient}");
    }

    let root = contract
        .register_delegation("D1", "S1", "S2", "1", &issue, &expiry)
        .await
        .unwrap();
    assert_eq!(root.chain, vec![pck("D1")]);
    assert!(root.can_revoke(&pck("S1")) && root.can_revoke(&pck("S2")));

    let outcome = contract.revoke_delegation("D1", "S2").await.unwrap();
    assert_eq!(outcome, TransitionOutcome::Applied { credited: None });
    assert!(contract.is_revoked("D1").await.unwrap());
    assert!(!contract.is_valid("D1").await.unwrap());
}

#[tokio::test]
async fn test_tenant_registry_round_trip() {
    let (contract, _clock) = contract_at(T0);
    contract
        .enroll("T42", "Acme", "ops@acme.test", "5550100")
        .await
        .unwrap();
    contract
        .update("T42", "Acme Ltd", "billing@acme.test", "5550199")
        .await
        .unwrap();

    let Record::Tenant(tenant) = contract.read_record("T42").await.unwrap() else {
        panic!("expected a tenant record");
    };
    assert_eq!(tenant.name, "Acme Ltd");
    assert!(tenant.registered);

    let destroyed = contract.destroy_tenant("T42").await.unwrap();
    assert!(!destroyed.registered);
    assert_eq!(
        contract.update("T43", "x", "y", "z").await.unwrap_err().kind(),
        ErrorKind::NotFound
    );
    assert_eq!(
        contract.enroll("bad id", "x", "y", "z").await.unwrap_err().kind(),
        ErrorKind::InvalidArgument
    );
}

#[tokio::test]
async fn test_init_leaves_grants_and_destroyed_tenants_alone() {
    let (contract, _clock) = contract_at(T0 + 1);
    contract.register_service("X1", "Edge").await.unwrap();
    contract.register_service("X2", "Core").await.unwrap();
    let (issue, expiry) = (T0.to_string(), (T0 + 7200).to_string());
    contract
        .register_delegation("S3", "X1", "X2", "2", &issue, &expiry)
        .await
        .unwrap();

    assert_eq!(contract.init_ledger().await.unwrap(), 10);
    assert!(contract.is_valid("S3").await.unwrap());
    assert!(matches!(
        contract.read_record("S3").await.unwrap(),
        Record::Delegation(_)
    ));

    contract.destroy_tenant("T1").await.unwrap();
    assert_eq!(contract.init_ledger().await.unwrap(), 0);
    let Record::Tenant(tenant) = contract.read_record("T1").await.unwrap() else {
        panic!("expected a tenant record");
    };
    assert!(!tenant.registered);
}
