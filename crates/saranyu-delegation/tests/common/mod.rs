//! Shared fixtures for ledger integration tests
#![allow(dead_code)]

use saranyu_delegation::{
    Capacity, DelegationLedger, DelegationRequest, Grant, LedgerTime, Pck, Result,
    SubDelegationRequest,
};
use saranyu_testkit::{ControllableClock, MemoryStorageHandler};

/// Issue time of every fixture grant
pub const T0: u64 = 1_700_000_000;
/// Expiry of fixture roots
pub const ROOT_EXPIRY: u64 = T0 + 10_000;
/// Expiry of fixture sub-delegations
pub const SUB_EXPIRY: u64 = T0 + 5_000;

pub fn pck(value: &str) -> Pck {
    Pck::new(value).unwrap()
}

/// Seeded ledger over an in-memory store with a controllable clock
pub struct Harness {
    pub store: MemoryStorageHandler,
    pub clock: ControllableClock,
    pub ledger: DelegationLedger<MemoryStorageHandler, ControllableClock>,
}

impl Harness {
    /// Ledger with the bootstrap identities, clock just after `T0`
    pub async fn seeded() -> Self {
        let store = MemoryStorageHandler::new();
        let clock = ControllableClock::new(T0 + 10);
        let ledger = DelegationLedger::new(store.clone(), clock.clone());
        ledger.init_ledger().await.unwrap();
        Self {
            store,
            clock,
            ledger,
        }
    }

    /// Root `id` from `S1` to `S2`
    pub async fn root(&self, id: &str, subdel: u8) -> Grant {
        self.ledger
            .register_delegation(DelegationRequest {
                pck: pck(id),
                grandor: pck("S1"),
                recipient: pck("S2"),
                subdel: Capacity::new(subdel),
                issue: LedgerTime(T0),
                expiry: LedgerTime(ROOT_EXPIRY),
            })
            .await
            .unwrap()
    }

    /// Sub-delegation `id` of `parent` to tenant `recipient`
    pub async fn sub(&self, id: &str, parent: &str, recipient: &str, subdel: u8) -> Result<Grant> {
        self.ledger
            .register_sub_delegation(SubDelegationRequest {
                pck: pck(id),
                parent: pck(parent),
                recipient: pck(recipient),
                subdel: Capacity::new(subdel),
                issue: LedgerTime(T0),
                expiry: LedgerTime(SUB_EXPIRY),
            })
            .await
    }

    /// Current stored grant
    pub async fn grant(&self, id: &str) -> Grant {
        self.ledger
            .read_record(&pck(id))
            .await
            .unwrap()
            .into_grant()
            .unwrap()
    }

    /// Current stored budget of a grant
    pub async fn capacity(&self, id: &str) -> u8 {
        self.grant(id).await.subdel_capacity.get()
    }
}
