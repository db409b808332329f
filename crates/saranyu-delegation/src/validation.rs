//! Creation-time constraint checks
//!
//! The validator inspects a proposed grant against the current state of the
//! ledger and, on success, returns the records the registration must write:
//! the new grant and, for sub-delegations, the debited parent. It never
//! writes anything itself.

use crate::capacity::{self, Capacity};
use crate::chain::find_in_chain;
use crate::records::{Grant, Record};
use crate::transaction::LedgerTransaction;
use saranyu_core::config::DEFAULT_MAX_CHAIN_DEPTH;
use saranyu_core::{LedgerError, LedgerTime, Pck, Result, StorageEffects};
use std::collections::BTreeSet;

/// Parameters of a root delegation between two services
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DelegationRequest {
    /// Key of the new root
    pub pck: Pck,
    /// Registered service granting the delegation
    pub grandor: Pck,
    /// Registered service receiving it
    pub recipient: Pck,
    /// Redelegation budget handed to the recipient
    pub subdel: Capacity,
    /// Start of the validity window
    pub issue: LedgerTime,
    /// End of the validity window
    pub expiry: LedgerTime,
}

/// Parameters of a redelegation to a tenant
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SubDelegationRequest {
    /// Key of the new sub-delegation
    pub pck: Pck,
    /// Delegation or sub-delegation being redelegated
    pub parent: Pck,
    /// Registered tenant receiving it
    pub recipient: Pck,
    /// Budget handed on; the parent pays this plus one
    pub subdel: Capacity,
    /// Must not precede the parent's issue time
    pub issue: LedgerTime,
    /// Must not exceed the parent's expiry
    pub expiry: LedgerTime,
}

/// Records a validated sub-delegation writes
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SubDelegationPlan {
    /// Parent with its capacity already debited
    pub parent: Grant,
    /// The new grant
    pub child: Grant,
}

/// Creation-time checks for delegations and sub-delegations
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ChainValidator {
    max_chain_depth: usize,
}

impl Default for ChainValidator {
    fn default() -> Self {
        Self::new(DEFAULT_MAX_CHAIN_DEPTH)
    }
}

impl ChainValidator {
    /// Validator allowing chains of at most `max_chain_depth` records
    pub fn new(max_chain_depth: usize) -> Self {
        Self { max_chain_depth }
    }

    /// Check a root delegation and build its record.
    ///
    /// Both parties must be registered services, distinct from each other,
    /// and the window must be ordered and end after the transaction time.
    pub async fn check_delegation<S: StorageEffects + ?Sized>(
        &self,
        tx: &LedgerTransaction<'_, S>,
        request: &DelegationRequest,
    ) -> Result<Grant> {
        tx.ensure_vacant(&request.pck).await?;

        match tx.get(&request.grandor).await? {
            Some(Record::Service(service)) if service.registered => {}
            Some(Record::Service(_)) => {
                return Err(LedgerError::invalid_grandor(format!(
                    "service {} is unregistered",
                    request.grandor
                )))
            }
            _ => {
                return Err(LedgerError::invalid_grandor(format!(
                    "{} is not a registered service",
                    request.grandor
                )))
            }
        }
        match tx.get(&request.recipient).await? {
            Some(Record::Service(service)) if service.registered => {}
            Some(Record::Service(_)) => {
                return Err(LedgerError::invalid_recipient(format!(
                    "service {} is unregistered",
                    request.recipient
                )))
            }
            _ => {
                return Err(LedgerError::invalid_recipient(format!(
                    "{} is not a registered service",
                    request.recipient
                )))
            }
        }

        if request.grandor == request.recipient {
            return Err(LedgerError::self_delegation(format!(
                "{} cannot delegate to itself",
                request.grandor
            )));
        }
        if request.issue > request.expiry {
            return Err(LedgerError::window_violation(format!(
                "issue {} is after expiry {}",
                request.issue, request.expiry
            )));
        }
        ensure_not_expired(request.expiry, tx.now())?;

        Ok(Grant {
            pck: request.pck.clone(),
            grandor: request.grandor.clone(),
            recipient: request.recipient.clone(),
            subdel_capacity: request.subdel,
            issue: request.issue,
            expiry: request.expiry,
            suspended: false,
            revoked: false,
            capacity_returned: false,
            revokers: [request.grandor.clone(), request.recipient.clone()]
                .into_iter()
                .collect(),
            chain: vec![request.pck.clone()],
        })
    }

    /// Check a sub-delegation against its parent and build the writes.
    ///
    /// Checks run in a fixed order so the reported error is stable: parent
    /// lookup, recipient, self-delegation, capacity, window, expiry, chain
    /// depth, then the transitive ancestor walk.
    pub async fn check_sub_delegation<S: StorageEffects + ?Sized>(
        &self,
        tx: &LedgerTransaction<'_, S>,
        request: &SubDelegationRequest,
    ) -> Result<SubDelegationPlan> {
        tx.ensure_vacant(&request.pck).await?;

        let mut parent = match tx.get(&request.parent).await? {
            Some(record) => record.into_grant().ok_or_else(|| {
                LedgerError::not_found(format!(
                    "{} is not a delegation or sub-delegation",
                    request.parent
                ))
            })?,
            None => {
                return Err(LedgerError::not_found(format!(
                    "{} does not exist",
                    request.parent
                )))
            }
        };

        match tx.get(&request.recipient).await? {
            Some(Record::Tenant(tenant)) if tenant.registered => {}
            Some(Record::Tenant(_)) => {
                return Err(LedgerError::invalid_recipient(format!(
                    "tenant {} has been destroyed",
                    request.recipient
                )))
            }
            Some(Record::Service(_)) => {
                return Err(LedgerError::invalid_recipient(format!(
                    "{} is a service; sub-delegation recipients must be tenants",
                    request.recipient
                )))
            }
            _ => {
                return Err(LedgerError::invalid_recipient(format!(
                    "{} is not a registered tenant",
                    request.recipient
                )))
            }
        }

        if request.recipient == parent.recipient {
            return Err(LedgerError::self_delegation(format!(
                "{} already holds {}",
                request.recipient, parent.pck
            )));
        }

        capacity::debit(&mut parent, request.subdel)?;

        if request.issue < parent.issue {
            return Err(LedgerError::window_violation(format!(
                "issue {} precedes parent issue {}",
                request.issue, parent.issue
            )));
        }
        if request.expiry > parent.expiry {
            return Err(LedgerError::window_violation(format!(
                "expiry {} exceeds parent expiry {}",
                request.expiry, parent.expiry
            )));
        }
        if request.issue > request.expiry {
            return Err(LedgerError::window_violation(format!(
                "issue {} is after expiry {}",
                request.issue, request.expiry
            )));
        }
        ensure_not_expired(request.expiry, tx.now())?;

        if parent.depth() >= self.max_chain_depth {
            return Err(LedgerError::invalid_argument(format!(
                "chain of {} already has the maximum depth {}",
                parent.pck, self.max_chain_depth
            )));
        }

        if let Some(inactive) = find_in_chain(tx, &parent.chain, Grant::is_terminal).await? {
            let state = if inactive.suspended {
                "suspended"
            } else {
                "revoked"
            };
            return Err(LedgerError::ancestor_inactive(format!(
                "ancestor {} has been {state}",
                inactive.pck
            )));
        }

        let mut revokers: BTreeSet<Pck> = parent.revokers.clone();
        revokers.insert(request.recipient.clone());
        let mut chain = parent.chain.clone();
        chain.push(request.pck.clone());

        let child = Grant {
            pck: request.pck.clone(),
            grandor: parent.recipient.clone(),
            recipient: request.recipient.clone(),
            subdel_capacity: request.subdel,
            issue: request.issue,
            expiry: request.expiry,
            suspended: false,
            revoked: false,
            capacity_returned: false,
            revokers,
            chain,
        };
        Ok(SubDelegationPlan { parent, child })
    }
}

fn ensure_not_expired(expiry: LedgerTime, now: LedgerTime) -> Result<()> {
    if expiry <= now {
        return Err(LedgerError::already_expired(format!(
            "expiry {expiry} is not after transaction time {now}"
        )));
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::records::{Service, Tenant};
    use assert_matches::assert_matches;
    use saranyu_core::ErrorKind;
    use saranyu_testkit::MemoryStorageHandler;

    fn pck(value: &str) -> Pck {
        Pck::new(value).unwrap()
    }

    async fn ledger_with_root(store: &MemoryStorageHandler, capacity: u8) {
        let mut tx = LedgerTransaction::new(store, LedgerTime(50));
        for id in ["S1", "S2"] {
            tx.put(Record::Service(Service {
                pck: pck(id),
                name: id.to_string(),
                registered: true,
            }));
        }
        for (id, registered) in [("T1", true), ("T2", false)] {
            tx.put(Record::Tenant(Tenant {
                pck: pck(id),
                name: id.to_string(),
                email: String::new(),
                phone: String::new(),
                registered,
            }));
        }
        let root = ChainValidator::default()
            .check_delegation(
                &tx,
                &DelegationRequest {
                    pck: pck("D1"),
                    grandor: pck("S1"),
                    recipient: pck("S2"),
                    subdel: Capacity::new(capacity),
                    issue: LedgerTime(100),
                    expiry: LedgerTime(1000),
                },
            )
            .await
            .unwrap();
        tx.put(Record::from_grant(root));
        tx.commit().await.unwrap();
    }

    fn sub_request(recipient: &str, subdel: u8) -> SubDelegationRequest {
        SubDelegationRequest {
            pck: pck("SD1"),
            parent: pck("D1"),
            recipient: pck(recipient),
            subdel: Capacity::new(subdel),
            issue: LedgerTime(100),
            expiry: LedgerTime(900),
        }
    }

    #[tokio::test]
    async fn test_plan_debits_parent_and_extends_chain() {
        let store = MemoryStorageHandler::new();
        ledger_with_root(&store, 5).await;
        let tx = LedgerTransaction::new(&store, LedgerTime(150));

        let plan = ChainValidator::default()
            .check_sub_delegation(&tx, &sub_request("T1", 2))
            .await
            .unwrap();

        assert_eq!(plan.parent.subdel_capacity, Capacity::new(2));
        assert_eq!(plan.child.chain, vec![pck("D1"), pck("SD1")]);
        assert_eq!(plan.child.grandor, pck("S2"));
        assert!(plan.child.can_revoke(&pck("S1")));
        assert!(plan.child.can_revoke(&pck("T1")));
        assert_eq!(tx.staged_len(), 0);
    }

    #[tokio::test]
    async fn test_recipient_rules() {
        let store = MemoryStorageHandler::new();
        ledger_with_root(&store, 5).await;
        let tx = LedgerTransaction::new(&store, LedgerTime(150));
        let validator = ChainValidator::default();

        for recipient in ["T2", "S1", "NOBODY"] {
            let err = validator
                .check_sub_delegation(&tx, &sub_request(recipient, 0))
                .await
                .unwrap_err();
            assert_eq!(err.kind(), ErrorKind::InvalidRecipient, "{recipient}");
        }
    }

    #[tokio::test]
    async fn test_window_must_nest() {
        let store = MemoryStorageHandler::new();
        ledger_with_root(&store, 5).await;
        let tx = LedgerTransaction::new(&store, LedgerTime(150));
        let validator = ChainValidator::default();

        let mut early = sub_request("T1", 0);
        early.issue = LedgerTime(99);
        let mut late = sub_request("T1", 0);
        late.expiry = LedgerTime(1001);
        let mut inverted = sub_request("T1", 0);
        inverted.issue = LedgerTime(500);
        inverted.expiry = LedgerTime(400);

        for request in [early, late, inverted] {
            let err = validator.check_sub_delegation(&tx, &request).await.unwrap_err();
            assert_eq!(err.kind(), ErrorKind::WindowViolation);
        }
    }

    #[tokio::test]
    async fn test_expiry_at_transaction_time_is_rejected() {
        let store = MemoryStorageHandler::new();
        ledger_with_root(&store, 5).await;
        let tx = LedgerTransaction::new(&store, LedgerTime(900));

        let err = ChainValidator::default()
            .check_sub_delegation(&tx, &sub_request("T1", 0))
            .await
            .unwrap_err();
        assert_eq!(err.kind(), ErrorKind::AlreadyExpired);
    }

    #[tokio::test]
    async fn test_depth_limit() {
        let store = MemoryStorageHandler::new();
        ledger_with_root(&store, 5).await;
        let tx = LedgerTransaction::new(&store, LedgerTime(150));

        let err = ChainValidator::new(1)
            .check_sub_delegation(&tx, &sub_request("T1", 0))
            .await
            .unwrap_err();
        assert_matches!(err, LedgerError::InvalidArgument { .. });
    }

    #[tokio::test]
    async fn test_root_checks() {
        let store = MemoryStorageHandler::new();
        ledger_with_root(&store, 5).await;
        let tx = LedgerTransaction::new(&store, LedgerTime(150));
        let validator = ChainValidator::default();
        let base = DelegationRequest {
            pck: pck("D2"),
            grandor: pck("S1"),
            recipient: pck("S2"),
            subdel: Capacity::new(1),
            issue: LedgerTime(100),
            expiry: LedgerTime(1000),
        };

        let mut taken = base.clone();
        taken.pck = pck("D1");
        let mut to_self = base.clone();
        to_self.recipient = pck("S1");
        let mut to_tenant = base.clone();
        to_tenant.recipient = pck("T1");
        let mut from_tenant = base.clone();
        from_tenant.grandor = pck("T1");
        let mut expired = base.clone();
        expired.expiry = LedgerTime(150);

        let cases = [
            (taken, ErrorKind::AlreadyExists),
            (to_self, ErrorKind::SelfDelegation),
            (to_tenant, ErrorKind::InvalidRecipient),
            (from_tenant, ErrorKind::InvalidGrandor),
            (expired, ErrorKind::AlreadyExpired),
        ];
        for (request, kind) in cases {
            let err = validator.check_delegation(&tx, &request).await.unwrap_err();
            assert_eq!(err.kind(), kind, "{request:?}");
        }

        let root = validator.check_delegation(&tx, &base).await.unwrap();
        assert_eq!(root.chain, vec![pck("D2")]);
        assert_eq!(root.revokers.len(), 2);
    }
}
