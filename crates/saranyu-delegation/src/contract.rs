//! Text-argument contract surface
//!
//! Hosts invoke the ledger with string arguments. `DelegationContract` parses
//! them strictly (see [`crate::args`]) and forwards to [`DelegationLedger`];
//! a malformed argument is rejected before any record is read.

use crate::args::{parse_capacity, parse_core_count, parse_pck, parse_timestamp};
use crate::ledger::DelegationLedger;
use crate::records::{Grant, Record, Service, Tenant};
use crate::registry::TenantProfile;
use crate::validation::{DelegationRequest, SubDelegationRequest};
use crate::TransitionOutcome;
use saranyu_core::{LedgerClockEffects, Result, StorageEffects};

/// String-typed entry points over a [`DelegationLedger`]
pub struct DelegationContract<S, C> {
    ledger: DelegationLedger<S, C>,
}

impl<S: StorageEffects, C: LedgerClockEffects> DelegationContract<S, C> {
    /// Wrap a ledger
    pub fn new(ledger: DelegationLedger<S, C>) -> Self {
        Self { ledger }
    }

    /// Typed ledger behind the contract
    pub fn ledger(&self) -> &DelegationLedger<S, C> {
        &self.ledger
    }

    /// Seed the bootstrap tenants and services
    pub async fn init_ledger(&self) -> Result<usize> {
        self.ledger.init_ledger().await
    }

    /// Register a new tenant
    pub async fn enroll(&self, pck: &str, name: &str, email: &str, phone: &str) -> Result<Tenant> {
        let pck = parse_pck("tenant", pck)?;
        self.ledger
            .enroll_tenant(pck, profile(name, email, phone))
            .await
    }

    /// Replace a tenant's contact details
    pub async fn update(&self, pck: &str, name: &str, email: &str, phone: &str) -> Result<Tenant> {
        let pck = parse_pck("tenant", pck)?;
        self.ledger
            .update_tenant(&pck, profile(name, email, phone))
            .await
    }

    /// Mark a tenant as no longer registered
    pub async fn destroy_tenant(&self, pck: &str) -> Result<Tenant> {
        self.ledger
            .destroy_tenant(&parse_pck("tenant", pck)?)
            .await
    }

    /// Register a new service
    pub async fn register_service(&self, pck: &str, name: &str) -> Result<Service> {
        let pck = parse_pck("service", pck)?;
        self.ledger.register_service(pck, name.to_string()).await
    }

    /// Mark a service as no longer registered
    pub async fn unregister_service(&self, pck: &str) -> Result<Service> {
        self.ledger
            .unregister_service(&parse_pck("service", pck)?)
            .await
    }

    /// Root delegation from decimal text arguments
    pub async fn register_delegation(
        &self,
        pck: &str,
        grandor: &str,
        recipient: &str,
        subdel: &str,
        issue: &str,
        expiry: &str,
    ) -> Result<Grant> {
        let request = DelegationRequest {
            pck: parse_pck("delegation", pck)?,
            grandor: parse_pck("grandor", grandor)?,
            recipient: parse_pck("recipient", recipient)?,
            subdel: parse_capacity("subdel", subdel)?,
            issue: parse_timestamp("issue", issue)?,
            expiry: parse_timestamp("expiry", expiry)?,
        };
        self.ledger.register_delegation(request).await
    }

    /// Sub-delegation from decimal text arguments
    pub async fn register_sub_delegation(
        &self,
        pck: &str,
        parent: &str,
        recipient: &str,
        subdel: &str,
        issue: &str,
        expiry: &str,
    ) -> Result<Grant> {
        let request = SubDelegationRequest {
            pck: parse_pck("sub-delegation", pck)?,
            parent: parse_pck("parent", parent)?,
            recipient: parse_pck("recipient", recipient)?,
            subdel: parse_capacity("subdel", subdel)?,
            issue: parse_timestamp("issue", issue)?,
            expiry: parse_timestamp("expiry", expiry)?,
        };
        self.ledger.register_sub_delegation(request).await
    }

    /// Suspend a root delegation
    pub async fn suspend_delegation(&self, pck: &str) -> Result<TransitionOutcome> {
        self.ledger
            .suspend_delegation(&parse_pck("delegation", pck)?)
            .await
    }

    /// Suspend a sub-delegation
    pub async fn suspend_sub_delegation(&self, pck: &str) -> Result<TransitionOutcome> {
        self.ledger
            .suspend_sub_delegation(&parse_pck("sub-delegation", pck)?)
            .await
    }

    /// Revoke a root delegation on behalf of `revoker`
    pub async fn revoke_delegation(&self, pck: &str, revoker: &str) -> Result<TransitionOutcome> {
        let pck = parse_pck("delegation", pck)?;
        let revoker = parse_pck("revoker", revoker)?;
        self.ledger.revoke_delegation(&pck, &revoker).await
    }

    /// Revoke a sub-delegation on behalf of `revoker`
    pub async fn revoke_sub_delegation(
        &self,
        pck: &str,
        revoker: &str,
    ) -> Result<TransitionOutcome> {
        let pck = parse_pck("sub-delegation", pck)?;
        let revoker = parse_pck("revoker", revoker)?;
        self.ledger.revoke_sub_delegation(&pck, &revoker).await
    }

    /// Root is active and inside its window
    pub async fn is_valid(&self, pck: &str) -> Result<bool> {
        self.ledger.is_valid(&parse_pck("delegation", pck)?).await
    }

    /// Sub-delegation and every ancestor are active and inside their windows
    pub async fn is_sub_valid(&self, pck: &str) -> Result<bool> {
        self.ledger
            .is_sub_valid(&parse_pck("sub-delegation", pck)?)
            .await
    }

    /// Root is suspended
    pub async fn is_suspended(&self, pck: &str) -> Result<bool> {
        self.ledger
            .is_suspended(&parse_pck("delegation", pck)?)
            .await
    }

    /// Sub-delegation or an ancestor is suspended
    pub async fn is_sub_suspended(&self, pck: &str) -> Result<bool> {
        self.ledger
            .is_sub_suspended(&parse_pck("sub-delegation", pck)?)
            .await
    }

    /// Root is revoked
    pub async fn is_revoked(&self, pck: &str) -> Result<bool> {
        self.ledger.is_revoked(&parse_pck("delegation", pck)?).await
    }

    /// Sub-delegation or an ancestor is revoked
    pub async fn is_sub_revoked(&self, pck: &str) -> Result<bool> {
        self.ledger
            .is_sub_revoked(&parse_pck("sub-delegation", pck)?)
            .await
    }

    /// Root is past its expiry
    pub async fn is_expired(&self, pck: &str) -> Result<bool> {
        self.ledger.is_expired(&parse_pck("delegation", pck)?).await
    }

    /// Sub-delegation is past its expiry, settling it if so
    pub async fn is_sub_expired(&self, pck: &str) -> Result<bool> {
        self.ledger
            .is_sub_expired(&parse_pck("sub-delegation", pck)?)
            .await
    }

    /// Accrued charge of a root delegation; `cores` is decimal text
    pub async fn compute_charge(&self, pck: &str, cores: &str) -> Result<u64> {
        let pck = parse_pck("delegation", pck)?;
        let cores = parse_core_count(cores)?;
        self.ledger.compute_charge(&pck, cores).await
    }

    /// Raw record stored under `pck`
    pub async fn read_record(&self, pck: &str) -> Result<Record> {
        self.ledger.read_record(&parse_pck("record", pck)?).await
    }
}

fn profile(name: &str, email: &str, phone: &str) -> TenantProfile {
    TenantProfile {
        name: name.to_string(),
        email: email.to_string(),
        phone: phone.to_string(),
    }
}
