//! Ledger facade
//!
//! `DelegationLedger` binds the domain logic to a record store and a
//! transaction clock. Every operation reads the clock once, runs inside a
//! [`LedgerTransaction`] and commits its writes as one batch; a rejected
//! operation writes nothing.

use crate::lifecycle::{apply_transition, authorize_revoke, detect_expiry};
use crate::queries::{is_active, is_revoked_transitively, is_suspended_transitively};
use crate::records::{Grant, GrantKind, Record, Service, Tenant};
use crate::registry::{self, TenantProfile};
use crate::transaction::LedgerTransaction;
use crate::usage::ChargePolicy;
use crate::validation::{ChainValidator, DelegationRequest, SubDelegationRequest};
use crate::{Transition, TransitionOutcome};
use saranyu_core::{LedgerClockEffects, LedgerConfig, Pck, Result, StorageEffects};

/// Delegation ledger over a record store and a transaction clock
pub struct DelegationLedger<S, C> {
    store: S,
    clock: C,
    validator: ChainValidator,
    charges: ChargePolicy,
}

impl<S: StorageEffects, C: LedgerClockEffects> DelegationLedger<S, C> {
    /// Ledger with default tunables
    pub fn new(store: S, clock: C) -> Self {
        Self::with_config(store, clock, &LedgerConfig::default())
    }

    /// Ledger with tunables taken from `config`
    pub fn with_config(store: S, clock: C, config: &LedgerConfig) -> Self {
        Self {
            store,
            clock,
            validator: ChainValidator::new(config.max_chain_depth),
            charges: ChargePolicy::from(config),
        }
    }

    /// Underlying record store
    pub fn store(&self) -> &S {
        &self.store
    }

    /// Transaction clock
    pub fn clock(&self) -> &C {
        &self.clock
    }

    async fn begin(&self) -> Result<LedgerTransaction<'_, S>> {
        let now = self.clock.transaction_time().await?;
        Ok(LedgerTransaction::new(&self.store, now))
    }

    // Delegations

    /// Create a root delegation between two registered services
    #[tracing::instrument(skip(self), err(level = "warn"))]
    pub async fn register_delegation(&self, request: DelegationRequest) -> Result<Grant> {
        let mut tx = self.begin().await?;
        let grant = self.validator.check_delegation(&tx, &request).await?;
        tx.put(Record::from_grant(grant.clone()));
        tx.commit().await?;
        tracing::info!(grant = %grant.pck, subdel = %grant.subdel_capacity, "delegation registered");
        Ok(grant)
    }

    /// Create a sub-delegation, debiting its parent in the same commit
    #[tracing::instrument(skip(self), err(level = "warn"))]
    pub async fn register_sub_delegation(&self, request: SubDelegationRequest) -> Result<Grant> {
        let mut tx = self.begin().await?;
        let plan = self.validator.check_sub_delegation(&tx, &request).await?;
        let child = plan.child.clone();
        tracing::info!(
            grant = %child.pck,
            parent = %plan.parent.pck,
            amount = child.subdel_capacity.reservation(),
            capacity = %plan.parent.subdel_capacity,
            "parent debited"
        );
        tx.put(Record::from_grant(plan.parent));
        tx.put(Record::from_grant(plan.child));
        tx.commit().await?;
        tracing::info!(grant = %child.pck, depth = child.depth(), "sub-delegation registered");
        Ok(child)
    }

    async fn suspend(&self, pck: &Pck, kind: GrantKind) -> Result<TransitionOutcome> {
        let mut tx = self.begin().await?;
        let grant = tx.load_kind(pck, kind).await?;
        let outcome = apply_transition(&mut tx, grant, Transition::Suspend).await?;
        tx.commit().await?;
        Ok(outcome)
    }

    async fn revoke(&self, pck: &Pck, kind: GrantKind, revoker: &Pck) -> Result<TransitionOutcome> {
        let mut tx = self.begin().await?;
        let grant = tx.load_kind(pck, kind).await?;
        authorize_revoke(&grant, revoker)?;
        let outcome = apply_transition(&mut tx, grant, Transition::Revoke).await?;
        tx.commit().await?;
        Ok(outcome)
    }

    /// Suspend a root delegation
    #[tracing::instrument(skip(self), err(level = "warn"))]
    pub async fn suspend_delegation(&self, pck: &Pck) -> Result<TransitionOutcome> {
        self.suspend(pck, GrantKind::Delegation).await
    }

    /// Suspend a sub-delegation, returning its capacity to the parent
    #[tracing::instrument(skip(self), err(level = "warn"))]
    pub async fn suspend_sub_delegation(&self, pck: &Pck) -> Result<TransitionOutcome> {
        self.suspend(pck, GrantKind::SubDelegation).await
    }

    /// Revoke a root delegation on behalf of `revoker`
    #[tracing::instrument(skip(self), err(level = "warn"))]
    pub async fn revoke_delegation(&self, pck: &Pck, revoker: &Pck) -> Result<TransitionOutcome> {
        self.revoke(pck, GrantKind::Delegation, revoker).await
    }

    /// Revoke a sub-delegation on behalf of `revoker`
    #[tracing::instrument(skip(self), err(level = "warn"))]
    pub async fn revoke_sub_delegation(
        &self,
        pck: &Pck,
        revoker: &Pck,
    ) -> Result<TransitionOutcome> {
        self.revoke(pck, GrantKind::SubDelegation, revoker).await
    }

    // Queries

    async fn valid(&self, pck: &Pck, kind: GrantKind) -> Result<bool> {
        let mut tx = self.begin().await?;
        let grant = tx.load_kind(pck, kind).await?;
        detect_expiry(&mut tx, &grant).await?;
        let active = is_active(&tx, &grant).await?;
        tx.commit().await?;
        tracing::debug!(grant = %pck, active, "validity checked");
        Ok(active)
    }

    async fn expired(&self, pck: &Pck, kind: GrantKind) -> Result<bool> {
        let mut tx = self.begin().await?;
        let grant = tx.load_kind(pck, kind).await?;
        let expired = detect_expiry(&mut tx, &grant).await?;
        tx.commit().await?;
        Ok(expired)
    }

    async fn suspended(&self, pck: &Pck, kind: GrantKind) -> Result<bool> {
        let tx = self.begin().await?;
        let grant = tx.load_kind(pck, kind).await?;
        is_suspended_transitively(&tx, &grant).await
    }

    async fn revoked(&self, pck: &Pck, kind: GrantKind) -> Result<bool> {
        let tx = self.begin().await?;
        let grant = tx.load_kind(pck, kind).await?;
        is_revoked_transitively(&tx, &grant).await
    }

    /// Whether a root delegation is inside its window and not terminal
    #[tracing::instrument(skip(self), err(level = "warn"))]
    pub async fn is_valid(&self, pck: &Pck) -> Result<bool> {
        self.valid(pck, GrantKind::Delegation).await
    }

    /// Whether a sub-delegation is inside its window and its whole chain is live
    #[tracing::instrument(skip(self), err(level = "warn"))]
    pub async fn is_sub_valid(&self, pck: &Pck) -> Result<bool> {
        self.valid(pck, GrantKind::SubDelegation).await
    }

    /// Whether a root delegation is suspended
    #[tracing::instrument(skip(self), err(level = "warn"))]
    pub async fn is_suspended(&self, pck: &Pck) -> Result<bool> {
        self.suspended(pck, GrantKind::Delegation).await
    }

    /// Whether a sub-delegation or any of its ancestors is suspended
    #[tracing::instrument(skip(self), err(level = "warn"))]
    pub async fn is_sub_suspended(&self, pck: &Pck) -> Result<bool> {
        self.suspended(pck, GrantKind::SubDelegation).await
    }

    /// Whether a root delegation is revoked
    #[tracing::instrument(skip(self), err(level = "warn"))]
    pub async fn is_revoked(&self, pck: &Pck) -> Result<bool> {
        self.revoked(pck, GrantKind::Delegation).await
    }

    /// Whether a sub-delegation or any of its ancestors is revoked
    #[tracing::instrument(skip(self), err(level = "warn"))]
    pub async fn is_sub_revoked(&self, pck: &Pck) -> Result<bool> {
        self.revoked(pck, GrantKind::SubDelegation).await
    }

    /// Whether a root delegation has reached its expiry
    #[tracing::instrument(skip(self), err(level = "warn"))]
    pub async fn is_expired(&self, pck: &Pck) -> Result<bool> {
        self.expired(pck, GrantKind::Delegation).await
    }

    /// Whether a sub-delegation has reached its expiry, settling it if so
    #[tracing::instrument(skip(self), err(level = "warn"))]
    pub async fn is_sub_expired(&self, pck: &Pck) -> Result<bool> {
        self.expired(pck, GrantKind::SubDelegation).await
    }

    /// Charge accrued by a root delegation for `cores` cores
    #[tracing::instrument(skip(self), err(level = "warn"))]
    pub async fn compute_charge(&self, pck: &Pck, cores: u64) -> Result<u64> {
        let tx = self.begin().await?;
        let grant = tx.load_kind(pck, GrantKind::Delegation).await?;
        let charge = self.charges.compute(&grant, tx.now(), cores)?;
        tracing::debug!(grant = %pck, cores, charge, "charge computed");
        Ok(charge)
    }

    // Identity registry

    /// Seed the bootstrap tenants and services
    #[tracing::instrument(skip(self), err(level = "warn"))]
    pub async fn init_ledger(&self) -> Result<usize> {
        let mut tx = self.begin().await?;
        let seeded = registry::seed_identities(&mut tx).await?;
        tx.commit().await?;
        tracing::info!(seeded, "ledger initialised");
        Ok(seeded)
    }

    /// Register a new tenant
    #[tracing::instrument(skip(self), err(level = "warn"))]
    pub async fn enroll_tenant(&self, pck: Pck, profile: TenantProfile) -> Result<Tenant> {
        let mut tx = self.begin().await?;
        let tenant = registry::enroll_tenant(&mut tx, pck, profile).await?;
        tx.commit().await?;
        tracing::info!(tenant = %tenant.pck, "tenant enrolled");
        Ok(tenant)
    }

    /// Replace a tenant's contact details
    #[tracing::instrument(skip(self), err(level = "warn"))]
    pub async fn update_tenant(&self, pck: &Pck, profile: TenantProfile) -> Result<Tenant> {
        let mut tx = self.begin().await?;
        let tenant = registry::update_tenant(&mut tx, pck, profile).await?;
        tx.commit().await?;
        Ok(tenant)
    }

    /// Mark a tenant as no longer registered
    #[tracing::instrument(skip(self), err(level = "warn"))]
    pub async fn destroy_tenant(&self, pck: &Pck) -> Result<Tenant> {
        let mut tx = self.begin().await?;
        let tenant = registry::destroy_tenant(&mut tx, pck).await?;
        tx.commit().await?;
        tracing::info!(tenant = %pck, "tenant destroyed");
        Ok(tenant)
    }

    /// Register a new service
    #[tracing::instrument(skip(self), err(level = "warn"))]
    pub async fn register_service(&self, pck: Pck, name: String) -> Result<Service> {
        let mut tx = self.begin().await?;
        let service = registry::register_service(&mut tx, pck, name).await?;
        tx.commit().await?;
        tracing::info!(service = %service.pck, "service registered");
        Ok(service)
    }

    /// Mark a service as no longer registered
    #[tracing::instrument(skip(self), err(level = "warn"))]
    pub async fn unregister_service(&self, pck: &Pck) -> Result<Service> {
        let mut tx = self.begin().await?;
        let service = registry::unregister_service(&mut tx, pck).await?;
        tx.commit().await?;
        tracing::info!(service = %pck, "service unregistered");
        Ok(service)
    }

    /// Tenant stored under `pck`
    pub async fn resolve_tenant(&self, pck: &Pck) -> Result<Tenant> {
        let tx = self.begin().await?;
        registry::resolve_tenant(&tx, pck).await
    }

    /// Service stored under `pck`
    pub async fn resolve_service(&self, pck: &Pck) -> Result<Service> {
        let tx = self.begin().await?;
        registry::resolve_service(&tx, pck).await
    }

    /// Raw record stored under `pck`
    pub async fn read_record(&self, pck: &Pck) -> Result<Record> {
        let tx = self.begin().await?;
        registry::read_record(&tx, pck).await
    }
}
