//! Typed ledger records
//!
//! Tenants, services, delegations and sub-delegations share one flat key
//! namespace. They are stored as JSON objects tagged with a `Type`
//! discriminator (`"T"`, `"S"`, `"D"`, `"SD"`) and resolved by key, then
//! dispatched on the tag.

use crate::capacity::Capacity;
use saranyu_core::{LedgerError, LedgerTime, Pck, Result};
use serde::{Deserialize, Serialize};
use std::collections::BTreeSet;
use std::fmt;

/// A tenant: the only party that may receive a sub-delegation
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Tenant {
    /// Record key
    pub pck: Pck,
    /// Display name
    pub name: String,
    /// Contact email
    pub email: String,
    /// Contact phone number
    pub phone: String,
    /// false once the tenant has been destroyed
    pub registered: bool,
}

/// A service: grandor and recipient of root delegations
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Service {
    /// Record key
    pub pck: Pck,
    /// Display name
    pub name: String,
    /// false once the service has been unregistered
    pub registered: bool,
}

/// Whether a grant is a chain root or a redelegation
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum GrantKind {
    /// Root grant between two services
    Delegation,
    /// Redelegation to a tenant
    SubDelegation,
}

impl fmt::Display for GrantKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            GrantKind::Delegation => f.write_str("delegation"),
            GrantKind::SubDelegation => f.write_str("sub-delegation"),
        }
    }
}

/// A node of the delegation tree, root or redelegation.
///
/// The two kinds share one shape; a root's `chain` is `[pck]`, a child's is
/// its parent's chain with the child appended.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Grant {
    /// Record key
    pub pck: Pck,
    /// Service id for roots, the parent's recipient for sub-delegations
    pub grandor: Pck,
    /// Service for roots, tenant for sub-delegations
    pub recipient: Pck,
    /// Remaining redelegation budget
    #[serde(rename = "subdel")]
    pub subdel_capacity: Capacity,
    /// Start of the validity window (exclusive)
    pub issue: LedgerTime,
    /// End of the validity window (exclusive)
    pub expiry: LedgerTime,
    /// Suspended directly or settled as expired
    pub suspended: bool,
    /// Revoked; never cleared
    pub revoked: bool,
    /// Set once the first terminal transition has credited the parent
    #[serde(rename = "capacityreturned", default)]
    pub capacity_returned: bool,
    /// Identities allowed to revoke this grant
    pub revokers: BTreeSet<Pck>,
    /// Ancestor ids, root first, this grant last
    #[serde(rename = "delegationchain")]
    pub chain: Vec<Pck>,
}

impl Grant {
    /// Root or redelegation, derived from the chain shape
    pub fn kind(&self) -> GrantKind {
        if self.chain.len() > 1 {
            GrantKind::SubDelegation
        } else {
            GrantKind::Delegation
        }
    }

    /// Immediate parent id, `None` for roots
    pub fn parent(&self) -> Option<&Pck> {
        self.chain
            .len()
            .checked_sub(2)
            .and_then(|index| self.chain.get(index))
    }

    /// Depth in the tree, 1 for roots
    pub fn depth(&self) -> usize {
        self.chain.len()
    }

    /// Whether either terminal flag is set
    pub fn is_terminal(&self) -> bool {
        self.suspended || self.revoked
    }

    /// Whether `id` may revoke this grant
    pub fn can_revoke(&self, id: &Pck) -> bool {
        self.revokers.contains(id)
    }

    /// `issue < now < expiry`, ignoring terminal flags
    pub fn window_contains(&self, now: LedgerTime) -> bool {
        self.issue < now && now < self.expiry
    }

    /// Whether the grant has reached its expiry at `now`
    pub fn has_expired_at(&self, now: LedgerTime) -> bool {
        now >= self.expiry
    }

    fn check_shape(&self, tag: RecordType) -> Result<()> {
        if self.chain.last() != Some(&self.pck) {
            return Err(LedgerError::serialization(format!(
                "{}: chain must end with the grant itself",
                self.pck
            )));
        }
        let expected = match self.kind() {
            GrantKind::Delegation => RecordType::Delegation,
            GrantKind::SubDelegation => RecordType::SubDelegation,
        };
        if expected != tag {
            return Err(LedgerError::serialization(format!(
                "{}: tagged {tag} but chain has depth {}",
                self.pck,
                self.depth()
            )));
        }
        Ok(())
    }
}

/// Type discriminator of a stored record
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum RecordType {
    /// `T`
    Tenant,
    /// `S`
    Service,
    /// `D`
    Delegation,
    /// `SD`
    SubDelegation,
}

impl RecordType {
    /// Wire tag
    pub fn tag(self) -> &'static str {
        match self {
            RecordType::Tenant => "T",
            RecordType::Service => "S",
            RecordType::Delegation => "D",
            RecordType::SubDelegation => "SD",
        }
    }
}

impl fmt::Display for RecordType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.tag())
    }
}

/// Any record of the flat key namespace
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "Type")]
pub enum Record {
    /// Tenant identity
    #[serde(rename = "T")]
    Tenant(Tenant),
    /// Service identity
    #[serde(rename = "S")]
    Service(Service),
    /// Root grant between services
    #[serde(rename = "D")]
    Delegation(Grant),
    /// Redelegation to a tenant
    #[serde(rename = "SD")]
    SubDelegation(Grant),
}

impl Record {
    /// Wrap a grant in the variant matching its chain shape
    pub fn from_grant(grant: Grant) -> Self {
        match grant.kind() {
            GrantKind::Delegation => Record::Delegation(grant),
            GrantKind::SubDelegation => Record::SubDelegation(grant),
        }
    }

    /// Key of the record
    pub fn pck(&self) -> &Pck {
        match self {
            Record::Tenant(tenant) => &tenant.pck,
            Record::Service(service) => &service.pck,
            Record::Delegation(grant) | Record::SubDelegation(grant) => &grant.pck,
        }
    }

    /// Type discriminator
    pub fn record_type(&self) -> RecordType {
        match self {
            Record::Tenant(_) => RecordType::Tenant,
            Record::Service(_) => RecordType::Service,
            Record::Delegation(_) => RecordType::Delegation,
            Record::SubDelegation(_) => RecordType::SubDelegation,
        }
    }

    /// Whether the record participates in a delegation chain
    pub fn has_chain(&self) -> bool {
        self.as_grant().is_some()
    }

    /// Whether the record holds a redelegation budget
    pub fn owns_capacity(&self) -> bool {
        self.as_grant().is_some()
    }

    /// Borrow the grant if this is a delegation or sub-delegation
    pub fn as_grant(&self) -> Option<&Grant> {
        match self {
            Record::Delegation(grant) | Record::SubDelegation(grant) => Some(grant),
            _ => None,
        }
    }

    /// Take the grant if this is a delegation or sub-delegation
    pub fn into_grant(self) -> Option<Grant> {
        match self {
            Record::Delegation(grant) | Record::SubDelegation(grant) => Some(grant),
            _ => None,
        }
    }

    /// Serialize for the record store
    pub fn encode(&self) -> Result<Vec<u8>> {
        serde_json::to_vec(self).map_err(LedgerError::from)
    }

    /// Deserialize from the record store and check structural invariants.
    ///
    /// Grants written before the capacity marker existed carry terminal flags
    /// without it; a terminal grant has always been settled.
    pub fn decode(bytes: &[u8]) -> Result<Self> {
        let mut record: Record = serde_json::from_slice(bytes)?;
        let tag = record.record_type();
        if let Record::Delegation(grant) | Record::SubDelegation(grant) = &mut record {
            grant.check_shape(tag)?;
            if grant.is_terminal() {
                grant.capacity_returned = true;
            }
        }
        Ok(record)
    }
}

impl From<Tenant> for Record {
    fn from(tenant: Tenant) -> Self {
        Record::Tenant(tenant)
    }
}

impl From<Service> for Record {
    fn from(service: Service) -> Self {
        Record::Service(service)
    }
}

impl From<Grant> for Record {
    fn from(grant: Grant) -> Self {
        Record::from_grant(grant)
    }
}
