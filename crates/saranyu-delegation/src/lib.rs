//! # Saranyu Delegation - Layer 2: Domain Crate
//!
//! **Purpose**: the capacity-accounting and chain-validity engine of the
//! delegation ledger.
//!
//! A Service grants another Service a time-bounded, revocable
//! [`Delegation`](records::Record::Delegation). The recipient may redelegate
//! to Tenants through [`SubDelegation`](records::Record::SubDelegation)s,
//! each one consuming part of a shared redelegation budget that flows back
//! when a branch is suspended, revoked or expires.
//!
//! ## Core Concepts
//!
//! - **Chain**: every grant lists its ancestors root-first, itself last.
//!   Validity of a node depends on the state of every ancestor.
//! - **Capacity**: creating a child with budget `n` debits the parent by
//!   `n + 1`; the first terminal transition of the child credits it back.
//! - **Lazy expiry**: expiry is settled by whichever read first observes it.
//! - **Transactions**: every operation stages its writes and commits them
//!   through one atomic batch, at one deterministic timestamp.
//!
//! ## What's NOT in this crate
//!
//! - Storage and clock handlers (`saranyu-effects`, `saranyu-testkit`)
//! - Consensus, replication and transaction ordering (host environment)

#![forbid(unsafe_code)]

/// Decimal text argument parsing
pub mod args;

/// Subdel capacity arithmetic and credit-back
pub mod capacity;

/// Shared ancestor walk
pub mod chain;

/// Text-argument contract surface
pub mod contract;

/// Ledger facade
pub mod ledger;

/// Suspend, revoke and expiry transitions
pub mod lifecycle;

/// Point-in-time validity queries
pub mod queries;

/// Typed ledger records
pub mod records;

/// Tenant and service registry
pub mod registry;

/// Buffered per-operation transaction
pub mod transaction;

/// Usage-based charging
pub mod usage;

/// Creation-time constraint checks
pub mod validation;

pub use capacity::Capacity;
pub use contract::DelegationContract;
pub use ledger::DelegationLedger;
pub use lifecycle::{Transition, TransitionOutcome};
pub use records::{Grant, GrantKind, Record, RecordType, Service, Tenant};
pub use registry::TenantProfile;
pub use transaction::LedgerTransaction;
pub use usage::ChargePolicy;
pub use validation::{ChainValidator, DelegationRequest, SubDelegationPlan, SubDelegationRequest};

pub use saranyu_core::{ErrorKind, LedgerConfig, LedgerError, LedgerTime, Pck, Result};
