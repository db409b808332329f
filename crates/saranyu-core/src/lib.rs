//! Saranyu Core - foundation for the delegation ledger
//!
//! This crate holds the types every other Saranyu crate agrees on and the
//! effect interfaces the ledger consumes from its host. It contains no
//! ledger semantics.
//!
//! # Contents
//!
//! - `Pck`: opaque record key shared by tenants, services and grants
//! - `LedgerTime`: deterministic transaction timestamp (Unix seconds)
//! - `LedgerError`: unified error for every ledger operation
//! - `StorageEffects`, `LedgerClockEffects`: the record store and the
//!   transaction clock supplied by the hosting environment
//! - `LedgerConfig`: tunables loaded from TOML and the environment

#![forbid(unsafe_code)]

/// Ledger configuration and validation
pub mod config;

/// Effect interfaces (no implementations)
pub mod effects;

/// Unified error handling
pub mod errors;

/// Record identifiers
pub mod identifiers;

/// Deterministic ledger time
pub mod time;

pub use config::{ConfigValidator, LedgerConfig, LedgerConfigExt, ValidationError};
pub use effects::{LedgerClockEffects, StorageEffects, StorageError, TimeError};
pub use errors::{ErrorKind, LedgerError, Result};
pub use identifiers::Pck;
pub use time::LedgerTime;
