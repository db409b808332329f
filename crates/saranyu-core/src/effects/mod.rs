//! Layer 1: Effect trait definitions
//!
//! Pure trait definitions for the side effects the ledger performs. This
//! module defines **what** the ledger needs from its host; handlers in
//! `saranyu-effects` (production) and `saranyu-testkit` (testing) define
//! **how**.
//!
//! - **Storage**: get/put of opaque bytes under a `Pck` key, plus an
//!   all-or-nothing batch write used as the commit point of a transaction
//! - **Clock**: the deterministic timestamp of the current transaction

pub mod storage;
pub mod time;

pub use storage::{StorageEffects, StorageError};
pub use time::{LedgerClockEffects, TimeError};
