//! # Saranyu Testkit - Layer 8: Testing
//!
//! Stateful effect handlers for exercising the ledger without a real record
//! store or host clock. Kept out of `saranyu-effects` so production builds
//! never link shared mutable test state.
//!
//! - [`MemoryStorageHandler`]: in-memory record store with atomic batches
//! - [`FaultyStorageHandler`]: wraps a store and fails reads or commits on demand
//! - [`ControllableClock`]: transaction clock tests can set and advance

#![forbid(unsafe_code)]

pub mod storage;
pub mod time;

pub use storage::{FaultyStorageHandler, MemoryStorageHandler};
pub use time::ControllableClock;
