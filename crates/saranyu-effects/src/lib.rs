//! # Saranyu Effects - Layer 3: Production Handlers
//!
//! Stateless implementations of the effect traits defined in `saranyu-core`.
//!
//! **Layer Constraint**: no mock handlers here; those live in
//! `saranyu-testkit`.

#![forbid(unsafe_code)]

/// Filesystem record store
pub mod storage;

/// Transaction clocks
pub mod time;

pub use storage::FilesystemStorageHandler;
pub use time::{FixedClockHandler, SystemClockHandler};
