//! Transaction clocks
//!
//! `FixedClockHandler` carries the timestamp the host assigned to the current
//! transaction and is the handler replicated deployments use.
//! `SystemClockHandler` reads the local wall clock; replicas evaluating the
//! same operation may disagree, so it is only suitable for single-node use.

use async_trait::async_trait;
use saranyu_core::{LedgerClockEffects, LedgerTime, TimeError};
use std::time::{SystemTime, UNIX_EPOCH};

/// Host-supplied transaction timestamp
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct FixedClockHandler {
    timestamp: Option<LedgerTime>,
}

impl FixedClockHandler {
    /// Clock reporting `timestamp` for every read
    pub fn new(timestamp: LedgerTime) -> Self {
        Self {
            timestamp: Some(timestamp),
        }
    }

    /// Clock with no timestamp; every read fails with `TimeError::Missing`
    pub fn unset() -> Self {
        Self { timestamp: None }
    }
}

#[async_trait]
impl LedgerClockEffects for FixedClockHandler {
    async fn transaction_time(&self) -> Result<LedgerTime, TimeError> {
        self.timestamp.ok_or(TimeError::Missing)
    }
}

/// Local wall clock
#[derive(Debug, Clone, Copy, Default)]
pub struct SystemClockHandler;

impl SystemClockHandler {
    /// Clock reading `SystemTime::now()`
    pub fn new() -> Self {
        Self
    }
}

#[async_trait]
impl LedgerClockEffects for SystemClockHandler {
    async fn transaction_time(&self) -> Result<LedgerTime, TimeError> {
        // SystemTime::now() is confined to this production handler.
        SystemTime::now()
            .duration_since(UNIX_EPOCH)
            .map(|elapsed| LedgerTime::from_secs(elapsed.as_secs()))
            .map_err(|e| TimeError::Unavailable {
                reason: e.to_string(),
            })
    }
}
