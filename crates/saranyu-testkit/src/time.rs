//! Controllable transaction clock for deterministic testing

use async_trait::async_trait;
use saranyu_core::{LedgerClockEffects, LedgerTime, TimeError};
use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::Arc;

/// Transaction clock a test can set and advance
#[derive(Debug, Clone, Default)]
pub struct ControllableClock {
    current: Arc<AtomicU64>,
}

impl ControllableClock {
    /// Clock starting at `initial` Unix seconds
    pub fn new(initial: u64) -> Self {
        Self {
            current: Arc::new(AtomicU64::new(initial)),
        }
    }

    /// Jump to `timestamp`
    pub fn set(&self, timestamp: u64) {
        self.current.store(timestamp, Ordering::SeqCst);
    }

    /// Move forward by `seconds`
    pub fn advance(&self, seconds: u64) {
        self.current.fetch_add(seconds, Ordering::SeqCst);
    }

    /// Current timestamp
    pub fn now(&self) -> LedgerTime {
        LedgerTime(self.current.load(Ordering::SeqCst))
    }
}

#[async_trait]
impl LedgerClockEffects for ControllableClock {
    async fn transaction_time(&self) -> Result<LedgerTime, TimeError> {
        Ok(self.now())
    }
}
