//! Transaction clock interface
//!
//! # Effect Classification
//!
//! - **Category**: Infrastructure Effect
//! - **Implementation**: `saranyu-effects` (fixed and system clocks),
//!   `saranyu-testkit` (controllable clock)
//! - **Usage**: read exactly once at the start of every ledger operation
//!
//! Every replica evaluating the same operation must observe the same value,
//! so production hosts supply the transaction timestamp rather than reading
//! a local wall clock.

use async_trait::async_trait;
use serde::{Deserialize, Serialize};

use crate::{LedgerError, LedgerTime};

/// Error type for clock operations.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error, Serialize, Deserialize)]
pub enum TimeError {
    /// Host did not supply a transaction timestamp
    #[error("Transaction timestamp not supplied")]
    Missing,
    /// Clock could not be read
    #[error("Clock unavailable: {reason}")]
    Unavailable {
        /// Underlying failure
        reason: String,
    },
}

impl From<TimeError> for LedgerError {
    fn from(err: TimeError) -> Self {
        LedgerError::store_unavailable(format!("transaction clock: {err}"))
    }
}

/// Source of the deterministic transaction timestamp.
#[async_trait]
pub trait LedgerClockEffects: Send + Sync {
    /// Timestamp of the transaction currently being evaluated.
    async fn transaction_time(&self) -> Result<LedgerTime, TimeError>;
}

/// Blanket implementation for Arc<T> where T: LedgerClockEffects
#[async_trait]
impl<T: LedgerClockEffects + ?Sized> LedgerClockEffects for std::sync::Arc<T> {
    async fn transaction_time(&self) -> Result<LedgerTime, TimeError> {
        (**self).transaction_time().await
    }
}
