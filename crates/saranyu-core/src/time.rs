//! Deterministic ledger time
//!
//! All issue/expiry comparisons run against a `LedgerTime` taken from the
//! transaction context, never from a replica's local clock.

use serde::{Deserialize, Serialize};
use std::fmt;

/// Transaction timestamp in Unix seconds
#[derive(
    Debug, Clone, Copy, Default, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize,
)]
#[serde(transparent)]
pub struct LedgerTime(pub u64);

impl LedgerTime {
    /// Unix epoch
    pub const EPOCH: Self = Self(0);

    /// Create from Unix seconds
    pub fn from_secs(secs: u64) -> Self {
        Self(secs)
    }

    /// Seconds elapsed since `earlier`, zero if `earlier` is in the future
    pub fn saturating_since(self, earlier: Self) -> u64 {
        self.0.saturating_sub(earlier.0)
    }
}

impl fmt::Display for LedgerTime {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

impl From<u64> for LedgerTime {
    fn from(secs: u64) -> Self {
        Self(secs)
    }
}
