//! Usage-based charging for root delegations

use crate::records::Grant;
use saranyu_core::config::{DEFAULT_CHARGE_PERIOD_SECS, DEFAULT_CHARGE_RATE_PER_HOUR};
use saranyu_core::{LedgerConfig, LedgerError, LedgerTime, Result};

/// Rate and period of the usage meter
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ChargePolicy {
    /// Units charged per completed period per core
    pub rate_per_hour: u64,
    /// Length of one period in seconds
    pub period_secs: u64,
}

impl Default for ChargePolicy {
    fn default() -> Self {
        Self {
            rate_per_hour: DEFAULT_CHARGE_RATE_PER_HOUR,
            period_secs: DEFAULT_CHARGE_PERIOD_SECS,
        }
    }
}

impl From<&LedgerConfig> for ChargePolicy {
    fn from(config: &LedgerConfig) -> Self {
        Self {
            rate_per_hour: config.charge_rate_per_hour,
            period_secs: config.charge_period_secs,
        }
    }
}

impl ChargePolicy {
    /// Charge accrued by `grant` at `now` for `cores` cores.
    ///
    /// Zero until the grant is issued. Elapsed time stops at expiry and only
    /// completed periods are billed.
    pub fn compute(&self, grant: &Grant, now: LedgerTime, cores: u64) -> Result<u64> {
        if now <= grant.issue {
            return Ok(0);
        }
        if self.period_secs == 0 {
            return Err(LedgerError::invalid_argument(
                "charge period must be positive",
            ));
        }
        let elapsed = now.min(grant.expiry).saturating_since(grant.issue);
        let periods = elapsed / self.period_secs;
        periods
            .checked_mul(self.rate_per_hour)
            .and_then(|units| units.checked_mul(cores))
            .ok_or_else(|| {
                LedgerError::invalid_argument(format!(
                    "charge for {periods} periods on {cores} cores overflows"
                ))
            })
    }
}
