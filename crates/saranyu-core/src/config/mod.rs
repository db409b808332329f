//! Ledger configuration
//!
//! Tunables for charging and chain depth, plus the settings the CLI needs
//! to locate its record store. Loaded from TOML, overridden by `SARANYU_*`
//! environment variables, then validated.

pub mod traits;
pub mod validation;

pub use traits::{LedgerConfigExt, ENV_PREFIX};
pub use validation::{ConfigValidator, ValidationError, ValidationResult};

use crate::LedgerError;
use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};

/// Default charge per started-and-completed period and core
pub const DEFAULT_CHARGE_RATE_PER_HOUR: u64 = 2;
/// Default charging period in seconds
pub const DEFAULT_CHARGE_PERIOD_SECS: u64 = 3600;
/// Default maximum number of records in a delegation chain
pub const DEFAULT_MAX_CHAIN_DEPTH: usize = 32;

/// Ledger configuration
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct LedgerConfig {
    /// Units charged per full period per core
    pub charge_rate_per_hour: u64,
    /// Length of one charging period in seconds
    pub charge_period_secs: u64,
    /// Longest chain (root included) a sub-delegation may extend
    pub max_chain_depth: usize,
    /// Directory of the filesystem record store (CLI)
    pub storage_dir: PathBuf,
    /// Seed the demo tenants and services on `init` (CLI)
    pub seed_identities: bool,
}

impl Default for LedgerConfig {
    fn default() -> Self {
        Self {
            charge_rate_per_hour: DEFAULT_CHARGE_RATE_PER_HOUR,
            charge_period_secs: DEFAULT_CHARGE_PERIOD_SECS,
            max_chain_depth: DEFAULT_MAX_CHAIN_DEPTH,
            storage_dir: PathBuf::from("./saranyu-ledger"),
            seed_identities: true,
        }
    }
}

impl LedgerConfig {
    /// Parse configuration from TOML text
    pub fn from_toml_str(content: &str) -> Result<Self, LedgerError> {
        toml::from_str(content)
            .map_err(|e| LedgerError::invalid_argument(format!("Invalid config TOML: {e}")))
    }
}

fn parse_value<T: std::str::FromStr>(key: &str, value: &str) -> Result<T, LedgerError> {
    value.trim().parse().map_err(|_| {
        LedgerError::invalid_argument(format!("config key {key}: {value:?} cannot be parsed"))
    })
}

impl LedgerConfigExt for LedgerConfig {
    fn load_from_file(path: &Path) -> Result<Self, LedgerError> {
        let content = std::fs::read_to_string(path).map_err(|e| {
            LedgerError::invalid_argument(format!(
                "Failed to read config file {}: {e}",
                path.display()
            ))
        })?;
        Self::from_toml_str(&content)
    }

    fn set_from_string(&mut self, key: &str, value: &str) -> Result<(), LedgerError> {
        match key {
            "charge_rate_per_hour" => self.charge_rate_per_hour = parse_value(key, value)?,
            "charge_period_secs" => self.charge_period_secs = parse_value(key, value)?,
            "max_chain_depth" => self.max_chain_depth = parse_value(key, value)?,
            "storage_dir" => self.storage_dir = PathBuf::from(value),
            "seed_identities" => self.seed_identities = parse_value(key, value)?,
            other => {
                tracing::debug!(key = other, "ignoring unknown config key");
            }
        }
        Ok(())
    }

    fn validate(&self) -> Result<(), LedgerError> {
        let mut validator = ConfigValidator::new();
        validator
            .range("charge_rate_per_hour", self.charge_rate_per_hour, Some(1), None)
            .range("charge_period_secs", self.charge_period_secs, Some(1), None)
            .range("max_chain_depth", self.max_chain_depth as u64, Some(1), None)
            .custom(
                "storage_dir",
                &self.storage_dir,
                |dir| !dir.as_os_str().is_empty(),
                "must not be empty",
            );
        validator.result().map_err(LedgerError::from)
    }
}
