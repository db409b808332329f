//! Core configuration traits

use crate::LedgerError;
use std::path::Path;

/// Environment variable prefix recognised by [`LedgerConfigExt::merge_with_env`]
pub const ENV_PREFIX: &str = "SARANYU_";

/// Loading, merging and validation shared by ledger configuration types
pub trait LedgerConfigExt: Clone + Default + Send + Sync + 'static {
    /// Get default configuration values
    fn defaults() -> Self {
        Self::default()
    }

    /// Load configuration from a TOML file
    fn load_from_file(path: &Path) -> Result<Self, LedgerError>;

    /// Set a configuration value from a string (environment or CLI)
    fn set_from_string(&mut self, key: &str, value: &str) -> Result<(), LedgerError>;

    /// Validate the configuration
    fn validate(&self) -> Result<(), LedgerError>;

    /// Merge `SARANYU_*` pairs, e.g. `SARANYU_CHARGE_RATE_PER_HOUR=3`
    fn merge_with_vars<I>(&mut self, vars: I) -> Result<(), LedgerError>
    where
        I: IntoIterator<Item = (String, String)>,
    {
        for (key, value) in vars {
            if let Some(config_key) = key.strip_prefix(ENV_PREFIX) {
                self.set_from_string(&config_key.to_lowercase(), &value)?;
            }
        }
        Ok(())
    }

    /// Merge with process environment variables
    fn merge_with_env(&mut self) -> Result<(), LedgerError> {
        self.merge_with_vars(std::env::vars())
    }
}
