//! Configuration loading for the CLI.
//!
//! Precedence, lowest first: built-in defaults, the TOML file, `SARANYU_*`
//! environment variables, command-line flags.

use anyhow::{Context, Result};
use saranyu_core::{LedgerConfig, LedgerConfigExt};
use std::path::{Path, PathBuf};

/// Default config file looked up when `--config` is not given
pub const DEFAULT_CONFIG_PATH: &str = "saranyu.toml";

/// Resolve the effective configuration
pub fn load_config(explicit: Option<&Path>, store: Option<PathBuf>) -> Result<LedgerConfig> {
    let mut config = match explicit {
        Some(path) => LedgerConfig::load_from_file(path)
            .with_context(|| format!("loading {}", path.display()))?,
        None if Path::new(DEFAULT_CONFIG_PATH).exists() => {
            LedgerConfig::load_from_file(Path::new(DEFAULT_CONFIG_PATH))
                .with_context(|| format!("loading {DEFAULT_CONFIG_PATH}"))?
        }
        None => LedgerConfig::defaults(),
    };
    config
        .merge_with_env()
        .context("applying SARANYU_* environment overrides")?;
    if let Some(dir) = store {
        config.storage_dir = dir;
    }
    config.validate().context("invalid configuration")?;
    Ok(config)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_store_flag_overrides_file() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("saranyu.toml");
        std::fs::write(&path, "storage_dir = \"/var/lib/saranyu\"\ncharge_rate_per_hour = 5\n")
            .unwrap();

        let config = load_config(Some(&path), Some(dir.path().join("ledger"))).unwrap();
        assert_eq!(config.storage_dir, dir.path().join("ledger"));
        assert_eq!(config.charge_rate_per_hour, 5);
    }

    #[test]
    fn test_missing_explicit_file_is_an_error() {
        let dir = tempfile::tempdir().unwrap();
        assert!(load_config(Some(&dir.path().join("absent.toml")), None).is_err());
    }
}
