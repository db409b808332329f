//! Record identifiers
//!
//! Tenants, services, delegations and sub-delegations share one flat key
//! namespace. A `Pck` is the opaque key of any of them.

use serde::{Deserialize, Serialize};
use std::borrow::Borrow;
use std::fmt;
use std::str::FromStr;

use crate::LedgerError;

/// Opaque record key in the ledger's flat namespace.
///
/// Keys are non-empty and contain no whitespace or path separators so they
/// can be used verbatim as storage keys.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(transparent)]
pub struct Pck(String);

impl Pck {
    /// Create a key, rejecting empty or unsafe identifiers.
    pub fn new(value: impl Into<String>) -> Result<Self, LedgerError> {
        let value = value.into();
        if value.is_empty() {
            return Err(LedgerError::invalid_argument("identifier cannot be empty"));
        }
        if value
            .chars()
            .any(|c| c.is_whitespace() || c == '/' || c == '\\' || c == '.')
        {
            return Err(LedgerError::invalid_argument(format!(
                "identifier {value:?} contains a reserved character"
            )));
        }
        Ok(Self(value))
    }

    /// Borrow the key as a string slice
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for Pck {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

impl FromStr for Pck {
    type Err = LedgerError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::new(s)
    }
}

impl AsRef<str> for Pck {
    fn as_ref(&self) -> &str {
        &self.0
    }
}

impl Borrow<str> for Pck {
    fn borrow(&self) -> &str {
        &self.0
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::ErrorKind;

    #[test]
    fn test_pck_parse() {
        let pck: Pck = "SD1".parse().unwrap();
        assert_eq!(pck.as_str(), "SD1");
        assert_eq!(pck.to_string(), "SD1");
    }

    #[test]
    fn test_pck_rejects_unsafe_keys() {
        for bad in ["", "a b", "../etc", "x/y", "d.json"] {
            let err = Pck::new(bad).unwrap_err();
            assert_eq!(err.kind(), ErrorKind::InvalidArgument, "{bad:?}");
        }
    }

    #[test]
    fn test_pck_serializes_as_plain_string() {
        let pck = Pck::new("T1").unwrap();
        assert_eq!(serde_json::to_string(&pck).unwrap(), "\"T1\"");
    }
}
