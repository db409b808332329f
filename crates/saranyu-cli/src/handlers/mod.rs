//! Command handlers.
//!
//! Each handler runs one contract call and renders the result as JSON.

pub mod delegation;
pub mod identity;

use saranyu_core::{ErrorKind, LedgerClockEffects, LedgerError};
use saranyu_delegation::{DelegationContract, TransitionOutcome};
use saranyu_effects::FilesystemStorageHandler;
use serde_json::{json, Value};
use std::sync::Arc;

/// Contract over the filesystem store with the selected clock
pub type Contract = DelegationContract<FilesystemStorageHandler, Arc<dyn LedgerClockEffects>>;

pub(crate) fn outcome_json(pck: &str, outcome: TransitionOutcome) -> Value {
    match outcome {
        TransitionOutcome::Applied { credited } => {
            json!({ "pck": pck, "applied": true, "credited": credited })
        }
        TransitionOutcome::Unchanged => json!({ "pck": pck, "applied": false }),
    }
}

pub(crate) fn flag_json(pck: &str, field: &str, value: bool) -> Value {
    let mut object = serde_json::Map::new();
    object.insert("pck".to_string(), Value::from(pck));
    object.insert(field.to_string(), Value::Bool(value));
    Value::Object(object)
}

/// Process exit code for a failed command.
///
/// Ledger rejections get a code per [`ErrorKind`] starting at 10; anything
/// else (config, I/O, output) exits with 1. Clap usage errors keep clap's 2.
pub(crate) fn exit_code(err: &anyhow::Error) -> u8 {
    let Some(ledger) = err.chain().find_map(|e| e.downcast_ref::<LedgerError>()) else {
        return 1;
    };
    match ledger.kind() {
        ErrorKind::InvalidArgument => 10,
        ErrorKind::NotFound => 11,
        ErrorKind::InvalidRecipient => 12,
        ErrorKind::InvalidGrandor => 13,
        ErrorKind::SelfDelegation => 14,
        ErrorKind::CapacityExceeded => 15,
        ErrorKind::WindowViolation => 16,
        ErrorKind::AlreadyExpired => 17,
        ErrorKind::AncestorInactive => 18,
        ErrorKind::Unauthorized => 19,
        ErrorKind::AlreadyExists => 20,
        ErrorKind::StoreUnavailable => 21,
        ErrorKind::Serialization => 22,
        ErrorKind::Internal => 23,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use anyhow::Context;

    #[test]
    fn test_exit_code_follows_ledger_error_kind() {
        let err = anyhow::Error::from(LedgerError::capacity_exceeded(3, 0));
        assert_eq!(exit_code(&err), 15);

        let err = Err::<(), _>(LedgerError::unauthorized("T9 may not revoke SD1"))
            .context("revoking SD1")
            .unwrap_err();
        assert_eq!(exit_code(&err), 19);

        assert_eq!(exit_code(&anyhow::anyhow!("config file unreadable")), 1);
    }

    #[test]
    fn test_flag_json_uses_field_name() {
        assert_eq!(
            flag_json("SD1", "revoked", true),
            json!({ "pck": "SD1", "revoked": true })
        );
    }
}
