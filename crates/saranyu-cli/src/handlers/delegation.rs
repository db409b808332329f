//! Delegation and sub-delegation handlers.

use super::{flag_json, outcome_json, Contract};
use crate::commands::{DelegationCommand, SubDelegationCommand};
use anyhow::Result;
use saranyu_delegation::Record;
use serde_json::{json, Value};

/// Execute a root delegation command
pub async fn handle_delegation(contract: &Contract, command: &DelegationCommand) -> Result<Value> {
    let value = match command {
        DelegationCommand::Register {
            pck,
            grandor,
            recipient,
            subdel,
            issue,
            expiry,
        } => {
            let grant = contract
                .register_delegation(pck, grandor, recipient, subdel, issue, expiry)
                .await?;
            serde_json::to_value(Record::from_grant(grant))?
        }
        DelegationCommand::Suspend { pck } => {
            outcome_json(pck, contract.suspend_delegation(pck).await?)
        }
        DelegationCommand::Revoke { pck, revoker } => {
            outcome_json(pck, contract.revoke_delegation(pck, revoker).await?)
        }
        DelegationCommand::Valid { pck } => flag_json(pck, "valid", contract.is_valid(pck).await?),
        DelegationCommand::Suspended { pck } => {
            flag_json(pck, "suspended", contract.is_suspended(pck).await?)
        }
        DelegationCommand::Revoked { pck } => {
            flag_json(pck, "revoked", contract.is_revoked(pck).await?)
        }
        DelegationCommand::Expired { pck } => {
            flag_json(pck, "expired", contract.is_expired(pck).await?)
        }
        DelegationCommand::Charge { pck, cores } => {
            let charge = contract.compute_charge(pck, cores).await?;
            json!({ "pck": pck, "cores": cores, "charge": charge })
        }
    };
    Ok(value)
}

/// Execute a sub-delegation command
pub async fn handle_sub_delegation(
    contract: &Contract,
    command: &SubDelegationCommand,
) -> Result<Value> {
    let value = match command {
        SubDelegationCommand::Register {
            pck,
            parent,
            recipient,
            subdel,
            issue,
            expiry,
        } => {
            let grant = contract
                .register_sub_delegation(pck, parent, recipient, subdel, issue, expiry)
                .await?;
            serde_json::to_value(Record::from_grant(grant))?
        }
        SubDelegationCommand::Suspend { pck } => {
            outcome_json(pck, contract.suspend_sub_delegation(pck).await?)
        }
        SubDelegationCommand::Revoke { pck, revoker } => {
            outcome_json(pck, contract.revoke_sub_delegation(pck, revoker).await?)
        }
        SubDelegationCommand::Valid { pck } => {
            flag_json(pck, "valid", contract.is_sub_valid(pck).await?)
        }
        SubDelegationCommand::Suspended { pck } => {
            flag_json(pck, "suspended", contract.is_sub_suspended(pck).await?)
        }
        SubDelegationCommand::Revoked { pck } => {
            flag_json(pck, "revoked", contract.is_sub_revoked(pck).await?)
        }
        SubDelegationCommand::Expired { pck } => {
            flag_json(pck, "expired", contract.is_sub_expired(pck).await?)
        }
    };
    Ok(value)
}
