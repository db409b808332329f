//! Tenant and service registry handlers.

use super::Contract;
use crate::commands::{ServiceCommand, TenantCommand};
use anyhow::Result;
use serde_json::Value;

/// Execute a tenant command
pub async fn handle_tenant(contract: &Contract, command: &TenantCommand) -> Result<Value> {
    let tenant = match command {
        TenantCommand::Enroll {
            pck,
            name,
            email,
            phone,
        } => contract.enroll(pck, name, email, phone).await?,
        TenantCommand::Update {
            pck,
            name,
            email,
            phone,
        } => contract.update(pck, name, email, phone).await?,
        TenantCommand::Destroy { pck } => contract.destroy_tenant(pck).await?,
    };
    Ok(serde_json::to_value(tenant)?)
}

/// Execute a service command
pub async fn handle_service(contract: &Contract, command: &ServiceCommand) -> Result<Value> {
    let service = match command {
        ServiceCommand::Register { pck, name } => contract.register_service(pck, name).await?,
        ServiceCommand::Unregister { pck } => contract.unregister_service(pck).await?,
    };
    Ok(serde_json::to_value(service)?)
}
