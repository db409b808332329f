//! Tenant and service registry commands.

use clap::Subcommand;

/// Tenant account management
#[derive(Debug, Clone, Subcommand)]
pub enum TenantCommand {
    /// Register a new tenant
    Enroll {
        /// Tenant identifier
        pck: String,
        name: String,
        email: String,
        phone: String,
    },

    /// Replace a tenant's contact details
    Update {
        /// Tenant identifier
        pck: String,
        name: String,
        email: String,
        phone: String,
    },

    /// Mark a tenant as no longer registered
    Destroy {
        /// Tenant identifier
        pck: String,
    },
}

/// Service registration
#[derive(Debug, Clone, Subcommand)]
pub enum ServiceCommand {
    /// Register a new service
    Register {
        /// Service identifier
        pck: String,
        name: String,
    },

    /// Mark a service as no longer registered
    Unregister {
        /// Service identifier
        pck: String,
    },
}
