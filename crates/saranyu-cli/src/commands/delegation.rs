//! Delegation and sub-delegation commands.
//!
//! Numeric arguments stay strings here; the ledger contract parses them.

use clap::Subcommand;

/// Root delegations between services
#[derive(Debug, Clone, Subcommand)]
pub enum DelegationCommand {
    /// Grant a service a delegation from another service
    Register {
        /// New delegation identifier
        pck: String,
        /// Granting service
        grandor: String,
        /// Receiving service
        recipient: String,
        /// Redelegation budget (0-255)
        subdel: String,
        /// Start of validity, Unix seconds
        issue: String,
        /// End of validity, Unix seconds
        expiry: String,
    },

    /// Suspend a delegation
    Suspend { pck: String },

    /// Revoke a delegation
    Revoke {
        pck: String,
        /// Identity performing the revocation
        revoker: String,
    },

    /// Whether the delegation is currently valid
    Valid { pck: String },

    /// Whether the delegation is suspended
    Suspended { pck: String },

    /// Whether the delegation is revoked
    Revoked { pck: String },

    /// Whether the delegation has expired
    Expired { pck: String },

    /// Accrued usage charge
    Charge {
        pck: String,
        /// Number of cores in use
        cores: String,
    },
}

/// Redelegations to tenants
#[derive(Debug, Clone, Subcommand)]
pub enum SubDelegationCommand {
    /// Redelegate part of a grant to a tenant
    Register {
        /// New sub-delegation identifier
        pck: String,
        /// Delegation or sub-delegation being redelegated
        parent: String,
        /// Receiving tenant
        recipient: String,
        /// Redelegation budget handed to the child
        subdel: String,
        /// Start of validity, Unix seconds
        issue: String,
        /// End of validity, Unix seconds
        expiry: String,
    },

    /// Suspend a sub-delegation
    Suspend { pck: String },

    /// Revoke a sub-delegation
    Revoke {
        pck: String,
        /// Identity performing the revocation
        revoker: String,
    },

    /// Whether the sub-delegation and its whole chain are valid
    Valid { pck: String },

    /// Whether the sub-delegation or an ancestor is suspended
    Suspended { pck: String },

    /// Whether the sub-delegation or an ancestor is revoked
    Revoked { pck: String },

    /// Whether the sub-delegation has expired
    Expired { pck: String },
}
