//! Command definitions.

pub mod delegation;
pub mod identity;

pub use delegation::{DelegationCommand, SubDelegationCommand};
pub use identity::{ServiceCommand, TenantCommand};
