//! Point-in-time validity queries
//!
//! Each query composes the shared chain walk with a predicate. A root's chain
//! is `[self]`, so root checks are local while sub-delegation checks cover
//! every ancestor.

use crate::chain::any_in_chain;
use crate::records::Grant;
use crate::transaction::LedgerTransaction;
use saranyu_core::{Result, StorageEffects};

/// `issue < now < expiry` and no record of the chain is suspended or revoked
pub async fn is_active<S: StorageEffects + ?Sized>(
    tx: &LedgerTransaction<'_, S>,
    grant: &Grant,
) -> Result<bool> {
    if !grant.window_contains(tx.now()) {
        return Ok(false);
    }
    Ok(!any_in_chain(tx, &grant.chain, Grant::is_terminal).await?)
}

/// Whether any record of the chain is suspended
pub async fn is_suspended_transitively<S: StorageEffects + ?Sized>(
    tx: &LedgerTransaction<'_, S>,
    grant: &Grant,
) -> Result<bool> {
    any_in_chain(tx, &grant.chain, |ancestor| ancestor.suspended).await
}

/// Whether any record of the chain is revoked
pub async fn is_revoked_transitively<S: StorageEffects + ?Sized>(
    tx: &LedgerTransaction<'_, S>,
    grant: &Grant,
) -> Result<bool> {
    any_in_chain(tx, &grant.chain, |ancestor| ancestor.revoked).await
}
