//! Suspend, revoke and expiry transitions
//!
//! `suspended` and `revoked` are independent flags: a grant may carry both.
//! Capacity flows back to the parent on the first terminal transition only,
//! guarded by `capacity_returned`. A revoked grant is immutable.

use crate::capacity::credit_back;
use crate::records::{Grant, GrantKind, Record};
use crate::transaction::LedgerTransaction;
use saranyu_core::{LedgerError, Pck, Result, StorageEffects};
use std::fmt;

/// Terminal transition applied to a grant
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Transition {
    /// Explicit suspension
    Suspend,
    /// Revocation by an authorized party
    Revoke,
    /// Lazily detected expiry, recorded as a suspension
    Expire,
}

impl fmt::Display for Transition {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Transition::Suspend => f.write_str("suspend"),
            Transition::Revoke => f.write_str("revoke"),
            Transition::Expire => f.write_str("expire"),
        }
    }
}

/// Effect of a transition on the ledger
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TransitionOutcome {
    /// A flag was set; `credited` is the amount returned to the parent, if any
    Applied { credited: Option<u16> },
    /// The grant was already in the requested state or is revoked
    Unchanged,
}

impl TransitionOutcome {
    /// Whether the transition wrote anything
    pub fn is_applied(self) -> bool {
        matches!(self, TransitionOutcome::Applied { .. })
    }
}

/// Fail with `Unauthorized` unless `revoker` is listed on `grant`
pub fn authorize_revoke(grant: &Grant, revoker: &Pck) -> Result<()> {
    if grant.can_revoke(revoker) {
        Ok(())
    } else {
        Err(LedgerError::unauthorized(format!(
            "{revoker} may not revoke {}",
            grant.pck
        )))
    }
}

/// Apply `transition` to `grant` and stage the result.
///
/// Credit-back runs at most once per grant, whichever flag is set first.
pub async fn apply_transition<S: StorageEffects + ?Sized>(
    tx: &mut LedgerTransaction<'_, S>,
    mut grant: Grant,
    transition: Transition,
) -> Result<TransitionOutcome> {
    if grant.revoked {
        return Ok(TransitionOutcome::Unchanged);
    }
    let flag = match transition {
        Transition::Suspend | Transition::Expire => &mut grant.suspended,
        Transition::Revoke => &mut grant.revoked,
    };
    if *flag && grant.capacity_returned {
        return Ok(TransitionOutcome::Unchanged);
    }
    *flag = true;

    let credited = if grant.capacity_returned {
        None
    } else {
        let credited = credit_back(tx, &grant).await?;
        grant.capacity_returned = true;
        credited
    };

    tracing::info!(grant = %grant.pck, %transition, ?credited, "transition applied");
    tx.put(Record::from_grant(grant));
    Ok(TransitionOutcome::Applied { credited })
}

/// Settle expiry of `grant` at the transaction time.
///
/// Returns whether the grant has expired. A live sub-delegation observed past
/// its expiry is suspended and credits its parent. Roots are reported but
/// never mutated since they have no parent to credit; grants already
/// carrying a terminal flag have been settled before.
pub async fn detect_expiry<S: StorageEffects + ?Sized>(
    tx: &mut LedgerTransaction<'_, S>,
    grant: &Grant,
) -> Result<bool> {
    if !grant.has_expired_at(tx.now()) {
        return Ok(false);
    }
    if grant.kind() == GrantKind::Delegation || grant.is_terminal() {
        tracing::debug!(grant = %grant.pck, "expired, nothing to settle");
        return Ok(true);
    }
    apply_transition(tx, grant.clone(), Transition::Expire).await?;
    Ok(true)
}
