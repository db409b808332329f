//! Subdel capacity arithmetic and the credit-back half of the capacity ledger.
//!
//! Creating a child with budget `n` consumes `n + 1` units of the parent: one
//! for the act of creating the child, `n` handed over for the child to
//! redelegate. The first terminal transition of the child returns exactly
//! that amount. All arithmetic is checked; nothing relies on wraparound.

use crate::records::{Grant, Record};
use crate::transaction::LedgerTransaction;
use saranyu_core::{LedgerError, Result, StorageEffects};
use serde::{Deserialize, Serialize};
use std::fmt;

/// Remaining redelegation budget of a grant
#[derive(
    Debug, Clone, Copy, Default, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize,
)]
#[serde(transparent)]
pub struct Capacity(u8);

impl Capacity {
    /// No redelegation slots left
    pub const ZERO: Self = Self(0);

    /// Wrap a raw budget
    pub fn new(value: u8) -> Self {
        Self(value)
    }

    /// Raw budget
    pub fn get(self) -> u8 {
        self.0
    }

    /// Units a parent gives up to create a child holding `self`
    pub fn reservation(self) -> u16 {
        u16::from(self.0) + 1
    }

    /// Parent budget left after creating a child that requests `requested`.
    ///
    /// Fails with `CapacityExceeded` unless `requested <= self - 1`; a parent
    /// at zero cannot spawn any child.
    pub fn debit_for_child(self, requested: Capacity) -> Result<Capacity> {
        let remaining = u16::from(self.0)
            .checked_sub(requested.reservation())
            .ok_or_else(|| {
                LedgerError::capacity_exceeded(u64::from(requested.0), u64::from(self.0))
            })?;
        u8::try_from(remaining)
            .map(Capacity)
            .map_err(|_| LedgerError::internal("capacity debit left the u8 range"))
    }

    /// Budget after `amount` units flow back from a settled child
    pub fn credit(self, amount: u16) -> Result<Capacity> {
        u16::from(self.0)
            .checked_add(amount)
            .and_then(|total| u8::try_from(total).ok())
            .map(Capacity)
            .ok_or_else(|| {
                LedgerError::internal(format!(
                    "credit-back of {amount} overflows capacity {}",
                    self.0
                ))
            })
    }
}

impl fmt::Display for Capacity {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

impl From<u8> for Capacity {
    fn from(value: u8) -> Self {
        Self(value)
    }
}

/// Debit `parent` for a new child holding `child_capacity`.
pub fn debit(parent: &mut Grant, child_capacity: Capacity) -> Result<()> {
    parent.subdel_capacity = parent.subdel_capacity.debit_for_child(child_capacity)?;
    Ok(())
}

/// Return `1 + child.subdel_capacity` to the child's immediate parent.
///
/// Roots have no parent and return `Ok(None)`. The parent is read through the
/// transaction so that a parent already modified in the same operation is
/// updated rather than overwritten. Callers guard against running this twice
/// for the same child.
pub async fn credit_back<S: StorageEffects + ?Sized>(
    tx: &mut LedgerTransaction<'_, S>,
    child: &Grant,
) -> Result<Option<u16>> {
    let Some(parent_id) = child.parent() else {
        return Ok(None);
    };
    let mut parent = tx.load_grant(parent_id).await?;
    let amount = child.subdel_capacity.reservation();
    parent.subdel_capacity = parent.subdel_capacity.credit(amount)?;
    tracing::info!(
        grant = %child.pck,
        parent = %parent.pck,
        amount,
        capacity = %parent.subdel_capacity,
        "capacity credited back"
    );
    tx.put(Record::from_grant(parent));
    Ok(Some(amount))
}

#[cfg(test)]
mod tests {
    use super::*;
    use saranyu_core::ErrorKind;

    #[test]
    fn test_zero_capacity_parent_cannot_spawn() {
        let err = Capacity::ZERO.debit_for_child(Capacity::ZERO).unwrap_err();
        assert_eq!(
            err,
            LedgerError::CapacityExceeded {
                requested: 0,
                available: 0
            }
        );
    }

    #[test]
    fn test_capacity_one_parent_spawns_leaf() {
        assert_eq!(
            Capacity::new(1).debit_for_child(Capacity::ZERO).unwrap(),
            Capacity::ZERO
        );
    }

    #[test]
    fn test_requesting_full_capacity_is_rejected() {
        let err = Capacity::new(5).debit_for_child(Capacity::new(5)).unwrap_err();
        assert_eq!(err.kind(), ErrorKind::CapacityExceeded);
        assert_eq!(
            Capacity::new(5).debit_for_child(Capacity::new(4)).unwrap(),
            Capacity::ZERO
        );
    }

    #[test]
    fn test_max_u8_arithmetic_is_checked() {
        assert_eq!(Capacity::new(u8::MAX).reservation(), 256);
        assert!(Capacity::new(u8::MAX)
            .debit_for_child(Capacity::new(u8::MAX))
            .is_err());
        assert_eq!(
            Capacity::new(u8::MAX).credit(1).unwrap_err().kind(),
            ErrorKind::Internal
        );
    }

    #[test]
    fn test_debit_then_credit_restores_budget() {
        let parent = Capacity::new(7);
        let child = Capacity::new(3);
        let after = parent.debit_for_child(child).unwrap();
        assert_eq!(after, Capacity::new(3));
        assert_eq!(after.credit(child.reservation()).unwrap(), parent);
    }
}
