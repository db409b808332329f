//! Shared ancestor walk
//!
//! Every transitive check (creation-time ancestor activity, validity,
//! suspension, revocation) walks a grant's chain root-first and applies a
//! predicate to each loaded record. `ChainWalk` is that walk: lazy (one
//! record loaded per step), finite (bounded by the chain) and restartable.

use crate::records::Grant;
use crate::transaction::LedgerTransaction;
use saranyu_core::{Pck, Result, StorageEffects};

/// Cursor over the records named by a chain
#[derive(Debug, Clone)]
pub struct ChainWalk<'c> {
    chain: &'c [Pck],
    cursor: usize,
}

impl<'c> ChainWalk<'c> {
    /// Walk `chain` from its root
    pub fn new(chain: &'c [Pck]) -> Self {
        Self { chain, cursor: 0 }
    }

    /// Load the next ancestor, `None` once the chain is exhausted
    pub async fn next<S: StorageEffects + ?Sized>(
        &mut self,
        tx: &LedgerTransaction<'_, S>,
    ) -> Option<Result<Grant>> {
        let id = self.chain.get(self.cursor)?;
        self.cursor += 1;
        Some(tx.load_grant(id).await)
    }

    /// Rewind to the root
    pub fn restart(&mut self) {
        self.cursor = 0;
    }

    /// Records not yet visited
    pub fn remaining(&self) -> usize {
        self.chain.len().saturating_sub(self.cursor)
    }

    /// First ancestor matching `predicate`, loading no further than needed
    pub async fn find<S, F>(
        &mut self,
        tx: &LedgerTransaction<'_, S>,
        mut predicate: F,
    ) -> Result<Option<Grant>>
    where
        S: StorageEffects + ?Sized,
        F: FnMut(&Grant) -> bool,
    {
        while let Some(ancestor) = self.next(tx).await {
            let ancestor = ancestor?;
            if predicate(&ancestor) {
                return Ok(Some(ancestor));
            }
        }
        Ok(None)
    }
}

/// First record of `chain` matching `predicate`
pub async fn find_in_chain<S, F>(
    tx: &LedgerTransaction<'_, S>,
    chain: &[Pck],
    predicate: F,
) -> Result<Option<Grant>>
where
    S: StorageEffects + ?Sized,
    F: FnMut(&Grant) -> bool,
{
    ChainWalk::new(chain).find(tx, predicate).await
}

/// Whether any record of `chain` matches `predicate`
pub async fn any_in_chain<S, F>(
    tx: &LedgerTransaction<'_, S>,
    chain: &[Pck],
    predicate: F,
) -> Result<bool>
where
    S: StorageEffects + ?Sized,
    F: FnMut(&Grant) -> bool,
{
    Ok(find_in_chain(tx, chain, predicate).await?.is_some())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::capacity::Capacity;
    use crate::records::Record;
    use saranyu_core::{ErrorKind, LedgerTime};
    use saranyu_testkit::MemoryStorageHandler;

    fn pck(value: &str) -> Pck {
        Pck::new(value).unwrap()
    }

    fn grant(chain: &[&str], suspended: bool) -> Grant {
        let chain: Vec<Pck> = chain.iter().copied().map(pck).collect();
        Grant {
            pck: chain[chain.len() - 1].clone(),
            grandor: pck("S1"),
            recipient: pck("S2"),
            subdel_capacity: Capacity::ZERO,
            issue: LedgerTime(0),
            expiry: LedgerTime(100),
            suspended,
            revoked: false,
            capacity_returned: suspended,
            revokers: std::collections::BTreeSet::new(),
            chain,
        }
    }

    async fn seeded(store: &MemoryStorageHandler) {
        let mut tx = LedgerTransaction::new(store, LedgerTime(1));
        tx.put(Record::from_grant(grant(&["D1"], false)));
        tx.put(Record::from_grant(grant(&["D1", "SD1"], true)));
        tx.put(Record::from_grant(grant(&["D1", "SD1", "SD2"], false)));
        tx.commit().await.unwrap();
    }

    #[tokio::test]
    async fn test_walk_is_root_first_and_restartable() {
        let store = MemoryStorageHandler::new();
        seeded(&store).await;
        let tx = LedgerTransaction::new(&store, LedgerTime(1));
        let chain = vec![pck("D1"), pck("SD1"), pck("SD2")];

        let mut walk = ChainWalk::new(&chain);
        let first = walk.next(&tx).await.unwrap().unwrap();
        assert_eq!(first.pck, pck("D1"));
        assert_eq!(walk.remaining(), 2);

        walk.restart();
        let found = walk.find(&tx, |g| g.suspended).await.unwrap().unwrap();
        assert_eq!(found.pck, pck("SD1"));
        assert_eq!(walk.remaining(), 1);
    }

    #[tokio::test]
    async fn test_missing_ancestor_surfaces_not_found() {
        let store = MemoryStorageHandler::new();
        seeded(&store).await;
        let tx = LedgerTransaction::new(&store, LedgerTime(1));
        let chain = vec![pck("D1"), pck("GONE")];

        let err = any_in_chain(&tx, &chain, |_| false).await.unwrap_err();
        assert_eq!(err.kind(), ErrorKind::NotFound);
    }
}
