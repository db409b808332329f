//! Buffered per-operation transaction
//!
//! A `LedgerTransaction` pins the timestamp of one operation and stages its
//! writes. Reads see staged writes first. Nothing reaches the store until
//! [`LedgerTransaction::commit`], which hands every staged record to a single
//! `store_batch`. Dropping an uncommitted transaction discards its writes, so
//! an operation that fails validation half way leaves the store untouched.

use crate::records::{Grant, GrantKind, Record};
use saranyu_core::{LedgerError, LedgerTime, Pck, Result, StorageEffects};
use std::collections::BTreeMap;

/// Staged writes of one ledger operation
pub struct LedgerTransaction<'s, S: StorageEffects + ?Sized> {
    store: &'s S,
    now: LedgerTime,
    staged: BTreeMap<Pck, Record>,
}

impl<'s, S: StorageEffects + ?Sized> LedgerTransaction<'s, S> {
    /// Open a transaction evaluated at `now`
    pub fn new(store: &'s S, now: LedgerTime) -> Self {
        Self {
            store,
            now,
            staged: BTreeMap::new(),
        }
    }

    /// The single timestamp of this operation
    pub fn now(&self) -> LedgerTime {
        self.now
    }

    /// Read a record, preferring this transaction's own writes
    pub async fn get(&self, pck: &Pck) -> Result<Option<Record>> {
        if let Some(record) = self.staged.get(pck) {
            return Ok(Some(record.clone()));
        }
        let Some(bytes) = self.store.retrieve(pck.as_str()).await? else {
            return Ok(None);
        };
        let record = Record::decode(&bytes)?;
        if record.pck() != pck {
            return Err(LedgerError::serialization(format!(
                "key {pck} holds record {}",
                record.pck()
            )));
        }
        Ok(Some(record))
    }

    /// Whether any record occupies `pck`
    pub async fn exists(&self, pck: &Pck) -> Result<bool> {
        Ok(self.get(pck).await?.is_some())
    }

    /// `AlreadyExists` if any record occupies `pck`
    pub async fn ensure_vacant(&self, pck: &Pck) -> Result<()> {
        if self.exists(pck).await? {
            return Err(LedgerError::already_exists(format!("{pck} is already registered")));
        }
        Ok(())
    }

    /// Read a delegation or sub-delegation.
    ///
    /// `NotFound` if the key is empty, `InvalidArgument` if it holds a tenant
    /// or service.
    pub async fn load_grant(&self, pck: &Pck) -> Result<Grant> {
        let record = self
            .get(pck)
            .await?
            .ok_or_else(|| LedgerError::not_found(format!("{pck} does not exist")))?;
        let record_type = record.record_type();
        record.into_grant().ok_or_else(|| {
            LedgerError::invalid_argument(format!(
                "{pck} is a {record_type} record, not a delegation"
            ))
        })
    }

    /// Read a grant of a specific kind, `InvalidArgument` on mismatch
    pub async fn load_kind(&self, pck: &Pck, kind: GrantKind) -> Result<Grant> {
        let grant = self.load_grant(pck).await?;
        if grant.kind() != kind {
            return Err(LedgerError::invalid_argument(format!(
                "{pck} is a {}, expected a {kind}",
                grant.kind()
            )));
        }
        Ok(grant)
    }

    /// Stage a record for commit
    pub fn put(&mut self, record: Record) {
        self.staged.insert(record.pck().clone(), record);
    }

    /// Number of staged records
    pub fn staged_len(&self) -> usize {
        self.staged.len()
    }

    /// Write every staged record as one batch, returning how many were written
    pub async fn commit(self) -> Result<usize> {
        if self.staged.is_empty() {
            return Ok(0);
        }
        let mut batch = BTreeMap::new();
        for (pck, record) in &self.staged {
            batch.insert(pck.as_str().to_string(), record.encode()?);
        }
        let written = batch.len();
        self.store.store_batch(batch).await?;
        tracing::debug!(written, at = %self.now, "transaction committed");
        Ok(written)
    }
}
