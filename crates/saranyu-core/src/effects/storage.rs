//! Record store interface
//!
//! # Effect Classification
//!
//! - **Category**: Infrastructure Effect
//! - **Implementation**: `saranyu-effects` (filesystem), `saranyu-testkit` (memory)
//! - **Usage**: the ledger transaction layer in `saranyu-delegation`

use async_trait::async_trait;
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;

use crate::LedgerError;

/// Error type for record store operations.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error, Serialize, Deserialize)]
pub enum StorageError {
    /// Key cannot be used by this store
    #[error("Invalid key: {reason}")]
    InvalidKey {
        /// Why the key was rejected
        reason: String,
    },
    /// Reading a record failed
    #[error("Read failed: {0}")]
    ReadFailed(String),
    /// Writing or committing a batch failed; nothing of the batch is stored
    #[error("Write failed: {0}")]
    WriteFailed(String),
    /// Backend not reachable
    #[error("Store unavailable")]
    Unavailable,
}

impl From<StorageError> for LedgerError {
    fn from(err: StorageError) -> Self {
        LedgerError::store_unavailable(err.to_string())
    }
}

/// Replicated key-value store holding serialized ledger records.
///
/// `store_batch` is the commit point of a ledger transaction. Handlers must
/// apply either every pair or none of them.
#[async_trait]
pub trait StorageEffects: Send + Sync {
    /// Read the bytes under `key`, `None` if the key was never written.
    async fn retrieve(&self, key: &str) -> Result<Option<Vec<u8>>, StorageError>;

    /// Write a single key.
    async fn store(&self, key: &str, value: Vec<u8>) -> Result<(), StorageError>;

    /// Write several keys as one atomic unit.
    async fn store_batch(&self, pairs: BTreeMap<String, Vec<u8>>) -> Result<(), StorageError>;
}

/// Blanket implementation for Arc<T> where T: StorageEffects
#[async_trait]
impl<T: StorageEffects + ?Sized> StorageEffects for std::sync::Arc<T> {
    async fn retrieve(&self, key: &str) -> Result<Option<Vec<u8>>, StorageError> {
        (**self).retrieve(key).await
    }

    async fn store(&self, key: &str, value: Vec<u8>) -> Result<(), StorageError> {
        (**self).store(key, value).await
    }

    async fn store_batch(&self, pairs: BTreeMap<String, Vec<u8>>) -> Result<(), StorageError> {
        (**self).store_batch(pairs).await
    }
}
