//! Mock record stores for testing
//!
//! These handlers share their state through `Arc<RwLock<..>>` so a test can
//! keep a clone for inspection while the ledger owns another.

use async_lock::RwLock;
use async_trait::async_trait;
use saranyu_core::{StorageEffects, StorageError};
use std::collections::{BTreeMap, HashMap};
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;

/// Memory record store for testing
#[derive(Debug, Clone)]
pub struct MemoryStorageHandler {
    data: Arc<RwLock<HashMap<String, Vec<u8>>>>,
}

impl Default for MemoryStorageHandler {
    fn default() -> Self {
        Self::new()
    }
}

impl MemoryStorageHandler {
    /// Create an empty store
    pub fn new() -> Self {
        Self {
            data: Arc::new(RwLock::new(HashMap::new())),
        }
    }

    /// Number of stored keys
    pub fn len(&self) -> usize {
        self.data.try_read().map(|g| g.len()).unwrap_or(0)
    }

    /// Whether nothing has been stored
    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    /// Snapshot of every stored pair
    pub async fn get_all_data(&self) -> HashMap<String, Vec<u8>> {
        self.data.read().await.clone()
    }
}

#[async_trait]
impl StorageEffects for MemoryStorageHandler {
    async fn retrieve(&self, key: &str) -> Result<Option<Vec<u8>>, StorageError> {
        let data = self.data.read().await;
        Ok(data.get(key).cloned())
    }

    async fn store(&self, key: &str, value: Vec<u8>) -> Result<(), StorageError> {
        let mut data = self.data.write().await;
        data.insert(key.to_string(), value);
        Ok(())
    }

    async fn store_batch(&self, pairs: BTreeMap<String, Vec<u8>>) -> Result<(), StorageError> {
        // One write guard for the whole batch: readers see all pairs or none.
        let mut data = self.data.write().await;
        data.extend(pairs);
        Ok(())
    }
}

/// Store wrapper that injects failures
#[derive(Debug, Clone)]
pub struct FaultyStorageHandler<S = MemoryStorageHandler> {
    inner: S,
    fail_reads: Arc<AtomicBool>,
    fail_writes: Arc<AtomicBool>,
}

impl<S: StorageEffects> FaultyStorageHandler<S> {
    /// Wrap `inner`, initially healthy
    pub fn new(inner: S) -> Self {
        Self {
            inner,
            fail_reads: Arc::new(AtomicBool::new(false)),
            fail_writes: Arc::new(AtomicBool::new(false)),
        }
    }

    /// Make every subsequent read fail (or succeed again)
    pub fn fail_reads(&self, fail: bool) {
        self.fail_reads.store(fail, Ordering::SeqCst);
    }

    /// Make every subsequent write and batch fail (or succeed again)
    pub fn fail_writes(&self, fail: bool) {
        self.fail_writes.store(fail, Ordering::SeqCst);
    }

    /// The wrapped store
    pub fn inner(&self) -> &S {
        &self.inner
    }
}

#[async_trait]
impl<S: StorageEffects> StorageEffects for FaultyStorageHandler<S> {
    async fn retrieve(&self, key: &str) -> Result<Option<Vec<u8>>, StorageError> {
        if self.fail_reads.load(Ordering::SeqCst) {
            return Err(StorageError::ReadFailed(format!("injected failure reading {key}")));
        }
        self.inner.retrieve(key).await
    }

    async fn store(&self, key: &str, value: Vec<u8>) -> Result<(), StorageError> {
        if self.fail_writes.load(Ordering::SeqCst) {
            return Err(StorageError::WriteFailed(format!("injected failure writing {key}")));
        }
        self.inner.store(key, value).await
    }

    async fn store_batch(&self, pairs: BTreeMap<String, Vec<u8>>) -> Result<(), StorageError> {
        if self.fail_writes.load(Ordering::SeqCst) {
            return Err(StorageError::WriteFailed(format!(
                "injected failure committing {} keys",
                pairs.len()
            )));
        }
        self.inner.store_batch(pairs).await
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn test_batch_lands_together() {
        let store = MemoryStorageHandler::new();
        let batch: BTreeMap<String, Vec<u8>> = [("a".to_string(), vec![1]), ("b".to_string(), vec![2])]
            .into_iter()
            .collect();
        store.store_batch(batch).await.unwrap();
        assert_eq!(store.len(), 2);
        assert_eq!(store.retrieve("b").await.unwrap(), Some(vec![2]));
    }

    #[tokio::test]
    async fn test_injected_write_failure_leaves_inner_untouched() {
        let store = FaultyStorageHandler::new(MemoryStorageHandler::new());
        store.fail_writes(true);
        let batch: BTreeMap<String, Vec<u8>> = [("a".to_string(), vec![1])].into_iter().collect();
        assert!(matches!(
            store.store_batch(batch).await,
            Err(StorageError::WriteFailed(_))
        ));
        assert!(store.inner().is_empty());

        store.fail_writes(false);
        store.store("a", vec![1]).await.unwrap();
        store.fail_reads(true);
        assert!(store.retrieve("a").await.is_err());
    }
}
