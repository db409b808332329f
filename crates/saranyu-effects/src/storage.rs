//! Filesystem record store
//!
//! One `<key>.json` file per record under a base directory. A batch is
//! committed in three steps:
//!
//! 1. every pair is written to a `.json.tmp` staging file and every existing
//!    record it replaces is copied to a `.json.bak` backup;
//! 2. staging files are renamed over their targets;
//! 3. backups are removed.
//!
//! A failure in step 1 removes the staging files and backups. A failure in
//! step 2 restores the targets already renamed from their backups (or
//! removes them when there was no previous record), so the batch is applied
//! in full or not at all.

use async_trait::async_trait;
use saranyu_core::{StorageEffects, StorageError};
use std::collections::BTreeMap;
use std::io;
use std::path::{Path, PathBuf};
use tokio::fs;

const RECORD_EXTENSION: &str = "json";
const STAGING_EXTENSION: &str = "json.tmp";
const BACKUP_EXTENSION: &str = "json.bak";

/// Filesystem-based record store for production use
#[derive(Debug, Clone)]
pub struct FilesystemStorageHandler {
    base_path: PathBuf,
}

/// Files involved in committing one key of a batch
#[derive(Debug)]
struct StagedRecord {
    temp: PathBuf,
    target: PathBuf,
    backup: PathBuf,
    backed_up: bool,
}

impl StagedRecord {
    /// Copy the record being replaced, if there is one
    async fn back_up(&mut self) -> io::Result<()> {
        match fs::metadata(&self.target).await {
            Ok(meta) if meta.is_file() => {
                fs::copy(&self.target, &self.backup).await?;
                self.backed_up = true;
                Ok(())
            }
            // Anything that is not a record file is left for the rename to reject
            Ok(_) => Ok(()),
            Err(e) if e.kind() == io::ErrorKind::NotFound => Ok(()),
            Err(e) => Err(e),
        }
    }
}

impl FilesystemStorageHandler {
    /// Store rooted at `base_path`; the directory is created on first write
    pub fn new(base_path: impl Into<PathBuf>) -> Self {
        Self {
            base_path: base_path.into(),
        }
    }

    fn path_for(&self, key: &str, extension: &str) -> Result<PathBuf, StorageError> {
        if key.is_empty() {
            return Err(StorageError::InvalidKey {
                reason: "Key cannot be empty".to_string(),
            });
        }
        if key
            .chars()
            .any(|c| c == '/' || c == '\\' || c == '.' || c.is_whitespace())
        {
            return Err(StorageError::InvalidKey {
                reason: format!("Key {key:?} is not a plain file name"),
            });
        }
        Ok(self.base_path.join(format!("{key}.{extension}")))
    }

    async fn ensure_base(&self) -> Result<(), StorageError> {
        fs::create_dir_all(&self.base_path)
            .await
            .map_err(|e| StorageError::WriteFailed(format!("Failed to create directory: {e}")))
    }

    /// Remove staging files and backups of records that were not committed
    async fn discard(records: &[StagedRecord]) {
        for record in records {
            remove_quietly(&record.temp).await;
            if record.backed_up {
                remove_quietly(&record.backup).await;
            }
        }
    }

    /// Undo renames that already happened
    async fn roll_back(records: &[StagedRecord]) {
        for record in records {
            if record.backed_up {
                if let Err(e) = fs::rename(&record.backup, &record.target).await {
                    tracing::error!(
                        path = %record.target.display(),
                        error = %e,
                        "failed to restore record from backup"
                    );
                }
            } else {
                remove_quietly(&record.target).await;
            }
        }
    }
}

async fn remove_quietly(path: &Path) {
    match fs::remove_file(path).await {
        Ok(()) => {}
        Err(e) if e.kind() == io::ErrorKind::NotFound => {}
        Err(e) => tracing::warn!(path = %path.display(), error = %e, "failed to remove file"),
    }
}

#[async_trait]
impl StorageEffects for FilesystemStorageHandler {
    async fn retrieve(&self, key: &str) -> Result<Option<Vec<u8>>, StorageError> {
        let file_path = self.path_for(key, RECORD_EXTENSION)?;
        match fs::read(&file_path).await {
            Ok(data) => Ok(Some(data)),
            Err(e) if e.kind() == io::ErrorKind::NotFound => Ok(None),
            Err(e) => Err(StorageError::ReadFailed(format!("Failed to read file: {e}"))),
        }
    }

    async fn store(&self, key: &str, value: Vec<u8>) -> Result<(), StorageError> {
        self.store_batch(BTreeMap::from([(key.to_string(), value)]))
            .await
    }

    async fn store_batch(&self, pairs: BTreeMap<String, Vec<u8>>) -> Result<(), StorageError> {
        let mut pending = Vec::with_capacity(pairs.len());
        for (key, value) in pairs {
            let record = StagedRecord {
                temp: self.path_for(&key, STAGING_EXTENSION)?,
                target: self.path_for(&key, RECORD_EXTENSION)?,
                backup: self.path_for(&key, BACKUP_EXTENSION)?,
                backed_up: false,
            };
            pending.push((record, value));
        }
        self.ensure_base().await?;

        let mut staged: Vec<StagedRecord> = Vec::with_capacity(pending.len());
        for (mut record, value) in pending {
            let prepared = match fs::write(&record.temp, value).await {
                Ok(()) => record.back_up().await,
                Err(e) => Err(e),
            };
            let target = record.target.display().to_string();
            staged.push(record);
            if let Err(e) = prepared {
                Self::discard(&staged).await;
                return Err(StorageError::WriteFailed(format!(
                    "Failed to stage {target}: {e}"
                )));
            }
        }

        for (index, record) in staged.iter().enumerate() {
            if let Err(e) = fs::rename(&record.temp, &record.target).await {
                let (committed, remaining) = staged.split_at(index);
                Self::roll_back(committed).await;
                Self::discard(remaining).await;
                tracing::warn!(
                    path = %record.target.display(),
                    rolled_back = committed.len(),
                    "batch commit failed"
                );
                return Err(StorageError::WriteFailed(format!(
                    "Failed to commit {}: {e}",
                    record.target.display()
                )));
            }
        }

        for record in staged.iter().filter(|record| record.backed_up) {
            remove_quietly(&record.backup).await;
        }
        tracing::trace!(keys = staged.len(), base = %self.base_path.display(), "batch committed");
        Ok(())
    }
}
