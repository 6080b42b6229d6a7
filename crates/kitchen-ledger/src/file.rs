//! File-backed ledger
//!
//! A [`MemoryLedger`] whose state lives in a JSON snapshot on disk, so the
//! CLI keeps orders between runs without a deployed contract. Several
//! processes may share one snapshot:
//!
//! ```text
//!   read:   lock_shared(<path>.lock)    ─► reload snapshot ─► read
//!   write:  lock_exclusive(<path>.lock) ─► reload snapshot ─► check version
//!                                       ─► apply ─► write tmp ─► rename
//! ```
//!
//! Versions checked by conditional writes are the ones on disk, not a
//! process-local copy. A write whose snapshot cannot be saved is rolled back.

use crate::contract::{ContractReader, ContractWriter, TxReceipt, Versioned};
use crate::error::LedgerError;
use crate::memory::{LedgerSnapshot, MemoryLedger};
use async_trait::async_trait;
use fs2::FileExt;
use std::fs::{File, OpenOptions};
use std::path::{Path, PathBuf};

pub struct FileLedger {
    inner: MemoryLedger,
    path: PathBuf,
    lock_path: PathBuf,
}

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
enum LockMode {
    Shared,
    Exclusive,
}

/// Advisory lock on the snapshot, released on drop
struct SnapshotLock {
    file: File,
}

impl Drop for SnapshotLock {
    fn drop(&mut self) {
        if let Err(e) = FileExt::unlock(&self.file) {
            tracing::warn!("Failed to release ledger lock: {}", e);
        }
    }
}

fn storage_error(err: impl std::fmt::Display) -> LedgerError {
    LedgerError::Storage(err.to_string())
}

impl FileLedger {
    /// Open the snapshot at `path`, starting empty if it does not exist
    pub fn open(path: impl AsRef<Path>, address: &str) -> Result<Self, LedgerError> {
        let path = path.as_ref().to_path_buf();
        let mut lock_name = path.as_os_str().to_owned();
        lock_name.push(".lock");

        let ledger = Self {
            inner: MemoryLedger::with_address(address),
            path,
            lock_path: PathBuf::from(lock_name),
        };

        let _lock = ledger.lock(LockMode::Shared)?;
        if !ledger.reload()? {
            tracing::info!("No ledger snapshot at {:?}, starting empty", ledger.path);
        }
        Ok(ledger)
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    /// Underlying in-memory ledger
    pub fn memory(&self) -> &MemoryLedger {
        &self.inner
    }

    /// Write the in-memory state to disk
    pub fn flush(&self) -> Result<(), LedgerError> {
        let _lock = self.lock(LockMode::Exclusive)?;
        self.save()
    }

    fn lock(&self, mode: LockMode) -> Result<SnapshotLock, LedgerError> {
        if let Some(parent) = self.lock_path.parent() {
            if !parent.as_os_str().is_empty() {
                std::fs::create_dir_all(parent).map_err(storage_error)?;
            }
        }

        let file = OpenOptions::new()
            .create(true)
            .read(true)
            .write(true)
            .open(&self.lock_path)
            .map_err(storage_error)?;

        match mode {
            LockMode::Shared => FileExt::lock_shared(&file),
            LockMode::Exclusive => FileExt::lock_exclusive(&file),
        }
        .map_err(storage_error)?;

        Ok(SnapshotLock { file })
    }

    /// Replace the in-memory state with the snapshot on disk. Returns false
    /// when there is no snapshot yet. Caller holds the lock.
    fn reload(&self) -> Result<bool, LedgerError> {
        if !self.path.exists() {
            return Ok(false);
        }

        let content = std::fs::read_to_string(&self.path).map_err(storage_error)?;
        let snapshot: LedgerSnapshot = serde_json::from_str(&content).map_err(storage_error)?;
        self.inner.replace_snapshot(snapshot);
        Ok(true)
    }

    /// Atomic write of the in-memory state. Caller holds the exclusive lock.
    fn save(&self) -> Result<(), LedgerError> {
        let content =
            serde_json::to_string_pretty(&self.inner.snapshot()).map_err(storage_error)?;

        let temp_path = self.path.with_extension("tmp");
        std::fs::write(&temp_path, content).map_err(storage_error)?;
        std::fs::rename(&temp_path, &self.path).map_err(storage_error)?;
        Ok(())
    }

    fn read(&self, key: &str) -> Result<Versioned, LedgerError> {
        let _lock = self.lock(LockMode::Shared)?;
        self.reload()?;
        self.inner.read_versioned(key)
    }

    fn commit(
        &self,
        key: &str,
        value: Vec<u8>,
        expected_version: Option<u64>,
    ) -> Result<TxReceipt, LedgerError> {
        let _lock = self.lock(LockMode::Exclusive)?;
        self.reload()?;

        let before = self.inner.snapshot();
        let receipt = self.inner.write(key, value, expected_version)?;
        if let Err(e) = self.save() {
            tracing::warn!("Ledger snapshot not saved, rolling back {}: {}", key, e);
            self.inner.replace_snapshot(before);
            return Err(e);
        }
        Ok(receipt)
    }
}

#[async_trait]
impl ContractReader for FileLedger {
    async fn is_available(&self) -> Result<bool, LedgerError> {
        self.inner.is_available().await
    }

    async fn address(&self) -> Result<String, LedgerError> {
        self.inner.address().await
    }

    async fn get_data(&self, key: &str) -> Result<Vec<u8>, LedgerError> {
        Ok(self.read(key)?.value)
    }

    async fn get_versioned(&self, key: &str) -> Result<Versioned, LedgerError> {
        self.read(key)
    }
}

#[async_trait]
impl ContractWriter for FileLedger {
    async fn set_data(&self, key: &str, value: Vec<u8>) -> Result<TxReceipt, LedgerError> {
        self.commit(key, value, None)
    }

    async fn set_data_if_version(
        &self,
        key: &str,
        value: Vec<u8>,
        expected_version: u64,
    ) -> Result<TxReceipt, LedgerError> {
        self.commit(key, value, Some(expected_version))
    }
}
