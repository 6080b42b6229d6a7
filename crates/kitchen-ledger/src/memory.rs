//! In-memory contract ledger
//!
//! Behaves like the deployed key-value contract: unset keys read as empty
//! bytes, every write bumps the key's version and yields a receipt. Clones
//! share the same underlying store, so several clients can talk to one
//! ledger.

use crate::contract::{ContractReader, ContractWriter, TxReceipt, Versioned};
use crate::error::LedgerError;
use crate::LOCAL_CONTRACT_ADDRESS;
use async_trait::async_trait;
use parking_lot::RwLock;
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use std::sync::atomic::{AtomicBool, AtomicU32, Ordering};
use std::sync::Arc;

/// A stored key
#[derive(Clone, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct LedgerEntry {
    /// Raw value, hex-encoded in snapshots
    #[serde(with = "hex_bytes")]
    pub value: Vec<u8>,

    /// Write count
    pub version: u64,
}

/// Serializable copy of the whole ledger
#[derive(Clone, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct LedgerSnapshot {
    pub entries: BTreeMap<String, LedgerEntry>,

    /// Total confirmed transactions
    #[serde(default)]
    pub tx_count: u64,
}

/// Thread-safe in-memory key-value ledger
#[derive(Clone)]
pub struct MemoryLedger {
    address: String,
    state: Arc<RwLock<LedgerSnapshot>>,
    available: Arc<AtomicBool>,
    pending_rejections: Arc<AtomicU32>,
}

impl MemoryLedger {
    pub fn new() -> Self {
        Self::with_address(LOCAL_CONTRACT_ADDRESS)
    }

    pub fn with_address(address: impl Into<String>) -> Self {
        Self::from_snapshot(address, LedgerSnapshot::default())
    }

    pub fn from_snapshot(address: impl Into<String>, snapshot: LedgerSnapshot) -> Self {
        Self {
            address: address.into(),
            state: Arc::new(RwLock::new(snapshot)),
            available: Arc::new(AtomicBool::new(true)),
            pending_rejections: Arc::new(AtomicU32::new(0)),
        }
    }

    /// Toggle availability; an unavailable ledger refuses reads and writes
    pub fn set_available(&self, available: bool) {
        self.available.store(available, Ordering::SeqCst);
    }

    /// Make the next `count` writes fail as if the user declined them
    pub fn reject_next_writes(&self, count: u32) {
        self.pending_rejections.store(count, Ordering::SeqCst);
    }

    pub fn snapshot(&self) -> LedgerSnapshot {
        self.state.read().clone()
    }

    /// Read a key directly, bypassing availability checks
    pub fn raw_get(&self, key: &str) -> Option<Vec<u8>> {
        self.state.read().entries.get(key).map(|e| e.value.clone())
    }

    /// Write a key directly, bypassing availability and rejection checks
    pub fn raw_put(&self, key: &str, value: impl Into<Vec<u8>>) {
        let mut state = self.state.write();
        let entry = state.entries.entry(key.to_string()).or_default();
        entry.value = value.into();
        entry.version += 1;
    }

    pub fn tx_count(&self) -> u64 {
        self.state.read().tx_count
    }

    /// Swap in a snapshot read from elsewhere. Availability and pending
    /// rejections are kept.
    pub(crate) fn replace_snapshot(&self, snapshot: LedgerSnapshot) {
        *self.state.write() = snapshot;
    }

    pub(crate) fn read_versioned(&self, key: &str) -> Result<Versioned, LedgerError> {
        self.ensure_available()?;
        let state = self.state.read();
        Ok(state
            .entries
            .get(key)
            .map(|e| Versioned {
                value: e.value.clone(),
                version: e.version,
            })
            .unwrap_or_default())
    }

    fn ensure_available(&self) -> Result<(), LedgerError> {
        if self.available.load(Ordering::SeqCst) {
            Ok(())
        } else {
            Err(LedgerError::Unavailable)
        }
    }

    fn take_rejection(&self) -> bool {
        self.pending_rejections
            .fetch_update(Ordering::SeqCst, Ordering::SeqCst, |n| n.checked_sub(1))
            .is_ok()
    }

    pub(crate) fn write(
        &self,
        key: &str,
        value: Vec<u8>,
        expected_version: Option<u64>,
    ) -> Result<TxReceipt, LedgerError> {
        self.ensure_available()?;
        if self.take_rejection() {
            return Err(LedgerError::Rejected("user rejected transaction".to_string()));
        }

        let mut state = self.state.write();
        let current = state.entries.get(key).map(|e| e.version).unwrap_or(0);
        if let Some(expected) = expected_version {
            if current != expected {
                return Err(LedgerError::VersionConflict {
                    key: key.to_string(),
                    expected,
                    actual: current,
                });
            }
        }

        state.tx_count += 1;
        let tx_hash = compute_tx_hash(key, &value, state.tx_count);
        let version = current + 1;
        state
            .entries
            .insert(key.to_string(), LedgerEntry { value, version });

        tracing::debug!(key, version, "ledger write confirmed");
        Ok(TxReceipt {
            tx_hash,
            key: key.to_string(),
            version,
        })
    }
}

impl Default for MemoryLedger {
    fn default() -> Self {
        Self::new()
    }
}

fn compute_tx_hash(key: &str, value: &[u8], nonce: u64) -> String {
    let mut hasher = blake3::Hasher::new();
    hasher.update(key.as_bytes());
    hasher.update(value);
    hasher.update(&nonce.to_le_bytes());
    format!("0x{}", hex::encode(hasher.finalize().as_bytes()))
}

#[async_trait]
impl ContractReader for MemoryLedger {
    async fn is_available(&self) -> Result<bool, LedgerError> {
        Ok(self.available.load(Ordering::SeqCst))
    }

    async fn address(&self) -> Result<String, LedgerError> {
        Ok(self.address.clone())
    }

    async fn get_data(&self, key: &str) -> Result<Vec<u8>, LedgerError> {
        Ok(self.read_versioned(key)?.value)
    }

    async fn get_versioned(&self, key: &str) -> Result<Versioned, LedgerError> {
        self.read_versioned(key)
    }
}

#[async_trait]
impl ContractWriter for MemoryLedger {
    async fn set_data(&self, key: &str, value: Vec<u8>) -> Result<TxReceipt, LedgerError> {
        self.write(key, value, None)
    }

    async fn set_data_if_version(
        &self,
        key: &str,
        value: Vec<u8>,
        expected_version: u64,
    ) -> Result<TxReceipt, LedgerError> {
        self.write(key, value, Some(expected_version))
    }
}

mod hex_bytes {
    use serde::{Deserialize, Deserializer, Serializer};

    pub fn serialize<S: Serializer>(bytes: &[u8], serializer: S) -> Result<S::Ok, S::Error> {
        serializer.serialize_str(&hex::encode(bytes))
    }

    pub fn deserialize<'de, D: Deserializer<'de>>(deserializer: D) -> Result<Vec<u8>, D::Error> {
        let s = String::deserialize(deserializer)?;
        hex::decode(s).map_err(serde::de::Error::custom)
    }
}
