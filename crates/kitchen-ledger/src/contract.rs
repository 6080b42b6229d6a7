//! Contract client interfaces

use crate::error::LedgerError;
use async_trait::async_trait;
use serde::{Deserialize, Serialize};

/// A value together with the version it was read at
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct Versioned {
    /// Raw bytes, empty if the key was never written
    pub value: Vec<u8>,

    /// Number of writes the key has seen
    pub version: u64,
}

/// Receipt for a confirmed write
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct TxReceipt {
    /// Transaction hash (hex, 0x-prefixed)
    pub tx_hash: String,

    /// Key that was written
    pub key: String,

    /// Version of the key after the write
    pub version: u64,
}

/// Read-only view of the contract's key-value store
#[async_trait]
pub trait ContractReader: Send + Sync {
    /// Whether the contract reports itself as usable
    async fn is_available(&self) -> Result<bool, LedgerError>;

    /// Deployed contract address
    async fn address(&self) -> Result<String, LedgerError>;

    /// Raw value under `key`; empty when unset
    async fn get_data(&self, key: &str) -> Result<Vec<u8>, LedgerError>;

    /// Value plus version, for ledgers that support conditional writes
    async fn get_versioned(&self, _key: &str) -> Result<Versioned, LedgerError> {
        Err(LedgerError::Unsupported("versioned reads"))
    }
}

/// Signer-bound contract client
#[async_trait]
pub trait ContractWriter: ContractReader {
    /// Overwrite `key` with `value`
    async fn set_data(&self, key: &str, value: Vec<u8>) -> Result<TxReceipt, LedgerError>;

    /// Overwrite `key` only if it is still at `expected_version`
    async fn set_data_if_version(
        &self,
        _key: &str,
        _value: Vec<u8>,
        _expected_version: u64,
    ) -> Result<TxReceipt, LedgerError> {
        Err(LedgerError::Unsupported("conditional writes"))
    }
}
