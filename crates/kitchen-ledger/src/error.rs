//! Error types for ledger and wallet access

use thiserror::Error;

/// Contract client errors
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum LedgerError {
    #[error("Ledger unavailable")]
    Unavailable,

    #[error("Transaction rejected: {0}")]
    Rejected(String),

    #[error("Version conflict on {key}: expected {expected}, found {actual}")]
    VersionConflict {
        key: String,
        expected: u64,
        actual: u64,
    },

    #[error("Operation not supported by this ledger: {0}")]
    Unsupported(&'static str),

    #[error("Storage error: {0}")]
    Storage(String),

    #[error("Connection failed: {0}")]
    ConnectionFailed(String),
}

impl LedgerError {
    /// Whether the signer or user declined the transaction
    pub fn is_rejection(&self) -> bool {
        matches!(self, Self::Rejected(_))
    }
}

/// Wallet errors
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum WalletError {
    #[error("Signature request rejected by user")]
    Rejected,

    #[error("Wallet not connected")]
    NotConnected,

    #[error("Invalid key material: {0}")]
    InvalidKey(String),
}
