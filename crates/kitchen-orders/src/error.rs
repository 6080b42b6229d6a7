//! Error types for order sync and reveal

use kitchen_core::{CoreError, OrderId};
use kitchen_ledger::{LedgerError, WalletError};
use thiserror::Error;

/// Order sync errors
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum SyncError {
    #[error("Failed to get contract with signer")]
    SignerUnavailable,

    #[error("Order not found: {0}")]
    NotFound(OrderId),

    #[error("Transaction rejected by user: {0}")]
    Rejected(String),

    #[error("Order index still conflicting after {attempts} attempts")]
    IndexConflict { attempts: u32 },

    #[error("Ledger error: {0}")]
    Ledger(LedgerError),

    #[error("Invalid order data: {0}")]
    Data(#[from] CoreError),
}

impl SyncError {
    pub fn is_rejection(&self) -> bool {
        matches!(self, Self::Rejected(_))
    }
}

impl From<LedgerError> for SyncError {
    fn from(err: LedgerError) -> Self {
        match err {
            LedgerError::Rejected(reason) => Self::Rejected(reason),
            other => Self::Ledger(other),
        }
    }
}

/// Reveal flow errors
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum RevealError {
    #[error("Please connect wallet first")]
    WalletUnavailable,

    #[error("Signature rejected")]
    Rejected,

    #[error("Wallet error: {0}")]
    Wallet(WalletError),
}

impl From<WalletError> for RevealError {
    fn from(err: WalletError) -> Self {
        match err {
            WalletError::Rejected => Self::Rejected,
            WalletError::NotConnected => Self::WalletUnavailable,
            other => Self::Wallet(other),
        }
    }
}
