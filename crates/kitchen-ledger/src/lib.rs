//! # Kitchen Ledger
//!
//! Interfaces to the two external collaborators of the Kitchen client:
//!
//! - **Contract client** - a smart contract exposing a byte-valued key-value
//!   store (`getData` / `setData`). Reads go through [`ContractReader`];
//!   writes need a signer-bound [`ContractWriter`].
//! - **Wallet** - signs plain-text messages on behalf of the player
//!   ([`WalletSigner`]).
//!
//! Concrete stand-ins are provided for tests and local play:
//! [`MemoryLedger`], [`FileLedger`] and [`LocalWallet`].

pub mod contract;
pub mod error;
pub mod file;
pub mod memory;
pub mod wallet;

pub use contract::{ContractReader, ContractWriter, TxReceipt, Versioned};
pub use error::{LedgerError, WalletError};
pub use file::FileLedger;
pub use memory::{LedgerSnapshot, MemoryLedger};
pub use wallet::{LocalWallet, WalletSignature, WalletSigner};

/// Placeholder contract address used by local ledgers
pub const LOCAL_CONTRACT_ADDRESS: &str = "0x00000000000000000000000000000000006b6974";
