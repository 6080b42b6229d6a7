//! # Kitchen Orders
//!
//! Keeps the client's view of cooking orders in step with the contract's
//! key-value store, and gates ingredient reveal behind a wallet signature.
//!
//! ## Sync Protocol
//!
//! ```text
//!   load_all                         create
//!   ────────                         ──────
//!   is_available? ──no──► []         encode items
//!   get "order_keys"                 set "order_<id>"        (1)
//!   for id: get "order_<id>"         get "order_keys"        (2)
//!           skip bad records         append id
//!   sort by timestamp desc           set "order_keys"        (3)
//! ```
//!
//! Steps (2) and (3) of `create` are a read-modify-write with no lock. With
//! [`IndexWriteMode::Overwrite`] two clients creating orders at the same time
//! can drop one id from the index. [`IndexWriteMode::Conditional`] turns step
//! (3) into a compare-and-set retried on conflict.
//!
//! ## Authorization
//!
//! Nothing here checks who changes an order's status. The "only the chef may
//! complete or fail an order" rule lives in the view controller and can be
//! bypassed by anyone writing to the contract directly.

pub mod config;
pub mod error;
pub mod reveal;
pub mod stats;
pub mod store;

pub use config::{IndexWriteMode, RevealConfig, SyncConfig};
pub use error::{RevealError, SyncError};
pub use reveal::{RevealFlow, RevealPhase, SignatureParams};
pub use stats::OrderStats;
pub use store::OrderStore;
