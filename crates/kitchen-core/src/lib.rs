//! # Kitchen Core
//!
//! Core data model for the Kitchen cooking game.
//!
//! This crate provides the fundamental building blocks:
//! - `OrderRecord` - A cooking order as held by the client
//! - `StoredOrder` - The JSON shape of an order on the contract key-value store
//! - `OrderCodec` - The placeholder "encryption" applied to ingredient quantities
//! - `Clock` - Wall-clock source for timestamps and order ids
//!
//! ## Ledger Layout
//!
//! ```text
//!   "order_keys"     ──►  ["1718000000000-k3j9x0a", "1718000004211-0pqz81c", ...]
//!   "order_<id>"     ──►  { items, timestamp, chef, status, difficulty }
//! ```

pub mod clock;
pub mod codec;
pub mod error;
pub mod record;
pub mod types;

pub use clock::*;
pub use codec::*;
pub use error::*;
pub use record::*;
pub use types::*;

/// Prelude module for convenient imports
pub mod prelude {
    pub use crate::clock::{Clock, ManualClock, SystemClock};
    pub use crate::codec::{OrderCodec, TaggedBase64Codec};
    pub use crate::error::{CoreError, Result};
    pub use crate::record::{StoredOrder, ORDER_INDEX_KEY};
    pub use crate::types::*;
}
