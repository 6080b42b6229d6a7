//! Controller errors

use kitchen_core::{CoreError, OrderId};
use kitchen_orders::{RevealError, SyncError};
use thiserror::Error;

#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum ControllerError {
    #[error("Please connect wallet first")]
    NotConnected,

    #[error("Only the chef who created order {0} can change it")]
    NotChef(OrderId),

    #[error("Order {0} is no longer pending")]
    NotPending(OrderId),

    #[error("Order not loaded: {0}")]
    UnknownOrder(OrderId),

    #[error("No order selected")]
    NoSelection,

    #[error("Item slot {index} out of range ({len} items)")]
    ItemOutOfRange { index: usize, len: usize },

    #[error("Invalid order: {0}")]
    InvalidDraft(#[from] CoreError),

    #[error(transparent)]
    Sync(#[from] SyncError),

    #[error(transparent)]
    Reveal(#[from] RevealError),
}
