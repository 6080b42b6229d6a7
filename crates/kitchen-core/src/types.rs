//! Fundamental types for Kitchen orders

use crate::error::{CoreError, Result};
use rand::Rng;
use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

/// Characters used for the random suffix of an order id
const ID_SUFFIX_ALPHABET: &[u8] = b"0123456789abcdefghijklmnopqrstuvwxyz";

/// Length of the random suffix of an order id
pub const ID_SUFFIX_LEN: usize = 7;

/// Unique order identifier: `<unix millis>-<base36 suffix>`
#[derive(Clone, Debug, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(transparent)]
pub struct OrderId(String);

impl OrderId {
    /// Wrap an existing id
    pub fn new(id: impl Into<String>) -> Self {
        Self(id.into())
    }

    /// Generate a fresh id from a millisecond timestamp and a random suffix
    pub fn generate(now_millis: i64) -> Self {
        Self::generate_with(now_millis, &mut rand::thread_rng())
    }

    /// Generate a fresh id using the given RNG
    pub fn generate_with<R: Rng + ?Sized>(now_millis: i64, rng: &mut R) -> Self {
        let suffix: String = (0..ID_SUFFIX_LEN)
            .map(|_| ID_SUFFIX_ALPHABET[rng.gen_range(0..ID_SUFFIX_ALPHABET.len())] as char)
            .collect();
        Self(format!("{}-{}", now_millis, suffix))
    }

    /// Ledger key holding this order's record
    pub fn record_key(&self) -> String {
        format!("order_{}", self.0)
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for OrderId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

impl From<&str> for OrderId {
    fn from(id: &str) -> Self {
        Self(id.to_string())
    }
}

/// Lifecycle state of an order
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum OrderStatus {
    #[default]
    Pending,
    Completed,
    Failed,
}

impl OrderStatus {
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Pending => "pending",
            Self::Completed => "completed",
            Self::Failed => "failed",
        }
    }

    /// Completed and failed orders have no further transitions
    pub fn is_terminal(&self) -> bool {
        !matches!(self, Self::Pending)
    }
}

impl fmt::Display for OrderStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for OrderStatus {
    type Err = CoreError;

    fn from_str(s: &str) -> Result<Self> {
        match s.trim().to_ascii_lowercase().as_str() {
            "pending" => Ok(Self::Pending),
            "completed" => Ok(Self::Completed),
            "failed" => Ok(Self::Failed),
            other => Err(CoreError::UnknownStatus(other.to_string())),
        }
    }
}

/// Order difficulty, 1 (easy) to 3 (hard)
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(try_from = "u8", into = "u8")]
pub struct Difficulty(u8);

impl Difficulty {
    pub const MIN: u8 = 1;
    pub const MAX: u8 = 3;

    /// Validate a difficulty chosen for a new order
    pub fn new(level: u8) -> Result<Self> {
        if (Self::MIN..=Self::MAX).contains(&level) {
            Ok(Self(level))
        } else {
            Err(CoreError::InvalidDifficulty(level))
        }
    }

    /// Interpret a difficulty read back from the ledger.
    ///
    /// Missing or zero values read as the easiest level; values above the
    /// maximum are clamped.
    pub fn from_stored(level: Option<u64>) -> Self {
        match level {
            None | Some(0) => Self(Self::MIN),
            Some(l) if l > Self::MAX as u64 => {
                tracing::warn!("Stored difficulty {} out of range, clamping to {}", l, Self::MAX);
                Self(Self::MAX)
            }
            Some(l) => Self(l as u8),
        }
    }

    pub fn level(&self) -> u8 {
        self.0
    }
}

impl Default for Difficulty {
    fn default() -> Self {
        Self(Self::MIN)
    }
}

impl TryFrom<u8> for Difficulty {
    type Error = CoreError;

    fn try_from(level: u8) -> Result<Self> {
        Self::new(level)
    }
}

impl From<Difficulty> for u8 {
    fn from(d: Difficulty) -> u8 {
        d.0
    }
}

/// A cooking order as seen by the client
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct OrderRecord {
    /// Unique order id
    pub id: OrderId,

    /// Placeholder-encoded ingredient quantities
    pub encoded_items: String,

    /// Creation time, unix seconds
    pub created_at: i64,

    /// Address of the chef who created the order
    pub chef: String,

    /// Current status
    pub status: OrderStatus,

    /// Difficulty level
    pub difficulty: Difficulty,
}

impl OrderRecord {
    /// Whether `address` is this order's chef (ASCII case-insensitive)
    pub fn is_chef(&self, address: &str) -> bool {
        same_address(&self.chef, address)
    }

    pub fn is_pending(&self) -> bool {
        self.status == OrderStatus::Pending
    }
}

/// Compare two hex addresses ignoring case
pub fn same_address(a: &str, b: &str) -> bool {
    a.eq_ignore_ascii_case(b)
}
