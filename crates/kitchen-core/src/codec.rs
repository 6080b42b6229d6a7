//! Placeholder order codec
//!
//! Ingredient quantities are stored on the ledger in an "encrypted" form that
//! is nothing more than tagged base64 over a JSON array. Anyone can decode it.
//! It stands in for a confidential-computation backend, which can be plugged
//! in by implementing [`OrderCodec`].

use base64::{engine::general_purpose::STANDARD, Engine as _};

/// Tag prefixed to every encoded item list
pub const ENCODED_TAG: &str = "FHE-";

/// Reversible encoding of ingredient quantities
pub trait OrderCodec: Send + Sync {
    /// Encode a quantity list for storage
    fn encode(&self, items: &[i64]) -> String;

    /// Decode a stored value. Returns an empty list for anything this codec
    /// did not produce.
    fn decode(&self, encoded: &str) -> Vec<i64>;

    /// Whether the value carries this codec's marker
    fn is_encoded(&self, encoded: &str) -> bool;
}

/// `FHE-` + base64(JSON array). Not confidential.
#[derive(Clone, Copy, Debug, Default)]
pub struct TaggedBase64Codec;

impl TaggedBase64Codec {
    pub fn new() -> Self {
        Self
    }
}

impl OrderCodec for TaggedBase64Codec {
    fn encode(&self, items: &[i64]) -> String {
        // Serializing a slice of integers cannot fail
        let json = serde_json::to_string(items).unwrap_or_else(|_| "[]".to_string());
        format!("{}{}", ENCODED_TAG, STANDARD.encode(json))
    }

    fn decode(&self, encoded: &str) -> Vec<i64> {
        let Some(payload) = encoded.strip_prefix(ENCODED_TAG) else {
            return Vec::new();
        };

        let bytes = match STANDARD.decode(payload) {
            Ok(bytes) => bytes,
            Err(e) => {
                tracing::warn!("Encoded items are not valid base64: {}", e);
                return Vec::new();
            }
        };

        match serde_json::from_slice::<Vec<i64>>(&bytes) {
            Ok(items) => items,
            Err(e) => {
                tracing::warn!("Encoded items are not an integer list: {}", e);
                Vec::new()
            }
        }
    }

    fn is_encoded(&self, encoded: &str) -> bool {
        encoded.starts_with(ENCODED_TAG)
    }
}
