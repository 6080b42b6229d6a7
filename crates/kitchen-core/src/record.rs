//! On-ledger representation of orders and the order index

use crate::error::{CoreError, Result};
use crate::types::{Difficulty, OrderId, OrderRecord, OrderStatus};
use serde::{Deserialize, Deserializer, Serialize};
use serde_json::{Map, Value};

/// Ledger key holding the JSON array of all order ids
pub const ORDER_INDEX_KEY: &str = "order_keys";

/// JSON object stored under `order_<id>`
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct StoredOrder {
    /// Encoded ingredient quantities
    pub items: String,

    /// Creation time, unix seconds. Fractional values are truncated.
    #[serde(deserialize_with = "lenient_timestamp")]
    pub timestamp: i64,

    /// Chef address, empty when missing
    #[serde(default)]
    pub chef: String,

    /// Missing or empty status reads as pending
    #[serde(default, deserialize_with = "lenient_status")]
    pub status: Option<OrderStatus>,

    /// Missing or zero difficulty reads as 1
    #[serde(default)]
    pub difficulty: Option<u64>,
}

impl StoredOrder {
    /// Build the stored form of a freshly created order
    pub fn from_record(record: &OrderRecord) -> Self {
        Self {
            items: record.encoded_items.clone(),
            timestamp: record.created_at,
            chef: record.chef.clone(),
            status: Some(record.status),
            difficulty: Some(record.difficulty.level() as u64),
        }
    }

    /// Parse the UTF-8 JSON bytes of a record
    pub fn from_bytes(bytes: &[u8]) -> Result<Self> {
        let text = std::str::from_utf8(bytes).map_err(|e| CoreError::InvalidUtf8(e.to_string()))?;
        Ok(serde_json::from_str(text)?)
    }

    pub fn to_bytes(&self) -> Vec<u8> {
        // Plain strings and integers always serialize
        serde_json::to_vec(self).unwrap_or_default()
    }

    /// Attach the id the record was stored under
    pub fn into_record(self, id: OrderId) -> OrderRecord {
        OrderRecord {
            id,
            encoded_items: self.items,
            created_at: self.timestamp,
            chef: self.chef,
            status: self.status.unwrap_or_default(),
            difficulty: Difficulty::from_stored(self.difficulty),
        }
    }
}

fn lenient_timestamp<'de, D: Deserializer<'de>>(
    deserializer: D,
) -> std::result::Result<i64, D::Error> {
    #[derive(Deserialize)]
    #[serde(untagged)]
    enum Timestamp {
        Whole(i64),
        Fractional(f64),
    }

    match Timestamp::deserialize(deserializer)? {
        Timestamp::Whole(secs) => Ok(secs),
        Timestamp::Fractional(secs) if secs.is_finite() => Ok(secs.trunc() as i64),
        Timestamp::Fractional(secs) => Err(serde::de::Error::custom(format!(
            "timestamp is not a finite number: {}",
            secs
        ))),
    }
}

fn lenient_status<'de, D: Deserializer<'de>>(
    deserializer: D,
) -> std::result::Result<Option<OrderStatus>, D::Error> {
    match Option::<String>::deserialize(deserializer)? {
        Some(status) if !status.trim().is_empty() => {
            status.parse().map(Some).map_err(serde::de::Error::custom)
        }
        _ => Ok(None),
    }
}

/// Rewrite only the `status` field of a stored record, keeping every other
/// field as found.
pub fn with_status(bytes: &[u8], status: OrderStatus) -> Result<Vec<u8>> {
    let text = std::str::from_utf8(bytes).map_err(|e| CoreError::InvalidUtf8(e.to_string()))?;
    let mut object: Map<String, Value> = match serde_json::from_str(text)? {
        Value::Object(map) => map,
        other => {
            return Err(CoreError::MalformedRecord(format!(
                "expected JSON object, found {}",
                json_kind(&other)
            )))
        }
    };

    object.insert("status".to_string(), Value::String(status.as_str().to_string()));
    Ok(serde_json::to_vec(&Value::Object(object))?)
}

/// Parse the order index. Empty or whitespace-only values are an empty index.
pub fn parse_index(bytes: &[u8]) -> Result<Vec<OrderId>> {
    let text = std::str::from_utf8(bytes).map_err(|e| CoreError::InvalidUtf8(e.to_string()))?;
    if text.trim().is_empty() {
        return Ok(Vec::new());
    }
    Ok(serde_json::from_str(text)?)
}

pub fn encode_index(ids: &[OrderId]) -> Vec<u8> {
    serde_json::to_vec(ids).unwrap_or_else(|_| b"[]".to_vec())
}

fn json_kind(value: &Value) -> &'static str {
    match value {
        Value::Null => "null",
        Value::Bool(_) => "boolean",
        Value::Number(_) => "number",
        Value::String(_) => "string",
        Value::Array(_) => "array",
        Value::Object(_) => "object",
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_original_shape() {
        let raw = br#"{"items":"FHE-WzEsMiwzLDRd","timestamp":1718000000,"chef":"0xabc","status":"completed","difficulty":2}"#;
        let record = StoredOrder::from_bytes(raw).unwrap().into_record(OrderId::from("1-a"));

        assert_eq!(record.encoded_items, "FHE-WzEsMiwzLDRd");
        assert_eq!(record.created_at, 1_718_000_000);
        assert_eq!(record.status, OrderStatus::Completed);
        assert_eq!(record.difficulty.level(), 2);
    }

    #[test]
    fn test_missing_fields_default() {
        let raw = br#"{"items":"FHE-W10=","timestamp":5,"chef":"0xabc"}"#;
        let record = StoredOrder::from_bytes(raw).unwrap().into_record(OrderId::from("1-a"));

        assert_eq!(record.status, OrderStatus::Pending);
        assert_eq!(record.difficulty.level(), 1);
    }

    #[test]
    fn test_loose_records_still_load() {
        let raw = br#"{"items":"FHE-W10=","timestamp":1718000000.75,"status":""}"#;
        let record = StoredOrder::from_bytes(raw).unwrap().into_record(OrderId::from("1-a"));

        assert_eq!(record.created_at, 1_718_000_000);
        assert_eq!(record.status, OrderStatus::Pending);
        assert_eq!(record.chef, "");
        assert!(!record.is_chef("0xabc"));

        let raw = br#"{"items":"FHE-W10=","timestamp":5,"chef":"0xabc","status":null}"#;
        let record = StoredOrder::from_bytes(raw).unwrap().into_record(OrderId::from("1-a"));
        assert_eq!(record.status, OrderStatus::Pending);
    }

    #[test]
    fn test_unknown_status_is_malformed() {
        let raw = br#"{"items":"FHE-W10=","timestamp":5,"chef":"0xabc","status":"burnt"}"#;
        assert!(StoredOrder::from_bytes(raw).is_err());
    }

    #[test]
    fn test_rejects_malformed() {
        assert!(StoredOrder::from_bytes(b"{not json").is_err());
        assert!(StoredOrder::from_bytes(br#"{"items":"x"}"#).is_err());
        assert!(StoredOrder::from_bytes(&[0xff, 0xfe]).is_err());
    }

    #[test]
    fn test_with_status_keeps_other_fields() {
        let raw = br#"{"items":"FHE-W10=","timestamp":5,"chef":"0xabc","status":"pending","difficulty":3,"note":"extra"}"#;
        let updated = with_status(raw, OrderStatus::Failed).unwrap();
        let value: Value = serde_json::from_slice(&updated).unwrap();

        assert_eq!(value["status"], "failed");
        assert_eq!(value["note"], "extra");
        assert_eq!(value["difficulty"], 3);
    }

    #[test]
    fn test_with_status_requires_object() {
        let err = with_status(b"[1,2]", OrderStatus::Completed).unwrap_err();
        assert!(matches!(err, CoreError::MalformedRecord(_)));
    }

    #[test]
    fn test_index_parsing() {
        assert!(parse_index(b"").unwrap().is_empty());
        assert!(parse_index(b"   ").unwrap().is_empty());
        assert_eq!(
            parse_index(br#"["1-a","2-b"]"#).unwrap(),
            vec![OrderId::from("1-a"), OrderId::from("2-b")]
        );
        assert!(parse_index(b"{}").is_err());

        let ids = vec![OrderId::from("1-a")];
        assert_eq!(encode_index(&ids), br#"["1-a"]"#.to_vec());
    }
}
