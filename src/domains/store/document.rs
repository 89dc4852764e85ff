//! Store-native document model.
//!
//! Documents keep the extended value kinds a document database returns
//! (object ids, millisecond dates, binary payloads, decimals) so that the
//! result normalizer can render them into JSON in one place.

use indexmap::IndexMap;
use serde_json::Value;

/// An ordered document as returned by the store.
pub type Document = IndexMap<String, DocValue>;

/// A single store-native value.
#[derive(Debug, Clone, PartialEq)]
pub enum DocValue {
    Null,
    Boolean(bool),
    Int32(i32),
    Int64(i64),
    Double(f64),
    String(String),
    ObjectId([u8; 12]),
    /// Milliseconds since the Unix epoch.
    DateTime(i64),
    Binary { subtype: u8, bytes: Vec<u8> },
    /// Decimal128 in its canonical string form.
    Decimal128(String),
    Timestamp { time: u32, increment: u32 },
    Regex { pattern: String, options: String },
    Array(Vec<DocValue>),
    Document(Document),
}

impl DocValue {
    /// Parse a 24-character hex object id.
    pub fn object_id(hex_id: &str) -> Option<Self> {
        let bytes = hex::decode(hex_id).ok()?;
        let id: [u8; 12] = bytes.try_into().ok()?;
        Some(Self::ObjectId(id))
    }
}

impl From<&Value> for DocValue {
    /// Plain JSON maps onto the store's basic kinds.
    fn from(value: &Value) -> Self {
        match value {
            Value::Null => Self::Null,
            Value::Bool(b) => Self::Boolean(*b),
            Value::Number(n) => match n.as_i64() {
                Some(i) => i32::try_from(i).map_or(Self::Int64(i), Self::Int32),
                None => Self::Double(n.as_f64().unwrap_or(f64::NAN)),
            },
            Value::String(s) => Self::String(s.clone()),
            Value::Array(items) => Self::Array(items.iter().map(Self::from).collect()),
            Value::Object(map) => Self::Document(
                map.iter()
                    .map(|(k, v)| (k.clone(), Self::from(v)))
                    .collect(),
            ),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_from_json_picks_narrowest_integer() {
        assert_eq!(DocValue::from(&json!(5)), DocValue::Int32(5));
        assert_eq!(DocValue::from(&json!(5_000_000_000_i64)), DocValue::Int64(5_000_000_000));
        assert_eq!(DocValue::from(&json!(1.5)), DocValue::Double(1.5));
    }

    #[test]
    fn test_from_json_preserves_key_order() {
        let doc = DocValue::from(&json!({ "z": 1, "a": 2 }));
        let DocValue::Document(doc) = doc else {
            panic!("expected document");
        };
        let keys: Vec<_> = doc.keys().cloned().collect();
        assert_eq!(keys, vec!["z", "a"]);
    }

    #[test]
    fn test_object_id_parse() {
        assert!(DocValue::object_id("507f1f77bcf86cd799439011").is_some());
        assert!(DocValue::object_id("507f").is_none());
        assert!(DocValue::object_id("zz7f1f77bcf86cd799439011").is_none());
    }
}
