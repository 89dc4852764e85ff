//! Result normalization.
//!
//! Handlers return a [`ToolValue`]: plain text, a JSON value (records,
//! chart and QR payloads) or documents read from the store. [`normalize`]
//! turns any of these into a JSON-safe value. Store-native kinds are
//! rendered as MongoDB relaxed Extended JSON so a reader that knows the
//! field's origin can reconstruct the original value.

use base64::Engine;
use base64::engine::general_purpose::STANDARD;
use chrono::{DateTime, SecondsFormat, Utc};
use serde_json::{Map, Value, json};

use crate::domains::store::{DocValue, Document};

/// Native value produced by a tool handler.
#[derive(Debug, Clone, PartialEq)]
pub enum ToolValue {
    Text(String),
    Json(Value),
    Documents(Vec<Document>),
}

impl From<Value> for ToolValue {
    fn from(value: Value) -> Self {
        Self::Json(value)
    }
}

impl From<String> for ToolValue {
    fn from(text: String) -> Self {
        Self::Text(text)
    }
}

/// Convert a native result into a JSON-safe value.
pub fn normalize(value: ToolValue) -> Value {
    match value {
        ToolValue::Text(text) => Value::String(text),
        ToolValue::Json(value) => normalize_json(value),
        ToolValue::Documents(docs) => Value::Array(docs.iter().map(normalize_document).collect()),
    }
}

/// Rebuild a JSON value recursively, keeping mapping and sequence order.
///
/// A `_type` discriminator is an ordinary key and passes through untouched.
pub fn normalize_json(value: Value) -> Value {
    match value {
        Value::Array(items) => Value::Array(items.into_iter().map(normalize_json).collect()),
        Value::Object(map) => Value::Object(
            map.into_iter()
                .map(|(k, v)| (k, normalize_json(v)))
                .collect(),
        ),
        scalar => scalar,
    }
}

/// Render a store document as a JSON object.
pub fn normalize_document(doc: &Document) -> Value {
    Value::Object(
        doc.iter()
            .map(|(k, v)| (k.clone(), normalize_doc_value(v)))
            .collect::<Map<_, _>>(),
    )
}

/// Render one store-native value. Never fails.
pub fn normalize_doc_value(value: &DocValue) -> Value {
    match value {
        DocValue::Null => Value::Null,
        DocValue::Boolean(b) => Value::Bool(*b),
        DocValue::Int32(i) => Value::from(*i),
        DocValue::Int64(i) => Value::from(*i),
        DocValue::Double(f) if f.is_finite() => Value::from(*f),
        DocValue::Double(f) => {
            let repr = if f.is_nan() {
                "NaN"
            } else if f.is_sign_positive() {
                "Infinity"
            } else {
                "-Infinity"
            };
            json!({ "$numberDouble": repr })
        }
        DocValue::String(s) => Value::String(s.clone()),
        DocValue::ObjectId(id) => json!({ "$oid": hex::encode(id) }),
        DocValue::DateTime(ms) => json!({ "$date": date_repr(*ms) }),
        DocValue::Binary { subtype, bytes } => json!({
            "$binary": {
                "base64": STANDARD.encode(bytes),
                "subType": format!("{:02x}", subtype),
            }
        }),
        DocValue::Decimal128(d) => json!({ "$numberDecimal": d }),
        DocValue::Timestamp { time, increment } => json!({
            "$timestamp": { "t": time, "i": increment }
        }),
        DocValue::Regex { pattern, options } => json!({
            "$regularExpression": { "pattern": pattern, "options": options }
        }),
        DocValue::Array(items) => Value::Array(items.iter().map(normalize_doc_value).collect()),
        DocValue::Document(doc) => normalize_document(doc),
    }
}

/// ISO-8601 for dates between 1970 and 9999, `$numberLong` otherwise.
const MAX_RELAXED_MS: i64 = 253_402_300_799_999;

fn date_repr(ms: i64) -> Value {
    match DateTime::<Utc>::from_timestamp_millis(ms) {
        Some(dt) if (0..=MAX_RELAXED_MS).contains(&ms) => {
            Value::String(dt.to_rfc3339_opts(SecondsFormat::Millis, true))
        }
        _ => json!({ "$numberLong": ms.to_string() }),
    }
}
