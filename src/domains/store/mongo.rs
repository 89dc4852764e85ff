//! MongoDB-backed document store (sync driver).

use std::sync::Arc;

use mongodb::bson::{self, Bson, Document as BsonDocument};
use mongodb::error::{Error as MongoError, ErrorKind};
use mongodb::sync::Client;
use serde_json::{Map, Value};

use super::{DocValue, Document, DocumentCursor, DocumentStore, StoreConnector, StoreError};

/// Connects to MongoDB from a connection string.
pub struct MongoConnector;

impl StoreConnector for MongoConnector {
    fn connect(&self, uri: &str) -> Result<Arc<dyn DocumentStore>, StoreError> {
        let client = Client::with_uri_str(uri).map_err(|e| StoreError::connection(e.to_string()))?;
        Ok(Arc::new(MongoStore { client }))
    }
}

struct MongoStore {
    client: Client,
}

impl DocumentStore for MongoStore {
    fn find<'a>(
        &'a self,
        database: &str,
        collection: &str,
        filter: &Map<String, Value>,
        limit: u64,
    ) -> Result<DocumentCursor<'a>, StoreError> {
        let filter = bson::to_document(filter).map_err(|e| StoreError::query(e.to_string()))?;
        let collection = self
            .client
            .database(database)
            .collection::<BsonDocument>(collection);

        let mut find = collection.find(filter);
        if limit > 0 {
            find = find.limit(i64::try_from(limit).unwrap_or(i64::MAX));
        }
        let cursor = find.run().map_err(classify)?;

        Ok(Box::new(cursor.map(|doc| {
            doc.map(|d| from_bson_document(&d)).map_err(classify)
        })))
    }
}

fn classify(err: MongoError) -> StoreError {
    match err.kind.as_ref() {
        ErrorKind::ServerSelection { .. } | ErrorKind::Io(_) | ErrorKind::ConnectionPoolCleared { .. } => {
            StoreError::unavailable(err.to_string())
        }
        _ => StoreError::query(err.to_string()),
    }
}

fn from_bson_document(doc: &BsonDocument) -> Document {
    doc.iter()
        .map(|(k, v)| (k.clone(), from_bson(v)))
        .collect()
}

fn from_bson(value: &Bson) -> DocValue {
    match value {
        Bson::Null | Bson::Undefined => DocValue::Null,
        Bson::Boolean(b) => DocValue::Boolean(*b),
        Bson::Int32(i) => DocValue::Int32(*i),
        Bson::Int64(i) => DocValue::Int64(*i),
        Bson::Double(f) => DocValue::Double(*f),
        Bson::String(s) | Bson::Symbol(s) | Bson::JavaScriptCode(s) => DocValue::String(s.clone()),
        Bson::ObjectId(oid) => DocValue::ObjectId(oid.bytes()),
        Bson::DateTime(dt) => DocValue::DateTime(dt.timestamp_millis()),
        Bson::Binary(bin) => DocValue::Binary {
            subtype: u8::from(bin.subtype),
            bytes: bin.bytes.clone(),
        },
        Bson::Decimal128(d) => DocValue::Decimal128(d.to_string()),
        Bson::Timestamp(ts) => DocValue::Timestamp {
            time: ts.time,
            increment: ts.increment,
        },
        Bson::RegularExpression(re) => DocValue::Regex {
            pattern: re.pattern.clone(),
            options: re.options.clone(),
        },
        Bson::Array(items) => DocValue::Array(items.iter().map(from_bson).collect()),
        Bson::Document(doc) => DocValue::Document(from_bson_document(doc)),
        other => DocValue::from(&other.clone().into_relaxed_extjson()),
    }
}
