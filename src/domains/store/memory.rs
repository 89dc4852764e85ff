//! In-memory document store.

use std::collections::HashMap;

use serde_json::{Map, Value};

use super::{DocValue, Document, DocumentCursor, DocumentStore, StoreError};
use crate::domains::tools::normalize_doc_value;

/// A read-only store holding documents in memory.
///
/// Filters support top-level equality: a document matches when every filter
/// key is present and its normalized JSON form equals the filter value.
/// Operator keys (`$gt`, `$in`, ...) are rejected as unsupported.
#[derive(Debug, Default, Clone)]
pub struct MemoryStore {
    collections: HashMap<(String, String), Vec<Document>>,
}

impl MemoryStore {
    pub fn new() -> Self {
        Self::default()
    }

    /// Add documents to a collection.
    pub fn with_documents(
        mut self,
        database: impl Into<String>,
        collection: impl Into<String>,
        documents: impl IntoIterator<Item = Document>,
    ) -> Self {
        self.collections
            .entry((database.into(), collection.into()))
            .or_default()
            .extend(documents);
        self
    }
}

impl DocumentStore for MemoryStore {
    fn find<'a>(
        &'a self,
        database: &str,
        collection: &str,
        filter: &Map<String, Value>,
        limit: u64,
    ) -> Result<DocumentCursor<'a>, StoreError> {
        if let Some(op) = filter.keys().find(|k| k.starts_with('$')) {
            return Err(StoreError::query(format!("unsupported operator '{}'", op)));
        }

        let documents = self
            .collections
            .get(&(database.to_string(), collection.to_string()))
            .map(Vec::as_slice)
            .unwrap_or_default();

        let filter = filter.clone();
        let take = if limit == 0 { usize::MAX } else { limit as usize };
        let cursor = documents
            .iter()
            .filter(move |doc| matches(doc, &filter))
            .take(take)
            .cloned()
            .map(Ok);

        Ok(Box::new(cursor))
    }
}

fn matches(doc: &Document, filter: &Map<String, Value>) -> bool {
    filter.iter().all(|(key, expected)| {
        doc.get(key)
            .map(|actual: &DocValue| normalize_doc_value(actual) == *expected)
            .unwrap_or(false)
    })
}
