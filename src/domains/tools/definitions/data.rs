//! Data tools backed by the document store.

use serde::Deserialize;
use serde_json::{Map, Value};
use tracing::{info, instrument};

use crate::domains::tools::{
    Arguments, ParamType, ParameterSpec, ToolContext, ToolDefinition, ToolFailure, ToolResult,
    ToolValue,
};

/// Parameters for the user data tool.
#[derive(Debug, Deserialize)]
struct GetUserDataParams {
    /// Filter document matched against the users collection.
    query: Map<String, Value>,

    /// Maximum number of documents; 0 means no limit.
    limit: i64,
}

/// Reads user documents from the configured collection.
pub struct GetUserDataTool;

impl ToolDefinition for GetUserDataTool {
    const NAME: &'static str = "get_userData";
    const DESCRIPTION: &'static str = "Retrieve documents from the user database.";

    fn parameters() -> Vec<ParameterSpec> {
        vec![
            ParameterSpec::optional("query", ParamType::Mapping)
                .with_default(Value::Object(Map::new()))
                .describe("Query filter as a mapping. Defaults to empty (find all)."),
            ParameterSpec::optional("limit", ParamType::Integer)
                .with_default(10)
                .describe("Maximum number of documents to return (0 for no limit)."),
        ]
    }

    #[instrument(skip_all, fields(collection = %ctx.users_collection))]
    fn execute(args: &Arguments, ctx: &ToolContext) -> ToolResult {
        let params: GetUserDataParams = args.parse()?;
        let limit = u64::try_from(params.limit)
            .map_err(|_| ToolFailure::execution("limit must be zero or a positive integer"))?;

        let store = ctx.store.get()?;
        let documents = store
            .find(&ctx.database, &ctx.users_collection, &params.query, limit)?
            .collect::<Result<Vec<_>, _>>()?;

        info!("Fetched {} documents", documents.len());
        Ok(ToolValue::Documents(documents))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core::config::StoreConfig;
    use crate::domains::store::{DocValue, Document, MemoryStore, StoreHandle};
    use crate::domains::tools::{normalize, validate};
    use serde_json::json;
    use std::sync::Arc;

    fn context() -> ToolContext {
        let mut doc = Document::new();
        doc.insert("_id".into(), DocValue::object_id("65a1b2c3d4e5f60718293a4b").unwrap());
        doc.insert("name".into(), DocValue::String("ada".into()));
        doc.insert("joined".into(), DocValue::DateTime(0));
        let mut other = Document::new();
        other.insert("name".into(), DocValue::String("bob".into()));

        let config = StoreConfig::default();
        let store = MemoryStore::new().with_documents(
            config.database.clone(),
            config.users_collection.clone(),
            vec![doc, other],
        );
        ToolContext::with_store(Arc::new(StoreHandle::connected(Arc::new(store))), &config)
    }

    fn run(raw: Value) -> ToolResult {
        let schema = GetUserDataTool::schema().unwrap();
        let args = validate(&schema, raw.as_object().unwrap()).unwrap();
        GetUserDataTool::execute(&args, &context())
    }

    #[test]
    fn test_defaults_return_all() {
        let value = normalize(run(json!({})).unwrap());
        assert_eq!(value.as_array().unwrap().len(), 2);
        assert_eq!(value[0]["_id"], json!({ "$oid": "65a1b2c3d4e5f60718293a4b" }));
        assert_eq!(value[0]["joined"], json!({ "$date": "1970-01-01T00:00:00.000Z" }));
    }

    #[test]
    fn test_filter_and_limit() {
        let value = normalize(run(json!({ "query": { "name": "bob" }, "limit": 5 })).unwrap());
        assert_eq!(value, json!([{ "name": "bob" }]));

        let value = normalize(run(json!({ "limit": 1 })).unwrap());
        assert_eq!(value.as_array().unwrap().len(), 1);
    }

    #[test]
    fn test_negative_limit_rejected() {
        assert!(matches!(run(json!({ "limit": -1 })), Err(ToolFailure::Execution(_))));
    }

    #[test]
    fn test_bad_filter_is_execution_error() {
        assert!(matches!(
            run(json!({ "query": { "$where": "x" } })),
            Err(ToolFailure::Execution(_))
        ));
    }
}
