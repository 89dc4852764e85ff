//! MCP Server implementation and lifecycle management.
//!
//! The server handler owns the [`Dispatcher`] and translates MCP requests
//! into invocations. Every tool call goes through the dispatcher, so the
//! MCP `tools/call` path and the HTTP `/invoke` path return the same
//! envelope for the same input.
//!
//! ## Tool Architecture
//!
//! Tools are defined in `domains/tools/definitions/`, grouped by area, and
//! registered in `build_registry()`. The MCP tool list is derived from the
//! registry at startup. **Adding a new tool does NOT require modifying this
//! file!**

use rmcp::{
    ErrorData as McpError, RoleServer, ServerHandler, model::*, service::RequestContext,
};
use serde_json::{Map, Value};
use std::sync::Arc;
use tracing::{error, info, instrument};

use super::config::Config;
use super::error::Result;
use crate::domains::tools::{
    Dispatcher, Envelope, ErrorKind, OperationDescriptor, Schema, ToolContext, build_registry,
};

const INSTRUCTIONS: &str = "Genie tool server. Every tool returns a JSON envelope: \
{\"ok\": true, \"result\": ...} on success or \
{\"ok\": false, \"error_kind\": ..., \"message\": ...} on failure.";

/// The main MCP server handler.
#[derive(Clone)]
pub struct McpServer {
    /// Server configuration.
    config: Arc<Config>,

    /// Registry-backed invocation entry point.
    dispatcher: Arc<Dispatcher>,

    /// MCP view of the registry, built once.
    tools: Arc<Vec<Tool>>,
}

impl McpServer {
    /// Create a new MCP server with the given configuration.
    ///
    /// Fails if any tool schema is invalid or a name is registered twice.
    pub fn new(config: Config) -> Result<Self> {
        let registry = build_registry()?;
        let context = ToolContext::from_config(&config.store);
        Ok(Self::with_dispatcher(config, Dispatcher::new(registry, context)))
    }

    /// Create a server around an existing dispatcher.
    pub fn with_dispatcher(config: Config, dispatcher: Dispatcher) -> Self {
        let tools = dispatcher.registry().list().map(to_mcp_tool).collect();
        Self {
            config: Arc::new(config),
            dispatcher: Arc::new(dispatcher),
            tools: Arc::new(tools),
        }
    }

    /// Get the server name.
    pub fn name(&self) -> &str {
        &self.config.server.name
    }

    /// Get the server version.
    pub fn version(&self) -> &str {
        &self.config.server.version
    }

    pub fn dispatcher(&self) -> &Arc<Dispatcher> {
        &self.dispatcher
    }

    /// Introspection listing of every operation.
    pub fn operations(&self) -> Vec<OperationDescriptor> {
        self.dispatcher.operations()
    }

    /// Tools in MCP wire shape (for HTTP transport).
    pub fn list_tools(&self) -> Vec<Value> {
        self.tools
            .iter()
            .map(|t| {
                serde_json::json!({
                    "name": t.name,
                    "description": t.description,
                    "inputSchema": t.input_schema
                })
            })
            .collect()
    }

    /// Run an invocation on a blocking worker.
    ///
    /// Handlers are synchronous and may block on the document store, so
    /// they never run on the async executor threads.
    pub async fn invoke(&self, name: &str, arguments: Map<String, Value>) -> Envelope {
        let dispatcher = self.dispatcher.clone();
        let operation = name.to_string();
        match tokio::task::spawn_blocking(move || dispatcher.invoke(&operation, &arguments)).await
        {
            Ok(envelope) => envelope,
            Err(e) => {
                error!("Invocation worker for {} failed: {}", name, e);
                Envelope::error(
                    ErrorKind::InternalError,
                    "internal error while executing the operation",
                )
            }
        }
    }
}

/// Derive the MCP tool description from a schema.
fn to_mcp_tool(schema: &Schema) -> Tool {
    Tool::new(
        schema.name().to_string(),
        schema.description().to_string(),
        Arc::new(schema.input_schema()),
    )
}

/// Wrap an envelope as MCP text content.
fn to_call_result(envelope: &Envelope) -> CallToolResult {
    let content = vec![Content::text(envelope.to_value().to_string())];
    if envelope.is_ok() {
        CallToolResult::success(content)
    } else {
        CallToolResult::error(content)
    }
}

impl ServerHandler for McpServer {
    fn get_info(&self) -> ServerInfo {
        ServerInfo {
            instructions: Some(INSTRUCTIONS.to_string()),
            capabilities: ServerCapabilities::builder().enable_tools().build(),
            server_info: Implementation {
                name: self.config.server.name.clone(),
                version: self.config.server.version.clone(),
                ..Implementation::from_build_env()
            },
            ..Default::default()
        }
    }

    #[instrument(skip_all)]
    async fn list_tools(
        &self,
        _request: Option<PaginatedRequestParam>,
        _context: RequestContext<RoleServer>,
    ) -> std::result::Result<ListToolsResult, McpError> {
        info!("Listing {} tools", self.tools.len());
        Ok(ListToolsResult {
            tools: self.tools.as_ref().clone(),
            next_cursor: None,
            meta: None,
        })
    }

    #[instrument(skip_all, fields(tool = %request.name))]
    async fn call_tool(
        &self,
        request: CallToolRequestParam,
        _context: RequestContext<RoleServer>,
    ) -> std::result::Result<CallToolResult, McpError> {
        let arguments = request.arguments.unwrap_or_default();
        let envelope = self.invoke(&request.name, arguments).await;
        Ok(to_call_result(&envelope))
    }
}
