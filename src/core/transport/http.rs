//! HTTP transport implementation.
//!
//! Two surfaces share one dispatcher:
//! - `POST <rpc_path>`: JSON-RPC 2.0 with the MCP tool methods
//! - `POST /invoke`: `{"operation", "arguments"}` in, envelope out
//!
//! plus `GET /operations` for introspection, `GET /health` and `GET /`.

use axum::{
    Json, Router,
    extract::{State, rejection::JsonRejection},
    response::IntoResponse,
    routing::{get, post},
};
use serde::{Deserialize, Serialize};
use serde_json::{Map, Value, json};
use tower::ServiceBuilder;
use tower_http::cors::{Any, CorsLayer};
use tower_http::trace::TraceLayer;
use tracing::{info, instrument, warn};

use super::{TransportError, TransportResult, config::HttpConfig};
use crate::core::McpServer;
use crate::domains::tools::{Envelope, ErrorKind, InvocationRequest};

const PROTOCOL_VERSION: &str = "2024-11-05";

/// HTTP transport handler.
pub struct HttpTransport {
    config: HttpConfig,
}

/// JSON-RPC request structure.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct JsonRpcRequest {
    pub jsonrpc: String,
    #[serde(default)]
    pub id: Option<Value>,
    pub method: String,
    #[serde(default)]
    pub params: Option<Value>,
}

/// JSON-RPC response structure.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct JsonRpcResponse {
    pub jsonrpc: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub id: Option<Value>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub result: Option<Value>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub error: Option<JsonRpcError>,
}

/// JSON-RPC error structure.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct JsonRpcError {
    pub code: i32,
    pub message: String,
}

impl JsonRpcResponse {
    /// Create a success response.
    pub fn success(id: Option<Value>, result: Value) -> Self {
        Self {
            jsonrpc: "2.0".to_string(),
            id,
            result: Some(result),
            error: None,
        }
    }

    /// Create an error response.
    pub fn error(id: Option<Value>, code: i32, message: impl Into<String>) -> Self {
        Self {
            jsonrpc: "2.0".to_string(),
            id,
            result: None,
            error: Some(JsonRpcError {
                code,
                message: message.into(),
            }),
        }
    }

    pub fn method_not_found(id: Option<Value>) -> Self {
        Self::error(id, -32601, "Method not found")
    }

    pub fn invalid_request(id: Option<Value>) -> Self {
        Self::error(id, -32600, "Invalid Request")
    }

    pub fn invalid_params(id: Option<Value>, msg: impl Into<String>) -> Self {
        Self::error(id, -32602, msg)
    }
}

impl HttpTransport {
    /// Create a new HTTP transport with the given config.
    pub fn new(config: HttpConfig) -> Self {
        Self { config }
    }

    /// Get the bind address.
    pub fn address(&self) -> String {
        format!("{}:{}", self.config.host, self.config.port)
    }

    /// Build the router for the given server.
    pub fn router(&self, server: McpServer) -> Router {
        let app = Router::new()
            .route(&self.config.rpc_path, post(handle_rpc))
            .route("/invoke", post(handle_invoke))
            .route("/operations", get(handle_operations))
            .route("/health", get(health_check))
            .route("/", get(root_handler))
            .with_state(server);

        let app = app.layer(ServiceBuilder::new().layer(TraceLayer::new_for_http()));

        if self.config.enable_cors {
            app.layer(
                CorsLayer::new()
                    .allow_origin(Any)
                    .allow_methods(Any)
                    .allow_headers(Any),
            )
        } else {
            app
        }
    }

    /// Serve until Ctrl-C.
    pub async fn run(self, server: McpServer) -> TransportResult<()> {
        let addr = self.address();
        let app = self.router(server);

        let listener = tokio::net::TcpListener::bind(&addr)
            .await
            .map_err(|e| TransportError::bind(&addr, e))?;

        info!(
            "Ready - listening on {} (CORS {})",
            addr,
            if self.config.enable_cors { "enabled" } else { "disabled" }
        );
        info!("  JSON-RPC:   POST {}", self.config.rpc_path);
        info!("  Invoke:     POST /invoke");
        info!("  Operations: GET /operations");

        axum::serve(listener, app)
            .with_graceful_shutdown(async {
                let _ = tokio::signal::ctrl_c().await;
                info!("Shutdown requested");
            })
            .await
            .map_err(|e| TransportError::http(e.to_string()))
    }
}

/// Root handler - describes the endpoints.
async fn root_handler(State(server): State<McpServer>) -> Json<Value> {
    Json(json!({
        "name": server.name(),
        "version": server.version(),
        "transport": "HTTP",
        "endpoints": {
            "invoke": "/invoke",
            "operations": "/operations",
            "health": "/health"
        },
        "protocol": "JSON-RPC 2.0"
    }))
}

/// Health check endpoint.
async fn health_check() -> impl IntoResponse {
    Json(json!({
        "status": "healthy",
        "timestamp": chrono::Utc::now().to_rfc3339()
    }))
}

/// Introspection listing.
async fn handle_operations(State(server): State<McpServer>) -> Json<Value> {
    Json(json!({ "operations": server.operations() }))
}

/// Run one invocation and return its envelope verbatim.
///
/// A body that is not an invocation request is answered with an
/// `InvalidArguments` envelope rather than an HTTP error.
async fn handle_invoke(
    State(server): State<McpServer>,
    request: Result<Json<InvocationRequest>, JsonRejection>,
) -> Json<Value> {
    let envelope = match request {
        Ok(Json(request)) => server.invoke(&request.operation, request.arguments).await,
        Err(rejection) => {
            warn!("Malformed invocation request: {}", rejection.body_text());
            Envelope::error(ErrorKind::InvalidArguments, rejection.body_text())
        }
    };
    Json(envelope.to_value())
}

/// Handle JSON-RPC requests.
#[instrument(skip_all, fields(method = %request.method))]
async fn handle_rpc(
    State(server): State<McpServer>,
    Json(request): Json<JsonRpcRequest>,
) -> Json<JsonRpcResponse> {
    Json(process_request(&server, request).await)
}

/// Process a JSON-RPC request and return the response.
async fn process_request(server: &McpServer, request: JsonRpcRequest) -> JsonRpcResponse {
    if request.jsonrpc != "2.0" {
        return JsonRpcResponse::invalid_request(request.id);
    }

    match request.method.as_str() {
        "initialize" => JsonRpcResponse::success(
            request.id,
            json!({
                "protocolVersion": PROTOCOL_VERSION,
                "capabilities": { "tools": {} },
                "serverInfo": {
                    "name": server.name(),
                    "version": server.version()
                }
            }),
        ),
        "tools/list" => JsonRpcResponse::success(request.id, json!({ "tools": server.list_tools() })),
        "tools/call" => handle_tools_call(server, request).await,
        method if method.starts_with("notifications/") => {
            info!("Received notification: {}", method);
            JsonRpcResponse::success(request.id, Value::Null)
        }
        _ => {
            warn!("Unknown method: {}", request.method);
            JsonRpcResponse::method_not_found(request.id)
        }
    }
}

/// Handle tools/call: the envelope is returned as text content.
async fn handle_tools_call(server: &McpServer, request: JsonRpcRequest) -> JsonRpcResponse {
    let Some(params) = request.params else {
        return JsonRpcResponse::invalid_params(request.id, "Missing params");
    };

    let Some(name) = params.get("name").and_then(Value::as_str) else {
        return JsonRpcResponse::invalid_params(request.id, "Missing tool name");
    };

    let arguments = match params.get("arguments") {
        None | Some(Value::Null) => Map::new(),
        Some(Value::Object(map)) => map.clone(),
        Some(_) => {
            return JsonRpcResponse::invalid_params(request.id, "Arguments must be an object");
        }
    };

    let envelope = server.invoke(name, arguments).await;
    JsonRpcResponse::success(
        request.id,
        json!({
            "content": [{ "type": "text", "text": envelope.to_value().to_string() }],
            "isError": !envelope.is_ok()
        }),
    )
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core::Config;
    use crate::domains::tools::{Dispatcher, ToolContext, build_registry};

    fn server() -> McpServer {
        McpServer::with_dispatcher(
            Config::default(),
            Dispatcher::new(build_registry().unwrap(), ToolContext::in_memory()),
        )
    }

    fn rpc(method: &str, params: Option<Value>) -> JsonRpcRequest {
        JsonRpcRequest {
            jsonrpc: "2.0".into(),
            id: Some(json!(1)),
            method: method.into(),
            params,
        }
    }

    #[test]
    fn test_tools_list_covers_registry() {
        let response = tokio_test::block_on(process_request(&server(), rpc("tools/list", None)));
        let tools = response.result.unwrap()["tools"].as_array().unwrap().len();
        assert_eq!(tools, 47);
    }

    #[test]
    fn test_tools_call_wraps_envelope() {
        let params = json!({ "name": "slugify", "arguments": { "text": "Hello World" } });
        let response =
            tokio_test::block_on(process_request(&server(), rpc("tools/call", Some(params))));
        let result = response.result.unwrap();
        assert_eq!(result["isError"], false);

        let text = result["content"][0]["text"].as_str().unwrap();
        let envelope: Value = serde_json::from_str(text).unwrap();
        assert_eq!(envelope["ok"], true);
        assert_eq!(envelope["result"]["slug"], "hello-world");
    }

    #[test]
    fn test_tools_call_failure_sets_is_error() {
        let params = json!({ "name": "calculate_metrics", "arguments": { "visits": "lots" } });
        let response =
            tokio_test::block_on(process_request(&server(), rpc("tools/call", Some(params))));
        assert_eq!(response.result.unwrap()["isError"], true);
    }

    #[test]
    fn test_tools_call_without_name() {
        let response = tokio_test::block_on(process_request(
            &server(),
            rpc("tools/call", Some(json!({ "arguments": {} }))),
        ));
        assert_eq!(response.error.unwrap().code, -32602);
    }

    #[test]
    fn test_wrong_version_rejected() {
        let mut request = rpc("tools/list", None);
        request.jsonrpc = "1.0".into();
        let response = tokio_test::block_on(process_request(&server(), request));
        assert_eq!(response, JsonRpcResponse::invalid_request(Some(json!(1))));
    }

    #[test]
    fn test_unknown_method() {
        let response = tokio_test::block_on(process_request(&server(), rpc("resources/list", None)));
        assert_eq!(response.error.unwrap().code, -32601);
    }

    #[test]
    fn test_invoke_returns_envelope_verbatim() {
        let request = InvocationRequest {
            operation: "calculate_percentage".into(),
            arguments: json!({ "value": 1, "total": 0 }).as_object().cloned().unwrap(),
        };
        let Json(body) =
            tokio_test::block_on(handle_invoke(State(server()), Ok(Json(request))));
        assert_eq!(
            body,
            json!({
                "ok": false,
                "error_kind": "ToolExecutionError",
                "message": "Total cannot be zero"
            })
        );
    }

    #[test]
    fn test_operations_listing() {
        let Json(body) = tokio_test::block_on(handle_operations(State(server())));
        let ops = body["operations"].as_array().unwrap();
        assert_eq!(ops.len(), 47);
        assert!(ops.iter().all(|op| op["parameters"].is_array()));
    }
}
