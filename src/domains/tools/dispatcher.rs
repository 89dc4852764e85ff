//! Invocation dispatch.
//!
//! The [`Dispatcher`] is the only entry point transports use. It looks the
//! operation up, validates the arguments, runs the handler exactly once
//! inside a failure boundary, and normalizes the outcome into an
//! [`Envelope`]. Nothing raised by a handler escapes this module.

use std::panic::{AssertUnwindSafe, catch_unwind};
use std::sync::Arc;

use serde_json::{Map, Value};
use tracing::{error, info, instrument, warn};

use super::context::ToolContext;
use super::envelope::{Envelope, ErrorKind, InvocationRequest};
use super::error::ToolFailure;
use super::normalize::normalize;
use super::registry::{RegistryError, ToolRegistry};
use super::schema::OperationDescriptor;
use super::validation::validate;

/// Message returned for internal faults; details go to the log only.
const INTERNAL_MESSAGE: &str = "internal error while executing the operation";

/// Routes invocations to registered handlers.
#[derive(Debug, Clone)]
pub struct Dispatcher {
    registry: Arc<ToolRegistry>,
    context: ToolContext,
}

impl Dispatcher {
    /// Create a dispatcher over a fully built registry.
    pub fn new(registry: ToolRegistry, context: ToolContext) -> Self {
        Self {
            registry: Arc::new(registry),
            context,
        }
    }

    pub fn registry(&self) -> &ToolRegistry {
        &self.registry
    }

    pub fn context(&self) -> &ToolContext {
        &self.context
    }

    /// Descriptions of every registered operation.
    pub fn operations(&self) -> Vec<OperationDescriptor> {
        self.registry.list().map(|s| s.descriptor()).collect()
    }

    /// Handle a wire-level request.
    pub fn handle(&self, request: &InvocationRequest) -> Envelope {
        self.invoke(&request.operation, &request.arguments)
    }

    /// Invoke an operation by name.
    #[instrument(skip_all, fields(operation = %name))]
    pub fn invoke(&self, name: &str, arguments: &Map<String, Value>) -> Envelope {
        let entry = match self.registry.lookup(name) {
            Ok(entry) => entry,
            Err(e @ RegistryError::UnknownOperation(_)) => {
                warn!("Unknown operation requested: {}", name);
                return Envelope::error(ErrorKind::UnknownOperation, e.to_string());
            }
            Err(e) => {
                error!("Registry lookup failed: {}", e);
                return Envelope::error(ErrorKind::InternalError, INTERNAL_MESSAGE);
            }
        };

        let args = match validate(&entry.schema, arguments) {
            Ok(args) => args,
            Err(e) => {
                info!("Rejected arguments for {}: {}", name, e);
                return Envelope::error(ErrorKind::InvalidArguments, e.to_string());
            }
        };

        let handler = &entry.handler;
        let outcome = catch_unwind(AssertUnwindSafe(|| {
            handler(&args, &self.context).map(normalize)
        }));

        match outcome {
            Ok(Ok(result)) => {
                info!("Operation {} completed", name);
                Envelope::ok(result)
            }
            Ok(Err(ToolFailure::Execution(message))) => {
                info!("Operation {} failed: {}", name, message);
                Envelope::error(ErrorKind::ToolExecutionError, message)
            }
            Ok(Err(ToolFailure::Unavailable(message))) => {
                warn!("Operation {} could not reach a collaborator: {}", name, message);
                Envelope::error(ErrorKind::CollaboratorUnavailable, message)
            }
            Ok(Err(ToolFailure::Internal(detail))) => {
                error!("Operation {} hit an internal fault: {}", name, detail);
                Envelope::error(ErrorKind::InternalError, INTERNAL_MESSAGE)
            }
            Err(panic) => {
                let detail = panic
                    .downcast_ref::<&str>()
                    .map(|s| s.to_string())
                    .or_else(|| panic.downcast_ref::<String>().cloned())
                    .unwrap_or_else(|| "non-string panic payload".to_string());
                error!("Operation {} panicked: {}", name, detail);
                Envelope::error(ErrorKind::InternalError, INTERNAL_MESSAGE)
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domains::tools::{
        Arguments, ParamType, ParameterSpec, Schema, ToolResult, ToolValue, build_registry,
    };
    use serde_json::json;
    use std::sync::atomic::{AtomicUsize, Ordering};
    use std::thread;

    fn args(value: Value) -> Map<String, Value> {
        value.as_object().cloned().unwrap()
    }

    fn dispatcher() -> Dispatcher {
        Dispatcher::new(build_registry().unwrap(), ToolContext::in_memory())
    }

    #[test]
    fn test_convert_temperature_success() {
        let envelope = dispatcher().invoke(
            "convert_temperature",
            &args(json!({ "value": 32, "from_unit": "fahrenheit", "to_unit": "celsius" })),
        );
        let Envelope::Ok(result) = envelope else {
            panic!("expected success, got {:?}", envelope);
        };
        assert_eq!(result["converted"], json!(0.0));
    }

    #[test]
    fn test_missing_argument_envelope() {
        let envelope = dispatcher().invoke(
            "convert_temperature",
            &args(json!({ "value": 32, "from_unit": "fahrenheit" })),
        );
        assert_eq!(
            envelope.to_value(),
            json!({
                "ok": false,
                "error_kind": "InvalidArguments",
                "message": "missing argument: to_unit"
            })
        );
    }

    #[test]
    fn test_unknown_operation_envelope() {
        let request: InvocationRequest =
            serde_json::from_value(json!({ "operation": "nope", "arguments": {} })).unwrap();
        let envelope = dispatcher().handle(&request);
        assert_eq!(envelope.error_kind(), Some(ErrorKind::UnknownOperation));
    }

    #[test]
    fn test_division_by_zero_is_tool_error() {
        let envelope = dispatcher().invoke(
            "calculate_metrics",
            &args(json!({ "visits": 0, "conversions": 3 })),
        );
        assert_eq!(
            envelope.to_value(),
            json!({
                "ok": false,
                "error_kind": "ToolExecutionError",
                "message": "Visits cannot be zero."
            })
        );
    }

    fn counting_dispatcher(calls: Arc<AtomicUsize>) -> Dispatcher {
        let mut registry = ToolRegistry::new();
        let schema = Schema::new(
            "pick",
            "",
            vec![ParameterSpec::required("mode", ParamType::one_of(["a", "b"]))],
        )
        .unwrap();
        registry
            .register(
                schema,
                Arc::new(move |_: &Arguments, _: &ToolContext| -> ToolResult {
                    calls.fetch_add(1, Ordering::SeqCst);
                    Ok(ToolValue::Json(json!("picked")))
                }),
            )
            .unwrap();
        Dispatcher::new(registry, ToolContext::in_memory())
    }

    #[test]
    fn test_invalid_enum_never_invokes_handler() {
        let calls = Arc::new(AtomicUsize::new(0));
        let dispatcher = counting_dispatcher(calls.clone());

        let envelope = dispatcher.invoke("pick", &args(json!({ "mode": "c" })));
        assert_eq!(envelope.error_kind(), Some(ErrorKind::InvalidArguments));
        assert_eq!(calls.load(Ordering::SeqCst), 0);

        assert!(dispatcher.invoke("pick", &args(json!({ "mode": "a" }))).is_ok());
        assert_eq!(calls.load(Ordering::SeqCst), 1);
    }

    #[test]
    fn test_panic_becomes_internal_error() {
        let mut registry = ToolRegistry::new();
        registry
            .register(
                Schema::new("boom", "", vec![]).unwrap(),
                Arc::new(|_: &Arguments, _: &ToolContext| -> ToolResult {
                    panic!("secret state")
                }),
            )
            .unwrap();
        let dispatcher = Dispatcher::new(registry, ToolContext::in_memory());

        let envelope = dispatcher.invoke("boom", &Map::new());
        assert_eq!(envelope.error_kind(), Some(ErrorKind::InternalError));
        assert!(!envelope.to_value()["message"].as_str().unwrap().contains("secret"));
    }

    #[test]
    fn test_store_unavailable_maps_to_collaborator_error() {
        let dispatcher = Dispatcher::new(
            build_registry().unwrap(),
            ToolContext::from_config(&Default::default()),
        );
        let envelope = dispatcher.invoke("get_userData", &Map::new());
        #[cfg(not(feature = "mongodb"))]
        assert_eq!(envelope.error_kind(), Some(ErrorKind::CollaboratorUnavailable));
        #[cfg(feature = "mongodb")]
        let _ = envelope;
    }

    #[test]
    fn test_concurrent_invocations_match_sequential() {
        let dispatcher = Arc::new(dispatcher());
        let calls: Vec<(&str, Value)> = vec![
            ("convert_temperature", json!({ "value": 100, "from_unit": "celsius", "to_unit": "fahrenheit" })),
            ("convert_temperature", json!({ "value": 0, "from_unit": "celsius", "to_unit": "kelvin" })),
            ("hash_text", json!({ "text": "hello" })),
            ("slugify", json!({ "text": "Hello World Again" })),
            ("calculate_metrics", json!({ "visits": 8, "conversions": 2 })),
            ("word_count", json!({ "text": "one two. three!" })),
        ];

        let sequential: Vec<_> = calls
            .iter()
            .map(|(name, a)| dispatcher.invoke(name, &args(a.clone())))
            .collect();

        let handles: Vec<_> = calls
            .iter()
            .cloned()
            .map(|(name, a)| {
                let dispatcher = dispatcher.clone();
                thread::spawn(move || dispatcher.invoke(name, &args(a)))
            })
            .collect();
        let concurrent: Vec<_> = handles.into_iter().map(|h| h.join().unwrap()).collect();

        assert_eq!(sequential, concurrent);
        assert!(sequential.iter().all(Envelope::is_ok));
    }

    #[test]
    fn test_operations_lists_registry() {
        let dispatcher = dispatcher();
        let ops = dispatcher.operations();
        assert_eq!(ops.len(), dispatcher.registry().len());
        assert!(ops.iter().any(|op| op.name == "get_stock_price"));
    }
}
