//! Tools domain module.
//!
//! This module holds the tool registry and the invocation protocol: every
//! operation is declared with a [`Schema`], registered once at startup, and
//! invoked through the [`Dispatcher`], which validates arguments, runs the
//! handler, and normalizes the outcome into an [`Envelope`].
//!
//! ## Architecture
//!
//! - `schema.rs` - Parameter and operation declarations
//! - `registry.rs` - Name to (schema, handler) mapping
//! - `validation.rs` - Argument checking and coercion
//! - `dispatcher.rs` - Lookup, validation, execution, failure boundary
//! - `normalize.rs` - Native results to JSON-safe values
//! - `envelope.rs` - Wire request and result types
//! - `definitions/` - The tool catalogue, grouped by area
//!
//! ## Adding a New Tool
//!
//! 1. Implement [`ToolDefinition`] for a marker struct in `definitions/`
//! 2. Add it to `build_registry()` in `definitions/mod.rs`

mod context;
pub mod definitions;
mod dispatcher;
mod envelope;
mod error;
mod normalize;
mod registry;
mod schema;
mod validation;

pub use context::ToolContext;
pub use definitions::build_registry;
pub use dispatcher::Dispatcher;
pub use envelope::{Envelope, ErrorKind, InvocationRequest};
pub use error::{ToolFailure, ToolResult};
pub use normalize::{ToolValue, normalize, normalize_doc_value, normalize_document, normalize_json};
pub use registry::{Handler, RegistryEntry, RegistryError, ToolDefinition, ToolRegistry};
pub use schema::{OperationDescriptor, ParamType, ParameterDescriptor, ParameterSpec, Schema, SchemaError};
pub use validation::{ArgValue, Arguments, ValidationError, validate};
