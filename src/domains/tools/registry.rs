//! Tool Registry - central registration and lookup for all operations.
//!
//! The registry maps operation names to a [`Schema`] and a [`Handler`]. It
//! is filled once at startup and only read afterwards, so it can be shared
//! across worker threads behind an `Arc` without locking.

use std::fmt;
use std::sync::Arc;

use indexmap::IndexMap;
use indexmap::map::Entry;
use thiserror::Error;
use tracing::debug;

use super::context::ToolContext;
use super::error::ToolResult;
use super::schema::{Schema, SchemaError};
use super::validation::Arguments;

/// A tool implementation: typed arguments in, native result out.
pub type Handler = Arc<dyn Fn(&Arguments, &ToolContext) -> ToolResult + Send + Sync>;

/// Registry errors.
#[derive(Debug, Clone, PartialEq, Error)]
pub enum RegistryError {
    #[error("operation already registered: {0}")]
    DuplicateOperation(String),

    #[error("unknown operation: {0}")]
    UnknownOperation(String),

    #[error(transparent)]
    Schema(#[from] SchemaError),
}

/// A tool with a static name, description and parameter list.
///
/// Implementors are zero-sized markers; [`ToolRegistry::register_tool`]
/// builds the schema and wires `execute` as the handler.
pub trait ToolDefinition: 'static {
    /// Operation name as registered.
    const NAME: &'static str;

    /// Description shown to callers.
    const DESCRIPTION: &'static str;

    /// Declared parameters, in call order.
    fn parameters() -> Vec<super::ParameterSpec>;

    /// Run the tool.
    fn execute(args: &Arguments, ctx: &ToolContext) -> ToolResult;

    /// Build the checked schema.
    fn schema() -> Result<Schema, SchemaError> {
        Schema::new(Self::NAME, Self::DESCRIPTION, Self::parameters())
    }
}

/// A registered operation.
#[derive(Clone)]
pub struct RegistryEntry {
    pub schema: Arc<Schema>,
    pub handler: Handler,
}

impl fmt::Debug for RegistryEntry {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("RegistryEntry")
            .field("schema", &self.schema.name())
            .finish_non_exhaustive()
    }
}

/// Registry of all available operations, in registration order.
#[derive(Default)]
pub struct ToolRegistry {
    entries: IndexMap<String, RegistryEntry>,
}

impl ToolRegistry {
    /// Create an empty registry.
    pub fn new() -> Self {
        Self::default()
    }

    /// Add an operation. Names must be unique.
    pub fn register(&mut self, schema: Schema, handler: Handler) -> Result<(), RegistryError> {
        match self.entries.entry(schema.name().to_string()) {
            Entry::Occupied(e) => Err(RegistryError::DuplicateOperation(e.key().clone())),
            Entry::Vacant(e) => {
                debug!("Registered operation {}", e.key());
                e.insert(RegistryEntry {
                    schema: Arc::new(schema),
                    handler,
                });
                Ok(())
            }
        }
    }

    /// Register a [`ToolDefinition`].
    pub fn register_tool<T: ToolDefinition>(&mut self) -> Result<(), RegistryError> {
        let schema = T::schema()?;
        self.register(schema, Arc::new(T::execute))
    }

    /// Find an operation by name.
    pub fn lookup(&self, name: &str) -> Result<&RegistryEntry, RegistryError> {
        self.entries
            .get(name)
            .ok_or_else(|| RegistryError::UnknownOperation(name.to_string()))
    }

    /// All schemas in registration order. Each call starts a fresh iteration.
    pub fn list(&self) -> impl Iterator<Item = &Schema> + '_ {
        self.entries.values().map(|e| e.schema.as_ref())
    }

    /// All operation names.
    pub fn names(&self) -> Vec<&str> {
        self.entries.keys().map(String::as_str).collect()
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}

impl fmt::Debug for ToolRegistry {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("ToolRegistry")
            .field("operations", &self.names())
            .finish()
    }
}
