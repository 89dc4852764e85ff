//! Genie MCP Server Library
//!
//! A Model Context Protocol server exposing a registry of stateless tools.
//! Every operation is declared with a typed schema, its arguments are
//! validated and coerced before the handler runs, and every outcome comes
//! back as a uniform JSON envelope.
//!
//! # Architecture
//!
//! - **core**: configuration, error handling, the MCP server and transports
//! - **domains**: business logic
//!   - **tools**: schema, registry, validator, dispatcher, normalizer and
//!     the tool catalogue
//!   - **store**: the document-store collaborator
//!
//! # Example
//!
//! ```rust,no_run
//! use genie_mcp_server::core::{Config, serve};
//!
//! #[tokio::main]
//! async fn main() -> anyhow::Result<()> {
//!     serve(Config::from_env()).await?;
//!     Ok(())
//! }
//! ```

pub mod core;
pub mod domains;

// Re-export commonly used types for convenience
pub use core::{Config, Error, McpServer, Result};
pub use domains::tools::{Dispatcher, Envelope, ErrorKind, InvocationRequest};
