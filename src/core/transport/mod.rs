//! Transport layer for the MCP server.
//!
//! Transports own connection lifecycle and framing; each call they receive
//! is handed to the dispatcher and the resulting envelope goes back to the
//! caller unchanged.
//!
//! # Feature Flags
//!
//! - `stdio` (default): MCP over stdin/stdout
//! - `tcp`: MCP over TCP, one session per connection
//! - `http`: JSON-RPC, `/invoke` and `/operations` over HTTP (axum)

mod config;
mod error;
mod service;

#[cfg(feature = "http")]
pub mod http;

#[cfg(feature = "tcp")]
pub mod tcp;

#[cfg(feature = "stdio")]
pub mod stdio;

pub use config::TransportConfig;
pub use error::{TransportError, TransportResult};
pub use service::TransportService;

#[cfg(feature = "tcp")]
pub use config::TcpConfig;

#[cfg(feature = "http")]
pub use config::HttpConfig;
