//! Core module containing shared infrastructure components.
//!
//! Configuration, the crate-wide error type, the MCP server handler and the
//! transport layer that delivers invocations to the dispatcher.

pub mod config;
pub mod error;
pub mod server;
pub mod transport;

pub use config::{Config, StoreConfig};
pub use error::{Error, Result};
pub use server::McpServer;
pub use transport::{TransportConfig, TransportService};

use tracing::info;

/// Build the server from `config` and serve on its transport until shutdown.
pub async fn serve(config: Config) -> Result<()> {
    let transport = TransportService::new(config.transport.clone());
    let server = McpServer::new(config)?;

    info!(
        "Server initialized with {} operations",
        server.dispatcher().registry().len()
    );

    transport.run(server).await?;
    Ok(())
}
