//! Configuration management for the MCP server.
//!
//! Values come from defaults, overridden by environment variables (a `.env`
//! file is loaded first if present).

use super::transport::TransportConfig;
use crate::domains::store::redact_uri;
use serde::{Deserialize, Serialize};
use std::fmt;
use tracing::{info, warn};

/// Main configuration structure for the MCP server.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Config {
    /// Server identification and metadata.
    pub server: ServerConfig,

    /// Logging configuration.
    pub logging: LoggingConfig,

    /// Transport configuration.
    pub transport: TransportConfig,

    /// Document store used by the data tools.
    pub store: StoreConfig,
}

/// Server identification configuration.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ServerConfig {
    /// The name of the server as reported to clients.
    pub name: String,

    /// The version of the server.
    pub version: String,
}

/// Logging configuration.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct LoggingConfig {
    /// Log level filter (e.g., "info", "debug", "trace").
    pub level: String,

    /// Whether to include timestamps in log output.
    pub with_timestamps: bool,
}

/// Document store location.
#[derive(Clone, Serialize, Deserialize)]
pub struct StoreConfig {
    /// Connection URI; may embed credentials.
    pub uri: String,

    /// Database holding the user collection.
    pub database: String,

    /// Collection read by `get_userData`.
    pub users_collection: String,
}

/// Redacts credentials embedded in the URI.
impl fmt::Debug for StoreConfig {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("StoreConfig")
            .field("uri", &redact_uri(&self.uri))
            .field("database", &self.database)
            .field("users_collection", &self.users_collection)
            .finish()
    }
}

impl Default for StoreConfig {
    fn default() -> Self {
        Self {
            uri: "mongodb://localhost:27017/".to_string(),
            database: "fitbit".to_string(),
            users_collection: "users".to_string(),
        }
    }
}

impl Default for Config {
    fn default() -> Self {
        Self {
            server: ServerConfig {
                name: "genie-mcp-server".to_string(),
                version: env!("CARGO_PKG_VERSION").to_string(),
            },
            logging: LoggingConfig {
                level: "info".to_string(),
                with_timestamps: true,
            },
            transport: TransportConfig::default(),
            store: StoreConfig::default(),
        }
    }
}

impl Config {
    /// Load configuration from environment variables.
    ///
    /// Server settings use the `MCP_` prefix (`MCP_SERVER_NAME`,
    /// `MCP_LOG_LEVEL`, transport variables); the store uses `MONGO_URI`,
    /// `MONGO_DEFAULT_DB` and `MONGO_USERS_COLLECTION`.
    pub fn from_env() -> Self {
        dotenvy::dotenv().ok();

        let mut config = Self::default();

        if let Ok(name) = std::env::var("MCP_SERVER_NAME") {
            config.server.name = name;
        }

        if let Ok(level) = std::env::var("MCP_LOG_LEVEL") {
            config.logging.level = level;
        }

        // Load transport configuration from environment
        config.transport = TransportConfig::from_env();

        if let Ok(uri) = std::env::var("MONGO_URI") {
            config.store.uri = uri;
            info!("Document store URI loaded from environment");
        } else {
            warn!(
                "MONGO_URI not set - using {}",
                redact_uri(&config.store.uri)
            );
        }

        if let Ok(database) = std::env::var("MONGO_DEFAULT_DB") {
            config.store.database = database;
        }

        if let Ok(collection) = std::env::var("MONGO_USERS_COLLECTION") {
            config.store.users_collection = collection;
        }

        config
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::sync::Mutex;

    // Mutex to ensure env var tests run serially
    static ENV_TEST_LOCK: Mutex<()> = Mutex::new(());

    #[test]
    fn test_store_from_env() {
        let _lock = ENV_TEST_LOCK.lock().unwrap();
        unsafe {
            std::env::set_var("MONGO_URI", "mongodb://db.internal:27017/");
            std::env::set_var("MONGO_DEFAULT_DB", "analytics");
        }
        let config = Config::from_env();
        assert_eq!(config.store.uri, "mongodb://db.internal:27017/");
        assert_eq!(config.store.database, "analytics");
        assert_eq!(config.store.users_collection, "users");
        unsafe {
            std::env::remove_var("MONGO_URI");
            std::env::remove_var("MONGO_DEFAULT_DB");
        }
    }

    #[test]
    fn test_store_default_fallback() {
        let _lock = ENV_TEST_LOCK.lock().unwrap();
        unsafe {
            std::env::remove_var("MONGO_URI");
            std::env::remove_var("MONGO_DEFAULT_DB");
            std::env::remove_var("MONGO_USERS_COLLECTION");
        }
        let config = Config::from_env();
        assert_eq!(config.store.uri, "mongodb://localhost:27017/");
        assert_eq!(config.store.database, "fitbit");
    }

    #[test]
    fn test_store_uri_redacted_in_debug() {
        let store = StoreConfig {
            uri: "mongodb://admin:super_secret@db:27017/".to_string(),
            ..StoreConfig::default()
        };
        let debug_str = format!("{:?}", store);
        assert!(debug_str.contains("REDACTED"));
        assert!(!debug_str.contains("super_secret"));
    }

    #[test]
    fn test_server_name_from_env() {
        let _lock = ENV_TEST_LOCK.lock().unwrap();
        unsafe {
            std::env::set_var("MCP_SERVER_NAME", "genie-test");
        }
        let config = Config::from_env();
        assert_eq!(config.server.name, "genie-test");
        unsafe {
            std::env::remove_var("MCP_SERVER_NAME");
        }
    }
}
