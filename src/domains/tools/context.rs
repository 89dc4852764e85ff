//! Collaborators handed to every tool invocation.

use std::sync::Arc;

use crate::core::config::StoreConfig;
use crate::domains::store::{MemoryStore, StoreHandle, default_connector};

/// Read-only collaborators available to handlers.
///
/// Only the data tools touch the store; everything else ignores the context.
#[derive(Debug, Clone)]
pub struct ToolContext {
    pub store: Arc<StoreHandle>,
    pub database: String,
    pub users_collection: String,
}

impl ToolContext {
    /// Build the context from store configuration, using this build's connector.
    pub fn from_config(config: &StoreConfig) -> Self {
        Self {
            store: Arc::new(StoreHandle::new(config.uri.clone(), default_connector())),
            database: config.database.clone(),
            users_collection: config.users_collection.clone(),
        }
    }

    /// Context around an explicit store handle.
    pub fn with_store(store: Arc<StoreHandle>, config: &StoreConfig) -> Self {
        Self {
            store,
            database: config.database.clone(),
            users_collection: config.users_collection.clone(),
        }
    }

    /// Context backed by an empty in-memory store.
    pub fn in_memory() -> Self {
        Self::with_store(
            Arc::new(StoreHandle::connected(Arc::new(MemoryStore::new()))),
            &StoreConfig::default(),
        )
    }
}
