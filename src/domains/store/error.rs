//! Document-store error types.

use thiserror::Error;

/// Errors raised by the document-store collaborator.
#[derive(Debug, Clone, PartialEq, Error)]
pub enum StoreError {
    /// The store could not be connected to.
    #[error("connection error: {0}")]
    Connection(String),

    /// The store was connected but stopped answering.
    #[error("document store unavailable: {0}")]
    Unavailable(String),

    /// The query itself was rejected.
    #[error("query failed: {0}")]
    Query(String),
}

impl StoreError {
    pub fn connection(msg: impl Into<String>) -> Self {
        Self::Connection(msg.into())
    }

    pub fn unavailable(msg: impl Into<String>) -> Self {
        Self::Unavailable(msg.into())
    }

    pub fn query(msg: impl Into<String>) -> Self {
        Self::Query(msg.into())
    }
}
