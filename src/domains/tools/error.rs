//! Tool-specific error types.

use thiserror::Error;

use crate::domains::store::StoreError;

/// Result type returned by tool handlers.
pub type ToolResult = Result<super::ToolValue, ToolFailure>;

/// Failures a tool handler may declare.
#[derive(Debug, Clone, PartialEq, Error)]
pub enum ToolFailure {
    /// A domain check failed (division by zero, unparsable date, ...).
    #[error("{0}")]
    Execution(String),

    /// An external collaborator could not be reached.
    #[error("{0}")]
    Unavailable(String),

    /// The handler hit a condition that indicates a bug.
    #[error("{0}")]
    Internal(String),
}

impl ToolFailure {
    /// Create a new "execution failed" error.
    pub fn execution(msg: impl Into<String>) -> Self {
        Self::Execution(msg.into())
    }

    /// Create a new "collaborator unavailable" error.
    pub fn unavailable(msg: impl Into<String>) -> Self {
        Self::Unavailable(msg.into())
    }

    /// Create a new "internal" error.
    pub fn internal(msg: impl Into<String>) -> Self {
        Self::Internal(msg.into())
    }
}

impl From<StoreError> for ToolFailure {
    fn from(err: StoreError) -> Self {
        match err {
            StoreError::Connection(_) | StoreError::Unavailable(_) => Self::unavailable(err.to_string()),
            StoreError::Query(_) => Self::execution(err.to_string()),
        }
    }
}
