//! Crate-wide error type.
//!
//! Per-invocation failures never reach this type: the dispatcher turns them
//! into envelopes. `Error` covers startup and serving: building the
//! registry and running the transport.

use thiserror::Error;

use super::transport::TransportError;
use crate::domains::tools::RegistryError;

/// A specialized Result type for server operations.
pub type Result<T> = std::result::Result<T, Error>;

/// Unified error type for the server.
#[derive(Debug, Error)]
pub enum Error {
    /// The tool registry could not be built.
    #[error("Registry error: {0}")]
    Registry(#[from] RegistryError),

    /// The transport failed to start or stopped abnormally.
    #[error("Transport error: {0}")]
    Transport(#[from] TransportError),
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domains::tools::SchemaError;
    use std::io;

    #[test]
    fn test_registry_error_converts() {
        let err: Error = RegistryError::DuplicateOperation("slugify".into()).into();
        assert_eq!(err.to_string(), "Registry error: operation already registered: slugify");
    }

    #[test]
    fn test_schema_error_reaches_registry_variant() {
        let schema_err = SchemaError::EmptyEnum {
            schema: "pick".into(),
            parameter: "mode".into(),
        };
        let err: Error = RegistryError::from(schema_err).into();
        assert!(matches!(err, Error::Registry(RegistryError::Schema(_))));
    }

    #[test]
    fn test_transport_error_converts() {
        let bind = TransportError::bind(
            "127.0.0.1:1",
            io::Error::new(io::ErrorKind::PermissionDenied, "denied"),
        );
        let err: Error = bind.into();
        assert_eq!(
            err.to_string(),
            "Transport error: Failed to bind to 127.0.0.1:1: denied"
        );
    }
}
