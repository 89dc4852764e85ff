//! Lazily connected, shared store handle.

use std::fmt;
use std::sync::Arc;

use once_cell::sync::OnceCell;
use tracing::{info, warn};

use super::{DocumentStore, StoreConnector, StoreError, redact_uri};

/// Single-initialization guard around a store connection.
///
/// The first caller connects while concurrent callers wait on the same
/// cell. A failed connection leaves the cell empty, so the next call tries
/// again instead of seeing a cached failure.
pub struct StoreHandle {
    uri: String,
    connector: Arc<dyn StoreConnector>,
    store: OnceCell<Arc<dyn DocumentStore>>,
}

impl StoreHandle {
    pub fn new(uri: impl Into<String>, connector: Arc<dyn StoreConnector>) -> Self {
        Self {
            uri: uri.into(),
            connector,
            store: OnceCell::new(),
        }
    }

    /// A handle around an already-connected store.
    pub fn connected(store: Arc<dyn DocumentStore>) -> Self {
        let handle = Self::new("memory://", Arc::new(super::UnsupportedConnector));
        let _ = handle.store.set(store);
        handle
    }

    /// Get the store, connecting on first use.
    pub fn get(&self) -> Result<&Arc<dyn DocumentStore>, StoreError> {
        self.store.get_or_try_init(|| {
            let uri = redact_uri(&self.uri);
            info!("Connecting to document store at {}", uri);
            self.connector.connect(&self.uri).inspect_err(|e| {
                warn!("Failed to connect to document store at {}: {}", uri, e);
            })
        })
    }

    /// Whether a connection has been established.
    pub fn is_connected(&self) -> bool {
        self.store.get().is_some()
    }
}

impl fmt::Debug for StoreHandle {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("StoreHandle")
            .field("uri", &redact_uri(&self.uri))
            .field("connected", &self.is_connected())
            .finish()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domains::store::MemoryStore;
    use std::sync::atomic::{AtomicUsize, Ordering};
    use std::thread;

    fn counting_connector(
        calls: Arc<AtomicUsize>,
        fail_first: usize,
    ) -> Arc<dyn StoreConnector> {
        Arc::new(move |_uri: &str| -> Result<Arc<dyn DocumentStore>, StoreError> {
            let n = calls.fetch_add(1, Ordering::SeqCst);
            if n < fail_first {
                Err(StoreError::connection("refused"))
            } else {
                Ok(Arc::new(MemoryStore::new()))
            }
        })
    }

    #[test]
    fn test_connects_once() {
        let calls = Arc::new(AtomicUsize::new(0));
        let handle = StoreHandle::new("mongodb://localhost", counting_connector(calls.clone(), 0));
        assert!(!handle.is_connected());
        let first = handle.get().unwrap().clone();
        let second = handle.get().unwrap().clone();
        assert!(Arc::ptr_eq(&first, &second));
        assert_eq!(calls.load(Ordering::SeqCst), 1);
    }

    #[test]
    fn test_failure_is_not_cached() {
        let calls = Arc::new(AtomicUsize::new(0));
        let handle = StoreHandle::new("mongodb://localhost", counting_connector(calls.clone(), 1));
        assert!(matches!(handle.get(), Err(StoreError::Connection(_))));
        assert!(handle.get().is_ok());
        assert_eq!(calls.load(Ordering::SeqCst), 2);
    }

    #[test]
    fn test_concurrent_first_use_connects_once() {
        let calls = Arc::new(AtomicUsize::new(0));
        let handle = Arc::new(StoreHandle::new(
            "mongodb://localhost",
            counting_connector(calls.clone(), 0),
        ));

        let workers: Vec<_> = (0..8)
            .map(|_| {
                let handle = handle.clone();
                thread::spawn(move || handle.get().is_ok())
            })
            .collect();
        for worker in workers {
            assert!(worker.join().unwrap());
        }
        assert_eq!(calls.load(Ordering::SeqCst), 1);
    }

    #[test]
    fn test_debug_redacts_uri() {
        let handle = StoreHandle::new("mongodb://u:pw@host/", counting_connector(Arc::default(), 0));
        let debug = format!("{:?}", handle);
        assert!(!debug.contains("pw"));
        assert!(debug.contains("REDACTED"));
    }
}
