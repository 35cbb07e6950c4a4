use async_trait::async_trait;
use std::collections::HashMap;
use std::sync::{Arc, Mutex};
use thiserror::Error;

/// Errors surfaced by storage adapters.
#[derive(Debug, Error)]
#[non_exhaustive]
pub enum StorageError {
    #[error("not found")]
    NotFound,

    #[error("conflict")]
    Conflict,

    #[error("connection error: {0}")]
    Connection(String),

    #[error("serialization error: {0}")]
    Serialization(String),
}

/// Minimal string key-value contract used for whole-snapshot persistence.
#[async_trait]
pub trait KeyValueStore: Send + Sync {
    /// Read the value stored under `key`.
    ///
    /// # Errors
    ///
    /// Returns `StorageError` if the backend cannot be read. A missing key is `Ok(None)`.
    async fn get(&self, key: &str) -> Result<Option<String>, StorageError>;

    /// Overwrite the value stored under `key`.
    ///
    /// # Errors
    ///
    /// Returns `StorageError` if the value cannot be stored.
    async fn put(&self, key: &str, value: &str) -> Result<(), StorageError>;
}

/// Simple in-memory store for testing and prototyping.
#[derive(Clone, Default)]
pub struct InMemoryKeyValueStore {
    entries: Arc<Mutex<HashMap<String, String>>>,
}

impl InMemoryKeyValueStore {
    #[must_use]
    pub fn new() -> Self {
        Self {
            entries: Arc::new(Mutex::new(HashMap::new())),
        }
    }
}

#[async_trait]
impl KeyValueStore for InMemoryKeyValueStore {
    async fn get(&self, key: &str) -> Result<Option<String>, StorageError> {
        let guard = self
            .entries
            .lock()
            .map_err(|e| StorageError::Connection(e.to_string()))?;
        Ok(guard.get(key).cloned())
    }

    async fn put(&self, key: &str, value: &str) -> Result<(), StorageError> {
        let mut guard = self
            .entries
            .lock()
            .map_err(|e| StorageError::Connection(e.to_string()))?;
        guard.insert(key.to_owned(), value.to_owned());
        Ok(())
    }
}

/// Aggregates repositories behind trait objects for easy backend swapping.
#[derive(Clone)]
pub struct Storage {
    pub kv: Arc<dyn KeyValueStore>,
}

impl Storage {
    #[must_use]
    pub fn in_memory() -> Self {
        let kv: Arc<dyn KeyValueStore> = Arc::new(InMemoryKeyValueStore::new());
        Self { kv }
    }
}
