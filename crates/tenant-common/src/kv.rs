//! Session-scoped key/value storage capability
//!
//! Models the browser's per-session storage: synchronous string get/set
//! over opaque keys. The engine uses it both as the cache backing store
//! and as the persisted active-identity record.

use parking_lot::RwLock;
use std::collections::HashMap;
use thiserror::Error;

/// Storage errors
#[derive(Debug, Clone, Error)]
pub enum StorageError {
    /// Backing storage rejected the operation or is unavailable
    #[error("storage unavailable: {0}")]
    Unavailable(String),
}

/// Session-scoped string key/value storage
pub trait SessionStore: Send + Sync {
    /// Read a value, `None` when the key is absent
    fn get_item(&self, key: &str) -> Result<Option<String>, StorageError>;

    /// Write a value, overwriting any existing one
    fn set_item(&self, key: &str, value: &str) -> Result<(), StorageError>;

    /// Delete a key; deleting an absent key is not an error
    fn remove_item(&self, key: &str) -> Result<(), StorageError>;

    /// All keys currently present
    fn keys(&self) -> Result<Vec<String>, StorageError>;
}

/// In-memory session store for tests and headless hosts
#[derive(Default)]
pub struct MemorySessionStore {
    items: RwLock<HashMap<String, String>>,
}

impl MemorySessionStore {
    /// Create an empty store
    pub fn new() -> Self {
        Self::default()
    }
}

impl SessionStore for MemorySessionStore {
    fn get_item(&self, key: &str) -> Result<Option<String>, StorageError> {
        Ok(self.items.read().get(key).cloned())
    }

    fn set_item(&self, key: &str, value: &str) -> Result<(), StorageError> {
        self.items.write().insert(key.to_string(), value.to_string());
        Ok(())
    }

    fn remove_item(&self, key: &str) -> Result<(), StorageError> {
        self.items.write().remove(key);
        Ok(())
    }

    fn keys(&self) -> Result<Vec<String>, StorageError> {
        Ok(self.items.read().keys().cloned().collect())
    }
}
