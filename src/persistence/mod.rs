//! Save/load persistence behind an injected key/value store
//!
//! Features:
//! - `KeyValueStore` trait so callers pick the backend (LocalStorage on web,
//!   memory for native and tests)
//! - JSON encoding for every stored value
//! - Corrupt or missing entries fall back to defaults instead of failing
//!
//! The game loop never touches this module; only progress and settings do.

use std::collections::HashMap;

use serde::Serialize;
use serde::de::DeserializeOwned;
use thiserror::Error;

/// Persistence failures
#[derive(Debug, Error)]
pub enum PersistError {
    #[error("storage backend failed: {0}")]
    Storage(String),
    #[error("invalid stored JSON: {0}")]
    Json(#[from] serde_json::Error),
}

/// String key/value storage
pub trait KeyValueStore {
    fn read(&self, key: &str) -> Result<Option<String>, PersistError>;
    fn write(&mut self, key: &str, value: &str) -> Result<(), PersistError>;
    fn remove(&mut self, key: &str) -> Result<(), PersistError>;
}

/// In-memory store (native builds and tests)
#[derive(Debug, Clone, Default)]
pub struct MemoryStore {
    entries: HashMap<String, String>,
}

impl MemoryStore {
    pub fn new() -> Self {
        Self::default()
    }
}

impl KeyValueStore for MemoryStore {
    fn read(&self, key: &str) -> Result<Option<String>, PersistError> {
        Ok(self.entries.get(key).cloned())
    }

    fn write(&mut self, key: &str, value: &str) -> Result<(), PersistError> {
        self.entries.insert(key.to_string(), value.to_string());
        Ok(())
    }

    fn remove(&mut self, key: &str) -> Result<(), PersistError> {
        self.entries.remove(key);
        Ok(())
    }
}

/// Read and decode a value, `None` if absent
pub fn load<T: DeserializeOwned>(store: &dyn KeyValueStore, key: &str) -> Result<Option<T>, PersistError> {
    match store.read(key)? {
        Some(json) => Ok(Some(serde_json::from_str(&json)?)),
        None => Ok(None),
    }
}

/// Read and decode a value, falling back to `T::default()` on any problem
pub fn load_or_default<T: DeserializeOwned + Default>(store: &dyn KeyValueStore, key: &str) -> T {
    match load(store, key) {
        Ok(Some(value)) => {
            log::info!("Loaded {key}");
            value
        }
        Ok(None) => {
            log::info!("No saved {key}, using defaults");
            T::default()
        }
        Err(e) => {
            log::warn!("Could not load {key} ({e}), using defaults");
            T::default()
        }
    }
}

/// Encode and write a value
pub fn save<T: Serialize>(store: &mut dyn KeyValueStore, key: &str, value: &T) -> Result<(), PersistError> {
    let json = serde_json::to_string(value)?;
    store.write(key, &json)?;
    log::debug!("Saved {key}");
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_round_trip() {
        let mut store = MemoryStore::new();
        save(&mut store, "numbers", &vec![1, 2, 3]).unwrap();
        let loaded: Option<Vec<i32>> = load(&store, "numbers").unwrap();
        assert_eq!(loaded, Some(vec![1, 2, 3]));
    }

    #[test]
    fn test_missing_key_is_none() {
        let store = MemoryStore::new();
        let loaded: Option<u32> = load(&store, "absent").unwrap();
        assert_eq!(loaded, None);
    }

    #[test]
    fn test_corrupt_entry_is_error_and_defaults() {
        let mut store = MemoryStore::new();
        store.write("broken", "{not json").unwrap();
        assert!(matches!(load::<Vec<u32>>(&store, "broken"), Err(PersistError::Json(_))));
        let fallback: Vec<u32> = load_or_default(&store, "broken");
        assert!(fallback.is_empty());
    }

    #[test]
    fn test_remove() {
        let mut store = MemoryStore::new();
        save(&mut store, "k", &1u8).unwrap();
        store.remove("k").unwrap();
        assert_eq!(store.read("k").unwrap(), None);
    }
}
