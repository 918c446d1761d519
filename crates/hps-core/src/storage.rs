//! Durable client-side key-value storage.
//!
//! The session is kept as plain string entries, the way a browser keeps it
//! in local storage. Batch operations are applied all-or-nothing.

use std::collections::HashMap;
use std::sync::Mutex;

use crate::error::{HpsError, Result};

/// String key-value store that survives process restarts.
pub trait KeyValueStore: Send + Sync {
    /// Reads one entry.
    fn get(&self, key: &str) -> Result<Option<String>>;

    /// Writes several entries in one atomic step.
    fn set_many(&self, entries: &[(&str, String)]) -> Result<()>;

    /// Removes several entries in one atomic step. Missing keys are ignored.
    fn remove_many(&self, keys: &[&str]) -> Result<()>;

    /// Writes one entry.
    fn set(&self, key: &str, value: String) -> Result<()> {
        self.set_many(&[(key, value)])
    }

    /// Removes one entry.
    fn remove(&self, key: &str) -> Result<()> {
        self.remove_many(&[key])
    }
}

/// In-memory store, for tests and for running without a config directory.
#[derive(Debug, Default)]
pub struct MemoryKeyValueStore {
    entries: Mutex<HashMap<String, String>>,
}

impl MemoryKeyValueStore {
    pub fn new() -> Self {
        Self::default()
    }

    /// Number of stored entries.
    pub fn len(&self) -> usize {
        self.entries.lock().map(|e| e.len()).unwrap_or(0)
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }
}

impl KeyValueStore for MemoryKeyValueStore {
    fn get(&self, key: &str) -> Result<Option<String>> {
        let entries = self
            .entries
            .lock()
            .map_err(|e| HpsError::storage(format!("Failed to lock store: {}", e)))?;
        Ok(entries.get(key).cloned())
    }

    fn set_many(&self, new_entries: &[(&str, String)]) -> Result<()> {
        let mut entries = self
            .entries
            .lock()
            .map_err(|e| HpsError::storage(format!("Failed to lock store: {}", e)))?;
        for (key, value) in new_entries {
            entries.insert((*key).to_string(), value.clone());
        }
        Ok(())
    }

    fn remove_many(&self, keys: &[&str]) -> Result<()> {
        let mut entries = self
            .entries
            .lock()
            .map_err(|e| HpsError::storage(format!("Failed to lock store: {}", e)))?;
        for key in keys {
            entries.remove(*key);
        }
        Ok(())
    }
}
