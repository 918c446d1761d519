//! File-backed key-value store for persisted client state.

use std::collections::BTreeMap;
use std::fs;
use std::path::{Path, PathBuf};

use hps_core::Result;
use hps_core::storage::KeyValueStore;
use tracing::warn;

use super::StorageError;
use super::fs::{FileLock, write_atomically};

type Entries = BTreeMap<String, String>;

/// String entries kept in one JSON object on disk.
///
/// Every write is a locked read-modify-write followed by an atomic replace,
/// so a batch of entries lands together or not at all. The file is private
/// (mode 600) because it holds the session token.
pub struct FileKeyValueStore {
    path: PathBuf,
}

impl FileKeyValueStore {
    pub fn new(path: PathBuf) -> Self {
        Self { path }
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    fn read_entries(&self) -> std::result::Result<Entries, StorageError> {
        if !self.path.exists() {
            return Ok(Entries::new());
        }

        let content = fs::read_to_string(&self.path)?;
        if content.trim().is_empty() {
            return Ok(Entries::new());
        }

        Ok(serde_json::from_str(&content)?)
    }

    fn modify<F>(&self, f: F) -> std::result::Result<(), StorageError>
    where
        F: FnOnce(&mut Entries),
    {
        let _lock = FileLock::acquire(&self.path)?;

        let mut entries = match self.read_entries() {
            Ok(entries) => entries,
            Err(StorageError::JsonError(e)) => {
                warn!(
                    "[Storage] Replacing unreadable store {}: {}",
                    self.path.display(),
                    e
                );
                Entries::new()
            }
            Err(e) => return Err(e),
        };

        f(&mut entries);

        let json = serde_json::to_string_pretty(&entries)?;
        write_atomically(&self.path, json.as_bytes(), true)
    }
}

impl KeyValueStore for FileKeyValueStore {
    fn get(&self, key: &str) -> Result<Option<String>> {
        Ok(self.read_entries()?.get(key).cloned())
    }

    fn set_many(&self, new_entries: &[(&str, String)]) -> Result<()> {
        self.modify(|entries| {
            for (key, value) in new_entries {
                entries.insert((*key).to_string(), value.clone());
            }
        })?;
        Ok(())
    }

    fn remove_many(&self, keys: &[&str]) -> Result<()> {
        if !self.path.exists() {
            return Ok(());
        }
        self.modify(|entries| {
            for key in keys {
                entries.remove(*key);
            }
        })?;
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use hps_core::HpsError;
    use tempfile::TempDir;

    #[test]
    fn test_missing_file_reads_empty() {
        let temp_dir = TempDir::new().unwrap();
        let store = FileKeyValueStore::new(temp_dir.path().join("session.json"));
        assert_eq!(store.get("auth_token").unwrap(), None);
    }

    #[test]
    fn test_set_many_persists_across_instances() {
        let temp_dir = TempDir::new().unwrap();
        let path = temp_dir.path().join("session.json");

        FileKeyValueStore::new(path.clone())
            .set_many(&[
                ("auth_token", "tok".to_string()),
                ("auth_user", r#"{"name":"Ada"}"#.to_string()),
            ])
            .unwrap();

        let reopened = FileKeyValueStore::new(path);
        assert_eq!(reopened.get("auth_token").unwrap().as_deref(), Some("tok"));
        assert_eq!(
            reopened.get("auth_user").unwrap().as_deref(),
            Some(r#"{"name":"Ada"}"#)
        );
    }

    #[test]
    fn test_remove_many_keeps_other_entries() {
        let temp_dir = TempDir::new().unwrap();
        let store = FileKeyValueStore::new(temp_dir.path().join("session.json"));
        store
            .set_many(&[
                ("auth_token", "tok".to_string()),
                ("auth_user", "{}".to_string()),
                ("last_query", "plexi".to_string()),
            ])
            .unwrap();

        store.remove_many(&["auth_token", "auth_user"]).unwrap();

        assert_eq!(store.get("auth_token").unwrap(), None);
        assert_eq!(store.get("auth_user").unwrap(), None);
        assert_eq!(store.get("last_query").unwrap().as_deref(), Some("plexi"));
    }

    #[test]
    fn test_remove_on_missing_file_is_noop() {
        let temp_dir = TempDir::new().unwrap();
        let path = temp_dir.path().join("session.json");
        let store = FileKeyValueStore::new(path.clone());

        store.remove("auth_token").unwrap();
        assert!(!path.exists());
    }

    #[test]
    fn test_corrupted_file_fails_reads_but_is_replaced_on_write() {
        let temp_dir = TempDir::new().unwrap();
        let path = temp_dir.path().join("session.json");
        fs::write(&path, "{ not json").unwrap();
        let store = FileKeyValueStore::new(path);

        let err = store.get("auth_token").unwrap_err();
        assert!(matches!(err, HpsError::Serialization { .. }));

        store.remove_many(&["auth_token", "auth_user"]).unwrap();
        assert_eq!(store.get("auth_token").unwrap(), None);

        store.set("auth_token", "fresh".to_string()).unwrap();
        assert_eq!(store.get("auth_token").unwrap().as_deref(), Some("fresh"));
    }
}
