//! Storage layer for atomic file operations.

mod atomic_toml;
mod fs;
mod kv_file;

pub use atomic_toml::AtomicTomlFile;
pub use kv_file::FileKeyValueStore;

use hps_core::HpsError;

/// Errors that can occur during storage operations.
#[derive(Debug)]
pub enum StorageError {
    /// File I/O error.
    IoError(std::io::Error),
    /// TOML deserialization error.
    TomlError(toml::de::Error),
    /// TOML serialization error.
    TomlSerError(toml::ser::Error),
    /// JSON (de)serialization error.
    JsonError(serde_json::Error),
    /// File locking error.
    LockError(String),
}

impl std::fmt::Display for StorageError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            StorageError::IoError(e) => write!(f, "I/O error: {}", e),
            StorageError::TomlError(e) => write!(f, "TOML parse error: {}", e),
            StorageError::TomlSerError(e) => write!(f, "TOML serialization error: {}", e),
            StorageError::JsonError(e) => write!(f, "JSON error: {}", e),
            StorageError::LockError(e) => write!(f, "Lock error: {}", e),
        }
    }
}

impl std::error::Error for StorageError {}

impl From<std::io::Error> for StorageError {
    fn from(e: std::io::Error) -> Self {
        StorageError::IoError(e)
    }
}

impl From<toml::de::Error> for StorageError {
    fn from(e: toml::de::Error) -> Self {
        StorageError::TomlError(e)
    }
}

impl From<toml::ser::Error> for StorageError {
    fn from(e: toml::ser::Error) -> Self {
        StorageError::TomlSerError(e)
    }
}

impl From<serde_json::Error> for StorageError {
    fn from(e: serde_json::Error) -> Self {
        StorageError::JsonError(e)
    }
}

impl From<StorageError> for HpsError {
    fn from(e: StorageError) -> Self {
        match e {
            StorageError::IoError(e) => HpsError::from(e),
            StorageError::TomlError(e) => HpsError::from(e),
            StorageError::TomlSerError(e) => HpsError::from(e),
            StorageError::JsonError(e) => HpsError::from(e),
            StorageError::LockError(message) => HpsError::storage(message),
        }
    }
}
