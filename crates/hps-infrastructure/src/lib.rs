pub mod config_service;
pub mod http;
pub mod paths;
pub mod storage;

pub use crate::config_service::ConfigService;
pub use crate::http::HttpPresetApi;
pub use crate::storage::{AtomicTomlFile, FileKeyValueStore, StorageError};
