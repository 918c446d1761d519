//! Configuration service implementation.
//!
//! Loads `config.toml` from the hps config directory, layers environment
//! overrides on top and caches the result.

use crate::paths::HpsPaths;
use crate::storage::AtomicTomlFile;
use hps_core::Result;
use hps_core::config::ClientConfig;
use std::path::{Path, PathBuf};
use std::sync::{Arc, RwLock};
use tracing::{debug, warn};

/// Overrides `api_base_url`.
pub const ENV_API_URL: &str = "HPS_API_URL";
/// Overrides `download_dir`.
pub const ENV_DOWNLOAD_DIR: &str = "HPS_DOWNLOAD_DIR";

/// Configuration service that loads and caches the client configuration.
#[derive(Clone)]
pub struct ConfigService {
    file: Arc<AtomicTomlFile<ClientConfig>>,
    /// Cached configuration, environment overrides already applied.
    config: Arc<RwLock<Option<ClientConfig>>>,
}

impl ConfigService {
    /// Creates a service for the config file under the given paths.
    pub fn new(paths: &HpsPaths) -> Result<Self> {
        Ok(Self::with_path(paths.config_file()?))
    }

    /// Creates a service for an explicit config file.
    pub fn with_path(path: PathBuf) -> Self {
        Self {
            file: Arc::new(AtomicTomlFile::new(path)),
            config: Arc::new(RwLock::new(None)),
        }
    }

    pub fn path(&self) -> &Path {
        self.file.path()
    }

    /// Gets the configuration, loading from file if not cached.
    ///
    /// A missing file yields defaults. An unreadable file is reported and
    /// also yields defaults so the client stays usable.
    pub fn get_config(&self) -> ClientConfig {
        {
            let read_lock = self.config.read().unwrap_or_else(|e| e.into_inner());
            if let Some(ref cached) = *read_lock {
                return cached.clone();
            }
        }

        let loaded = match self.file.load() {
            Ok(config) => config.unwrap_or_default(),
            Err(e) => {
                warn!(
                    "[Config] Ignoring unreadable {}: {}",
                    self.file.path().display(),
                    e
                );
                ClientConfig::default()
            }
        };
        let loaded = apply_env_overrides(loaded, |key| std::env::var(key).ok());
        debug!("[Config] Using API base URL {}", loaded.api_base_url);

        {
            let mut write_lock = self.config.write().unwrap_or_else(|e| e.into_inner());
            *write_lock = Some(loaded.clone());
        }

        loaded
    }

    /// Invalidates the cache, forcing a reload on next access.
    pub fn invalidate_cache(&self) {
        let mut write_lock = self.config.write().unwrap_or_else(|e| e.into_inner());
        *write_lock = None;
    }

    /// The file contents alone, without environment overrides.
    pub fn load_file(&self) -> Result<ClientConfig> {
        Ok(self.file.load()?.unwrap_or_default())
    }

    /// Writes the configuration to disk.
    pub fn save(&self, config: &ClientConfig) -> Result<()> {
        self.file.save(config)?;
        self.invalidate_cache();
        Ok(())
    }

    /// Writes a default config file if none exists yet.
    ///
    /// Returns `true` when a file was created.
    pub fn ensure_config_file(&self) -> Result<bool> {
        if self.file.load()?.is_some() {
            return Ok(false);
        }
        self.file.save(&ClientConfig::default())?;
        self.invalidate_cache();
        Ok(true)
    }
}

/// Applies `HPS_API_URL` and `HPS_DOWNLOAD_DIR`. Empty values are ignored.
pub fn apply_env_overrides<F>(mut config: ClientConfig, lookup: F) -> ClientConfig
where
    F: Fn(&str) -> Option<String>,
{
    if let Some(url) = lookup(ENV_API_URL).filter(|v| !v.trim().is_empty()) {
        config.api_base_url = url.trim().to_string();
    }
    if let Some(dir) = lookup(ENV_DOWNLOAD_DIR).filter(|v| !v.trim().is_empty()) {
        config.download_dir = Some(PathBuf::from(dir));
    }
    config
}
