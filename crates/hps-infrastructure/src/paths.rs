//! Unified path management for hps configuration files.
//!
//! # Directory Structure
//!
//! ```text
//! ~/.config/hps/               # Config directory (platform config dir)
//! ├── config.toml              # Client configuration
//! ├── session.json             # Persisted session entries (auth_token, auth_user)
//! └── logs/                    # Application logs
//!     └── hps.YYYY-MM-DD.log
//! ```

use std::path::PathBuf;

const APP_DIR_NAME: &str = "hps";

/// Errors that can occur during path resolution.
#[derive(Debug)]
pub enum PathError {
    /// Config directory could not be determined.
    ConfigDirNotFound,
}

impl std::fmt::Display for PathError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            PathError::ConfigDirNotFound => write!(f, "Cannot find config directory"),
        }
    }
}

impl std::error::Error for PathError {}

impl From<PathError> for hps_core::HpsError {
    fn from(e: PathError) -> Self {
        hps_core::HpsError::config(e.to_string())
    }
}

/// Path resolution for hps.
///
/// Everything lives under one root. The root is the platform config
/// directory unless a custom one is given (tests, `--config-dir`).
#[derive(Debug, Clone)]
pub struct HpsPaths {
    root: Option<PathBuf>,
}

impl HpsPaths {
    /// Creates a resolver; `None` uses the platform config directory.
    pub fn new(root: Option<PathBuf>) -> Self {
        Self { root }
    }

    /// Returns the hps configuration directory (e.g. `~/.config/hps/`).
    pub fn config_dir(&self) -> Result<PathBuf, PathError> {
        match &self.root {
            Some(root) => Ok(root.clone()),
            None => dirs::config_dir()
                .map(|dir| dir.join(APP_DIR_NAME))
                .ok_or(PathError::ConfigDirNotFound),
        }
    }

    /// Returns the path to config.toml.
    pub fn config_file(&self) -> Result<PathBuf, PathError> {
        Ok(self.config_dir()?.join("config.toml"))
    }

    /// Returns the path to the session store.
    ///
    /// # Security Note
    ///
    /// This file holds the bearer token; it is written with mode 600 on Unix.
    pub fn session_file(&self) -> Result<PathBuf, PathError> {
        Ok(self.config_dir()?.join("session.json"))
    }

    /// Returns the path to the logs directory.
    pub fn logs_dir(&self) -> Result<PathBuf, PathError> {
        Ok(self.config_dir()?.join("logs"))
    }
}

impl Default for HpsPaths {
    fn default() -> Self {
        Self::new(None)
    }
}
