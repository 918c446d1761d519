//! Domain layer for the Helix Preset Search client.
//!
//! Holds the data model returned by the preset API, the pure catalog
//! ordering rules, the session lifecycle and the seams (`PresetApi`,
//! `KeyValueStore`) that the infrastructure crate implements.

pub mod api;
pub mod catalog;
pub mod config;
pub mod error;
pub mod preset;
pub mod session;
pub mod storage;

// Re-export common error type
pub use error::{HpsError, Result};
