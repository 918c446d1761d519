//! Fixed user-facing messages.
//!
//! Render failures with [`hps_core::HpsError::user_message`], which swaps in
//! the re-authentication prompt when the backend rejected the session.

pub const SEARCH_FAILED: &str = "Search failed. Please try again.";
pub const CATALOG_FAILED: &str = "Failed to load model data. Please refresh the page.";
pub const STATS_FAILED: &str = "Failed to load statistics";
pub const DOWNLOAD_FAILED: &str = "Download failed. Please try again.";
pub const BULK_DOWNLOAD_FAILED: &str = "Bulk download failed. Please try again.";
pub const LOGIN_FAILED: &str = "Login failed";
pub const UPLOAD_FAILED: &str = "Upload failed";
pub const LOGIN_REQUIRED: &str = "Please log in to download presets.";
