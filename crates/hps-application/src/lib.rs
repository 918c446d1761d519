//! Use cases of the preset client.
//!
//! Each service wraps the `PresetApi` seam with the behavior the user
//! interface relies on: memoized catalog loading, login outcomes, download
//! file naming and sequential uploads.

pub mod auth;
pub mod catalog;
pub mod download;
pub mod messages;
pub mod search;
pub mod stats;
pub mod upload;

#[cfg(test)]
pub(crate) mod testing;

pub use auth::{AuthService, LoginOutcome};
pub use catalog::ModelCatalog;
pub use download::DownloadService;
pub use search::{SearchQuery, SearchService};
pub use stats::StatsService;
pub use upload::{UploadOutcome, UploadResult, UploadService};
