//! Preset domain: server-owned presets, search requests and upload/download
//! naming rules.

mod model;
mod search;
pub mod files;

pub use model::{ModelDetail, ModelStats, Preset, UploadResponse};
pub use search::{
    DEFAULT_PAGE_SIZE, ModelFilter, ModelSelection, SearchParams, SearchResponse,
};
