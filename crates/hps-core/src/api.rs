//! Preset API trait definition.
//!
//! One method per backend endpoint. The HTTP implementation lives in the
//! infrastructure crate; services only see this trait.

use async_trait::async_trait;
use serde_json::Value;

use crate::catalog::Model;
use crate::error::Result;
use crate::preset::{ModelStats, Preset, SearchParams, SearchResponse, UploadResponse};
use crate::session::AuthResponse;

/// A preset file ready to be sent as the multipart `file` field.
#[derive(Debug, Clone, PartialEq)]
pub struct UploadFile {
    pub file_name: String,
    pub bytes: Vec<u8>,
}

/// The remote preset service.
///
/// Authenticated calls use whatever session is current when the request is
/// built. Implementations clear the session when the backend answers 401.
#[async_trait]
pub trait PresetApi: Send + Sync {
    // Models

    /// `GET /models/`
    async fn list_models(&self) -> Result<Vec<Model>>;

    /// `GET /models/{id}`
    async fn get_model(&self, id: i64) -> Result<Value>;

    /// `GET /models/{id}/parameters`
    async fn get_model_parameters(&self, id: i64) -> Result<Value>;

    /// `GET /models/{id}/devices`
    async fn get_model_devices(&self, id: i64) -> Result<Value>;

    /// `GET /models/type/{type}`
    async fn get_models_by_type(&self, model_type: &str) -> Result<Vec<Model>>;

    /// `GET /models/categories/list`
    async fn get_model_categories(&self) -> Result<Value>;

    /// `GET /models/types/list`
    async fn get_model_types(&self) -> Result<Value>;

    /// `GET /models/stats`
    async fn get_model_stats(&self) -> Result<ModelStats>;

    // Presets

    /// `POST /presets/search`
    async fn search_presets(&self, params: &SearchParams) -> Result<SearchResponse>;

    /// `GET /presets/search/filters`
    async fn get_search_filters(&self) -> Result<Value>;

    /// `GET /presets/{id}`
    async fn get_preset(&self, id: i64) -> Result<Preset>;

    /// `POST /presets/upload`
    async fn upload_preset(&self, file: UploadFile) -> Result<UploadResponse>;

    // Downloads

    /// `GET /presets/download/{id}`
    async fn download_preset(&self, id: i64) -> Result<Vec<u8>>;

    /// `POST /presets/download/bulk`
    async fn download_presets_bulk(&self, ids: &[i64]) -> Result<Vec<u8>>;

    /// `POST /presets/download/search`
    async fn download_search_results(&self, params: &SearchParams) -> Result<Vec<u8>>;

    // Auth

    /// `POST /auth/login`
    async fn login(&self, identity_token: &str) -> Result<AuthResponse>;

    /// `POST /auth/register`
    async fn register(&self, identity_token: &str) -> Result<AuthResponse>;

    /// `POST /auth/logout`
    async fn logout(&self) -> Result<()>;

    // Health check

    /// `GET /health`
    async fn health_check(&self) -> Result<Value>;
}
