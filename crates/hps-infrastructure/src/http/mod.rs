//! reqwest implementation of [`PresetApi`].

mod request;

use std::sync::Arc;

use async_trait::async_trait;
use hps_core::api::{PresetApi, UploadFile};
use hps_core::catalog::Model;
use hps_core::preset::{ModelStats, Preset, SearchParams, SearchResponse, UploadResponse};
use hps_core::session::{AuthResponse, SessionState};
use hps_core::{HpsError, Result};
use reqwest::multipart::{Form, Part};
use reqwest::{Client, Method, RequestBuilder, Url};
use serde_json::{Value, json};
use tracing::debug;

use request::{authorize, endpoint, parse_base_url, read_bytes, read_json, send};

/// Talks to the preset backend.
///
/// The client has no timeout and never retries. Every request picks up the
/// session token at construction time; a 401 clears the shared session.
#[derive(Clone)]
pub struct HttpPresetApi {
    client: Client,
    base_url: Url,
    session: Arc<SessionState>,
}

impl HttpPresetApi {
    /// Creates a client for the given base URL.
    ///
    /// # Errors
    ///
    /// Returns `HpsError::Config` if the URL cannot be parsed or cannot
    /// carry a path.
    pub fn new(base_url: &str, session: Arc<SessionState>) -> Result<Self> {
        let client = Client::builder()
            .user_agent(concat!("hps/", env!("CARGO_PKG_VERSION")))
            .build()
            .map_err(|e| HpsError::internal(format!("Failed to build HTTP client: {}", e)))?;

        Ok(Self {
            client,
            base_url: parse_base_url(base_url)?,
            session,
        })
    }

    pub fn base_url(&self) -> &Url {
        &self.base_url
    }

    /// The single place requests are built.
    fn request(
        &self,
        method: Method,
        segments: &[&str],
        token: Option<&str>,
    ) -> Result<RequestBuilder> {
        let url = endpoint(&self.base_url, segments)?;
        debug!("[Http] {} {}", method, url.path());
        Ok(authorize(self.client.request(method, url), token))
    }

    /// Builds a request carrying the current session token, if any.
    fn session_request(&self, method: Method, segments: &[&str]) -> Result<RequestBuilder> {
        let token = self.session.token();
        self.request(method, segments, token.as_deref())
    }

    async fn get_json<T: serde::de::DeserializeOwned>(&self, segments: &[&str]) -> Result<T> {
        let builder = self.session_request(Method::GET, segments)?;
        read_json(send(builder, &self.session).await?).await
    }

    async fn post_json<B, T>(&self, segments: &[&str], body: &B) -> Result<T>
    where
        B: serde::Serialize + ?Sized + Sync,
        T: serde::de::DeserializeOwned,
    {
        let builder = self.session_request(Method::POST, segments)?.json(body);
        read_json(send(builder, &self.session).await?).await
    }

    async fn post_for_bytes<B>(&self, segments: &[&str], body: &B) -> Result<Vec<u8>>
    where
        B: serde::Serialize + ?Sized + Sync,
    {
        let builder = self.session_request(Method::POST, segments)?.json(body);
        read_bytes(send(builder, &self.session).await?).await
    }

    async fn exchange_identity(&self, segment: &str, identity_token: &str) -> Result<AuthResponse> {
        let value: Value = self
            .post_json(&["auth", segment], &json!({ "token": identity_token }))
            .await?;
        AuthResponse::from_value(value)
    }
}

#[async_trait]
impl PresetApi for HttpPresetApi {
    async fn list_models(&self) -> Result<Vec<Model>> {
        self.get_json(&["models", ""]).await
    }

    async fn get_model(&self, id: i64) -> Result<Value> {
        let id = id.to_string();
        self.get_json(&["models", &id]).await
    }

    async fn get_model_parameters(&self, id: i64) -> Result<Value> {
        let id = id.to_string();
        self.get_json(&["models", &id, "parameters"]).await
    }

    async fn get_model_devices(&self, id: i64) -> Result<Value> {
        let id = id.to_string();
        self.get_json(&["models", &id, "devices"]).await
    }

    async fn get_models_by_type(&self, model_type: &str) -> Result<Vec<Model>> {
        self.get_json(&["models", "type", model_type]).await
    }

    async fn get_model_categories(&self) -> Result<Value> {
        self.get_json(&["models", "categories", "list"]).await
    }

    async fn get_model_types(&self) -> Result<Value> {
        self.get_json(&["models", "types", "list"]).await
    }

    async fn get_model_stats(&self) -> Result<ModelStats> {
        self.get_json(&["models", "stats"]).await
    }

    async fn search_presets(&self, params: &SearchParams) -> Result<SearchResponse> {
        self.post_json(&["presets", "search"], params).await
    }

    async fn get_search_filters(&self) -> Result<Value> {
        self.get_json(&["presets", "search", "filters"]).await
    }

    async fn get_preset(&self, id: i64) -> Result<Preset> {
        let id = id.to_string();
        self.get_json(&["presets", &id]).await
    }

    async fn upload_preset(&self, file: UploadFile) -> Result<UploadResponse> {
        let part = Part::bytes(file.bytes).file_name(file.file_name);
        let form = Form::new().part("file", part);

        let builder = self
            .session_request(Method::POST, &["presets", "upload"])?
            .multipart(form);
        read_json(send(builder, &self.session).await?).await
    }

    async fn download_preset(&self, id: i64) -> Result<Vec<u8>> {
        let id = id.to_string();
        let builder = self.session_request(Method::GET, &["presets", "download", &id])?;
        read_bytes(send(builder, &self.session).await?).await
    }

    async fn download_presets_bulk(&self, ids: &[i64]) -> Result<Vec<u8>> {
        self.post_for_bytes(&["presets", "download", "bulk"], ids).await
    }

    async fn download_search_results(&self, params: &SearchParams) -> Result<Vec<u8>> {
        self.post_for_bytes(&["presets", "download", "search"], params)
            .await
    }

    async fn login(&self, identity_token: &str) -> Result<AuthResponse> {
        self.exchange_identity("login", identity_token).await
    }

    async fn register(&self, identity_token: &str) -> Result<AuthResponse> {
        self.exchange_identity("register", identity_token).await
    }

    async fn logout(&self) -> Result<()> {
        let builder = self.session_request(Method::POST, &["auth", "logout"])?;
        send(builder, &self.session).await?;
        Ok(())
    }

    async fn health_check(&self) -> Result<Value> {
        self.get_json(&["health"]).await
    }
}
