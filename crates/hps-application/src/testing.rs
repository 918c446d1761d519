//! Scriptable `PresetApi` for service tests.

use std::collections::HashMap;
use std::sync::Mutex;
use std::sync::atomic::{AtomicUsize, Ordering};
use std::time::Duration;

use async_trait::async_trait;
use hps_core::api::{PresetApi, UploadFile};
use hps_core::catalog::Model;
use hps_core::preset::{ModelStats, Preset, SearchParams, SearchResponse, UploadResponse};
use hps_core::session::AuthResponse;
use hps_core::{HpsError, Result};
use serde_json::{Value, json};

pub(crate) fn model(id: i64, name: &str, model_type: Option<&str>) -> Model {
    Model {
        id,
        name: Some(name.to_string()),
        symbolic_id: None,
        category: None,
        model_type: model_type.map(str::to_string),
    }
}

pub(crate) struct MockPresetApi {
    models: Mutex<Vec<Result<Vec<Model>>>>,
    list_delay: Duration,
    auth: Mutex<Option<Result<AuthResponse>>>,
    logout: Mutex<Result<()>>,
    upload_errors: HashMap<String, HpsError>,
    download: Result<Vec<u8>>,
    calls: Mutex<Vec<String>>,
    list_models_calls: AtomicUsize,
}

impl MockPresetApi {
    pub(crate) fn new() -> Self {
        Self {
            models: Mutex::new(Vec::new()),
            list_delay: Duration::ZERO,
            auth: Mutex::new(None),
            logout: Mutex::new(Ok(())),
            upload_errors: HashMap::new(),
            download: Ok(b"preset-bytes".to_vec()),
            calls: Mutex::new(Vec::new()),
            list_models_calls: AtomicUsize::new(0),
        }
    }

    /// Queues one answer for `list_models`; the last one repeats.
    pub(crate) fn with_models(self, result: Result<Vec<Model>>) -> Self {
        self.models.lock().unwrap().push(result);
        self
    }

    pub(crate) fn with_list_delay(mut self, delay: Duration) -> Self {
        self.list_delay = delay;
        self
    }

    pub(crate) fn with_auth(self, result: Result<AuthResponse>) -> Self {
        *self.auth.lock().unwrap() = Some(result);
        self
    }

    pub(crate) fn with_logout(self, result: Result<()>) -> Self {
        *self.logout.lock().unwrap() = result;
        self
    }

    pub(crate) fn with_upload_error(mut self, file_name: &str, error: HpsError) -> Self {
        self.upload_errors.insert(file_name.to_string(), error);
        self
    }

    pub(crate) fn with_download(mut self, result: Result<Vec<u8>>) -> Self {
        self.download = result;
        self
    }

    pub(crate) fn list_models_calls(&self) -> usize {
        self.list_models_calls.load(Ordering::SeqCst)
    }

    pub(crate) fn calls(&self) -> Vec<String> {
        self.calls.lock().unwrap().clone()
    }

    fn record(&self, call: String) {
        self.calls.lock().unwrap().push(call);
    }
}

#[async_trait]
impl PresetApi for MockPresetApi {
    async fn list_models(&self) -> Result<Vec<Model>> {
        let n = self.list_models_calls.fetch_add(1, Ordering::SeqCst);
        if !self.list_delay.is_zero() {
            tokio::time::sleep(self.list_delay).await;
        }
        let answers = self.models.lock().unwrap();
        answers
            .get(n)
            .or_else(|| answers.last())
            .cloned()
            .unwrap_or_else(|| Ok(Vec::new()))
    }

    async fn get_model(&self, id: i64) -> Result<Value> {
        self.record(format!("get_model {}", id));
        Ok(json!({ "id": id }))
    }

    async fn get_model_parameters(&self, id: i64) -> Result<Value> {
        self.record(format!("get_model_parameters {}", id));
        Ok(json!([]))
    }

    async fn get_model_devices(&self, id: i64) -> Result<Value> {
        self.record(format!("get_model_devices {}", id));
        Ok(json!([]))
    }

    async fn get_models_by_type(&self, model_type: &str) -> Result<Vec<Model>> {
        self.record(format!("get_models_by_type {}", model_type));
        Ok(Vec::new())
    }

    async fn get_model_categories(&self) -> Result<Value> {
        self.record("get_model_categories".to_string());
        Ok(json!([]))
    }

    async fn get_model_types(&self) -> Result<Value> {
        self.record("get_model_types".to_string());
        Ok(json!([]))
    }

    async fn get_model_stats(&self) -> Result<ModelStats> {
        self.record("get_model_stats".to_string());
        Ok(serde_json::from_value(json!({ "total_models": 3, "total_presets": 2 }))?)
    }

    async fn search_presets(&self, params: &SearchParams) -> Result<SearchResponse> {
        self.record(format!("search_presets {}", serde_json::to_string(params)?));
        Ok(SearchResponse {
            results: Vec::new(),
            total_count: 45,
        })
    }

    async fn get_search_filters(&self) -> Result<Value> {
        self.record("get_search_filters".to_string());
        Ok(json!({}))
    }

    async fn get_preset(&self, id: i64) -> Result<Preset> {
        self.record(format!("get_preset {}", id));
        Ok(serde_json::from_value(json!({
            "id": id,
            "name": "Preset",
            "model_details": [
                {"model_type": "reverb", "dsp_number": 1, "position": 0},
                {"model_type": "amp", "dsp_number": 0, "position": 2},
                {"model_type": "cab", "dsp_number": 0, "position": 1}
            ]
        }))?)
    }

    async fn upload_preset(&self, file: UploadFile) -> Result<UploadResponse> {
        self.record(format!("upload_preset {}", file.file_name));
        match self.upload_errors.get(&file.file_name) {
            Some(error) => Err(error.clone()),
            None => Ok(UploadResponse {
                preset_id: file.bytes.len() as i64,
                message: Some("Uploaded".to_string()),
            }),
        }
    }

    async fn download_preset(&self, id: i64) -> Result<Vec<u8>> {
        self.record(format!("download_preset {}", id));
        self.download.clone()
    }

    async fn download_presets_bulk(&self, ids: &[i64]) -> Result<Vec<u8>> {
        self.record(format!("download_presets_bulk {:?}", ids));
        self.download.clone()
    }

    async fn download_search_results(&self, params: &SearchParams) -> Result<Vec<u8>> {
        self.record(format!("download_search_results {}", params.query));
        self.download.clone()
    }

    async fn login(&self, identity_token: &str) -> Result<AuthResponse> {
        self.record(format!("login {}", identity_token));
        self.auth
            .lock()
            .unwrap()
            .clone()
            .unwrap_or_else(|| Err(HpsError::internal("no login answer scripted")))
    }

    async fn register(&self, identity_token: &str) -> Result<AuthResponse> {
        self.record(format!("register {}", identity_token));
        self.auth
            .lock()
            .unwrap()
            .clone()
            .unwrap_or_else(|| Err(HpsError::internal("no register answer scripted")))
    }

    async fn logout(&self) -> Result<()> {
        self.record("logout".to_string());
        self.logout.lock().unwrap().clone()
    }

    async fn health_check(&self) -> Result<Value> {
        self.record("health_check".to_string());
        Ok(json!({ "status": "ok" }))
    }
}
