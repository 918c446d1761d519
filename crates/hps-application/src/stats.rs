//! Catalog statistics and backend health.

use std::sync::Arc;

use hps_core::Result;
use hps_core::api::PresetApi;
use hps_core::preset::ModelStats;
use serde_json::Value;

pub struct StatsService {
    api: Arc<dyn PresetApi>,
}

impl StatsService {
    pub fn new(api: Arc<dyn PresetApi>) -> Self {
        Self { api }
    }

    /// `GET /models/stats`
    pub async fn stats(&self) -> Result<ModelStats> {
        self.api.get_model_stats().await
    }

    /// `GET /health`
    pub async fn health(&self) -> Result<Value> {
        self.api.health_check().await
    }
}
