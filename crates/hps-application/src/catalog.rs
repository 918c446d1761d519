//! Memoized access to the model catalog.

use std::sync::{Arc, Mutex, MutexGuard};

use futures::FutureExt;
use futures::future::{BoxFuture, Shared};
use hps_core::Result;
use hps_core::api::PresetApi;
use hps_core::catalog::{self, Model, ModelSummary, ModelsByType};
use serde_json::Value;
use tracing::{debug, info, warn};

/// The flat list and its grouping, computed together once per fetch.
#[derive(Debug)]
struct CatalogData {
    models: Vec<Model>,
    by_type: ModelsByType,
}

type SharedFetch = Shared<BoxFuture<'static, Result<Arc<CatalogData>>>>;

enum CacheState {
    Empty,
    Pending { generation: u64, fetch: SharedFetch },
    Ready(Arc<CatalogData>),
}

struct Inner {
    state: CacheState,
    /// Bumped for every new fetch; a fetch only stores its result while its
    /// generation is still the pending one.
    generation: u64,
}

/// Fetches `GET /models/` at most once and serves every catalog view from
/// that single answer.
///
/// Callers arriving while the request is in flight await the same request.
/// A failure is handed to all of them and leaves the cache empty, so the
/// next call fetches again.
pub struct ModelCatalog {
    api: Arc<dyn PresetApi>,
    inner: Mutex<Inner>,
}

impl ModelCatalog {
    pub fn new(api: Arc<dyn PresetApi>) -> Self {
        Self {
            api,
            inner: Mutex::new(Inner {
                state: CacheState::Empty,
                generation: 0,
            }),
        }
    }

    /// All models, as the backend returned them.
    pub async fn fetch_all(&self) -> Result<Vec<Model>> {
        Ok(self.load().await?.models.clone())
    }

    /// Models grouped by type, each bucket sorted by display name.
    pub async fn models_by_type(&self) -> Result<ModelsByType> {
        Ok(self.load().await?.by_type.clone())
    }

    /// Bucket keys in display order.
    pub async fn type_order(&self) -> Result<Vec<String>> {
        let data = self.load().await?;
        Ok(catalog::type_order(data.by_type.keys().map(String::as_str)))
    }

    /// One bucket; empty for an unknown type.
    pub async fn models_for_type(&self, model_type: &str) -> Result<Vec<ModelSummary>> {
        let data = self.load().await?;
        Ok(data.by_type.get(model_type).cloned().unwrap_or_default())
    }

    /// Human-readable label of a model type.
    pub fn display_name(&self, model_type: &str) -> String {
        catalog::display_name(model_type)
    }

    /// Drops everything cached, including a fetch still in flight.
    pub fn clear_cache(&self) {
        let mut inner = self.lock();
        inner.state = CacheState::Empty;
        debug!("[Catalog] Cache cleared");
    }

    pub fn is_cached(&self) -> bool {
        matches!(self.lock().state, CacheState::Ready(_))
    }

    // Uncached passthroughs

    pub async fn model(&self, id: i64) -> Result<Value> {
        self.api.get_model(id).await
    }

    pub async fn model_parameters(&self, id: i64) -> Result<Value> {
        self.api.get_model_parameters(id).await
    }

    pub async fn model_devices(&self, id: i64) -> Result<Value> {
        self.api.get_model_devices(id).await
    }

    /// Server-side filtering by type, bypassing the cache.
    pub async fn models_by_type_remote(&self, model_type: &str) -> Result<Vec<Model>> {
        self.api.get_models_by_type(model_type).await
    }

    pub async fn categories(&self) -> Result<Value> {
        self.api.get_model_categories().await
    }

    pub async fn types(&self) -> Result<Value> {
        self.api.get_model_types().await
    }

    async fn load(&self) -> Result<Arc<CatalogData>> {
        let (generation, fetch) = {
            let mut inner = self.lock();
            let pending = match &inner.state {
                CacheState::Ready(data) => return Ok(data.clone()),
                CacheState::Pending { generation, fetch } => Some((*generation, fetch.clone())),
                CacheState::Empty => None,
            };
            match pending {
                Some(pending) => pending,
                None => {
                    inner.generation += 1;
                    let generation = inner.generation;
                    let fetch = self.start_fetch();
                    inner.state = CacheState::Pending {
                        generation,
                        fetch: fetch.clone(),
                    };
                    (generation, fetch)
                }
            }
        };

        let result = fetch.await;

        let mut inner = self.lock();
        let still_pending = matches!(
            &inner.state,
            CacheState::Pending { generation: current, .. } if *current == generation
        );
        if still_pending {
            inner.state = match &result {
                Ok(data) => CacheState::Ready(data.clone()),
                Err(_) => CacheState::Empty,
            };
        }

        result
    }

    fn start_fetch(&self) -> SharedFetch {
        let api = self.api.clone();
        async move {
            debug!("[Catalog] Fetching models");
            match api.list_models().await {
                Ok(models) => {
                    let by_type = catalog::group_by_type(&models);
                    info!(
                        "[Catalog] Loaded {} models in {} types",
                        models.len(),
                        by_type.len()
                    );
                    Ok(Arc::new(CatalogData { models, by_type }))
                }
                Err(e) => {
                    warn!("[Catalog] Failed to fetch models: {}", e);
                    Err(e)
                }
            }
        }
        .boxed()
        .shared()
    }

    fn lock(&self) -> MutexGuard<'_, Inner> {
        self.inner.lock().unwrap_or_else(|e| e.into_inner())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::testing::{MockPresetApi, model};
    use hps_core::HpsError;
    use std::time::Duration;

    fn sample_models() -> Vec<Model> {
        vec![
            model(1, "brit 2204", Some("amp")),
            model(2, "US Deluxe", Some("amp")),
            model(3, "Plate", Some("reverb")),
            model(4, "Looper", None),
            model(5, "4x12 Greenback", Some("cab")),
        ]
    }

    #[tokio::test]
    async fn test_fetch_all_is_memoized() {
        let api = Arc::new(MockPresetApi::new().with_models(Ok(sample_models())));
        let catalog = ModelCatalog::new(api.clone());

        assert_eq!(catalog.fetch_all().await.unwrap().len(), 5);
        assert_eq!(catalog.fetch_all().await.unwrap().len(), 5);
        catalog.models_by_type().await.unwrap();

        assert_eq!(api.list_models_calls(), 1);
        assert!(catalog.is_cached());
    }

    #[tokio::test(flavor = "multi_thread", worker_threads = 2)]
    async fn test_concurrent_callers_share_one_request() {
        let api = Arc::new(
            MockPresetApi::new()
                .with_models(Ok(sample_models()))
                .with_list_delay(Duration::from_millis(50)),
        );
        let catalog = Arc::new(ModelCatalog::new(api.clone()));

        let handles: Vec<_> = (0..5)
            .map(|_| {
                let catalog = catalog.clone();
                tokio::spawn(async move { catalog.fetch_all().await })
            })
            .collect();

        for handle in handles {
            assert_eq!(handle.await.unwrap().unwrap().len(), 5);
        }
        assert_eq!(api.list_models_calls(), 1);
    }

    #[tokio::test]
    async fn test_failure_reaches_every_waiter_then_resets() {
        let api = Arc::new(
            MockPresetApi::new()
                .with_models(Err(HpsError::http(500, None)))
                .with_models(Ok(sample_models()))
                .with_list_delay(Duration::from_millis(20)),
        );
        let catalog = ModelCatalog::new(api.clone());

        let (first, second) = tokio::join!(catalog.fetch_all(), catalog.fetch_all());
        assert_eq!(first.unwrap_err().status(), Some(500));
        assert_eq!(second.unwrap_err().status(), Some(500));
        assert_eq!(api.list_models_calls(), 1);
        assert!(!catalog.is_cached());

        assert_eq!(catalog.fetch_all().await.unwrap().len(), 5);
        assert_eq!(api.list_models_calls(), 2);
    }

    #[tokio::test]
    async fn test_clear_cache_forces_refetch() {
        let api = Arc::new(MockPresetApi::new().with_models(Ok(sample_models())));
        let catalog = ModelCatalog::new(api.clone());

        catalog.fetch_all().await.unwrap();
        catalog.clear_cache();
        assert!(!catalog.is_cached());
        catalog.fetch_all().await.unwrap();

        assert_eq!(api.list_models_calls(), 2);
    }

    #[tokio::test]
    async fn test_clear_cache_discards_in_flight_result() {
        let api = Arc::new(
            MockPresetApi::new()
                .with_models(Ok(vec![model(1, "Stale", Some("amp"))]))
                .with_models(Ok(sample_models()))
                .with_list_delay(Duration::from_millis(20)),
        );
        let catalog = ModelCatalog::new(api.clone());

        let stale = async {
            let models = catalog.fetch_all().await.unwrap();
            catalog.fetch_all().await.unwrap();
            models
        };
        let clear = async {
            tokio::time::sleep(Duration::from_millis(5)).await;
            catalog.clear_cache();
        };
        let (stale, _) = tokio::join!(stale, clear);

        // The caller of the cleared fetch still gets its answer
        assert_eq!(stale.len(), 1);
        // but it was not stored, so the next call fetched again
        assert_eq!(api.list_models_calls(), 2);
        assert_eq!(catalog.fetch_all().await.unwrap().len(), 5);
    }

    #[tokio::test]
    async fn test_grouped_views() {
        let api = Arc::new(MockPresetApi::new().with_models(Ok(sample_models())));
        let catalog = ModelCatalog::new(api);

        assert_eq!(
            catalog.type_order().await.unwrap(),
            vec!["amp", "cab", "reverb", "other"]
        );

        let amps = catalog.models_for_type("amp").await.unwrap();
        let labels: Vec<_> = amps.iter().map(|m| m.label().to_string()).collect();
        assert_eq!(labels, vec!["brit 2204", "US Deluxe"]);

        assert!(catalog.models_for_type("synth").await.unwrap().is_empty());
        assert_eq!(catalog.models_for_type("other").await.unwrap()[0].id, 4);
        assert_eq!(catalog.display_name("amp"), "Amplifiers");
    }

    #[tokio::test]
    async fn test_passthroughs_skip_cache() {
        let api = Arc::new(MockPresetApi::new());
        let catalog = ModelCatalog::new(api.clone());

        catalog.model(9).await.unwrap();
        catalog.models_by_type_remote("amp").await.unwrap();
        catalog.categories().await.unwrap();

        assert_eq!(
            api.calls(),
            vec!["get_model 9", "get_models_by_type amp", "get_model_categories"]
        );
        assert_eq!(api.list_models_calls(), 0);
    }
}
