//! Preset search.

use std::sync::Arc;

use hps_core::Result;
use hps_core::api::PresetApi;
use hps_core::catalog::sort_by_signal_chain;
use hps_core::preset::{ModelSelection, Preset, SearchParams, SearchResponse};
use serde_json::Value;
use tracing::debug;

/// Free-text part of a search; model filters come from a [`ModelSelection`].
#[derive(Debug, Clone, Default, PartialEq)]
pub struct SearchQuery {
    pub query: String,
    pub author: String,
    pub tags: String,
    /// `None` keeps the default page size.
    pub page_size: Option<u32>,
}

impl SearchQuery {
    /// Request body for the given page. Types with no selected ids are left
    /// out.
    pub fn to_params(&self, selection: &ModelSelection, page: u32) -> SearchParams {
        let mut params = SearchParams {
            query: self.query.clone(),
            author: self.author.clone(),
            tags: self.tags.clone(),
            ..SearchParams::default()
        };
        if let Some(page_size) = self.page_size.filter(|size| *size > 0) {
            params.page_size = page_size;
        }
        params.with_selection(selection).with_page(page)
    }
}

pub struct SearchService {
    api: Arc<dyn PresetApi>,
}

impl SearchService {
    pub fn new(api: Arc<dyn PresetApi>) -> Self {
        Self { api }
    }

    /// Runs `POST /presets/search` for one page.
    pub async fn search(
        &self,
        query: &SearchQuery,
        selection: &ModelSelection,
        page: u32,
    ) -> Result<SearchResponse> {
        let params = query.to_params(selection, page);
        debug!(
            "[Search] page {} with {} model filters",
            params.page,
            params.models.len()
        );
        self.api.search_presets(&params).await
    }

    /// Filter values offered by the backend.
    pub async fn filters(&self) -> Result<Value> {
        self.api.get_search_filters().await
    }

    /// One preset, with its blocks in signal-chain order.
    pub async fn preset(&self, id: i64) -> Result<Preset> {
        let mut preset = self.api.get_preset(id).await?;
        sort_by_signal_chain(&mut preset.model_details);
        Ok(preset)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::testing::MockPresetApi;

    #[test]
    fn test_to_params_skips_empty_selections() {
        let mut selection = ModelSelection::new();
        selection.select("amp", vec![3, 5]);
        selection.select("reverb", vec![]);
        let query = SearchQuery {
            query: "plexi".to_string(),
            ..SearchQuery::default()
        };

        let params = query.to_params(&selection, 2);

        assert_eq!(params.query, "plexi");
        assert_eq!(params.page, 2);
        assert_eq!(params.page_size, 20);
        assert_eq!(params.models.len(), 1);
        assert_eq!(params.models[0].model_type, "amp");
        assert_eq!(params.models[0].model_ids, vec![3, 5]);
    }

    #[test]
    fn test_to_params_page_size_override() {
        let query = SearchQuery {
            page_size: Some(50),
            ..SearchQuery::default()
        };
        assert_eq!(query.to_params(&ModelSelection::new(), 0).page_size, 50);
        assert_eq!(query.to_params(&ModelSelection::new(), 0).page, 1);

        let query = SearchQuery {
            page_size: Some(0),
            ..SearchQuery::default()
        };
        assert_eq!(query.to_params(&ModelSelection::new(), 1).page_size, 20);
    }

    #[tokio::test]
    async fn test_search_sends_built_params() {
        let api = Arc::new(MockPresetApi::new());
        let service = SearchService::new(api.clone());
        let mut selection = ModelSelection::new();
        selection.add("cab", 8);

        let response = service
            .search(&SearchQuery::default(), &selection, 3)
            .await
            .unwrap();

        assert_eq!(response.total_pages(20), 3);
        let call = &api.calls()[0];
        assert!(call.contains(r#""page":3"#));
        assert!(call.contains(r#""model_type":"cab""#));
    }

    #[tokio::test]
    async fn test_preset_details_in_signal_chain_order() {
        let service = SearchService::new(Arc::new(MockPresetApi::new()));

        let preset = service.preset(4).await.unwrap();

        let types: Vec<_> = preset
            .model_details
            .iter()
            .map(|d| d.model_type.as_deref().unwrap_or_default())
            .collect();
        assert_eq!(types, vec!["cab", "amp", "reverb"]);
    }
}
