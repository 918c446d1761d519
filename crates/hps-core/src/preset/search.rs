//! Search request/response types.

use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;

use super::model::{Preset, null_as_default};

/// Results per page when the caller does not choose.
pub const DEFAULT_PAGE_SIZE: u32 = 20;

/// Selected model ids of one type.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ModelFilter {
    pub model_type: String,
    pub model_ids: Vec<i64>,
}

/// Body of `POST /presets/search` and `POST /presets/download/search`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SearchParams {
    pub query: String,
    pub author: String,
    pub tags: String,
    pub models: Vec<ModelFilter>,
    pub page: u32,
    pub page_size: u32,
}

impl Default for SearchParams {
    fn default() -> Self {
        Self {
            query: String::new(),
            author: String::new(),
            tags: String::new(),
            models: Vec::new(),
            page: 1,
            page_size: DEFAULT_PAGE_SIZE,
        }
    }
}

impl SearchParams {
    /// Replaces the model filters with the non-empty entries of `selection`.
    pub fn with_selection(mut self, selection: &ModelSelection) -> Self {
        self.models = selection.to_filters();
        self
    }

    /// Moves to another page, keeping every other field. Pages start at 1.
    pub fn with_page(mut self, page: u32) -> Self {
        self.page = page.max(1);
        self
    }
}

/// Which model ids the user picked, per model type.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ModelSelection {
    selected: BTreeMap<String, Vec<i64>>,
}

impl ModelSelection {
    pub fn new() -> Self {
        Self::default()
    }

    /// Sets the selection for one type, replacing what was there.
    pub fn select(&mut self, model_type: impl Into<String>, model_ids: Vec<i64>) {
        self.selected.insert(model_type.into(), model_ids);
    }

    /// Adds a single id to a type's selection, ignoring duplicates.
    pub fn add(&mut self, model_type: impl Into<String>, model_id: i64) {
        let ids = self.selected.entry(model_type.into()).or_default();
        if !ids.contains(&model_id) {
            ids.push(model_id);
        }
    }

    /// Empties every type's selection.
    pub fn clear(&mut self) {
        for ids in self.selected.values_mut() {
            ids.clear();
        }
    }

    /// All selected ids across types.
    pub fn all_ids(&self) -> Vec<i64> {
        self.selected.values().flatten().copied().collect()
    }

    pub fn is_empty(&self) -> bool {
        self.selected.values().all(Vec::is_empty)
    }

    /// Filters for the search body. Types with nothing selected are omitted.
    pub fn to_filters(&self) -> Vec<ModelFilter> {
        self.selected
            .iter()
            .filter(|(_, ids)| !ids.is_empty())
            .map(|(model_type, ids)| ModelFilter {
                model_type: model_type.clone(),
                model_ids: ids.clone(),
            })
            .collect()
    }
}

/// Response of `POST /presets/search`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SearchResponse {
    #[serde(default, deserialize_with = "null_as_default")]
    pub results: Vec<Preset>,
    #[serde(default)]
    pub total_count: u64,
}

impl SearchResponse {
    /// Number of pages at the given page size.
    pub fn total_pages(&self, page_size: u32) -> u64 {
        if page_size == 0 {
            return 0;
        }
        self.total_count.div_ceil(u64::from(page_size))
    }
}
