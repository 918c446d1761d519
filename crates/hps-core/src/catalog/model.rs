//! Model domain types.

use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;

/// Bucket used for models the backend did not assign a type to.
pub const OTHER_MODEL_TYPE: &str = "other";

/// A device building block (amp, cab, effect, ...) exactly as the backend
/// returns it. The client never mutates these.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Model {
    pub id: i64,
    #[serde(default)]
    pub name: Option<String>,
    #[serde(default)]
    pub symbolic_id: Option<String>,
    #[serde(default)]
    pub category: Option<String>,
    #[serde(default)]
    pub model_type: Option<String>,
}

impl Model {
    /// The bucket this model is grouped under.
    pub fn type_key(&self) -> &str {
        match self.model_type.as_deref() {
            Some(t) if !t.is_empty() => t,
            _ => OTHER_MODEL_TYPE,
        }
    }
}

/// The simplified record kept per model in a [`ModelsByType`] bucket.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ModelSummary {
    pub id: i64,
    pub name: Option<String>,
    pub symbolic_id: Option<String>,
    pub category: Option<String>,
}

impl ModelSummary {
    /// Name used for sorting and display: `name`, then `symbolic_id`, then "".
    pub fn label(&self) -> &str {
        [self.name.as_deref(), self.symbolic_id.as_deref()]
            .into_iter()
            .flatten()
            .find(|s| !s.is_empty())
            .unwrap_or("")
    }
}

impl From<&Model> for ModelSummary {
    fn from(model: &Model) -> Self {
        Self {
            id: model.id,
            name: model.name.clone(),
            symbolic_id: model.symbolic_id.clone(),
            category: model.category.clone(),
        }
    }
}

/// Model type -> models of that type, each bucket sorted by label.
pub type ModelsByType = BTreeMap<String, Vec<ModelSummary>>;
