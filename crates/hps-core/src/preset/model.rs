//! Preset records as returned by the backend.

use serde::{Deserialize, Deserializer, Serialize};
use serde_json::{Map, Value};

/// One model instance placed inside a preset.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct ModelDetail {
    #[serde(default)]
    pub model_type: Option<String>,
    #[serde(default)]
    pub model_name: Option<String>,
    #[serde(default)]
    pub dsp_number: Option<i64>,
    #[serde(default)]
    pub position: Option<i64>,
    #[serde(default)]
    pub path_number: Option<i64>,
    #[serde(default)]
    pub is_stereo: Option<bool>,
    #[serde(default)]
    pub has_trails: Option<bool>,
    #[serde(default)]
    pub is_enabled: Option<bool>,
    #[serde(default)]
    pub parameter_values: Value,
}

impl ModelDetail {
    /// `(dsp_number, position, path_number)`: where the block sits in the
    /// device's routing.
    pub fn signal_chain_position(&self) -> (Option<i64>, Option<i64>, Option<i64>) {
        (self.dsp_number, self.position, self.path_number)
    }
}

/// A preset as stored server-side. Read-only for the client.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Preset {
    pub id: i64,
    #[serde(default, deserialize_with = "null_as_default")]
    pub name: String,
    #[serde(default)]
    pub author: Option<String>,
    #[serde(default)]
    pub tags: Option<Value>,
    #[serde(default)]
    pub description: Option<String>,
    #[serde(default)]
    pub created_at: Option<String>,
    #[serde(default, deserialize_with = "null_as_default")]
    pub model_details: Vec<ModelDetail>,
}

/// Reads an explicit `null` like a missing field.
pub(crate) fn null_as_default<'de, D, T>(deserializer: D) -> std::result::Result<T, D::Error>
where
    D: Deserializer<'de>,
    T: Default + Deserialize<'de>,
{
    Ok(Option::<T>::deserialize(deserializer)?.unwrap_or_default())
}

impl Preset {
    /// Tags flattened to strings; the backend sends either a list or a
    /// comma separated string.
    pub fn tag_list(&self) -> Vec<String> {
        match &self.tags {
            Some(Value::Array(items)) => items
                .iter()
                .filter_map(|v| match v {
                    Value::String(s) => Some(s.trim().to_string()),
                    Value::Null => None,
                    other => Some(other.to_string()),
                })
                .filter(|s| !s.is_empty())
                .collect(),
            Some(Value::String(s)) => s
                .split(',')
                .map(|t| t.trim().to_string())
                .filter(|t| !t.is_empty())
                .collect(),
            _ => Vec::new(),
        }
    }
}

/// Response of `POST /presets/upload`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct UploadResponse {
    pub preset_id: i64,
    #[serde(default)]
    pub message: Option<String>,
}

/// Response of `GET /models/stats`.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct ModelStats {
    #[serde(default)]
    pub total_models: Option<u64>,
    #[serde(default)]
    pub total_presets: Option<u64>,
    #[serde(default)]
    pub avg_models_per_preset: Option<f64>,
    /// Any further fields the backend reports.
    #[serde(flatten)]
    pub extra: Map<String, Value>,
}
