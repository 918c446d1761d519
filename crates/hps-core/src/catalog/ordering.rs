//! Deterministic ordering rules for the model catalog and preset details.
//!
//! The backend serves an unordered flat catalog. Everything the UI lists is
//! ordered here so repeated renders agree with each other.

use std::cmp::Ordering;

use super::model::{Model, ModelSummary, ModelsByType};
use crate::preset::ModelDetail;

/// Model types in the order a guitarist reads a rig.
pub const PREFERRED_TYPE_ORDER: [&str; 12] = [
    "amp",
    "preamp",
    "cab",
    "dynamics",
    "distortion",
    "modulation",
    "pitch",
    "synth",
    "delay",
    "reverb",
    "filter",
    "wah",
];

/// Human labels for raw model type keys.
const DISPLAY_NAMES: &[(&str, &str)] = &[
    ("amp", "Amplifiers"),
    ("cab", "Cabinets"),
    ("dist", "Distortions"),
    ("delay", "Delays"),
    ("reverb", "Reverbs"),
    ("chorus", "Chorus"),
    ("flanger", "Flangers"),
    ("phaser", "Phasers"),
    ("tremolo", "Tremolos"),
    ("comp", "Compressors"),
    ("eq", "Equalizers"),
    ("gate", "Gates"),
    ("wah", "Wah"),
    ("pitch", "Pitch"),
    ("synth", "Synthesizers"),
    ("filter", "Filters"),
    ("vol", "Volume"),
    ("fx", "Effects"),
    ("preamp", "Preamps"),
    ("rotary", "Rotary"),
    ("vibrato", "Vibrato"),
    ("ring", "Ring Modulators"),
    ("send", "Sends"),
    ("return", "Returns"),
    ("dl4", "DL4 Effects"),
    ("dm4", "DM4 Effects"),
    ("fm4", "FM4 Effects"),
    ("mm4", "MM4 Effects"),
    ("vic", "Victoria Effects"),
    ("l6spb", "Line 6 SPB Effects"),
    ("victoria", "Victoria Effects"),
    ("fixed", "System Parameters"),
];

/// Position of a type in [`PREFERRED_TYPE_ORDER`], if it is listed.
pub fn preference_rank(model_type: &str) -> Option<usize> {
    PREFERRED_TYPE_ORDER.iter().position(|t| *t == model_type)
}

/// Case- and accent-insensitive comparison of display names.
///
/// Names are transliterated to ASCII and lowercased, so "Élan" sorts with
/// the e's. Names that fold to the same key are ordered by their raw form
/// so the result is a total order.
pub fn compare_display_names(a: &str, b: &str) -> Ordering {
    sort_key(a).cmp(&sort_key(b)).then_with(|| a.cmp(b))
}

fn sort_key(name: &str) -> String {
    deunicode::deunicode(name).to_lowercase()
}

/// Partitions a flat model list by type, each bucket sorted by label.
///
/// Models without a type land in the `"other"` bucket. Relative order of
/// models with identical labels is unspecified.
pub fn group_by_type(models: &[Model]) -> ModelsByType {
    let mut grouped = ModelsByType::new();

    for model in models {
        grouped
            .entry(model.type_key().to_string())
            .or_default()
            .push(ModelSummary::from(model));
    }

    for bucket in grouped.values_mut() {
        bucket.sort_by(|a, b| compare_display_names(a.label(), b.label()));
    }

    grouped
}

/// Orders type keys: preferred types first in list order, then the rest
/// alphabetically.
pub fn type_order<'a, I>(keys: I) -> Vec<String>
where
    I: IntoIterator<Item = &'a str>,
{
    let mut keys: Vec<&str> = keys.into_iter().collect();
    keys.sort_by(|a, b| compare_type_preference(a, b));
    keys.dedup();
    keys.into_iter().map(str::to_string).collect()
}

fn compare_type_preference(a: &str, b: &str) -> Ordering {
    match (preference_rank(a), preference_rank(b)) {
        (Some(x), Some(y)) => x.cmp(&y),
        (Some(_), None) => Ordering::Less,
        (None, Some(_)) => Ordering::Greater,
        (None, None) => a.cmp(b),
    }
}

/// Maps a raw type key to its label.
///
/// Unknown keys are returned with the first letter upper-cased; an empty
/// key is "Other".
pub fn display_name(model_type: &str) -> String {
    if model_type.is_empty() {
        return "Other".to_string();
    }

    let lower = model_type.to_lowercase();
    if let Some((_, label)) = DISPLAY_NAMES.iter().find(|(key, _)| *key == lower) {
        return (*label).to_string();
    }

    let mut chars = model_type.chars();
    match chars.next() {
        Some(first) => first.to_uppercase().chain(chars).collect(),
        None => String::new(),
    }
}

/// Sorts preset details into physical routing order:
/// ascending `(dsp_number, position, path_number)`.
pub fn sort_by_signal_chain(details: &mut [ModelDetail]) {
    details.sort_by_key(|d| d.signal_chain_position());
}

/// Sorts preset details by [`PREFERRED_TYPE_ORDER`], unlisted types
/// alphabetically after all listed ones.
pub fn sort_by_type_preference(details: &mut [ModelDetail]) {
    details.sort_by(|a, b| {
        compare_type_preference(
            a.model_type.as_deref().unwrap_or(""),
            b.model_type.as_deref().unwrap_or(""),
        )
    });
}
