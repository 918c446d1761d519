//! File naming rules for preset uploads and downloads.

use std::path::Path;

/// Extension of a single Helix preset.
pub const PRESET_EXTENSION: &str = "hlx";

/// File name used for `POST /presets/download/search` archives.
pub const SEARCH_RESULTS_FILE_NAME: &str = "search_results.zip";

/// Replaces every character outside `[A-Za-z0-9_-]` with `_`.
pub fn sanitize_file_stem(name: &str) -> String {
    name.chars()
        .map(|c| {
            if c.is_ascii_alphanumeric() || c == '_' || c == '-' {
                c
            } else {
                '_'
            }
        })
        .collect()
}

/// `<sanitized preset name>.hlx`
pub fn preset_file_name(preset_name: &str) -> String {
    format!("{}.{}", sanitize_file_stem(preset_name), PRESET_EXTENSION)
}

/// `selected_presets_<n>.zip`
pub fn bulk_file_name(count: usize) -> String {
    format!("selected_presets_{count}.zip")
}

/// True when the file name ends in `.hlx`, in any case.
pub fn is_preset_file(path: &Path) -> bool {
    path.file_name()
        .and_then(|n| n.to_str())
        .map(|n| n.to_lowercase().ends_with(".hlx"))
        .unwrap_or(false)
}
