//! Saving presets and archives to disk.

use std::path::{Path, PathBuf};
use std::sync::Arc;

use hps_core::Result;
use hps_core::api::PresetApi;
use hps_core::preset::files::{SEARCH_RESULTS_FILE_NAME, bulk_file_name, preset_file_name};
use hps_core::preset::{Preset, SearchParams};
use hps_core::session::SessionState;
use tracing::{debug, info};

/// Downloads require a signed-in user and fail with `Unauthorized` before
/// any request is made otherwise.
pub struct DownloadService {
    api: Arc<dyn PresetApi>,
    session: Arc<SessionState>,
    download_dir: PathBuf,
}

impl DownloadService {
    pub fn new(api: Arc<dyn PresetApi>, session: Arc<SessionState>, download_dir: PathBuf) -> Self {
        Self {
            api,
            session,
            download_dir,
        }
    }

    pub fn download_dir(&self) -> &Path {
        &self.download_dir
    }

    /// Saves one preset as `<sanitized name>.hlx`.
    pub async fn download_preset(&self, preset: &Preset) -> Result<PathBuf> {
        self.session.require_authenticated()?;
        let bytes = self.api.download_preset(preset.id).await?;
        self.write(&preset_file_name(&preset.name), &bytes).await
    }

    /// Saves the selected presets as `selected_presets_<n>.zip`.
    ///
    /// Nothing is requested for an empty selection.
    pub async fn download_bulk(&self, ids: &[i64]) -> Result<Option<PathBuf>> {
        if ids.is_empty() {
            debug!("[Download] Empty selection, nothing to download");
            return Ok(None);
        }
        self.session.require_authenticated()?;
        let bytes = self.api.download_presets_bulk(ids).await?;
        self.write(&bulk_file_name(ids.len()), &bytes).await.map(Some)
    }

    /// Saves every preset matching `params` as `search_results.zip`.
    pub async fn download_search(&self, params: &SearchParams) -> Result<PathBuf> {
        self.session.require_authenticated()?;
        let bytes = self.api.download_search_results(params).await?;
        self.write(SEARCH_RESULTS_FILE_NAME, &bytes).await
    }

    async fn write(&self, file_name: &str, bytes: &[u8]) -> Result<PathBuf> {
        tokio::fs::create_dir_all(&self.download_dir).await?;
        let path = self.download_dir.join(file_name);
        tokio::fs::write(&path, bytes).await?;
        info!("[Download] Saved {} ({} bytes)", path.display(), bytes.len());
        Ok(path)
    }
}
