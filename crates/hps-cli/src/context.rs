//! Wiring of configuration, session and services for one invocation.

use std::sync::Arc;

use anyhow::{Context, Result};
use hps_application::{
    AuthService, DownloadService, ModelCatalog, SearchService, StatsService, UploadService,
};
use hps_core::api::PresetApi;
use hps_core::config::ClientConfig;
use hps_core::session::SessionState;
use hps_infrastructure::paths::HpsPaths;
use hps_infrastructure::{ConfigService, FileKeyValueStore, HttpPresetApi};
use tracing::debug;
use tracing_appender::non_blocking::WorkerGuard;

use crate::GlobalArgs;
use crate::logging;

pub struct AppContext {
    pub paths: HpsPaths,
    pub config_service: ConfigService,
    /// Effective configuration: file, then environment, then flags.
    pub config: ClientConfig,
    pub session: Arc<SessionState>,
    pub catalog: ModelCatalog,
    pub auth: AuthService,
    pub search: SearchService,
    pub downloads: DownloadService,
    pub uploads: UploadService,
    pub stats: StatsService,
    _log_guard: Option<WorkerGuard>,
}

impl AppContext {
    pub fn bootstrap(args: &GlobalArgs) -> Result<Self> {
        let paths = HpsPaths::new(args.config_dir.clone());
        let config_service = ConfigService::new(&paths)?;
        let config = apply_cli_overrides(config_service.get_config(), args);

        let logs_dir = paths.logs_dir().ok();
        let log_guard = logging::init(
            args.verbose,
            config.log_level.as_deref(),
            logs_dir.as_deref(),
        );
        debug!("[Cli] API base URL {}", config.normalized_base_url());

        let store = Arc::new(FileKeyValueStore::new(paths.session_file()?));
        let session = Arc::new(SessionState::restore(store));

        let api: Arc<dyn PresetApi> = Arc::new(
            HttpPresetApi::new(config.normalized_base_url(), session.clone())
                .context("Cannot create the API client")?,
        );

        Ok(Self {
            catalog: ModelCatalog::new(api.clone()),
            auth: AuthService::new(api.clone(), session.clone()),
            search: SearchService::new(api.clone()),
            downloads: DownloadService::new(
                api.clone(),
                session.clone(),
                config.download_dir_or_current(),
            ),
            uploads: UploadService::new(api.clone(), session.clone()),
            stats: StatsService::new(api),
            paths,
            config_service,
            config,
            session,
            _log_guard: log_guard,
        })
    }
}

/// `--api-url` and `--output-dir` beat everything else.
fn apply_cli_overrides(mut config: ClientConfig, args: &GlobalArgs) -> ClientConfig {
    if let Some(url) = &args.api_url {
        config.api_base_url = url.clone();
    }
    if let Some(dir) = &args.output_dir {
        config.download_dir = Some(dir.clone());
    }
    config
}
