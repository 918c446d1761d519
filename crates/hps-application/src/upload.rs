//! Sequential preset uploads.

use std::path::{Path, PathBuf};
use std::sync::Arc;

use hps_core::Result;
use hps_core::api::{PresetApi, UploadFile};
use hps_core::preset::files::is_preset_file;
use hps_core::session::SessionState;
use tracing::{info, warn};

use crate::messages::UPLOAD_FAILED;

#[derive(Debug, Clone, PartialEq)]
pub enum UploadOutcome {
    Succeeded {
        preset_id: i64,
        message: Option<String>,
    },
    Failed {
        error: String,
    },
}

/// What happened to one file.
#[derive(Debug, Clone, PartialEq)]
pub struct UploadResult {
    pub file: String,
    pub outcome: UploadOutcome,
}

impl UploadResult {
    pub fn is_success(&self) -> bool {
        matches!(self.outcome, UploadOutcome::Succeeded { .. })
    }
}

pub struct UploadService {
    api: Arc<dyn PresetApi>,
    session: Arc<SessionState>,
}

impl UploadService {
    pub fn new(api: Arc<dyn PresetApi>, session: Arc<SessionState>) -> Self {
        Self { api, session }
    }

    /// Keeps the `.hlx` files, in order.
    pub fn collect<P: AsRef<Path>>(paths: &[P]) -> Vec<PathBuf> {
        paths
            .iter()
            .map(AsRef::<Path>::as_ref)
            .filter(|path| is_preset_file(path))
            .map(Path::to_path_buf)
            .collect()
    }

    /// Uploads `files` one at a time.
    ///
    /// A failing file is recorded and the rest still go out; nothing is
    /// rolled back. `progress` receives the completed percentage after each
    /// file. Fails up front only when nobody is signed in.
    pub async fn upload_all<F>(
        &self,
        files: &[PathBuf],
        mut progress: F,
    ) -> Result<Vec<UploadResult>>
    where
        F: FnMut(f64),
    {
        if files.is_empty() {
            return Ok(Vec::new());
        }
        self.session.require_authenticated()?;

        let total = files.len();
        let mut results = Vec::with_capacity(total);

        for (i, path) in files.iter().enumerate() {
            let file = path
                .file_name()
                .map(|n| n.to_string_lossy().into_owned())
                .unwrap_or_else(|| path.display().to_string());

            let outcome = self.upload_one(path, &file).await;
            match &outcome {
                UploadOutcome::Succeeded { preset_id, .. } => {
                    info!("[Upload] {} -> preset {}", file, preset_id)
                }
                UploadOutcome::Failed { error } => warn!("[Upload] {} failed: {}", file, error),
            }
            results.push(UploadResult { file, outcome });

            progress((i + 1) as f64 / total as f64 * 100.0);
        }

        Ok(results)
    }

    async fn upload_one(&self, path: &Path, file_name: &str) -> UploadOutcome {
        let bytes = match tokio::fs::read(path).await {
            Ok(bytes) => bytes,
            Err(e) => {
                return UploadOutcome::Failed {
                    error: format!("Cannot read {}: {}", path.display(), e),
                };
            }
        };

        let upload = UploadFile {
            file_name: file_name.to_string(),
            bytes,
        };
        match self.api.upload_preset(upload).await {
            Ok(response) => UploadOutcome::Succeeded {
                preset_id: response.preset_id,
                message: response.message,
            },
            Err(e) => UploadOutcome::Failed {
                error: e.detail().unwrap_or(UPLOAD_FAILED).to_string(),
            },
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::testing::MockPresetApi;
    use hps_core::HpsError;
    use hps_core::session::{AuthenticatedSession, User};
    use hps_core::storage::MemoryKeyValueStore;
    use tempfile::TempDir;

    fn signed_in() -> Arc<SessionState> {
        let session = Arc::new(SessionState::new(Arc::new(MemoryKeyValueStore::new())));
        session
            .establish(AuthenticatedSession {
                token: "tok".to_string(),
                user: User::default(),
            })
            .unwrap();
        session
    }

    fn write_files(dir: &Path, names: &[&str]) -> Vec<PathBuf> {
        names
            .iter()
            .map(|name| {
                let path = dir.join(name);
                std::fs::write(&path, name.as_bytes()).unwrap();
                path
            })
            .collect()
    }

    #[test]
    fn test_collect_keeps_hlx_only() {
        let paths = ["a.hlx", "b.HLX", "notes.txt", "c.hlx.bak", "d.Hlx"];
        let kept = UploadService::collect(&paths);
        assert_eq!(
            kept,
            vec![PathBuf::from("a.hlx"), PathBuf::from("b.HLX"), PathBuf::from("d.Hlx")]
        );
    }

    #[tokio::test]
    async fn test_failure_does_not_stop_later_files() {
        let temp_dir = TempDir::new().unwrap();
        let files = write_files(temp_dir.path(), &["one.hlx", "two.hlx", "three.hlx"]);
        let api = Arc::new(MockPresetApi::new().with_upload_error(
            "two.hlx",
            HpsError::http(400, Some("Invalid preset file".to_string())),
        ));
        let service = UploadService::new(api.clone(), signed_in());

        let mut reported = Vec::new();
        let results = service
            .upload_all(&files, |percent| reported.push(percent))
            .await
            .unwrap();

        assert_eq!(results.len(), 3);
        assert!(results[0].is_success());
        assert_eq!(
            results[1],
            UploadResult {
                file: "two.hlx".to_string(),
                outcome: UploadOutcome::Failed {
                    error: "Invalid preset file".to_string()
                },
            }
        );
        assert!(results[2].is_success());
        assert_eq!(
            api.calls(),
            vec!["upload_preset one.hlx", "upload_preset two.hlx", "upload_preset three.hlx"]
        );

        assert_eq!(reported.len(), 3);
        assert!((reported[0] - 100.0 / 3.0).abs() < 1e-9);
        assert!((reported[2] - 100.0).abs() < 1e-9);
    }

    #[tokio::test]
    async fn test_failure_without_detail_uses_generic_message() {
        let temp_dir = TempDir::new().unwrap();
        let files = write_files(temp_dir.path(), &["one.hlx"]);
        let api = MockPresetApi::new().with_upload_error("one.hlx", HpsError::network("reset"));
        let service = UploadService::new(Arc::new(api), signed_in());

        let results = service.upload_all(&files, |_| {}).await.unwrap();

        assert_eq!(
            results[0].outcome,
            UploadOutcome::Failed {
                error: "Upload failed".to_string()
            }
        );
    }

    #[tokio::test]
    async fn test_success_carries_backend_answer() {
        let temp_dir = TempDir::new().unwrap();
        let files = write_files(temp_dir.path(), &["abc.hlx"]);
        let service = UploadService::new(Arc::new(MockPresetApi::new()), signed_in());

        let results = service.upload_all(&files, |_| {}).await.unwrap();

        // The mock answers with the byte count as id
        assert_eq!(
            results[0].outcome,
            UploadOutcome::Succeeded {
                preset_id: 7,
                message: Some("Uploaded".to_string()),
            }
        );
    }

    #[tokio::test]
    async fn test_missing_file_is_recorded() {
        let temp_dir = TempDir::new().unwrap();
        let service = UploadService::new(Arc::new(MockPresetApi::new()), signed_in());

        let results = service
            .upload_all(&[temp_dir.path().join("gone.hlx")], |_| {})
            .await
            .unwrap();

        assert!(!results[0].is_success());
    }

    #[tokio::test]
    async fn test_requires_session() {
        let api = Arc::new(MockPresetApi::new());
        let session = Arc::new(SessionState::new(Arc::new(MemoryKeyValueStore::new())));
        let service = UploadService::new(api.clone(), session);

        let err = service
            .upload_all(&[PathBuf::from("x.hlx")], |_| {})
            .await
            .unwrap_err();

        assert!(err.is_unauthorized());
        assert!(api.calls().is_empty());
    }
}
