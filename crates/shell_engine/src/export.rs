use std::path::PathBuf;
use std::sync::atomic::{AtomicU64, Ordering};
use std::time::Duration;

use base64::Engine as _;
use chrono::Utc;
use shell_core::{ExportRequest, Notice};
use shell_logging::{shell_error, shell_info};
use tokio::task::JoinHandle;

use crate::filename::artifact_location;
use crate::persist::{schedule_cleanup, AtomicFileWriter, PersistError};
use crate::platform::{PlatformError, PlatformServices, ShareOptions};
use crate::{EngineEvent, EventSink};

/// How long an exported artifact lives before it is deleted.
pub const DEFAULT_CLEANUP_DELAY: Duration = Duration::from_secs(30);

static NEXT_EXPORT: AtomicU64 = AtomicU64::new(1);

#[derive(Debug, thiserror::Error)]
pub enum ExportError {
    #[error("invalid base64 payload: {0}")]
    Decode(#[from] base64::DecodeError),
    #[error("{0}")]
    Persist(#[from] PersistError),
    #[error("write task failed: {0}")]
    Task(#[from] tokio::task::JoinError),
    #[error("{0}")]
    Share(#[from] PlatformError),
}

/// Result of one export; the cleanup is armed regardless of `result`.
#[derive(Debug)]
pub struct ExportOutcome {
    pub artifact: PathBuf,
    pub cleanup: JoinHandle<()>,
    pub result: Result<(), ExportError>,
}

pub struct FileExportHandler {
    services: PlatformServices,
    cache_dir: PathBuf,
    cleanup_delay: Duration,
}

impl FileExportHandler {
    pub fn new(services: PlatformServices, cache_dir: PathBuf, cleanup_delay: Duration) -> Self {
        Self {
            services,
            cache_dir,
            cleanup_delay,
        }
    }

    /// Writes the page's base64 payload to the cache and opens the share sheet.
    ///
    /// Must be called from within a tokio runtime.
    pub async fn export(&self, request: &ExportRequest, sink: &dyn EventSink) -> ExportOutcome {
        let sequence = NEXT_EXPORT.fetch_add(1, Ordering::Relaxed);
        let (namespace, filename) =
            artifact_location(&request.filename, &request.data, Utc::now(), sequence);
        let dir = self.cache_dir.join("exports").join(namespace);
        let artifact = dir.join(&filename);
        let cleanup = schedule_cleanup(artifact.clone(), self.cleanup_delay);

        let result = self.write_and_share(request, dir, filename, sink).await;
        if let Err(err) = &result {
            shell_error!("File save error for {:?}: {}", artifact, err);
            sink.emit(EngineEvent::Notice(Notice::save_failed(err)));
        }

        ExportOutcome {
            artifact,
            cleanup,
            result,
        }
    }

    async fn write_and_share(
        &self,
        request: &ExportRequest,
        dir: PathBuf,
        filename: String,
        sink: &dyn EventSink,
    ) -> Result<(), ExportError> {
        let bytes = base64::engine::general_purpose::STANDARD.decode(request.data.trim())?;
        let path = tokio::task::spawn_blocking(move || {
            AtomicFileWriter::new(dir).write(&filename, &bytes)
        })
        .await??;
        shell_info!("Wrote {} export to {:?}", request.kind.wire_name(), path);
        sink.emit(EngineEvent::ArtifactExported { path: path.clone() });

        let options = ShareOptions {
            mime_type: Some(request.mime_type().to_string()),
            dialog_title: Some(request.dialog_title().to_string()),
            uti: request.kind.uniform_type_identifier().map(str::to_string),
        };
        self.services.share.share(&path, &options).await?;
        Ok(())
    }
}
