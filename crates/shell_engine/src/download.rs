use std::path::PathBuf;
use std::sync::Arc;

use chrono::Utc;
use shell_core::{is_image_filename, Notice};
use shell_logging::{shell_error, shell_info, shell_warn};
use thiserror::Error;

use crate::filename::download_filename;
use crate::persist::{ensure_output_dir, PersistError};
use crate::platform::{PermissionStatus, PlatformError, PlatformServices, ShareOptions};
use crate::{Downloader, EngineEvent, EventSink, FetchError, TaskId};

#[derive(Debug, Error)]
pub enum DownloadError {
    #[error("download failed: {0}")]
    Fetch(#[from] FetchError),
    #[error("documents directory unavailable: {0}")]
    Persist(#[from] PersistError),
    #[error("platform error: {0}")]
    Platform(#[from] PlatformError),
}

/// Where a finished download ended up.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum DownloadOutcome {
    PermissionDenied,
    SavedToGallery(PathBuf),
    Shared(PathBuf),
    /// No share mechanism; the user was told the local path.
    Stored(PathBuf),
}

pub struct DownloadHandler {
    downloader: Arc<dyn Downloader>,
    services: PlatformServices,
    documents_dir: PathBuf,
    require_permission: bool,
}

impl DownloadHandler {
    pub fn new(
        downloader: Arc<dyn Downloader>,
        services: PlatformServices,
        documents_dir: PathBuf,
        require_permission: bool,
    ) -> Self {
        Self {
            downloader,
            services,
            documents_dir,
            require_permission,
        }
    }

    /// Downloads `url` and hands the file to the gallery or share sheet.
    ///
    /// Every failure is logged and reported to the user through `sink`; the
    /// result is returned for observation only.
    pub async fn download(
        &self,
        task_id: TaskId,
        url: &str,
        sink: &dyn EventSink,
    ) -> Result<DownloadOutcome, DownloadError> {
        let result = self.run(task_id, url, sink).await;
        let finished = match &result {
            Ok(DownloadOutcome::PermissionDenied) => Err("permission denied".to_string()),
            Ok(
                DownloadOutcome::SavedToGallery(path)
                | DownloadOutcome::Shared(path)
                | DownloadOutcome::Stored(path),
            ) => Ok(path.clone()),
            Err(err) => {
                shell_error!("Download failed for {}: {}", url, err);
                sink.emit(EngineEvent::Notice(Notice::download_failed()));
                Err(err.to_string())
            }
        };
        sink.emit(EngineEvent::DownloadFinished {
            task_id,
            result: finished,
        });
        result
    }

    async fn run(
        &self,
        task_id: TaskId,
        url: &str,
        sink: &dyn EventSink,
    ) -> Result<DownloadOutcome, DownloadError> {
        if self.require_permission {
            let status = self.services.permissions.request_media_permission().await?;
            if status == PermissionStatus::Denied {
                shell_warn!("Storage permission denied; skipping download of {}", url);
                sink.emit(EngineEvent::Notice(Notice::permission_required()));
                return Ok(DownloadOutcome::PermissionDenied);
            }
        }

        sink.emit(EngineEvent::Notice(Notice::download_started()));

        let filename = download_filename(url, Utc::now());
        ensure_output_dir(&self.documents_dir)?;
        let destination = self.documents_dir.join(&filename);
        shell_info!("Downloading {} to {:?}", url, destination);

        let output = self
            .downloader
            .download(task_id, url, &destination, sink)
            .await?;
        let path = output.path;

        if is_image_filename(&filename) {
            self.services.gallery.save(&path).await?;
            sink.emit(EngineEvent::Notice(Notice::image_saved()));
            return Ok(DownloadOutcome::SavedToGallery(path));
        }

        if self.services.share.is_available().await {
            let options = ShareOptions {
                mime_type: output.metadata.content_type.clone(),
                ..ShareOptions::default()
            };
            self.services.share.share(&path, &options).await?;
            return Ok(DownloadOutcome::Shared(path));
        }

        sink.emit(EngineEvent::Notice(Notice::file_downloaded(
            &path.display().to_string(),
        )));
        Ok(DownloadOutcome::Stored(path))
    }
}
