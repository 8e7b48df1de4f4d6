use std::path::Path;
use std::sync::{
    atomic::{AtomicUsize, Ordering},
    Arc,
};
use std::time::Duration;

use futures_util::StreamExt;
use reqwest::header::CONTENT_TYPE;
use shell_logging::{shell_debug, shell_info};
use tokio::io::AsyncWriteExt;

use crate::persist::remove_artifact;
use crate::{
    DownloadTask, EngineEvent, FailureKind, FetchError, FetchMetadata, FetchOutput, TaskId,
};

#[derive(Debug, Clone)]
pub struct FetchSettings {
    pub connect_timeout: Duration,
    pub request_timeout: Duration,
    pub redirect_limit: usize,
    /// `None` accepts any size.
    pub max_bytes: Option<u64>,
    pub user_agent: Option<String>,
}

impl Default for FetchSettings {
    fn default() -> Self {
        Self {
            connect_timeout: Duration::from_secs(10),
            request_timeout: Duration::from_secs(300),
            redirect_limit: 5,
            max_bytes: None,
            user_agent: None,
        }
    }
}

pub trait EventSink: Send + Sync {
    fn emit(&self, event: EngineEvent);
}

pub struct ChannelEventSink {
    tx: std::sync::mpsc::Sender<EngineEvent>,
}

impl ChannelEventSink {
    pub fn new(tx: std::sync::mpsc::Sender<EngineEvent>) -> Self {
        Self { tx }
    }
}

impl EventSink for ChannelEventSink {
    fn emit(&self, event: EngineEvent) {
        let _ = self.tx.send(event);
    }
}

/// Streams a remote resource into a local file.
#[async_trait::async_trait]
pub trait Downloader: Send + Sync {
    async fn download(
        &self,
        task_id: TaskId,
        url: &str,
        destination: &Path,
        sink: &dyn EventSink,
    ) -> Result<FetchOutput, FetchError>;
}

#[derive(Debug, Clone)]
pub struct ReqwestDownloader {
    settings: FetchSettings,
}

impl ReqwestDownloader {
    pub fn new(settings: FetchSettings) -> Self {
        Self { settings }
    }

    fn build_client(
        &self,
        redirect_counter: Arc<AtomicUsize>,
    ) -> Result<reqwest::Client, FetchError> {
        let redirect_limit = self.settings.redirect_limit;
        let policy = reqwest::redirect::Policy::custom(move |attempt| {
            let count = attempt.previous().len();
            redirect_counter.store(count, Ordering::Relaxed);
            if count >= redirect_limit {
                attempt.error("redirect limit exceeded")
            } else {
                attempt.follow()
            }
        });

        let mut builder = reqwest::Client::builder()
            .connect_timeout(self.settings.connect_timeout)
            .timeout(self.settings.request_timeout)
            .redirect(policy);
        if let Some(agent) = &self.settings.user_agent {
            builder = builder.user_agent(agent.clone());
        }
        builder
            .build()
            .map_err(|err| FetchError::new(FailureKind::Network, err.to_string()))
    }

    fn check_size(&self, actual: u64) -> Result<(), FetchError> {
        match self.settings.max_bytes {
            Some(max_bytes) if actual > max_bytes => Err(FetchError::new(
                FailureKind::TooLarge {
                    max_bytes,
                    actual: Some(actual),
                },
                "response too large",
            )),
            _ => Ok(()),
        }
    }

    async fn stream_to_file(
        &self,
        response: reqwest::Response,
        task: &mut DownloadTask,
        sink: &dyn EventSink,
    ) -> Result<u64, FetchError> {
        let mut file = tokio::fs::File::create(&task.destination_path)
            .await
            .map_err(io_error)?;

        sink.emit(EngineEvent::DownloadProgress(task.clone()));

        let mut written: u64 = 0;
        let mut stream = response.bytes_stream();
        while let Some(chunk) = stream.next().await {
            let chunk = chunk.map_err(map_reqwest_error)?;
            let next_len = written + chunk.len() as u64;
            self.check_size(next_len)?;
            file.write_all(&chunk).await.map_err(io_error)?;
            written = next_len;
            task.record(written);
            shell_debug!(
                "Download {} progress: {}%",
                task.task_id,
                (task.progress * 100.0).round()
            );
            sink.emit(EngineEvent::DownloadProgress(task.clone()));
        }
        file.flush().await.map_err(io_error)?;
        Ok(written)
    }
}

#[async_trait::async_trait]
impl Downloader for ReqwestDownloader {
    async fn download(
        &self,
        task_id: TaskId,
        url: &str,
        destination: &Path,
        sink: &dyn EventSink,
    ) -> Result<FetchOutput, FetchError> {
        let parsed = reqwest::Url::parse(url)
            .map_err(|err| FetchError::new(FailureKind::InvalidUrl, err.to_string()))?;
        let redirect_counter = Arc::new(AtomicUsize::new(0));
        let client = self.build_client(redirect_counter.clone())?;

        let response = client
            .get(parsed)
            .send()
            .await
            .map_err(map_reqwest_error)?;

        let status = response.status();
        if !status.is_success() {
            return Err(FetchError::new(
                FailureKind::HttpStatus(status.as_u16()),
                status.to_string(),
            ));
        }

        let content_length = response.content_length();
        if let Some(content_len) = content_length {
            self.check_size(content_len)?;
        }

        let final_url = response.url().to_string();
        let content_type = response
            .headers()
            .get(CONTENT_TYPE)
            .and_then(|value| value.to_str().ok())
            .map(|value| value.to_string());

        let mut task = DownloadTask::new(task_id, url, destination.to_path_buf());
        task.total_bytes = content_length;

        let byte_len = match self.stream_to_file(response, &mut task, sink).await {
            Ok(written) => written,
            Err(err) => {
                // Leave nothing half-written behind.
                if let Err(cleanup) = remove_artifact(destination) {
                    shell_debug!(
                        "Could not remove partial download {:?}: {}",
                        destination,
                        cleanup
                    );
                }
                return Err(err);
            }
        };

        task.complete();
        sink.emit(EngineEvent::DownloadProgress(task));
        shell_info!("Finished downloading {} to {:?}", url, destination);

        Ok(FetchOutput {
            path: destination.to_path_buf(),
            metadata: FetchMetadata {
                original_url: url.to_string(),
                final_url,
                redirect_count: redirect_counter.load(Ordering::Relaxed),
                content_type,
                byte_len,
            },
        })
    }
}

fn map_reqwest_error(err: reqwest::Error) -> FetchError {
    if err.is_timeout() {
        return FetchError::new(FailureKind::Timeout, err.to_string());
    }
    if err.is_redirect() {
        return FetchError::new(FailureKind::RedirectLimitExceeded, err.to_string());
    }
    FetchError::new(FailureKind::Network, err.to_string())
}

fn io_error(err: std::io::Error) -> FetchError {
    FetchError::new(FailureKind::Io, err.to_string())
}
