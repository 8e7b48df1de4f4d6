use std::path::PathBuf;
use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::{mpsc, Arc};
use std::thread;
use std::time::Duration;

use shell_core::ExportRequest;
use shell_logging::shell_debug;

use crate::connectivity::{ConnectivityMonitor, ReachabilityProbe};
use crate::download::DownloadHandler;
use crate::export::{FileExportHandler, DEFAULT_CLEANUP_DELAY};
use crate::external::open_external;
use crate::fetch::{ChannelEventSink, Downloader, FetchSettings, ReqwestDownloader};
use crate::platform::{ExternalOpener, PlatformServices};
use crate::{EngineEvent, TaskId};

#[derive(Debug, Clone)]
pub struct EngineConfig {
    /// Destination for downloads.
    pub documents_dir: PathBuf,
    /// Scratch space for export artifacts.
    pub cache_dir: PathBuf,
    pub cleanup_delay: Duration,
    pub require_permission: bool,
    pub fetch: FetchSettings,
}

impl EngineConfig {
    pub fn default_with_dirs(documents_dir: PathBuf, cache_dir: PathBuf) -> Self {
        Self {
            documents_dir,
            cache_dir,
            cleanup_delay: DEFAULT_CLEANUP_DELAY,
            require_permission: true,
            fetch: FetchSettings::default(),
        }
    }
}

#[derive(Debug, thiserror::Error)]
pub enum EngineError {
    #[error("failed to start engine runtime: {0}")]
    Runtime(#[from] std::io::Error),
}

enum EngineCommand {
    Download { task_id: TaskId, url: String },
    Export(ExportRequest),
    OpenExternal { url: String },
}

struct Handlers {
    downloads: DownloadHandler,
    exports: FileExportHandler,
    opener: Arc<dyn ExternalOpener>,
}

/// Runs handlers on a background tokio runtime and reports back over a channel.
///
/// Work is fire-and-forget: nothing started here can be cancelled, and a
/// dropped handle abandons whatever is still pending.
pub struct EngineHandle {
    cmd_tx: mpsc::Sender<EngineCommand>,
    event_tx: mpsc::Sender<EngineEvent>,
    event_rx: mpsc::Receiver<EngineEvent>,
    runtime: tokio::runtime::Handle,
    next_task_id: AtomicU64,
}

impl EngineHandle {
    pub fn new(config: EngineConfig, services: PlatformServices) -> Result<Self, EngineError> {
        let downloader = Arc::new(ReqwestDownloader::new(config.fetch.clone()));
        Self::with_downloader(config, services, downloader)
    }

    pub fn with_downloader(
        config: EngineConfig,
        services: PlatformServices,
        downloader: Arc<dyn Downloader>,
    ) -> Result<Self, EngineError> {
        let (cmd_tx, cmd_rx) = mpsc::channel();
        let (event_tx, event_rx) = mpsc::channel();

        let runtime = tokio::runtime::Builder::new_multi_thread()
            .enable_all()
            .thread_name("shell-engine-worker")
            .build()?;
        let runtime_handle = runtime.handle().clone();

        let handlers = Arc::new(Handlers {
            downloads: DownloadHandler::new(
                downloader,
                services.clone(),
                config.documents_dir,
                config.require_permission,
            ),
            exports: FileExportHandler::new(
                services.clone(),
                config.cache_dir,
                config.cleanup_delay,
            ),
            opener: services.opener,
        });

        let worker_events = event_tx.clone();
        thread::Builder::new()
            .name("shell-engine".to_string())
            .spawn(move || {
                while let Ok(command) = cmd_rx.recv() {
                    let handlers = handlers.clone();
                    let event_tx = worker_events.clone();
                    runtime.spawn(async move {
                        handle_command(handlers.as_ref(), command, event_tx).await;
                    });
                }
                shell_debug!("Engine command channel closed");
            })?;

        Ok(Self {
            cmd_tx,
            event_tx,
            event_rx,
            runtime: runtime_handle,
            next_task_id: AtomicU64::new(1),
        })
    }

    pub fn download(&self, url: impl Into<String>) -> TaskId {
        let task_id = self.next_task_id.fetch_add(1, Ordering::Relaxed);
        let _ = self.cmd_tx.send(EngineCommand::Download {
            task_id,
            url: url.into(),
        });
        task_id
    }

    pub fn export(&self, request: ExportRequest) {
        let _ = self.cmd_tx.send(EngineCommand::Export(request));
    }

    pub fn open_external(&self, url: impl Into<String>) {
        let _ = self
            .cmd_tx
            .send(EngineCommand::OpenExternal { url: url.into() });
    }

    pub fn try_recv(&self) -> Option<EngineEvent> {
        self.event_rx.try_recv().ok()
    }

    /// Starts a connectivity subscription that reports into this engine's event stream.
    pub fn watch_connectivity(
        &self,
        probe: Arc<dyn ReachabilityProbe>,
        interval: Duration,
    ) -> ConnectivityMonitor {
        let sink = Arc::new(ChannelEventSink::new(self.event_tx.clone()));
        ConnectivityMonitor::spawn(&self.runtime, probe, interval, sink)
    }
}

async fn handle_command(
    handlers: &Handlers,
    command: EngineCommand,
    event_tx: mpsc::Sender<EngineEvent>,
) {
    let sink = ChannelEventSink::new(event_tx);
    match command {
        EngineCommand::Download { task_id, url } => {
            let _ = handlers.downloads.download(task_id, &url, &sink).await;
        }
        EngineCommand::Export(request) => {
            // The cleanup task keeps running on its own; nothing waits for it.
            let _ = handlers.exports.export(&request, &sink).await;
        }
        EngineCommand::OpenExternal { url } => {
            let _ = open_external(handlers.opener.as_ref(), &url, &sink).await;
        }
    }
}
