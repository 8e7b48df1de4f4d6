//! Web shell engine: native handlers and effect execution.
mod connectivity;
mod download;
mod engine;
mod export;
mod external;
mod fetch;
mod filename;
mod persist;
mod platform;
mod runtime;
mod types;

pub use connectivity::{ConnectivityMonitor, ReachabilityProbe, TcpProbe};
pub use download::{DownloadError, DownloadHandler, DownloadOutcome};
pub use engine::{EngineConfig, EngineError, EngineHandle};
pub use export::{ExportError, ExportOutcome, FileExportHandler, DEFAULT_CLEANUP_DELAY};
pub use external::{open_external, ExternalOutcome};
pub use fetch::{ChannelEventSink, Downloader, EventSink, FetchSettings, ReqwestDownloader};
pub use filename::{artifact_location, download_filename, sanitize_filename};
pub use persist::{
    ensure_output_dir, remove_artifact, schedule_cleanup, AtomicFileWriter, PersistError,
};
pub use platform::{
    BrowserSurface, ExternalOpener, MediaGallery, Notifier, PermissionGate, PermissionStatus,
    PlatformError, PlatformServices, ShareOptions, ShareSheet,
};
pub use runtime::ShellRuntime;
pub use types::{
    DownloadTask, EngineEvent, FailureKind, FetchError, FetchMetadata, FetchOutput, TaskId,
};
