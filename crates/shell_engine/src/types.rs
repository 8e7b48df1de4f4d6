use std::fmt;
use std::path::PathBuf;

use shell_core::Notice;

pub type TaskId = u64;

/// One in-flight download, owned by the handler invocation that created it.
#[derive(Debug, Clone, PartialEq)]
pub struct DownloadTask {
    pub task_id: TaskId,
    pub source_url: String,
    pub destination_path: PathBuf,
    pub bytes_written: u64,
    pub total_bytes: Option<u64>,
    /// Fraction in `[0, 1]`; stays at 0 until the end when the size is unknown.
    pub progress: f64,
}

impl DownloadTask {
    pub fn new(task_id: TaskId, source_url: impl Into<String>, destination_path: PathBuf) -> Self {
        Self {
            task_id,
            source_url: source_url.into(),
            destination_path,
            bytes_written: 0,
            total_bytes: None,
            progress: 0.0,
        }
    }

    pub(crate) fn record(&mut self, bytes_written: u64) {
        self.bytes_written = bytes_written;
        if let Some(total) = self.total_bytes.filter(|total| *total > 0) {
            self.progress = (bytes_written as f64 / total as f64).clamp(0.0, 1.0);
        }
    }

    pub(crate) fn complete(&mut self) {
        self.progress = 1.0;
    }
}

#[derive(Debug, Clone, PartialEq)]
pub enum EngineEvent {
    DownloadProgress(DownloadTask),
    DownloadFinished {
        task_id: TaskId,
        result: Result<PathBuf, String>,
    },
    ArtifactExported {
        path: PathBuf,
    },
    ConnectivityChanged {
        connected: bool,
    },
    /// A handler wants the user told something; shown on the UI thread.
    Notice(Notice),
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FetchMetadata {
    pub original_url: String,
    pub final_url: String,
    pub redirect_count: usize,
    pub content_type: Option<String>,
    pub byte_len: u64,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FetchOutput {
    pub path: PathBuf,
    pub metadata: FetchMetadata,
}

#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
#[error("{kind}: {message}")]
pub struct FetchError {
    pub kind: FailureKind,
    pub message: String,
}

impl FetchError {
    pub(crate) fn new(kind: FailureKind, message: impl Into<String>) -> Self {
        Self {
            kind,
            message: message.into(),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum FailureKind {
    InvalidUrl,
    HttpStatus(u16),
    Timeout,
    RedirectLimitExceeded,
    TooLarge { max_bytes: u64, actual: Option<u64> },
    Network,
    Io,
}

impl fmt::Display for FailureKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            FailureKind::InvalidUrl => write!(f, "invalid url"),
            FailureKind::HttpStatus(code) => write!(f, "http status {code}"),
            FailureKind::Timeout => write!(f, "timeout"),
            FailureKind::RedirectLimitExceeded => write!(f, "redirect limit exceeded"),
            FailureKind::TooLarge { max_bytes, actual } => {
                write!(f, "response too large (max {max_bytes}, actual {actual:?})")
            }
            FailureKind::Network => write!(f, "network error"),
            FailureKind::Io => write!(f, "io error"),
        }
    }
}
