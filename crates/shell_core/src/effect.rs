use crate::{ExportRequest, Notice};

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Effect {
    /// Stop the browser surface's in-flight load.
    StopLoading,
    /// Reload the browser surface.
    Reload,
    StartDownload { url: String },
    OpenExternally { url: String },
    ExportArtifact(ExportRequest),
    Notify(Notice),
}
