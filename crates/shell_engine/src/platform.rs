//! Seams to the host platform's native services.
//!
//! Async services run on the engine runtime and must be `Send + Sync`;
//! [`BrowserSurface`] and [`Notifier`] are only touched from the UI thread.

use std::path::Path;
use std::sync::Arc;

use async_trait::async_trait;
use shell_core::Notice;
use thiserror::Error;

#[derive(Debug, Clone, PartialEq, Eq, Error)]
#[error("{0}")]
pub struct PlatformError(pub String);

impl PlatformError {
    pub fn new(message: impl Into<String>) -> Self {
        Self(message.into())
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PermissionStatus {
    Granted,
    Denied,
}

#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct ShareOptions {
    pub mime_type: Option<String>,
    pub dialog_title: Option<String>,
    /// Uniform type identifier, for platforms that key share targets on it.
    pub uti: Option<String>,
}

#[async_trait]
pub trait PermissionGate: Send + Sync {
    /// Asks for media/storage access. Platforms that need none return `Granted`.
    async fn request_media_permission(&self) -> Result<PermissionStatus, PlatformError>;
}

#[async_trait]
pub trait ShareSheet: Send + Sync {
    async fn is_available(&self) -> bool;
    async fn share(&self, path: &Path, options: &ShareOptions) -> Result<(), PlatformError>;
}

#[async_trait]
pub trait MediaGallery: Send + Sync {
    async fn save(&self, path: &Path) -> Result<(), PlatformError>;
}

#[async_trait]
pub trait ExternalOpener: Send + Sync {
    async fn can_open(&self, url: &str) -> Result<bool, PlatformError>;
    async fn open(&self, url: &str) -> Result<(), PlatformError>;
}

pub trait BrowserSurface {
    fn stop_loading(&mut self);
    fn reload(&mut self);
}

pub trait Notifier {
    fn notify(&mut self, notice: &Notice);
}

/// Native services handed to the engine's handlers.
#[derive(Clone)]
pub struct PlatformServices {
    pub permissions: Arc<dyn PermissionGate>,
    pub share: Arc<dyn ShareSheet>,
    pub gallery: Arc<dyn MediaGallery>,
    pub opener: Arc<dyn ExternalOpener>,
}
