//! Desktop stand-ins for the native services a mobile host would provide.

use std::io::{self, Write};
use std::path::{Path, PathBuf};
use std::sync::Arc;

use async_trait::async_trait;
use serde_json::{json, Value};
use shell_core::Notice;
use shell_engine::{
    BrowserSurface, ExternalOpener, MediaGallery, Notifier, PermissionGate, PermissionStatus,
    PlatformError, PlatformServices, ShareOptions, ShareSheet,
};
use shell_logging::{shell_debug, shell_info};
use tokio::process::Command;

use super::config::ShellConfig;

pub fn services(config: &ShellConfig) -> PlatformServices {
    let launcher = Arc::new(CommandLauncher {
        program: config.open_command.clone(),
    });
    PlatformServices {
        permissions: Arc::new(GrantedPermissions),
        share: launcher.clone(),
        gallery: Arc::new(DirectoryGallery {
            dir: config.gallery_dir.clone(),
        }),
        opener: launcher,
    }
}

/// Writes one JSON line for the embedding process.
pub fn emit(value: &Value) {
    let mut stdout = io::stdout().lock();
    let _ = writeln!(stdout, "{value}");
    let _ = stdout.flush();
}

/// Desktop file systems need no runtime grant.
struct GrantedPermissions;

#[async_trait]
impl PermissionGate for GrantedPermissions {
    async fn request_media_permission(&self) -> Result<PermissionStatus, PlatformError> {
        Ok(PermissionStatus::Granted)
    }
}

/// Copies images into a picture folder.
struct DirectoryGallery {
    dir: PathBuf,
}

#[async_trait]
impl MediaGallery for DirectoryGallery {
    async fn save(&self, path: &Path) -> Result<(), PlatformError> {
        let name = path
            .file_name()
            .ok_or_else(|| PlatformError::new(format!("{} has no file name", path.display())))?;
        tokio::fs::create_dir_all(&self.dir)
            .await
            .map_err(|e| PlatformError::new(e.to_string()))?;
        let target = self.dir.join(name);
        tokio::fs::copy(path, &target)
            .await
            .map_err(|e| PlatformError::new(e.to_string()))?;
        shell_info!("Copied {:?} into gallery {:?}", path, target);
        Ok(())
    }
}

/// Hands URLs and files to the desktop's default-application launcher.
struct CommandLauncher {
    program: Option<String>,
}

impl CommandLauncher {
    async fn launch(&self, target: &str) -> Result<(), PlatformError> {
        let program = self
            .program
            .as_deref()
            .ok_or_else(|| PlatformError::new("no open command configured"))?;
        let status = Command::new(program)
            .arg(target)
            .status()
            .await
            .map_err(|e| PlatformError::new(format!("{program}: {e}")))?;
        if status.success() {
            Ok(())
        } else {
            Err(PlatformError::new(format!("{program} exited with {status}")))
        }
    }
}

#[async_trait]
impl ExternalOpener for CommandLauncher {
    async fn can_open(&self, _url: &str) -> Result<bool, PlatformError> {
        Ok(self.program.is_some())
    }

    async fn open(&self, url: &str) -> Result<(), PlatformError> {
        self.launch(url).await
    }
}

#[async_trait]
impl ShareSheet for CommandLauncher {
    async fn is_available(&self) -> bool {
        self.program.is_some()
    }

    async fn share(&self, path: &Path, options: &ShareOptions) -> Result<(), PlatformError> {
        shell_debug!(
            "Sharing {:?} (mime={:?}, title={:?})",
            path,
            options.mime_type,
            options.dialog_title
        );
        self.launch(&path.display().to_string()).await
    }
}

/// Forwards surface commands to the embedding process.
pub struct StdoutSurface;

impl BrowserSurface for StdoutSurface {
    fn stop_loading(&mut self) {
        emit(&json!({ "command": "stop_loading" }));
    }

    fn reload(&mut self) {
        emit(&json!({ "command": "reload" }));
    }
}

pub struct StdoutNotifier;

impl Notifier for StdoutNotifier {
    fn notify(&mut self, notice: &Notice) {
        shell_info!("Notice: {}", notice);
        emit(&json!({
            "command": "notice",
            "title": notice.title,
            "message": notice.message,
        }));
    }
}
