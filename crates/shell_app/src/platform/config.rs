use std::fs;
use std::path::{Path, PathBuf};
use std::time::Duration;

use anyhow::Context;
use serde::{Deserialize, Serialize};
use shell_core::ShellFeatures;
use shell_engine::{EngineConfig, FetchSettings};

use super::logging::LogTarget;

/// Host configuration, read from a RON file. Missing fields take defaults.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct ShellConfig {
    /// Page the surface loads on start; its host is also the connectivity probe target.
    pub origin_url: String,
    pub user_agent: Option<String>,
    pub features: ShellFeatures,
    pub documents_dir: PathBuf,
    pub cache_dir: PathBuf,
    pub gallery_dir: PathBuf,
    /// Program that opens URLs and files with the desktop's default handler.
    pub open_command: Option<String>,
    pub cleanup_delay_secs: u64,
    pub connectivity_poll_secs: u64,
    pub log_destination: LogTarget,
    pub log_level: String,
    pub fetch: FetchConfig,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct FetchConfig {
    pub connect_timeout_secs: u64,
    pub request_timeout_secs: u64,
    pub redirect_limit: usize,
    pub max_bytes: Option<u64>,
}

impl Default for FetchConfig {
    fn default() -> Self {
        let settings = FetchSettings::default();
        Self {
            connect_timeout_secs: settings.connect_timeout.as_secs(),
            request_timeout_secs: settings.request_timeout.as_secs(),
            redirect_limit: settings.redirect_limit,
            max_bytes: settings.max_bytes,
        }
    }
}

impl Default for ShellConfig {
    fn default() -> Self {
        let data_dir = PathBuf::from("shell-data");
        Self {
            origin_url: "https://example.com/".to_string(),
            user_agent: None,
            features: ShellFeatures::default(),
            documents_dir: data_dir.join("documents"),
            cache_dir: data_dir.join("cache"),
            gallery_dir: data_dir.join("gallery"),
            open_command: Some(default_open_command().to_string()),
            cleanup_delay_secs: 30,
            connectivity_poll_secs: 5,
            log_destination: LogTarget::default(),
            log_level: "info".to_string(),
            fetch: FetchConfig::default(),
        }
    }
}

fn default_open_command() -> &'static str {
    if cfg!(target_os = "macos") {
        "open"
    } else if cfg!(target_os = "windows") {
        "explorer"
    } else {
        "xdg-open"
    }
}

impl ShellConfig {
    /// Reads `path`, or returns the defaults when no path is given.
    pub fn load(path: Option<&Path>) -> anyhow::Result<Self> {
        let Some(path) = path else {
            return Ok(Self::default());
        };
        let text = fs::read_to_string(path)
            .with_context(|| format!("failed to read config {}", path.display()))?;
        Self::parse(&text).with_context(|| format!("invalid config {}", path.display()))
    }

    pub fn parse(text: &str) -> anyhow::Result<Self> {
        let config: Self = ron::from_str(text)?;
        anyhow::ensure!(
            url::Url::parse(&config.origin_url).is_ok(),
            "origin_url {:?} is not an absolute URL",
            config.origin_url
        );
        anyhow::ensure!(
            config.connectivity_poll_secs > 0,
            "connectivity_poll_secs must be positive"
        );
        Ok(config)
    }

    pub fn connectivity_poll(&self) -> Duration {
        Duration::from_secs(self.connectivity_poll_secs)
    }

    pub fn engine_config(&self) -> EngineConfig {
        let mut engine =
            EngineConfig::default_with_dirs(self.documents_dir.clone(), self.cache_dir.clone());
        engine.cleanup_delay = Duration::from_secs(self.cleanup_delay_secs);
        engine.require_permission = self.features.permissions;
        engine.fetch = FetchSettings {
            connect_timeout: Duration::from_secs(self.fetch.connect_timeout_secs),
            request_timeout: Duration::from_secs(self.fetch.request_timeout_secs),
            redirect_limit: self.fetch.redirect_limit,
            max_bytes: self.fetch.max_bytes,
            user_agent: self.user_agent.clone(),
        };
        engine
    }
}
