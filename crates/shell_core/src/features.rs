use serde::{Deserialize, Serialize};

/// Per-deployment switches for the optional parts of the shell.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct ShellFeatures {
    /// Ask for media/storage permission before downloading.
    pub permissions: bool,
    /// Hand external-app schemes to the platform opener.
    pub external_links: bool,
    /// Intercept document/media URLs and blob links.
    pub downloads: bool,
    /// Accept file export messages from page script.
    pub bridge: bool,
}

impl Default for ShellFeatures {
    fn default() -> Self {
        Self {
            permissions: true,
            external_links: true,
            downloads: true,
            bridge: true,
        }
    }
}

impl ShellFeatures {
    /// Plain browser surface: every navigation loads in-view and page messages are ignored.
    pub fn passthrough() -> Self {
        Self {
            permissions: false,
            external_links: false,
            downloads: false,
            bridge: false,
        }
    }
}
