#![allow(dead_code)]

use std::collections::VecDeque;
use std::fs;
use std::path::{Path, PathBuf};
use std::sync::{Arc, Mutex};

use async_trait::async_trait;
use shell_core::Notice;
use shell_engine::{
    EngineEvent, EventSink, ExternalOpener, MediaGallery, PermissionGate, PermissionStatus,
    PlatformError, PlatformServices, ReachabilityProbe, ShareOptions, ShareSheet,
};

pub fn init_logging() {
    shell_logging::initialize_for_tests();
}

#[derive(Default)]
pub struct RecordingSink {
    events: Mutex<Vec<EngineEvent>>,
}

impl RecordingSink {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn take(&self) -> Vec<EngineEvent> {
        self.events.lock().unwrap().drain(..).collect()
    }

    pub fn notices(&self) -> Vec<Notice> {
        self.events
            .lock()
            .unwrap()
            .iter()
            .filter_map(|event| match event {
                EngineEvent::Notice(notice) => Some(notice.clone()),
                _ => None,
            })
            .collect()
    }
}

impl EventSink for RecordingSink {
    fn emit(&self, event: EngineEvent) {
        self.events.lock().unwrap().push(event);
    }
}

pub struct FakePermissions {
    pub status: PermissionStatus,
    pub requests: Mutex<usize>,
}

#[async_trait]
impl PermissionGate for FakePermissions {
    async fn request_media_permission(&self) -> Result<PermissionStatus, PlatformError> {
        *self.requests.lock().unwrap() += 1;
        Ok(self.status)
    }
}

/// What the share sheet saw, captured before any cleanup can remove the file.
#[derive(Debug, Clone)]
pub struct SharedFile {
    pub path: PathBuf,
    pub options: ShareOptions,
    pub contents: Option<Vec<u8>>,
}

pub struct FakeShare {
    pub available: bool,
    pub fail_with: Option<String>,
    pub shared: Mutex<Vec<SharedFile>>,
}

#[async_trait]
impl ShareSheet for FakeShare {
    async fn is_available(&self) -> bool {
        self.available
    }

    async fn share(&self, path: &Path, options: &ShareOptions) -> Result<(), PlatformError> {
        self.shared.lock().unwrap().push(SharedFile {
            path: path.to_path_buf(),
            options: options.clone(),
            contents: fs::read(path).ok(),
        });
        match &self.fail_with {
            Some(message) => Err(PlatformError::new(message.clone())),
            None => Ok(()),
        }
    }
}

#[derive(Default)]
pub struct FakeGallery {
    pub saved: Mutex<Vec<PathBuf>>,
}

#[async_trait]
impl MediaGallery for FakeGallery {
    async fn save(&self, path: &Path) -> Result<(), PlatformError> {
        self.saved.lock().unwrap().push(path.to_path_buf());
        Ok(())
    }
}

pub struct FakeOpener {
    pub can_open: Result<bool, PlatformError>,
    pub opened: Mutex<Vec<String>>,
}

#[async_trait]
impl ExternalOpener for FakeOpener {
    async fn can_open(&self, _url: &str) -> Result<bool, PlatformError> {
        self.can_open.clone()
    }

    async fn open(&self, url: &str) -> Result<(), PlatformError> {
        self.opened.lock().unwrap().push(url.to_string());
        Ok(())
    }
}

pub struct Fakes {
    pub permissions: Arc<FakePermissions>,
    pub share: Arc<FakeShare>,
    pub gallery: Arc<FakeGallery>,
    pub opener: Arc<FakeOpener>,
}

impl Fakes {
    pub fn new() -> Self {
        Self {
            permissions: Arc::new(FakePermissions {
                status: PermissionStatus::Granted,
                requests: Mutex::new(0),
            }),
            share: Arc::new(FakeShare {
                available: true,
                fail_with: None,
                shared: Mutex::new(Vec::new()),
            }),
            gallery: Arc::new(FakeGallery::default()),
            opener: Arc::new(FakeOpener {
                can_open: Ok(true),
                opened: Mutex::new(Vec::new()),
            }),
        }
    }

    pub fn deny_permission(mut self) -> Self {
        self.permissions = Arc::new(FakePermissions {
            status: PermissionStatus::Denied,
            requests: Mutex::new(0),
        });
        self
    }

    pub fn with_share(mut self, available: bool, fail_with: Option<&str>) -> Self {
        self.share = Arc::new(FakeShare {
            available,
            fail_with: fail_with.map(str::to_string),
            shared: Mutex::new(Vec::new()),
        });
        self
    }

    pub fn with_opener(mut self, can_open: Result<bool, PlatformError>) -> Self {
        self.opener = Arc::new(FakeOpener {
            can_open,
            opened: Mutex::new(Vec::new()),
        });
        self
    }

    pub fn services(&self) -> PlatformServices {
        PlatformServices {
            permissions: self.permissions.clone(),
            share: self.share.clone(),
            gallery: self.gallery.clone(),
            opener: self.opener.clone(),
        }
    }

    pub fn shared(&self) -> Vec<SharedFile> {
        self.share.shared.lock().unwrap().clone()
    }

    pub fn saved_to_gallery(&self) -> Vec<PathBuf> {
        self.gallery.saved.lock().unwrap().clone()
    }

    pub fn opened(&self) -> Vec<String> {
        self.opener.opened.lock().unwrap().clone()
    }
}

/// Replays a fixed sequence of reachability answers, then repeats the last one.
pub struct ScriptedProbe {
    answers: Mutex<VecDeque<bool>>,
    last: Mutex<bool>,
}

impl ScriptedProbe {
    pub fn new(answers: &[bool]) -> Self {
        Self {
            answers: Mutex::new(answers.iter().copied().collect()),
            last: Mutex::new(true),
        }
    }
}

#[async_trait]
impl ReachabilityProbe for ScriptedProbe {
    async fn is_reachable(&self) -> bool {
        let mut last = self.last.lock().unwrap();
        if let Some(next) = self.answers.lock().unwrap().pop_front() {
            *last = next;
        }
        *last
    }
}
