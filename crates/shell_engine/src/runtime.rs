use std::sync::Arc;
use std::time::Duration;

use shell_core::{
    intercept, route_bridge_message, update, Effect, Msg, NavigationEvent, Notice, ShellFeatures,
    ShellState, ShellViewModel,
};
use shell_logging::{shell_debug, shell_info, shell_warn};

use crate::connectivity::{ConnectivityMonitor, ReachabilityProbe};
use crate::platform::{BrowserSurface, Notifier};
use crate::{EngineEvent, EngineHandle};

/// UI-thread half of the shell: owns the view state and turns browser-surface
/// callbacks into effects.
///
/// All methods run on the thread that drives the browser surface; handler
/// work is handed to the [`EngineHandle`].
pub struct ShellRuntime {
    state: ShellState,
    engine: EngineHandle,
    surface: Box<dyn BrowserSurface>,
    notifier: Box<dyn Notifier>,
    connectivity: Option<ConnectivityMonitor>,
}

impl ShellRuntime {
    pub fn new(
        features: ShellFeatures,
        engine: EngineHandle,
        surface: Box<dyn BrowserSurface>,
        notifier: Box<dyn Notifier>,
    ) -> Self {
        Self {
            state: ShellState::new(features),
            engine,
            surface,
            notifier,
            connectivity: None,
        }
    }

    pub fn view(&self) -> ShellViewModel {
        self.state.view()
    }

    /// Pre-navigation hook. Returns whether the surface may load `url`.
    pub fn on_navigation_attempt(&mut self, url: &str) -> bool {
        let interception = intercept(&NavigationEvent::attempt(url), self.state.features());
        if !interception.allow {
            shell_debug!("Vetoed navigation to {}: {:?}", url, interception.decision);
        }
        self.run_effects(interception.effects);
        interception.allow
    }

    /// Post-navigation hook; can only stop the load that is already running.
    pub fn on_navigation_state_change(&mut self, url: &str) {
        let interception = intercept(&NavigationEvent::state_change(url), self.state.features());
        self.run_effects(interception.effects);
    }

    pub fn on_bridge_message(&mut self, text: &str) {
        match route_bridge_message(text, self.state.features()) {
            Ok(effects) => self.run_effects(effects),
            Err(err) => {
                shell_warn!("Rejected bridge message: {}", err);
                self.notifier.notify(&Notice::save_failed(&err));
            }
        }
    }

    /// Applies a view-shell message. Returns whether the view changed.
    pub fn dispatch(&mut self, msg: Msg) -> bool {
        let state = std::mem::take(&mut self.state);
        let (mut state, effects) = update(state, msg);
        let dirty = state.consume_dirty();
        self.state = state;
        self.run_effects(effects);
        dirty
    }

    /// Subscribes to connectivity changes for the lifetime of the view.
    pub fn watch_connectivity(&mut self, probe: Arc<dyn ReachabilityProbe>, interval: Duration) {
        self.connectivity = Some(self.engine.watch_connectivity(probe, interval));
    }

    /// Drops the connectivity subscription.
    pub fn teardown(&mut self) {
        if self.connectivity.take().is_some() {
            shell_info!("Connectivity subscription released");
        }
    }

    /// Drains engine events on the UI thread. Returns whether the view changed.
    pub fn pump_events(&mut self) -> bool {
        let mut dirty = false;
        while let Some(event) = self.engine.try_recv() {
            match event {
                EngineEvent::ConnectivityChanged { connected } => {
                    dirty |= self.dispatch(Msg::ConnectivityChanged { connected });
                }
                EngineEvent::Notice(notice) => self.notifier.notify(&notice),
                EngineEvent::DownloadProgress(task) => {
                    shell_debug!(
                        "Download {} at {:.0}% ({} bytes)",
                        task.task_id,
                        task.progress * 100.0,
                        task.bytes_written
                    );
                }
                EngineEvent::DownloadFinished { task_id, result } => match result {
                    Ok(path) => shell_info!("Download {} finished at {:?}", task_id, path),
                    Err(reason) => shell_warn!("Download {} did not complete: {}", task_id, reason),
                },
                EngineEvent::ArtifactExported { path } => {
                    shell_debug!("Export artifact ready at {:?}", path);
                }
            }
        }
        dirty
    }

    fn run_effects(&mut self, effects: Vec<Effect>) {
        for effect in effects {
            match effect {
                Effect::StopLoading => self.surface.stop_loading(),
                Effect::Reload => {
                    shell_info!("Reloading (retry {})", self.state.retry_count());
                    self.surface.reload();
                }
                Effect::StartDownload { url } => {
                    let task_id = self.engine.download(url.as_str());
                    shell_info!("StartDownload task_id={} url={}", task_id, url);
                }
                Effect::OpenExternally { url } => self.engine.open_external(url),
                Effect::ExportArtifact(request) => {
                    shell_info!(
                        "ExportArtifact kind={} filename={}",
                        request.kind.wire_name(),
                        request.filename
                    );
                    self.engine.export(request);
                }
                Effect::Notify(notice) => self.notifier.notify(&notice),
            }
        }
    }
}
