use crate::view_model::ShellViewModel;
use crate::ShellFeatures;

/// Which presentational slot the view shell is showing.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub enum ViewPhase {
    #[default]
    Loading,
    Content,
    /// Offline. `reload_on_reconnect` is set when the surface has nothing valid to show.
    NetworkError { reload_on_reconnect: bool },
    /// The origin failed to load while the network was reachable.
    LoadError { description: String },
}

impl ViewPhase {
    pub fn is_error(&self) -> bool {
        matches!(
            self,
            ViewPhase::NetworkError { .. } | ViewPhase::LoadError { .. }
        )
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ShellState {
    phase: ViewPhase,
    connected: bool,
    retry_count: u32,
    features: ShellFeatures,
    dirty: bool,
}

impl Default for ShellState {
    fn default() -> Self {
        Self::new(ShellFeatures::default())
    }
}

impl ShellState {
    /// Starts in `Loading`, assuming the network is up until told otherwise.
    pub fn new(features: ShellFeatures) -> Self {
        Self {
            phase: ViewPhase::Loading,
            connected: true,
            retry_count: 0,
            features,
            dirty: false,
        }
    }

    pub fn phase(&self) -> &ViewPhase {
        &self.phase
    }

    pub fn is_connected(&self) -> bool {
        self.connected
    }

    pub fn retry_count(&self) -> u32 {
        self.retry_count
    }

    pub fn features(&self) -> &ShellFeatures {
        &self.features
    }

    pub fn view(&self) -> ShellViewModel {
        ShellViewModel {
            phase: self.phase.clone(),
            connected: self.connected,
            retry_count: self.retry_count,
            dirty: self.dirty,
        }
    }

    /// Returns whether anything changed since the last call, and clears the flag.
    pub fn consume_dirty(&mut self) -> bool {
        std::mem::take(&mut self.dirty)
    }

    pub(crate) fn set_phase(&mut self, phase: ViewPhase) {
        if self.phase != phase {
            self.phase = phase;
            self.dirty = true;
        }
    }

    pub(crate) fn set_connected(&mut self, connected: bool) {
        if self.connected != connected {
            self.connected = connected;
            self.dirty = true;
        }
    }

    pub(crate) fn bump_retry(&mut self) {
        self.retry_count = self.retry_count.saturating_add(1);
        self.dirty = true;
    }
}
