#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Msg {
    /// Browser surface began loading the origin.
    LoadStarted,
    /// Browser surface finished loading.
    LoadFinished,
    /// Browser surface reported a failed load.
    LoadFailed { description: String },
    /// Connectivity subscription reported reachability.
    ConnectivityChanged { connected: bool },
    /// User pressed retry on an error screen.
    RetryClicked,
}
