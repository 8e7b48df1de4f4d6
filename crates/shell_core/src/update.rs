use crate::{Effect, Msg, ShellState, ViewPhase};

/// Pure update function: applies a message to state and returns any effects.
pub fn update(mut state: ShellState, msg: Msg) -> (ShellState, Vec<Effect>) {
    let effects = match msg {
        Msg::LoadStarted => {
            // Offline keeps the network error screen until connectivity returns.
            if state.is_connected() {
                state.set_phase(ViewPhase::Loading);
            }
            Vec::new()
        }
        Msg::LoadFinished => {
            if *state.phase() == ViewPhase::Loading {
                state.set_phase(ViewPhase::Content);
            }
            Vec::new()
        }
        Msg::LoadFailed { description } => {
            if state.is_connected() {
                state.set_phase(ViewPhase::LoadError { description });
            } else {
                state.set_phase(ViewPhase::NetworkError {
                    reload_on_reconnect: true,
                });
            }
            Vec::new()
        }
        Msg::ConnectivityChanged { connected } => {
            if connected == state.is_connected() {
                return (state, Vec::new());
            }
            state.set_connected(connected);
            if connected {
                match state.phase() {
                    ViewPhase::NetworkError {
                        reload_on_reconnect: true,
                    } => retry(&mut state),
                    ViewPhase::NetworkError {
                        reload_on_reconnect: false,
                    } => {
                        state.set_phase(ViewPhase::Content);
                        Vec::new()
                    }
                    _ => Vec::new(),
                }
            } else {
                let reload_on_reconnect = match state.phase() {
                    ViewPhase::Content => false,
                    ViewPhase::NetworkError {
                        reload_on_reconnect,
                    } => *reload_on_reconnect,
                    ViewPhase::Loading | ViewPhase::LoadError { .. } => true,
                };
                state.set_phase(ViewPhase::NetworkError {
                    reload_on_reconnect,
                });
                Vec::new()
            }
        }
        Msg::RetryClicked => {
            if state.phase().is_error() {
                retry(&mut state)
            } else {
                Vec::new()
            }
        }
    };

    (state, effects)
}

/// Shared by the retry button and reconnect: clear the error, count, reload.
fn retry(state: &mut ShellState) -> Vec<Effect> {
    state.bump_retry();
    if state.is_connected() {
        state.set_phase(ViewPhase::Loading);
    } else {
        state.set_phase(ViewPhase::NetworkError {
            reload_on_reconnect: true,
        });
    }
    vec![Effect::Reload]
}
