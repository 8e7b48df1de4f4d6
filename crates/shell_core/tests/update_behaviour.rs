use std::sync::Once;

use shell_core::{update, Effect, Msg, ShellState, ViewPhase};

fn init_logging() {
    static INIT: Once = Once::new();
    INIT.call_once(shell_logging::initialize_for_tests);
}

fn apply(state: ShellState, msgs: Vec<Msg>) -> (ShellState, Vec<Effect>) {
    let mut all = Vec::new();
    let mut state = state;
    for msg in msgs {
        let (next, effects) = update(state, msg);
        state = next;
        all.extend(effects);
    }
    (state, all)
}

fn connectivity(connected: bool) -> Msg {
    Msg::ConnectivityChanged { connected }
}

fn load_failed() -> Msg {
    Msg::LoadFailed {
        description: "net::ERR_CONNECTION_REFUSED".to_string(),
    }
}

#[test]
fn load_lifecycle_reaches_content() {
    init_logging();
    let (mut state, effects) = apply(
        ShellState::default(),
        vec![Msg::LoadStarted, Msg::LoadFinished],
    );
    assert_eq!(*state.phase(), ViewPhase::Content);
    assert!(effects.is_empty());
    assert!(state.consume_dirty());
    assert!(!state.consume_dirty());
}

#[test]
fn load_failure_while_online_shows_load_error() {
    init_logging();
    let (state, effects) = apply(ShellState::default(), vec![Msg::LoadStarted, load_failed()]);
    assert_eq!(
        *state.phase(),
        ViewPhase::LoadError {
            description: "net::ERR_CONNECTION_REFUSED".to_string()
        }
    );
    assert!(effects.is_empty());

    // A late "finished" after an error does not hide the error screen.
    let (state, _) = update(state, Msg::LoadFinished);
    assert!(state.phase().is_error());
}

#[test]
fn reconnect_after_load_error_reloads_exactly_once() {
    init_logging();
    let (state, _) = apply(
        ShellState::default(),
        vec![Msg::LoadStarted, load_failed(), connectivity(false)],
    );
    assert_eq!(
        *state.phase(),
        ViewPhase::NetworkError {
            reload_on_reconnect: true
        }
    );

    let (state, effects) = update(state, connectivity(true));
    assert_eq!(effects, vec![Effect::Reload]);
    assert_eq!(*state.phase(), ViewPhase::Loading);
    assert_eq!(state.retry_count(), 1);

    // Duplicate notifications are not transitions.
    let (state, effects) = update(state, connectivity(true));
    assert!(effects.is_empty());
    assert_eq!(state.retry_count(), 1);
}

#[test]
fn going_offline_without_error_shows_network_error_without_reload() {
    init_logging();
    let (state, effects) = apply(
        ShellState::default(),
        vec![Msg::LoadStarted, Msg::LoadFinished, connectivity(false)],
    );
    assert!(effects.is_empty());
    assert!(!state.is_connected());
    assert_eq!(
        *state.phase(),
        ViewPhase::NetworkError {
            reload_on_reconnect: false
        }
    );

    let (state, effects) = update(state, connectivity(true));
    assert!(effects.is_empty());
    assert_eq!(*state.phase(), ViewPhase::Content);
    assert_eq!(state.retry_count(), 0);
}

#[test]
fn offline_never_shows_load_error() {
    init_logging();
    let (state, _) = apply(ShellState::default(), vec![connectivity(false), load_failed()]);
    assert_eq!(
        *state.phase(),
        ViewPhase::NetworkError {
            reload_on_reconnect: true
        }
    );

    // The surface cannot start a real load while offline.
    let (state, _) = update(state, Msg::LoadStarted);
    assert!(matches!(state.phase(), ViewPhase::NetworkError { .. }));
}

#[test]
fn manual_retry_reloads_and_counts() {
    init_logging();
    let (state, _) = apply(ShellState::default(), vec![load_failed()]);
    let (state, effects) = update(state, Msg::RetryClicked);
    assert_eq!(effects, vec![Effect::Reload]);
    assert_eq!(*state.phase(), ViewPhase::Loading);
    assert_eq!(state.retry_count(), 1);

    let (state, effects) = apply(state, vec![load_failed(), Msg::RetryClicked]);
    assert_eq!(effects, vec![Effect::Reload]);
    assert_eq!(state.retry_count(), 2);
}

#[test]
fn manual_retry_while_offline_keeps_network_error() {
    init_logging();
    let (state, _) = apply(ShellState::default(), vec![connectivity(false)]);
    let (state, effects) = update(state, Msg::RetryClicked);
    assert_eq!(effects, vec![Effect::Reload]);
    assert_eq!(
        *state.phase(),
        ViewPhase::NetworkError {
            reload_on_reconnect: true
        }
    );

    let (state, effects) = update(state, connectivity(true));
    assert_eq!(effects, vec![Effect::Reload]);
    assert_eq!(state.retry_count(), 2);
}

#[test]
fn retry_is_ignored_without_error() {
    init_logging();
    let (state, effects) = apply(
        ShellState::default(),
        vec![Msg::LoadStarted, Msg::LoadFinished, Msg::RetryClicked],
    );
    assert!(effects.is_empty());
    assert_eq!(state.retry_count(), 0);
    assert_eq!(state.view().phase, ViewPhase::Content);
}

#[test]
fn connectivity_flapping_reloads_on_every_restore() {
    init_logging();
    let (state, effects) = apply(
        ShellState::default(),
        vec![
            connectivity(false),
            connectivity(true),
            connectivity(false),
            connectivity(true),
        ],
    );
    // Initial `Loading` has nothing to show, so each restore reloads.
    assert_eq!(effects, vec![Effect::Reload, Effect::Reload]);
    assert_eq!(state.retry_count(), 2);
}
