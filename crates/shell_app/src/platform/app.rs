use std::io::{self, BufRead};
use std::path::Path;
use std::sync::{mpsc, Arc};
use std::thread;
use std::time::Duration;

use serde::Deserialize;
use serde_json::{json, Value};
use shell_core::{injected_scripts, Msg, ShellViewModel, ViewPhase};
use shell_engine::{EngineHandle, ShellRuntime, TcpProbe};
use shell_logging::{shell_info, shell_warn};

use super::config::ShellConfig;
use super::desktop::{self, emit, StdoutNotifier, StdoutSurface};
use super::logging;

const PUMP_INTERVAL: Duration = Duration::from_millis(50);
const PROBE_TIMEOUT: Duration = Duration::from_secs(3);

/// One line of input from the embedding browser surface.
#[derive(Debug, Clone, PartialEq, Deserialize)]
#[serde(tag = "event", rename_all = "snake_case")]
enum HostEvent {
    NavigationAttempt { url: String },
    NavigationState { url: String },
    Message { data: String },
    LoadStarted,
    LoadFinished,
    LoadFailed { description: String },
    Connectivity { connected: bool },
    Retry,
    Quit,
}

enum Flow {
    Continue,
    Quit,
}

pub fn run_app(config_path: Option<&Path>) -> anyhow::Result<()> {
    let config = ShellConfig::load(config_path)?;
    logging::initialize(config.log_destination, &config.log_level);
    shell_info!("Starting shell for {}", config.origin_url);

    let engine = EngineHandle::new(config.engine_config(), desktop::services(&config))?;
    let mut runtime = ShellRuntime::new(
        config.features,
        engine,
        Box::new(StdoutSurface),
        Box::new(StdoutNotifier),
    );

    match TcpProbe::for_origin(&config.origin_url, PROBE_TIMEOUT) {
        Some(probe) => runtime.watch_connectivity(Arc::new(probe), config.connectivity_poll()),
        None => shell_warn!("No probe target in {}; connectivity stays unknown", config.origin_url),
    }

    for source in injected_scripts(&config.features) {
        emit(&json!({ "command": "inject_script", "source": source }));
    }
    emit(&json!({ "command": "load", "url": config.origin_url }));
    emit(&view_json(&runtime.view()));

    let lines = spawn_stdin_reader();
    loop {
        match lines.recv_timeout(PUMP_INTERVAL) {
            Ok(line) => {
                if let Flow::Quit = handle_line(&mut runtime, &line) {
                    break;
                }
            }
            Err(mpsc::RecvTimeoutError::Timeout) => {}
            Err(mpsc::RecvTimeoutError::Disconnected) => {
                shell_info!("Input closed");
                break;
            }
        }
        if runtime.pump_events() {
            emit(&view_json(&runtime.view()));
        }
    }

    runtime.teardown();
    shell_info!("Shell stopped");
    Ok(())
}

fn spawn_stdin_reader() -> mpsc::Receiver<String> {
    let (tx, rx) = mpsc::channel();
    thread::spawn(move || {
        for line in io::stdin().lock().lines() {
            let Ok(line) = line else { break };
            if tx.send(line).is_err() {
                break;
            }
        }
    });
    rx
}

fn handle_line(runtime: &mut ShellRuntime, line: &str) -> Flow {
    if line.trim().is_empty() {
        return Flow::Continue;
    }
    match serde_json::from_str::<HostEvent>(line) {
        Ok(event) => handle_event(runtime, event),
        Err(err) => {
            shell_warn!("Ignoring unreadable host event {:?}: {}", line, err);
            Flow::Continue
        }
    }
}

fn handle_event(runtime: &mut ShellRuntime, event: HostEvent) -> Flow {
    let msg = match event {
        HostEvent::NavigationAttempt { url } => {
            let allow = runtime.on_navigation_attempt(&url);
            emit(&json!({ "command": "navigation_decision", "url": url, "allow": allow }));
            return Flow::Continue;
        }
        HostEvent::NavigationState { url } => {
            runtime.on_navigation_state_change(&url);
            return Flow::Continue;
        }
        HostEvent::Message { data } => {
            runtime.on_bridge_message(&data);
            return Flow::Continue;
        }
        HostEvent::Quit => return Flow::Quit,
        HostEvent::LoadStarted => Msg::LoadStarted,
        HostEvent::LoadFinished => Msg::LoadFinished,
        HostEvent::LoadFailed { description } => Msg::LoadFailed { description },
        HostEvent::Connectivity { connected } => Msg::ConnectivityChanged { connected },
        HostEvent::Retry => Msg::RetryClicked,
    };
    if runtime.dispatch(msg) {
        emit(&view_json(&runtime.view()));
    }
    Flow::Continue
}

fn view_json(view: &ShellViewModel) -> Value {
    let (phase, detail) = match &view.phase {
        ViewPhase::Loading => ("loading", Value::Null),
        ViewPhase::Content => ("content", Value::Null),
        ViewPhase::NetworkError {
            reload_on_reconnect,
        } => (
            "network_error",
            json!({ "reload_on_reconnect": reload_on_reconnect }),
        ),
        ViewPhase::LoadError { description } => {
            ("load_error", json!({ "description": description }))
        }
    };
    json!({
        "command": "view",
        "phase": phase,
        "detail": detail,
        "connected": view.connected,
        "retry_count": view.retry_count,
    })
}
