use std::sync::Arc;
use std::time::Duration;

use async_trait::async_trait;
use shell_logging::{shell_debug, shell_info};
use tokio::net::TcpStream;
use tokio_util::sync::CancellationToken;

use crate::{EngineEvent, EventSink};

#[async_trait]
pub trait ReachabilityProbe: Send + Sync {
    async fn is_reachable(&self) -> bool;
}

/// Treats the network as up when a TCP connection to the origin succeeds.
#[derive(Debug, Clone)]
pub struct TcpProbe {
    host: String,
    port: u16,
    timeout: Duration,
}

impl TcpProbe {
    pub fn new(host: impl Into<String>, port: u16, timeout: Duration) -> Self {
        Self {
            host: host.into(),
            port,
            timeout,
        }
    }

    /// Probe for the host and port of an origin URL; `None` when it has no host.
    pub fn for_origin(origin: &str, timeout: Duration) -> Option<Self> {
        let parsed = url::Url::parse(origin).ok()?;
        let host = parsed.host_str()?.to_string();
        let port = parsed.port_or_known_default()?;
        Some(Self::new(host, port, timeout))
    }
}

#[async_trait]
impl ReachabilityProbe for TcpProbe {
    async fn is_reachable(&self) -> bool {
        let connect = TcpStream::connect((self.host.as_str(), self.port));
        matches!(tokio::time::timeout(self.timeout, connect).await, Ok(Ok(_)))
    }
}

/// Live connectivity subscription. Dropping it unsubscribes.
#[derive(Debug)]
pub struct ConnectivityMonitor {
    token: CancellationToken,
}

impl ConnectivityMonitor {
    /// Polls `probe` every `interval` and reports the first observation and every change.
    pub fn spawn(
        runtime: &tokio::runtime::Handle,
        probe: Arc<dyn ReachabilityProbe>,
        interval: Duration,
        sink: Arc<dyn EventSink>,
    ) -> Self {
        let token = CancellationToken::new();
        let child = token.clone();
        runtime.spawn(async move {
            let mut last: Option<bool> = None;
            loop {
                let connected = tokio::select! {
                    _ = child.cancelled() => break,
                    connected = probe.is_reachable() => connected,
                };
                if last != Some(connected) {
                    shell_info!("Connectivity changed: connected={}", connected);
                    sink.emit(EngineEvent::ConnectivityChanged { connected });
                    last = Some(connected);
                }
                tokio::select! {
                    _ = child.cancelled() => break,
                    _ = tokio::time::sleep(interval) => {}
                }
            }
            shell_debug!("Connectivity subscription closed");
        });
        Self { token }
    }

    pub fn unsubscribe(&self) {
        self.token.cancel();
    }
}

impl Drop for ConnectivityMonitor {
    fn drop(&mut self) {
        self.token.cancel();
    }
}
