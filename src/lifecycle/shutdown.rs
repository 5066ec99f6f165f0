//! Shutdown coordination.

use std::time::Duration;

use tokio::sync::broadcast;

/// Coordinator for graceful shutdown.
///
/// Provides a broadcast channel the server subscribes to, plus the bound on
/// how long in-flight requests may drain once the signal fires.
#[derive(Debug)]
pub struct Shutdown {
    /// Broadcast channel sender.
    tx: broadcast::Sender<()>,
    /// Grace period for in-flight requests.
    drain_timeout: Duration,
}

impl Shutdown {
    /// Default grace period.
    pub const DEFAULT_DRAIN: Duration = Duration::from_secs(5);

    /// Create a new shutdown coordinator.
    pub fn new(drain_timeout: Duration) -> Self {
        let (tx, _) = broadcast::channel(1);
        Self { tx, drain_timeout }
    }

    /// Subscribe to the shutdown signal.
    pub fn subscribe(&self) -> broadcast::Receiver<()> {
        self.tx.subscribe()
    }

    /// Trigger the shutdown signal.
    pub fn trigger(&self) {
        let _ = self.tx.send(());
    }

    pub fn drain_timeout(&self) -> Duration {
        self.drain_timeout
    }

    /// A receiving end for the server, carrying the drain bound.
    pub fn handle(&self) -> ShutdownHandle {
        ShutdownHandle {
            rx: self.tx.subscribe(),
            drain_timeout: self.drain_timeout,
        }
    }
}

/// Receiving end of a [`Shutdown`] coordinator.
#[derive(Debug)]
pub struct ShutdownHandle {
    rx: broadcast::Receiver<()>,
    drain_timeout: Duration,
}

impl ShutdownHandle {
    /// Wait for the shutdown signal. A dropped coordinator counts as a signal.
    pub async fn recv(&mut self) {
        let _ = self.rx.recv().await;
    }

    pub fn drain_timeout(&self) -> Duration {
        self.drain_timeout
    }
}

impl Default for Shutdown {
    fn default() -> Self {
        Self::new(Self::DEFAULT_DRAIN)
    }
}
