//! Server lifecycle state machine.
//!
//! ```text
//! Configuring ──ok──▶ Listening ──signal──▶ Draining ──▶ Stopped
//!      │                  │
//!      └──fatal error─────┴──────────────────────────────▶ Stopped
//! ```

use std::fmt;
use std::sync::Arc;

use tokio::sync::watch;

/// Lifecycle states of the server.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum LifecycleState {
    /// Building the route table; nothing is bound yet.
    Configuring,
    /// Listener bound and dispatcher installed.
    Listening,
    /// Shutdown signal received, in-flight requests finishing.
    Draining,
    /// Terminal.
    Stopped,
}

impl LifecycleState {
    /// Whether moving from `self` to `next` is a legal transition.
    pub fn can_transition_to(self, next: LifecycleState) -> bool {
        use LifecycleState::*;
        matches!(
            (self, next),
            (Configuring, Listening)
                | (Configuring, Stopped)
                | (Listening, Draining)
                | (Listening, Stopped)
                | (Draining, Stopped)
        )
    }
}

impl fmt::Display for LifecycleState {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            LifecycleState::Configuring => "configuring",
            LifecycleState::Listening => "listening",
            LifecycleState::Draining => "draining",
            LifecycleState::Stopped => "stopped",
        };
        f.write_str(name)
    }
}

/// Observable lifecycle state shared between `main` and the server.
#[derive(Debug, Clone)]
pub struct Lifecycle {
    tx: Arc<watch::Sender<LifecycleState>>,
}

impl Lifecycle {
    /// Start in `Configuring`.
    pub fn new() -> Self {
        let (tx, _) = watch::channel(LifecycleState::Configuring);
        Self { tx: Arc::new(tx) }
    }

    pub fn state(&self) -> LifecycleState {
        *self.tx.borrow()
    }

    pub fn subscribe(&self) -> watch::Receiver<LifecycleState> {
        self.tx.subscribe()
    }

    /// Move to `next`. Illegal transitions are ignored and return `false`.
    pub fn transition(&self, next: LifecycleState) -> bool {
        let mut from = None;
        let changed = self.tx.send_if_modified(|current| {
            if current.can_transition_to(next) {
                from = Some(*current);
                *current = next;
                true
            } else {
                false
            }
        });

        match from {
            Some(from) => tracing::info!(from = %from, to = %next, "Lifecycle transition"),
            None => tracing::debug!(state = %self.state(), requested = %next, "Ignoring lifecycle transition"),
        }
        changed
    }
}

impl Default for Lifecycle {
    fn default() -> Self {
        Self::new()
    }
}
