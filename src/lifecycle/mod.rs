//! Lifecycle management subsystem.
//!
//! # Data Flow
//! ```text
//! Startup (main.rs):
//!     Configuring: resolve config → build route table
//!     → Listening: bind listener → serve
//!
//! Signals (signals.rs):
//!     SIGINT/SIGTERM → shutdown.rs trigger
//!
//! Shutdown (http/server.rs):
//!     trigger → Draining: stop accepting → drain (bounded) → Stopped
//! ```
//!
//! # Design Decisions
//! - Any configuration error moves straight to Stopped
//! - Drain has a deadline: requests still running when it passes are abandoned
//! - The route table never changes after Configuring

pub mod shutdown;
pub mod signals;
pub mod state;

pub use shutdown::{Shutdown, ShutdownHandle};
pub use state::{Lifecycle, LifecycleState};
