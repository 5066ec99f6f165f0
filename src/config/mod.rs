//! Configuration management subsystem.
//!
//! # Data Flow
//! ```text
//! defaults
//!     → loader.rs (optional TOML file, ACCESS_LOG / GIN_LOG env)
//!     → cli.rs flags overlaid on top
//!     → validation.rs (listener checks)
//!     → ServerConfig (immutable, passed by reference)
//!     → routing::RouteTable::build (route invariants)
//! ```
//!
//! # Design Decisions
//! - Config is built once; nothing mutates it after startup
//! - All fields have defaults so an empty command line serves `./` on `/static`
//! - Route arrays from the CLI replace configured routes as one group

pub mod cli;
pub mod loader;
pub mod schema;
pub mod validation;

pub use cli::Cli;
pub use schema::{ListenerConfig, LogFormat, ObservabilityConfig, RouteSpecs, ServerConfig, TimeoutConfig};
