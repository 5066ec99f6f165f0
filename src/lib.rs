//! Static directories and reverse-proxied APIs behind one listener.
//!
//! Each configured URL prefix is bound either to a local directory or to a
//! backend `host:port`. Routes are matched in configuration order by
//! containment of the prefix in the request URI.

pub mod config;
pub mod error;
pub mod http;
pub mod lifecycle;
pub mod observability;
pub mod routing;
pub mod security;

pub use config::ServerConfig;
pub use http::HttpServer;
pub use lifecycle::{Lifecycle, LifecycleState, Shutdown};
pub use routing::RouteTable;
