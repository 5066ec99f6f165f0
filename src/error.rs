//! Error taxonomy for the edge server.
//!
//! - [`ConfigError`]: fatal, raised only while configuring.
//! - [`NotFoundError`]: per-request, answered with 404.
//! - [`UpstreamError`]: per-request, answered with 502.
//! - [`ShutdownError`]: fatal, raised when draining overruns its bound.

use std::path::PathBuf;
use std::time::Duration;

use thiserror::Error;

/// Startup configuration errors. Any of these terminates the process
/// before the listener is bound.
#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("failed to read config file {path}: {source}")]
    Read {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("failed to parse config file {path}: {source}")]
    Parse {
        path: PathBuf,
        #[source]
        source: toml::de::Error,
    },

    #[error("param 'type', 'path' and 'target' length should be equal (types={types}, paths={paths}, targets={targets})")]
    LengthMismatch {
        types: usize,
        paths: usize,
        targets: usize,
    },

    #[error("at least one route is required")]
    NoRoutes,

    #[error("invalid route type '{0}', expected 'dir' or 'api'")]
    InvalidKind(String),

    #[error("route path should not be empty (route #{0})")]
    EmptyPrefix(usize),

    #[error("route target should not be empty (path '{0}')")]
    EmptyTarget(String),

    #[error("found duplicate path '{0}'")]
    DuplicatePrefix(String),

    #[error("file path {0} exists, but is required to be a dir")]
    NotADirectory(PathBuf),

    #[error("failed to prepare dir {path}: {source}")]
    Directory {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("invalid backend target '{target}': {reason}")]
    InvalidBackend { target: String, reason: String },

    #[error("malformed header spec '{spec}': {reason}")]
    MalformedHeader { spec: String, reason: String },

    #[error("{0} header spec(s) left without an 'api' route to bind to")]
    UnboundHeaders(usize),

    #[error("host should not be empty")]
    EmptyHost,

    #[error("port range should be 1024-65535, got {0}")]
    PortOutOfRange(u16),

    #[error("invalid metrics address '{0}'")]
    MetricsAddress(String),
}

/// Static file lookup failures. The message text is returned to the client
/// in the 404 body.
#[derive(Debug, Error)]
pub enum NotFoundError {
    #[error("path not found")]
    PathNotFound,

    #[error("is a directory")]
    IsDirectory,

    #[error("path escapes the route directory")]
    Traversal,

    #[error("{0}")]
    Io(#[from] std::io::Error),
}

/// Backend transport failures.
#[derive(Debug, Error)]
pub enum UpstreamError {
    #[error("failed to rewrite request uri: {0}")]
    Uri(#[from] axum::http::uri::InvalidUriParts),

    #[error("backend request failed: {0}")]
    Transport(#[from] hyper_util::client::legacy::Error),
}

/// Failures while stopping the server.
#[derive(Debug, Error)]
pub enum ShutdownError {
    #[error("in-flight requests did not drain within {0:?}")]
    DrainTimeout(Duration),
}

/// Errors surfaced by the serving loop.
#[derive(Debug, Error)]
pub enum ServerError {
    #[error("listener error: {0}")]
    Io(#[from] std::io::Error),

    #[error(transparent)]
    Shutdown(#[from] ShutdownError),
}
