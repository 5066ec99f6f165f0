//! Configuration schema definitions.
//!
//! All types derive Serde traits so the same structure can be read from a
//! TOML file and then overlaid with command-line flags.

use clap::ValueEnum;
use serde::{Deserialize, Serialize};

/// Root configuration for the edge server.
#[derive(Debug, Clone, Deserialize, Serialize, Default, PartialEq)]
#[serde(default)]
pub struct ServerConfig {
    /// Listener configuration (host, port).
    pub listener: ListenerConfig,

    /// Raw, positional route definitions.
    pub routes: RouteSpecs,

    /// Timeout configuration.
    pub timeouts: TimeoutConfig,

    /// Observability settings.
    pub observability: ObservabilityConfig,
}

/// Listener configuration.
#[derive(Debug, Clone, Deserialize, Serialize, PartialEq)]
#[serde(default)]
pub struct ListenerConfig {
    /// Host name or IP to bind.
    pub host: String,

    /// TCP port to bind.
    pub port: u16,
}

impl Default for ListenerConfig {
    fn default() -> Self {
        Self {
            host: "localhost".to_string(),
            port: 4200,
        }
    }
}

impl ListenerConfig {
    /// `host:port` string handed to the TCP listener.
    pub fn bind_address(&self) -> String {
        format!("{}:{}", self.host, self.port)
    }
}

/// Route definitions as parallel arrays.
///
/// `types[i]`, `paths[i]` and `targets[i]` describe one route. `headers`
/// is consumed in order by `api` routes only.
#[derive(Debug, Clone, Deserialize, Serialize, PartialEq)]
#[serde(default)]
pub struct RouteSpecs {
    pub types: Vec<String>,
    pub paths: Vec<String>,
    pub targets: Vec<String>,
    pub headers: Vec<String>,
}

impl Default for RouteSpecs {
    fn default() -> Self {
        Self {
            types: vec!["dir".to_string()],
            paths: vec!["/static".to_string()],
            targets: vec!["./".to_string()],
            headers: Vec::new(),
        }
    }
}

/// Timeout configuration (in seconds).
#[derive(Debug, Clone, Deserialize, Serialize, PartialEq)]
#[serde(default)]
pub struct TimeoutConfig {
    /// Bound on reading a request body.
    pub read_secs: u64,

    /// Bound on producing a response.
    pub write_secs: u64,

    /// Grace period for in-flight requests after a shutdown signal.
    pub drain_secs: u64,
}

impl Default for TimeoutConfig {
    fn default() -> Self {
        Self {
            read_secs: 10,
            write_secs: 10,
            drain_secs: 5,
        }
    }
}

/// Log output format.
#[derive(Debug, Clone, Copy, Deserialize, Serialize, PartialEq, Eq, Default, ValueEnum)]
#[serde(rename_all = "lowercase")]
pub enum LogFormat {
    #[default]
    Pretty,
    Json,
}

/// Observability configuration.
#[derive(Debug, Clone, Deserialize, Serialize, PartialEq)]
#[serde(default)]
pub struct ObservabilityConfig {
    /// Emit one log line per request.
    pub access_log: bool,

    /// Log output format.
    pub log_format: LogFormat,

    /// Prometheus scrape address; exporter disabled when unset.
    pub metrics_address: Option<String>,
}

impl Default for ObservabilityConfig {
    fn default() -> Self {
        Self {
            access_log: true,
            log_format: LogFormat::Pretty,
            metrics_address: None,
        }
    }
}
