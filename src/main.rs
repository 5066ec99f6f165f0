//! static-proxy
//!
//! Serves local directories and reverse-proxies API prefixes from one
//! listener.
//!
//! ```text
//!     Client Request
//!     ─────────────▶ listener ─▶ http::server ─▶ routing::Dispatcher
//!                                                   │
//!                                 ┌─────────────────┴─────────────────┐
//!                                 ▼                                   ▼
//!                        http::static_files                      http::proxy
//!                        (read + sniff type)             (rewrite, inject headers)
//!                                 │                                   │
//!     Client Response             ▼                                   ▼
//!     ◀───────────────────── local filesystem                    backend host
//! ```

use std::fmt::Display;
use std::net::SocketAddr;
use std::process::ExitCode;
use std::sync::Arc;
use std::time::Duration;

use clap::Parser;
use tokio::net::TcpListener;

use static_proxy::config::{loader, Cli};
use static_proxy::http::HttpServer;
use static_proxy::lifecycle::{signals, Lifecycle, LifecycleState, Shutdown};
use static_proxy::observability::{logging, metrics};
use static_proxy::routing::RouteTable;

#[tokio::main]
async fn main() -> ExitCode {
    let cli = Cli::parse();
    let lifecycle = Lifecycle::new();

    let config = match loader::resolve(&cli) {
        Ok(config) => config,
        Err(e) => {
            logging::init(cli.log_format.unwrap_or_default());
            return fatal(&lifecycle, "Invalid configuration", e);
        }
    };
    logging::init(config.observability.log_format);

    tracing::info!(version = env!("CARGO_PKG_VERSION"), "static-proxy starting");

    let table = match RouteTable::build(&config.routes) {
        Ok(table) => table,
        Err(e) => return fatal(&lifecycle, "Invalid route configuration", e),
    };
    for route in table.iter() {
        tracing::info!(route = %route, "Route configured");
    }

    if let Some(addr) = &config.observability.metrics_address {
        // Already validated by the loader.
        if let Ok(addr) = addr.parse::<SocketAddr>() {
            metrics::init_metrics(addr);
        }
    }

    let bind_address = config.listener.bind_address();
    let listener = match TcpListener::bind(&bind_address).await {
        Ok(listener) => listener,
        Err(e) => return fatal(&lifecycle, "Failed to bind listener", e),
    };
    tracing::info!(
        address = %bind_address,
        paths = ?config.routes.paths,
        targets = ?config.routes.targets,
        "Listening"
    );

    let shutdown = Arc::new(Shutdown::new(Duration::from_secs(config.timeouts.drain_secs)));
    let handle = shutdown.handle();
    signals::spawn_signal_listener(Arc::clone(&shutdown));

    let server = HttpServer::new(config, table);
    if let Err(e) = server.run(listener, handle, lifecycle.clone()).await {
        return fatal(&lifecycle, "Server error", e);
    }

    lifecycle.transition(LifecycleState::Stopped);
    tracing::info!(address = %bind_address, "Shutdown complete");
    ExitCode::SUCCESS
}

/// Log one fatal line, stop, and report failure.
fn fatal(lifecycle: &Lifecycle, context: &str, error: impl Display) -> ExitCode {
    tracing::error!(error = %error, "{}", context);
    lifecycle.transition(LifecycleState::Stopped);
    ExitCode::FAILURE
}
