//! HTTP server setup and configuration.
//!
//! # Responsibilities
//! - Create the Axum router with the dispatcher as catch-all handler
//! - Wire up middleware (access log, timeouts, request ID)
//! - Dispatch each request to the static or proxy handler
//! - Serve until shutdown, then drain within a bound

use std::future::IntoFuture;
use std::net::SocketAddr;
use std::sync::Arc;
use std::time::{Duration, Instant};

use axum::{
    body::Body,
    extract::{ConnectInfo, State},
    http::Request,
    response::Response,
    routing::any,
    Router,
};
use tokio::net::TcpListener;
use tokio::sync::oneshot;
use tower_http::{
    request_id::{PropagateRequestIdLayer, SetRequestIdLayer},
    timeout::{RequestBodyTimeoutLayer, TimeoutLayer},
    trace::TraceLayer,
};

use crate::config::ServerConfig;
use crate::error::{ServerError, ShutdownError, UpstreamError};
use crate::http::proxy::{self, ProxyClient};
use crate::http::request::{request_id, MakeRequestUuidV4};
use crate::http::{response, static_files};
use crate::lifecycle::{Lifecycle, LifecycleState, ShutdownHandle};
use crate::observability::metrics;
use crate::routing::{Dispatch, Dispatcher, RouteTable, RouteTarget};

/// Application state injected into handlers.
#[derive(Clone)]
pub struct AppState {
    pub dispatcher: Arc<Dispatcher>,
    pub client: ProxyClient,
}

/// HTTP server for the edge process.
pub struct HttpServer {
    router: Router,
    config: ServerConfig,
}

impl HttpServer {
    /// Create a new HTTP server around an already built route table.
    pub fn new(config: ServerConfig, table: RouteTable) -> Self {
        let state = AppState {
            dispatcher: Arc::new(Dispatcher::new(table)),
            client: proxy::build_client(),
        };

        let router = Self::build_router(&config, state);
        Self { router, config }
    }

    /// Build the Axum router with all middleware layers.
    #[allow(deprecated)]
    fn build_router(config: &ServerConfig, state: AppState) -> Router {
        let mut router = Router::new()
            .route("/{*path}", any(dispatch_handler))
            .route("/", any(dispatch_handler))
            .with_state(state);

        if config.observability.access_log {
            router = router.layer(TraceLayer::new_for_http());
        }

        router
            .layer(RequestBodyTimeoutLayer::new(Duration::from_secs(config.timeouts.read_secs)))
            .layer(TimeoutLayer::new(Duration::from_secs(config.timeouts.write_secs)))
            .layer(PropagateRequestIdLayer::x_request_id())
            .layer(SetRequestIdLayer::x_request_id(MakeRequestUuidV4))
    }

    /// Run the server on `listener` until `shutdown` fires, then drain.
    ///
    /// Returns [`ShutdownError::DrainTimeout`] when in-flight requests are
    /// still running once the drain bound has passed.
    pub async fn run(
        self,
        listener: TcpListener,
        mut shutdown: ShutdownHandle,
        lifecycle: Lifecycle,
    ) -> Result<(), ServerError> {
        let addr = listener.local_addr()?;
        let drain_timeout = shutdown.drain_timeout();
        tracing::info!(
            address = %addr,
            drain_timeout = ?drain_timeout,
            "HTTP server starting"
        );

        let app = self.router.into_make_service_with_connect_info::<SocketAddr>();

        let (draining_tx, draining_rx) = oneshot::channel::<()>();
        let signal_lifecycle = lifecycle.clone();
        let signal = async move {
            shutdown.recv().await;
            signal_lifecycle.transition(LifecycleState::Draining);
            let _ = draining_tx.send(());
        };

        lifecycle.transition(LifecycleState::Listening);

        let serve = axum::serve(listener, app)
            .with_graceful_shutdown(signal)
            .into_future();
        tokio::pin!(serve);

        tokio::select! {
            result = &mut serve => result?,
            _ = draining_rx => {
                match tokio::time::timeout(drain_timeout, &mut serve).await {
                    Ok(result) => result?,
                    Err(_) => {
                        tracing::error!(drain_timeout = ?drain_timeout, "Drain window elapsed, abandoning in-flight requests");
                        return Err(ShutdownError::DrainTimeout(drain_timeout).into());
                    }
                }
            }
        }

        tracing::info!(address = %addr, "HTTP server stopped");
        Ok(())
    }

    /// Get a reference to the config.
    pub fn config(&self) -> &ServerConfig {
        &self.config
    }
}

/// Catch-all handler.
/// Selects the first route whose prefix the request URI contains and
/// delegates to the static or proxy handler.
async fn dispatch_handler(State(state): State<AppState>, request: Request<Body>) -> Response {
    let start_time = Instant::now();
    let request_id = request_id(&request);
    let uri = request
        .uri()
        .path_and_query()
        .map(|pq| pq.as_str().to_string())
        .unwrap_or_else(|| request.uri().path().to_string());

    let route = match state.dispatcher.dispatch(&uri) {
        Dispatch::Matched(route) => route,
        Dispatch::NoRoute => {
            tracing::warn!(request_id = %request_id, uri = %uri, "No route matched");
            let response = response::no_route(&uri);
            metrics::record_request("none", response.status().as_u16(), start_time);
            return response;
        }
    };

    tracing::debug!(
        request_id = %request_id,
        uri = %uri,
        route = %route,
        "Route matched"
    );

    let response = match route.target() {
        RouteTarget::Directory(root) => {
            static_files::serve(root, route.prefix(), &uri, request.uri().path()).await
        }
        RouteTarget::Backend { authority, headers } => {
            let client_addr = request
                .extensions()
                .get::<ConnectInfo<SocketAddr>>()
                .map(|ConnectInfo(addr)| *addr);
            match proxy::forward(&state.client, request, authority, headers, client_addr).await {
                Ok(response) => response,
                Err(e) => {
                    log_upstream_error(&request_id, &uri, authority.as_str(), &e);
                    response::bad_gateway(&uri, authority.as_str(), e)
                }
            }
        }
    };

    metrics::record_request(route.kind().as_str(), response.status().as_u16(), start_time);
    response
}

fn log_upstream_error(request_id: &str, uri: &str, backend: &str, error: &UpstreamError) {
    tracing::error!(
        request_id = %request_id,
        uri = %uri,
        backend = %backend,
        error = %error,
        "Upstream error"
    );
}
