//! Metrics collection and exposition.
//!
//! # Metrics
//! - `static_proxy_requests_total` (counter): requests by route kind and status
//! - `static_proxy_request_duration_seconds` (histogram): latency by route kind
//!
//! Recording is always cheap; the Prometheus endpoint is only installed when
//! a metrics address is configured.

use std::net::SocketAddr;
use std::time::Instant;

use metrics_exporter_prometheus::PrometheusBuilder;

/// Install the Prometheus exporter listening on `addr`.
pub fn init_metrics(addr: SocketAddr) {
    match PrometheusBuilder::new().with_http_listener(addr).install() {
        Ok(()) => tracing::info!(address = %addr, "Metrics endpoint listening"),
        Err(e) => tracing::error!(address = %addr, error = %e, "Failed to install metrics exporter"),
    }
}

/// Record one finished request.
pub fn record_request(kind: &'static str, status: u16, start: Instant) {
    ::metrics::counter!(
        "static_proxy_requests_total",
        "kind" => kind,
        "status" => status.to_string()
    )
    .increment(1);
    ::metrics::histogram!("static_proxy_request_duration_seconds", "kind" => kind)
        .record(start.elapsed().as_secs_f64());
}
