//! Metrics collection and exposition.
//!
//! # Metrics
//! - `gateway_requests_total` (counter): requests by class, status, backend
//! - `gateway_request_duration_seconds` (histogram): end-to-end latency

use std::net::SocketAddr;
use std::time::Instant;

use metrics_exporter_prometheus::PrometheusBuilder;

/// Install the Prometheus recorder and scrape listener.
pub fn init_metrics(address: SocketAddr) {
    match PrometheusBuilder::new().with_http_listener(address).install() {
        Ok(()) => tracing::info!(%address, "metrics exporter listening"),
        Err(error) => tracing::error!(%error, "failed to install metrics exporter"),
    }
}

/// Record one proxied request.
pub fn record_request(class: &'static str, status: u16, backend: &str, start: Instant) {
    metrics::counter!(
        "gateway_requests_total",
        "class" => class,
        "status" => status.to_string(),
        "backend" => backend.to_string()
    )
    .increment(1);
    metrics::histogram!(
        "gateway_request_duration_seconds",
        "class" => class,
        "status" => status.to_string(),
        "backend" => backend.to_string()
    )
    .record(start.elapsed().as_secs_f64());
}
