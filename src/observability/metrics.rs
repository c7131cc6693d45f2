//! Metrics collection and exposition.
//!
//! # Metrics
//! - `climate_requests_total` (counter): inbound requests by status
//! - `climate_request_duration_seconds` (histogram): inbound latency
//! - `climate_upstream_requests_total` (counter): upstream calls by outcome
//!
//! Recording is a no-op until a recorder is installed, so tests and
//! deployments with metrics disabled pay nothing.

use std::net::SocketAddr;
use std::time::Instant;

use metrics_exporter_prometheus::PrometheusBuilder;

/// Install the Prometheus recorder and its scrape listener.
pub fn init_metrics(addr: SocketAddr) {
    match PrometheusBuilder::new().with_http_listener(addr).install() {
        Ok(()) => tracing::info!(address = %addr, "Metrics endpoint listening"),
        Err(e) => tracing::error!(address = %addr, error = %e, "Failed to install metrics exporter"),
    }
}

pub fn record_request(status: u16, start: Instant) {
    metrics::counter!("climate_requests_total", "status" => status.to_string()).increment(1);
    metrics::histogram!("climate_request_duration_seconds").record(start.elapsed().as_secs_f64());
}

pub fn record_upstream(outcome: &'static str) {
    metrics::counter!("climate_upstream_requests_total", "outcome" => outcome).increment(1);
}
