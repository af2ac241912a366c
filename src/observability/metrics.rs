//! Metrics collection and exposition.
//!
//! # Metrics
//! - `chain_requests_total` (counter): requests by route, status
//! - `chain_request_duration_seconds` (histogram): latency by route
//! - `chain_store_creates_total` (counter): persisted entities
//! - `chain_breaker_events_total` (counter): breaker outcomes/transitions
//!   by destination and event

use std::net::SocketAddr;
use std::time::Instant;

use metrics_exporter_prometheus::PrometheusBuilder;

/// Install the Prometheus exporter on its own listener.
pub fn init_metrics(addr: SocketAddr) {
    match PrometheusBuilder::new().with_http_listener(addr).install() {
        Ok(()) => tracing::info!(address = %addr, "Metrics exporter listening"),
        Err(e) => tracing::error!(error = %e, "Failed to install metrics exporter"),
    }
}

pub fn record_request(route: &'static str, status: u16, start: Instant) {
    metrics::counter!(
        "chain_requests_total",
        "route" => route,
        "status" => status.to_string()
    )
    .increment(1);
    metrics::histogram!("chain_request_duration_seconds", "route" => route)
        .record(start.elapsed().as_secs_f64());
}

pub fn record_store_create() {
    metrics::counter!("chain_store_creates_total").increment(1);
}

pub fn record_breaker_event(destination: &str, event: &'static str) {
    metrics::counter!(
        "chain_breaker_events_total",
        "destination" => destination.to_string(),
        "event" => event
    )
    .increment(1);
}
