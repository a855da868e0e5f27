//! Metrics collection and exposition.
//!
//! # Metrics
//! - `opensky_proxy_requests_total` (counter): handled requests by outcome, status
//! - `opensky_proxy_upstream_duration_seconds` (histogram): upstream latency by outcome

use std::net::SocketAddr;
use std::time::Instant;

use metrics::{counter, histogram};
use metrics_exporter_prometheus::{BuildError, PrometheusBuilder};

pub const REQUESTS_TOTAL: &str = "opensky_proxy_requests_total";
pub const UPSTREAM_DURATION_SECONDS: &str = "opensky_proxy_upstream_duration_seconds";

/// Install the Prometheus recorder and its scrape listener.
///
/// Must be called from inside a Tokio runtime.
pub fn init_metrics(addr: SocketAddr) -> Result<(), BuildError> {
    PrometheusBuilder::new().with_http_listener(addr).install()?;
    tracing::info!(address = %addr, "Metrics endpoint listening");
    Ok(())
}

/// Record one handled request.
pub fn record_request(outcome: &'static str, status: u16, start_time: Instant) {
    counter!(
        REQUESTS_TOTAL,
        "outcome" => outcome,
        "status" => status.to_string()
    )
    .increment(1);

    histogram!(UPSTREAM_DURATION_SECONDS, "outcome" => outcome)
        .record(start_time.elapsed().as_secs_f64());
}
