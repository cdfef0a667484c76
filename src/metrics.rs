//! Metrics for envelope construction and handler latency.
//!
//! Recording goes through the `metrics` facade. A Prometheus exporter can be
//! installed on its own listener with [`install_prometheus`].

use std::net::SocketAddr;
use std::time::Instant;

use metrics::{counter, describe_counter, describe_histogram, histogram};
use metrics_exporter_prometheus::{BuildError, PrometheusBuilder};
use tracing::{debug, info};

// === Metric Name Constants ===

/// Envelopes built counter metric name.
pub const METRIC_ENVELOPES_BUILT: &str = "envelopes_built_total";
/// Malformed handler results counter metric name.
pub const METRIC_ENVELOPE_FAILURES: &str = "envelope_failures_total";
/// Wrapped handler latency metric name.
pub const METRIC_HANDLER_LATENCY: &str = "handler_latency_ms";

/// Initialize all metric descriptions.
/// Call this once at startup, after any recorder is installed.
pub fn init_metrics() {
    describe_histogram!(
        METRIC_HANDLER_LATENCY,
        "Wrapped handler latency in milliseconds"
    );

    describe_counter!(
        METRIC_ENVELOPES_BUILT,
        "Total number of response envelopes built"
    );
    describe_counter!(
        METRIC_ENVELOPE_FAILURES,
        "Total number of handler results that could not be normalized"
    );

    debug!("Metrics initialized");
}

/// Install the Prometheus exporter with an HTTP listener on `addr`.
pub fn install_prometheus(addr: SocketAddr) -> Result<(), BuildError> {
    PrometheusBuilder::new().with_http_listener(addr).install()?;
    info!("Prometheus exporter listening on {}", addr);
    Ok(())
}

/// Record how long a wrapped handler took.
pub fn record_handler_latency(start: Instant, method: &str) {
    let latency_ms = start.elapsed().as_secs_f64() * 1000.0;
    histogram!(METRIC_HANDLER_LATENCY, "method" => method.to_string()).record(latency_ms);
}

/// Increment envelopes built counter.
pub fn inc_envelopes_built() {
    counter!(METRIC_ENVELOPES_BUILT).increment(1);
}

/// Increment malformed handler results counter.
pub fn inc_envelope_failures() {
    counter!(METRIC_ENVELOPE_FAILURES).increment(1);
}
