//! Metrics collection and exposition.
//!
//! # Metrics
//! - `agent_requests_total` (counter): requests by role, path, status
//! - `agent_request_duration_seconds` (histogram): latency by role
//! - `agent_dispatch_total` (counter): orchestrator routing decisions by target
//! - `agent_upstream_errors_total` (counter): failed downstream calls by target

use std::net::SocketAddr;
use std::time::Instant;

use metrics::{counter, histogram};
use metrics_exporter_prometheus::PrometheusBuilder;

use crate::config::schema::{Role, ServiceKind};

/// Install the Prometheus recorder and its HTTP listener.
///
/// Must be called from within a Tokio runtime.
pub fn init_metrics(addr: SocketAddr) {
    match PrometheusBuilder::new().with_http_listener(addr).install() {
        Ok(()) => tracing::info!(address = %addr, "Metrics endpoint listening"),
        Err(e) => tracing::error!(address = %addr, error = %e, "Failed to install metrics exporter"),
    }
}

/// Record a served request.
pub fn record_request(role: Role, path: &str, status: u16, started: Instant) {
    counter!(
        "agent_requests_total",
        "role" => role.as_str(),
        "path" => path.to_string(),
        "status" => status.to_string()
    )
    .increment(1);
    histogram!("agent_request_duration_seconds", "role" => role.as_str())
        .record(started.elapsed().as_secs_f64());
}

/// Record an orchestrator routing decision.
pub fn record_dispatch(target: ServiceKind) {
    counter!("agent_dispatch_total", "target" => target.as_str()).increment(1);
}

/// Record a failed downstream call.
pub fn record_upstream_error(target: ServiceKind) {
    counter!("agent_upstream_errors_total", "target" => target.as_str()).increment(1);
}
