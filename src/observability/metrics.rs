//! Metrics collection and exposition.
//!
//! # Metrics
//! - `props_reload_passes_total` (counter): completed reload passes
//! - `props_reload_pass_failures_total` (counter): passes that errored or panicked
//! - `props_reload_pass_duration_seconds` (histogram): pass latency
//! - `props_reload_files_reloaded_total{set}` (counter): successful reparses
//! - `props_reload_parse_failures_total{set}` (counter): rejected files
//! - `props_reload_sets` (gauge): sets currently loaded
//! - `props_reload_interval_seconds` (gauge): armed polling interval

use std::net::SocketAddr;
use std::time::Duration;

use metrics_exporter_prometheus::{BuildError, PrometheusBuilder};

/// Install the Prometheus exporter with an HTTP scrape listener on `addr`.
///
/// Must be called from within a Tokio runtime.
pub fn init_metrics(addr: SocketAddr) -> Result<(), BuildError> {
    PrometheusBuilder::new().with_http_listener(addr).install()?;
    tracing::info!(address = %addr, "Metrics endpoint listening");
    Ok(())
}

pub fn record_pass(elapsed: Duration) {
    ::metrics::counter!("props_reload_passes_total").increment(1);
    ::metrics::histogram!("props_reload_pass_duration_seconds").record(elapsed.as_secs_f64());
}

pub fn record_pass_failure() {
    ::metrics::counter!("props_reload_pass_failures_total").increment(1);
}

pub fn record_file_reloaded(set: &str) {
    ::metrics::counter!("props_reload_files_reloaded_total", "set" => set.to_string()).increment(1);
}

pub fn record_parse_failure(set: &str) {
    ::metrics::counter!("props_reload_parse_failures_total", "set" => set.to_string()).increment(1);
}

pub fn record_set_count(count: usize) {
    ::metrics::gauge!("props_reload_sets").set(count as f64);
}

pub fn record_interval(interval: Duration) {
    ::metrics::gauge!("props_reload_interval_seconds").set(interval.as_secs_f64());
}
