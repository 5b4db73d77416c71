//! Metrics collection and exposition.
//!
//! # Metrics
//! - `vanity_requests_total` (counter): requests by outcome
//! - `vanity_config_reloads_total` (counter): reload attempts by result
//! - `vanity_matchers` (gauge): entries in the published matcher list
//!
//! Without an installed recorder every call is a no-op.

use std::net::SocketAddr;

use metrics_exporter_prometheus::{BuildError, PrometheusBuilder};

/// How a request left the vanity layer.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Outcome {
    /// 307 to the repository.
    Redirect,
    /// `go-get=1` metadata page.
    Meta,
    /// No entry matched; handed to the next handler.
    Pass,
    /// Matched but the response could not be built.
    Error,
}

impl Outcome {
    pub fn as_str(self) -> &'static str {
        match self {
            Outcome::Redirect => "redirect",
            Outcome::Meta => "meta",
            Outcome::Pass => "pass",
            Outcome::Error => "error",
        }
    }
}

/// Start the Prometheus exporter on `addr`.
///
/// Must be called from within a Tokio runtime.
pub fn init_metrics(addr: SocketAddr) -> Result<(), BuildError> {
    PrometheusBuilder::new().with_http_listener(addr).install()?;
    tracing::info!(address = %addr, "Metrics exporter listening");
    Ok(())
}

pub fn record_request(outcome: Outcome) {
    ::metrics::counter!("vanity_requests_total", "outcome" => outcome.as_str()).increment(1);
}

pub fn record_reload(ok: bool) {
    let result = if ok { "ok" } else { "error" };
    ::metrics::counter!("vanity_config_reloads_total", "result" => result).increment(1);
}

pub fn set_matcher_count(count: usize) {
    ::metrics::gauge!("vanity_matchers").set(count as f64);
}
