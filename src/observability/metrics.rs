//! Metrics collection and exposition.
//!
//! # Metrics
//! - `relay_requests_total` (counter): requests by method, route, status
//! - `relay_request_duration_seconds` (histogram): latency by route
//! - `relay_upstream_calls_total` (counter): API calls by service, outcome
//! - `relay_upstream_duration_seconds` (histogram): API latency by service
//! - `relay_prediction_processes` (gauge): prediction scripts running now
//!
//! Recording is a no-op until a recorder is installed, so tests and
//! deployments without the exporter pay almost nothing.

use std::net::SocketAddr;
use std::time::Instant;

use axum::{
    body::Body,
    extract::MatchedPath,
    http::Request,
    middleware::Next,
    response::Response,
};
use metrics::{counter, gauge, histogram};
use metrics_exporter_prometheus::PrometheusBuilder;

use crate::upstream::UpstreamError;

/// Install the Prometheus recorder and its scrape endpoint.
pub fn init_metrics(addr: SocketAddr) {
    match PrometheusBuilder::new().with_http_listener(addr).install() {
        Ok(()) => tracing::info!(address = %addr, "Metrics endpoint listening"),
        Err(e) => tracing::error!(address = %addr, error = %e, "Failed to install metrics exporter"),
    }
}

/// Record one completed inbound request.
pub fn record_request(method: &str, route: &str, status: u16, start: Instant) {
    counter!(
        "relay_requests_total",
        "method" => method.to_string(),
        "route" => route.to_string(),
        "status" => status.to_string()
    )
    .increment(1);
    histogram!("relay_request_duration_seconds", "route" => route.to_string())
        .record(start.elapsed().as_secs_f64());
}

/// Record one outbound API call and its outcome.
pub fn record_upstream<T>(service: &'static str, result: &Result<T, UpstreamError>, start: Instant) {
    let outcome = match result {
        Ok(_) => "ok",
        Err(e) => e.kind(),
    };
    counter!("relay_upstream_calls_total", "service" => service, "outcome" => outcome).increment(1);
    histogram!("relay_upstream_duration_seconds", "service" => service)
        .record(start.elapsed().as_secs_f64());
}

/// Tracks a running prediction process for as long as it is held.
#[derive(Debug)]
pub struct ProcessGauge(());

impl ProcessGauge {
    pub fn start() -> Self {
        gauge!("relay_prediction_processes").increment(1.0);
        Self(())
    }
}

impl Drop for ProcessGauge {
    fn drop(&mut self) {
        gauge!("relay_prediction_processes").decrement(1.0);
    }
}

/// Middleware recording per-route request metrics.
///
/// Unmatched requests (static fallback, 404s) are grouped under `fallback`
/// to keep label cardinality bounded.
pub async fn track_requests(req: Request<Body>, next: Next) -> Response {
    let start = Instant::now();
    let method = req.method().to_string();
    let route = req
        .extensions()
        .get::<MatchedPath>()
        .map(|p| p.as_str().to_string())
        .unwrap_or_else(|| "fallback".to_string());

    let response = next.run(req).await;
    record_request(&method, &route, response.status().as_u16(), start);
    response
}
