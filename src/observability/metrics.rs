//! Metrics collection and exposition.
//!
//! # Metrics
//! - `marknote_requests_total` (counter): requests by method, route, status
//! - `marknote_request_duration_seconds` (histogram): latency distribution
//! - `marknote_notes_appended_total` (counter): notes saved
//! - `marknote_active_sessions` (gauge): live sessions after each sweep
//! - `marknote_upstream_failures_total` (counter): grammar proxy failures by kind
//! - `marknote_render_failures_total` (counter): markdown render failures

use axum::{
    body::Body,
    extract::MatchedPath,
    http::Request,
    middleware::Next,
    response::Response,
};
use metrics_exporter_prometheus::PrometheusBuilder;
use std::net::SocketAddr;
use std::time::Instant;

/// Install the Prometheus recorder and its scrape listener.
pub fn init_metrics(addr: SocketAddr) {
    match PrometheusBuilder::new().with_http_listener(addr).install() {
        Ok(()) => tracing::info!(address = %addr, "Metrics endpoint listening"),
        Err(e) => tracing::error!(error = %e, "Failed to install metrics exporter"),
    }
}

pub fn record_request(method: &str, route: &str, status: u16, start: Instant) {
    let status = status.to_string();
    metrics::counter!(
        "marknote_requests_total",
        "method" => method.to_string(),
        "route" => route.to_string(),
        "status" => status.clone()
    )
    .increment(1);
    metrics::histogram!(
        "marknote_request_duration_seconds",
        "method" => method.to_string(),
        "route" => route.to_string(),
        "status" => status
    )
    .record(start.elapsed().as_secs_f64());
}

pub fn record_note_appended() {
    metrics::counter!("marknote_notes_appended_total").increment(1);
}

pub fn record_active_sessions(count: usize) {
    metrics::gauge!("marknote_active_sessions").set(count as f64);
}

pub fn record_upstream_failure(kind: &'static str) {
    metrics::counter!("marknote_upstream_failures_total", "kind" => kind).increment(1);
}

pub fn record_render_failure() {
    metrics::counter!("marknote_render_failures_total").increment(1);
}

/// Route-level middleware recording request count and latency.
pub async fn track_requests(request: Request<Body>, next: Next) -> Response {
    let start = Instant::now();
    let method = request.method().to_string();
    let route = request
        .extensions()
        .get::<MatchedPath>()
        .map(|p| p.as_str().to_string())
        .unwrap_or_else(|| request.uri().path().to_string());

    let response = next.run(request).await;
    record_request(&method, &route, response.status().as_u16(), start);
    response
}
