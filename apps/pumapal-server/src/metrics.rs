//! Prometheus metrics for pumapal-server.
//!
//! Exposes server metrics in Prometheus format at the `/metrics` endpoint.

use axum::extract::{MatchedPath, Request};
use axum::middleware::Next;
use axum::response::Response;
use metrics::{counter, describe_counter, describe_histogram, histogram};
use metrics_exporter_prometheus::{BuildError, PrometheusBuilder, PrometheusHandle};
use std::time::{Duration, Instant};

/// Install the Prometheus metrics recorder and return a handle for rendering.
///
/// Must be called once at server startup before any metrics are recorded.
pub fn init_metrics() -> Result<PrometheusHandle, BuildError> {
    let handle = PrometheusBuilder::new().install_recorder()?;

    describe_counter!(
        "pumapal_http_requests_total",
        "Total number of HTTP requests processed"
    );
    describe_histogram!(
        "pumapal_http_request_duration_seconds",
        "Duration of HTTP requests in seconds"
    );
    describe_counter!(
        "pumapal_expired_groups_deleted_total",
        "Study groups removed by the expiry sweep"
    );

    Ok(handle)
}

/// Record one finished HTTP request.
pub fn record_request(method: String, route: String, status: u16, duration: Duration) {
    counter!(
        "pumapal_http_requests_total",
        "method" => method.clone(),
        "route" => route.clone(),
        "status" => status.to_string()
    )
    .increment(1);
    histogram!("pumapal_http_request_duration_seconds", "method" => method, "route" => route)
        .record(duration.as_secs_f64());
}

pub fn record_sweep(deleted: u64) {
    counter!("pumapal_expired_groups_deleted_total").increment(deleted);
}

/// Middleware timing every request, labelled by its route template (`/api/study-groups/:id`).
pub async fn track_requests(req: Request, next: Next) -> Response {
    let start = Instant::now();
    let method = req.method().to_string();
    let route = req
        .extensions()
        .get::<MatchedPath>()
        .map(|p| p.as_str().to_string())
        .unwrap_or_else(|| "unmatched".to_string());

    let response = next.run(req).await;
    record_request(method, route, response.status().as_u16(), start.elapsed());
    response
}
