//! In-process metrics.
//!
//! Counters and latency histograms are kept as atomics behind `DashMap`
//! label sets and rendered by the `/metrics` handler in Prometheus text format.

pub mod metrics;

pub use metrics::TallyMetrics;

use axum::{
    extract::{MatchedPath, Request, State},
    middleware::Next,
    response::Response,
};

use crate::app_state::AppState;

/// Count every routed request by matched path and response status.
pub async fn track_requests(State(state): State<AppState>, req: Request, next: Next) -> Response {
    let route = req
        .extensions()
        .get::<MatchedPath>()
        .map(|p| p.as_str().to_owned())
        .unwrap_or_else(|| "unmatched".to_owned());

    let resp = next.run(req).await;
    state
        .metrics()
        .http_requests
        .inc(&[("route", route.as_str()), ("status", resp.status().as_str())]);
    resp
}
