//! Operational HTTP endpoints.
//!
//! - `/health`  : store connectivity (database + collections)
//! - `/metrics` : Prometheus text format

use axum::{
    extract::State,
    http::{header, StatusCode},
    response::{IntoResponse, Response},
    Json,
};
use serde_json::json;

use crate::app_state::AppState;

pub async fn health(State(state): State<AppState>) -> Response {
    let described = match state.catalog() {
        Ok(catalog) => catalog.describe().await,
        Err(e) => Err(e),
    };

    match described {
        Ok(info) => (
            StatusCode::OK,
            Json(json!({
                "status": "ok",
                "database": info.database,
                "collections": info.collections,
            })),
        )
            .into_response(),
        Err(e) => {
            tracing::error!(error = %e, "health check failed");
            (
                StatusCode::INTERNAL_SERVER_ERROR,
                Json(json!({
                    "status": "error",
                    "type": e.client_code().as_str(),
                    "message": e.to_string(),
                })),
            )
                .into_response()
        }
    }
}

pub async fn metrics(State(state): State<AppState>) -> Response {
    (
        StatusCode::OK,
        [(header::CONTENT_TYPE, "text/plain; version=0.0.4; charset=utf-8")],
        state.metrics().render(),
    )
        .into_response()
}
