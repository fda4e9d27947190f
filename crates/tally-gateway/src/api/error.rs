//! Error -> HTTP response mapping.

use axum::{
    http::StatusCode,
    response::{IntoResponse, Response},
    Json,
};
use serde_json::json;

use tally_core::TallyError;

/// Plain-text body for a likes request without an id.
pub const MISSING_ID_MESSAGE: &str = "Please pass an id on the query string";

/// Boundary wrapper so handlers can `?` on `TallyError`.
#[derive(Debug)]
pub struct ApiError(pub TallyError);

impl From<TallyError> for ApiError {
    fn from(e: TallyError) -> Self {
        Self(e)
    }
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        if self.0.is_client_error() {
            tracing::debug!(error = %self.0, "rejected request");
            return (StatusCode::BAD_REQUEST, MISSING_ID_MESSAGE).into_response();
        }

        tracing::error!(code = self.0.client_code().as_str(), error = %self.0, "request failed");
        (
            StatusCode::INTERNAL_SERVER_ERROR,
            Json(json!({ "error": self.0.to_string() })),
        )
            .into_response()
    }
}
