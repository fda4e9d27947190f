//! Axum router wiring.

use axum::{
    middleware,
    routing::{any, get},
    Router,
};

use crate::{api, app_state::AppState, obs, ops};

pub fn build_router(state: AppState) -> Router {
    Router::new()
        .route("/visitor_count", any(api::visitor_count))
        .route("/likes", get(api::likes_get).post(api::likes_post))
        .route("/health", get(ops::health))
        .route("/metrics", get(ops::metrics))
        .route_layer(middleware::from_fn_with_state(state.clone(), obs::track_requests))
        .with_state(state)
}
