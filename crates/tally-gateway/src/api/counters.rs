use axum::{
    extract::{Query, State},
    Json,
};
use serde::{Deserialize, Serialize};

use crate::api::ApiError;
use crate::app_state::AppState;
use crate::services::LikeKey;

#[derive(Debug, Deserialize)]
pub struct LikesQuery {
    pub id: Option<String>,
}

#[derive(Debug, Serialize, Deserialize, PartialEq, Eq)]
pub struct VisitorCountBody {
    pub count: u64,
}

#[derive(Debug, Serialize, Deserialize, PartialEq, Eq)]
pub struct LikesBody {
    pub likes: u64,
}

pub async fn visitor_count(
    State(state): State<AppState>,
) -> Result<Json<VisitorCountBody>, ApiError> {
    let count = state.counter_service()?.increment().await?;
    tracing::info!(count, "visit counted");
    Ok(Json(VisitorCountBody { count }))
}

pub async fn likes_get(
    State(state): State<AppState>,
    query: Option<Query<LikesQuery>>,
) -> Result<Json<LikesBody>, ApiError> {
    let svc = state.likes_service()?;
    let key = like_key(query)?;
    let likes = svc.get(&key).await?;
    tracing::info!(key = %key, likes, "likes read");
    Ok(Json(LikesBody { likes }))
}

pub async fn likes_post(
    State(state): State<AppState>,
    query: Option<Query<LikesQuery>>,
) -> Result<Json<LikesBody>, ApiError> {
    let svc = state.likes_service()?;
    let key = like_key(query)?;
    let likes = svc.increment(&key).await?;
    tracing::info!(key = %key, likes, "like recorded");
    Ok(Json(LikesBody { likes }))
}

// An unparseable query string counts as a missing id.
fn like_key(query: Option<Query<LikesQuery>>) -> Result<LikeKey, ApiError> {
    let id = query.and_then(|Query(q)| q.id);
    Ok(LikeKey::parse(id.as_deref())?)
}
