use super::dto::{TrackWatchRequest, TrackWatchResponse, WatchHistoryResponse};
use super::service::WatchService;
use crate::common::error::ApiError;
use crate::common::response::{ApiResponse, ApiSuccess};
use crate::modules::auth::dto::TokenClaims;
use crate::state::AppState;
use axum::{
    extract::{Extension, Path, State},
    http::StatusCode,
    Json,
};

/// Record a watch event: bumps the view counter and saves the playback position
#[utoipa::path(
    post,
    path = "/api/v1/videos/{id}/watch",
    params(("id" = i64, Path, description = "Video ID")),
    request_body = TrackWatchRequest,
    responses(
        (status = 200, description = "Watch event recorded", body = ApiResponse<TrackWatchResponse>),
        (status = 400, description = "Invalid playback position"),
        (status = 404, description = "Video not found")
    ),
    tag = "Watch History",
    security(("bearer_auth" = []))
)]
pub async fn track_watch(
    State(state): State<AppState>,
    Path(id): Path<i64>,
    Extension(claims): Extension<TokenClaims>,
    Json(req): Json<TrackWatchRequest>,
) -> Result<ApiSuccess<ApiResponse<TrackWatchResponse>>, ApiError> {
    let result = WatchService::track(state, &claims.sub, id, req).await?;
    Ok(ApiSuccess(
        ApiResponse::success(result, "Watch event recorded successfully"),
        StatusCode::OK,
    ))
}

/// List the caller's watch history, most recently watched first
#[utoipa::path(
    get,
    path = "/api/v1/users/me/continue-watching",
    responses(
        (status = 200, description = "Watch history", body = ApiResponse<Vec<WatchHistoryResponse>>),
        (status = 404, description = "No watch history found")
    ),
    tag = "Watch History",
    security(("bearer_auth" = []))
)]
pub async fn continue_watching(
    State(state): State<AppState>,
    Extension(claims): Extension<TokenClaims>,
) -> Result<ApiSuccess<ApiResponse<Vec<WatchHistoryResponse>>>, ApiError> {
    let history = WatchService::continue_watching(state, &claims.sub).await?;
    Ok(ApiSuccess(
        ApiResponse::success(history, "Watch history retrieved successfully"),
        StatusCode::OK,
    ))
}
