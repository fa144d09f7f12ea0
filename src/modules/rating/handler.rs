use super::dto::{RateVideoRequest, RatingResponse};
use super::service::RatingService;
use crate::common::error::ApiError;
use crate::common::response::{ApiResponse, ApiSuccess};
use crate::modules::auth::dto::TokenClaims;
use crate::state::AppState;
use axum::{
    extract::{Extension, Path, State},
    http::StatusCode,
    Json,
};

/// Submit or replace the caller's rating for a video
#[utoipa::path(
    post,
    path = "/api/v1/videos/{id}/rate",
    params(("id" = i64, Path, description = "Video ID")),
    request_body = RateVideoRequest,
    responses(
        (status = 200, description = "Rating stored", body = ApiResponse<RatingResponse>),
        (status = 400, description = "Rating out of range"),
        (status = 404, description = "Video not found")
    ),
    tag = "Ratings",
    security(("bearer_auth" = []))
)]
pub async fn rate_video(
    State(state): State<AppState>,
    Path(id): Path<i64>,
    Extension(claims): Extension<TokenClaims>,
    Json(req): Json<RateVideoRequest>,
) -> Result<ApiSuccess<ApiResponse<RatingResponse>>, ApiError> {
    let rating = RatingService::rate(state, &claims.sub, id, req).await?;
    Ok(ApiSuccess(
        ApiResponse::success(rating, "Rating submitted successfully"),
        StatusCode::OK,
    ))
}

/// Fetch all ratings for a video
#[utoipa::path(
    get,
    path = "/api/v1/videos/{id}/ratings",
    params(("id" = i64, Path, description = "Video ID")),
    responses(
        (status = 200, description = "Ratings for the video", body = ApiResponse<Vec<RatingResponse>>),
        (status = 404, description = "No ratings found")
    ),
    tag = "Ratings"
)]
pub async fn get_video_ratings(
    State(state): State<AppState>,
    Path(id): Path<i64>,
) -> Result<ApiSuccess<ApiResponse<Vec<RatingResponse>>>, ApiError> {
    let ratings = RatingService::list_for_video(state, id).await?;
    Ok(ApiSuccess(
        ApiResponse::success(ratings, "Ratings retrieved successfully"),
        StatusCode::OK,
    ))
}

/// Fetch the caller's rating for a video
#[utoipa::path(
    get,
    path = "/api/v1/videos/{id}/user-rating",
    params(("id" = i64, Path, description = "Video ID")),
    responses(
        (status = 200, description = "The caller's rating", body = ApiResponse<RatingResponse>),
        (status = 404, description = "No rating by this user")
    ),
    tag = "Ratings",
    security(("bearer_auth" = []))
)]
pub async fn get_user_rating(
    State(state): State<AppState>,
    Path(id): Path<i64>,
    Extension(claims): Extension<TokenClaims>,
) -> Result<ApiSuccess<ApiResponse<RatingResponse>>, ApiError> {
    let rating = RatingService::user_rating(state, &claims.sub, id).await?;
    Ok(ApiSuccess(
        ApiResponse::success(rating, "Rating retrieved successfully"),
        StatusCode::OK,
    ))
}
