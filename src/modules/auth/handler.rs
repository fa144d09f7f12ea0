use super::dto::{AuthResponse, LoginRequest, RegisterRequest, TokenClaims, UserResponse};
use super::service::AuthService;
use crate::common::error::ApiError;
use crate::common::response::{ApiResponse, ApiSuccess};
use crate::state::AppState;
use axum::{
    extract::{Extension, State},
    http::StatusCode,
    Json,
};

/// Register a new user
#[utoipa::path(
    post,
    path = "/api/v1/auth/register",
    request_body = RegisterRequest,
    responses(
        (status = 201, description = "User created successfully", body = ApiResponse<UserResponse>),
        (status = 400, description = "Bad Request")
    ),
    tag = "Auth"
)]
pub async fn register(
    State(state): State<AppState>,
    Json(payload): Json<RegisterRequest>,
) -> Result<ApiSuccess<ApiResponse<UserResponse>>, ApiError> {
    let user = AuthService::register(state, payload).await?;
    Ok(ApiSuccess(
        ApiResponse::success(user, "User registered successfully"),
        StatusCode::CREATED,
    ))
}

/// Login and receive a bearer token
#[utoipa::path(
    post,
    path = "/api/v1/auth/login",
    request_body = LoginRequest,
    responses(
        (status = 200, description = "Login successful", body = ApiResponse<AuthResponse>),
        (status = 401, description = "Unauthorized")
    ),
    tag = "Auth"
)]
pub async fn login(
    State(state): State<AppState>,
    Json(payload): Json<LoginRequest>,
) -> Result<ApiSuccess<ApiResponse<AuthResponse>>, ApiError> {
    let tokens = AuthService::login(state, payload).await?;
    Ok(ApiSuccess(
        ApiResponse::success(tokens, "Login successful"),
        StatusCode::OK,
    ))
}

/// Current authenticated user
#[utoipa::path(
    get,
    path = "/api/v1/auth/me",
    responses(
        (status = 200, description = "Current user", body = ApiResponse<UserResponse>),
        (status = 401, description = "Unauthorized")
    ),
    tag = "Auth",
    security(("bearer_auth" = []))
)]
pub async fn get_me(
    State(state): State<AppState>,
    Extension(claims): Extension<TokenClaims>,
) -> Result<ApiSuccess<ApiResponse<UserResponse>>, ApiError> {
    let user = AuthService::get_me(state, &claims.sub).await?;
    Ok(ApiSuccess(
        ApiResponse::success(user, "User retrieved successfully"),
        StatusCode::OK,
    ))
}
