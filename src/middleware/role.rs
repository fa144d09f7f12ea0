use crate::common::error::ApiError;
use crate::modules::auth::dto::TokenClaims;
use crate::modules::auth::model::UserRole;
use axum::{
    extract::{Extension, Request},
    middleware::Next,
    response::Response,
};

pub async fn admin_guard(
    Extension(claims): Extension<TokenClaims>,
    req: Request,
    next: Next,
) -> Result<Response, ApiError> {
    if UserRole::from(claims.role.as_str()) != UserRole::Admin {
        return Err(ApiError::Forbidden("Admin access required".to_string()));
    }

    Ok(next.run(req).await)
}
