use crate::state::AppState;
use axum::middleware;
use axum::routing::{get, post};
use axum::Router;

pub mod dto;
pub mod handler;
pub mod model;
pub mod repository;
pub mod service;

pub fn router(state: AppState) -> Router<AppState> {
    let public_routes = Router::new().route("/videos/{id}/ratings", get(handler::get_video_ratings));

    let protected_routes = Router::new()
        .route("/videos/{id}/rate", post(handler::rate_video))
        .route("/videos/{id}/user-rating", get(handler::get_user_rating))
        .route_layer(middleware::from_fn_with_state(
            state,
            crate::middleware::auth::auth_middleware,
        ));

    public_routes.merge(protected_routes)
}
