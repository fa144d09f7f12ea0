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
    Router::new()
        .route("/videos/{id}/watch", post(handler::track_watch))
        .route(
            "/users/me/continue-watching",
            get(handler::continue_watching),
        )
        .route_layer(middleware::from_fn_with_state(
            state,
            crate::middleware::auth::auth_middleware,
        ))
}
