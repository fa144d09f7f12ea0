use crate::state::AppState;
use axum::extract::DefaultBodyLimit;
use axum::middleware;
use axum::routing::{get, post, put};
use axum::Router;

pub mod dto;
pub mod events;
pub mod handler;
pub mod model;
pub mod repository;
pub mod service;

pub fn router(state: AppState) -> Router<AppState> {
    let public_routes = Router::new()
        .route("/videos", get(handler::list_videos))
        .route("/videos/{id}", get(handler::get_video))
        .route("/videos/{id}/details", get(handler::get_video_details));

    let user_routes = Router::new()
        .route("/videos/{id}/view", post(handler::increment_view))
        .route_layer(middleware::from_fn_with_state(
            state.clone(),
            crate::middleware::auth::auth_middleware,
        ));

    let admin_routes = Router::new()
        .route(
            "/videos/upload",
            post(handler::upload_video).layer(DefaultBodyLimit::disable()),
        )
        .route(
            "/videos/{id}",
            put(handler::update_video).delete(handler::delete_video),
        )
        .route_layer(middleware::from_fn(crate::middleware::role::admin_guard))
        .route_layer(middleware::from_fn_with_state(
            state,
            crate::middleware::auth::auth_middleware,
        ));

    public_routes.merge(user_routes).merge(admin_routes)
}
