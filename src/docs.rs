use crate::modules::auth::dto::*;
use utoipa::OpenApi;

#[derive(OpenApi)]
#[openapi(
    paths(
        crate::modules::auth::handler::register,
        crate::modules::auth::handler::login,
        crate::modules::auth::handler::get_me,
        crate::modules::video::handler::upload_video,
        crate::modules::video::handler::list_videos,
        crate::modules::video::handler::get_video,
        crate::modules::video::handler::get_video_details,
        crate::modules::video::handler::update_video,
        crate::modules::video::handler::delete_video,
        crate::modules::video::handler::increment_view,
        crate::modules::rating::handler::rate_video,
        crate::modules::rating::handler::get_video_ratings,
        crate::modules::rating::handler::get_user_rating,
        crate::modules::watch::handler::track_watch,
        crate::modules::watch::handler::continue_watching,
    ),
    components(
        schemas(
            RegisterRequest, LoginRequest, AuthResponse, UserResponse,
            crate::modules::video::dto::UpdateVideoRequest,
            crate::modules::video::dto::VideoResponse,
            crate::modules::video::dto::VideoDetailsResponse,
            crate::modules::video::dto::ViewCountResponse,
            crate::modules::rating::dto::RateVideoRequest,
            crate::modules::rating::dto::RatingResponse,
            crate::modules::watch::dto::TrackWatchRequest,
            crate::modules::watch::dto::TrackWatchResponse,
            crate::modules::watch::dto::WatchHistoryResponse,
        )
    ),
    tags(
        (name = "Auth", description = "Authentication endpoints"),
        (name = "Videos", description = "Video catalog and upload"),
        (name = "Ratings", description = "Per-user video ratings"),
        (name = "Watch History", description = "View counters and resume positions")
    ),
    security(
        ("bearer_auth" = [])
    ),
    modifiers(&SecurityAddon)
)]
pub struct ApiDoc;

use utoipa::openapi::security::{HttpAuthScheme, HttpBuilder, SecurityScheme};
use utoipa::Modify;

pub struct SecurityAddon;

impl Modify for SecurityAddon {
    fn modify(&self, openapi: &mut utoipa::openapi::OpenApi) {
        if let Some(components) = openapi.components.as_mut() {
            components.add_security_scheme(
                "bearer_auth",
                SecurityScheme::Http(
                    HttpBuilder::new()
                        .scheme(HttpAuthScheme::Bearer)
                        .bearer_format("JWT")
                        .build(),
                ),
            );
        }
    }
}
