use super::dto::{TrackWatchRequest, TrackWatchResponse, WatchHistoryResponse};
use super::repository::WatchRepository;
use crate::common::error::ApiError;
use crate::modules::auth::repository::AuthRepository;
use crate::modules::video::repository::VideoRepository;
use crate::state::AppState;

pub struct WatchService;

impl WatchService {
    /// One watch event both counts a view and remembers where the user left
    /// off.
    pub async fn track(
        state: AppState,
        username: &str,
        video_id: i64,
        req: TrackWatchRequest,
    ) -> Result<TrackWatchResponse, ApiError> {
        if req.position < 0.0 || !req.position.is_finite() {
            return Err(ApiError::Validation(
                "position must be a non-negative number of seconds".to_string(),
            ));
        }

        let user_id = Self::resolve_user(&state, username).await?;

        let views_count = VideoRepository::increment_views(&state.db, video_id)
            .await?
            .ok_or_else(|| ApiError::NotFound("Video not found".to_string()))?;

        let entry =
            WatchRepository::upsert_position(&state.db, user_id, video_id, req.position).await?;

        Ok(TrackWatchResponse {
            views_count,
            last_position: entry.last_position,
        })
    }

    pub async fn continue_watching(
        state: AppState,
        username: &str,
    ) -> Result<Vec<WatchHistoryResponse>, ApiError> {
        let user_id = Self::resolve_user(&state, username).await?;

        let entries = WatchRepository::list_for_user(&state.db, user_id).await?;
        if entries.is_empty() {
            return Err(ApiError::NotFound("No watch history found".to_string()));
        }

        Ok(entries.into_iter().map(WatchHistoryResponse::from).collect())
    }

    async fn resolve_user(state: &AppState, username: &str) -> Result<i64, ApiError> {
        let user = AuthRepository::find_user_by_username(&state.db, username)
            .await?
            .ok_or_else(|| ApiError::Auth("Could not validate credentials".to_string()))?;
        Ok(user.id)
    }
}
