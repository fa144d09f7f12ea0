use super::dto::{RateVideoRequest, RatingResponse, MAX_RATING, MIN_RATING};
use super::repository::RatingRepository;
use crate::common::error::ApiError;
use crate::modules::auth::repository::AuthRepository;
use crate::modules::video::repository::VideoRepository;
use crate::state::AppState;

pub struct RatingService;

impl RatingService {
    pub async fn rate(
        state: AppState,
        username: &str,
        video_id: i64,
        req: RateVideoRequest,
    ) -> Result<RatingResponse, ApiError> {
        if !req.is_in_range() {
            return Err(ApiError::Validation(format!(
                "Rating must be between {} and {}",
                MIN_RATING, MAX_RATING
            )));
        }

        let user = Self::resolve_user(&state, username).await?;

        if VideoRepository::get_by_id(&state.db, video_id)
            .await?
            .is_none()
        {
            return Err(ApiError::NotFound("Video not found".to_string()));
        }

        let rating = RatingRepository::upsert(&state.db, user, video_id, req.rating).await?;
        Ok(RatingResponse::from(rating))
    }

    pub async fn list_for_video(
        state: AppState,
        video_id: i64,
    ) -> Result<Vec<RatingResponse>, ApiError> {
        let ratings = RatingRepository::list_for_video(&state.db, video_id).await?;
        if ratings.is_empty() {
            return Err(ApiError::NotFound(
                "No ratings found for this video".to_string(),
            ));
        }
        Ok(ratings.into_iter().map(RatingResponse::from).collect())
    }

    pub async fn user_rating(
        state: AppState,
        username: &str,
        video_id: i64,
    ) -> Result<RatingResponse, ApiError> {
        let user = Self::resolve_user(&state, username).await?;

        let rating = RatingRepository::find_by_user_and_video(&state.db, user, video_id)
            .await?
            .ok_or_else(|| {
                ApiError::NotFound("No rating found for this video by the current user".to_string())
            })?;

        Ok(RatingResponse::from(rating))
    }

    async fn resolve_user(state: &AppState, username: &str) -> Result<i64, ApiError> {
        let user = AuthRepository::find_user_by_username(&state.db, username)
            .await?
            .ok_or_else(|| ApiError::Auth("Could not validate credentials".to_string()))?;
        Ok(user.id)
    }
}
