use super::model::VideoRating;
use serde::{Deserialize, Serialize};
use time::OffsetDateTime;
use utoipa::ToSchema;

pub const MIN_RATING: f64 = 1.0;
pub const MAX_RATING: f64 = 5.0;

#[derive(Debug, Deserialize, ToSchema)]
pub struct RateVideoRequest {
    pub rating: f64,
}

impl RateVideoRequest {
    pub fn is_in_range(&self) -> bool {
        (MIN_RATING..=MAX_RATING).contains(&self.rating)
    }
}

#[derive(Debug, Serialize, ToSchema)]
pub struct RatingResponse {
    pub user_id: i64,
    pub video_id: i64,
    pub rating: f64,
    #[serde(with = "time::serde::iso8601")]
    #[schema(value_type = String, format = DateTime)]
    pub rated_at: OffsetDateTime,
}

impl From<VideoRating> for RatingResponse {
    fn from(r: VideoRating) -> Self {
        Self {
            user_id: r.user_id,
            video_id: r.video_id,
            rating: r.rating,
            rated_at: r.rated_at,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn range_bounds_are_inclusive() {
        assert!(RateVideoRequest { rating: 1.0 }.is_in_range());
        assert!(RateVideoRequest { rating: 5.0 }.is_in_range());
        assert!(RateVideoRequest { rating: 3.5 }.is_in_range());
        assert!(!RateVideoRequest { rating: 0.99 }.is_in_range());
        assert!(!RateVideoRequest { rating: 5.01 }.is_in_range());
        assert!(!RateVideoRequest { rating: f64::NAN }.is_in_range());
    }
}
