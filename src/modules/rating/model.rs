use serde::{Deserialize, Serialize};
use sqlx::FromRow;
use time::OffsetDateTime;

#[derive(Debug, Serialize, Deserialize, FromRow, Clone)]
pub struct VideoRating {
    pub id: i64,
    pub user_id: i64,
    pub video_id: i64,
    pub rating: f64,
    pub rated_at: OffsetDateTime,
}
