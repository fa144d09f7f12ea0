use serde::{Deserialize, Serialize};
use sqlx::FromRow;
use time::OffsetDateTime;

#[derive(Debug, Serialize, Deserialize, FromRow, Clone)]
pub struct WatchHistoryEntry {
    pub id: i64,
    pub user_id: i64,
    pub video_id: i64,
    pub last_position: f64,
    pub last_watched_at: OffsetDateTime,
}
