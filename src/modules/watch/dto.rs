use super::model::WatchHistoryEntry;
use serde::{Deserialize, Serialize};
use time::OffsetDateTime;
use utoipa::ToSchema;

#[derive(Debug, Deserialize, ToSchema)]
pub struct TrackWatchRequest {
    /// Last playback position, in seconds.
    pub position: f64,
}

#[derive(Debug, Serialize, ToSchema)]
pub struct WatchHistoryResponse {
    pub video_id: i64,
    pub last_position: f64,
    #[serde(with = "time::serde::iso8601")]
    #[schema(value_type = String, format = DateTime)]
    pub last_watched_at: OffsetDateTime,
}

impl From<WatchHistoryEntry> for WatchHistoryResponse {
    fn from(entry: WatchHistoryEntry) -> Self {
        Self {
            video_id: entry.video_id,
            last_position: entry.last_position,
            last_watched_at: entry.last_watched_at,
        }
    }
}

#[derive(Debug, Serialize, ToSchema)]
pub struct TrackWatchResponse {
    pub views_count: i64,
    pub last_position: f64,
}
