use serde::{Deserialize, Serialize};
use sqlx::FromRow;
use time::OffsetDateTime;
use utoipa::ToSchema;

/// Processing lifecycle of a catalog asset. `Processed` and `Failed` are
/// terminal: re-uploading creates a new asset instead of mutating an old one.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, ToSchema)]
pub enum VideoStatus {
    Unprocessed,
    Processing,
    Processed,
    Failed,
}

impl VideoStatus {
    pub const ALL: [VideoStatus; 4] = [
        VideoStatus::Unprocessed,
        VideoStatus::Processing,
        VideoStatus::Processed,
        VideoStatus::Failed,
    ];

    pub fn as_str(&self) -> &'static str {
        match self {
            VideoStatus::Unprocessed => "UNPROCESSED",
            VideoStatus::Processing => "PROCESSING",
            VideoStatus::Processed => "PROCESSED",
            VideoStatus::Failed => "FAILED",
        }
    }

    pub fn is_terminal(&self) -> bool {
        matches!(self, VideoStatus::Processed | VideoStatus::Failed)
    }
}

impl From<&str> for VideoStatus {
    fn from(s: &str) -> Self {
        match s {
            "PROCESSING" => VideoStatus::Processing,
            "PROCESSED" => VideoStatus::Processed,
            "FAILED" => VideoStatus::Failed,
            _ => VideoStatus::Unprocessed,
        }
    }
}

/// Catalog category of an asset. `season`/`episode` are meaningful only for
/// `SeriesEpisode`.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum VideoKind {
    Film,
    SeriesEpisode,
    Other,
}

impl VideoKind {
    pub fn parse(s: &str) -> Option<Self> {
        match s {
            "film" => Some(VideoKind::Film),
            "series_episode" | "series-episode" => Some(VideoKind::SeriesEpisode),
            "other" => Some(VideoKind::Other),
            _ => None,
        }
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            VideoKind::Film => "film",
            VideoKind::SeriesEpisode => "series_episode",
            VideoKind::Other => "other",
        }
    }

    pub fn has_season_episode(&self) -> bool {
        matches!(self, VideoKind::SeriesEpisode)
    }
}

#[derive(Debug, Serialize, Deserialize, FromRow, Clone)]
pub struct Video {
    pub id: i64,
    pub title: Option<String>,
    pub description: Option<String>,
    pub video_type: Option<String>,
    pub season: Option<i32>,
    pub episode: Option<i32>,
    pub duration_seconds: Option<i32>,
    pub source_path: String,
    pub hls_master_path: Option<String>,
    pub status: String,
    pub last_error: Option<String>,
    pub failed_at: Option<OffsetDateTime>,
    pub views_count: i64,
    pub created_at: OffsetDateTime,
    pub updated_at: OffsetDateTime,
}

impl Video {
    pub fn status(&self) -> VideoStatus {
        VideoStatus::from(self.status.as_str())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn status_roundtrip() {
        for status in VideoStatus::ALL {
            assert_eq!(VideoStatus::from(status.as_str()), status);
        }
    }

    #[test]
    fn unknown_status_is_unprocessed() {
        assert_eq!(VideoStatus::from("GARBAGE"), VideoStatus::Unprocessed);
    }

    #[test]
    fn terminal_states() {
        assert!(!VideoStatus::Unprocessed.is_terminal());
        assert!(!VideoStatus::Processing.is_terminal());
        assert!(VideoStatus::Processed.is_terminal());
        assert!(VideoStatus::Failed.is_terminal());
    }

    #[test]
    fn kind_parsing_accepts_both_spellings() {
        assert_eq!(VideoKind::parse("film"), Some(VideoKind::Film));
        assert_eq!(VideoKind::parse("series_episode"), Some(VideoKind::SeriesEpisode));
        assert_eq!(VideoKind::parse("series-episode"), Some(VideoKind::SeriesEpisode));
        assert_eq!(VideoKind::parse("documentary"), None);
    }

    #[test]
    fn only_episodes_carry_season_numbers() {
        assert!(VideoKind::SeriesEpisode.has_season_episode());
        assert!(!VideoKind::Film.has_season_episode());
        assert!(!VideoKind::Other.has_season_episode());
    }
}
