use super::model::{Video, VideoStatus};
use serde::{Deserialize, Serialize};
use time::OffsetDateTime;
use utoipa::ToSchema;

/// Metadata fields accompanying an upload, collected from the multipart
/// form before validation.
#[derive(Debug, Default)]
pub struct UploadVideoMeta {
    pub title: Option<String>,
    pub description: Option<String>,
    pub video_type: Option<String>,
    pub season: Option<i32>,
    pub episode: Option<i32>,
    pub duration_seconds: Option<i32>,
}

#[derive(Debug, Deserialize, ToSchema)]
pub struct UpdateVideoRequest {
    pub title: Option<String>,
    pub description: Option<String>,
    pub video_type: Option<String>,
    pub season: Option<i32>,
    pub episode: Option<i32>,
    pub duration_seconds: Option<i32>,
}

#[derive(Debug, Serialize, ToSchema)]
pub struct VideoResponse {
    pub id: i64,
    pub title: Option<String>,
    pub description: Option<String>,
    /// Defaults to "unknown" when the asset has no category, so clients
    /// never have to render a null.
    pub video_type: String,
    pub season: Option<i32>,
    pub episode: Option<i32>,
    /// Defaults to 0 when the declared duration is unknown.
    pub duration: i32,
    pub hls_master_path: Option<String>,
    pub status: VideoStatus,
    pub is_processed: bool,
    pub views_count: i64,
    #[serde(with = "time::serde::iso8601")]
    #[schema(value_type = String, format = DateTime)]
    pub created_at: OffsetDateTime,
}

impl From<Video> for VideoResponse {
    fn from(video: Video) -> Self {
        let status = video.status();
        Self {
            id: video.id,
            title: video.title,
            description: video.description,
            video_type: video.video_type.unwrap_or_else(|| "unknown".to_string()),
            season: video.season,
            episode: video.episode,
            duration: video.duration_seconds.unwrap_or(0),
            hls_master_path: video.hls_master_path,
            status,
            is_processed: status == VideoStatus::Processed,
            views_count: video.views_count,
            created_at: video.created_at,
        }
    }
}

#[derive(Debug, Serialize, ToSchema)]
pub struct VideoDetailsResponse {
    pub id: i64,
    pub title: Option<String>,
    pub description: Option<String>,
    pub duration: i32,
    /// Average of all submitted ratings, rounded to 2 decimals; null when
    /// the asset has no ratings yet.
    pub average_rating: Option<f64>,
}

#[derive(Debug, Serialize, ToSchema)]
pub struct ViewCountResponse {
    pub views_count: i64,
}

#[cfg(test)]
mod tests {
    use super::*;
    use time::OffsetDateTime;

    fn bare_video() -> Video {
        Video {
            id: 1,
            title: Some("t".to_string()),
            description: None,
            video_type: None,
            season: None,
            episode: None,
            duration_seconds: None,
            source_path: "x.mp4".to_string(),
            hls_master_path: None,
            status: "UNPROCESSED".to_string(),
            last_error: None,
            failed_at: None,
            views_count: 0,
            created_at: OffsetDateTime::UNIX_EPOCH,
            updated_at: OffsetDateTime::UNIX_EPOCH,
        }
    }

    #[test]
    fn missing_fields_get_client_friendly_defaults() {
        let resp = VideoResponse::from(bare_video());
        assert_eq!(resp.video_type, "unknown");
        assert_eq!(resp.duration, 0);
        assert!(!resp.is_processed);
    }

    #[test]
    fn processed_video_reports_manifest() {
        let mut video = bare_video();
        video.status = "PROCESSED".to_string();
        video.hls_master_path = Some("out/1_hls/master.m3u8".to_string());
        video.duration_seconds = Some(120);
        video.video_type = Some("film".to_string());

        let resp = VideoResponse::from(video);
        assert!(resp.is_processed);
        assert_eq!(resp.duration, 120);
        assert_eq!(resp.video_type, "film");
        assert_eq!(resp.hls_master_path.as_deref(), Some("out/1_hls/master.m3u8"));
    }
}
