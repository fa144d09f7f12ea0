use super::dto::{
    UpdateVideoRequest, UploadVideoMeta, VideoDetailsResponse, VideoResponse, ViewCountResponse,
};
use super::events::TranscodeJob;
use super::model::VideoKind;
use super::repository::VideoRepository;
use crate::common::error::ApiError;
use crate::common::upload::{hls_output_dir, remove_file_best_effort};
use crate::state::AppState;
use std::path::Path;
use tracing::info;

/// Upload metadata after invariant checks.
#[derive(Debug, PartialEq)]
pub struct ValidatedMeta {
    pub title: String,
    pub description: String,
    pub video_type: VideoKind,
    pub season: Option<i32>,
    pub episode: Option<i32>,
    pub duration_seconds: Option<i32>,
}

pub struct VideoService;

impl VideoService {
    /// Checks the upload form fields. `season`/`episode` must be present
    /// exactly when the category is a series episode; they are rejected (not
    /// silently dropped) elsewhere.
    pub fn validate_meta(meta: UploadVideoMeta) -> Result<ValidatedMeta, ApiError> {
        let title = meta
            .title
            .filter(|t| !t.trim().is_empty())
            .ok_or_else(|| ApiError::Validation("Missing required field: title".to_string()))?;
        let description = meta.description.ok_or_else(|| {
            ApiError::Validation("Missing required field: description".to_string())
        })?;
        let kind_raw = meta.video_type.ok_or_else(|| {
            ApiError::Validation("Missing required field: video_type".to_string())
        })?;
        let kind = VideoKind::parse(&kind_raw).ok_or_else(|| {
            ApiError::Validation(format!(
                "Invalid video_type '{}': expected film, series_episode or other",
                kind_raw
            ))
        })?;

        if kind.has_season_episode() {
            if meta.season.is_none() || meta.episode.is_none() {
                return Err(ApiError::Validation(
                    "season and episode are required for series episodes".to_string(),
                ));
            }
        } else if meta.season.is_some() || meta.episode.is_some() {
            return Err(ApiError::Validation(
                "season and episode are only valid for series episodes".to_string(),
            ));
        }

        if let Some(d) = meta.duration_seconds {
            if d < 0 {
                return Err(ApiError::Validation("duration must be non-negative".to_string()));
            }
        }

        Ok(ValidatedMeta {
            title,
            description,
            video_type: kind,
            season: meta.season,
            episode: meta.episode,
            duration_seconds: meta.duration_seconds,
        })
    }

    /// Submission step after the payload is already on disk: create the
    /// catalog row in UNPROCESSED state, then enqueue exactly one transcode
    /// job and return without waiting for it. A DB failure removes the
    /// stored file so no orphan payload survives silently.
    pub async fn submit(
        state: AppState,
        meta: ValidatedMeta,
        source_path: &Path,
    ) -> Result<VideoResponse, ApiError> {
        let source = source_path.to_string_lossy();

        let video = match VideoRepository::create(
            &state.db,
            &meta.title,
            &meta.description,
            meta.video_type.as_str(),
            meta.season,
            meta.episode,
            meta.duration_seconds,
            &source,
        )
        .await
        {
            Ok(v) => v,
            Err(e) => {
                remove_file_best_effort(source_path).await;
                return Err(ApiError::Internal(e.context(
                    "metadata was not persisted; the uploaded file has been removed",
                )));
            }
        };

        let output_dir = hls_output_dir(&state.config.upload_dir, video.id);
        let job = TranscodeJob {
            video_id: video.id,
            source_path: source.to_string(),
            output_dir: output_dir.to_string_lossy().to_string(),
        };

        if let Err(e) = state.queue.publish_job(&job).await {
            let msg = format!("failed to enqueue transcode job: {}", e);
            let _ = VideoRepository::mark_failed(&state.db, video.id, &msg).await;
            return Err(ApiError::Internal(e.context("failed to enqueue transcode job")));
        }

        info!(video_id = video.id, "transcode job enqueued");

        let response = VideoResponse::from(video);

        // Best-effort one-way mirror; never blocks or fails the submission.
        let mirror = state.mirror.clone();
        let mirror_payload = serde_json::json!({
            "id": response.id,
            "title": response.title,
            "video_type": response.video_type,
            "duration": response.duration,
        });
        tokio::spawn(async move { mirror.sync(&mirror_payload).await });

        Ok(response)
    }

    pub async fn list(state: AppState) -> Result<Vec<VideoResponse>, ApiError> {
        let videos = VideoRepository::list(&state.db).await?;
        Ok(videos.into_iter().map(VideoResponse::from).collect())
    }

    pub async fn get(state: AppState, id: i64) -> Result<VideoResponse, ApiError> {
        let video = VideoRepository::get_by_id(&state.db, id)
            .await?
            .ok_or_else(|| ApiError::NotFound("Video not found".to_string()))?;
        Ok(VideoResponse::from(video))
    }

    pub async fn details(state: AppState, id: i64) -> Result<VideoDetailsResponse, ApiError> {
        let video = VideoRepository::get_by_id(&state.db, id)
            .await?
            .ok_or_else(|| ApiError::NotFound("Video not found".to_string()))?;

        let average_rating = VideoRepository::average_rating(&state.db, id)
            .await?
            .map(|avg| (avg * 100.0).round() / 100.0);

        Ok(VideoDetailsResponse {
            id: video.id,
            title: video.title,
            description: video.description,
            duration: video.duration_seconds.unwrap_or(0),
            average_rating,
        })
    }

    pub async fn update(
        state: AppState,
        id: i64,
        req: UpdateVideoRequest,
    ) -> Result<VideoResponse, ApiError> {
        if let Some(kind_raw) = &req.video_type {
            VideoKind::parse(kind_raw).ok_or_else(|| {
                ApiError::Validation(format!("Invalid video_type '{}'", kind_raw))
            })?;
        }

        let video = VideoRepository::update(
            &state.db,
            id,
            req.title,
            req.description,
            req.video_type,
            req.season,
            req.episode,
            req.duration_seconds,
        )
        .await?
        .ok_or_else(|| ApiError::NotFound("Video not found".to_string()))?;

        Ok(VideoResponse::from(video))
    }

    pub async fn delete(state: AppState, id: i64) -> Result<(), ApiError> {
        let video = VideoRepository::get_by_id(&state.db, id)
            .await?
            .ok_or_else(|| ApiError::NotFound("Video not found".to_string()))?;

        // Ratings and watch history go with the row via FK cascade.
        VideoRepository::delete(&state.db, id).await?;

        remove_file_best_effort(Path::new(&video.source_path)).await;
        let hls_dir = hls_output_dir(&state.config.upload_dir, id);
        if let Err(e) = tokio::fs::remove_dir_all(&hls_dir).await {
            if e.kind() != std::io::ErrorKind::NotFound {
                tracing::warn!("failed to remove {}: {}", hls_dir.display(), e);
            }
        }

        Ok(())
    }

    pub async fn increment_view(state: AppState, id: i64) -> Result<ViewCountResponse, ApiError> {
        let views_count = VideoRepository::increment_views(&state.db, id)
            .await?
            .ok_or_else(|| ApiError::NotFound("Video not found".to_string()))?;
        Ok(ViewCountResponse { views_count })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn meta(video_type: &str, season: Option<i32>, episode: Option<i32>) -> UploadVideoMeta {
        UploadVideoMeta {
            title: Some("Title".to_string()),
            description: Some("Desc".to_string()),
            video_type: Some(video_type.to_string()),
            season,
            episode,
            duration_seconds: Some(120),
        }
    }

    #[test]
    fn film_with_season_is_rejected() {
        let err = VideoService::validate_meta(meta("film", Some(1), None)).unwrap_err();
        assert!(matches!(err, ApiError::Validation(_)));
    }

    #[test]
    fn episode_requires_season_and_episode() {
        let err = VideoService::validate_meta(meta("series_episode", Some(1), None)).unwrap_err();
        assert!(matches!(err, ApiError::Validation(_)));

        let ok = VideoService::validate_meta(meta("series_episode", Some(1), Some(3))).unwrap();
        assert_eq!(ok.season, Some(1));
        assert_eq!(ok.episode, Some(3));
    }

    #[test]
    fn unknown_category_is_rejected() {
        let err = VideoService::validate_meta(meta("podcast", None, None)).unwrap_err();
        assert!(matches!(err, ApiError::Validation(_)));
    }

    #[test]
    fn missing_title_is_rejected() {
        let mut m = meta("film", None, None);
        m.title = Some("   ".to_string());
        let err = VideoService::validate_meta(m).unwrap_err();
        assert!(matches!(err, ApiError::Validation(_)));
    }

    #[test]
    fn negative_duration_is_rejected() {
        let mut m = meta("film", None, None);
        m.duration_seconds = Some(-5);
        let err = VideoService::validate_meta(m).unwrap_err();
        assert!(matches!(err, ApiError::Validation(_)));
    }

    #[test]
    fn duration_may_be_unknown() {
        let mut m = meta("other", None, None);
        m.duration_seconds = None;
        let ok = VideoService::validate_meta(m).unwrap();
        assert_eq!(ok.duration_seconds, None);
    }
}
