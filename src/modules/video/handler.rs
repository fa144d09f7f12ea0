use super::dto::{
    UpdateVideoRequest, UploadVideoMeta, VideoDetailsResponse, VideoResponse, ViewCountResponse,
};
use super::service::VideoService;
use crate::common::error::ApiError;
use crate::common::response::{ApiResponse, ApiSuccess};
use crate::common::upload::{
    is_video_content_type, remove_file_best_effort, storage_key, stream_to_disk,
};
use crate::state::AppState;
use axum::{
    extract::{multipart::Field, Multipart, Path, State},
    http::StatusCode,
    Json,
};
use std::path::PathBuf;
use tracing::info;

fn parse_int_field(name: &str, value: &str) -> Result<Option<i32>, ApiError> {
    let trimmed = value.trim();
    if trimmed.is_empty() {
        return Ok(None);
    }
    trimmed
        .parse::<i32>()
        .map(Some)
        .map_err(|_| ApiError::Validation(format!("Invalid integer for field '{}'", name)))
}

async fn text_field(field: Field<'_>, name: &str) -> Result<String, ApiError> {
    field
        .text()
        .await
        .map_err(|e| ApiError::Validation(format!("Could not read field '{}': {}", name, e)))
}

/// Upload a video and submit it for transcoding
///
/// Multipart form: a `file` part plus text fields `title`, `description`,
/// `video_type` (film | series_episode | other), `season`, `episode`,
/// `duration`. The response acknowledges submission only; transcoding
/// happens in the background.
#[utoipa::path(
    post,
    path = "/api/v1/videos/upload",
    request_body(content = String, content_type = "multipart/form-data"),
    responses(
        (status = 201, description = "Video accepted for processing", body = ApiResponse<VideoResponse>),
        (status = 400, description = "Bad Request"),
        (status = 401, description = "Unauthorized"),
        (status = 403, description = "Forbidden"),
        (status = 500, description = "Internal Server Error")
    ),
    tag = "Videos",
    security(("bearer_auth" = []))
)]
pub async fn upload_video(
    State(state): State<AppState>,
    mut multipart: Multipart,
) -> Result<ApiSuccess<ApiResponse<VideoResponse>>, ApiError> {
    let (meta, source_path) = read_upload_form(&state.config.upload_dir, &mut multipart).await?;

    let validated = match VideoService::validate_meta(meta) {
        Ok(v) => v,
        Err(e) => {
            // Metadata never reached the catalog; don't leave the payload
            // around either.
            remove_file_best_effort(&source_path).await;
            return Err(e);
        }
    };

    let response = VideoService::submit(state, validated, &source_path).await?;

    Ok(ApiSuccess(
        ApiResponse::success(response, "Video uploaded successfully and is being processed"),
        StatusCode::CREATED,
    ))
}

/// Walks the multipart stream, storing the single `file` part on disk and
/// collecting the text fields. Any error removes an already-stored payload
/// before it propagates.
async fn read_upload_form(
    upload_dir: &str,
    multipart: &mut Multipart,
) -> Result<(UploadVideoMeta, PathBuf), ApiError> {
    let mut stored: Option<PathBuf> = None;

    match read_fields(upload_dir, multipart, &mut stored).await {
        Ok(meta) => match stored {
            Some(path) => Ok((meta, path)),
            None => Err(ApiError::Validation(
                "No file field found in multipart request".to_string(),
            )),
        },
        Err(e) => {
            if let Some(path) = stored {
                remove_file_best_effort(&path).await;
            }
            Err(e)
        }
    }
}

async fn read_fields(
    upload_dir: &str,
    multipart: &mut Multipart,
    stored: &mut Option<PathBuf>,
) -> Result<UploadVideoMeta, ApiError> {
    let mut meta = UploadVideoMeta::default();

    while let Some(field) = multipart
        .next_field()
        .await
        .map_err(|e| ApiError::Validation(format!("Malformed multipart request: {}", e)))?
    {
        let name = field.name().unwrap_or("").to_string();

        match name.as_str() {
            "file" => {
                if stored.is_some() {
                    return Err(ApiError::Validation(
                        "Multiple file parts in upload; exactly one is accepted".to_string(),
                    ));
                }

                let content_type = field.content_type().unwrap_or("application/octet-stream");
                if !is_video_content_type(content_type) {
                    return Err(ApiError::Validation(format!(
                        "Invalid content type '{}': only video uploads are accepted",
                        content_type
                    )));
                }

                let file_name = field.file_name().unwrap_or("video.bin").to_string();
                let dest = PathBuf::from(upload_dir).join(storage_key(&file_name));
                info!("storing upload '{}' at {}", file_name, dest.display());

                // The payload must be durably on disk before any DB write.
                let written = stream_to_disk(field, &dest).await?;
                info!("stored {} bytes at {}", written, dest.display());
                *stored = Some(dest);
            }
            "title" => meta.title = Some(text_field(field, "title").await?),
            "description" => meta.description = Some(text_field(field, "description").await?),
            "video_type" => meta.video_type = Some(text_field(field, "video_type").await?),
            "season" => {
                meta.season = parse_int_field("season", &text_field(field, "season").await?)?;
            }
            "episode" => {
                meta.episode = parse_int_field("episode", &text_field(field, "episode").await?)?;
            }
            "duration" => {
                meta.duration_seconds =
                    parse_int_field("duration", &text_field(field, "duration").await?)?;
            }
            _ => {}
        }
    }

    Ok(meta)
}

/// List all videos
#[utoipa::path(
    get,
    path = "/api/v1/videos",
    responses(
        (status = 200, description = "List videos", body = ApiResponse<Vec<VideoResponse>>),
        (status = 500, description = "Internal Server Error")
    ),
    tag = "Videos"
)]
pub async fn list_videos(
    State(state): State<AppState>,
) -> Result<ApiSuccess<ApiResponse<Vec<VideoResponse>>>, ApiError> {
    let videos = VideoService::list(state).await?;
    Ok(ApiSuccess(
        ApiResponse::success(videos, "Videos retrieved successfully"),
        StatusCode::OK,
    ))
}

/// Fetch one video
#[utoipa::path(
    get,
    path = "/api/v1/videos/{id}",
    params(("id" = i64, Path, description = "Video ID")),
    responses(
        (status = 200, description = "Get video", body = ApiResponse<VideoResponse>),
        (status = 404, description = "Video not found")
    ),
    tag = "Videos"
)]
pub async fn get_video(
    State(state): State<AppState>,
    Path(id): Path<i64>,
) -> Result<ApiSuccess<ApiResponse<VideoResponse>>, ApiError> {
    let video = VideoService::get(state, id).await?;
    Ok(ApiSuccess(
        ApiResponse::success(video, "Video retrieved successfully"),
        StatusCode::OK,
    ))
}

/// Fetch derived detail (average rating) for one video
#[utoipa::path(
    get,
    path = "/api/v1/videos/{id}/details",
    params(("id" = i64, Path, description = "Video ID")),
    responses(
        (status = 200, description = "Video details", body = ApiResponse<VideoDetailsResponse>),
        (status = 404, description = "Video not found")
    ),
    tag = "Videos"
)]
pub async fn get_video_details(
    State(state): State<AppState>,
    Path(id): Path<i64>,
) -> Result<ApiSuccess<ApiResponse<VideoDetailsResponse>>, ApiError> {
    let details = VideoService::details(state, id).await?;
    Ok(ApiSuccess(
        ApiResponse::success(details, "Video details retrieved successfully"),
        StatusCode::OK,
    ))
}

/// Update video metadata
#[utoipa::path(
    put,
    path = "/api/v1/videos/{id}",
    params(("id" = i64, Path, description = "Video ID")),
    request_body = UpdateVideoRequest,
    responses(
        (status = 200, description = "Video updated", body = ApiResponse<VideoResponse>),
        (status = 404, description = "Video not found")
    ),
    tag = "Videos",
    security(("bearer_auth" = []))
)]
pub async fn update_video(
    State(state): State<AppState>,
    Path(id): Path<i64>,
    Json(req): Json<UpdateVideoRequest>,
) -> Result<ApiSuccess<ApiResponse<VideoResponse>>, ApiError> {
    let video = VideoService::update(state, id, req).await?;
    Ok(ApiSuccess(
        ApiResponse::success(video, "Video updated successfully"),
        StatusCode::OK,
    ))
}

/// Delete a video and its associated data
#[utoipa::path(
    delete,
    path = "/api/v1/videos/{id}",
    params(("id" = i64, Path, description = "Video ID")),
    responses(
        (status = 200, description = "Video deleted"),
        (status = 404, description = "Video not found")
    ),
    tag = "Videos",
    security(("bearer_auth" = []))
)]
pub async fn delete_video(
    State(state): State<AppState>,
    Path(id): Path<i64>,
) -> Result<ApiSuccess<ApiResponse<()>>, ApiError> {
    VideoService::delete(state, id).await?;
    Ok(ApiSuccess(
        ApiResponse::success((), "Video and all associated data deleted successfully"),
        StatusCode::OK,
    ))
}

/// Increment the view counter
#[utoipa::path(
    post,
    path = "/api/v1/videos/{id}/view",
    params(("id" = i64, Path, description = "Video ID")),
    responses(
        (status = 200, description = "View counted", body = ApiResponse<ViewCountResponse>),
        (status = 404, description = "Video not found")
    ),
    tag = "Videos",
    security(("bearer_auth" = []))
)]
pub async fn increment_view(
    State(state): State<AppState>,
    Path(id): Path<i64>,
) -> Result<ApiSuccess<ApiResponse<ViewCountResponse>>, ApiError> {
    let count = VideoService::increment_view(state, id).await?;
    Ok(ApiSuccess(
        ApiResponse::success(count, "View count incremented successfully"),
        StatusCode::OK,
    ))
}

#[cfg(test)]
mod tests {
    use super::*;
    use axum::body::Body;
    use axum::extract::FromRequest;
    use axum::http::Request;

    const BOUNDARY: &str = "upload-form-test";

    fn part(name: &str, value: &str) -> String {
        format!(
            "--{BOUNDARY}\r\nContent-Disposition: form-data; name=\"{name}\"\r\n\r\n{value}\r\n"
        )
    }

    fn file_part(filename: &str, content_type: &str, data: &str) -> String {
        format!(
            "--{BOUNDARY}\r\nContent-Disposition: form-data; name=\"file\"; \
             filename=\"{filename}\"\r\nContent-Type: {content_type}\r\n\r\n{data}\r\n"
        )
    }

    async fn form(parts: &[String]) -> Multipart {
        let body = format!("{}--{BOUNDARY}--\r\n", parts.concat());
        let request = Request::builder()
            .header(
                "content-type",
                format!("multipart/form-data; boundary={BOUNDARY}"),
            )
            .body(Body::from(body))
            .unwrap();
        Multipart::from_request(request, &()).await.unwrap()
    }

    #[test]
    fn int_fields_parse_or_reject() {
        assert_eq!(parse_int_field("season", " 3 ").unwrap(), Some(3));
        assert_eq!(parse_int_field("season", "").unwrap(), None);
        assert!(parse_int_field("season", "three").is_err());
    }

    #[tokio::test]
    async fn form_fields_and_payload_are_collected() {
        let dir = tempfile::tempdir().unwrap();
        let mut multipart = form(&[
            part("title", "Movie"),
            file_part("movie.mp4", "video/mp4", "payload-bytes"),
            part("duration", "90"),
        ])
        .await;

        let (meta, path) = read_upload_form(dir.path().to_str().unwrap(), &mut multipart)
            .await
            .unwrap();

        assert_eq!(meta.title.as_deref(), Some("Movie"));
        assert_eq!(meta.duration_seconds, Some(90));
        assert_eq!(
            tokio::fs::read_to_string(&path).await.unwrap(),
            "payload-bytes"
        );
    }

    #[tokio::test]
    async fn second_file_part_is_rejected_and_first_is_removed() {
        let dir = tempfile::tempdir().unwrap();
        let mut multipart = form(&[
            file_part("a.mp4", "video/mp4", "first"),
            file_part("b.mp4", "video/mp4", "second"),
        ])
        .await;

        let err = read_upload_form(dir.path().to_str().unwrap(), &mut multipart)
            .await
            .unwrap_err();
        assert!(matches!(err, ApiError::Validation(_)));

        // The already-stored first payload must not be left behind.
        let mut entries = tokio::fs::read_dir(dir.path()).await.unwrap();
        assert!(entries.next_entry().await.unwrap().is_none());
    }

    #[tokio::test]
    async fn missing_file_part_is_a_validation_error() {
        let dir = tempfile::tempdir().unwrap();
        let mut multipart = form(&[part("title", "No payload")]).await;

        let err = read_upload_form(dir.path().to_str().unwrap(), &mut multipart)
            .await
            .unwrap_err();
        assert!(matches!(err, ApiError::Validation(_)));
    }

    #[tokio::test]
    async fn non_video_content_type_is_rejected() {
        let dir = tempfile::tempdir().unwrap();
        let mut multipart = form(&[file_part("a.png", "image/png", "pixels")]).await;

        let err = read_upload_form(dir.path().to_str().unwrap(), &mut multipart)
            .await
            .unwrap_err();
        assert!(matches!(err, ApiError::Validation(_)));
    }
}
