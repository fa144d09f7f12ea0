use axum::extract::multipart::Field;
use futures_util::StreamExt;
use std::path::{Path, PathBuf};
use tokio::fs::File;
use tokio::io::AsyncWriteExt;
use tracing::error;
use uuid::Uuid;

/// Derives a collision-free storage key for an uploaded file: a generated
/// UUID plus the original extension. Keying by the client-supplied filename
/// would let a second upload silently overwrite the first.
pub fn storage_key(original_name: &str) -> String {
    let ext = Path::new(original_name)
        .extension()
        .and_then(|e| e.to_str())
        .unwrap_or("bin");
    format!("{}.{}", Uuid::new_v4(), ext)
}

/// True for content types we accept as a video payload. Browsers that don't
/// sniff the type send `application/octet-stream`.
pub fn is_video_content_type(content_type: &str) -> bool {
    content_type.starts_with("video/") || content_type == "application/octet-stream"
}

/// Streams a multipart field to `dest` chunk by chunk, never buffering the
/// whole payload. A failed or interrupted stream removes the partial file so
/// no catalog row can ever reference an unwritten payload.
pub async fn stream_to_disk(mut field: Field<'_>, dest: &Path) -> Result<u64, std::io::Error> {
    if let Some(parent) = dest.parent() {
        tokio::fs::create_dir_all(parent).await?;
    }

    let mut file = File::create(dest).await?;
    let mut written: u64 = 0;

    while let Some(chunk) = field.next().await {
        let chunk = match chunk {
            Ok(c) => c,
            Err(e) => {
                error!("upload stream error: {}", e);
                abort_write(dest).await;
                return Err(std::io::Error::new(
                    std::io::ErrorKind::UnexpectedEof,
                    format!("upload stream interrupted: {}", e),
                ));
            }
        };

        if let Err(e) = file.write_all(&chunk).await {
            error!("upload write error: {}", e);
            abort_write(dest).await;
            return Err(e);
        }
        written += chunk.len() as u64;
    }

    file.flush().await?;
    Ok(written)
}

pub async fn remove_file_best_effort(path: &Path) {
    if let Err(e) = tokio::fs::remove_file(path).await {
        error!("failed to remove file {}: {}", path.display(), e);
    }
}

async fn abort_write(dest: &Path) {
    let _ = tokio::fs::remove_file(dest).await;
}

/// Output directory for the HLS renditions of one asset: `{base}/{id}_hls/`.
pub fn hls_output_dir(base: &str, video_id: i64) -> PathBuf {
    Path::new(base).join(format!("{}_hls", video_id))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn storage_key_keeps_extension() {
        let key = storage_key("My Movie.final.MP4");
        assert!(key.ends_with(".MP4"));
        // uuid (36 chars) + "." + ext
        assert_eq!(key.len(), 36 + 1 + 3);
    }

    #[test]
    fn storage_key_without_extension_falls_back() {
        assert!(storage_key("rawdump").ends_with(".bin"));
    }

    #[test]
    fn storage_keys_do_not_collide() {
        assert_ne!(storage_key("a.mp4"), storage_key("a.mp4"));
    }

    #[tokio::test]
    async fn best_effort_remove_deletes_existing_file() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("payload.mp4");
        tokio::fs::write(&path, b"data").await.unwrap();

        remove_file_best_effort(&path).await;
        assert!(!path.exists());

        // a second removal only logs
        remove_file_best_effort(&path).await;
    }

    #[test]
    fn content_type_gate() {
        assert!(is_video_content_type("video/mp4"));
        assert!(is_video_content_type("application/octet-stream"));
        assert!(!is_video_content_type("image/png"));
        assert!(!is_video_content_type("text/html"));
    }

    #[test]
    fn hls_dir_is_keyed_by_id() {
        let dir = hls_output_dir("./uploaded_videos", 42);
        assert!(dir.ends_with("42_hls"));
    }
}
