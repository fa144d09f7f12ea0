use super::model::{Video, VideoStatus};
use anyhow::Result;
use sqlx::PgPool;

/// Statuses a queue delivery may still act on. The reconciliation UPDATEs
/// below are fenced on this set, so a duplicate delivery after a terminal
/// write, or a job for a deleted row, matches zero rows instead of failing.
fn active_statuses() -> Vec<String> {
    VideoStatus::ALL
        .iter()
        .filter(|s| !s.is_terminal())
        .map(|s| s.as_str().to_string())
        .collect()
}

pub struct VideoRepository;

impl VideoRepository {
    #[allow(clippy::too_many_arguments)]
    pub async fn create(
        pool: &PgPool,
        title: &str,
        description: &str,
        video_type: &str,
        season: Option<i32>,
        episode: Option<i32>,
        duration_seconds: Option<i32>,
        source_path: &str,
    ) -> Result<Video> {
        let video = sqlx::query_as::<_, Video>(
            r#"
            INSERT INTO videos
                (title, description, video_type, season, episode, duration_seconds, source_path, status)
            VALUES ($1, $2, $3, $4, $5, $6, $7, $8)
            RETURNING *
            "#,
        )
        .bind(title)
        .bind(description)
        .bind(video_type)
        .bind(season)
        .bind(episode)
        .bind(duration_seconds)
        .bind(source_path)
        .bind(VideoStatus::Unprocessed.as_str())
        .fetch_one(pool)
        .await?;

        Ok(video)
    }

    pub async fn list(pool: &PgPool) -> Result<Vec<Video>> {
        let videos = sqlx::query_as::<_, Video>("SELECT * FROM videos ORDER BY created_at DESC")
            .fetch_all(pool)
            .await?;
        Ok(videos)
    }

    pub async fn get_by_id(pool: &PgPool, id: i64) -> Result<Option<Video>> {
        let video = sqlx::query_as::<_, Video>("SELECT * FROM videos WHERE id = $1")
            .bind(id)
            .fetch_optional(pool)
            .await?;
        Ok(video)
    }

    pub async fn average_rating(pool: &PgPool, id: i64) -> Result<Option<f64>> {
        let avg: Option<f64> =
            sqlx::query_scalar("SELECT AVG(rating) FROM video_ratings WHERE video_id = $1")
                .bind(id)
                .fetch_one(pool)
                .await?;
        Ok(avg)
    }

    #[allow(clippy::too_many_arguments)]
    pub async fn update(
        pool: &PgPool,
        id: i64,
        title: Option<String>,
        description: Option<String>,
        video_type: Option<String>,
        season: Option<i32>,
        episode: Option<i32>,
        duration_seconds: Option<i32>,
    ) -> Result<Option<Video>> {
        let video = sqlx::query_as::<_, Video>(
            r#"
            UPDATE videos
            SET
                title = COALESCE($1, title),
                description = COALESCE($2, description),
                video_type = COALESCE($3, video_type),
                season = COALESCE($4, season),
                episode = COALESCE($5, episode),
                duration_seconds = COALESCE($6, duration_seconds),
                updated_at = NOW()
            WHERE id = $7
            RETURNING *
            "#,
        )
        .bind(title)
        .bind(description)
        .bind(video_type)
        .bind(season)
        .bind(episode)
        .bind(duration_seconds)
        .bind(id)
        .fetch_optional(pool)
        .await?;
        Ok(video)
    }

    pub async fn delete(pool: &PgPool, id: i64) -> Result<bool> {
        let result = sqlx::query("DELETE FROM videos WHERE id = $1")
            .bind(id)
            .execute(pool)
            .await?;
        Ok(result.rows_affected() > 0)
    }

    pub async fn increment_views(pool: &PgPool, id: i64) -> Result<Option<i64>> {
        let count: Option<i64> = sqlx::query_scalar(
            "UPDATE videos SET views_count = views_count + 1, updated_at = NOW()
             WHERE id = $1 RETURNING views_count",
        )
        .bind(id)
        .fetch_optional(pool)
        .await?;
        Ok(count)
    }

    // --- Reconciliation ---
    //
    // Every transition below is a single conditional UPDATE, so duplicate
    // queue deliveries and in-flight deletes collapse to rows_affected == 0.
    // Only one terminal write can ever succeed for a given asset.

    /// UNPROCESSED|PROCESSING -> PROCESSING. Returns false when the asset is
    /// gone or already terminal, in which case the job is a no-op.
    pub async fn claim_for_processing(pool: &PgPool, id: i64) -> Result<bool> {
        let result = sqlx::query(
            "UPDATE videos SET status = $2, updated_at = NOW()
             WHERE id = $1 AND status = ANY($3)",
        )
        .bind(id)
        .bind(VideoStatus::Processing.as_str())
        .bind(active_statuses())
        .execute(pool)
        .await?;
        Ok(result.rows_affected() > 0)
    }

    /// Terminal success: sets PROCESSED and the master manifest location.
    pub async fn mark_processed(pool: &PgPool, id: i64, hls_master_path: &str) -> Result<bool> {
        let result = sqlx::query(
            "UPDATE videos
             SET status = $2, hls_master_path = $3, last_error = NULL, updated_at = NOW()
             WHERE id = $1 AND status = ANY($4)",
        )
        .bind(id)
        .bind(VideoStatus::Processed.as_str())
        .bind(hls_master_path)
        .bind(active_statuses())
        .execute(pool)
        .await?;
        Ok(result.rows_affected() > 0)
    }

    /// Terminal failure: sets FAILED and persists the error text and
    /// timestamp for operators.
    pub async fn mark_failed(pool: &PgPool, id: i64, error: &str) -> Result<bool> {
        let result = sqlx::query(
            "UPDATE videos
             SET status = $2, last_error = $3, failed_at = NOW(), updated_at = NOW()
             WHERE id = $1 AND status = ANY($4)",
        )
        .bind(id)
        .bind(VideoStatus::Failed.as_str())
        .bind(error)
        .bind(active_statuses())
        .execute(pool)
        .await?;
        Ok(result.rows_affected() > 0)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    // All three reconciliation UPDATEs share the `status = ANY(active)` fence
    // built here, so pinning the set pins the state machine.

    #[test]
    fn redelivery_after_terminal_write_matches_no_rows() {
        let active = active_statuses();
        assert!(!active.contains(&VideoStatus::Processed.as_str().to_string()));
        assert!(!active.contains(&VideoStatus::Failed.as_str().to_string()));
    }

    #[test]
    fn late_failure_cannot_overwrite_a_processed_row() {
        // mark_failed is fenced on the same active set as mark_processed:
        // whichever terminal write lands first wins, the other matches
        // nothing.
        assert!(VideoStatus::Processed.is_terminal());
        assert!(!active_statuses().contains(&"PROCESSED".to_string()));
    }

    #[test]
    fn fresh_and_in_flight_rows_stay_claimable() {
        // PROCESSING stays in the set so a redelivered job whose first
        // attempt crashed mid-transcode can reclaim the row.
        assert_eq!(
            active_statuses(),
            vec!["UNPROCESSED".to_string(), "PROCESSING".to_string()]
        );
    }
}
