use super::model::WatchHistoryEntry;
use anyhow::Result;
use sqlx::PgPool;

pub struct WatchRepository;

impl WatchRepository {
    pub async fn upsert_position(
        pool: &PgPool,
        user_id: i64,
        video_id: i64,
        position: f64,
    ) -> Result<WatchHistoryEntry> {
        let entry = sqlx::query_as::<_, WatchHistoryEntry>(
            r#"
            INSERT INTO user_watch_history (user_id, video_id, last_position)
            VALUES ($1, $2, $3)
            ON CONFLICT (user_id, video_id)
            DO UPDATE SET last_position = EXCLUDED.last_position, last_watched_at = NOW()
            RETURNING *
            "#,
        )
        .bind(user_id)
        .bind(video_id)
        .bind(position)
        .fetch_one(pool)
        .await?;

        Ok(entry)
    }

    pub async fn list_for_user(pool: &PgPool, user_id: i64) -> Result<Vec<WatchHistoryEntry>> {
        let entries = sqlx::query_as::<_, WatchHistoryEntry>(
            "SELECT * FROM user_watch_history WHERE user_id = $1 ORDER BY last_watched_at DESC",
        )
        .bind(user_id)
        .fetch_all(pool)
        .await?;
        Ok(entries)
    }
}
