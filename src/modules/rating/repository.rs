use super::model::VideoRating;
use anyhow::Result;
use sqlx::PgPool;

pub struct RatingRepository;

impl RatingRepository {
    /// Upserts on the (user_id, video_id) uniqueness key: concurrent
    /// submissions for the same pair end as last-commit-wins, never as
    /// duplicate rows.
    pub async fn upsert(
        pool: &PgPool,
        user_id: i64,
        video_id: i64,
        rating: f64,
    ) -> Result<VideoRating> {
        let row = sqlx::query_as::<_, VideoRating>(
            r#"
            INSERT INTO video_ratings (user_id, video_id, rating)
            VALUES ($1, $2, $3)
            ON CONFLICT (user_id, video_id)
            DO UPDATE SET rating = EXCLUDED.rating, rated_at = NOW()
            RETURNING *
            "#,
        )
        .bind(user_id)
        .bind(video_id)
        .bind(rating)
        .fetch_one(pool)
        .await?;

        Ok(row)
    }

    pub async fn list_for_video(pool: &PgPool, video_id: i64) -> Result<Vec<VideoRating>> {
        let rows = sqlx::query_as::<_, VideoRating>(
            "SELECT * FROM video_ratings WHERE video_id = $1 ORDER BY rated_at DESC",
        )
        .bind(video_id)
        .fetch_all(pool)
        .await?;
        Ok(rows)
    }

    pub async fn find_by_user_and_video(
        pool: &PgPool,
        user_id: i64,
        video_id: i64,
    ) -> Result<Option<VideoRating>> {
        let row = sqlx::query_as::<_, VideoRating>(
            "SELECT * FROM video_ratings WHERE user_id = $1 AND video_id = $2",
        )
        .bind(user_id)
        .bind(video_id)
        .fetch_optional(pool)
        .await?;
        Ok(row)
    }
}
