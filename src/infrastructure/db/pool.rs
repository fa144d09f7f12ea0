use sqlx::postgres::PgPoolOptions;
use sqlx::{Pool, Postgres};
use std::time::Duration;
use tracing::info;

pub type DbPool = Pool<Postgres>;

pub async fn connect_to_db(connection_string: &str) -> Result<DbPool, sqlx::Error> {
    // The API and the single serial transcoder share this pool; the worker
    // never holds a connection across an ffmpeg run, so a small pool covers
    // the request fan-out.
    let pool = PgPoolOptions::new()
        .max_connections(10)
        .min_connections(2)
        .acquire_timeout(Duration::from_secs(5))
        .idle_timeout(Duration::from_secs(300))
        .connect(connection_string)
        .await?;

    info!("Connected to PostgreSQL");
    Ok(pool)
}
