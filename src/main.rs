use anyhow::Context;
use dotenvy::dotenv;
use tracing::info;
use tracing_subscriber::EnvFilter;

mod app;
mod common;
mod config;
mod docs;
mod infrastructure;
mod middleware;
mod modules;
mod routes;
mod state;
mod workers;

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    dotenv().ok();

    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::try_from_default_env().unwrap_or_else(|_| "info".into()))
        .init();

    info!("Starting server...");

    let config = config::settings::AppConfig::new().context("failed to load configuration")?;

    let db = infrastructure::db::pool::connect_to_db(&config.database_url)
        .await
        .context("failed to connect to PostgreSQL")?;

    sqlx::migrate!("./migrations")
        .run(&db)
        .await
        .context("failed to run database migrations")?;

    tokio::fs::create_dir_all(&config.upload_dir)
        .await
        .context("failed to create upload directory")?;

    let queue = infrastructure::queue::rabbitmq::RabbitMqService::new(&config.amqp_url)
        .await
        .context("failed to connect to RabbitMQ")?;

    let mirror = infrastructure::mirror::MirrorClient::new(config.mirror_url.clone());

    let server_port = config.server_port;
    let state = state::AppState::new(config, db, queue, mirror);

    tokio::spawn(workers::transcoder::run(state.clone()));

    let app = app::create_app(state).await;

    let addr = format!("0.0.0.0:{}", server_port);
    let listener = tokio::net::TcpListener::bind(&addr)
        .await
        .with_context(|| format!("failed to bind {}", addr))?;
    info!("Server running on http://{}", addr);

    axum::serve(listener, app).await?;

    Ok(())
}
