use serde::Deserialize;
use crate::config::env::{self, EnvKey};

/// Process-wide configuration, loaded once at startup and injected via
/// `AppState`. Secrets and broker addresses are never read ad hoc elsewhere.
#[derive(Clone, Debug, Deserialize)]
pub struct AppConfig {
    pub server_port: u16,
    pub database_url: String,
    pub amqp_url: String,
    pub jwt_secret: String,
    pub upload_dir: String,
    pub access_token_expire_minutes: u64,
    pub transcode_timeout_secs: u64,
    pub ffmpeg_bin: String,
    pub mirror_url: Option<String>,
}

impl AppConfig {
    pub fn new() -> Result<Self, std::env::VarError> {
        Ok(Self {
            server_port: env::get_parsed(EnvKey::ServerPort, 3000),
            database_url: env::get(EnvKey::DatabaseUrl)?,
            amqp_url: env::get(EnvKey::AmqpUrl)?,
            jwt_secret: env::get(EnvKey::JwtSecret)?,
            upload_dir: env::get_or(EnvKey::UploadDir, "./uploaded_videos"),
            access_token_expire_minutes: env::get_parsed(EnvKey::AccessTokenExpireMinutes, 30),
            transcode_timeout_secs: env::get_parsed(EnvKey::TranscodeTimeoutSecs, 3600),
            ffmpeg_bin: env::get_or(EnvKey::FfmpegBin, "ffmpeg"),
            mirror_url: env::get_opt(EnvKey::MirrorUrl),
        })
    }
}
