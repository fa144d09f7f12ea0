use crate::modules::video::events::TranscodeJob;
use anyhow::{anyhow, Context, Result};
use lapin::{
    options::{BasicPublishOptions, QueueDeclareOptions},
    types::FieldTable,
    BasicProperties, Channel, Connection, ConnectionProperties,
};
use std::sync::Arc;
use tokio::sync::Mutex;
use tracing::{info, warn};

/// Durable work queue shared by the submission path and the transcoder
/// worker.
pub const TRANSCODE_QUEUE: &str = "transcoding_tasks";

/// Delivery mode 2: the broker writes the message to disk, so queued jobs
/// survive a broker restart together with the durable queue itself.
const PERSISTENT: u8 = 2;

fn encode_job(job: &TranscodeJob) -> Result<Vec<u8>> {
    serde_json::to_vec(job).context("could not serialize transcode job")
}

#[derive(Clone)]
pub struct RabbitMqService {
    url: String,
    // The connection owns the channel: dropping one closes the other, so
    // both are cached and swapped together on reconnect.
    conn: Arc<Mutex<Connection>>,
    channel: Arc<Mutex<Channel>>,
}

impl RabbitMqService {
    pub async fn new(url: &str) -> Result<Self> {
        let (conn, channel) = Self::open(url).await?;

        Ok(Self {
            url: url.to_string(),
            conn: Arc::new(Mutex::new(conn)),
            channel: Arc::new(Mutex::new(channel)),
        })
    }

    async fn open(url: &str) -> Result<(Connection, Channel)> {
        info!("Opening RabbitMQ connection to {}", url);
        let conn = Connection::connect(url, ConnectionProperties::default())
            .await
            .map_err(|e| anyhow!("RabbitMQ connection failed: {}", e))?;

        let channel = conn
            .create_channel()
            .await
            .map_err(|e| anyhow!("RabbitMQ channel setup failed: {}", e))?;

        info!("RabbitMQ connection ready");
        Ok((conn, channel))
    }

    /// Drops the cached connection and dials a fresh one. Used by the
    /// publish retry below and by the consumer loop after its stream closes.
    pub async fn reconnect(&self) -> Result<()> {
        warn!("Replacing RabbitMQ connection");
        let (conn, channel) = Self::open(&self.url).await?;
        *self.conn.lock().await = conn;
        *self.channel.lock().await = channel;
        Ok(())
    }

    /// Serializes the job and hands it to the broker, returning once the
    /// publisher confirm arrives. Never waits for the job to run. Retries
    /// once over a fresh connection when the cached one has gone away.
    pub async fn publish_job(&self, job: &TranscodeJob) -> Result<()> {
        let payload = encode_job(job)?;

        if let Err(e) = self.confirm_publish(TRANSCODE_QUEUE, &payload).await {
            warn!(
                video_id = job.video_id,
                "Job publish failed: {}. Reconnecting and retrying once.", e
            );
            self.reconnect().await?;
            self.confirm_publish(TRANSCODE_QUEUE, &payload).await?;
        }

        Ok(())
    }

    async fn confirm_publish(&self, queue: &str, payload: &[u8]) -> Result<()> {
        let channel = self.channel.lock().await;

        channel
            .queue_declare(
                queue,
                QueueDeclareOptions {
                    durable: true,
                    ..QueueDeclareOptions::default()
                },
                FieldTable::default(),
            )
            .await
            .map_err(|e| anyhow!("queue declare failed: {}", e))?;

        channel
            .basic_publish(
                "",
                queue,
                BasicPublishOptions::default(),
                payload,
                BasicProperties::default().with_delivery_mode(PERSISTENT),
            )
            .await
            .map_err(|e| anyhow!("publish failed: {}", e))?
            .await
            .map_err(|e| anyhow!("publisher confirm failed: {}", e))?;

        Ok(())
    }

    pub async fn get_channel(&self) -> Arc<Mutex<Channel>> {
        self.channel.clone()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn job_payload_survives_the_wire() {
        let job = TranscodeJob {
            video_id: 12,
            source_path: "./uploaded_videos/x.mp4".to_string(),
            output_dir: "./uploaded_videos/12_hls".to_string(),
        };

        let payload = encode_job(&job).unwrap();
        let decoded: TranscodeJob = serde_json::from_slice(&payload).unwrap();
        assert_eq!(decoded.video_id, 12);
        assert_eq!(decoded.source_path, "./uploaded_videos/x.mp4");
        assert_eq!(decoded.output_dir, "./uploaded_videos/12_hls");
    }
}
