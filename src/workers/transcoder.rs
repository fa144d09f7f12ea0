use crate::infrastructure::queue::rabbitmq::TRANSCODE_QUEUE;
use crate::modules::video::events::TranscodeJob;
use crate::modules::video::repository::VideoRepository;
use crate::state::AppState;
use crate::workers::hls;
use anyhow::Context;
use futures_util::StreamExt;
use lapin::message::Delivery;
use lapin::options::{BasicAckOptions, BasicConsumeOptions, BasicNackOptions, QueueDeclareOptions};
use lapin::types::FieldTable;
use std::path::Path;
use std::time::Duration;
use tracing::{error, info, warn};

const RECONNECT_DELAY: Duration = Duration::from_secs(5);

/// Consumes transcode jobs one at a time. ffmpeg saturates the CPU on its
/// own, so there is no per-message concurrency.
///
/// The consume loop is restarted over a fresh connection whenever the broker
/// drops it; the queue is durable, so pending jobs wait for the worker to
/// come back.
pub async fn run(state: AppState) {
    info!("Starting transcoder worker...");

    loop {
        match consume(&state).await {
            Ok(()) => warn!("Transcoder consumer stream closed, reconnecting"),
            Err(e) => error!("Transcoder consumer setup failed: {}", e),
        }

        tokio::time::sleep(RECONNECT_DELAY).await;
        if let Err(e) = state.queue.reconnect().await {
            error!("Transcoder worker could not reconnect: {}", e);
        }
    }
}

async fn consume(state: &AppState) -> anyhow::Result<()> {
    let channel = state.queue.get_channel().await;
    let channel_guard = channel.lock().await;

    channel_guard
        .queue_declare(
            TRANSCODE_QUEUE,
            QueueDeclareOptions {
                durable: true,
                ..QueueDeclareOptions::default()
            },
            FieldTable::default(),
        )
        .await
        .context("could not declare queue")?;

    let mut consumer = channel_guard
        .basic_consume(
            TRANSCODE_QUEUE,
            "transcoder_worker",
            BasicConsumeOptions::default(),
            FieldTable::default(),
        )
        .await
        .context("could not start consuming")?;

    // The consumer stream is independent of the channel guard.
    drop(channel_guard);

    info!("Transcoder worker listening on '{}'", TRANSCODE_QUEUE);

    while let Some(delivery) = consumer.next().await {
        match delivery {
            Ok(delivery) => handle_delivery(state, delivery).await,
            Err(e) => error!("Transcoder consumer error: {}", e),
        }
    }

    Ok(())
}

async fn handle_delivery(state: &AppState, delivery: Delivery) {
    let job = match serde_json::from_slice::<TranscodeJob>(&delivery.data) {
        Ok(job) => job,
        Err(e) => {
            // Poison message. Requeueing it would loop forever.
            error!("Discarding unparseable transcode job: {}", e);
            ack(&delivery).await;
            return;
        }
    };

    match process_job(state, &job).await {
        Ok(()) => ack(&delivery).await,
        Err(JobError::Database(e)) => {
            // The work may be fine but the outcome was not recorded.
            // Redelivery is safe: the status transitions are conditional.
            error!(
                video_id = job.video_id,
                "Could not record transcode outcome, requeueing: {}", e
            );
            if let Err(e) = delivery
                .nack(BasicNackOptions {
                    requeue: true,
                    ..BasicNackOptions::default()
                })
                .await
            {
                error!("Failed to nack message: {}", e);
            }
        }
    }
}

async fn ack(delivery: &Delivery) {
    if let Err(e) = delivery.ack(BasicAckOptions::default()).await {
        error!("Failed to ack message: {}", e);
    }
}

enum JobError {
    Database(anyhow::Error),
}

async fn process_job(state: &AppState, job: &TranscodeJob) -> Result<(), JobError> {
    info!(video_id = job.video_id, "Received transcode job");

    // Claims the row before touching ffmpeg. A redelivered job whose video
    // already reached a terminal state, or whose row was deleted, is a no-op.
    let claimed = VideoRepository::claim_for_processing(&state.db, job.video_id)
        .await
        .map_err(JobError::Database)?;
    if !claimed {
        info!(
            video_id = job.video_id,
            "Job is stale (video deleted or already settled), skipping"
        );
        return Ok(());
    }

    let output_dir = Path::new(&job.output_dir);
    if let Err(e) = tokio::fs::create_dir_all(output_dir).await {
        record_failure(
            state,
            job.video_id,
            &format!("could not create output directory: {}", e),
        )
        .await?;
        return Ok(());
    }

    let result = hls::run(
        &state.config.ffmpeg_bin,
        Path::new(&job.source_path),
        output_dir,
        state.config.transcode_timeout_secs,
    )
    .await;

    match result {
        Ok(master_path) => {
            let master = master_path.to_string_lossy();
            let updated = VideoRepository::mark_processed(&state.db, job.video_id, &master)
                .await
                .map_err(JobError::Database)?;
            if updated {
                info!(video_id = job.video_id, master = %master, "Transcode completed");
            } else {
                // Lost the race with a delete or an earlier delivery.
                info!(video_id = job.video_id, "Transcode outcome discarded, row already settled");
            }
        }
        Err(e) => {
            warn!(video_id = job.video_id, "Transcode failed: {}", e);
            record_failure(state, job.video_id, &e.to_string()).await?;
        }
    }

    Ok(())
}

async fn record_failure(state: &AppState, video_id: i64, error: &str) -> Result<(), JobError> {
    let updated = VideoRepository::mark_failed(&state.db, video_id, error)
        .await
        .map_err(JobError::Database)?;
    if !updated {
        info!(video_id, "Failure outcome discarded, row already settled");
    }
    Ok(())
}
