use serde::Serialize;
use std::time::Duration;
use tracing::{info, warn};

/// One-way best-effort forwarding of asset data to a secondary system.
/// Failures are logged and never surfaced to the caller; there is no retry.
#[derive(Clone)]
pub struct MirrorClient {
    client: reqwest::Client,
    url: Option<String>,
}

impl MirrorClient {
    pub fn new(url: Option<String>) -> Self {
        let client = reqwest::Client::builder()
            .timeout(Duration::from_secs(10))
            .build()
            .unwrap_or_default();
        Self { client, url }
    }

    pub async fn sync<T: Serialize>(&self, payload: &T) {
        let Some(url) = &self.url else {
            return;
        };

        match self.client.post(url).json(payload).send().await {
            Ok(resp) if resp.status().is_success() => {
                info!("mirror sync ok");
            }
            Ok(resp) => {
                warn!("mirror sync rejected: {}", resp.status());
            }
            Err(e) => {
                warn!("mirror sync failed: {}", e);
            }
        }
    }
}
