/// HTTP client for the watering controller.
/// One attempt per activation; no retries.
use std::time::Duration;

use async_trait::async_trait;

use super::relay::{Fetch, FetchError, FetchedResponse};

pub struct UpstreamClient {
    client: reqwest::Client,
}

impl UpstreamClient {
    pub fn new(timeout: Option<Duration>) -> anyhow::Result<Self> {
        let mut builder = reqwest::Client::builder().use_rustls_tls();
        if let Some(timeout) = timeout {
            builder = builder.timeout(timeout);
        }
        let client = builder
            .build()
            .map_err(|e| anyhow::anyhow!("failed to build upstream HTTP client: {}", e))?;

        Ok(Self { client })
    }
}

#[async_trait]
impl Fetch for UpstreamClient {
    async fn fetch(&self, url: &str) -> Result<FetchedResponse, FetchError> {
        let resp = self.client.get(url).send().await.map_err(|e| FetchError::Transport {
            status: e.status(),
            message: e.to_string(),
        })?;

        let status = resp.status();
        let body = resp.bytes().await.map_err(|e| FetchError::Body {
            status,
            message: e.to_string(),
        })?;

        Ok(FetchedResponse { status, body })
    }
}
