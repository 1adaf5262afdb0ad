//! HTTP transport for the artifact download.
//!
//! The download is a single shot: whichever package manager or user invokes
//! the installer owns any retry policy. A request timeout is applied so a
//! stalled transfer cannot hang the run.

use anyhow::{Context, Result, anyhow};
use async_trait::async_trait;
use log::debug;
use reqwest::Client;
use std::time::Duration;

/// Request timeout applied to the artifact download.
pub const DEFAULT_TIMEOUT: Duration = Duration::from_secs(30);

/// Seam for fetching release bytes, so the install sequence can be tested
/// without a network.
#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait ArtifactFetcher: Send + Sync {
    /// Fetch the complete body at `url`.
    async fn fetch(&self, url: &str) -> Result<Vec<u8>>;
}

/// reqwest-backed fetcher.
#[derive(Clone)]
pub struct HttpClient {
    client: Client,
}

impl HttpClient {
    /// Wrap an existing reqwest Client.
    pub fn new(client: Client) -> Self {
        Self { client }
    }

    /// Build a client with the default request timeout.
    pub fn with_default_timeout() -> Result<Self> {
        Self::with_timeout(DEFAULT_TIMEOUT)
    }

    pub fn with_timeout(timeout: Duration) -> Result<Self> {
        let client = Client::builder()
            .timeout(timeout)
            .build()
            .context("Failed to build HTTP client")?;
        Ok(Self { client })
    }
}

#[async_trait]
impl ArtifactFetcher for HttpClient {
    #[tracing::instrument(skip(self))]
    async fn fetch(&self, url: &str) -> Result<Vec<u8>> {
        debug!("GET {}...", url);

        let response = self
            .client
            .get(url)
            .send()
            .await
            .context("Failed to send download request")?;

        let status = response.status();
        if !status.is_success() {
            return Err(anyhow!("server responded with HTTP {}", status));
        }

        let mut response = response;
        let mut body: Vec<u8> = Vec::new();
        while let Some(chunk) = response
            .chunk()
            .await
            .context("Failed to read chunk from download stream")?
        {
            body.extend_from_slice(&chunk);
        }

        debug!(
            "Downloaded {:.2} MB",
            body.len() as f64 / (1024.0 * 1024.0)
        );

        Ok(body)
    }
}
