// HTTP extraction for remote documents.
//
// One reqwest client is built per run and shared by every remote source
// (reqwest clients are cheap to clone and pool connections internally).
// The client carries the per-source timeout, so a hung server fails its own
// source instead of stalling the run.

use anyhow::{Context, Result};
use async_trait::async_trait;
use futures::StreamExt;
use reqwest::header::CONTENT_TYPE;
use tracing::debug;

use super::html;
use super::traits::TextExtractor;
use crate::config::Config;

/// Build the shared HTTP client from configuration.
pub fn build_http_client(config: &Config) -> Result<reqwest::Client> {
    reqwest::Client::builder()
        .user_agent(config.user_agent.as_str())
        .timeout(config.source_timeout)
        .build()
        .context("Failed to build HTTP client")
}

/// Extractor for a document fetched over HTTP(S).
pub struct RemoteExtractor {
    client: reqwest::Client,
    url: String,
    max_bytes: usize,
}

impl RemoteExtractor {
    pub fn new(client: reqwest::Client, url: impl Into<String>, max_bytes: usize) -> Self {
        Self {
            client,
            url: url.into(),
            max_bytes,
        }
    }
}

#[async_trait]
impl TextExtractor for RemoteExtractor {
    async fn extract(&self) -> Result<String> {
        let response = self
            .client
            .get(&self.url)
            .send()
            .await
            .with_context(|| format!("Request to {} failed", self.url))?;

        if !response.status().is_success() {
            anyhow::bail!("{} returned {}", self.url, response.status());
        }

        if let Some(length) = response.content_length() {
            if length > self.max_bytes as u64 {
                anyhow::bail!(
                    "{} declares {} bytes, larger than the {} byte limit",
                    self.url,
                    length,
                    self.max_bytes
                );
            }
        }

        let content_type = response
            .headers()
            .get(CONTENT_TYPE)
            .and_then(|v| v.to_str().ok())
            .map(str::to_string);

        // Stream the body so an unannounced oversized document is cut off early
        let mut body: Vec<u8> = Vec::new();
        let mut stream = response.bytes_stream();
        while let Some(chunk) = stream.next().await {
            let chunk = chunk.with_context(|| format!("Failed to read body of {}", self.url))?;
            if body.len() + chunk.len() > self.max_bytes {
                anyhow::bail!(
                    "{} exceeded the {} byte limit while downloading",
                    self.url,
                    self.max_bytes
                );
            }
            body.extend_from_slice(&chunk);
        }

        let text = String::from_utf8_lossy(&body);

        debug!(
            url = %self.url,
            bytes = body.len(),
            content_type = content_type.as_deref().unwrap_or("unknown"),
            "Fetched remote source"
        );

        if html::looks_like_html(content_type.as_deref(), &text) {
            Ok(html::visible_text(&text))
        } else {
            Ok(text.into_owned())
        }
    }

    fn label(&self) -> String {
        self.url.clone()
    }
}
