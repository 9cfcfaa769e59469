// Local file extraction.
//
// Reads are async so a slow disk or network mount only stalls its own
// worker. Invalid UTF-8 is replaced rather than rejected.

use std::path::PathBuf;

use anyhow::{Context, Result};
use async_trait::async_trait;
use tracing::debug;

use super::traits::TextExtractor;

/// Extractor for a file on the local filesystem.
pub struct LocalExtractor {
    path: PathBuf,
    max_bytes: usize,
}

impl LocalExtractor {
    pub fn new(path: impl Into<PathBuf>, max_bytes: usize) -> Self {
        Self {
            path: path.into(),
            max_bytes,
        }
    }
}

#[async_trait]
impl TextExtractor for LocalExtractor {
    async fn extract(&self) -> Result<String> {
        let metadata = tokio::fs::metadata(&self.path)
            .await
            .with_context(|| format!("Cannot access {}", self.path.display()))?;

        if !metadata.is_file() {
            anyhow::bail!("{} is not a regular file", self.path.display());
        }
        if metadata.len() > self.max_bytes as u64 {
            anyhow::bail!(
                "{} is {} bytes, larger than the {} byte limit",
                self.path.display(),
                metadata.len(),
                self.max_bytes
            );
        }

        let bytes = tokio::fs::read(&self.path)
            .await
            .with_context(|| format!("Failed to read {}", self.path.display()))?;

        debug!(path = %self.path.display(), bytes = bytes.len(), "Read local source");

        Ok(String::from_utf8_lossy(&bytes).into_owned())
    }

    fn label(&self) -> String {
        self.path.display().to_string()
    }
}
