use anyhow::Result;
use async_trait::async_trait;

use super::source::SourceDescriptor;
use super::traits::TextExtractor;

/// Extractor for text supplied inline. Never fails.
pub struct LiteralExtractor {
    text: String,
}

impl LiteralExtractor {
    pub fn new(text: impl Into<String>) -> Self {
        Self { text: text.into() }
    }
}

#[async_trait]
impl TextExtractor for LiteralExtractor {
    async fn extract(&self) -> Result<String> {
        Ok(self.text.clone())
    }

    fn label(&self) -> String {
        SourceDescriptor::Literal(self.text.clone()).label()
    }
}
