// Text extractor trait — the capability the aggregator depends on.
//
// The aggregator never looks inside an extractor: it only awaits `extract()`
// and treats an error as "this source contributes nothing". New source kinds
// plug in by implementing this trait.

use anyhow::Result;
use async_trait::async_trait;

/// Turns one source into raw text. Implementations must be async because
/// most sources block on network or file I/O.
#[async_trait]
pub trait TextExtractor: Send + Sync {
    /// Produce the raw text for this source, or fail.
    async fn extract(&self) -> Result<String>;

    /// Human-readable name of the source, used in failure reports.
    fn label(&self) -> String;
}
