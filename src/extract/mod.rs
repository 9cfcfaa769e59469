// Text extraction — turns source descriptors into raw text.
//
// Three source kinds (inline literal, remote URL, local file) share the
// TextExtractor trait so the aggregator can treat them uniformly.

use std::sync::Arc;

pub mod html;
pub mod literal;
pub mod local;
pub mod remote;
pub mod source;
pub mod traits;

pub use literal::LiteralExtractor;
pub use local::LocalExtractor;
pub use remote::{build_http_client, RemoteExtractor};
pub use source::{collect_sources, SourceDescriptor};
pub use traits::TextExtractor;

use crate::config::Config;

/// Build the extractor for one descriptor.
///
/// `client` is shared by every remote source in the run.
pub fn extractor_for(
    source: &SourceDescriptor,
    client: &reqwest::Client,
    config: &Config,
) -> Arc<dyn TextExtractor> {
    match source {
        SourceDescriptor::Literal(text) => Arc::new(LiteralExtractor::new(text.clone())),
        SourceDescriptor::Remote(url) => Arc::new(RemoteExtractor::new(
            client.clone(),
            url.clone(),
            config.max_document_bytes,
        )),
        SourceDescriptor::Local(path) => {
            Arc::new(LocalExtractor::new(path.clone(), config.max_document_bytes))
        }
    }
}

/// Build extractors for every descriptor, preserving order.
pub fn extractors_for(
    sources: &[SourceDescriptor],
    config: &Config,
) -> anyhow::Result<Vec<Arc<dyn TextExtractor>>> {
    let client = build_http_client(config)?;
    Ok(sources
        .iter()
        .map(|source| extractor_for(source, &client, config))
        .collect())
}
