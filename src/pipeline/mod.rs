// Aggregation pipeline — concurrent per-source counting merged into one table.

pub mod aggregate;
pub mod report;

pub use aggregate::{Aggregator, DEADLINE_REASON};
pub use report::{AggregateError, AggregateReport, SourceFailure};

use anyhow::Result;

use crate::config::Config;
use crate::extract::{extractors_for, SourceDescriptor};

/// Build extractors for `sources` and aggregate them with settings from
/// `config`.
///
/// Zero sources is rejected before the HTTP client is even built.
pub async fn aggregate_sources(
    sources: &[SourceDescriptor],
    config: &Config,
) -> Result<AggregateReport> {
    if sources.is_empty() {
        return Err(AggregateError::NoSources.into());
    }
    let extractors = extractors_for(sources, config)?;
    let report = Aggregator::from_config(config).run(extractors).await?;
    Ok(report)
}
