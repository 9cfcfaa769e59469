// JSON export of an aggregation report.

use anyhow::{Context, Result};
use chrono::{DateTime, Utc};
use serde::Serialize;

use super::ListOptions;
use crate::pipeline::{AggregateReport, SourceFailure};

#[derive(Debug, Serialize)]
pub struct WordRow<'a> {
    pub word: &'a str,
    pub count: u64,
}

/// Serialized shape of a report. Words are always sorted so the output is
/// stable across runs.
#[derive(Debug, Serialize)]
pub struct JsonReport<'a> {
    pub generated_at: DateTime<Utc>,
    pub sources: usize,
    pub succeeded: usize,
    pub total_words: u64,
    pub deadline_exceeded: bool,
    pub words: Vec<WordRow<'a>>,
    pub failures: &'a [SourceFailure],
}

impl<'a> JsonReport<'a> {
    pub fn new(report: &'a AggregateReport, options: ListOptions) -> Self {
        let words = report
            .sorted()
            .into_iter()
            .take(options.top.unwrap_or(usize::MAX))
            .map(|(word, count)| WordRow { word, count })
            .collect();

        Self {
            generated_at: Utc::now(),
            sources: report.sources,
            succeeded: report.succeeded(),
            total_words: report.total_words(),
            deadline_exceeded: report.deadline_exceeded,
            words,
            failures: &report.failures,
        }
    }
}

/// Render the report as pretty-printed JSON.
pub fn to_json(report: &AggregateReport, options: ListOptions) -> Result<String> {
    serde_json::to_string_pretty(&JsonReport::new(report, options))
        .context("Failed to serialize report")
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::count::count_text;

    #[test]
    fn json_lists_sorted_words_and_failures() {
        let report = AggregateReport {
            counts: count_text("cat dog cat"),
            sources: 2,
            failures: vec![SourceFailure {
                index: 1,
                label: "missing.txt".to_string(),
                reason: "Cannot access missing.txt".to_string(),
            }],
            deadline_exceeded: false,
        };

        let json = to_json(&report, ListOptions::default()).unwrap();
        let value: serde_json::Value = serde_json::from_str(&json).unwrap();

        assert_eq!(value["sources"], 2);
        assert_eq!(value["succeeded"], 1);
        assert_eq!(value["total_words"], 3);
        assert_eq!(value["words"][0]["word"], "cat");
        assert_eq!(value["words"][0]["count"], 2);
        assert_eq!(value["failures"][0]["label"], "missing.txt");
    }
}
