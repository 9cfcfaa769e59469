// Aggregation results and errors.

use std::error::Error;
use std::fmt;

use serde::Serialize;

use crate::count::WordCounts;

/// A source that contributed nothing, and why.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct SourceFailure {
    /// Position of the source in the caller's list
    pub index: usize,
    pub label: String,
    pub reason: String,
}

/// Outcome of one aggregation run.
#[derive(Debug, Clone)]
pub struct AggregateReport {
    /// Word → total count across every source that succeeded
    pub counts: WordCounts,
    /// Number of sources the run was given
    pub sources: usize,
    /// Skipped sources, ordered by index
    pub failures: Vec<SourceFailure>,
    /// True when the overall deadline cut the run short
    pub deadline_exceeded: bool,
}

impl AggregateReport {
    /// Number of sources whose words made it into `counts`.
    pub fn succeeded(&self) -> usize {
        self.sources - self.failures.len()
    }

    /// Total word occurrences across all sources.
    pub fn total_words(&self) -> u64 {
        self.counts.values().sum()
    }

    /// Every source contributed and the deadline did not fire.
    pub fn is_complete(&self) -> bool {
        self.failures.is_empty() && !self.deadline_exceeded
    }

    /// Counts ordered by descending count, ties broken alphabetically.
    pub fn sorted(&self) -> Vec<(&str, u64)> {
        let mut rows: Vec<(&str, u64)> = self
            .counts
            .iter()
            .map(|(word, count)| (word.as_str(), *count))
            .collect();
        rows.sort_by(|a, b| b.1.cmp(&a.1).then_with(|| a.0.cmp(b.0)));
        rows
    }
}

/// Errors that abort an aggregation run as a whole.
///
/// Per-source extraction failures are never reported here — they end up in
/// `AggregateReport::failures`.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum AggregateError {
    /// The caller supplied no sources; nothing was spawned.
    NoSources,
    /// An internal coordination invariant broke (lost or duplicated
    /// completion signal, write after the merge stream closed). Always a bug.
    ProtocolViolation(String),
}

impl fmt::Display for AggregateError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::NoSources => write!(f, "no sources given: specify at least one string, URL, or file"),
            Self::ProtocolViolation(detail) => write!(f, "aggregation protocol violation: {detail}"),
        }
    }
}

impl Error for AggregateError {}

#[cfg(test)]
mod tests {
    use super::*;

    fn report(pairs: &[(&str, u64)], failures: usize) -> AggregateReport {
        AggregateReport {
            counts: pairs.iter().map(|(w, c)| (w.to_string(), *c)).collect(),
            sources: 3,
            failures: (0..failures)
                .map(|i| SourceFailure {
                    index: i,
                    label: format!("source {i}"),
                    reason: "unreachable".to_string(),
                })
                .collect(),
            deadline_exceeded: false,
        }
    }

    #[test]
    fn sorted_orders_by_count_then_word() {
        let r = report(&[("b", 2), ("a", 2), ("c", 5), ("d", 1)], 0);
        assert_eq!(r.sorted(), vec![("c", 5), ("a", 2), ("b", 2), ("d", 1)]);
    }

    #[test]
    fn totals_and_success_counts() {
        let r = report(&[("x", 3), ("y", 4)], 1);
        assert_eq!(r.total_words(), 7);
        assert_eq!(r.succeeded(), 2);
        assert!(!r.is_complete());
    }
}
