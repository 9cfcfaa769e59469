// Terminal output for aggregate counts and skipped sources.
//
// Counts go to stdout as plain `word: count` lines so they can be piped.
// The summary and skipped-source list go to stderr with colors.

use colored::Colorize;

use super::{truncate_chars, ListOptions};
use crate::pipeline::AggregateReport;

/// Render the `word: count` lines for a report.
pub fn format_counts(report: &AggregateReport, options: ListOptions) -> Vec<String> {
    let limit = options.top.unwrap_or(usize::MAX);
    if options.sorted {
        report
            .sorted()
            .into_iter()
            .take(limit)
            .map(|(word, count)| format!("{word}: {count}"))
            .collect()
    } else {
        report
            .counts
            .iter()
            .take(limit)
            .map(|(word, count)| format!("{word}: {count}"))
            .collect()
    }
}

/// Print the counts to stdout.
pub fn display_counts(report: &AggregateReport, options: ListOptions) {
    for line in format_counts(report, options) {
        println!("{line}");
    }
}

/// Print a one-line summary plus every skipped source to stderr.
pub fn display_summary(report: &AggregateReport) {
    eprintln!(
        "\n{}",
        format!(
            "{} distinct words, {} total, from {}/{} sources",
            report.counts.len(),
            report.total_words(),
            report.succeeded(),
            report.sources
        )
        .bold()
    );

    if report.deadline_exceeded {
        eprintln!(
            "  {} overall deadline exceeded: results are partial",
            "!!".red().bold()
        );
    }

    if report.failures.is_empty() {
        return;
    }

    eprintln!(
        "  {} {} source(s) skipped:",
        "!".yellow().bold(),
        report.failures.len()
    );
    for failure in &report.failures {
        eprintln!(
            "    {:>3}. {}  {}",
            failure.index + 1,
            truncate_chars(&failure.label, 60),
            failure.reason.dimmed()
        );
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::count::count_text;

    fn report_for(text: &str) -> AggregateReport {
        AggregateReport {
            counts: count_text(text),
            sources: 1,
            failures: vec![],
            deadline_exceeded: false,
        }
    }

    #[test]
    fn sorted_listing_respects_top() {
        let report = report_for("b a b c b a");
        let lines = format_counts(
            &report,
            ListOptions {
                sorted: true,
                top: Some(2),
            },
        );
        assert_eq!(lines, vec!["b: 3", "a: 2"]);
    }

    #[test]
    fn unsorted_listing_contains_every_word() {
        let report = report_for("x y z x");
        let mut lines = format_counts(&report, ListOptions::default());
        lines.sort();
        assert_eq!(lines, vec!["x: 2", "y: 1", "z: 1"]);
    }
}
