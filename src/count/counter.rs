// Per-source word counting.

use std::collections::HashMap;

/// Word → occurrence count for a single source.
pub type WordCounts = HashMap<String, u64>;

/// A single contribution on the merge stream.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct WordCountPair {
    pub word: String,
    /// Always at least 1 — words that never occurred are not emitted.
    pub count: u64,
}

/// Count every token in one pass. Matching is exact and case-sensitive.
pub fn count_words<'a, I>(tokens: I) -> WordCounts
where
    I: IntoIterator<Item = &'a str>,
{
    let mut counts = WordCounts::new();
    for token in tokens {
        // get_mut first so repeated words don't allocate a fresh key
        match counts.get_mut(token) {
            Some(count) => *count += 1,
            None => {
                counts.insert(token.to_string(), 1);
            }
        }
    }
    counts
}

/// Normalize raw text and count it.
pub fn count_text(raw: &str) -> WordCounts {
    count_words(super::normalize::normalize(raw))
}

/// Consume a per-source table into merge-stream pairs.
pub fn into_pairs(counts: WordCounts) -> impl Iterator<Item = WordCountPair> {
    counts
        .into_iter()
        .map(|(word, count)| WordCountPair { word, count })
}
