// Text normalization — raw text into word tokens.
//
// Anything outside the word class (Unicode letters, digits, underscore)
// acts as a separator. Runs of separators collapse into one split point and
// empty pieces are dropped, so leading/trailing punctuation never produces
// an empty token.

use std::sync::LazyLock;

use regex::Regex;

/// One or more non-word characters.
static SEPARATORS: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"\W+").expect("separator pattern is valid"));

/// Split raw text into normalized word tokens.
///
/// The returned iterator borrows from `raw` and does no work until polled.
/// Calling this again on the same input yields the same sequence.
pub fn normalize(raw: &str) -> impl Iterator<Item = &str> + '_ {
    SEPARATORS.split(raw).filter(|token| !token.is_empty())
}
