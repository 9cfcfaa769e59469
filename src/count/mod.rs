// Word counting — normalization and per-source frequency tables.

pub mod counter;
pub mod normalize;

pub use counter::{count_text, count_words, WordCountPair, WordCounts};
pub use normalize::normalize;
