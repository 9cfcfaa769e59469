// wordtally: concurrent multi-source word-frequency aggregation
//
// This is the library root. Sources are turned into text by `extract`,
// counted by `count`, merged concurrently by `pipeline`, and printed by
// `output`.

pub mod config;
pub mod count;
pub mod extract;
pub mod output;
pub mod pipeline;
