// Source descriptors — what the caller asked us to count.

use std::fmt;
use std::path::PathBuf;

/// One text source supplied by the caller. Never mutated after creation.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum SourceDescriptor {
    /// Text given inline
    Literal(String),
    /// Document fetched over HTTP(S)
    Remote(String),
    /// File on the local filesystem
    Local(PathBuf),
}

impl SourceDescriptor {
    /// Short label for logs and failure reports.
    pub fn label(&self) -> String {
        match self {
            Self::Literal(text) => format!("literal text ({} chars)", text.chars().count()),
            Self::Remote(url) => url.clone(),
            Self::Local(path) => path.display().to_string(),
        }
    }
}

impl fmt::Display for SourceDescriptor {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.label())
    }
}

/// Build the ordered source list from command-line style inputs.
///
/// `urls` and `files` entries may each hold several whitespace-separated
/// values. Blank entries are ignored. Order: the literal string first, then
/// URLs, then files.
pub fn collect_sources(
    literal: Option<&str>,
    urls: &[String],
    files: &[String],
) -> Vec<SourceDescriptor> {
    let mut sources = Vec::new();

    if let Some(text) = literal.filter(|t| !t.is_empty()) {
        sources.push(SourceDescriptor::Literal(text.to_string()));
    }
    sources.extend(
        urls.iter()
            .flat_map(|entry| entry.split_whitespace())
            .map(|url| SourceDescriptor::Remote(url.to_string())),
    );
    sources.extend(
        files
            .iter()
            .flat_map(|entry| entry.split_whitespace())
            .map(|path| SourceDescriptor::Local(PathBuf::from(path))),
    );

    sources
}
