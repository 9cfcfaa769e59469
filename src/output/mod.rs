// Output formatting — terminal listing and JSON export of aggregate counts.

pub mod json;
pub mod terminal;

/// How the aggregate table should be listed.
#[derive(Debug, Clone, Copy, Default)]
pub struct ListOptions {
    /// Order by descending count instead of hash order
    pub sorted: bool,
    /// Print at most this many rows
    pub top: Option<usize>,
}

/// Truncate a string to at most `max_chars` characters, appending "..." if truncated.
///
/// Respects UTF-8 character boundaries, so it never panics on multi-byte
/// characters.
pub fn truncate_chars(text: &str, max_chars: usize) -> String {
    let char_count = text.chars().count();
    if char_count <= max_chars {
        text.to_string()
    } else {
        let truncated: String = text.chars().take(max_chars).collect();
        format!("{truncated}...")
    }
}
