// Visible text from HTML documents.
//
// Keeps every text node except those inside elements that never render as
// prose (scripts, styles, templates). Text nodes are joined with a space so
// words from adjacent elements don't run together.

use scraper::{Html, Node};

const NON_PROSE_ELEMENTS: &[&str] = &["script", "style", "noscript", "template", "head"];

/// Extract the visible text of an HTML document.
pub fn visible_text(markup: &str) -> String {
    let document = Html::parse_document(markup);
    let mut parts: Vec<&str> = Vec::new();

    for node in document.tree.root().descendants() {
        let Node::Text(text) = node.value() else {
            continue;
        };
        let hidden = node.ancestors().any(|ancestor| match ancestor.value() {
            Node::Element(element) => NON_PROSE_ELEMENTS.contains(&element.name()),
            _ => false,
        });
        if !hidden {
            parts.push(&**text);
        }
    }

    parts.join(" ")
}

/// Whether a response should be treated as HTML.
///
/// Trusts the content type when the server sent one; otherwise sniffs for a
/// leading tag.
pub fn looks_like_html(content_type: Option<&str>, body: &str) -> bool {
    match content_type {
        Some(ct) => {
            let ct = ct.to_ascii_lowercase();
            ct.contains("text/html") || ct.contains("application/xhtml")
        }
        None => body.trim_start().starts_with('<'),
    }
}
