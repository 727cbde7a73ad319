//! Flat text extraction.
//!
//! Turns a parsed [`Document`] into a single whitespace-normalized string for
//! the classifiers. Extraction never fails and is deterministic: the same
//! markup always yields the same string.

use scraper::{ElementRef, Node};
use scraper::node::Element as NodeElement;
use serde::{Deserialize, Serialize};

use crate::parse::Document;

/// Which subtrees are dropped before text is collected.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum TextMode {
    /// Drop `script` and `style`.
    #[default]
    Full,
    /// Also drop page chrome: `nav`, `footer`, `header` and `aside`.
    Content,
}

impl TextMode {
    fn skips(self, tag: &str) -> bool {
        match self {
            TextMode::Full => matches!(tag, "script" | "style"),
            TextMode::Content => matches!(tag, "script" | "style" | "nav" | "footer" | "header" | "aside"),
        }
    }
}

/// Extracts normalized text from a document.
///
/// # Example
///
/// ```rust
/// use aiscout_core::parse::Document;
/// use aiscout_core::text::{TextMode, extract_text};
///
/// let doc = Document::parse("<nav>Menu</nav>\n<p>Hello\n   world</p><script>var x;</script>");
/// assert_eq!(extract_text(&doc, TextMode::Full), "Menu Hello world");
/// assert_eq!(extract_text(&doc, TextMode::Content), "Hello world");
/// ```
pub fn extract_text(doc: &Document, mode: TextMode) -> String {
    normalize_whitespace(&raw_text(doc, mode))
}

/// Concatenates text nodes in document order without normalizing.
///
/// Hidden containers are included; only the subtrees `mode` drops are
/// skipped. FAQ, definition and structure detection run over this.
pub fn raw_text(doc: &Document, mode: TextMode) -> String {
    let mut out = String::new();
    for node in doc.html().root_element().descendants() {
        if let Node::Text(text) = node.value()
            && !node.ancestors().any(|a| a.value().as_element().is_some_and(|el| skipped(el, mode)))
        {
            out.push_str(text);
        }
    }
    out
}

/// Text under one element, leaving out `script` and `style` contents.
pub(crate) fn element_text(element: ElementRef<'_>) -> String {
    let mut out = String::new();
    for node in element.descendants() {
        if let Node::Text(text) = node.value()
            && !node
                .ancestors()
                .take_while(|a| a.id() != element.id())
                .any(|a| a.value().as_element().is_some_and(|el| skipped(el, TextMode::Full)))
        {
            out.push_str(text);
        }
    }
    out
}

fn skipped(element: &NodeElement, mode: TextMode) -> bool {
    mode.skips(element.name())
}

/// Splits into lines, trims each, breaks lines on double spaces and joins
/// the non-empty fragments with single spaces.
pub fn normalize_whitespace(raw: &str) -> String {
    raw.lines()
        .map(str::trim)
        .flat_map(|line| line.split("  "))
        .map(str::trim)
        .filter(|chunk| !chunk.is_empty())
        .collect::<Vec<_>>()
        .join(" ")
}

/// Truncates to at most `max_chars` characters on a char boundary.
///
/// A limit of zero disables truncation.
pub fn truncate_chars(text: &str, max_chars: usize) -> &str {
    if max_chars == 0 {
        return text;
    }
    match text.char_indices().nth(max_chars) {
        Some((idx, _)) => &text[..idx],
        None => text,
    }
}

/// Returns the last `n` characters of `text`.
pub fn tail_chars(text: &str, n: usize) -> &str {
    let total = text.chars().count();
    if total <= n {
        return text;
    }
    match text.char_indices().nth(total - n) {
        Some((idx, _)) => &text[idx..],
        None => text,
    }
}

/// Counts whitespace-separated tokens.
pub fn word_count(text: &str) -> usize {
    text.split_whitespace().count()
}
