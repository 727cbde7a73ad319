//! Report, comparison and rewrite rendering: JSON, Markdown and plain text.

pub mod json;
pub mod markdown;
pub mod text;

pub use json::{JsonConfig, JsonFormatter, comparison_to_json, report_to_json};
pub use markdown::{MarkdownConfig, MarkdownFormatter, comparison_to_markdown, report_to_markdown, rewrites_to_markdown};
pub use text::{TextConfig, TextFormatter, comparison_to_text, report_to_text, rewrites_to_text};

use crate::recommend::{Priority, Recommendation};

/// Recommendations of one priority, in generation order.
pub(crate) fn with_priority(recommendations: &[Recommendation], priority: Priority) -> Vec<&Recommendation> {
    recommendations.iter().filter(|r| r.priority == priority).collect()
}
