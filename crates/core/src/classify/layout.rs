//! Summary, conclusion and section layout.

use scraper::ElementRef;
use serde::{Deserialize, Serialize};

use crate::lexicon::{CONCLUSION_INDICATORS, CONCLUSION_WINDOW, SUMMARY_INDICATORS, TAKEAWAY_INDICATORS};
use crate::parse::Document;
use crate::text::{element_text, tail_chars, word_count};

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ContentStructure {
    pub has_summary: bool,
    /// A conclusion phrase in the final stretch of the page.
    pub has_conclusion: bool,
    pub has_key_takeaways: bool,
    /// `h2` plus `h3` elements.
    pub section_count: usize,
    /// Mean words per section, rounded.
    pub avg_section_length: usize,
}

/// `page_text` is the lowercased text of every node outside script and style.
pub fn analyze(doc: &Document, page_text: &str) -> ContentStructure {
    let contains_any = |haystack: &str, terms: &[&str]| terms.iter().any(|t| haystack.contains(t));
    let ending = tail_chars(page_text, CONCLUSION_WINDOW);

    let sections: Vec<ElementRef<'_>> =
        doc.select("h2, h3").unwrap_or_default().iter().map(|el| el.element_ref()).collect();

    ContentStructure {
        has_summary: contains_any(page_text, &SUMMARY_INDICATORS),
        has_conclusion: contains_any(ending, &CONCLUSION_INDICATORS),
        has_key_takeaways: contains_any(page_text, &TAKEAWAY_INDICATORS),
        section_count: sections.len(),
        avg_section_length: avg_section_length(&sections),
    }
}

/// Words in the element siblings following each heading, up to the next
/// section heading. Content nested elsewhere is not followed.
fn avg_section_length(sections: &[ElementRef<'_>]) -> usize {
    if sections.is_empty() {
        return 0;
    }

    let total: usize = sections
        .iter()
        .enumerate()
        .map(|(i, heading)| {
            let next = sections.get(i + 1).map(|n| n.id());
            let content: Vec<String> = heading
                .next_siblings()
                .filter_map(ElementRef::wrap)
                .take_while(|sibling| Some(sibling.id()) != next)
                .map(element_text)
                .collect();
            word_count(&content.join(" "))
        })
        .sum();

    (total as f64 / sections.len() as f64).round() as usize
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::text::{TextMode, raw_text};

    fn layout(html: &str) -> ContentStructure {
        let doc = Document::parse(html);
        let page_text = raw_text(&doc, TextMode::Full).to_lowercase();
        analyze(&doc, &page_text)
    }

    #[test]
    fn test_no_sections() {
        let facts = layout("<p>Just a paragraph.</p>");
        assert_eq!(facts.section_count, 0);
        assert_eq!(facts.avg_section_length, 0);
        assert!(!facts.has_summary);
    }

    #[test]
    fn test_section_lengths() {
        let html = "<h2>One</h2><p>a b c d</p><p>e f</p><h3>Two</h3><p>g h</p>";
        let facts = layout(html);
        assert_eq!(facts.section_count, 2);
        // (6 + 2) / 2
        assert_eq!(facts.avg_section_length, 4);
    }

    #[test]
    fn test_nested_heading_stops_at_parent_end() {
        let html = "<div><h2>Inner</h2><p>one two three</p></div><p>outside words</p>";
        assert_eq!(layout(html).avg_section_length, 3);
    }

    #[test]
    fn test_summary_and_takeaways() {
        let facts = layout("<h2>Overview</h2><p>Text.</p><h2>Key Takeaways</h2><ul><li>x</li></ul>");
        assert!(facts.has_summary);
        assert!(facts.has_key_takeaways);
    }

    #[test]
    fn test_conclusion_only_near_end() {
        let early = format!("<h2>Conclusion</h2><p>{}</p>", "filler ".repeat(300));
        assert!(!layout(&early).has_conclusion);

        let late = format!("<p>{}</p><h2>Final Thoughts</h2><p>Bye.</p>", "filler ".repeat(300));
        assert!(layout(&late).has_conclusion);
    }
}
