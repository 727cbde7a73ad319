//! Authority and trust signals.

use serde::{Deserialize, Serialize};

use crate::lexicon::{
    AUTHOR_PATTERNS, CREDIBILITY_MARKERS, EXTERNAL_HREF, QUALITY_DOMAINS, TESTIMONIAL_KEYWORDS, count_present,
};
use crate::parse::Document;

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CredibilitySignals {
    pub credibility_markers: usize,
    pub author_mentions: usize,
    pub external_links: usize,
    /// External links whose href mentions a trusted domain fragment.
    pub quality_links: usize,
    pub testimonial_indicators: usize,
    pub credibility_score: u32,
    pub has_author_info: bool,
    pub has_quality_citations: bool,
}

pub fn analyze(text: &str, doc: &Document) -> CredibilitySignals {
    let lower = text.to_lowercase();

    let credibility_markers = count_present(&lower, &CREDIBILITY_MARKERS);
    let author_mentions: usize = AUTHOR_PATTERNS.iter().map(|re| re.find_iter(text).count()).sum();
    let testimonial_indicators = count_present(&lower, &TESTIMONIAL_KEYWORDS);

    let external: Vec<&str> = doc
        .select("a[href]")
        .unwrap_or_default()
        .iter()
        .filter_map(|a| a.attr("href"))
        .filter(|href| EXTERNAL_HREF.is_match(href))
        .collect();
    let quality_links = external.iter().filter(|href| QUALITY_DOMAINS.iter().any(|d| href.contains(d))).count();

    CredibilitySignals {
        credibility_markers,
        author_mentions,
        external_links: external.len(),
        quality_links,
        testimonial_indicators,
        credibility_score: credibility_score(credibility_markers, author_mentions, quality_links, testimonial_indicators),
        has_author_info: author_mentions > 0,
        has_quality_citations: quality_links > 0,
    }
}

pub fn credibility_score(markers: usize, authors: usize, quality_links: usize, testimonials: usize) -> u32 {
    let score = (markers * 5).min(25) + (authors * 12).min(25) + (quality_links * 10).min(30) + (testimonials * 4).min(20);
    score.min(100) as u32
}

#[cfg(test)]
mod tests {
    use super::*;
    use rstest::rstest;

    fn signals(html: &str) -> CredibilitySignals {
        let doc = Document::parse(html);
        let text = crate::text::extract_text(&doc, crate::text::TextMode::Full);
        analyze(&text, &doc)
    }

    #[test]
    fn test_byline_and_markers() {
        let facts = signals("<p>Written by Jane Doe, PhD, professor at the university.</p>");
        // Bylines are case sensitive: only "by Jane Doe" matches.
        assert_eq!(facts.author_mentions, 1);
        assert!(facts.has_author_info);
        assert_eq!(facts.credibility_markers, 3);
    }

    #[test]
    fn test_lowercase_byline_not_author() {
        let facts = signals("<p>reviewed by jane doe</p>");
        assert_eq!(facts.author_mentions, 0);
        assert!(!facts.has_author_info);
        assert_eq!(facts.testimonial_indicators, 1);
    }

    #[test]
    fn test_quality_links() {
        let html = r#"
            <a href="https://www.nature.com/articles/1">Nature</a>
            <a href="http://example.com">Example</a>
            <a href="https://cdc.gov/data">CDC</a>
            <a href="/relative/org">Relative</a>
        "#;
        let facts = signals(html);
        assert_eq!(facts.external_links, 3);
        assert_eq!(facts.quality_links, 2);
        assert!(facts.has_quality_citations);
    }

    #[test]
    fn test_no_signals() {
        let facts = signals("<p>Plain text.</p>");
        assert_eq!(facts.credibility_score, 0);
        assert!(!facts.has_quality_citations);
    }

    #[rstest]
    #[case(0, 0, 0, 0, 0)]
    #[case(1, 1, 1, 1, 31)]
    #[case(10, 3, 5, 10, 100)]
    #[case(2, 0, 1, 0, 20)]
    fn test_credibility_score(
        #[case] markers: usize,
        #[case] authors: usize,
        #[case] links: usize,
        #[case] testimonials: usize,
        #[case] expected: u32,
    ) {
        assert_eq!(credibility_score(markers, authors, links, testimonials), expected);
    }
}
