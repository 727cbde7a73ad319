//! Lexical content classification.
//!
//! Everything here is pattern based: fixed term lists and regexes from
//! [`crate::lexicon`] run over the page's flat text and, where noted, the
//! parsed tree. Each submodule produces one sub-record of [`ContentFacts`].

pub mod answers;
pub mod brevity;
pub mod credibility;
pub mod layout;
pub mod quality;
pub mod tone;

pub use answers::{AnswerOptimization, DirectAnswer};
pub use brevity::Brevity;
pub use credibility::CredibilitySignals;
pub use layout::ContentStructure;
pub use quality::ContentQuality;
pub use tone::{FactualContent, PromotionalLanguage};

use serde::{Deserialize, Serialize};

use crate::parse::Document;
use crate::reading_ease::{ReadabilityBackend, ReadabilityFacts, estimate};
use crate::text::{TextMode, extract_text, raw_text, truncate_chars};

/// Everything the content pass learns about a page.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ContentFacts {
    pub readability: ReadabilityFacts,
    pub content_quality: ContentQuality,
    pub promotional_language: PromotionalLanguage,
    pub factual_content: FactualContent,
    pub answer_optimization: AnswerOptimization,
    pub credibility: CredibilitySignals,
    pub content_structure: ContentStructure,
    pub brevity: Brevity,
}

/// Tuning for the content pass.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct ClassifierConfig {
    /// Subtrees dropped before the flat text is built (default: script and style only).
    pub text_mode: TextMode,

    /// Cap on flat and page text, in characters, before any pattern runs (0 = unlimited, default: 100000).
    pub max_text_chars: usize,

    /// Sentence length the brevity score rewards most (default: 17.5 words).
    pub ideal_sentence_length: f64,

    /// Readability estimator to run.
    pub readability: ReadabilityBackend,
}

impl Default for ClassifierConfig {
    fn default() -> Self {
        Self {
            text_mode: TextMode::Full,
            max_text_chars: 100_000,
            ideal_sentence_length: brevity::IDEAL_SENTENCE_LENGTH,
            readability: ReadabilityBackend::default(),
        }
    }
}

/// Runs every content classifier over a parsed page.
///
/// # Example
///
/// ```rust
/// use aiscout_core::classify::{ClassifierConfig, classify};
/// use aiscout_core::parse::Document;
///
/// let doc = Document::parse("<h2>FAQ</h2><p>What is it?</p><p>A thing.</p>");
/// let facts = classify(&doc, &ClassifierConfig::default());
/// assert!(facts.answer_optimization.has_faq_section);
/// ```
pub fn classify(doc: &Document, config: &ClassifierConfig) -> ContentFacts {
    let full_text = extract_text(doc, config.text_mode);
    let text = truncate_chars(&full_text, config.max_text_chars);

    let full_page_text = raw_text(doc, TextMode::Full);
    let page_text = truncate_chars(&full_page_text, config.max_text_chars).to_lowercase();

    tracing::debug!(words = crate::text::word_count(text), chars = text.len(), "classifying page text");

    ContentFacts {
        readability: estimate(text, config.readability),
        content_quality: quality::analyze(text, doc),
        promotional_language: tone::promotional(text),
        factual_content: tone::factual(text),
        answer_optimization: answers::analyze(doc, &page_text),
        credibility: credibility::analyze(text, doc),
        content_structure: layout::analyze(doc, &page_text),
        brevity: brevity::analyze(text, config.ideal_sentence_length),
    }
}

pub(crate) fn round_to(value: f64, places: i32) -> f64 {
    let factor = 10f64.powi(places);
    (value * factor).round() / factor
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::reading_ease::ReadabilityMethod;

    #[test]
    fn test_round_to() {
        assert_eq!(round_to(1.23456, 2), 1.23);
        assert_eq!(round_to(17.45, 1), 17.5);
        assert_eq!(round_to(2.5, 0), 3.0);
    }

    #[test]
    fn test_classify_empty_page() {
        let facts = classify(&Document::parse(""), &ClassifierConfig::default());
        assert_eq!(facts.content_quality.word_count, 0);
        assert_eq!(facts.promotional_language.promotional_density, 0.0);
        assert!(!facts.promotional_language.is_promotional);
        assert!(!facts.answer_optimization.has_faq_section);
        assert_eq!(facts.content_structure.section_count, 0);
        assert!(facts.readability.flesch_reading_ease.is_none());
    }

    #[test]
    fn test_disabled_readability_keeps_other_facts() {
        let body = "<p>This sentence has exactly eight words in it.</p>\n".repeat(20);
        let config = ClassifierConfig { readability: ReadabilityBackend::Disabled, ..Default::default() };
        let facts = classify(&Document::parse(&body), &config);
        assert!(facts.readability.flesch_reading_ease.is_none());
        assert_eq!(facts.readability.calculation_method, ReadabilityMethod::Unavailable);
        assert_eq!(facts.content_quality.word_count, 160);
        assert_eq!(facts.content_quality.sentence_count, 20);
    }

    #[test]
    fn test_text_cap_applies() {
        let body = format!("<p>{}</p>", "word ".repeat(1000));
        let config = ClassifierConfig { max_text_chars: 50, ..Default::default() };
        let facts = classify(&Document::parse(&body), &config);
        assert_eq!(facts.content_quality.word_count, 10);
    }

    #[test]
    fn test_content_mode_ignores_navigation_terms() {
        let html = "<nav>best top leading premier</nav><p>Plain words only here.</p>";
        let full = classify(&Document::parse(html), &ClassifierConfig::default());
        let content = classify(
            &Document::parse(html),
            &ClassifierConfig { text_mode: TextMode::Content, ..Default::default() },
        );
        assert!(full.promotional_language.promotional_keyword_count > 0);
        assert_eq!(content.promotional_language.promotional_keyword_count, 0);
    }
}
