//! Word, sentence and paragraph statistics.

use std::collections::HashSet;

use serde::{Deserialize, Serialize};

use super::round_to;
use crate::lexicon::sentences;
use crate::parse::Document;
use crate::text::{element_text, word_count};

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ContentQuality {
    pub word_count: usize,
    pub sentence_count: usize,
    pub avg_sentence_length: f64,
    /// Unique lowercase tokens over all tokens.
    pub vocabulary_diversity: f64,
    pub paragraph_count: usize,
    pub avg_paragraph_length: f64,
    pub quality_score: u32,
}

pub fn analyze(text: &str, doc: &Document) -> ContentQuality {
    let words: Vec<&str> = text.split_whitespace().collect();
    let sentence_count = sentences(text).len();

    let avg_sentence_length = if sentence_count > 0 { words.len() as f64 / sentence_count as f64 } else { 0.0 };
    let unique: HashSet<String> = words.iter().map(|w| w.to_lowercase()).collect();
    let diversity = if words.is_empty() { 0.0 } else { unique.len() as f64 / words.len() as f64 };

    let paragraphs = doc.select("p").unwrap_or_default();
    let paragraph_words: usize = paragraphs.iter().map(|p| word_count(&element_text(p.element_ref()))).sum();
    let avg_paragraph_length =
        if paragraphs.is_empty() { 0.0 } else { paragraph_words as f64 / paragraphs.len() as f64 };

    ContentQuality {
        word_count: words.len(),
        sentence_count,
        avg_sentence_length: round_to(avg_sentence_length, 1),
        vocabulary_diversity: round_to(diversity, 2),
        paragraph_count: paragraphs.len(),
        avg_paragraph_length: round_to(avg_paragraph_length, 1),
        quality_score: quality_score(avg_sentence_length, diversity, paragraphs.len()),
    }
}

pub fn quality_score(avg_sentence_length: f64, diversity: f64, paragraph_count: usize) -> u32 {
    let mut score = 50;

    if (15.0..=20.0).contains(&avg_sentence_length) {
        score += 20;
    } else if (10.0..=25.0).contains(&avg_sentence_length) {
        score += 10;
    }

    if (0.5..=0.7).contains(&diversity) {
        score += 20;
    } else if (0.4..=0.8).contains(&diversity) {
        score += 10;
    }

    if paragraph_count > 3 {
        score += 10;
    }

    score.min(100)
}

#[cfg(test)]
mod tests {
    use super::*;
    use rstest::rstest;

    #[test]
    fn test_counts() {
        let html = "<p>The cat sat. The cat ran.</p>\n<p>A dog barked loudly!</p>";
        let doc = Document::parse(html);
        let text = crate::text::extract_text(&doc, crate::text::TextMode::Full);
        let facts = analyze(&text, &doc);
        assert_eq!(facts.word_count, 10);
        assert_eq!(facts.sentence_count, 3);
        assert_eq!(facts.avg_sentence_length, 3.3);
        // "the", "cat" repeat: 8 unique of 10
        assert_eq!(facts.vocabulary_diversity, 0.8);
        assert_eq!(facts.paragraph_count, 2);
        assert_eq!(facts.avg_paragraph_length, 5.0);
    }

    #[test]
    fn test_empty_page() {
        let facts = analyze("", &Document::parse(""));
        assert_eq!(facts.word_count, 0);
        assert_eq!(facts.vocabulary_diversity, 0.0);
        assert_eq!(facts.avg_paragraph_length, 0.0);
        assert_eq!(facts.quality_score, 50);
    }

    #[rstest]
    #[case(17.0, 0.6, 4, 100)]
    #[case(12.0, 0.45, 4, 80)]
    #[case(30.0, 0.9, 1, 50)]
    #[case(20.0, 0.8, 3, 80)]
    fn test_quality_score(
        #[case] avg: f64,
        #[case] diversity: f64,
        #[case] paragraphs: usize,
        #[case] expected: u32,
    ) {
        assert_eq!(quality_score(avg, diversity, paragraphs), expected);
    }
}
