//! Conciseness scoring.

use serde::{Deserialize, Serialize};

use super::round_to;
use crate::lexicon::{FILLER_WORDS, REDUNDANT_PHRASES, count_occurrences, sentences};

/// Sentence length, in words, that scores best.
pub const IDEAL_SENTENCE_LENGTH: f64 = 17.5;

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Brevity {
    /// 0 to 100.
    pub brevity_score: u32,
    pub avg_sentence_length: f64,
    /// Filler tokens per hundred words.
    pub filler_word_density: f64,
    pub redundant_phrases: usize,
    pub is_concise: bool,
    pub recommendation: String,
}

pub fn analyze(text: &str, ideal_sentence_length: f64) -> Brevity {
    let words: Vec<&str> = text.split_whitespace().collect();
    let sentence_count = sentences(text).len();

    let avg = if sentence_count > 0 { words.len() as f64 / sentence_count as f64 } else { 0.0 };
    let baseline = 100.0 - (avg - ideal_sentence_length).abs() * 2.0;

    let filler = words.iter().filter(|w| FILLER_WORDS.contains(&w.to_lowercase().as_str())).count();
    let filler_density = if words.is_empty() { 0.0 } else { filler as f64 / words.len() as f64 * 100.0 };

    let lower = text.to_lowercase();
    let redundant: usize = REDUNDANT_PHRASES.iter().map(|phrase| count_occurrences(&lower, phrase)).sum();

    let score = (baseline - filler_density * 5.0 - redundant as f64 * 3.0).clamp(0.0, 100.0);

    Brevity {
        brevity_score: score.round() as u32,
        avg_sentence_length: round_to(avg, 1),
        filler_word_density: round_to(filler_density, 2),
        redundant_phrases: redundant,
        is_concise: score > 70.0,
        recommendation: recommendation(score).to_string(),
    }
}

pub fn recommendation(score: f64) -> &'static str {
    if score > 80.0 {
        "Excellent - Content is concise and clear"
    } else if score > 60.0 {
        "Good - Minor improvements possible"
    } else if score > 40.0 {
        "Fair - Reduce filler words and simplify sentences"
    } else {
        "Poor - Significant editing needed for clarity"
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rstest::rstest;

    #[test]
    fn test_ideal_length_scores_full() {
        // Two sentences of 17 and 18 words.
        let a = "one two three four five six seven eight nine ten eleven twelve thirteen fourteen fifteen sixteen seventeen.";
        let b = "one two three four five six seven eight nine ten eleven twelve thirteen fourteen fifteen sixteen seventeen eighteen.";
        let facts = analyze(&format!("{a} {b}"), IDEAL_SENTENCE_LENGTH);
        assert_eq!(facts.avg_sentence_length, 17.5);
        assert_eq!(facts.brevity_score, 100);
        assert!(facts.is_concise);
        assert_eq!(facts.recommendation, "Excellent - Content is concise and clear");
    }

    #[test]
    fn test_fillers_are_whole_tokens() {
        let facts = analyze("Just justice. Very verbose.", IDEAL_SENTENCE_LENGTH);
        // "Just" and "Very" count, "justice" does not.
        assert_eq!(facts.filler_word_density, 50.0);
    }

    #[test]
    fn test_redundant_phrases() {
        let facts = analyze("In order to win, due to the fact that we can. In terms of speed, fine.", 17.5);
        assert_eq!(facts.redundant_phrases, 3);
    }

    #[test]
    fn test_empty_text() {
        let facts = analyze("", IDEAL_SENTENCE_LENGTH);
        assert_eq!(facts.avg_sentence_length, 0.0);
        assert_eq!(facts.filler_word_density, 0.0);
        // 100 - 17.5 * 2
        assert_eq!(facts.brevity_score, 65);
        assert!(!facts.is_concise);
    }

    #[test]
    fn test_score_clamped_at_zero() {
        let text = "very ".repeat(100);
        let facts = analyze(&text, IDEAL_SENTENCE_LENGTH);
        assert_eq!(facts.brevity_score, 0);
        assert_eq!(facts.recommendation, "Poor - Significant editing needed for clarity");
    }

    #[test]
    fn test_ideal_length_is_tunable() {
        let text = "one two three four five.";
        assert_eq!(analyze(text, 5.0).brevity_score, 100);
        assert_eq!(analyze(text, 17.5).brevity_score, 75);
    }

    #[rstest]
    #[case(85.0, "Excellent - Content is concise and clear")]
    #[case(70.0, "Good - Minor improvements possible")]
    #[case(50.0, "Fair - Reduce filler words and simplify sentences")]
    #[case(40.0, "Poor - Significant editing needed for clarity")]
    fn test_recommendation_tiers(#[case] score: f64, #[case] expected: &str) {
        assert_eq!(recommendation(score), expected);
    }
}
