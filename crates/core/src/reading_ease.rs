//! Flesch reading ease and Flesch-Kincaid grade.
//!
//! The estimator never fails. When it cannot produce numbers it says why in
//! the interpretation and leaves the numeric fields empty, so callers can
//! tell "not computed" apart from "computed, poor score".

use serde::{Deserialize, Serialize};

use crate::lexicon::sentences;
use crate::text::word_count;

/// Minimum word count for a meaningful score.
pub const MIN_WORDS: usize = 100;

pub const TOO_SHORT: &str = "Text too short for accurate readability analysis";
pub const UNAVAILABLE: &str = "Readability formula not available for readability analysis";

/// Which estimator to run.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ReadabilityBackend {
    /// Flesch formulas with the full syllable rules. Falls back to
    /// [`ReadabilityBackend::Heuristic`] when built without the `flesch` feature.
    Formula,
    /// Flesch formulas over plain vowel-group syllable counts.
    Heuristic,
    /// Skip readability entirely.
    Disabled,
}

impl Default for ReadabilityBackend {
    fn default() -> Self {
        if cfg!(feature = "flesch") { Self::Formula } else { Self::Heuristic }
    }
}

/// How the readability numbers were produced.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ReadabilityMethod {
    Flesch,
    Heuristic,
    Unavailable,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ReadabilityFacts {
    /// 0 to 100 in practice, higher is easier. Rounded to one decimal.
    pub flesch_reading_ease: Option<f64>,
    pub flesch_kincaid_grade: Option<f64>,
    pub interpretation: String,
    /// `Some(score >= 60)` when a score was computed.
    pub ai_friendly: Option<bool>,
    pub calculation_method: ReadabilityMethod,
}

impl ReadabilityFacts {
    fn absent(interpretation: &str, calculation_method: ReadabilityMethod) -> Self {
        Self {
            flesch_reading_ease: None,
            flesch_kincaid_grade: None,
            interpretation: interpretation.to_string(),
            ai_friendly: None,
            calculation_method,
        }
    }
}

/// Scores `text` with the requested backend.
///
/// # Example
///
/// ```rust
/// use aiscout_core::reading_ease::{ReadabilityBackend, ReadabilityMethod, estimate};
///
/// let facts = estimate("Too short.", ReadabilityBackend::Formula);
/// assert!(facts.flesch_reading_ease.is_none());
///
/// let facts = estimate("Anything at all.", ReadabilityBackend::Disabled);
/// assert_eq!(facts.calculation_method, ReadabilityMethod::Unavailable);
/// ```
pub fn estimate(text: &str, backend: ReadabilityBackend) -> ReadabilityFacts {
    let method = match backend {
        ReadabilityBackend::Disabled => return ReadabilityFacts::absent(UNAVAILABLE, ReadabilityMethod::Unavailable),
        ReadabilityBackend::Formula if cfg!(feature = "flesch") => ReadabilityMethod::Flesch,
        ReadabilityBackend::Formula | ReadabilityBackend::Heuristic => ReadabilityMethod::Heuristic,
    };

    let words = word_count(text);
    if words < MIN_WORDS {
        return ReadabilityFacts::absent(TOO_SHORT, method);
    }

    let sentence_count = sentences(text).len().max(1) as f64;
    let syllables: usize = text
        .split_whitespace()
        .map(|w| match method {
            ReadabilityMethod::Flesch => count_syllables(w),
            _ => count_vowel_groups(w),
        })
        .sum();

    let words_per_sentence = words as f64 / sentence_count;
    let syllables_per_word = syllables as f64 / words as f64;

    let reading_ease = 206.835 - 1.015 * words_per_sentence - 84.6 * syllables_per_word;
    let grade = 0.39 * words_per_sentence + 11.8 * syllables_per_word - 15.59;

    ReadabilityFacts {
        flesch_reading_ease: Some(round1(reading_ease)),
        flesch_kincaid_grade: Some(round1(grade)),
        interpretation: interpret(reading_ease).to_string(),
        ai_friendly: Some(reading_ease >= 60.0),
        calculation_method: method,
    }
}

/// Buckets a reading ease score into a school-grade band.
pub fn interpret(score: f64) -> &'static str {
    if score >= 90.0 {
        "Very Easy (5th grade)"
    } else if score >= 80.0 {
        "Easy (6th grade)"
    } else if score >= 70.0 {
        "Fairly Easy (7th grade)"
    } else if score >= 60.0 {
        "Standard (8-9th grade)"
    } else if score >= 50.0 {
        "Fairly Difficult (10-12th grade)"
    } else if score >= 30.0 {
        "Difficult (College)"
    } else {
        "Very Difficult (College graduate)"
    }
}

fn round1(value: f64) -> f64 {
    (value * 10.0).round() / 10.0
}

fn letters(word: &str) -> String {
    word.chars().filter(|c| c.is_alphabetic()).flat_map(char::to_lowercase).collect()
}

fn is_vowel(c: char) -> bool {
    matches!(c, 'a' | 'e' | 'i' | 'o' | 'u' | 'y')
}

fn vowel_groups(word: &str) -> usize {
    let mut groups = 0;
    let mut in_group = false;
    for c in word.chars() {
        let vowel = is_vowel(c);
        if vowel && !in_group {
            groups += 1;
        }
        in_group = vowel;
    }
    groups
}

/// Syllables as runs of vowels, at least one per word.
pub fn count_vowel_groups(word: &str) -> usize {
    vowel_groups(&letters(word)).max(1)
}

/// Syllables with English ending rules.
///
/// Starts from vowel groups, then drops a silent final `e` (but not a
/// consonant + `le` ending), a silent `-ed` (but not `-ted`/`-ded`) and a
/// silent `-es` (but not after sibilants).
pub fn count_syllables(word: &str) -> usize {
    let word = letters(word);
    if word.is_empty() {
        return 1;
    }
    if word.chars().count() <= 3 {
        return 1;
    }

    let mut count = vowel_groups(&word);
    let chars: Vec<char> = word.chars().collect();
    let n = chars.len();
    let before = |back: usize| if n > back { Some(chars[n - 1 - back]) } else { None };

    if word.ends_with('e') && !word.ends_with("le") && !word.ends_with("ee") {
        count = count.saturating_sub(1);
    } else if word.ends_with("le") && before(2).is_some_and(is_vowel) {
        count = count.saturating_sub(1);
    } else if word.ends_with("ed") && !word.ends_with("ted") && !word.ends_with("ded") {
        count = count.saturating_sub(1);
    } else if word.ends_with("es")
        && !word.ends_with("ses")
        && !word.ends_with("xes")
        && !word.ends_with("zes")
        && !word.ends_with("ches")
        && !word.ends_with("shes")
        && !word.ends_with("ces")
        && !word.ends_with("ges")
    {
        count = count.saturating_sub(1);
    }

    count.max(1)
}
