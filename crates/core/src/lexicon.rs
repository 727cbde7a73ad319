//! Term lists and compiled regex patterns for content classification.
//!
//! Patterns are compiled once on first use via `LazyLock`. Term lists are
//! lowercase; callers lowercase the text they match against.

#![allow(clippy::expect_used)]

use std::sync::LazyLock;

use regex::Regex;

// Tone and factuality

/// Marketing adjectives and phrases. Every occurrence counts toward density.
pub const PROMOTIONAL_TERMS: [&str; 20] = [
    "best",
    "leading",
    "premier",
    "top",
    "revolutionary",
    "innovative",
    "cutting-edge",
    "state-of-the-art",
    "world-class",
    "industry-leading",
    "unparalleled",
    "exceptional",
    "outstanding",
    "superior",
    "premium",
    "exclusive",
    "unique",
    "breakthrough",
    "game-changing",
    "transformative",
];

/// Phrases that attribute a claim to evidence. Counted once per phrase present.
pub const FACTUAL_INDICATORS: [&str; 11] = [
    "according to",
    "research shows",
    "studies indicate",
    "data reveals",
    "statistics show",
    "survey found",
    "report states",
    "analysis shows",
    "evidence suggests",
    "findings indicate",
    "results demonstrate",
];

pub static SUPERLATIVE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"\b(most|best|greatest|finest|top|leading|premier)\b").expect("SUPERLATIVE regex"));

/// Integers, decimals and percentages.
pub static NUMBER: LazyLock<Regex> = LazyLock::new(|| Regex::new(r"\b\d+(?:\.\d+)?%?\b").expect("NUMBER regex"));

/// Citation shapes, matched against lowercased text and summed.
pub static CITATION_PATTERNS: LazyLock<Vec<Regex>> = LazyLock::new(|| {
    [r"\[\d+\]", r"\(\d{4}\)", r"et al\.", r"according to", r"source:", r"reference:"]
        .iter()
        .map(|p| Regex::new(p).expect("CITATION_PATTERNS regex"))
        .collect()
});

// Answer optimization

pub const FAQ_INDICATORS: [&str; 5] = ["faq", "frequently asked", "common questions", "q&a", "questions and answers"];

pub const DEFINITION_PHRASES: [&str; 5] = ["what is", "definition of", "means that", "refers to", "is defined as"];

pub static HOW_TO: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"(?i)how to|how do|step-by-step|tutorial|guide").expect("HOW_TO regex"));

// Credibility

/// Words that signal expertise or sourcing. Counted once per marker present.
pub const CREDIBILITY_MARKERS: [&str; 15] = [
    "phd",
    "professor",
    "researcher",
    "scientist",
    "expert",
    "specialist",
    "university",
    "institute",
    "journal",
    "publication",
    "peer-reviewed",
    "citation",
    "reference",
    "source",
    "bibliography",
];

/// Byline shapes. Case sensitive: run over the original text.
pub static AUTHOR_PATTERNS: LazyLock<Vec<Regex>> = LazyLock::new(|| {
    [r"by\s+[A-Z][a-z]+\s+[A-Z][a-z]+", r"author:\s*[A-Z][a-z]+", r"written by", r"contributed by"]
        .iter()
        .map(|p| Regex::new(p).expect("AUTHOR_PATTERNS regex"))
        .collect()
});

pub static EXTERNAL_HREF: LazyLock<Regex> = LazyLock::new(|| Regex::new(r"^https?://").expect("EXTERNAL_HREF regex"));

/// Fragments of trusted hosts, matched as substrings of the whole href.
pub const QUALITY_DOMAINS: [&str; 7] = ["edu", "gov", "org", "wikipedia", "pubmed", "nature", "science"];

pub const TESTIMONIAL_KEYWORDS: [&str; 5] = ["testimonial", "review", "feedback", "said", "according to"];

// Content structure

pub const SUMMARY_INDICATORS: [&str; 5] = ["summary", "abstract", "overview", "tldr", "key points"];

pub const CONCLUSION_INDICATORS: [&str; 5] = ["conclusion", "summary", "final thoughts", "wrap up", "in closing"];

pub const TAKEAWAY_INDICATORS: [&str; 5] =
    ["key takeaways", "main points", "highlights", "key findings", "important points"];

/// How many trailing characters are searched for a conclusion.
pub const CONCLUSION_WINDOW: usize = 1000;

// Brevity

/// Whole-token filler words.
pub const FILLER_WORDS: [&str; 18] = [
    "very",
    "really",
    "actually",
    "basically",
    "literally",
    "seriously",
    "obviously",
    "clearly",
    "simply",
    "just",
    "quite",
    "rather",
    "somewhat",
    "somehow",
    "anyway",
    "perhaps",
    "maybe",
    "probably",
];

pub const REDUNDANT_PHRASES: [&str; 9] = [
    "in order to",
    "at this point in time",
    "due to the fact that",
    "in the event that",
    "for the purpose of",
    "with regard to",
    "in terms of",
    "as a matter of fact",
    "at the end of the day",
];

pub static SENTENCE_BREAK: LazyLock<Regex> = LazyLock::new(|| Regex::new(r"[.!?]+").expect("SENTENCE_BREAK regex"));

// Structural metadata

pub static OPEN_GRAPH_PROPERTY: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"(?i)^og:").expect("OPEN_GRAPH_PROPERTY regex"));

pub static TWITTER_CARD_NAME: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"(?i)^twitter:").expect("TWITTER_CARD_NAME regex"));

/// JSON-LD `@type` values that describe question and answer content.
pub const QA_SCHEMA_TYPES: [&str; 3] = ["FAQPage", "QAPage", "Question"];

pub const REVIEW_SCHEMA_TYPES: [&str; 1] = ["Review"];

pub const ORGANIZATION_SCHEMA_TYPES: [&str; 3] = ["Organization", "Corporation", "LocalBusiness"];

/// Counts non-overlapping occurrences of `needle` in `haystack`.
pub fn count_occurrences(haystack: &str, needle: &str) -> usize {
    if needle.is_empty() {
        return 0;
    }
    haystack.matches(needle).count()
}

/// Counts how many of `terms` appear at least once in `haystack`.
pub fn count_present(haystack: &str, terms: &[&str]) -> usize {
    terms.iter().filter(|term| haystack.contains(**term)).count()
}

/// Splits text into trimmed, non-empty sentences on runs of `.`, `!` and `?`.
pub fn sentences(text: &str) -> Vec<&str> {
    SENTENCE_BREAK.split(text).map(str::trim).filter(|s| !s.is_empty()).collect()
}
