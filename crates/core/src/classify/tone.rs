//! Promotional versus factual tone.

use serde::{Deserialize, Serialize};

use super::round_to;
use crate::lexicon::{
    CITATION_PATTERNS, FACTUAL_INDICATORS, NUMBER, PROMOTIONAL_TERMS, SUPERLATIVE, count_occurrences, count_present,
};
use crate::text::word_count;

const SAMPLE_LIMIT: usize = 10;

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PromotionalLanguage {
    /// Every occurrence of every lexicon term.
    pub promotional_keyword_count: usize,
    /// Occurrences per hundred words, two decimals.
    pub promotional_density: f64,
    /// Lexicon terms present, in lexicon order.
    pub found_keywords: Vec<String>,
    pub superlative_count: usize,
    pub is_promotional: bool,
    pub recommendation: String,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct FactualContent {
    pub factual_indicators: usize,
    pub statistics_count: usize,
    pub citation_count: usize,
    pub numbers_found: Vec<String>,
    pub factual_score: u32,
    pub is_fact_based: bool,
}

pub fn promotional(text: &str) -> PromotionalLanguage {
    let lower = text.to_lowercase();
    let words = word_count(text);

    let promotional_keyword_count: usize = PROMOTIONAL_TERMS.iter().map(|term| count_occurrences(&lower, term)).sum();
    let found_keywords = PROMOTIONAL_TERMS
        .iter()
        .filter(|term| lower.contains(**term))
        .take(SAMPLE_LIMIT)
        .map(|term| term.to_string())
        .collect();

    let density = if words > 0 { promotional_keyword_count as f64 / words as f64 * 100.0 } else { 0.0 };
    let superlative_count = SUPERLATIVE.find_iter(&lower).count();

    PromotionalLanguage {
        promotional_keyword_count,
        promotional_density: round_to(density, 2),
        found_keywords,
        superlative_count,
        is_promotional: density > 2.0 || superlative_count > 5,
        recommendation: promotional_recommendation(density).to_string(),
    }
}

pub fn promotional_recommendation(density: f64) -> &'static str {
    if density < 1.0 {
        "Good - Minimal promotional language detected"
    } else if density < 2.0 {
        "Moderate - Consider reducing marketing terms"
    } else if density < 3.0 {
        "High - Replace promotional language with factual descriptions"
    } else {
        "Excessive - Major rewrite needed for AI optimization"
    }
}

pub fn factual(text: &str) -> FactualContent {
    let lower = text.to_lowercase();

    let factual_indicators = count_present(&lower, &FACTUAL_INDICATORS);
    let numbers: Vec<&str> = NUMBER.find_iter(text).map(|m| m.as_str()).collect();
    let statistics_count = numbers.len();
    let citation_count: usize = CITATION_PATTERNS.iter().map(|re| re.find_iter(&lower).count()).sum();

    FactualContent {
        factual_indicators,
        statistics_count,
        citation_count,
        numbers_found: numbers.iter().take(SAMPLE_LIMIT).map(|n| n.to_string()).collect(),
        factual_score: factual_score(factual_indicators, statistics_count, citation_count),
        is_fact_based: factual_indicators > 3 || statistics_count > 5,
    }
}

/// Weighted sum of indicator, statistic and citation counts, each capped.
pub fn factual_score(indicators: usize, statistics: usize, citations: usize) -> u32 {
    let score = (indicators * 10).min(30) + (statistics * 8).min(40) + (citations * 15).min(30);
    score.min(100) as u32
}
