//! Weighted category scoring.
//!
//! Turns structural and content facts into a [`ScoreBreakdown`]: one entry
//! per category with earned and possible points, one entry per penalty, and
//! a final score normalized against the scheme's maximum and clamped to
//! 0..=100. Scoring is a pure function of its inputs.

use serde::de::Error as _;
use serde::{Deserialize, Deserializer, Serialize};

use crate::classify::ContentFacts;
use crate::structure::StructuralFacts;

const CHECK: &str = "✓";
const CROSS: &str = "✗";

/// Question nodes needed for the Q&A bonus.
const QA_PAIRS_THRESHOLD: usize = 3;
/// List elements needed for the list bonus.
const LISTS_THRESHOLD: usize = 5;

/// Which set of categories produced a breakdown.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ScoringScheme {
    /// 50 technical points plus 50 content points.
    Combined,
    /// 100 technical points, used when no content facts are available.
    TechnicalOnly,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CategoryScore {
    pub name: String,
    pub earned: u32,
    pub possible: u32,
    pub details: String,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Penalty {
    pub name: String,
    /// Negative when applied, otherwise 0.
    pub points: i32,
    pub applied: bool,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ScoreBreakdown {
    pub scheme: ScoringScheme,
    pub categories: Vec<CategoryScore>,
    pub penalties: Vec<Penalty>,
    pub total_earned: u32,
    pub total_possible: u32,
    /// Sum of applied penalties, zero or negative.
    pub total_penalties: i32,
    /// Earned points plus penalties, before normalization.
    pub raw_score: i32,
    /// 0 to 100.
    pub final_score: u32,
}

impl ScoreBreakdown {
    pub fn category(&self, name: &str) -> Option<&CategoryScore> {
        self.categories.iter().find(|c| c.name == name)
    }

    pub fn applied_penalties(&self) -> impl Iterator<Item = &Penalty> {
        self.penalties.iter().filter(|p| p.applied)
    }
}

/// How the image alt ratio is turned into points.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum AltRounding {
    Round,
    Floor,
}

/// Point values for the technical categories.
///
/// Fields missing from a config file keep the combined-scheme values.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct TechnicalWeights {
    pub title: u32,
    pub meta_description: u32,
    /// Awarded for exactly one `h1`.
    pub single_h1: u32,
    /// Awarded instead of `single_h1` when there are several.
    pub multiple_h1: u32,
    pub h2: u32,
    pub image_alt: u32,
    pub image_alt_rounding: AltRounding,
    pub structured_data: u32,
    /// Points for at least 5, 3 and 1 semantic elements.
    pub semantic_tiers: [u32; 3],
    pub data_organization: u32,
    pub robots_txt: u32,
    pub sitemap_xml: u32,
    pub open_graph: u32,
    pub twitter_card: u32,
    pub canonical: u32,
    pub html_lang: u32,
    pub charset: u32,
}

impl TechnicalWeights {
    /// The technical half of the combined scheme, 50 points.
    pub fn combined() -> Self {
        Self {
            title: 2,
            meta_description: 4,
            single_h1: 3,
            multiple_h1: 1,
            h2: 3,
            image_alt: 5,
            image_alt_rounding: AltRounding::Round,
            structured_data: 7,
            semantic_tiers: [5, 3, 2],
            data_organization: 2,
            robots_txt: 3,
            sitemap_xml: 3,
            open_graph: 3,
            twitter_card: 2,
            canonical: 3,
            html_lang: 3,
            charset: 1,
        }
    }

    /// The technical-only scheme, 100 points.
    pub fn legacy() -> Self {
        Self {
            title: 5,
            meta_description: 7,
            single_h1: 6,
            multiple_h1: 3,
            h2: 6,
            image_alt: 10,
            image_alt_rounding: AltRounding::Floor,
            structured_data: 15,
            semantic_tiers: [10, 7, 4],
            data_organization: 5,
            robots_txt: 6,
            sitemap_xml: 6,
            open_graph: 5,
            twitter_card: 5,
            canonical: 6,
            html_lang: 5,
            charset: 3,
        }
    }
}

impl Default for TechnicalWeights {
    fn default() -> Self {
        Self::combined()
    }
}

/// Reads technical-only weights, filling missing fields from
/// [`TechnicalWeights::legacy`] rather than the combined values.
fn legacy_weights<'de, D: Deserializer<'de>>(deserializer: D) -> std::result::Result<TechnicalWeights, D::Error> {
    let overrides = serde_json::Map::<String, serde_json::Value>::deserialize(deserializer)?;
    let mut merged = serde_json::to_value(TechnicalWeights::legacy()).map_err(D::Error::custom)?;
    if let serde_json::Value::Object(fields) = &mut merged {
        fields.extend(overrides);
    }
    serde_json::from_value(merged).map_err(D::Error::custom)
}

/// Point values for the content categories.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct ContentWeights {
    /// Points for an AI-friendly score, a score of at least 50 and at least 30.
    pub readability_tiers: [u32; 3],
    pub non_promotional: u32,
    /// Awarded when flagged promotional but density stays under 2%.
    pub mild_promotional: u32,
    pub fact_based: u32,
    /// Awarded when not fact based but the factual score exceeds 50.
    pub partly_factual: u32,
    pub faq_section: u32,
    pub qa_pairs: u32,
    pub lists: u32,
    /// Points for a credibility score of at least 70, 50 and 30.
    pub credibility_tiers: [u32; 3],
    pub concise: u32,
    /// Awarded when not concise but the brevity score exceeds 50.
    pub partly_concise: u32,
}

impl Default for ContentWeights {
    fn default() -> Self {
        Self {
            readability_tiers: [10, 7, 4],
            non_promotional: 8,
            mild_promotional: 4,
            fact_based: 7,
            partly_factual: 4,
            faq_section: 5,
            qa_pairs: 3,
            lists: 2,
            credibility_tiers: [10, 7, 4],
            concise: 5,
            partly_concise: 3,
        }
    }
}

/// Penalty magnitudes, as positive numbers.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct PenaltyWeights {
    pub missing_robots_txt: u32,
    pub missing_sitemap_xml: u32,
    pub missing_canonical: u32,
    pub missing_html_lang: u32,
    pub promotional_language: u32,
    pub missing_faq: u32,
}

impl Default for PenaltyWeights {
    fn default() -> Self {
        Self {
            missing_robots_txt: 3,
            missing_sitemap_xml: 3,
            missing_canonical: 2,
            missing_html_lang: 2,
            promotional_language: 5,
            missing_faq: 3,
        }
    }
}

/// Every tunable number the scoring engine uses.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct ScoringConfig {
    /// Technical weights for the combined scheme.
    pub combined: TechnicalWeights,
    /// Technical weights for the technical-only scheme.
    #[serde(deserialize_with = "legacy_weights")]
    pub technical_only: TechnicalWeights,
    pub content: ContentWeights,
    pub penalties: PenaltyWeights,
}

impl Default for ScoringConfig {
    fn default() -> Self {
        Self {
            combined: TechnicalWeights::combined(),
            technical_only: TechnicalWeights::legacy(),
            content: ContentWeights::default(),
            penalties: PenaltyWeights::default(),
        }
    }
}

/// Scores a page.
///
/// With content facts the combined scheme is used; without them the
/// technical-only scheme.
///
/// # Example
///
/// ```rust
/// use aiscout_core::parse::Document;
/// use aiscout_core::scoring::{ScoringConfig, ScoringScheme, score};
/// use aiscout_core::structure::{SiteFiles, analyze_structure};
///
/// let doc = Document::parse("<html><body><p>Hi</p></body></html>");
/// let facts = analyze_structure(&doc, "https://example.com", SiteFiles::default());
/// let breakdown = score(&facts, None, &ScoringConfig::default());
///
/// assert_eq!(breakdown.scheme, ScoringScheme::TechnicalOnly);
/// assert_eq!(breakdown.total_possible, 100);
/// assert!(breakdown.final_score <= 100);
/// ```
pub fn score(structure: &StructuralFacts, content: Option<&ContentFacts>, config: &ScoringConfig) -> ScoreBreakdown {
    let (scheme, weights) = match content {
        Some(_) => (ScoringScheme::Combined, &config.combined),
        None => (ScoringScheme::TechnicalOnly, &config.technical_only),
    };

    let mut categories = technical_categories(structure, weights);
    let mut penalties = technical_penalties(structure, &config.penalties);

    if let Some(content) = content {
        categories.extend(content_categories(content, &config.content));
        penalties.extend(content_penalties(content, &config.penalties));
    }

    let total_earned: u32 = categories.iter().map(|c| c.earned).sum();
    let total_possible: u32 = categories.iter().map(|c| c.possible).sum();
    let total_penalties: i32 = penalties.iter().map(|p| p.points).sum();
    let raw_score = total_earned as i32 + total_penalties;
    let final_score = normalize(raw_score, total_possible);

    tracing::debug!(?scheme, total_earned, total_penalties, final_score, "scored page");

    ScoreBreakdown { scheme, categories, penalties, total_earned, total_possible, total_penalties, raw_score, final_score }
}

/// Calculate `round(raw / max * 100)` clamped to 0..=100.
pub fn normalize(raw_score: i32, max: u32) -> u32 {
    if max == 0 {
        return 0;
    }
    let scaled = (raw_score as f64 / max as f64 * 100.0).round();
    scaled.clamp(0.0, 100.0) as u32
}

fn category(name: &str, earned: u32, possible: u32, details: String) -> CategoryScore {
    CategoryScore { name: name.to_string(), earned, possible, details }
}

fn mark(present: bool) -> &'static str {
    if present { CHECK } else { CROSS }
}

fn or_missing(value: &str) -> &str {
    if value.is_empty() { "Missing" } else { value }
}

fn technical_categories(facts: &StructuralFacts, w: &TechnicalWeights) -> Vec<CategoryScore> {
    let has_meta = !facts.meta_description.is_empty();
    let title_meta = if facts.has_title() { w.title } else { 0 } + if has_meta { w.meta_description } else { 0 };

    let h1 = facts.headings.h1.len();
    let h2 = facts.headings.h2.len();
    let headings = match h1 {
        0 => 0,
        1 => w.single_h1,
        _ => w.multiple_h1,
    } + if h2 > 0 { w.h2 } else { 0 };

    let images = &facts.images;
    let (image_points, image_details) = if images.total > 0 {
        let scaled = w.image_alt as f64 * images.with_alt as f64 / images.total as f64;
        let points = match w.image_alt_rounding {
            AltRounding::Round => scaled.round(),
            AltRounding::Floor => scaled.floor(),
        };
        (points as u32, format!("{}/{} images have alt text", images.with_alt, images.total))
    } else {
        (w.image_alt, "No images found".to_string())
    };

    let semantic = facts.semantic_elements.total();
    let [high, mid, low] = w.semantic_tiers;
    let semantic_points = match semantic {
        5.. => high,
        3..=4 => mid,
        1..=2 => low,
        0 => 0,
    };

    let data_org = if facts.tables > 0 || facts.forms > 0 { w.data_organization } else { 0 };
    let crawl = if facts.robots_txt { w.robots_txt } else { 0 } + if facts.sitemap_xml { w.sitemap_xml } else { 0 };
    let social = if facts.open_graph_tags.is_empty() { 0 } else { w.open_graph }
        + if facts.twitter_card_tags.is_empty() { 0 } else { w.twitter_card };
    let has_canonical = !facts.canonical_tag.is_empty();
    let language = if facts.html_lang.is_empty() { 0 } else { w.html_lang }
        + if facts.meta_charset.is_empty() { 0 } else { w.charset };

    vec![
        category(
            "Title & Meta Description",
            title_meta,
            w.title + w.meta_description,
            format!("Title: {}, Meta Description: {}", mark(facts.has_title()), mark(has_meta)),
        ),
        category("Heading Structure", headings, w.single_h1 + w.h2, format!("H1: {}, H2: {}", h1, h2)),
        category("Image Alt Text", image_points, w.image_alt, image_details),
        category(
            "Structured Data",
            if facts.structured_data { w.structured_data } else { 0 },
            w.structured_data,
            if facts.structured_data { "JSON-LD present" } else { "No structured data found" }.to_string(),
        ),
        category("Semantic HTML", semantic_points, high, format!("{} semantic elements found", semantic)),
        category(
            "Data Organization",
            data_org,
            w.data_organization,
            format!("Tables: {}, Forms: {}", facts.tables, facts.forms),
        ),
        category(
            "Crawlability Files",
            crawl,
            w.robots_txt + w.sitemap_xml,
            format!("robots.txt: {}, sitemap.xml: {}", mark(facts.robots_txt), mark(facts.sitemap_xml)),
        ),
        category(
            "Social Media Tags",
            social,
            w.open_graph + w.twitter_card,
            format!("OG: {}, Twitter: {}", facts.open_graph_tags.len(), facts.twitter_card_tags.len()),
        ),
        category(
            "Canonical Tag",
            if has_canonical { w.canonical } else { 0 },
            w.canonical,
            if has_canonical { "Present" } else { "Missing" }.to_string(),
        ),
        category(
            "Language & Charset",
            language,
            w.html_lang + w.charset,
            format!("Lang: {}, Charset: {}", or_missing(&facts.html_lang), or_missing(&facts.meta_charset)),
        ),
    ]
}

fn content_categories(facts: &ContentFacts, w: &ContentWeights) -> Vec<CategoryScore> {
    let readability = &facts.readability;
    let [friendly, fair, hard] = w.readability_tiers;
    let (readability_points, readability_details) = match readability.flesch_reading_ease {
        Some(ease) => {
            let points = if readability.ai_friendly == Some(true) {
                friendly
            } else if ease >= 50.0 {
                fair
            } else if ease >= 30.0 {
                hard
            } else {
                0
            };
            (points, format!("Flesch {:.1}: {}", ease, readability.interpretation))
        }
        None => (0, format!("Readability unavailable: {}", readability.interpretation)),
    };

    let promo = &facts.promotional_language;
    let factual = &facts.factual_content;
    let tone = if !promo.is_promotional {
        w.non_promotional
    } else if promo.promotional_density < 2.0 {
        w.mild_promotional
    } else {
        0
    } + if factual.is_fact_based {
        w.fact_based
    } else if factual.factual_score > 50 {
        w.partly_factual
    } else {
        0
    };

    let answers = &facts.answer_optimization;
    let lists = answers.list_usage.total();
    let answer_points = if answers.has_faq_section { w.faq_section } else { 0 }
        + if answers.qa_pairs_count > QA_PAIRS_THRESHOLD { w.qa_pairs } else { 0 }
        + if lists > LISTS_THRESHOLD { w.lists } else { 0 };

    let credibility = facts.credibility.credibility_score;
    let [strong, moderate, weak] = w.credibility_tiers;
    let credibility_points = match credibility {
        70.. => strong,
        50..=69 => moderate,
        30..=49 => weak,
        _ => 0,
    };

    let brevity = &facts.brevity;
    let brevity_points = if brevity.is_concise {
        w.concise
    } else if brevity.brevity_score > 50 {
        w.partly_concise
    } else {
        0
    };

    vec![
        category("Readability", readability_points, friendly, readability_details),
        category(
            "Tone & Factuality",
            tone,
            w.non_promotional + w.fact_based,
            format!(
                "Promotional density: {}%, Factual score: {}, Fact based: {}",
                promo.promotional_density,
                factual.factual_score,
                mark(factual.is_fact_based)
            ),
        ),
        category(
            "Answer Optimization",
            answer_points,
            w.faq_section + w.qa_pairs + w.lists,
            format!("FAQ: {}, Q&A pairs: {}, Lists: {}", mark(answers.has_faq_section), answers.qa_pairs_count, lists),
        ),
        category("Credibility", credibility_points, strong, format!("Credibility score: {}", credibility)),
        category("Brevity", brevity_points, w.concise, format!("Brevity score: {}", brevity.brevity_score)),
    ]
}

fn penalty(name: &str, magnitude: u32, applied: bool) -> Penalty {
    Penalty { name: name.to_string(), points: if applied { -(magnitude as i32) } else { 0 }, applied }
}

fn technical_penalties(facts: &StructuralFacts, w: &PenaltyWeights) -> Vec<Penalty> {
    vec![
        penalty("Missing robots.txt", w.missing_robots_txt, !facts.robots_txt),
        penalty("Missing sitemap.xml", w.missing_sitemap_xml, !facts.sitemap_xml),
        penalty("Missing canonical tag", w.missing_canonical, facts.canonical_tag.is_empty()),
        penalty("Missing HTML lang attribute", w.missing_html_lang, facts.html_lang.is_empty()),
    ]
}

fn content_penalties(facts: &ContentFacts, w: &PenaltyWeights) -> Vec<Penalty> {
    vec![
        penalty("Promotional language", w.promotional_language, facts.promotional_language.is_promotional),
        penalty("No FAQ section", w.missing_faq, !facts.answer_optimization.has_faq_section),
    ]
}
