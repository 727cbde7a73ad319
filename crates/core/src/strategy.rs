//! Strategic positioning, competitor comparison and rewrite suggestions.
//!
//! [`StrategicAnalysis::derive`] reads positioning and content gaps straight
//! from the content facts. An [`Advisor`] may replace that reading with its
//! own; a reply that is not the expected JSON keeps the derived analysis.
//! Rewrites have no derived form, so without an advisor they fall back to an
//! empty plan with an explanatory strategy line.

use std::fmt;

use serde::de::DeserializeOwned;
use serde::{Deserialize, Serialize};
use url::Url;

use crate::advisor::Advisor;
use crate::classify::ContentFacts;
use crate::scoring::ScoreBreakdown;
use crate::text::truncate_chars;
use crate::{AiscoutError, Result};

/// Characters of page text kept in a comparison preview.
pub const PREVIEW_CHARS: usize = 200;

/// Characters of page text sent to an advisor.
pub const PROMPT_CHARS: usize = 3000;

/// Gap scores below this produce a recommendation.
pub const GAP_THRESHOLD: u32 = 50;

/// Categories earning at least this share of their points count as strengths.
pub const STRENGTH_PERCENT: u32 = 80;

pub const REWRITES_UNAVAILABLE: &str = "AI-powered rewrites require API configuration";
pub const REWRITES_FAILED: &str = "Unable to generate rewrites";

macro_rules! labels {
    ($(#[$meta:meta])* $name:ident { $($variant:ident => $label:literal),+ $(,)? }) => {
        $(#[$meta])*
        #[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
        pub enum $name {
            $(#[serde(rename = $label)] $variant,)+
        }

        impl $name {
            pub fn as_str(self) -> &'static str {
                match self {
                    $(Self::$variant => $label,)+
                }
            }
        }

        impl fmt::Display for $name {
            fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
                f.write_str(self.as_str())
            }
        }
    };
}

labels!(Tone {
    Promotional => "promotional",
    Educational => "educational",
    Hybrid => "hybrid",
});

labels!(AudienceLevel {
    EarlyStage => "early-stage",
    DecisionMaker => "decision-maker",
    Technical => "technical",
});

labels!(NarrativeFocus {
    ProductCentric => "product-centric",
    OutcomeFocused => "outcome-focused",
    SolutionOriented => "solution-oriented",
});

labels!(
    /// Priority, effort or impact.
    Level {
        High => "high",
        Medium => "medium",
        Low => "low",
    }
);

labels!(StrategyArea {
    Positioning => "positioning",
    Evidence => "evidence",
    Structure => "structure",
});

labels!(Timeline {
    Weeks => "1-2 weeks",
    Months => "1-2 months",
    Quarter => "3+ months",
});

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Positioning {
    pub current_tone: Tone,
    /// Share of tone signals that are promotional, 0 to 100.
    pub promotional_percentage: u32,
    pub audience_level: AudienceLevel,
    pub narrative_focus: NarrativeFocus,
}

/// Each score runs 0 to 100; low scores are gaps.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct ContentGaps {
    pub factual_density_score: u32,
    pub authority_signals_score: u32,
    pub answer_structure_score: u32,
    pub evidence_quality_score: u32,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct StrategicRecommendation {
    pub category: StrategyArea,
    pub priority: Level,
    pub recommendation: String,
    pub business_impact: String,
    pub effort: Level,
    pub timeline: Timeline,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct StrategicAnalysis {
    pub strategic_positioning: Positioning,
    pub content_gaps: ContentGaps,
    pub strategic_recommendations: Vec<StrategicRecommendation>,
    pub competitive_strengths: Vec<String>,
    pub ai_optimization_score: u32,
}

impl StrategicAnalysis {
    /// Reads positioning and gaps from the facts; the optimization score is
    /// the page's final score.
    pub fn derive(content: &ContentFacts, score: &ScoreBreakdown) -> Self {
        let positioning = positioning(content);
        let content_gaps = ContentGaps::from_facts(content);
        let strategic_recommendations = strategic_recommendations(&positioning, &content_gaps);

        Self {
            strategic_positioning: positioning,
            content_gaps,
            strategic_recommendations,
            competitive_strengths: strengths(score),
            ai_optimization_score: score.final_score,
        }
    }
}

impl ContentGaps {
    pub fn from_facts(content: &ContentFacts) -> Self {
        let answers = &content.answer_optimization;
        let factual = &content.factual_content;

        let answer_structure = (if answers.has_faq_section { 40 } else { 0 })
            + answers.qa_pairs_count.min(5) * 6
            + (answers.definition_count + answers.how_to_sections).min(3) * 10;
        let evidence = factual.citation_count * 20
            + content.credibility.quality_links * 15
            + factual.statistics_count.min(5) * 5;

        Self {
            factual_density_score: factual.factual_score,
            authority_signals_score: content.credibility.credibility_score,
            answer_structure_score: answer_structure.min(100) as u32,
            evidence_quality_score: evidence.min(100) as u32,
        }
    }

    /// Gap scores under [`GAP_THRESHOLD`], weakest first.
    pub fn weakest(&self) -> Vec<(&'static str, u32)> {
        let mut gaps: Vec<_> = [
            ("Factual density", self.factual_density_score),
            ("Authority signals", self.authority_signals_score),
            ("Answer structure", self.answer_structure_score),
            ("Evidence quality", self.evidence_quality_score),
        ]
        .into_iter()
        .filter(|(_, score)| *score < GAP_THRESHOLD)
        .collect();
        gaps.sort_by_key(|(_, score)| *score);
        gaps
    }
}

fn positioning(content: &ContentFacts) -> Positioning {
    let tone = &content.promotional_language;
    let factual = &content.factual_content;
    let promotional = tone.promotional_keyword_count + tone.superlative_count;
    let evidential = factual.factual_indicators + factual.statistics_count + factual.citation_count;

    let promotional_percentage = match promotional + evidential {
        0 => 0,
        total => ((promotional * 100) as f64 / total as f64).round() as u32,
    };
    let current_tone = if promotional + evidential == 0 {
        Tone::Hybrid
    } else if promotional_percentage >= 60 {
        Tone::Promotional
    } else if promotional_percentage <= 30 {
        Tone::Educational
    } else {
        Tone::Hybrid
    };

    let grade = content.readability.flesch_kincaid_grade.unwrap_or(0.0);
    let audience_level = if current_tone == Tone::Promotional {
        AudienceLevel::EarlyStage
    } else if grade >= 13.0 {
        AudienceLevel::Technical
    } else {
        AudienceLevel::DecisionMaker
    };

    let answers = &content.answer_optimization;
    let narrative_focus = if current_tone == Tone::Promotional {
        NarrativeFocus::ProductCentric
    } else if answers.how_to_sections + answers.definition_count + answers.qa_pairs_count > 0 {
        NarrativeFocus::SolutionOriented
    } else {
        NarrativeFocus::OutcomeFocused
    };

    Positioning { current_tone, promotional_percentage, audience_level, narrative_focus }
}

fn recommendation(
    category: StrategyArea, priority: Level, recommendation: &str, business_impact: &str, effort: Level,
    timeline: Timeline,
) -> StrategicRecommendation {
    StrategicRecommendation {
        category,
        priority,
        recommendation: recommendation.to_string(),
        business_impact: business_impact.to_string(),
        effort,
        timeline,
    }
}

fn strategic_recommendations(positioning: &Positioning, gaps: &ContentGaps) -> Vec<StrategicRecommendation> {
    let mut recs = Vec::new();

    if positioning.current_tone == Tone::Promotional {
        recs.push(recommendation(
            StrategyArea::Positioning,
            Level::High,
            "Shift from product features to customer outcomes",
            "Improved AI citation probability",
            Level::High,
            Timeline::Months,
        ));
    }
    if gaps.answer_structure_score < GAP_THRESHOLD {
        recs.push(recommendation(
            StrategyArea::Structure,
            Level::High,
            "Restructure key sections as direct questions with short, self-contained answers",
            "Answers can be quoted directly in AI responses",
            Level::Low,
            Timeline::Weeks,
        ));
    }
    if gaps.factual_density_score < GAP_THRESHOLD {
        recs.push(recommendation(
            StrategyArea::Evidence,
            Level::High,
            "Back key claims with specific figures, dates and named sources",
            "Gives AI systems verifiable facts to cite",
            Level::Medium,
            Timeline::Weeks,
        ));
    }
    if gaps.evidence_quality_score < GAP_THRESHOLD {
        recs.push(recommendation(
            StrategyArea::Evidence,
            Level::Medium,
            "Link to primary research and authoritative references",
            "Raises the trust AI systems place in the page",
            Level::Medium,
            Timeline::Weeks,
        ));
    }
    if gaps.authority_signals_score < GAP_THRESHOLD {
        recs.push(recommendation(
            StrategyArea::Evidence,
            Level::Medium,
            "Add author bylines with credentials and expert review",
            "Strengthens expertise signals on competitive queries",
            Level::Medium,
            Timeline::Months,
        ));
    }
    if recs.is_empty() {
        recs.push(recommendation(
            StrategyArea::Positioning,
            Level::Low,
            "Keep the page current and extend it to adjacent questions",
            "Holds citation share as competing pages improve",
            Level::Low,
            Timeline::Quarter,
        ));
    }

    recs
}

fn strengths(score: &ScoreBreakdown) -> Vec<String> {
    score
        .categories
        .iter()
        .filter(|c| c.possible > 0 && c.earned * 100 >= c.possible * STRENGTH_PERCENT)
        .map(|c| c.name.clone())
        .collect()
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Rewrite {
    /// Usually headline, intro, body or conclusion.
    pub section: String,
    pub original: String,
    pub rewritten: String,
    pub reasoning: String,
    pub impact: Level,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct RewritePlan {
    #[serde(default)]
    pub rewrites: Vec<Rewrite>,
    pub overall_strategy: String,
}

impl RewritePlan {
    pub fn unavailable() -> Self {
        Self { rewrites: Vec::new(), overall_strategy: REWRITES_UNAVAILABLE.to_string() }
    }

    pub fn failed() -> Self {
        Self { rewrites: Vec::new(), overall_strategy: REWRITES_FAILED.to_string() }
    }
}

/// A page's strategic analysis with suggested rewrites.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct RewriteReport {
    pub url: String,
    pub strategic_analysis: StrategicAnalysis,
    pub rewrites: RewritePlan,
}

/// One page in a comparison. A page that cannot be fetched is reported, not
/// dropped.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ComparisonEntry {
    /// The input as given.
    pub url: String,
    /// Host and port, empty for files and stdin.
    pub domain: String,
    #[serde(flatten)]
    pub outcome: ComparisonOutcome,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "status", rename_all = "snake_case")]
pub enum ComparisonOutcome {
    Analyzed { score: u32, analysis: StrategicAnalysis, content_preview: String },
    Failed { error: String },
}

impl ComparisonEntry {
    pub fn analysis(&self) -> Option<&StrategicAnalysis> {
        match &self.outcome {
            ComparisonOutcome::Analyzed { analysis, .. } => Some(analysis),
            ComparisonOutcome::Failed { .. } => None,
        }
    }
}

/// `host[:port]` of a URL, or an empty string.
pub fn domain_of(input: &str) -> String {
    let Ok(url) = Url::parse(input.trim()) else {
        return String::new();
    };
    match (url.host_str(), url.port()) {
        (Some(host), Some(port)) => format!("{}:{}", host, port),
        (Some(host), None) => host.to_string(),
        _ => String::new(),
    }
}

/// The first [`PREVIEW_CHARS`] characters, with `...` when cut.
pub fn content_preview(text: &str) -> String {
    if text.chars().count() > PREVIEW_CHARS {
        format!("{}...", truncate_chars(text, PREVIEW_CHARS))
    } else {
        text.to_string()
    }
}

pub fn strategy_prompt(url: &str, text: &str) -> String {
    format!(
        r#"Analyze this content for AI discoverability and respond with ONLY valid JSON:

URL: {url}
Content: {content}

Analyze the actual content and provide a JSON response with this structure:
{{
    "strategic_positioning": {{
        "current_tone": "promotional|educational|hybrid",
        "promotional_percentage": [0-100 based on actual content],
        "audience_level": "early-stage|decision-maker|technical",
        "narrative_focus": "product-centric|outcome-focused|solution-oriented"
    }},
    "content_gaps": {{
        "factual_density_score": [0-100 based on facts/data in content],
        "authority_signals_score": [0-100 based on credibility indicators],
        "answer_structure_score": [0-100 based on Q&A format],
        "evidence_quality_score": [0-100 based on citations/proof]
    }},
    "strategic_recommendations": [
        {{
            "category": "positioning|evidence|structure",
            "priority": "high|medium|low",
            "recommendation": "[specific recommendation based on content analysis]",
            "business_impact": "[specific impact description]",
            "effort": "high|medium|low",
            "timeline": "1-2 weeks|1-2 months|3+ months"
        }}
    ],
    "competitive_strengths": ["[list actual strengths found in content]"],
    "ai_optimization_score": [0-100 overall score based on analysis]
}}

Important: Analyze the ACTUAL content provided. Give different scores and recommendations based on what you actually see in the content."#,
        content = truncate_chars(text, PROMPT_CHARS)
    )
}

/// # Errors
///
/// Returns [`AiscoutError::SerializationError`] if the gaps cannot be encoded.
pub fn rewrite_prompt(text: &str, gaps: &ContentGaps) -> Result<String> {
    let gaps = serde_json::to_string(gaps)?;
    Ok(format!(
        r#"Based on this content and strategic gaps, provide specific rewrite suggestions:

Original Content: {content}...

Strategic Gaps: {gaps}

Provide 3-5 specific rewrite examples in this format:
{{
    "rewrites": [
        {{
            "section": "headline|intro|body|conclusion",
            "original": "original text excerpt",
            "rewritten": "improved version",
            "reasoning": "why this improves AI discoverability",
            "impact": "high|medium|low"
        }}
    ],
    "overall_strategy": "summary of strategic content direction"
}}

Focus on:
1. Transforming promotional language to factual/educational
2. Adding specific metrics and proof points
3. Improving answer structure for AI queries
4. Enhancing authority signals"#,
        content = truncate_chars(text, PROMPT_CHARS)
    ))
}

/// Cuts the JSON object out of a reply that may wrap it in prose or a code fence.
pub fn extract_json(reply: &str) -> &str {
    let mut text = reply.trim();
    if let Some((_, rest)) = text.split_once("```json") {
        text = rest.split("```").next().unwrap_or(rest);
    } else if let Some((_, rest)) = text.split_once("```") {
        text = rest.split("```").next().unwrap_or(rest);
    }

    match (text.find('{'), text.rfind('}')) {
        (Some(start), Some(end)) if end > start => &text[start..=end],
        _ => text.trim(),
    }
}

/// # Errors
///
/// Returns [`AiscoutError::AdvisorError`] if the reply holds no JSON of type `T`.
pub fn parse_reply<T: DeserializeOwned>(reply: &str) -> Result<T> {
    serde_json::from_str(extract_json(reply))
        .map_err(|e| AiscoutError::AdvisorError(format!("advisor reply is not the expected JSON: {}", e)))
}

/// Asks `advisor` for a strategic analysis of the page text, keeping
/// `derived` when there is no advisor or its reply does not parse.
pub async fn strategy_or_derived<A: Advisor>(
    advisor: Option<&A>, url: &str, text: &str, derived: StrategicAnalysis,
) -> StrategicAnalysis {
    let Some(advisor) = advisor else {
        return derived;
    };

    match advisor.complete(&strategy_prompt(url, text)).await.and_then(|reply| parse_reply(&reply)) {
        Ok(analysis) => analysis,
        Err(e) => {
            tracing::warn!(advisor = advisor.name(), url, error = %e, "strategic analysis failed, using derived analysis");
            derived
        }
    }
}

/// Asks `advisor` for rewrites that close `gaps`.
///
/// Without an advisor the plan is [`RewritePlan::unavailable`]; a failed call
/// or unparsable reply gives [`RewritePlan::failed`].
pub async fn rewrites_or_fallback<A: Advisor>(advisor: Option<&A>, text: &str, gaps: &ContentGaps) -> RewritePlan {
    let Some(advisor) = advisor else {
        return RewritePlan::unavailable();
    };

    let reply = match rewrite_prompt(text, gaps) {
        Ok(prompt) => advisor.complete(&prompt).await,
        Err(e) => Err(e),
    };
    match reply.and_then(|reply| parse_reply(&reply)) {
        Ok(plan) => plan,
        Err(e) => {
            tracing::warn!(advisor = advisor.name(), error = %e, "rewrite generation failed");
            RewritePlan::failed()
        }
    }
}

#[cfg(test)]
mod tests {
    use rstest::rstest;

    use super::*;
    use crate::advisor::StaticAdvisor;
    use crate::classify::{ClassifierConfig, classify};
    use crate::parse::Document;
    use crate::scoring::{ScoringConfig, score};
    use crate::structure::{SiteFiles, analyze_structure};

    const PROMO_PAGE: &str = r#"<html lang="en"><head><title>Best Widgets</title></head><body>
        <h1>The best widgets</h1>
        <p>Our revolutionary, world-class, industry-leading widgets are the best and most innovative.
        Exclusive premium quality from the leading, top, unparalleled brand.</p></body></html>"#;

    const GUIDE_PAGE: &str = r#"<html lang="en"><head><title>Soil pH</title></head><body><main>
        <h1>Soil pH guide</h1>
        <h2>Frequently asked questions</h2>
        <h3>What is soil pH?</h3>
        <p>Soil pH refers to the acidity of soil. According to the 2021 USDA survey, 42% of
        garden soils tested between 6.0 and 7.0. Research shows lime raises pH by 0.5 within 90 days.</p>
        <h3>How do I test it?</h3>
        <p>How to test: use a meter. A study by Dr. Jane Smith found kits accurate within 0.2 units.</p>
        </main></body></html>"#;

    fn derive(html: &str) -> StrategicAnalysis {
        let doc = Document::parse_with_url(html, "https://example.com/page");
        let structure = analyze_structure(&doc, "https://example.com/page", SiteFiles::default());
        let content = classify(&doc, &ClassifierConfig::default());
        let breakdown = score(&structure, Some(&content), &ScoringConfig::default());
        StrategicAnalysis::derive(&content, &breakdown)
    }

    fn block_on<T: Send + 'static>(future: impl Future<Output = T> + Send + 'static) -> T {
        std::thread::spawn(move || tokio::runtime::Builder::new_current_thread().build().unwrap().block_on(future))
            .join()
            .unwrap()
    }

    #[test]
    fn test_promotional_page_positioning() {
        let analysis = derive(PROMO_PAGE);
        let positioning = &analysis.strategic_positioning;
        assert_eq!(positioning.current_tone, Tone::Promotional);
        assert!(positioning.promotional_percentage >= 60);
        assert_eq!(positioning.audience_level, AudienceLevel::EarlyStage);
        assert_eq!(positioning.narrative_focus, NarrativeFocus::ProductCentric);

        let first = &analysis.strategic_recommendations[0];
        assert_eq!(first.category, StrategyArea::Positioning);
        assert_eq!(first.recommendation, "Shift from product features to customer outcomes");
        assert_eq!(first.timeline, Timeline::Months);
    }

    #[test]
    fn test_guide_page_positioning() {
        let analysis = derive(GUIDE_PAGE);
        let positioning = &analysis.strategic_positioning;
        assert_eq!(positioning.current_tone, Tone::Educational);
        assert!(positioning.promotional_percentage <= 30);
        assert_eq!(positioning.narrative_focus, NarrativeFocus::SolutionOriented);
        assert!(analysis.content_gaps.answer_structure_score >= GAP_THRESHOLD);
        let positioning_recs: Vec<_> =
            analysis.strategic_recommendations.iter().filter(|r| r.category == StrategyArea::Positioning).collect();
        assert!(positioning_recs.iter().all(|r| r.priority == Level::Low));
    }

    #[test]
    fn test_score_and_strengths_follow_breakdown() {
        let doc = Document::parse_with_url(GUIDE_PAGE, "https://example.com/page");
        let structure = analyze_structure(&doc, "https://example.com/page", SiteFiles::default());
        let content = classify(&doc, &ClassifierConfig::default());
        let breakdown = score(&structure, Some(&content), &ScoringConfig::default());
        let analysis = StrategicAnalysis::derive(&content, &breakdown);

        assert_eq!(analysis.ai_optimization_score, breakdown.final_score);
        for name in &analysis.competitive_strengths {
            let category = breakdown.category(name).unwrap();
            assert!(category.earned * 100 >= category.possible * STRENGTH_PERCENT, "{name}");
        }
    }

    #[test]
    fn test_empty_page_is_hybrid_with_every_gap() {
        let analysis = derive("<html><body></body></html>");
        assert_eq!(analysis.strategic_positioning.current_tone, Tone::Hybrid);
        assert_eq!(analysis.strategic_positioning.promotional_percentage, 0);
        assert_eq!(analysis.content_gaps.weakest().len(), 4);
        assert_eq!(analysis.strategic_recommendations.len(), 4);
    }

    #[test]
    fn test_weakest_gaps_sorted() {
        let gaps = ContentGaps {
            factual_density_score: 45,
            authority_signals_score: 10,
            answer_structure_score: 90,
            evidence_quality_score: 30,
        };
        let names: Vec<_> = gaps.weakest().into_iter().map(|(name, _)| name).collect();
        assert_eq!(names, ["Authority signals", "Evidence quality", "Factual density"]);
    }

    #[test]
    fn test_labels_serialize_as_text() {
        let rec = recommendation(StrategyArea::Structure, Level::High, "r", "b", Level::Low, Timeline::Quarter);
        let value = serde_json::to_value(&rec).unwrap();
        assert_eq!(value["category"], "structure");
        assert_eq!(value["priority"], "high");
        assert_eq!(value["timeline"], "3+ months");
        assert_eq!(AudienceLevel::DecisionMaker.to_string(), "decision-maker");
    }

    #[rstest]
    #[case::plain(r#"{"a": 1}"#, r#"{"a": 1}"#)]
    #[case::json_fence("Here you go:\n```json\n{\"a\": 1}\n```\nThanks", r#"{"a": 1}"#)]
    #[case::bare_fence("```\n{\"a\": 1}\n```", r#"{"a": 1}"#)]
    #[case::prose("Sure! {\"a\": {\"b\": 2}} Hope this helps.", r#"{"a": {"b": 2}}"#)]
    #[case::no_object("no json here", "no json here")]
    fn test_extract_json(#[case] reply: &str, #[case] expected: &str) {
        assert_eq!(extract_json(reply), expected);
    }

    #[test]
    fn test_domain_of() {
        assert_eq!(domain_of("https://www.example.com/a?b=c"), "www.example.com");
        assert_eq!(domain_of("http://127.0.0.1:8080/page"), "127.0.0.1:8080");
        assert_eq!(domain_of("page.html"), "");
        assert_eq!(domain_of("file:///tmp/page.html"), "");
    }

    #[test]
    fn test_content_preview() {
        assert_eq!(content_preview("short"), "short");
        let long = "é".repeat(250);
        let preview = content_preview(&long);
        assert_eq!(preview.chars().count(), PREVIEW_CHARS + 3);
        assert!(preview.ends_with("..."));
    }

    #[test]
    fn test_prompts_carry_page_text() {
        let text = "x".repeat(PROMPT_CHARS + 500);
        let prompt = strategy_prompt("https://example.com", &text);
        assert!(prompt.contains("URL: https://example.com"));
        assert!(prompt.contains(&"x".repeat(PROMPT_CHARS)));
        assert!(!prompt.contains(&"x".repeat(PROMPT_CHARS + 1)));

        let gaps = derive(PROMO_PAGE).content_gaps;
        let prompt = rewrite_prompt("Our best widgets.", &gaps).unwrap();
        assert!(prompt.contains("Original Content: Our best widgets...."));
        assert!(prompt.contains("\"factual_density_score\":"));
        assert!(prompt.contains("4. Enhancing authority signals"));
    }

    #[test]
    fn test_strategy_without_advisor_is_derived() {
        let derived = derive(PROMO_PAGE);
        let expected = derived.clone();
        let analysis = block_on(strategy_or_derived::<StaticAdvisor>(None, "https://example.com", "text", derived));
        assert_eq!(analysis, expected);
    }

    #[test]
    fn test_strategy_from_advisor_reply() {
        let mut reply = derive(GUIDE_PAGE);
        reply.ai_optimization_score = 12;
        reply.competitive_strengths = vec!["Clear product description".to_string()];
        let advisor = StaticAdvisor::new(format!("```json\n{}\n```", serde_json::to_string(&reply).unwrap()));

        let derived = derive(PROMO_PAGE);
        let analysis = block_on(async move { strategy_or_derived(Some(&advisor), "u", "t", derived).await });
        assert_eq!(analysis, reply);
    }

    #[test]
    fn test_strategy_unparsable_reply_keeps_derived() {
        let derived = derive(PROMO_PAGE);
        let expected = derived.clone();
        let advisor = StaticAdvisor::new("I cannot help with that.");
        let analysis = block_on(async move { strategy_or_derived(Some(&advisor), "u", "t", derived).await });
        assert_eq!(analysis, expected);
    }

    #[test]
    fn test_rewrites_fallbacks() {
        let gaps = derive(PROMO_PAGE).content_gaps;

        let plan = block_on(async move { rewrites_or_fallback::<StaticAdvisor>(None, "t", &gaps).await });
        assert_eq!(plan, RewritePlan::unavailable());
        assert_eq!(plan.overall_strategy, "AI-powered rewrites require API configuration");

        let advisor = StaticAdvisor::new(r#"{"rewrites": [{"section": "intro"}]}"#);
        let plan = block_on(async move { rewrites_or_fallback(Some(&advisor), "t", &gaps).await });
        assert_eq!(plan, RewritePlan::failed());
    }

    #[test]
    fn test_rewrites_from_advisor_reply() {
        let gaps = derive(PROMO_PAGE).content_gaps;
        let advisor = StaticAdvisor::new(
            r#"Here are the rewrites:
            {"rewrites": [{"section": "headline", "original": "The best widgets",
              "rewritten": "Widgets rated 4.6/5 by 1,200 buyers", "reasoning": "A measurable claim",
              "impact": "high"}],
             "overall_strategy": "Replace superlatives with evidence"}"#,
        );

        let plan = block_on(async move { rewrites_or_fallback(Some(&advisor), "t", &gaps).await });
        assert_eq!(plan.rewrites.len(), 1);
        assert_eq!(plan.rewrites[0].section, "headline");
        assert_eq!(plan.rewrites[0].impact, Level::High);
        assert_eq!(plan.overall_strategy, "Replace superlatives with evidence");
    }

    #[test]
    fn test_comparison_entry_shape() {
        let failed = ComparisonEntry {
            url: "https://down.example".to_string(),
            domain: "down.example".to_string(),
            outcome: ComparisonOutcome::Failed { error: "HTTP request failed".to_string() },
        };
        let value = serde_json::to_value(&failed).unwrap();
        assert_eq!(value["status"], "failed");
        assert_eq!(value["error"], "HTTP request failed");
        assert!(failed.analysis().is_none());

        let analyzed = ComparisonEntry {
            url: "https://up.example".to_string(),
            domain: "up.example".to_string(),
            outcome: ComparisonOutcome::Analyzed {
                score: 40,
                analysis: derive(GUIDE_PAGE),
                content_preview: "Soil pH".to_string(),
            },
        };
        let value = serde_json::to_value(&analyzed).unwrap();
        assert_eq!(value["status"], "analyzed");
        assert_eq!(value["score"], 40);
        assert_eq!(value["analysis"]["strategic_positioning"]["current_tone"], "educational");
        let back: ComparisonEntry = serde_json::from_value(value).unwrap();
        assert_eq!(back, analyzed);
    }
}
