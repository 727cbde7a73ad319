//! Rule-based recommendations and the optimization workflow.
//!
//! Every rule is an independent check over the facts; rules do not exclude
//! each other and are not ranked beyond their [`Priority`]. The output never
//! depends on an advisor being configured.

use std::fmt;

use serde::{Deserialize, Serialize};

use crate::classify::ContentFacts;
use crate::scoring::ScoreBreakdown;
use crate::structure::StructuralFacts;

/// Readability scores below this get a recommendation.
const READABILITY_TARGET: f64 = 60.0;
const CREDIBILITY_TARGET: u32 = 50;
const BREVITY_TARGET: u32 = 70;
const MIN_LISTS: usize = 3;

#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Serialize, Deserialize)]
pub enum Priority {
    High,
    Medium,
    Low,
}

impl fmt::Display for Priority {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Priority::High => write!(f, "High"),
            Priority::Medium => write!(f, "Medium"),
            Priority::Low => write!(f, "Low"),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Recommendation {
    pub category: String,
    pub priority: Priority,
    pub issue: String,
    pub action: String,
    pub impact: String,
}

impl Recommendation {
    fn new(category: &str, priority: Priority, issue: impl Into<String>, action: &str, impact: &str) -> Self {
        Self {
            category: category.to_string(),
            priority,
            issue: issue.into(),
            action: action.to_string(),
            impact: impact.to_string(),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ActionItem {
    pub title: String,
    pub description: String,
    pub effort: String,
    pub impact: String,
}

impl ActionItem {
    fn new(title: impl Into<String>, description: &str, effort: &str, impact: &str) -> Self {
        Self {
            title: title.into(),
            description: description.to_string(),
            effort: effort.to_string(),
            impact: impact.to_string(),
        }
    }
}

/// Action items grouped by the effort they take.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Workflow {
    /// Two hours or less each.
    pub quick_wins: Vec<ActionItem>,
    pub deep_optimizations: Vec<ActionItem>,
    pub strategic_initiatives: Vec<ActionItem>,
}

impl Workflow {
    pub fn len(&self) -> usize {
        self.quick_wins.len() + self.deep_optimizations.len() + self.strategic_initiatives.len()
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }
}

/// Content neutral, factual and cited well enough for an encyclopedia.
pub fn wikipedia_ready(content: &ContentFacts) -> bool {
    !content.promotional_language.is_promotional
        && content.factual_content.is_fact_based
        && content.credibility.has_quality_citations
}

/// Builds recommendations and the workflow for one page.
///
/// # Example
///
/// ```rust
/// use aiscout_core::parse::Document;
/// use aiscout_core::recommend::recommend;
/// use aiscout_core::scoring::{ScoringConfig, score};
/// use aiscout_core::structure::{SiteFiles, analyze_structure};
///
/// let doc = Document::parse("<p>Hi</p>");
/// let facts = analyze_structure(&doc, "https://example.com", SiteFiles::default());
/// let breakdown = score(&facts, None, &ScoringConfig::default());
/// let (recommendations, workflow) = recommend(&facts, None, &breakdown);
///
/// assert!(!recommendations.is_empty());
/// assert!(!workflow.strategic_initiatives.is_empty());
/// ```
pub fn recommend(
    structure: &StructuralFacts,
    content: Option<&ContentFacts>,
    breakdown: &ScoreBreakdown,
) -> (Vec<Recommendation>, Workflow) {
    let mut recommendations = technical_recommendations(structure, breakdown);
    if let Some(content) = content {
        recommendations.extend(content_recommendations(content));
    }
    (recommendations, workflow(structure, content))
}

fn technical_recommendations(facts: &StructuralFacts, breakdown: &ScoreBreakdown) -> Vec<Recommendation> {
    let mut recs = Vec::new();

    if facts.meta_description.is_empty() {
        recs.push(Recommendation::new(
            "Meta Description",
            Priority::High,
            "Missing meta description",
            "Write a concise meta description that summarizes the page in one or two sentences.",
            "Gives AI agents and search engines a ready-made summary of the page",
        ));
    }

    let h1 = facts.headings.h1.len();
    if h1 != 1 {
        let issue = if h1 == 0 { "No H1 heading".to_string() } else { format!("{} H1 headings found", h1) };
        recs.push(Recommendation::new(
            "Heading Structure",
            Priority::Medium,
            issue,
            "Use exactly one H1 for the main topic and organize subtopics with H2 and H3 headings.",
            "A clear heading hierarchy helps AI identify the main topic and section boundaries",
        ));
    }

    if !facts.structured_data {
        recs.push(Recommendation::new(
            "Structured Data",
            Priority::High,
            "No structured data found",
            "Add JSON-LD markup (Organization, Article, FAQPage) describing the page content.",
            "Structured data gives AI agents explicit, machine-readable facts",
        ));
    }

    if facts.images.without_alt > 0 {
        recs.push(Recommendation::new(
            "Image Accessibility",
            Priority::Medium,
            format!("{} of {} images lack alt text", facts.images.without_alt, facts.images.total),
            "Add descriptive alt text to every meaningful image.",
            "Alt text lets AI understand visual content and improves accessibility",
        ));
    }

    let missing_files: Vec<&str> = [(facts.robots_txt, "robots.txt"), (facts.sitemap_xml, "sitemap.xml")]
        .into_iter()
        .filter(|(present, _)| !present)
        .map(|(_, name)| name)
        .collect();
    if !missing_files.is_empty() {
        recs.push(Recommendation::new(
            "Crawlability",
            Priority::Medium,
            format!("Missing {}", missing_files.join(" and ")),
            "Publish robots.txt and sitemap.xml at the site root so crawlers can discover every page.",
            "Crawlers find and index content faster",
        ));
    }

    if facts.canonical_tag.is_empty() || facts.html_lang.is_empty() {
        let mut missing = Vec::new();
        if facts.canonical_tag.is_empty() {
            missing.push("canonical tag");
        }
        if facts.html_lang.is_empty() {
            missing.push("HTML lang attribute");
        }
        recs.push(Recommendation::new(
            "Technical SEO",
            Priority::Low,
            format!("Missing {}", missing.join(" and ")),
            "Add a canonical link and declare the page language on the <html> element.",
            "Avoids duplicate-content confusion and tells AI which language to expect",
        ));
    }

    if facts.open_graph_tags.is_empty() && facts.twitter_card_tags.is_empty() {
        recs.push(Recommendation::new(
            "Social Media Tags",
            Priority::Low,
            "No Open Graph or Twitter Card tags",
            "Add og:title, og:description, og:image and twitter:card meta tags.",
            "Social metadata gives AI and link previews a consistent description",
        ));
    }

    if let Some(semantic) = breakdown.category("Semantic HTML")
        && semantic.earned * 2 < semantic.possible
    {
        recs.push(Recommendation::new(
            "Semantic HTML",
            Priority::Low,
            format!("Limited semantic markup ({})", semantic.details),
            "Wrap content in HTML5 elements such as main, article, section, nav and footer.",
            "Semantic elements tell AI which parts of the page are primary content",
        ));
    }

    recs
}

fn content_recommendations(content: &ContentFacts) -> Vec<Recommendation> {
    let mut recs = Vec::new();

    if let Some(ease) = content.readability.flesch_reading_ease
        && ease < READABILITY_TARGET
    {
        recs.push(Recommendation::new(
            "Readability",
            Priority::High,
            "Content is too complex for optimal AI processing",
            "Simplify sentences and use more common words. Aim for 8th-9th grade reading level.",
            "Improves AI comprehension and increases likelihood of content being used in responses",
        ));
    }

    let promo = &content.promotional_language;
    if promo.is_promotional {
        recs.push(Recommendation::new(
            "Content Tone",
            Priority::High,
            format!("High promotional language density ({}%)", promo.promotional_density),
            "Replace marketing terms with factual descriptions. Focus on features and benefits rather than superlatives.",
            "AI agents prefer factual content and may skip overly promotional material",
        ));
    }

    if !content.factual_content.is_fact_based {
        recs.push(Recommendation::new(
            "Factual Content",
            Priority::High,
            "Low factual content density",
            "Add statistics, research citations, and concrete examples. Include data points and measurable outcomes.",
            "Factual content is more likely to be cited by AI agents as authoritative",
        ));
    }

    if !content.answer_optimization.has_faq_section {
        recs.push(Recommendation::new(
            "Answer Structure",
            Priority::High,
            "No FAQ or Q&A section detected",
            "Create a comprehensive FAQ section with direct answers to common questions about your product/service.",
            "FAQ content is highly favored by AI for direct answer extraction",
        ));
    }

    if content.credibility.credibility_score < CREDIBILITY_TARGET {
        recs.push(Recommendation::new(
            "Authority Building",
            Priority::Medium,
            "Low credibility signals",
            "Add author bylines, expert quotes, and citations to authoritative sources. Link to credible external resources.",
            "Increases trust signals for AI evaluation",
        ));
    }

    if !content.content_structure.has_summary {
        recs.push(Recommendation::new(
            "Content Structure",
            Priority::Medium,
            "No summary or overview section",
            "Add a brief summary or key points section at the beginning of your content.",
            "Helps AI quickly understand and extract main points",
        ));
    }

    let brevity = content.brevity.brevity_score;
    if brevity < BREVITY_TARGET {
        recs.push(Recommendation::new(
            "Content Brevity",
            Priority::Medium,
            format!("Content lacks conciseness (score: {})", brevity),
            "Remove filler words, redundant phrases, and unnecessarily complex sentences.",
            "Concise content is easier for AI to process and extract",
        ));
    }

    if content.answer_optimization.list_usage.total() < MIN_LISTS {
        recs.push(Recommendation::new(
            "Content Formatting",
            Priority::Low,
            "Limited use of lists and structured content",
            "Use bullet points, numbered lists, and definition lists to organize information clearly.",
            "Lists are easily parsed by AI and improve content extraction",
        ));
    }

    recs
}

fn workflow(facts: &StructuralFacts, content: Option<&ContentFacts>) -> Workflow {
    let mut flow = Workflow::default();

    if facts.meta_description.is_empty() {
        flow.quick_wins.push(ActionItem::new(
            "Write a meta description",
            "Summarize the page in 150-160 characters inside <meta name=\"description\">.",
            "15 minutes",
            "High",
        ));
    }
    if facts.images.without_alt > 0 {
        flow.quick_wins.push(ActionItem::new(
            format!("Add alt text to {} images", facts.images.without_alt),
            "Describe what each image shows and why it matters to the page.",
            "30-60 minutes",
            "Medium",
        ));
    }
    if !facts.robots_txt {
        flow.quick_wins.push(ActionItem::new(
            "Publish robots.txt",
            "Serve a robots.txt at the site root with User-agent rules and a Sitemap line.",
            "15 minutes",
            "Medium",
        ));
    }
    if !facts.sitemap_xml {
        flow.quick_wins.push(ActionItem::new(
            "Publish sitemap.xml",
            "Generate an XML sitemap listing every indexable page and reference it from robots.txt.",
            "30 minutes",
            "Medium",
        ));
    }
    if !facts.llms_txt {
        flow.quick_wins.push(ActionItem::new(
            "Publish llms.txt",
            "Add an llms.txt at the site root that points AI agents at your most useful pages.",
            "30 minutes",
            "Low",
        ));
    }
    if let Some(content) = content
        && !content.credibility.has_author_info
    {
        flow.quick_wins.push(ActionItem::new(
            "Add author information",
            "Show a byline with the author's name and credentials on the page.",
            "30 minutes",
            "Medium",
        ));
    }

    if !facts.structured_data {
        flow.deep_optimizations.push(ActionItem::new(
            "Implement structured data",
            "Describe the organization, articles and FAQs with JSON-LD using schema.org types.",
            "1-2 days",
            "High",
        ));
    }
    if let Some(content) = content {
        if !content.answer_optimization.has_faq_section {
            flow.deep_optimizations.push(ActionItem::new(
                "Build an FAQ section",
                "Collect real customer questions and answer each one directly in the first sentence.",
                "1-3 days",
                "High",
            ));
        }
        if content.promotional_language.is_promotional {
            flow.deep_optimizations.push(ActionItem::new(
                "Rewrite promotional copy",
                "Replace superlatives and marketing claims with specific, verifiable statements.",
                "2-5 days",
                "High",
            ));
        }
        if !content.factual_content.is_fact_based {
            flow.deep_optimizations.push(ActionItem::new(
                "Add factual content",
                "Back claims with statistics, research findings and cited sources.",
                "2-5 days",
                "High",
            ));
        }
    }

    flow.strategic_initiatives.push(ActionItem::new(
        "Build topical authority",
        "Publish a cluster of in-depth pages that cover your core topic from every angle and link to each other.",
        "1-3 months",
        "High",
    ));
    flow.strategic_initiatives.push(ActionItem::new(
        "Align with knowledge graphs",
        "Use consistent entity names and link them to Wikidata and other public knowledge bases with sameAs.",
        "1-2 months",
        "Medium",
    ));
    if !content.is_some_and(wikipedia_ready) {
        flow.strategic_initiatives.push(ActionItem::new(
            "Develop Wikipedia-style content",
            "Write neutral, well-cited reference content that states facts without marketing language.",
            "2-3 months",
            "High",
        ));
    }
    if !(facts.schemas.qa_schema && facts.schemas.organization_schema) {
        flow.strategic_initiatives.push(ActionItem::new(
            "Adopt advanced schema markup",
            "Model products, people, FAQs and how-tos with nested schema.org types across the site.",
            "1-2 months",
            "Medium",
        ));
    }

    flow
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::classify::{ClassifierConfig, classify};
    use crate::parse::Document;
    use crate::scoring::{ScoringConfig, score};
    use crate::structure::{SiteFiles, analyze_structure};

    fn run(html: &str, files: SiteFiles, with_content: bool) -> (Vec<Recommendation>, Workflow) {
        let doc = Document::parse(html);
        let structure = analyze_structure(&doc, "https://example.com/", files);
        let content = with_content.then(|| classify(&doc, &ClassifierConfig::default()));
        let breakdown = score(&structure, content.as_ref(), &ScoringConfig::default());
        recommend(&structure, content.as_ref(), &breakdown)
    }

    fn categories(recs: &[Recommendation]) -> Vec<&str> {
        recs.iter().map(|r| r.category.as_str()).collect()
    }

    #[test]
    fn test_bare_page_gets_full_set() {
        let (recs, flow) = run("<p>Hi</p>", SiteFiles::default(), true);
        let cats = categories(&recs);
        for expected in [
            "Meta Description",
            "Heading Structure",
            "Structured Data",
            "Crawlability",
            "Factual Content",
            "Answer Structure",
            "Authority Building",
            "Content Structure",
            "Content Formatting",
        ] {
            assert!(cats.contains(&expected), "missing {expected}");
        }
        assert!(!cats.contains(&"Readability"));
        assert!(!cats.contains(&"Content Tone"));
        assert_eq!(flow.strategic_initiatives.len(), 4);
        assert!(flow.deep_optimizations.iter().any(|i| i.title == "Build an FAQ section"));
    }

    #[test]
    fn test_technical_only_skips_content_rules() {
        let (recs, flow) = run("<p>Hi</p>", SiteFiles::default(), false);
        assert!(!categories(&recs).contains(&"Answer Structure"));
        assert!(!flow.quick_wins.iter().any(|i| i.title == "Add author information"));
        assert!(!flow.is_empty());
    }

    #[test]
    fn test_site_files_present() {
        let files = SiteFiles { robots_txt: true, sitemap_xml: true, llms_txt: true };
        let (recs, flow) = run("<p>Hi</p>", files, false);
        assert!(!categories(&recs).contains(&"Crawlability"));
        assert!(!flow.quick_wins.iter().any(|i| i.title.starts_with("Publish")));
    }

    #[test]
    fn test_promotional_page() {
        let html = "<p>The best, leading, top, premier, finest, greatest product. Best best best.</p>";
        let (recs, flow) = run(html, SiteFiles::default(), true);
        let tone = recs.iter().find(|r| r.category == "Content Tone").unwrap();
        assert_eq!(tone.priority, Priority::High);
        assert!(tone.issue.starts_with("High promotional language density ("));
        assert!(flow.deep_optimizations.iter().any(|i| i.title == "Rewrite promotional copy"));
    }

    #[test]
    fn test_wikipedia_ready_drops_neutral_content_item() {
        let html = r#"
            <p>According to the survey, research shows 12% growth in 2020 and 14% in 2021.
            Studies indicate 3 causes; data reveals 4 trends and 5 outliers.</p>
            <a href="https://en.wikipedia.org/wiki/Growth">Growth</a>
        "#;
        let doc = Document::parse(html);
        let content = classify(&doc, &ClassifierConfig::default());
        assert!(wikipedia_ready(&content));

        let (_, flow) = run(html, SiteFiles::default(), true);
        assert!(!flow.strategic_initiatives.iter().any(|i| i.title == "Develop Wikipedia-style content"));
        assert!(flow.strategic_initiatives.iter().any(|i| i.title == "Build topical authority"));
    }

    #[test]
    fn test_priority_display() {
        assert_eq!(Priority::Medium.to_string(), "Medium");
        assert_eq!(serde_json::to_string(&Priority::High).unwrap(), "\"High\"");
    }
}
