//! Main analysis API.
//!
//! [`Analyzer`] ties the passes together: parse once, run the structural
//! and content passes, score, recommend and attach advice. The free
//! functions [`analyze`] and [`score`] cover the common one-liners.
//!
//! # Example
//!
//! ```rust
//! use aiscout_core::analyzer::{Analyzer, analyze};
//!
//! let html = "<html lang=\"en\"><head><title>Guide</title></head><body><h1>Guide</h1></body></html>";
//! let analysis = analyze(html, "https://example.com/guide");
//! assert_eq!(analysis.structure.title, "Guide");
//!
//! let report = Analyzer::new().report(analysis);
//! assert!(report.score.final_score <= 100);
//! ```

use serde::{Deserialize, Serialize};

use crate::advisor::{Advisor, advisory_or_fallback, facts_summary, fallback_advisory};
use crate::classify::{ClassifierConfig, ContentFacts, classify};
use crate::fetch::FetchConfig;
use crate::parse::Document;
use crate::reading_ease::ReadabilityBackend;
use crate::recommend::{Recommendation, Workflow, recommend};
use crate::scoring::{ScoreBreakdown, ScoringConfig};
use crate::strategy::StrategicAnalysis;
use crate::structure::{SiteFiles, StructuralFacts, analyze_structure};
use crate::text::{TextMode, extract_text};
#[cfg(feature = "fetch")]
use crate::{
    Result,
    fetch::fetch_source,
    probe::{HttpProbe, ProbeConfig, discover_site_files},
    strategy::{
        ComparisonEntry, ComparisonOutcome, RewriteReport, content_preview, domain_of, rewrites_or_fallback,
        strategy_or_derived,
    },
};

/// Configuration for an [`Analyzer`].
///
/// # Example
///
/// ```rust
/// use aiscout_core::AnalyzerConfig;
///
/// let config = AnalyzerConfig::builder()
///     .ideal_sentence_length(15.0)
///     .probe_site_files(false)
///     .timeout(10)
///     .build();
/// assert_eq!(config.fetch.timeout, 10);
/// ```
#[derive(Debug, Clone, PartialEq)]
pub struct AnalyzerConfig {
    /// Content pass settings.
    pub classifier: ClassifierConfig,

    /// Point values and penalties.
    pub scoring: ScoringConfig,

    /// Whether to run the content pass (default: true). Without it the
    /// technical-only scheme is used.
    pub content_analysis: bool,

    /// Whether to probe for robots.txt, sitemap.xml and llms.txt (default: true).
    pub probe_site_files: bool,

    /// Page fetch settings.
    pub fetch: FetchConfig,

    /// Per-probe timeout in seconds (default: 5).
    pub probe_timeout: u64,
}

impl Default for AnalyzerConfig {
    fn default() -> Self {
        Self {
            classifier: ClassifierConfig::default(),
            scoring: ScoringConfig::default(),
            content_analysis: true,
            probe_site_files: true,
            fetch: FetchConfig::default(),
            probe_timeout: 5,
        }
    }
}

impl AnalyzerConfig {
    pub fn builder() -> AnalyzerConfigBuilder {
        AnalyzerConfigBuilder::new()
    }
}

/// Builder for [`AnalyzerConfig`].
#[derive(Debug, Default)]
pub struct AnalyzerConfigBuilder {
    config: AnalyzerConfig,
}

impl AnalyzerConfigBuilder {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn text_mode(mut self, mode: TextMode) -> Self {
        self.config.classifier.text_mode = mode;
        self
    }

    pub fn max_text_chars(mut self, value: usize) -> Self {
        self.config.classifier.max_text_chars = value;
        self
    }

    pub fn ideal_sentence_length(mut self, value: f64) -> Self {
        self.config.classifier.ideal_sentence_length = value;
        self
    }

    pub fn readability(mut self, backend: ReadabilityBackend) -> Self {
        self.config.classifier.readability = backend;
        self
    }

    pub fn classifier(mut self, config: ClassifierConfig) -> Self {
        self.config.classifier = config;
        self
    }

    pub fn scoring(mut self, config: ScoringConfig) -> Self {
        self.config.scoring = config;
        self
    }

    pub fn content_analysis(mut self, value: bool) -> Self {
        self.config.content_analysis = value;
        self
    }

    pub fn probe_site_files(mut self, value: bool) -> Self {
        self.config.probe_site_files = value;
        self
    }

    /// Page fetch timeout in seconds.
    pub fn timeout(mut self, seconds: u64) -> Self {
        self.config.fetch.timeout = seconds;
        self
    }

    pub fn user_agent(mut self, user_agent: impl Into<String>) -> Self {
        self.config.fetch.user_agent = user_agent.into();
        self
    }

    pub fn probe_timeout(mut self, seconds: u64) -> Self {
        self.config.probe_timeout = seconds;
        self
    }

    pub fn build(self) -> AnalyzerConfig {
        self.config
    }
}

/// Facts gathered from one page.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PageAnalysis {
    pub structure: StructuralFacts,
    /// `None` when the content pass was skipped.
    pub content: Option<ContentFacts>,
}

/// Everything produced for one page.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Report {
    pub url: String,
    pub structure: StructuralFacts,
    pub content: Option<ContentFacts>,
    pub score: ScoreBreakdown,
    pub recommendations: Vec<Recommendation>,
    pub workflow: Workflow,
    pub advisory: String,
    /// RFC 3339 time the report was stored, set by the server.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub timestamp: Option<String>,
}

/// Analyzes pages and assembles reports.
///
/// Holds only configuration, so one instance can be shared across threads.
#[derive(Debug, Clone, Default)]
pub struct Analyzer {
    config: AnalyzerConfig,
}

impl Analyzer {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_config(config: AnalyzerConfig) -> Self {
        Self { config }
    }

    pub fn config(&self) -> &AnalyzerConfig {
        &self.config
    }

    /// Analyzes a page with every site file treated as absent.
    pub fn analyze(&self, html: &str, url: &str) -> PageAnalysis {
        self.analyze_with_site_files(html, url, SiteFiles::default())
    }

    /// Analyzes a page using already-known site file results.
    ///
    /// # Example
    ///
    /// ```rust
    /// use aiscout_core::Analyzer;
    /// use aiscout_core::structure::SiteFiles;
    ///
    /// let files = SiteFiles { robots_txt: true, sitemap_xml: true, llms_txt: false };
    /// let analysis = Analyzer::new().analyze_with_site_files("<p>Hi</p>", "https://example.com", files);
    /// assert!(analysis.structure.robots_txt);
    /// assert!(analysis.content.is_some());
    /// ```
    pub fn analyze_with_site_files(&self, html: &str, url: &str, site_files: SiteFiles) -> PageAnalysis {
        let doc = Document::parse_with_url(html, url);
        let structure = analyze_structure(&doc, url, site_files);
        let content = self.config.content_analysis.then(|| classify(&doc, &self.config.classifier));
        tracing::debug!(url, content = content.is_some(), "page analyzed");
        PageAnalysis { structure, content }
    }

    /// Scores an analysis with this analyzer's weights.
    pub fn score(&self, analysis: &PageAnalysis) -> ScoreBreakdown {
        crate::scoring::score(&analysis.structure, analysis.content.as_ref(), &self.config.scoring)
    }

    /// Builds a report with the static advisory text.
    pub fn report(&self, analysis: PageAnalysis) -> Report {
        self.assemble(analysis, fallback_advisory())
    }

    /// Builds a report, asking `advisor` for the advisory text.
    pub async fn report_with_advisor<A: Advisor + Sync>(&self, analysis: PageAnalysis, advisor: Option<&A>) -> Report {
        let summary = facts_summary(&analysis.structure, analysis.content.as_ref());
        let advisory = advisory_or_fallback(advisor, &summary).await;
        self.assemble(analysis, advisory)
    }

    /// Derives a strategic analysis of a page. The content pass always runs
    /// here; the score still follows `content_analysis`.
    pub fn strategic_analysis(&self, html: &str, url: &str, site_files: SiteFiles) -> StrategicAnalysis {
        self.assess(html, url, site_files).0
    }

    /// The derived analysis and the page text it was read from.
    fn assess(&self, html: &str, url: &str, site_files: SiteFiles) -> (StrategicAnalysis, String) {
        let doc = Document::parse_with_url(html, url);
        let structure = analyze_structure(&doc, url, site_files);
        let content = classify(&doc, &self.config.classifier);
        let score =
            crate::scoring::score(&structure, self.config.content_analysis.then_some(&content), &self.config.scoring);
        (StrategicAnalysis::derive(&content, &score), extract_text(&doc, TextMode::Content))
    }

    fn assemble(&self, analysis: PageAnalysis, advisory: String) -> Report {
        let score = self.score(&analysis);
        let (recommendations, workflow) = recommend(&analysis.structure, analysis.content.as_ref(), &score);
        tracing::info!(
            url = %analysis.structure.url,
            score = score.final_score,
            recommendations = recommendations.len(),
            "report ready"
        );
        Report {
            url: analysis.structure.url.clone(),
            structure: analysis.structure,
            content: analysis.content,
            score,
            recommendations,
            workflow,
            advisory,
            timestamp: None,
        }
    }

    /// Fetches `input` (URL, `file://`, path or `-`), probes its site files
    /// and builds a report with the static advisory text.
    ///
    /// # Errors
    ///
    /// Returns an error if the page cannot be fetched or read. Probe
    /// failures are not errors.
    #[cfg(feature = "fetch")]
    pub async fn fetch_and_report(&self, input: &str) -> Result<Report> {
        let analysis = self.fetch_and_analyze(input).await?;
        Ok(self.report(analysis))
    }

    /// Like [`Analyzer::fetch_and_report`], asking `advisor` for advice.
    #[cfg(feature = "fetch")]
    pub async fn fetch_and_report_with_advisor<A: Advisor + Sync>(
        &self, input: &str, advisor: Option<&A>,
    ) -> Result<Report> {
        let analysis = self.fetch_and_analyze(input).await?;
        Ok(self.report_with_advisor(analysis, advisor).await)
    }

    /// Fetches and analyzes without scoring.
    #[cfg(feature = "fetch")]
    pub async fn fetch_and_analyze(&self, input: &str) -> Result<PageAnalysis> {
        let page = self.fetch_page(input).await?;
        Ok(self.analyze_with_site_files(&page.html, &page.url, page.site_files))
    }

    /// Fetches each input and compares the pages strategically.
    ///
    /// Blank inputs are skipped. Pages are fetched one after another; one
    /// that fails becomes a [`ComparisonOutcome::Failed`] entry and the rest
    /// still run. `advisor`, when given, is asked for each page's analysis.
    #[cfg(feature = "fetch")]
    pub async fn compare<S: AsRef<str>, A: Advisor>(
        &self, inputs: &[S], advisor: Option<&A>,
    ) -> Vec<ComparisonEntry> {
        let mut entries = Vec::new();

        for input in inputs.iter().map(|i| i.as_ref().trim()).filter(|i| !i.is_empty()) {
            let outcome = match self.fetch_page(input).await {
                Ok(page) => {
                    let (derived, text) = self.assess(&page.html, &page.url, page.site_files);
                    let score = derived.ai_optimization_score;
                    let analysis = strategy_or_derived(advisor, &page.url, &text, derived).await;
                    ComparisonOutcome::Analyzed { score, analysis, content_preview: content_preview(&text) }
                }
                Err(e) => {
                    tracing::warn!(input, error = %e, "comparison page failed");
                    ComparisonOutcome::Failed { error: e.to_string() }
                }
            };
            entries.push(ComparisonEntry { url: input.to_string(), domain: domain_of(input), outcome });
        }

        tracing::info!(pages = entries.len(), "comparison ready");
        entries
    }

    /// Fetches `input` and suggests rewrites for its weakest areas.
    ///
    /// # Errors
    ///
    /// Returns an error if the page cannot be fetched or read. Advisor
    /// failures fall back; see [`rewrites_or_fallback`].
    #[cfg(feature = "fetch")]
    pub async fn rewrites<A: Advisor>(&self, input: &str, advisor: Option<&A>) -> Result<RewriteReport> {
        let page = self.fetch_page(input).await?;
        let (derived, text) = self.assess(&page.html, &page.url, page.site_files);
        let strategic_analysis = strategy_or_derived(advisor, &page.url, &text, derived).await;
        let rewrites = rewrites_or_fallback(advisor, &text, &strategic_analysis.content_gaps).await;
        Ok(RewriteReport { url: page.url, strategic_analysis, rewrites })
    }

    #[cfg(feature = "fetch")]
    async fn fetch_page(&self, input: &str) -> Result<FetchedPage> {
        let (source, html) = fetch_source(input, &self.config.fetch).await?;
        let url = source.page_url();

        let site_files = if self.config.probe_site_files {
            let probe = HttpProbe::new(&ProbeConfig {
                timeout: self.config.probe_timeout,
                user_agent: self.config.fetch.user_agent.clone(),
            })?;
            discover_site_files(&probe, &url).await
        } else {
            SiteFiles::default()
        };

        Ok(FetchedPage { url, html, site_files })
    }
}

#[cfg(feature = "fetch")]
struct FetchedPage {
    url: String,
    html: String,
    site_files: SiteFiles,
}

/// Analyzes a page with default settings and no site file results.
pub fn analyze(html: &str, url: &str) -> PageAnalysis {
    Analyzer::new().analyze(html, url)
}

/// Scores facts with explicit weights. See [`crate::scoring::score`].
pub fn score(structure: &StructuralFacts, content: Option<&ContentFacts>, config: &ScoringConfig) -> ScoreBreakdown {
    crate::scoring::score(structure, content, config)
}

/// Fetches and reports with default settings.
///
/// # Example
///
/// ```no_run
/// use aiscout_core::fetch_and_report;
///
/// #[tokio::main]
/// async fn main() -> Result<(), Box<dyn std::error::Error>> {
///     let report = fetch_and_report("https://example.com").await?;
///     println!("{}: {}/100", report.url, report.score.final_score);
///     Ok(())
/// }
/// ```
#[cfg(feature = "fetch")]
pub async fn fetch_and_report(input: &str) -> Result<Report> {
    Analyzer::new().fetch_and_report(input).await
}

/// Fetches and reports with custom settings.
#[cfg(feature = "fetch")]
pub async fn fetch_and_report_with_config(input: &str, config: &AnalyzerConfig) -> Result<Report> {
    Analyzer::with_config(config.clone()).fetch_and_report(input).await
}
