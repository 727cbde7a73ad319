//! Scores how discoverable a web page is to AI summarization and crawling
//! agents.
//!
//! Raw HTML goes in; structural and content facts, a weighted 0 to 100 score
//! with a per-category breakdown, and prioritized recommendations come out.
//!
//! ```rust
//! use aiscout_core::Analyzer;
//!
//! let html = "<html lang=\"en\"><head><title>FAQ</title></head><body><h1>FAQ</h1></body></html>";
//! let analyzer = Analyzer::new();
//! let report = analyzer.report(analyzer.analyze(html, "https://example.com/faq"));
//! println!("{}/100", report.score.final_score);
//! ```

pub mod advisor;
pub mod analyzer;
pub mod classify;
pub mod config;
pub mod error;
pub mod fetch;
pub mod formatters;
pub mod lexicon;
pub mod parse;
pub mod probe;
pub mod reading_ease;
pub mod recommend;
pub mod scoring;
pub mod strategy;
pub mod structure;
pub mod text;

pub use advisor::{Advisor, StaticAdvisor, advisory_or_fallback, facts_summary, fallback_advisory};
#[cfg(feature = "fetch")]
pub use advisor::AnthropicAdvisor;
pub use analyzer::{Analyzer, AnalyzerConfig, AnalyzerConfigBuilder, PageAnalysis, Report, analyze, score};
#[cfg(feature = "fetch")]
pub use analyzer::{fetch_and_report, fetch_and_report_with_config};
pub use classify::{ClassifierConfig, ContentFacts, classify};
pub use config::{ConfigFile, ConfigLoader, ConfigLoaderBuilder};
pub use error::{AiscoutError, Result};
pub use fetch::{FetchConfig, Source, fetch_file, fetch_stdin};
#[cfg(feature = "fetch")]
pub use fetch::{fetch_source, fetch_url};
pub use formatters::{JsonConfig, MarkdownConfig, TextConfig, report_to_json, report_to_markdown, report_to_text};
pub use parse::Document;
#[cfg(feature = "fetch")]
pub use probe::{HttpProbe, ProbeConfig, discover_site_files};
pub use probe::{ProbeResponse, SiteProbe};
pub use reading_ease::{ReadabilityBackend, ReadabilityFacts};
pub use recommend::{ActionItem, Priority, Recommendation, Workflow, recommend};
pub use scoring::{CategoryScore, Penalty, ScoreBreakdown, ScoringConfig, ScoringScheme};
pub use strategy::{
    ComparisonEntry, ComparisonOutcome, RewritePlan, RewriteReport, StrategicAnalysis, rewrites_or_fallback,
    strategy_or_derived,
};
pub use structure::{SiteFiles, StructuralFacts, analyze_structure};
pub use text::TextMode;
