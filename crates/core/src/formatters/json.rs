use serde::Serialize;

use crate::Result;
use crate::analyzer::Report;
use crate::scoring::ScoreBreakdown;
use crate::strategy::{ComparisonEntry, RewriteReport};

/// Configuration for JSON output
#[derive(Debug, Clone, Default)]
pub struct JsonConfig {
    /// Pretty print JSON output
    pub pretty: bool,
    /// Emit only the score breakdown instead of the whole report
    pub score_only: bool,
}

/// JSON formatter for reports
pub struct JsonFormatter {
    config: JsonConfig,
}

impl JsonFormatter {
    pub fn new(config: JsonConfig) -> Self {
        Self { config }
    }

    pub fn format(&self, report: &Report) -> Result<String> {
        if self.config.score_only {
            score_to_json(&report.score, self.config.pretty)
        } else {
            report_to_json(report, self.config.pretty)
        }
    }

    /// Comparisons are written as `{"results": [...]}`.
    pub fn format_comparison(&self, entries: &[ComparisonEntry]) -> Result<String> {
        comparison_to_json(entries, self.config.pretty)
    }

    pub fn format_rewrites(&self, report: &RewriteReport) -> Result<String> {
        to_json(report, self.config.pretty)
    }
}

/// Serializes a whole report.
///
/// # Example
///
/// ```rust
/// use aiscout_core::Analyzer;
/// use aiscout_core::formatters::report_to_json;
///
/// let analyzer = Analyzer::new();
/// let report = analyzer.report(analyzer.analyze("<p>Hi</p>", "https://example.com"));
/// let json = report_to_json(&report, false).unwrap();
/// assert!(json.starts_with("{\"url\":\"https://example.com\""));
/// ```
pub fn report_to_json(report: &Report, pretty: bool) -> Result<String> {
    to_json(report, pretty)
}

/// Serializes just the score breakdown.
pub fn score_to_json(score: &ScoreBreakdown, pretty: bool) -> Result<String> {
    to_json(score, pretty)
}

#[derive(Serialize)]
struct Comparison<'a> {
    results: &'a [ComparisonEntry],
}

/// Serializes comparison entries under a `results` key.
pub fn comparison_to_json(entries: &[ComparisonEntry], pretty: bool) -> Result<String> {
    to_json(&Comparison { results: entries }, pretty)
}

fn to_json<T: Serialize>(value: &T, pretty: bool) -> Result<String> {
    if pretty { Ok(serde_json::to_string_pretty(value)?) } else { Ok(serde_json::to_string(value)?) }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::Analyzer;

    fn report() -> Report {
        let analyzer = Analyzer::new();
        analyzer.report(analyzer.analyze(
            "<html lang=\"en\"><head><title>T</title></head><body><h1>T</h1><p>Body text.</p></body></html>",
            "https://example.com/t",
        ))
    }

    #[test]
    fn test_report_reads_back() {
        let report = report();
        let json = report_to_json(&report, false).unwrap();
        let back: Report = serde_json::from_str(&json).unwrap();
        assert_eq!(back.url, report.url);
        assert_eq!(back.score, report.score);
        assert_eq!(back.recommendations, report.recommendations);
    }

    #[test]
    fn test_pretty_output() {
        let json = report_to_json(&report(), true).unwrap();
        assert!(json.contains("\n  \"url\": \"https://example.com/t\""));
    }

    #[test]
    fn test_score_only() {
        let formatter = JsonFormatter::new(JsonConfig { pretty: false, score_only: true });
        let value: serde_json::Value = serde_json::from_str(&formatter.format(&report()).unwrap()).unwrap();
        assert_eq!(value["scheme"], "combined");
        assert_eq!(value["total_possible"], 100);
        assert!(value.get("url").is_none());
    }

    #[test]
    fn test_comparison_results() {
        let entries = vec![ComparisonEntry {
            url: "missing.html".to_string(),
            domain: String::new(),
            outcome: crate::strategy::ComparisonOutcome::Failed { error: "File not found: missing.html".to_string() },
        }];
        let json = comparison_to_json(&entries, false).unwrap();
        assert!(json.starts_with(r#"{"results":[{"url":"missing.html","domain":"","status":"failed","#));
        assert!(json.ends_with(r#""error":"File not found: missing.html"}]}"#));
    }

    #[test]
    fn test_penalties_listed_with_flags() {
        let value: serde_json::Value = serde_json::from_str(&report_to_json(&report(), false).unwrap()).unwrap();
        let penalties = value["score"]["penalties"].as_array().unwrap();
        assert_eq!(penalties.len(), 6);
        assert!(penalties.iter().all(|p| p.get("applied").is_some()));
    }
}
