use crate::analyzer::Report;
use crate::formatters::with_priority;
use crate::recommend::{ActionItem, Priority};
use crate::strategy::{ComparisonEntry, ComparisonOutcome, RewriteReport, StrategicAnalysis};

/// Configuration for plain text output
#[derive(Debug, Clone)]
pub struct TextConfig {
    /// Wrap prose lines at specified width (0 = no wrapping)
    pub line_width: usize,

    /// Include the advisory section
    pub include_advisory: bool,
}

impl Default for TextConfig {
    fn default() -> Self {
        Self { line_width: 0, include_advisory: true }
    }
}

/// Plain text formatter for reports
pub struct TextFormatter {
    config: TextConfig,
}

impl TextFormatter {
    pub fn new(config: TextConfig) -> Self {
        Self { config }
    }

    pub fn format(&self, report: &Report) -> String {
        report_to_text(report, &self.config)
    }

    pub fn format_comparison(&self, entries: &[ComparisonEntry]) -> String {
        comparison_to_text(entries, &self.config)
    }

    pub fn format_rewrites(&self, report: &RewriteReport) -> String {
        rewrites_to_text(report, &self.config)
    }
}

/// Renders a report for a terminal.
pub fn report_to_text(report: &Report, config: &TextConfig) -> String {
    let mut out = String::new();
    let score = &report.score;
    let width = config.line_width;

    let heading = format!("AI Discoverability Score: {}/100", score.final_score);
    out.push_str(&format!("{}\n{}\n", heading, "=".repeat(heading.chars().count())));
    out.push_str(&format!("URL: {}\n", report.url));
    out.push_str(&format!("Title: {}\n", report.structure.title));
    out.push_str(&format!(
        "Points: {} earned, {} penalties, {} of {}\n",
        score.total_earned, score.total_penalties, score.raw_score, score.total_possible
    ));

    let name_width = score.categories.iter().map(|c| c.name.chars().count()).max().unwrap_or(0);
    out.push_str("\nBreakdown\n");
    for category in &score.categories {
        let points = format!("{}/{}", category.earned, category.possible);
        out.push_str(&format!("  {:<name_width$}  {:>5}  {}\n", category.name, points, category.details));
    }

    let applied: Vec<_> = score.applied_penalties().collect();
    if !applied.is_empty() {
        out.push_str("\nPenalties\n");
        for penalty in applied {
            out.push_str(&format!("  {:>3}  {}\n", penalty.points, penalty.name));
        }
    }

    if !report.recommendations.is_empty() {
        out.push_str("\nRecommendations\n");
        for priority in [Priority::High, Priority::Medium, Priority::Low] {
            for rec in with_priority(&report.recommendations, priority) {
                out.push_str(&format!("  [{}] {}: {}\n", priority, rec.category, rec.issue));
                out.push_str(&format!("{}\n", indent(&wrap_text(&rec.action, width), "      ")));
            }
        }
    }

    write_items(&mut out, "Quick Wins", &report.workflow.quick_wins, width);
    write_items(&mut out, "Deep Optimizations", &report.workflow.deep_optimizations, width);
    write_items(&mut out, "Strategic Initiatives", &report.workflow.strategic_initiatives, width);

    if config.include_advisory && !report.advisory.trim().is_empty() {
        out.push_str("\nAdvisory\n\n");
        out.push_str(&format!("{}\n", wrap_text(report.advisory.trim(), width)));
    }

    out.trim_end().to_string()
}

/// Renders a comparison, one block per page in input order.
pub fn comparison_to_text(entries: &[ComparisonEntry], config: &TextConfig) -> String {
    let mut out = String::new();
    let heading = format!("Competitive Analysis: {} pages", entries.len());
    out.push_str(&format!("{}\n{}\n", heading, "=".repeat(heading.chars().count())));

    for entry in entries {
        out.push('\n');
        match &entry.outcome {
            ComparisonOutcome::Analyzed { score, analysis, content_preview } => {
                out.push_str(&format!("{}  {}/100\n", entry.url, score));
                write_strategy(&mut out, analysis, config.line_width);
                if !content_preview.is_empty() {
                    out.push_str("  Preview:\n");
                    out.push_str(&format!("{}\n", indent(&wrap_text(content_preview, config.line_width), "      ")));
                }
            }
            ComparisonOutcome::Failed { error } => {
                out.push_str(&format!("{}  failed\n", entry.url));
                out.push_str(&format!("  Error: {}\n", error));
            }
        }
    }

    out.trim_end().to_string()
}

/// Renders a page's strategic analysis followed by its rewrites.
pub fn rewrites_to_text(report: &RewriteReport, config: &TextConfig) -> String {
    let mut out = String::new();
    let width = config.line_width;

    let heading = format!("Content Rewrites: {}", report.url);
    out.push_str(&format!("{}\n{}\n", heading, "=".repeat(heading.chars().count())));
    out.push_str(&format!("Score: {}/100\n", report.strategic_analysis.ai_optimization_score));
    write_strategy(&mut out, &report.strategic_analysis, width);

    out.push_str("\nStrategy\n");
    out.push_str(&format!("{}\n", indent(&wrap_text(&report.rewrites.overall_strategy, width), "  ")));

    for (i, rewrite) in report.rewrites.rewrites.iter().enumerate() {
        out.push_str(&format!("\n{}. {} ({} impact)\n", i + 1, rewrite.section, rewrite.impact));
        out.push_str("  Before:\n");
        out.push_str(&format!("{}\n", indent(&wrap_text(&rewrite.original, width), "      ")));
        out.push_str("  After:\n");
        out.push_str(&format!("{}\n", indent(&wrap_text(&rewrite.rewritten, width), "      ")));
        out.push_str("  Why:\n");
        out.push_str(&format!("{}\n", indent(&wrap_text(&rewrite.reasoning, width), "      ")));
    }

    out.trim_end().to_string()
}

fn write_strategy(out: &mut String, analysis: &StrategicAnalysis, width: usize) {
    let positioning = &analysis.strategic_positioning;
    out.push_str(&format!(
        "  Tone: {} ({}% promotional), {} audience, {}\n",
        positioning.current_tone,
        positioning.promotional_percentage,
        positioning.audience_level,
        positioning.narrative_focus
    ));

    let gaps = analysis.content_gaps.weakest();
    if !gaps.is_empty() {
        let gaps: Vec<_> = gaps.iter().map(|(name, score)| format!("{} {}", name, score)).collect();
        out.push_str(&format!("  Gaps: {}\n", gaps.join(", ")));
    }
    if !analysis.competitive_strengths.is_empty() {
        out.push_str(&format!("  Strengths: {}\n", analysis.competitive_strengths.join(", ")));
    }
    for rec in &analysis.strategic_recommendations {
        out.push_str(&format!("  [{}] {} ({})\n", rec.priority, rec.category, rec.timeline));
        out.push_str(&format!("{}\n", indent(&wrap_text(&rec.recommendation, width), "      ")));
    }
}

fn write_items(out: &mut String, heading: &str, items: &[ActionItem], width: usize) {
    if items.is_empty() {
        return;
    }
    out.push_str(&format!("\n{}\n", heading));
    for item in items {
        out.push_str(&format!("  - {} ({} effort, {} impact)\n", item.title, item.effort, item.impact));
        out.push_str(&format!("{}\n", indent(&wrap_text(&item.description, width), "      ")));
    }
}

fn indent(text: &str, prefix: &str) -> String {
    text.lines().map(|line| format!("{}{}", prefix, line)).collect::<Vec<_>>().join("\n")
}

/// Wraps each line of `text` to `width` columns, keeping line breaks.
fn wrap_text(text: &str, width: usize) -> String {
    if width == 0 {
        return text.to_string();
    }

    text.lines()
        .map(|line| {
            let lead = &line[..line.len() - line.trim_start().len()];
            let words: Vec<&str> = line.split_whitespace().collect();
            if words.is_empty() { String::new() } else { wrap_words(&words, width, lead) }
        })
        .collect::<Vec<_>>()
        .join("\n")
}

/// Wraps words to `width`, repeating `lead` on every line.
fn wrap_words(words: &[&str], width: usize, lead: &str) -> String {
    let mut lines = Vec::new();
    let mut current_line = Vec::new();
    let mut current_length = lead.chars().count();

    for &word in words {
        let word_len = word.chars().count();

        if current_line.is_empty() {
            current_line.push(word);
            current_length += word_len;
        } else if current_length + 1 + word_len <= width {
            current_length += 1 + word_len;
            current_line.push(word);
        } else {
            lines.push(format!("{}{}", lead, current_line.join(" ")));
            current_line = vec![word];
            current_length = lead.chars().count() + word_len;
        }
    }

    if !current_line.is_empty() {
        lines.push(format!("{}{}", lead, current_line.join(" ")));
    }

    lines.join("\n")
}
