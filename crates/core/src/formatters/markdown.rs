use crate::analyzer::Report;
use crate::formatters::with_priority;
use crate::recommend::{ActionItem, Priority};
use crate::strategy::{ComparisonEntry, ComparisonOutcome, RewriteReport, StrategicAnalysis};

/// Configuration for Markdown output
#[derive(Debug, Clone)]
pub struct MarkdownConfig {
    /// Include TOML frontmatter with url and score
    pub include_frontmatter: bool,
    /// Include the advisory section
    pub include_advisory: bool,
}

impl Default for MarkdownConfig {
    fn default() -> Self {
        Self { include_frontmatter: false, include_advisory: true }
    }
}

/// Markdown formatter for reports
pub struct MarkdownFormatter {
    config: MarkdownConfig,
}

impl MarkdownFormatter {
    pub fn new(config: MarkdownConfig) -> Self {
        Self { config }
    }

    pub fn format(&self, report: &Report) -> String {
        report_to_markdown(report, &self.config)
    }

    pub fn format_comparison(&self, entries: &[ComparisonEntry]) -> String {
        comparison_to_markdown(entries)
    }

    pub fn format_rewrites(&self, report: &RewriteReport) -> String {
        rewrites_to_markdown(report)
    }
}

/// Renders a report as a Markdown document.
pub fn report_to_markdown(report: &Report, config: &MarkdownConfig) -> String {
    let mut out = String::new();
    let score = &report.score;

    if config.include_frontmatter {
        out.push_str(&generate_frontmatter(report));
        out.push('\n');
    }

    out.push_str("# AI Discoverability Report\n\n");
    out.push_str(&format!("**URL:** {}  \n", report.url));
    out.push_str(&format!("**Title:** {}  \n", report.structure.title));
    out.push_str(&format!("**Score:** {}/100\n\n", score.final_score));

    out.push_str("## Score Breakdown\n\n");
    out.push_str("| Category | Points | Details |\n");
    out.push_str("|---|---|---|\n");
    for category in &score.categories {
        out.push_str(&format!(
            "| {} | {}/{} | {} |\n",
            cell(&category.name),
            category.earned,
            category.possible,
            cell(&category.details)
        ));
    }
    out.push('\n');

    let applied: Vec<_> = score.applied_penalties().collect();
    if !applied.is_empty() {
        out.push_str("## Penalties\n\n");
        for penalty in applied {
            out.push_str(&format!("- {} ({})\n", penalty.name, penalty.points));
        }
        out.push_str(&format!(
            "\n**Total:** {} earned, {} penalties, {} raw\n\n",
            score.total_earned, score.total_penalties, score.raw_score
        ));
    }

    if !report.recommendations.is_empty() {
        out.push_str("## Recommendations\n\n");
        for priority in [Priority::High, Priority::Medium, Priority::Low] {
            let recs = with_priority(&report.recommendations, priority);
            if recs.is_empty() {
                continue;
            }
            out.push_str(&format!("### {} Priority\n\n", priority));
            for rec in recs {
                out.push_str(&format!("- **{}:** {}\n", rec.category, rec.issue));
                out.push_str(&format!("  - Action: {}\n", rec.action));
                out.push_str(&format!("  - Impact: {}\n", rec.impact));
            }
            out.push('\n');
        }
    }

    out.push_str("## Optimization Workflow\n\n");
    write_items(&mut out, "Quick Wins", &report.workflow.quick_wins);
    write_items(&mut out, "Deep Optimizations", &report.workflow.deep_optimizations);
    write_items(&mut out, "Strategic Initiatives", &report.workflow.strategic_initiatives);

    if let Some(content) = &report.content {
        out.push_str("## Content Signals\n\n");
        let readability = &content.readability;
        match readability.flesch_reading_ease {
            Some(ease) => out.push_str(&format!("- Reading ease: {:.1} ({})\n", ease, readability.interpretation)),
            None => out.push_str(&format!("- Reading ease: {}\n", readability.interpretation)),
        }
        out.push_str(&format!("- Words: {}\n", content.content_quality.word_count));
        out.push_str(&format!("- Promotional density: {}%\n", content.promotional_language.promotional_density));
        out.push_str(&format!("- Factual score: {}\n", content.factual_content.factual_score));
        out.push_str(&format!("- Credibility score: {}\n", content.credibility.credibility_score));
        out.push_str(&format!(
            "- Brevity score: {} ({})\n",
            content.brevity.brevity_score, content.brevity.recommendation
        ));
        out.push('\n');
    }

    if config.include_advisory && !report.advisory.trim().is_empty() {
        out.push_str("## Advisory\n\n");
        out.push_str(&format!("{}\n", report.advisory.trim()));
    }

    out.trim_end().to_string() + "\n"
}

/// Renders a comparison as a summary table followed by a section per page.
pub fn comparison_to_markdown(entries: &[ComparisonEntry]) -> String {
    let mut out = String::from("# Competitive Analysis\n\n");

    out.push_str("| Page | Score | Tone | Promotional |\n");
    out.push_str("|---|---|---|---|\n");
    for entry in entries {
        match &entry.outcome {
            ComparisonOutcome::Analyzed { score, analysis, .. } => {
                let positioning = &analysis.strategic_positioning;
                out.push_str(&format!(
                    "| {} | {}/100 | {} | {}% |\n",
                    cell(&entry.url),
                    score,
                    positioning.current_tone,
                    positioning.promotional_percentage
                ));
            }
            ComparisonOutcome::Failed { .. } => out.push_str(&format!("| {} | failed | | |\n", cell(&entry.url))),
        }
    }
    out.push('\n');

    for entry in entries {
        out.push_str(&format!("## {}\n\n", entry.url));
        match &entry.outcome {
            ComparisonOutcome::Analyzed { analysis, content_preview, .. } => {
                write_strategy(&mut out, analysis);
                if !content_preview.is_empty() {
                    out.push_str(&format!("> {}\n\n", content_preview.replace('\n', " ")));
                }
            }
            ComparisonOutcome::Failed { error } => out.push_str(&format!("**Error:** {}\n\n", error)),
        }
    }

    out.trim_end().to_string() + "\n"
}

/// Renders a page's strategic analysis and rewrites as a Markdown document.
pub fn rewrites_to_markdown(report: &RewriteReport) -> String {
    let mut out = String::from("# Content Rewrites\n\n");
    out.push_str(&format!("**URL:** {}  \n", report.url));
    out.push_str(&format!("**Score:** {}/100\n\n", report.strategic_analysis.ai_optimization_score));

    out.push_str("## Strategic Analysis\n\n");
    write_strategy(&mut out, &report.strategic_analysis);

    out.push_str("## Rewrites\n\n");
    out.push_str(&format!("{}\n\n", report.rewrites.overall_strategy));
    for rewrite in &report.rewrites.rewrites {
        out.push_str(&format!("### {} ({} impact)\n\n", rewrite.section, rewrite.impact));
        out.push_str(&format!("**Before:** {}\n\n", rewrite.original));
        out.push_str(&format!("**After:** {}\n\n", rewrite.rewritten));
        out.push_str(&format!("**Why:** {}\n\n", rewrite.reasoning));
    }

    out.trim_end().to_string() + "\n"
}

fn write_strategy(out: &mut String, analysis: &StrategicAnalysis) {
    let positioning = &analysis.strategic_positioning;
    let gaps = &analysis.content_gaps;

    out.push_str(&format!(
        "- Tone: {} ({}% promotional)\n",
        positioning.current_tone, positioning.promotional_percentage
    ));
    out.push_str(&format!("- Audience: {}\n", positioning.audience_level));
    out.push_str(&format!("- Narrative: {}\n", positioning.narrative_focus));
    out.push_str(&format!(
        "- Gaps: factual density {}, authority {}, answer structure {}, evidence {}\n",
        gaps.factual_density_score,
        gaps.authority_signals_score,
        gaps.answer_structure_score,
        gaps.evidence_quality_score
    ));
    if !analysis.competitive_strengths.is_empty() {
        out.push_str(&format!("- Strengths: {}\n", analysis.competitive_strengths.join(", ")));
    }
    out.push('\n');

    for rec in &analysis.strategic_recommendations {
        out.push_str(&format!(
            "- **{}** ({} priority, {} effort, {}): {}\n",
            rec.category, rec.priority, rec.effort, rec.timeline, rec.recommendation
        ));
        out.push_str(&format!("  - Impact: {}\n", rec.business_impact));
    }
    if !analysis.strategic_recommendations.is_empty() {
        out.push('\n');
    }
}

fn write_items(out: &mut String, heading: &str, items: &[ActionItem]) {
    if items.is_empty() {
        return;
    }
    out.push_str(&format!("### {}\n\n", heading));
    for item in items {
        out.push_str(&format!(
            "- **{}** ({} effort, {} impact): {}\n",
            item.title, item.effort, item.impact, item.description
        ));
    }
    out.push('\n');
}

fn generate_frontmatter(report: &Report) -> String {
    let mut frontmatter = String::from("+++");
    frontmatter.push_str(&format!("\nurl = {}", toml_escape_string(&report.url)));
    frontmatter.push_str(&format!("\ntitle = {}", toml_escape_string(&report.structure.title)));
    frontmatter.push_str(&format!("\nscore = {}", report.score.final_score));
    if let Some(timestamp) = &report.timestamp {
        frontmatter.push_str(&format!("\ndate = {}", toml_escape_string(timestamp)));
    }
    frontmatter.push_str("\n+++\n");
    frontmatter
}

fn toml_escape_string(s: &str) -> String {
    format!("\"{}\"", s.replace('\\', "\\\\").replace('"', "\\\"").replace('\n', "\\n"))
}

/// Keeps table rows intact.
fn cell(s: &str) -> String {
    s.replace('|', "\\|").replace('\n', " ")
}
