use std::fs;
use std::io;
use std::path::PathBuf;
use std::str::FromStr;
use std::time::{Duration, Instant};

use aiscout_core::formatters::{JsonFormatter, MarkdownFormatter, TextFormatter};
use aiscout_core::{
    AnalyzerConfig, Analyzer, AnthropicAdvisor, ComparisonOutcome, ConfigLoader, JsonConfig, MarkdownConfig,
    TextConfig,
};
use anyhow::Context;
use clap::{CommandFactory, Parser};
use clap_complete::Shell;
use owo_colors::OwoColorize;
use tracing_subscriber::EnvFilter;

mod echo;

const VERSION: &str = env!("CARGO_PKG_VERSION");

type Timings = Vec<(&'static str, Duration)>;

/// Output format for the report
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum OutputFormat {
    Text,
    Markdown,
    Json,
}

impl FromStr for OutputFormat {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_lowercase().as_str() {
            "text" | "txt" => Ok(Self::Text),
            "markdown" | "md" => Ok(Self::Markdown),
            "json" => Ok(Self::Json),
            _ => Err(format!("Invalid format: {}. Valid options: text, markdown, json", s)),
        }
    }
}

/// Score how discoverable a web page is to AI summarization and crawling agents
#[derive(Parser, Debug)]
#[command(name = "aiscout")]
#[command(version, about = "Score how discoverable a web page is to AI agents", long_about = None)]
struct Args {
    /// URL to fetch, local HTML file, or "-" for stdin. Two or more inputs are compared
    #[arg(value_name = "INPUT", required_unless_present = "completions")]
    inputs: Vec<String>,

    /// Output file (default: stdout)
    #[arg(short, long, value_name = "FILE")]
    output: Option<PathBuf>,

    /// Output format (text, markdown, json)
    #[arg(short, long, default_value = "text", value_name = "FORMAT")]
    format: OutputFormat,

    /// HTTP timeout in seconds (default: 30)
    #[arg(long, value_name = "SECS")]
    timeout: Option<u64>,

    /// Custom User-Agent for HTTP requests
    #[arg(long, value_name = "UA")]
    user_agent: Option<String>,

    /// Skip the robots.txt, sitemap.xml and llms.txt probes
    #[arg(long)]
    no_probe: bool,

    /// Skip the content pass and score technical signals only
    #[arg(long)]
    no_content: bool,

    /// Config file to use instead of ~/.config/aiscout/aiscout.json
    #[arg(long, value_name = "FILE")]
    config: Option<PathBuf>,

    /// Ask the hosted advisor for advice (reads ANTHROPIC_API_KEY)
    #[arg(long)]
    advisor: bool,

    /// Suggest rewrites for the page instead of scoring it (single input)
    #[arg(long)]
    rewrites: bool,

    /// Include TOML frontmatter (Markdown only)
    #[arg(long)]
    frontmatter: bool,

    /// Wrap text output at this width (0 = no wrapping)
    #[arg(long, default_value = "0", value_name = "COLS")]
    width: usize,

    /// Print compact JSON (JSON only)
    #[arg(long)]
    compact: bool,

    /// Enable debug logging
    #[arg(short, long)]
    verbose: bool,

    /// Generate shell completion script
    #[arg(long, value_name = "SHELL")]
    completions: Option<Shell>,
}

fn init_tracing(verbose: bool) {
    let default_level = if verbose { "debug" } else { "warn" };
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(default_level));
    tracing_subscriber::fmt().with_env_filter(filter).with_writer(io::stderr).with_target(false).init();
}

/// Defaults, then config file, then flags.
fn build_config(args: &Args) -> anyhow::Result<AnalyzerConfig> {
    let mut config = AnalyzerConfig::default();

    match &args.config {
        Some(path) => ConfigLoader::load_from_path(path)
            .with_context(|| format!("Failed to load config file: {}", path.display()))?
            .apply(&mut config),
        None => ConfigLoader::default().apply(&mut config),
    }

    if let Some(timeout) = args.timeout {
        config.fetch.timeout = timeout;
    }
    if let Some(user_agent) = &args.user_agent {
        config.fetch.user_agent.clone_from(user_agent);
    }
    if args.no_probe {
        config.probe_site_files = false;
    }
    if args.no_content {
        config.content_analysis = false;
    }

    Ok(config)
}

impl Args {
    fn text(&self) -> TextFormatter {
        TextFormatter::new(TextConfig { line_width: self.width, ..TextConfig::default() })
    }

    fn markdown(&self) -> MarkdownFormatter {
        MarkdownFormatter::new(MarkdownConfig { include_frontmatter: self.frontmatter, ..MarkdownConfig::default() })
    }

    fn json(&self) -> JsonFormatter {
        JsonFormatter::new(JsonConfig { pretty: !self.compact, score_only: false })
    }
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let args = Args::parse();

    if let Some(shell) = args.completions {
        clap_complete::generate(shell, &mut Args::command(), "aiscout", &mut io::stdout());
        return Ok(());
    }

    init_tracing(args.verbose);
    if args.rewrites && args.inputs.len() > 1 {
        anyhow::bail!("--rewrites takes a single input, got {}", args.inputs.len());
    }
    let started = Instant::now();
    let mut timings = Vec::new();

    if args.verbose {
        echo::print_banner();
        echo::print_info("Debug logging enabled");
        eprintln!();
        echo::print_step(1, 4, "Loading configuration");
    }

    let config = build_config(&args)?;
    tracing::debug!(?config, "configuration loaded");
    let analyzer = Analyzer::with_config(config);

    let advisor = if args.advisor {
        let advisor = AnthropicAdvisor::from_env();
        if advisor.is_none() {
            echo::print_warning("ANTHROPIC_API_KEY is not set, using static guidance");
        }
        advisor
    } else {
        None
    };

    let output = if args.inputs.len() > 1 {
        compare(&args, &analyzer, advisor.as_ref(), &mut timings).await?
    } else if args.rewrites {
        rewrites(&args, &analyzer, advisor.as_ref(), &mut timings).await?
    } else {
        report(&args, &analyzer, advisor.as_ref(), &mut timings).await?
    };

    if args.verbose {
        echo::print_detail("Size", &echo::format_size(output.len()));
    }

    match &args.output {
        Some(path) => {
            fs::write(path, &output).with_context(|| format!("Failed to write to file: {}", path.display()))?;
            echo::print_success(&format!("Output written to {}", path.display().bright_white()));
        }
        None => println!("{}", output.trim_end()),
    }

    if args.verbose {
        echo::print_timing_summary(started.elapsed(), &timings);
    }

    Ok(())
}

/// Scores a single page.
async fn report(
    args: &Args, analyzer: &Analyzer, advisor: Option<&AnthropicAdvisor>, timings: &mut Timings,
) -> anyhow::Result<String> {
    let input = &args.inputs[0];
    if args.verbose {
        echo::print_step(2, 4, &format!("Fetching {}", input.bright_white().underline()));
    }

    let step = Instant::now();
    let analysis = analyzer
        .fetch_and_analyze(input)
        .await
        .with_context(|| format!("Failed to fetch {}", input))?;
    timings.push(("Fetch", step.elapsed()));

    if args.verbose {
        let structure = &analysis.structure;
        echo::print_detail("robots.txt", &structure.robots_txt.to_string());
        echo::print_detail("sitemap.xml", &structure.sitemap_xml.to_string());
        echo::print_detail("llms.txt", &structure.llms_txt.to_string());
        eprintln!();
        echo::print_step(3, 4, "Building report");
    }

    let step = Instant::now();
    let report = analyzer.report_with_advisor(analysis, advisor).await;
    timings.push(("Report", step.elapsed()));

    if args.verbose {
        echo::print_detail("Title", &report.structure.title);
        echo::print_score(&report);
        eprintln!();
        echo::print_step(4, 4, "Writing output");
        echo::print_detail("Format", &format!("{:?}", args.format));
    }

    Ok(match args.format {
        OutputFormat::Text => args.text().format(&report),
        OutputFormat::Markdown => args.markdown().format(&report),
        OutputFormat::Json => args.json().format(&report).context("Failed to serialize report")?,
    })
}

/// Compares every input. Pages that fail are reported alongside the rest.
async fn compare(
    args: &Args, analyzer: &Analyzer, advisor: Option<&AnthropicAdvisor>, timings: &mut Timings,
) -> anyhow::Result<String> {
    if args.verbose {
        echo::print_step(2, 4, &format!("Comparing {} pages", args.inputs.len()));
    }

    let step = Instant::now();
    let entries = analyzer.compare(&args.inputs, advisor).await;
    timings.push(("Compare", step.elapsed()));

    if args.verbose {
        eprintln!();
        echo::print_step(3, 4, "Summarizing pages");
        for entry in &entries {
            match &entry.outcome {
                ComparisonOutcome::Analyzed { score, .. } => echo::print_detail(&entry.url, &format!("{}/100", score)),
                ComparisonOutcome::Failed { error } => echo::print_warning(&format!("{}: {}", entry.url, error)),
            }
        }
        eprintln!();
        echo::print_step(4, 4, "Writing output");
        echo::print_detail("Format", &format!("{:?}", args.format));
    }

    Ok(match args.format {
        OutputFormat::Text => args.text().format_comparison(&entries),
        OutputFormat::Markdown => args.markdown().format_comparison(&entries),
        OutputFormat::Json => args.json().format_comparison(&entries).context("Failed to serialize comparison")?,
    })
}

/// Suggests rewrites for a single page.
async fn rewrites(
    args: &Args, analyzer: &Analyzer, advisor: Option<&AnthropicAdvisor>, timings: &mut Timings,
) -> anyhow::Result<String> {
    let input = &args.inputs[0];
    if args.verbose {
        echo::print_step(2, 4, &format!("Fetching {}", input.bright_white().underline()));
    }

    let step = Instant::now();
    let report = analyzer
        .rewrites(input, advisor)
        .await
        .with_context(|| format!("Failed to fetch {}", input))?;
    timings.push(("Rewrites", step.elapsed()));

    if args.verbose {
        eprintln!();
        echo::print_step(3, 4, "Planning rewrites");
        echo::print_detail("Score", &format!("{}/100", report.strategic_analysis.ai_optimization_score));
        echo::print_detail("Rewrites", &report.rewrites.rewrites.len().to_string());
        eprintln!();
        echo::print_step(4, 4, "Writing output");
        echo::print_detail("Format", &format!("{:?}", args.format));
    }

    Ok(match args.format {
        OutputFormat::Text => args.text().format_rewrites(&report),
        OutputFormat::Markdown => args.markdown().format_rewrites(&report),
        OutputFormat::Json => args.json().format_rewrites(&report).context("Failed to serialize rewrites")?,
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_output_format_parse() {
        assert_eq!("md".parse::<OutputFormat>().unwrap(), OutputFormat::Markdown);
        assert_eq!("JSON".parse::<OutputFormat>().unwrap(), OutputFormat::Json);
        assert!("html".parse::<OutputFormat>().is_err());
    }

    #[test]
    fn test_flags_override_config() {
        let args = Args::parse_from(["aiscout", "--timeout", "7", "--no-probe", "--no-content", "page.html"]);
        let config = build_config(&args).unwrap();
        assert_eq!(config.fetch.timeout, 7);
        assert!(!config.probe_site_files);
        assert!(!config.content_analysis);
    }

    #[test]
    fn test_inputs_collect_in_order() {
        let args = Args::parse_from(["aiscout", "--rewrites", "a.html", "b.html"]);
        assert_eq!(args.inputs, vec!["a.html", "b.html"]);
        assert!(args.rewrites);
    }

    #[test]
    fn test_args_verify() {
        Args::command().debug_assert();
    }
}
