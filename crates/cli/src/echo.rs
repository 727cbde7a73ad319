use std::time::Duration;

use aiscout_core::Report;
use owo_colors::OwoColorize;

use crate::VERSION;

/// Print a styled banner for verbose mode
pub fn print_banner() {
    eprintln!("\n{} {} {}", "aiscout".bold().bright_blue(), "v".dimmed(), VERSION.dimmed());
    eprintln!("{}", "Score how discoverable a page is to AI agents\n".dimmed());
}

/// Print a styled step message
pub fn print_step(step: usize, total: usize, message: &str) {
    eprintln!("{} {}", format!("[{}/{}]", step, total).dimmed(), message.bright_cyan());
}

/// Print a labelled detail line under a step
pub fn print_detail(label: &str, value: &str) {
    eprintln!("  {} {}", format!("{}:", label).dimmed(), value.bright_white());
}

pub fn print_success(message: &str) {
    eprintln!("{} {}", "✓".green(), message.bright_green());
}

pub fn print_info(message: &str) {
    eprintln!("{} {}", "ℹ".blue(), message.bright_blue());
}

pub fn print_warning(message: &str) {
    eprintln!("{} {}", "⚠".yellow(), message.bright_yellow());
}

/// Print the final score, colored by band
pub fn print_score(report: &Report) {
    let score = report.score.final_score;
    let label = format!("{}/100", score);
    let styled = if score >= 70 {
        label.bright_green().bold().to_string()
    } else if score >= 40 {
        label.bright_yellow().bold().to_string()
    } else {
        label.bright_red().bold().to_string()
    };
    eprintln!("  {} {}", "Score:".dimmed(), styled);
    eprintln!(
        "  {} {}",
        "Recommendations:".dimmed(),
        report.recommendations.len().to_string().bright_white()
    );
}

/// Print timing summary
pub fn print_timing_summary(total: Duration, timings: &[(&str, Duration)]) {
    eprintln!("\n{}", "═".repeat(60).dimmed());
    eprintln!("{}", "Timing Summary".bold().cyan());
    eprintln!("{}", "═".repeat(60).dimmed());

    for (label, duration) in timings {
        eprintln!("  {} {:>8.2}ms", format!("{}:", label).dimmed(), duration.as_secs_f64() * 1000.0);
    }

    eprintln!("  {} {:>8.2}ms\n", "Total:".bold().dimmed(), total.as_secs_f64() * 1000.0);
}

/// Format file size for display
pub fn format_size(bytes: usize) -> String {
    const KB: usize = 1024;
    const MB: usize = 1024 * KB;

    if bytes >= MB {
        format!("{:.1} MB", bytes as f64 / MB as f64)
    } else if bytes >= KB {
        format!("{:.1} KB", bytes as f64 / KB as f64)
    } else {
        format!("{} B", bytes)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_format_size() {
        assert_eq!(format_size(512), "512 B");
        assert_eq!(format_size(2048), "2.0 KB");
        assert_eq!(format_size(3 * 1024 * 1024), "3.0 MB");
    }
}
