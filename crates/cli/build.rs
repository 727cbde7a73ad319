use std::{env, fs, path::PathBuf};

fn main() {
    println!("cargo:rerun-if-changed=build.rs");
    println!("cargo:rerun-if-env-changed=OUT_DIR");

    let out_dir = PathBuf::from(env::var("OUT_DIR").unwrap());
    let completions_dir = out_dir.join("completions");

    fs::create_dir_all(&completions_dir).unwrap();

    let mut cmd = clap::Command::new("aiscout")
        .version(env!("CARGO_PKG_VERSION"))
        .about("Score how discoverable a web page is to AI agents")
        .arg(clap::arg!([INPUT]... "URL to fetch, local HTML file, or '-' for stdin. Two or more inputs are compared"))
        .arg(
            clap::arg!(-o --output <FILE> "Output file (default: stdout)")
                .value_parser(clap::value_parser!(std::path::PathBuf)),
        )
        .arg(
            clap::arg!(-f --format <FORMAT> "Output format (text, markdown, json)")
                .default_value("text")
                .value_parser(["text", "markdown", "json"]),
        )
        .arg(clap::arg!(--timeout <SECS> "HTTP timeout in seconds (default: 30)"))
        .arg(clap::arg!(--"user-agent" <UA> "Custom User-Agent for HTTP requests"))
        .arg(clap::arg!(--"no-probe" "Skip the robots.txt, sitemap.xml and llms.txt probes"))
        .arg(clap::arg!(--"no-content" "Skip the content pass and score technical signals only"))
        .arg(
            clap::arg!(--config <FILE> "Config file to use instead of ~/.config/aiscout/aiscout.json")
                .value_parser(clap::value_parser!(std::path::PathBuf)),
        )
        .arg(clap::arg!(--advisor "Ask the hosted advisor for advice (reads ANTHROPIC_API_KEY)"))
        .arg(clap::arg!(--rewrites "Suggest rewrites for the page instead of scoring it (single input)"))
        .arg(clap::arg!(--frontmatter "Include TOML frontmatter (Markdown only)"))
        .arg(clap::arg!(--width <COLS> "Wrap text output at this width (0 = no wrapping)").default_value("0"))
        .arg(clap::arg!(--compact "Print compact JSON (JSON only)"))
        .arg(clap::arg!(-v --verbose "Enable debug logging"))
        .arg(
            clap::arg!(--completions <SHELL> "Generate shell completion script")
                .value_parser(["bash", "zsh", "fish", "powershell", "elvish"]),
        );

    for shell in [
        clap_complete::Shell::Bash,
        clap_complete::Shell::Zsh,
        clap_complete::Shell::Fish,
        clap_complete::Shell::PowerShell,
    ] {
        clap_complete::generate_to(shell, &mut cmd, "aiscout", &completions_dir).unwrap();
    }

    println!("cargo:warning=Shell completions generated in: {}", completions_dir.display());
}
