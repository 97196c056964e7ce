use std::fmt::Write as _;
use std::io::Read;

use anyhow::{bail, Context, Result};
use clap::{Parser, ValueEnum};
use prompt_diff::Comparison;
use tracing::debug;
use tracing_subscriber::EnvFilter;

#[derive(Clone, Copy, ValueEnum)]
enum Format {
    Json,
    Text,
}

#[derive(Parser)]
#[command(
    name = "prompt-diff",
    about = "Score two LLM prompts for risk signals and compare them",
    version
)]
struct Cli {
    /// Original prompt: a file path, or `-` for stdin
    prompt_a: String,

    /// Revised prompt: a file path, or `-` for stdin
    prompt_b: String,

    /// Treat PROMPT_A and PROMPT_B as prompt text instead of paths
    #[arg(long)]
    inline: bool,

    /// Output format
    #[arg(long, value_enum, env = "PROMPT_DIFF_FORMAT", default_value = "json")]
    format: Format,
}

fn read_prompt(source: &str, inline: bool) -> Result<String> {
    if inline {
        return Ok(source.to_string());
    }
    if source == "-" {
        debug!("reading prompt from stdin");
        let mut input = String::new();
        std::io::stdin()
            .read_to_string(&mut input)
            .context("Failed to read stdin")?;
        return Ok(input);
    }
    debug!(path = source, "reading prompt from file");
    std::fs::read_to_string(source).with_context(|| format!("Error reading {source}"))
}

fn render_text(report: &Comparison) -> String {
    let mut out = String::new();
    let _ = writeln!(out, "Token delta: {:+}", report.delta);
    let _ = writeln!(out, "Risk: {}/10 ({})", report.risk, report.risk_band);

    if report.risk_reasons.is_empty() {
        let _ = writeln!(out, "Risk reasons: none");
    } else {
        let _ = writeln!(out, "Risk reasons:");
        for reason in &report.risk_reasons {
            let _ = writeln!(out, "  - {reason}");
        }
    }

    if report.insights.is_empty() {
        let _ = writeln!(out, "Insights: no notable differences");
    } else {
        let _ = writeln!(out, "Insights:");
        for insight in &report.insights {
            let _ = writeln!(out, "  - {insight}");
        }
    }
    out
}

fn main() -> Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("warn")),
        )
        .with_writer(std::io::stderr)
        .init();

    let cli = Cli::parse();

    if !cli.inline && cli.prompt_a == "-" && cli.prompt_b == "-" {
        bail!("Only one prompt can be read from stdin");
    }

    let prompt_a = read_prompt(&cli.prompt_a, cli.inline)?;
    let prompt_b = read_prompt(&cli.prompt_b, cli.inline)?;
    let report = prompt_diff::compare(&prompt_a, &prompt_b);

    match cli.format {
        Format::Json => println!("{}", serde_json::to_string_pretty(&report)?),
        Format::Text => print!("{}", render_text(&report)),
    }
    Ok(())
}
