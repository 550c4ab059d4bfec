//! CLI binary for askdocs.
//!
//! A thin shim over the library crate that maps CLI flags to
//! `PipelineConfig` and prints the three result sections.

use anyhow::{Context, Result};
use askdocs::{
    extract_text, process, PipelineConfig, RetryPolicy, TargetLanguage,
};
use clap::Parser;
use indicatif::{ProgressBar, ProgressStyle};
use std::time::Duration;
use tracing_subscriber::EnvFilter;

// ── ANSI colour helpers (no extra deps) ──────────────────────────────────────

fn bold(s: &str) -> String {
    format!("\x1b[1m{s}\x1b[0m")
}
fn cyan(s: &str) -> String {
    format!("\x1b[36m{s}\x1b[0m")
}
fn dim(s: &str) -> String {
    format!("\x1b[2m{s}\x1b[0m")
}

// ── CLI definition ───────────────────────────────────────────────────────────

/// Summarize, question, and translate a document with an LLM.
#[derive(Parser, Debug)]
#[command(name = "askdocs", version, about, long_about = None)]
struct Cli {
    /// Document to process: local PDF path or HTTP/HTTPS URL.
    document: String,

    /// Question to ask about the document. Defaults to
    /// "What are the main findings?" when omitted.
    #[arg(short, long, default_value = "")]
    question: String,

    /// Target language for the outputs: English, Chinese, Spanish,
    /// French, German, Japanese, or Korean. English means no translation.
    #[arg(short, long, default_value = "English")]
    language: String,

    /// Generation model identifier.
    #[arg(short, long, default_value = askdocs::DEFAULT_MODEL)]
    model: String,

    /// Backend API key. Resolved from the environment when not given.
    #[arg(long, env = "GEMINI_API_KEY", hide_env_values = true)]
    api_key: Option<String>,

    /// Total attempts per generation call (first try included).
    #[arg(long, default_value_t = 4)]
    max_attempts: u32,

    /// Only extract and print the document text; no generation calls.
    #[arg(long)]
    extract_only: bool,

    /// Print the result as JSON instead of formatted sections.
    #[arg(long)]
    json: bool,

    /// Verbose logging (equivalent to RUST_LOG=askdocs=debug).
    #[arg(short, long)]
    verbose: bool,
}

#[tokio::main]
async fn main() -> Result<()> {
    let cli = Cli::parse();

    let filter = if cli.verbose {
        EnvFilter::new("askdocs=debug")
    } else {
        EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("warn"))
    };
    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .init();

    // Validate the language before spending time on extraction so typos
    // fail instantly with the supported list.
    cli.language
        .parse::<TargetLanguage>()
        .with_context(|| format!("--language '{}'", cli.language))?;

    let mut builder = PipelineConfig::builder()
        .model(&cli.model)
        .retry(RetryPolicy {
            max_attempts: cli.max_attempts,
            ..RetryPolicy::default()
        });
    if let Some(ref key) = cli.api_key {
        builder = builder.api_key(key);
    }
    let config = builder.build()?;

    if cli.extract_only {
        let text = extract_text(&cli.document, &config).await?;
        println!("{text}");
        return Ok(());
    }

    let spinner = make_spinner(&cli.document);
    let result = process(&cli.document, &cli.question, &cli.language, &config).await;
    spinner.finish_and_clear();

    let result = result.with_context(|| format!("processing '{}'", cli.document))?;

    if cli.json {
        println!("{}", serde_json::to_string_pretty(&result)?);
        return Ok(());
    }

    println!("{}", bold(&cyan("── Summary ─────────────────────────────")));
    println!("{}", result.summary);
    println!("{}", bold(&cyan("── Answer ──────────────────────────────")));
    println!("{}", result.answer);
    println!("{}", bold(&cyan("── Suggested Q&A ───────────────────────")));
    println!("{}", result.suggested_qa);
    println!(
        "{}",
        dim(&format!(
            "{} pages · {} backend calls · {:.1}s",
            result.stats.pages,
            result.stats.generation_calls + result.stats.translation_calls,
            result.stats.total_duration_ms as f64 / 1000.0
        ))
    );

    Ok(())
}

fn make_spinner(document: &str) -> ProgressBar {
    let bar = ProgressBar::new_spinner();
    let style = ProgressStyle::with_template("{spinner:.cyan} {msg}")
        .unwrap_or_else(|_| ProgressStyle::default_spinner())
        .tick_strings(&["⠋", "⠙", "⠹", "⠸", "⠼", "⠴", "⠦", "⠧", "⠇", "⠏", "⠿"]);
    bar.set_style(style);
    bar.set_message(format!("Reading {document}…"));
    bar.enable_steady_tick(Duration::from_millis(80));
    bar
}
