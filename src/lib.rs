//! # askdocs
//!
//! Summarize, question, and translate documents with LLMs.
//!
//! Upload a PDF, get back three artifacts in one call: a bullet-point
//! summary, an answer to your question (or a sensible default question),
//! and three suggested question/answer pairs — optionally translated into
//! one of seven languages.
//!
//! ## Pipeline Overview
//!
//! ```text
//! PDF
//!  │
//!  ├─ 1. Input     resolve local file or download from URL
//!  ├─ 2. Extract   page-ordered text extraction via lopdf (pure Rust)
//!  ├─ 3. Prompts   render one instruction per task, ≤10,000 doc chars
//!  ├─ 4. Generate  summarize + answer + suggest-Q&A, concurrently,
//!  │               each call retried on 429/503 with capped backoff
//!  ├─ 5. Translate three more calls when the target isn't English
//!  └─ 6. Output    {summary, answer, suggested_qa} + run stats
//! ```
//!
//! ## Quick Start
//!
//! ```rust,no_run
//! use askdocs::{process, PipelineConfig};
//!
//! #[tokio::main]
//! async fn main() -> Result<(), Box<dyn std::error::Error>> {
//!     // Credential is injected — the library never reads the environment.
//!     let config = PipelineConfig::builder()
//!         .api_key(std::env::var("GEMINI_API_KEY")?)
//!         .build()?;
//!
//!     let result = process("report.pdf", "What changed in Q3?", "Spanish", &config).await?;
//!     println!("{}", result.summary);
//!     println!("{}", result.answer);
//!     println!("{}", result.suggested_qa);
//!     Ok(())
//! }
//! ```
//!
//! ## Feature Flags
//!
//! | Feature | Default | Description |
//! |---------|---------|-------------|
//! | `cli`   | on      | Enables the `askdocs` binary (clap + anyhow + tracing-subscriber) |
//!
//! Disable `cli` when using only the library to avoid pulling in CLI-only deps:
//! ```toml
//! askdocs = { version = "0.3", default-features = false }
//! ```
//!
//! ## Guarantees
//!
//! * At most the first 10,000 characters of the document reach any prompt.
//! * Translation applies only to generated outputs, never to the document.
//! * A request returns a complete result tuple or a single typed error —
//!   never a partially filled result.
//! * Transient backend failures (HTTP 429/503) are retried with capped
//!   exponential backoff and jitter; everything else fails immediately.

// ── Modules ──────────────────────────────────────────────────────────────

pub mod config;
pub mod error;
pub mod output;
pub mod pipeline;
pub mod process;
pub mod prompts;

// ── Re-exports ───────────────────────────────────────────────────────────

pub use config::{PipelineConfig, PipelineConfigBuilder, RetryPolicy, TargetLanguage, DEFAULT_MODEL};
pub use error::{
    AskDocsError, AuthConfigurationError, ExtractionError, GenerationError,
    UnsupportedLanguageError,
};
pub use output::{PipelineResult, PipelineStats};
pub use pipeline::backend::{BackendError, GeminiBackend, GenerationBackend, GenerationParams};
pub use pipeline::client::GenerationClient;
pub use process::{extract_text, process, process_sync};
