//! Pipeline orchestration: document in, result tuple out.
//!
//! One call to [`process`] runs the whole request: resolve the input,
//! extract text, issue the three generation tasks, translate if asked,
//! assemble the result. The contract is all-or-nothing — any unrecovered
//! failure aborts the run with a single typed error and no partial tuple.
//!
//! The three generation tasks (summarize, answer, suggest-Q&A) derive
//! only from the document text and the question, so they run
//! concurrently; the first failure cancels the join. Translations, when
//! requested, wait for all three outputs and then run concurrently
//! themselves.

use crate::config::{PipelineConfig, TargetLanguage};
use crate::error::{AskDocsError, AuthConfigurationError};
use crate::output::{PipelineResult, PipelineStats};
use crate::pipeline::backend::{GeminiBackend, GenerationBackend};
use crate::pipeline::client::GenerationClient;
use crate::pipeline::{extract, input, tidy};
use crate::prompts;
use std::str::FromStr;
use std::sync::Arc;
use std::time::Instant;
use tracing::{debug, info};

/// Process a document: summary, answer, and suggested Q&A, optionally
/// translated.
///
/// This is the primary entry point for the library.
///
/// # Arguments
/// * `source` — local file path or HTTP/HTTPS URL of a PDF
/// * `question` — free-form question about the document; empty or blank
///   falls back to a default question
/// * `target_language` — case-insensitive name from the supported set;
///   `"English"` means no translation
/// * `config` — pipeline configuration
///
/// # Errors
/// Exactly one of the [`AskDocsError`] variants; see [`crate::error`].
/// Extraction and language failures abort before any generation call.
pub async fn process(
    source: impl AsRef<str>,
    question: &str,
    target_language: &str,
    config: &PipelineConfig,
) -> Result<PipelineResult, AskDocsError> {
    let total_start = Instant::now();
    let source = source.as_ref();
    info!("Processing document: {}", source);

    // ── Step 1: Parse the target language ────────────────────────────────
    // Rejected up front: a misspelled language must not cost three
    // generation calls before failing.
    let language = TargetLanguage::from_str(target_language)?;

    // ── Step 2: Resolve the backend ──────────────────────────────────────
    let backend = resolve_backend(config)?;
    let client = GenerationClient::new(backend, config.retry);

    // ── Step 3: Resolve input and extract text ───────────────────────────
    let extract_start = Instant::now();
    let bytes = input::resolve_input(source, config.download_timeout_secs).await?;
    let extracted = extract::extract(&bytes, source)?;
    drop(bytes);
    let extract_duration_ms = extract_start.elapsed().as_millis() as u64;
    info!(
        "Extracted {} chars from {} pages in {}ms",
        extracted.text.len(),
        extracted.pages,
        extract_duration_ms
    );

    // ── Step 4: Generate summary, answer, and suggested Q&A ──────────────
    let generate_start = Instant::now();
    let document_text = &extracted.text;

    let (summary, answer, suggested_qa) = futures::try_join!(
        run_task(&client, prompts::summarize(document_text)),
        run_task(&client, prompts::answer(document_text, question)),
        run_task(&client, prompts::suggest_qa(document_text)),
    )?;
    debug!("All three generation tasks complete");

    // ── Step 5: Translate, unless the target is English ──────────────────
    let translation_calls = if language.is_english() {
        0
    } else {
        3
    };
    let (summary, answer, suggested_qa) = if language.is_english() {
        (summary, answer, suggested_qa)
    } else {
        info!("Translating outputs into {}", language);
        futures::try_join!(
            run_task(&client, prompts::translate(&summary, language)),
            run_task(&client, prompts::translate(&answer, language)),
            run_task(&client, prompts::translate(&suggested_qa, language)),
        )?
    };
    let generate_duration_ms = generate_start.elapsed().as_millis() as u64;

    // ── Step 6: Assemble the result ──────────────────────────────────────
    let stats = PipelineStats {
        generation_calls: 3,
        translation_calls,
        document_chars: extracted.text.chars().count(),
        pages: extracted.pages,
        extract_duration_ms,
        generate_duration_ms,
        total_duration_ms: total_start.elapsed().as_millis() as u64,
    };

    info!(
        "Pipeline complete: {} backend calls, {}ms total",
        stats.generation_calls + stats.translation_calls,
        stats.total_duration_ms
    );

    Ok(PipelineResult {
        summary: tidy::tidy_output(&summary),
        answer: tidy::tidy_output(&answer),
        suggested_qa: tidy::tidy_output(&suggested_qa),
        stats,
    })
}

/// Synchronous wrapper around [`process`].
///
/// Creates a temporary tokio runtime internally. For hosts that are not
/// async (GUI event threads, simple scripts).
pub fn process_sync(
    source: impl AsRef<str>,
    question: &str,
    target_language: &str,
    config: &PipelineConfig,
) -> Result<PipelineResult, AskDocsError> {
    tokio::runtime::Runtime::new()
        .map_err(|e| AskDocsError::InvalidConfig(format!("Failed to create tokio runtime: {e}")))?
        .block_on(process(source, question, target_language, config))
}

/// Extract a document's text without issuing any generation calls.
///
/// Does not require a backend or API key.
pub async fn extract_text(
    source: impl AsRef<str>,
    config: &PipelineConfig,
) -> Result<String, AskDocsError> {
    let source = source.as_ref();
    let bytes = input::resolve_input(source, config.download_timeout_secs).await?;
    let extracted = extract::extract(&bytes, source)?;
    Ok(extracted.text)
}

// ── Internal helpers ─────────────────────────────────────────────────────

/// One generation task: rendered prompt + params through the client.
async fn run_task(
    client: &GenerationClient,
    (prompt, params): (String, crate::pipeline::backend::GenerationParams),
) -> Result<String, AskDocsError> {
    Ok(client.generate(&prompt, &params).await?)
}

/// Resolve the generation backend, from most-specific to least-specific.
///
/// 1. **Pre-built backend** (`config.backend`) — the caller constructed
///    and configured it entirely; used as-is. The injection point for
///    tests and custom middleware.
///
/// 2. **Injected API key** (`config.api_key`) — a Gemini backend is
///    constructed around it. A blank key fails here, before any network
///    call.
///
/// No environment lookup happens in the library: credential resolution
/// is the host program's responsibility.
fn resolve_backend(
    config: &PipelineConfig,
) -> Result<Arc<dyn GenerationBackend>, AskDocsError> {
    if let Some(ref backend) = config.backend {
        return Ok(Arc::clone(backend));
    }

    let api_key = config.api_key.as_deref().ok_or(AuthConfigurationError)?;
    let backend = GeminiBackend::new(api_key, &config.model, config.api_timeout_secs)?;
    Ok(Arc::new(backend))
}
