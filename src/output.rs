//! Output types returned by the pipeline.

use serde::{Deserialize, Serialize};

/// The complete result of one pipeline run.
///
/// All three fields are present and non-empty on success; a failed run
/// returns [`crate::AskDocsError`] instead — never a partial tuple.
/// When a non-English target language was requested, every field holds
/// the translated text.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct PipelineResult {
    /// Bullet-point summary of the document.
    pub summary: String,

    /// Answer to the caller's question (or the default question when the
    /// caller supplied none).
    pub answer: String,

    /// Three suggested question/answer pairs in `Q1:`/`A1:` … `Q3:`/`A3:`
    /// form.
    pub suggested_qa: String,

    /// Accounting for this run.
    pub stats: PipelineStats,
}

/// Accounting for one pipeline run.
///
/// Call counts are the pipeline's own dispatch counts, not backend
/// attempt counts — a generation call that succeeded on its third retry
/// still counts once here.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct PipelineStats {
    /// Generation calls dispatched (summarize + answer + suggest_qa).
    pub generation_calls: usize,

    /// Translation calls dispatched (0 or 3).
    pub translation_calls: usize,

    /// Characters of document text handed to the prompt builders.
    pub document_chars: usize,

    /// Pages in the source document.
    pub pages: usize,

    /// Wall-clock time spent extracting text.
    pub extract_duration_ms: u64,

    /// Wall-clock time spent in generation and translation calls,
    /// including retry backoff.
    pub generate_duration_ms: u64,

    /// Total wall-clock time for the run.
    pub total_duration_ms: u64,
}
