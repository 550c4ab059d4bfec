//! Prompt rendering for every generation task.
//!
//! Centralising every prompt here serves two purposes:
//!
//! 1. **Single source of truth** — changing how a task is phrased, or its
//!    generation parameters, requires editing exactly one place.
//!
//! 2. **Testability** — unit tests can render and inspect prompts directly
//!    without a real backend, making prompt regressions easy to catch.
//!
//! Every builder is a pure function returning the fully rendered prompt
//! plus a fixed [`GenerationParams`] record. The 10,000-character document
//! bound is enforced *here*, not by callers — no prompt can embed more of
//! the document than [`MAX_DOCUMENT_CHARS`], regardless of task kind.

use crate::config::TargetLanguage;
use crate::pipeline::backend::GenerationParams;

/// Upper bound on document characters embedded in any prompt.
///
/// Bounds cost and latency per call: everything past the first 10,000
/// characters of the document is never sent to the backend.
pub const MAX_DOCUMENT_CHARS: usize = 10_000;

/// Question substituted when the caller supplies an empty or blank one.
pub const DEFAULT_QUESTION: &str = "What are the main findings?";

/// Truncate document text to [`MAX_DOCUMENT_CHARS`] characters.
///
/// Counts characters, not bytes, so the cut never lands inside a UTF-8
/// sequence.
pub fn truncate_document(text: &str) -> &str {
    match text.char_indices().nth(MAX_DOCUMENT_CHARS) {
        Some((byte_idx, _)) => &text[..byte_idx],
        None => text,
    }
}

/// Render the summarization prompt. Temperature 0.5, max 512 tokens.
pub fn summarize(document_text: &str) -> (String, GenerationParams) {
    let prompt = format!(
        "Summarize the following document in bullet points in a concise and \
         easy-to-understand way:\n\n{}",
        truncate_document(document_text)
    );
    (
        prompt,
        GenerationParams {
            temperature: 0.5,
            max_output_tokens: Some(512),
        },
    )
}

/// Render the question-answering prompt. Temperature 0.5, max 512 tokens.
///
/// An empty or whitespace-only `question` is replaced by
/// [`DEFAULT_QUESTION`]; a non-empty question is embedded verbatim.
pub fn answer(document_text: &str, question: &str) -> (String, GenerationParams) {
    let question = if question.trim().is_empty() {
        DEFAULT_QUESTION
    } else {
        question
    };
    let prompt = format!(
        "You are a productive and intelligent assistant that answers questions \
         about documents.\n\n\
         Document:\n{}\n\
         Question: {}\n\
         Answer:",
        truncate_document(document_text),
        question
    );
    (
        prompt,
        GenerationParams {
            temperature: 0.5,
            max_output_tokens: Some(512),
        },
    )
}

/// Render the suggested-Q&A prompt. Temperature 0.3, no output cap.
///
/// The instruction pins the output to exactly three `Qn:`/`An:` pairs so
/// downstream consumers can rely on a fixed textual shape. Q&A output is
/// deliberately uncapped — three questions with answers routinely exceed
/// the 512-token cap the other tasks use.
pub fn suggest_qa(document_text: &str) -> (String, GenerationParams) {
    let prompt = format!(
        "Based on this document, suggest 3 relevant questions and answer each \
         briefly:\n\
         Document:\n{}\n\n\
         Format exactly like this:\n\
         Q1: [Question 1]\n\
         A1: [Answer 1]\n\n\
         Q2: [Question 2]\n\
         A2: [Answer 2]\n\n\
         Q3: [Question 3]\n\
         A3: [Answer 3]",
        truncate_document(document_text)
    );
    (
        prompt,
        GenerationParams {
            temperature: 0.3,
            max_output_tokens: None,
        },
    )
}

/// Render the translation prompt. Temperature 0.3, max 512 tokens.
///
/// `text` is a previously *generated* output, not raw document text, so
/// the document bound does not apply — the input is already at most one
/// generation long.
pub fn translate(text: &str, language: TargetLanguage) -> (String, GenerationParams) {
    let prompt = format!(
        "Translate the following text into {}:\n\n{}",
        language.name(),
        text
    );
    (
        prompt,
        GenerationParams {
            temperature: 0.3,
            max_output_tokens: Some(512),
        },
    )
}
