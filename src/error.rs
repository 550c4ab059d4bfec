//! Error types for the askdocs library.
//!
//! Failures are split along the pipeline's stage boundaries:
//!
//! * [`ExtractionError`] — the document could not be read or parsed.
//!   Raised before any generation call is attempted, never retried.
//!
//! * [`GenerationError`] — a backend call failed terminally: either a
//!   permanent error code came back on the first attempt, or a transient
//!   code (429/503) kept coming back until the retry budget ran out.
//!
//! * [`AuthConfigurationError`] — no usable backend credential. Raised at
//!   backend construction, before the first network call.
//!
//! * [`UnsupportedLanguageError`] — the requested target language is not
//!   in the supported set. Raised at the pipeline boundary.
//!
//! [`AskDocsError`] is the sum of all of these and the only error type
//! returned by [`crate::process`]. A request either yields a complete
//! [`crate::PipelineResult`] or exactly one of these errors — there are
//! no partially filled results.

use std::path::PathBuf;
use thiserror::Error;

/// The document could not be turned into text.
///
/// Every variant means zero generation calls were issued for the request.
#[derive(Debug, Error)]
pub enum ExtractionError {
    /// Input file was not found at the given path.
    #[error("Document not found: '{path}'\nCheck the path exists and is readable.")]
    FileNotFound { path: PathBuf },

    /// Process does not have read permission on the file.
    #[error("Permission denied reading '{path}'\nTry: chmod +r {path:?}")]
    PermissionDenied { path: PathBuf },

    /// The file exists and was read, but is not a PDF.
    #[error("File is not a valid PDF: '{source_name}'\nFirst bytes: {magic:?}")]
    NotAPdf { source_name: String, magic: [u8; 4] },

    /// HTTP URL was syntactically valid but download failed.
    #[error("Failed to download '{url}': {reason}\nCheck your internet connection.")]
    DownloadFailed { url: String, reason: String },

    /// Download exceeded the configured timeout.
    #[error("Download timed out after {secs}s for '{url}'")]
    DownloadTimeout { url: String, secs: u64 },

    /// PDF structure is corrupt and cannot be parsed.
    #[error("Document '{source_name}' is corrupt: {detail}\nTry repairing with: qpdf --decrypt input.pdf output.pdf")]
    CorruptDocument { source_name: String, detail: String },

    /// Encrypted documents are not supported; the page text is not readable.
    #[error("Document '{source_name}' is encrypted; decrypt it before processing.")]
    Encrypted { source_name: String },

    /// The document has no pages at all.
    #[error("Document '{source_name}' has an empty page tree")]
    EmptyPageTree { source_name: String },

    /// Every page failed to yield text; the document is likely scanned images.
    #[error("No extractable text in any of the {pages} pages of '{source_name}'.\nScanned documents need OCR, which this tool does not perform.")]
    NoExtractableText { source_name: String, pages: usize },
}

/// A generation call failed terminally.
///
/// Transient backend errors (HTTP 429/503) are retried inside
/// [`crate::GenerationClient`] and never surface here unless the retry
/// budget is exhausted.
#[derive(Debug, Error)]
pub enum GenerationError {
    /// The backend returned a permanent error code. Not retried.
    #[error("Generation backend error (HTTP {status}): {message}")]
    Backend { status: u16, message: String },

    /// The backend kept returning transient errors until the retry budget
    /// ran out. The last error is preserved verbatim.
    #[error("Generation failed after {attempts} attempts; last error: HTTP {status}: {message}")]
    RetriesExhausted {
        attempts: u32,
        status: u16,
        message: String,
    },

    /// The request never reached the backend (connection refused, DNS, TLS).
    #[error("Could not reach generation backend: {reason}")]
    Transport { reason: String },

    /// The backend answered 200 but the response body carried no text.
    #[error("Generation backend returned an empty response: {detail}")]
    EmptyResponse { detail: String },
}

/// No usable backend credential was available.
///
/// Credential *resolution* (environment variable, secret store) is the
/// host program's job; this error only reports that whatever was handed
/// to the backend constructor is unusable.
#[derive(Debug, Error)]
#[error("No generation backend credential configured.\nPass a non-empty API key (the askdocs CLI reads GEMINI_API_KEY).")]
pub struct AuthConfigurationError;

/// The requested target language is outside the supported set.
#[derive(Debug, Error)]
#[error("Unsupported target language '{language}'.\nSupported: English, Chinese, Spanish, French, German, Japanese, Korean.")]
pub struct UnsupportedLanguageError {
    pub language: String,
}

/// All errors returned by [`crate::process`].
#[derive(Debug, Error)]
pub enum AskDocsError {
    #[error(transparent)]
    Extraction(#[from] ExtractionError),

    #[error(transparent)]
    Generation(#[from] GenerationError),

    #[error(transparent)]
    AuthConfiguration(#[from] AuthConfigurationError),

    #[error(transparent)]
    UnsupportedLanguage(#[from] UnsupportedLanguageError),

    /// Builder validation failed.
    #[error("Invalid configuration: {0}")]
    InvalidConfig(String),
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn no_extractable_text_display() {
        let e = ExtractionError::NoExtractableText {
            source_name: "scan.pdf".into(),
            pages: 12,
        };
        let msg = e.to_string();
        assert!(msg.contains("12 pages"), "got: {msg}");
        assert!(msg.contains("scan.pdf"));
    }

    #[test]
    fn retries_exhausted_display() {
        let e = GenerationError::RetriesExhausted {
            attempts: 4,
            status: 429,
            message: "rate limited".into(),
        };
        let msg = e.to_string();
        assert!(msg.contains("4 attempts"), "got: {msg}");
        assert!(msg.contains("429"));
    }

    #[test]
    fn unsupported_language_display() {
        let e = UnsupportedLanguageError {
            language: "Klingon".into(),
        };
        assert!(e.to_string().contains("Klingon"));
        assert!(e.to_string().contains("Korean"));
    }

    #[test]
    fn top_level_error_is_transparent() {
        let e: AskDocsError = AuthConfigurationError.into();
        assert!(e.to_string().contains("GEMINI_API_KEY"));
    }
}
