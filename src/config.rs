//! Configuration types for the document-assistant pipeline.
//!
//! All pipeline behaviour is controlled through [`PipelineConfig`], built
//! via its [`PipelineConfigBuilder`]. Keeping every knob in one struct
//! makes it trivial to share configs across tasks and to diff two runs to
//! understand why their outputs differ.
//!
//! # Design choice: builder over constructor
//! The builder lets callers set only what they care about and rely on
//! documented defaults for the rest; `build()` validates the combination
//! once instead of every call site re-checking.

use crate::error::{AskDocsError, UnsupportedLanguageError};
use crate::pipeline::backend::GenerationBackend;
use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;
use std::sync::Arc;

/// Default Gemini model used when the caller does not pick one.
pub const DEFAULT_MODEL: &str = "gemini-2.0-flash";

/// Configuration for one or more pipeline runs.
///
/// Built via [`PipelineConfig::builder()`] or [`PipelineConfig::default()`].
///
/// # Example
/// ```rust
/// use askdocs::PipelineConfig;
///
/// let config = PipelineConfig::builder()
///     .api_key("AIza...")
///     .model("gemini-2.0-flash")
///     .build()
///     .unwrap();
/// ```
#[derive(Clone)]
pub struct PipelineConfig {
    /// Pre-constructed generation backend. Takes precedence over `api_key`.
    ///
    /// Useful in tests or when the caller needs custom middleware
    /// (caching, rate-limiting) around the backend.
    pub backend: Option<Arc<dyn GenerationBackend>>,

    /// Backend API credential, injected by the host program.
    ///
    /// Resolution of the value (environment variable, secret store) is the
    /// caller's responsibility. Ignored when `backend` is set. A blank key
    /// fails at first use with [`crate::AuthConfigurationError`], before
    /// any network call.
    pub api_key: Option<String>,

    /// Generation model identifier. Default: [`DEFAULT_MODEL`].
    pub model: String,

    /// Retry policy applied to every generation call. See [`RetryPolicy`].
    pub retry: RetryPolicy,

    /// Download timeout for URL inputs in seconds. Default: 120.
    pub download_timeout_secs: u64,

    /// Per-backend-call timeout in seconds. Default: 60.
    pub api_timeout_secs: u64,
}

impl Default for PipelineConfig {
    fn default() -> Self {
        Self {
            backend: None,
            api_key: None,
            model: DEFAULT_MODEL.to_string(),
            retry: RetryPolicy::default(),
            download_timeout_secs: 120,
            api_timeout_secs: 60,
        }
    }
}

impl fmt::Debug for PipelineConfig {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("PipelineConfig")
            .field("backend", &self.backend.as_ref().map(|_| "<dyn GenerationBackend>"))
            .field("api_key", &self.api_key.as_ref().map(|_| "<redacted>"))
            .field("model", &self.model)
            .field("retry", &self.retry)
            .field("download_timeout_secs", &self.download_timeout_secs)
            .field("api_timeout_secs", &self.api_timeout_secs)
            .finish()
    }
}

impl PipelineConfig {
    /// Create a new builder for `PipelineConfig`.
    pub fn builder() -> PipelineConfigBuilder {
        PipelineConfigBuilder {
            config: Self::default(),
        }
    }
}

/// Builder for [`PipelineConfig`].
#[derive(Debug)]
pub struct PipelineConfigBuilder {
    config: PipelineConfig,
}

impl PipelineConfigBuilder {
    pub fn backend(mut self, backend: Arc<dyn GenerationBackend>) -> Self {
        self.config.backend = Some(backend);
        self
    }

    pub fn api_key(mut self, key: impl Into<String>) -> Self {
        self.config.api_key = Some(key.into());
        self
    }

    pub fn model(mut self, model: impl Into<String>) -> Self {
        self.config.model = model.into();
        self
    }

    pub fn retry(mut self, policy: RetryPolicy) -> Self {
        self.config.retry = policy;
        self
    }

    pub fn download_timeout_secs(mut self, secs: u64) -> Self {
        self.config.download_timeout_secs = secs;
        self
    }

    pub fn api_timeout_secs(mut self, secs: u64) -> Self {
        self.config.api_timeout_secs = secs;
        self
    }

    /// Build the configuration, validating constraints.
    pub fn build(self) -> Result<PipelineConfig, AskDocsError> {
        let c = &self.config;
        if c.model.is_empty() {
            return Err(AskDocsError::InvalidConfig("Model must not be empty".into()));
        }
        c.retry.validate()?;
        Ok(self.config)
    }
}

/// Retry policy for transient backend failures (HTTP 429/503).
///
/// Backoff for attempt *n* (first retry is *n* = 1) is
/// `base_delay_ms * 2^(n-1)`, capped at `max_delay_ms`, then multiplied by
/// a random factor in `[1 - jitter, 1 + jitter]`. The jitter spreads out
/// concurrent retries so they do not land on a recovering backend in the
/// same instant.
#[derive(Debug, Clone, Copy, Serialize, Deserialize)]
pub struct RetryPolicy {
    /// Total attempts, including the first. Default: 4.
    pub max_attempts: u32,

    /// Initial retry delay in milliseconds. Default: 500.
    pub base_delay_ms: u64,

    /// Upper bound on a single delay in milliseconds. Default: 8000.
    pub max_delay_ms: u64,

    /// Relative jitter, `0.0 ≤ jitter < 1.0`. Default: 0.25.
    pub jitter: f64,
}

impl Default for RetryPolicy {
    fn default() -> Self {
        Self {
            max_attempts: 4,
            base_delay_ms: 500,
            max_delay_ms: 8000,
            jitter: 0.25,
        }
    }
}

impl RetryPolicy {
    /// A policy that never retries. Handy in tests and latency-sensitive hosts.
    pub fn no_retries() -> Self {
        Self {
            max_attempts: 1,
            ..Self::default()
        }
    }

    pub(crate) fn validate(&self) -> Result<(), AskDocsError> {
        if self.max_attempts == 0 {
            return Err(AskDocsError::InvalidConfig(
                "retry.max_attempts must be ≥ 1".into(),
            ));
        }
        if !(0.0..1.0).contains(&self.jitter) {
            return Err(AskDocsError::InvalidConfig(format!(
                "retry.jitter must be in [0, 1), got {}",
                self.jitter
            )));
        }
        Ok(())
    }
}

// ── Target languages ─────────────────────────────────────────────────────

/// The enumerated set of translation targets.
///
/// Parsing is case-insensitive (`"english"`, `"English"`, `"ENGLISH"` all
/// resolve to [`TargetLanguage::English`]). Anything outside the set is
/// rejected with [`UnsupportedLanguageError`] *before* a generation call
/// is issued — a misspelled language never reaches the backend as a
/// translation instruction.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub enum TargetLanguage {
    #[default]
    English,
    Chinese,
    Spanish,
    French,
    German,
    Japanese,
    Korean,
}

impl TargetLanguage {
    /// All supported languages, in display order.
    pub const ALL: [TargetLanguage; 7] = [
        TargetLanguage::English,
        TargetLanguage::Chinese,
        TargetLanguage::Spanish,
        TargetLanguage::French,
        TargetLanguage::German,
        TargetLanguage::Japanese,
        TargetLanguage::Korean,
    ];

    /// Canonical English name, as embedded in translation prompts.
    pub fn name(&self) -> &'static str {
        match self {
            TargetLanguage::English => "English",
            TargetLanguage::Chinese => "Chinese",
            TargetLanguage::Spanish => "Spanish",
            TargetLanguage::French => "French",
            TargetLanguage::German => "German",
            TargetLanguage::Japanese => "Japanese",
            TargetLanguage::Korean => "Korean",
        }
    }

    /// English is the passthrough language: outputs are returned as
    /// generated, with no translation calls.
    pub fn is_english(&self) -> bool {
        matches!(self, TargetLanguage::English)
    }
}

impl fmt::Display for TargetLanguage {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

impl FromStr for TargetLanguage {
    type Err = UnsupportedLanguageError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "english" => Ok(TargetLanguage::English),
            "chinese" => Ok(TargetLanguage::Chinese),
            "spanish" => Ok(TargetLanguage::Spanish),
            "french" => Ok(TargetLanguage::French),
            "german" => Ok(TargetLanguage::German),
            "japanese" => Ok(TargetLanguage::Japanese),
            "korean" => Ok(TargetLanguage::Korean),
            _ => Err(UnsupportedLanguageError {
                language: s.to_string(),
            }),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn language_parse_is_case_insensitive() {
        assert_eq!(
            "ENGLISH".parse::<TargetLanguage>().unwrap(),
            TargetLanguage::English
        );
        assert_eq!(
            "french".parse::<TargetLanguage>().unwrap(),
            TargetLanguage::French
        );
        assert_eq!(
            " Spanish ".parse::<TargetLanguage>().unwrap(),
            TargetLanguage::Spanish
        );
    }

    #[test]
    fn unknown_language_is_rejected() {
        let err = "Klingon".parse::<TargetLanguage>().unwrap_err();
        assert_eq!(err.language, "Klingon");
    }

    #[test]
    fn only_english_is_passthrough() {
        assert!(TargetLanguage::English.is_english());
        for lang in TargetLanguage::ALL {
            if lang != TargetLanguage::English {
                assert!(!lang.is_english(), "{lang} must not be passthrough");
            }
        }
    }

    #[test]
    fn builder_rejects_zero_attempts() {
        let result = PipelineConfig::builder()
            .retry(RetryPolicy {
                max_attempts: 0,
                ..RetryPolicy::default()
            })
            .build();
        assert!(result.is_err());
    }

    #[test]
    fn builder_rejects_out_of_range_jitter() {
        let result = PipelineConfig::builder()
            .retry(RetryPolicy {
                jitter: 1.5,
                ..RetryPolicy::default()
            })
            .build();
        assert!(result.is_err());
    }

    #[test]
    fn debug_redacts_api_key() {
        let config = PipelineConfig::builder()
            .api_key("super-secret")
            .build()
            .unwrap();
        let repr = format!("{config:?}");
        assert!(!repr.contains("super-secret"));
        assert!(repr.contains("redacted"));
    }
}
