//! Generation backend: the trait seam and the Gemini implementation.
//!
//! The pipeline talks to exactly one abstraction, [`GenerationBackend`].
//! Keeping it object-safe and minimal (one method, text in → text out)
//! means tests inject scripted fakes and hosts can wrap the production
//! backend with middleware without touching pipeline code.
//!
//! [`GeminiBackend`] is the production implementation: the Gemini
//! `generateContent` REST API over `reqwest`. The credential is injected
//! at construction — this module never reads the environment, and a blank
//! key fails here, before any network call.

use crate::error::AuthConfigurationError;
use async_trait::async_trait;
use serde::{Deserialize, Serialize};
use std::time::Duration;
use thiserror::Error;
use tracing::debug;

/// Generation parameters for one backend call.
///
/// Constructed fresh per call by the prompt builders in
/// [`crate::prompts`]; never mutated.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct GenerationParams {
    /// Sampling temperature.
    pub temperature: f32,

    /// Maximum tokens the backend may generate. `None` means no cap.
    pub max_output_tokens: Option<u32>,
}

/// A single backend call failed.
///
/// Carries enough structure for the retry layer to classify the failure;
/// see [`BackendError::is_transient`].
#[derive(Debug, Clone, Error)]
pub enum BackendError {
    /// The backend answered with a non-success HTTP status.
    #[error("HTTP {status}: {message}")]
    Status { status: u16, message: String },

    /// The request never produced an HTTP response.
    #[error("transport failure: {reason}")]
    Transport { reason: String },

    /// The backend answered 200 but no generated text could be read
    /// from the body.
    #[error("empty response: {detail}")]
    Empty { detail: String },
}

impl BackendError {
    /// Transient failures may succeed if retried: rate limiting (429) and
    /// temporary unavailability (503). Everything else — auth failures,
    /// malformed requests, permanent quota exhaustion, transport and
    /// parse failures — is permanent and propagates after one attempt.
    pub fn is_transient(&self) -> bool {
        matches!(
            self,
            BackendError::Status {
                status: 429 | 503,
                ..
            }
        )
    }

    /// HTTP status code, if the failure carries one.
    pub fn status(&self) -> Option<u16> {
        match self {
            BackendError::Status { status, .. } => Some(*status),
            _ => None,
        }
    }
}

/// The single outbound seam of the pipeline.
///
/// Implementations must be safe for concurrent use: one instance is
/// shared by every in-flight request via `Arc`.
#[async_trait]
pub trait GenerationBackend: Send + Sync {
    /// Generate text for one fully rendered prompt.
    async fn generate(
        &self,
        prompt: &str,
        params: &GenerationParams,
    ) -> Result<String, BackendError>;

    /// Human-readable backend name for logs.
    fn name(&self) -> &str;
}

// ── Gemini implementation ────────────────────────────────────────────────

const GEMINI_BASE_URL: &str = "https://generativelanguage.googleapis.com/v1beta";

/// Gemini `generateContent` backend.
///
/// One instance holds one `reqwest::Client` (connection pool) and one
/// credential; share it across requests with `Arc`.
pub struct GeminiBackend {
    client: reqwest::Client,
    api_key: String,
    model: String,
    base_url: String,
}

impl GeminiBackend {
    /// Create a backend with an injected credential.
    ///
    /// Fails with [`AuthConfigurationError`] when the key is blank, so a
    /// misconfigured host is caught before the first network call.
    pub fn new(
        api_key: impl Into<String>,
        model: impl Into<String>,
        api_timeout_secs: u64,
    ) -> Result<Self, AuthConfigurationError> {
        let api_key = api_key.into();
        if api_key.trim().is_empty() {
            return Err(AuthConfigurationError);
        }
        let client = reqwest::Client::builder()
            .timeout(Duration::from_secs(api_timeout_secs))
            .build()
            .expect("reqwest client with static configuration");
        Ok(Self {
            client,
            api_key,
            model: model.into(),
            base_url: GEMINI_BASE_URL.to_string(),
        })
    }

    /// Point the backend at a different base URL (proxies, test servers).
    pub fn with_base_url(mut self, base_url: impl Into<String>) -> Self {
        self.base_url = base_url.into();
        self
    }
}

#[async_trait]
impl GenerationBackend for GeminiBackend {
    async fn generate(
        &self,
        prompt: &str,
        params: &GenerationParams,
    ) -> Result<String, BackendError> {
        let url = format!(
            "{}/models/{}:generateContent",
            self.base_url, self.model
        );
        let body = GenerateContentRequest {
            contents: vec![Content {
                parts: vec![Part { text: prompt }],
            }],
            generation_config: GenerationConfig {
                temperature: params.temperature,
                max_output_tokens: params.max_output_tokens,
            },
        };

        debug!(model = %self.model, prompt_chars = prompt.len(), "generateContent request");

        let response = self
            .client
            .post(&url)
            .header("x-goog-api-key", &self.api_key)
            .json(&body)
            .send()
            .await
            .map_err(|e| BackendError::Transport {
                reason: e.to_string(),
            })?;

        let status = response.status();
        let text = response.text().await.map_err(|e| BackendError::Transport {
            reason: format!("reading response body: {e}"),
        })?;

        if !status.is_success() {
            return Err(BackendError::Status {
                status: status.as_u16(),
                message: error_message_from_body(&text),
            });
        }

        parse_generated_text(&text)
    }

    fn name(&self) -> &str {
        "gemini"
    }
}

// ── Wire types ───────────────────────────────────────────────────────────

#[derive(Serialize)]
struct GenerateContentRequest<'a> {
    contents: Vec<Content<'a>>,
    #[serde(rename = "generationConfig")]
    generation_config: GenerationConfig,
}

#[derive(Serialize)]
struct Content<'a> {
    parts: Vec<Part<'a>>,
}

#[derive(Serialize)]
struct Part<'a> {
    text: &'a str,
}

#[derive(Serialize)]
struct GenerationConfig {
    temperature: f32,
    #[serde(rename = "maxOutputTokens", skip_serializing_if = "Option::is_none")]
    max_output_tokens: Option<u32>,
}

#[derive(Deserialize)]
struct GenerateContentResponse {
    #[serde(default)]
    candidates: Vec<ResponseCandidate>,
}

#[derive(Deserialize)]
struct ResponseCandidate {
    content: Option<ResponseContent>,
}

#[derive(Deserialize)]
struct ResponseContent {
    #[serde(default)]
    parts: Vec<ResponsePart>,
}

#[derive(Deserialize)]
struct ResponsePart {
    text: Option<String>,
}

/// Pull the generated text out of a 200-status response body.
fn parse_generated_text(body: &str) -> Result<String, BackendError> {
    let parsed: GenerateContentResponse =
        serde_json::from_str(body).map_err(|e| BackendError::Empty {
            detail: format!("unparseable body: {e}"),
        })?;

    let text: String = parsed
        .candidates
        .into_iter()
        .filter_map(|c| c.content)
        .flat_map(|c| c.parts)
        .filter_map(|p| p.text)
        .collect();

    if text.is_empty() {
        return Err(BackendError::Empty {
            detail: "no text parts in any candidate".into(),
        });
    }
    Ok(text)
}

/// Best-effort extraction of the API error message from an error body.
///
/// Falls back to the raw (truncated) body when it is not the documented
/// `{"error": {"message": ...}}` shape.
fn error_message_from_body(body: &str) -> String {
    serde_json::from_str::<serde_json::Value>(body)
        .ok()
        .and_then(|v| {
            v.get("error")?
                .get("message")?
                .as_str()
                .map(str::to_string)
        })
        .unwrap_or_else(|| body.chars().take(200).collect())
}
