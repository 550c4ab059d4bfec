//! Generation client: the retry decorator around the backend.
//!
//! Every generation call in the pipeline goes through
//! [`GenerationClient::generate`] — it is the single call-site for the
//! backend, and the only place retry lives. The client owns its
//! [`RetryPolicy`] from construction; it deliberately does **not**
//! implement [`GenerationBackend`], so stacking a second retry layer on
//! top of the first is unrepresentable rather than a runtime check.
//!
//! ## Retry strategy
//!
//! Only failures classified transient by [`BackendError::is_transient`]
//! (HTTP 429/503) are retried. Backoff doubles per attempt from
//! `base_delay_ms`, is capped at `max_delay_ms`, and is scaled by a
//! random factor in `[1 - jitter, 1 + jitter]` so concurrent tasks do not
//! hammer a recovering backend in lockstep.

use crate::config::RetryPolicy;
use crate::error::GenerationError;
use crate::pipeline::backend::{BackendError, GenerationBackend, GenerationParams};
use rand::Rng;
use std::sync::Arc;
use std::time::Duration;
use tokio::time::sleep;
use tracing::warn;

/// Retrying wrapper around a shared [`GenerationBackend`].
///
/// Cheap to clone; all clones share the same backend connection pool.
#[derive(Clone)]
pub struct GenerationClient {
    backend: Arc<dyn GenerationBackend>,
    retry: RetryPolicy,
}

impl GenerationClient {
    /// Wrap `backend` with `retry`. The policy is fixed for the lifetime
    /// of the client.
    pub fn new(backend: Arc<dyn GenerationBackend>, retry: RetryPolicy) -> Self {
        Self { backend, retry }
    }

    /// Issue one generation call, retrying transient failures.
    ///
    /// Returns the backend's text on success. Permanent failures
    /// propagate after exactly one attempt; transient failures are
    /// retried up to `retry.max_attempts` total attempts, after which the
    /// last error surfaces as [`GenerationError::RetriesExhausted`].
    pub async fn generate(
        &self,
        prompt: &str,
        params: &GenerationParams,
    ) -> Result<String, GenerationError> {
        let max_attempts = self.retry.max_attempts;
        let mut last_transient: Option<(u16, String)> = None;

        for attempt in 1..=max_attempts {
            if attempt > 1 {
                let delay = self.backoff_delay(attempt - 1);
                warn!(
                    backend = self.backend.name(),
                    attempt,
                    max_attempts,
                    delay_ms = delay.as_millis() as u64,
                    "retrying transient backend failure"
                );
                sleep(delay).await;
            }

            match self.backend.generate(prompt, params).await {
                Ok(text) => return Ok(text),
                Err(e) if e.is_transient() => {
                    warn!(
                        backend = self.backend.name(),
                        attempt,
                        error = %e,
                        "transient backend failure"
                    );
                    last_transient = match e {
                        BackendError::Status { status, message } => Some((status, message)),
                        other => return Err(permanent(other)),
                    };
                }
                Err(e) => return Err(permanent(e)),
            }
        }

        // Budget exhausted on transient codes: terminal now.
        let (status, message) =
            last_transient.unwrap_or((503, "retry budget exhausted".into()));
        Err(GenerationError::RetriesExhausted {
            attempts: max_attempts,
            status,
            message,
        })
    }

    /// Delay before retry number `retry_index` (1-based).
    fn backoff_delay(&self, retry_index: u32) -> Duration {
        let exp = self
            .retry
            .base_delay_ms
            .saturating_mul(1u64 << (retry_index - 1).min(16))
            .min(self.retry.max_delay_ms);

        let factor = if self.retry.jitter > 0.0 {
            let j = self.retry.jitter;
            rand::thread_rng().gen_range(1.0 - j..=1.0 + j)
        } else {
            1.0
        };

        Duration::from_millis((exp as f64 * factor) as u64)
    }
}

/// Map a non-retried backend failure to its terminal form.
fn permanent(e: BackendError) -> GenerationError {
    match e {
        BackendError::Status { status, message } => GenerationError::Backend { status, message },
        BackendError::Transport { reason } => GenerationError::Transport { reason },
        BackendError::Empty { detail } => GenerationError::EmptyResponse { detail },
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use async_trait::async_trait;
    use std::sync::atomic::{AtomicU32, Ordering};
    use std::sync::Mutex;

    /// Backend that plays back a script of failures before succeeding.
    struct ScriptedBackend {
        script: Mutex<Vec<Result<String, BackendError>>>,
        attempts: AtomicU32,
    }

    impl ScriptedBackend {
        fn new(script: Vec<Result<String, BackendError>>) -> Arc<Self> {
            Arc::new(Self {
                script: Mutex::new(script),
                attempts: AtomicU32::new(0),
            })
        }

        fn attempts(&self) -> u32 {
            self.attempts.load(Ordering::SeqCst)
        }
    }

    #[async_trait]
    impl GenerationBackend for ScriptedBackend {
        async fn generate(
            &self,
            _prompt: &str,
            _params: &GenerationParams,
        ) -> Result<String, BackendError> {
            self.attempts.fetch_add(1, Ordering::SeqCst);
            let mut script = self.script.lock().unwrap();
            if script.is_empty() {
                Ok("ok".into())
            } else {
                script.remove(0)
            }
        }

        fn name(&self) -> &str {
            "scripted"
        }
    }

    fn fast_policy() -> RetryPolicy {
        RetryPolicy {
            max_attempts: 4,
            base_delay_ms: 1,
            max_delay_ms: 4,
            jitter: 0.0,
        }
    }

    fn rate_limited() -> BackendError {
        BackendError::Status {
            status: 429,
            message: "slow down".into(),
        }
    }

    const PARAMS: GenerationParams = GenerationParams {
        temperature: 0.5,
        max_output_tokens: Some(512),
    };

    #[tokio::test]
    async fn two_transient_failures_then_success_takes_three_attempts() {
        let backend = ScriptedBackend::new(vec![
            Err(rate_limited()),
            Err(rate_limited()),
            Ok("answer".into()),
        ]);
        let client = GenerationClient::new(backend.clone(), fast_policy());

        let text = client.generate("p", &PARAMS).await.unwrap();
        assert_eq!(text, "answer");
        assert_eq!(backend.attempts(), 3);
    }

    #[tokio::test]
    async fn permanent_failure_takes_exactly_one_attempt() {
        let backend = ScriptedBackend::new(vec![Err(BackendError::Status {
            status: 400,
            message: "bad request".into(),
        })]);
        let client = GenerationClient::new(backend.clone(), fast_policy());

        let err = client.generate("p", &PARAMS).await.unwrap_err();
        assert!(matches!(
            err,
            GenerationError::Backend { status: 400, .. }
        ));
        assert_eq!(backend.attempts(), 1);
    }

    #[tokio::test]
    async fn exhaustion_surfaces_last_transient_error_with_attempt_count() {
        let backend = ScriptedBackend::new(vec![
            Err(rate_limited()),
            Err(rate_limited()),
            Err(rate_limited()),
            Err(BackendError::Status {
                status: 503,
                message: "unavailable".into(),
            }),
        ]);
        let client = GenerationClient::new(backend.clone(), fast_policy());

        let err = client.generate("p", &PARAMS).await.unwrap_err();
        match err {
            GenerationError::RetriesExhausted {
                attempts,
                status,
                message,
            } => {
                assert_eq!(attempts, 4);
                assert_eq!(status, 503);
                assert_eq!(message, "unavailable");
            }
            other => panic!("expected RetriesExhausted, got {other:?}"),
        }
        assert_eq!(backend.attempts(), 4);
    }

    #[tokio::test]
    async fn transport_failures_are_not_retried() {
        let backend = ScriptedBackend::new(vec![Err(BackendError::Transport {
            reason: "connection refused".into(),
        })]);
        let client = GenerationClient::new(backend.clone(), fast_policy());

        let err = client.generate("p", &PARAMS).await.unwrap_err();
        assert!(matches!(err, GenerationError::Transport { .. }));
        assert_eq!(backend.attempts(), 1);
    }

    #[tokio::test]
    async fn clients_do_not_compound_retries() {
        // Two clients over the same backend: each call path carries one
        // retry layer, so the attempt count matches a single client's.
        let backend = ScriptedBackend::new(vec![
            Err(rate_limited()),
            Err(rate_limited()),
            Ok("first".into()),
            Err(rate_limited()),
            Err(rate_limited()),
            Ok("second".into()),
        ]);
        let one = GenerationClient::new(backend.clone(), fast_policy());
        let two = GenerationClient::new(backend.clone(), fast_policy());

        one.generate("p", &PARAMS).await.unwrap();
        assert_eq!(backend.attempts(), 3);

        two.generate("p", &PARAMS).await.unwrap();
        assert_eq!(backend.attempts(), 6);
    }

    #[test]
    fn backoff_doubles_and_caps_without_jitter() {
        let client = GenerationClient::new(
            ScriptedBackend::new(vec![]),
            RetryPolicy {
                max_attempts: 6,
                base_delay_ms: 100,
                max_delay_ms: 350,
                jitter: 0.0,
            },
        );
        assert_eq!(client.backoff_delay(1), Duration::from_millis(100));
        assert_eq!(client.backoff_delay(2), Duration::from_millis(200));
        assert_eq!(client.backoff_delay(3), Duration::from_millis(350));
        assert_eq!(client.backoff_delay(4), Duration::from_millis(350));
    }

    #[test]
    fn backoff_jitter_stays_within_band() {
        let client = GenerationClient::new(
            ScriptedBackend::new(vec![]),
            RetryPolicy {
                max_attempts: 4,
                base_delay_ms: 1000,
                max_delay_ms: 10_000,
                jitter: 0.25,
            },
        );
        for _ in 0..100 {
            let d = client.backoff_delay(1).as_millis() as u64;
            assert!((750..=1250).contains(&d), "delay {d}ms outside jitter band");
        }
    }
}
