//! Rate-limited model client

use crate::{
    lock, select_backend, AsyncRateLimiter, BackendOptions, CompletionRequest, LlmError, ModelBackend,
    UsageMeter,
};
use eqnlint_domain::Message;
use std::sync::Mutex;
use tracing::{debug, info, warn};

/// Default output-length ceiling
pub const DEFAULT_MAX_TOKENS: u32 = 1200;

/// Client that throttles calls to one model backend
///
/// Every call takes a permit from the limiter before any network traffic,
/// so the spacing guarantee holds across backends and across failures.
pub struct ModelClient {
    backend: Box<dyn ModelBackend>,
    limiter: AsyncRateLimiter,
    max_tokens: u32,
    meter: Mutex<UsageMeter>,
}

impl ModelClient {
    /// Wrap an already constructed backend
    pub fn new(backend: Box<dyn ModelBackend>, rate: f64, max_tokens: u32) -> Self {
        Self {
            backend,
            limiter: AsyncRateLimiter::new(rate),
            max_tokens,
            meter: Mutex::new(UsageMeter::new()),
        }
    }

    /// Build the backend selected by `model_id` and wrap it
    ///
    /// # Errors
    ///
    /// Fails when the selected backend cannot be constructed, including a
    /// missing credential for hosted models.
    pub fn from_model_id(
        model_id: &str,
        rate: f64,
        max_tokens: u32,
        options: &BackendOptions,
    ) -> Result<Self, LlmError> {
        let backend = select_backend(model_id, options)?;
        info!(backend = backend.name(), model = backend.model(), rate, "Model client ready");
        Ok(Self::new(backend, rate, max_tokens))
    }

    /// Send one prompt and return the shaped answer
    ///
    /// `few_shots` are sent between the system instructions and `user`.
    /// Errors are returned to the caller; no retry is attempted.
    pub async fn complete(&self, system: &str, user: &str, few_shots: &[Message]) -> Result<String, LlmError> {
        self.limiter.permit().await;

        let request = CompletionRequest::new(system, few_shots, user, self.max_tokens);
        debug!(
            backend = self.backend.name(),
            few_shots = few_shots.len(),
            prompt_chars = user.len(),
            "Sending completion request"
        );

        match self.backend.exchange(&request).await {
            Ok(exchange) => {
                lock(&self.meter).record_success(exchange.usage);
                Ok(exchange.text)
            }
            Err(e) => {
                lock(&self.meter).record_failure();
                Err(e)
            }
        }
    }

    /// Change the call rate for subsequent calls
    pub async fn set_rate(&self, rate: f64) {
        self.limiter.set_rate(rate).await;
    }

    /// Backend name
    pub fn backend_name(&self) -> &str {
        self.backend.name()
    }

    /// Wire model name
    pub fn model(&self) -> &str {
        self.backend.model()
    }

    /// Output-length ceiling sent with each call
    pub fn max_tokens(&self) -> u32 {
        self.max_tokens
    }

    /// Usage counters so far
    pub fn usage(&self) -> UsageMeter {
        *lock(&self.meter)
    }

    /// Release the backend's connection handle
    ///
    /// Teardown is best-effort: a failure is logged and swallowed.
    pub async fn shutdown(self) {
        if let Err(e) = self.backend.shutdown().await {
            warn!(backend = self.backend.name(), error = %e, "Backend teardown failed");
        }
        info!(usage = %lock(&self.meter).summary(), "Model client closed");
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::MockBackend;
    use std::time::Duration;

    #[tokio::test]
    async fn test_complete_passes_request_through() {
        let backend = MockBackend::new("✅ CONSISTENT");
        let client = ModelClient::new(Box::new(backend.clone()), 100.0, 321);

        let shots = [Message::user("q"), Message::assistant("a")];
        let answer = client.complete("sys", "Check: F = ma", &shots).await.unwrap();

        assert_eq!(answer, "✅ CONSISTENT");
        let calls = backend.calls();
        assert_eq!(calls.len(), 1);
        assert_eq!(calls[0].system, "sys");
        assert_eq!(calls[0].few_shots, shots.to_vec());
        assert_eq!(calls[0].max_tokens, 321);
    }

    #[tokio::test]
    async fn test_complete_returns_backend_error() {
        let mut backend = MockBackend::default();
        backend.add_error("boom");
        let client = ModelClient::new(Box::new(backend), 100.0, 10);

        assert!(client.complete("sys", "boom", &[]).await.is_err());
        assert!(client.complete("sys", "fine", &[]).await.is_ok());

        let usage = client.usage();
        assert_eq!(usage.calls, 2);
        assert_eq!(usage.failures, 1);
    }

    #[tokio::test(start_paused = true)]
    async fn test_calls_are_spaced_by_rate() {
        let client = ModelClient::new(Box::new(MockBackend::default()), 0.5, 10);
        let start = tokio::time::Instant::now();

        client.complete("s", "one", &[]).await.unwrap();
        client.complete("s", "two", &[]).await.unwrap();

        let elapsed = start.elapsed();
        assert!(elapsed >= Duration::from_secs(2), "elapsed {:?}", elapsed);
        assert!(elapsed < Duration::from_millis(2010), "elapsed {:?}", elapsed);
    }

    #[tokio::test(start_paused = true)]
    async fn test_failures_still_consume_permits() {
        let mut backend = MockBackend::default();
        backend.add_error("fail");
        let client = ModelClient::new(Box::new(backend), 1.0, 10);
        let start = tokio::time::Instant::now();

        let _ = client.complete("s", "fail", &[]).await;
        client.complete("s", "ok", &[]).await.unwrap();

        assert!(start.elapsed() >= Duration::from_secs(1));
    }

    #[tokio::test]
    async fn test_shutdown_swallows_teardown_failure() {
        let backend = MockBackend::default().with_failing_shutdown();
        let client = ModelClient::new(Box::new(backend.clone()), 1.0, 10);

        client.shutdown().await;
        assert_eq!(backend.shutdown_count(), 1);
    }

    #[test]
    fn test_from_model_id_without_credential() {
        let result = ModelClient::from_model_id("gpt-4o-mini", 1.0, 10, &BackendOptions::default());
        assert!(matches!(result, Err(LlmError::Credential(_))));
    }

    #[test]
    fn test_from_model_id_local() {
        let client = ModelClient::from_model_id("ollama:phi", 1.0, 10, &BackendOptions::default()).unwrap();
        assert_eq!(client.backend_name(), "ollama");
        assert_eq!(client.model(), "phi");
        assert_eq!(client.max_tokens(), 10);
    }
}
