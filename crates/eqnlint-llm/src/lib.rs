//! eqnlint Model Client Layer
//!
//! Rate-limited access to language-model backends.
//!
//! # Architecture
//!
//! ```text
//! ModelClient ──permit──► AsyncRateLimiter
//!      │
//!      └──exchange──► ModelBackend (OpenAiBackend | OllamaBackend | MockBackend)
//! ```
//!
//! A backend performs exactly one request/response exchange and shapes the
//! answer (fence stripping, stream concatenation). The client adds throttling
//! and usage metering on top. Failures are returned as [`LlmError`]; callers
//! decide whether a failed call is fatal.
//!
//! # Backends
//!
//! - `OpenAiBackend`: hosted chat-completions API
//! - `OllamaBackend`: local Ollama server, streamed responses (model ids prefixed `ollama:`)
//! - `MockBackend`: deterministic mock for testing
//!
//! # Examples
//!
//! ```
//! use eqnlint_llm::{MockBackend, ModelClient};
//!
//! # async fn example() -> Result<(), eqnlint_llm::LlmError> {
//! let client = ModelClient::new(Box::new(MockBackend::new("✅ CONSISTENT")), 2.0, 256);
//! let answer = client.complete("You audit units.", "Check: F = ma", &[]).await?;
//! assert_eq!(answer, "✅ CONSISTENT");
//! # Ok(())
//! # }
//! ```

#![warn(missing_docs)]

pub mod backend;
pub mod blocking;
pub mod client;
pub mod fence;
pub mod limiter;
pub mod metrics;
pub mod ollama;
pub mod openai;

use async_trait::async_trait;
use eqnlint_domain::Message;
use std::sync::{Arc, Mutex, MutexGuard, PoisonError};
use std::time::Duration;
use thiserror::Error;

pub use backend::{
    select_backend, BackendKind, BackendOptions, CompletionRequest, Exchange, ModelBackend, Usage,
    LOCAL_PREFIX,
};
pub use blocking::BlockingClient;
pub use client::ModelClient;
pub use fence::strip_code_fence;
pub use limiter::{AsyncRateLimiter, BlockingRateLimiter, Clock, ManualClock, PermitSchedule, SystemClock};
pub use metrics::UsageMeter;
pub use ollama::OllamaBackend;
pub use openai::OpenAiBackend;

/// Errors that can occur during model operations
#[derive(Error, Debug)]
pub enum LlmError {
    /// Network or API communication error
    #[error("Communication error: {0}")]
    Communication(String),

    /// Backend answered with a non-success HTTP status
    #[error("HTTP {status}: {body}")]
    Status {
        /// HTTP status code
        status: u16,
        /// Response body, if it could be read
        body: String,
    },

    /// Invalid response from the backend
    #[error("Invalid response: {0}")]
    InvalidResponse(String),

    /// Rate limit exceeded on the backend side
    #[error("Rate limit exceeded")]
    RateLimitExceeded,

    /// Model not available
    #[error("Model not available: {0}")]
    ModelNotAvailable(String),

    /// Missing or rejected credential
    #[error("Credential error: {0}")]
    Credential(String),

    /// Generic error
    #[error("LLM error: {0}")]
    Other(String),
}

impl From<reqwest::Error> for LlmError {
    fn from(e: reqwest::Error) -> Self {
        if e.is_timeout() {
            LlmError::Communication(format!("Request timed out: {}", e))
        } else if e.is_connect() {
            LlmError::Communication(format!("Connection failed: {}", e))
        } else if e.is_decode() {
            LlmError::InvalidResponse(e.to_string())
        } else {
            LlmError::Communication(format!("Request failed: {}", e))
        }
    }
}

pub(crate) fn lock<T>(mutex: &Mutex<T>) -> MutexGuard<'_, T> {
    mutex.lock().unwrap_or_else(PoisonError::into_inner)
}

/// A call captured by [`MockBackend`]
#[derive(Debug, Clone, PartialEq)]
pub struct RecordedCall {
    /// System instructions sent
    pub system: String,
    /// Few-shot turns sent
    pub few_shots: Vec<Message>,
    /// User prompt sent
    pub user: String,
    /// Output-length ceiling sent
    pub max_tokens: u32,
}

#[derive(Debug, Clone)]
enum MockReply {
    Text(String),
    Error,
}

/// Mock backend for deterministic testing
///
/// Returns pre-configured responses without making any network calls.
/// Scripted replies match when the user prompt contains the given needle;
/// the first matching rule wins.
///
/// # Examples
///
/// ```
/// use eqnlint_llm::{CompletionRequest, MockBackend, ModelBackend};
///
/// # async fn example() {
/// let mut backend = MockBackend::default();
/// backend.add_response("F = ma", "✅ CONSISTENT");
/// backend.add_error("E = m");
///
/// let request = CompletionRequest::new("sys", &[], "Check: F = ma", 100);
/// assert_eq!(backend.exchange(&request).await.unwrap().text, "✅ CONSISTENT");
///
/// let request = CompletionRequest::new("sys", &[], "Check: E = m + c", 100);
/// assert!(backend.exchange(&request).await.is_err());
/// assert_eq!(backend.call_count(), 2);
/// # }
/// ```
#[derive(Debug, Clone)]
pub struct MockBackend {
    default_response: String,
    rules: Arc<Mutex<Vec<(String, MockReply)>>>,
    calls: Arc<Mutex<Vec<RecordedCall>>>,
    shutdowns: Arc<Mutex<usize>>,
    latency: Option<Duration>,
    fail_shutdown: bool,
}

impl MockBackend {
    /// Create a mock that answers every prompt with a fixed response
    pub fn new(response: impl Into<String>) -> Self {
        Self {
            default_response: response.into(),
            rules: Arc::new(Mutex::new(Vec::new())),
            calls: Arc::new(Mutex::new(Vec::new())),
            shutdowns: Arc::new(Mutex::new(0)),
            latency: None,
            fail_shutdown: false,
        }
    }

    /// Answer prompts containing `needle` with `response`
    pub fn add_response(&mut self, needle: impl Into<String>, response: impl Into<String>) {
        lock(&self.rules).push((needle.into(), MockReply::Text(response.into())));
    }

    /// Fail prompts containing `needle`
    pub fn add_error(&mut self, needle: impl Into<String>) {
        lock(&self.rules).push((needle.into(), MockReply::Error));
    }

    /// Delay every exchange by `latency` (tokio time, so paused clocks apply)
    pub fn with_latency(mut self, latency: Duration) -> Self {
        self.latency = Some(latency);
        self
    }

    /// Make `shutdown` report a failure
    pub fn with_failing_shutdown(mut self) -> Self {
        self.fail_shutdown = true;
        self
    }

    /// Number of exchanges attempted
    pub fn call_count(&self) -> usize {
        lock(&self.calls).len()
    }

    /// All exchanges attempted, in order
    pub fn calls(&self) -> Vec<RecordedCall> {
        lock(&self.calls).clone()
    }

    /// Number of times `shutdown` was called
    pub fn shutdown_count(&self) -> usize {
        *lock(&self.shutdowns)
    }
}

impl Default for MockBackend {
    fn default() -> Self {
        Self::new("Default mock response")
    }
}

#[async_trait]
impl ModelBackend for MockBackend {
    fn name(&self) -> &str {
        "mock"
    }

    fn model(&self) -> &str {
        "mock"
    }

    async fn exchange(&self, request: &CompletionRequest<'_>) -> Result<Exchange, LlmError> {
        lock(&self.calls).push(RecordedCall {
            system: request.system.to_string(),
            few_shots: request.few_shots.to_vec(),
            user: request.user.to_string(),
            max_tokens: request.max_tokens,
        });

        if let Some(latency) = self.latency {
            tokio::time::sleep(latency).await;
        }

        let reply = lock(&self.rules)
            .iter()
            .find(|(needle, _)| request.user.contains(needle.as_str()))
            .map(|(_, reply)| reply.clone());

        match reply {
            Some(MockReply::Error) => Err(LlmError::Communication("Mock error".to_string())),
            Some(MockReply::Text(text)) => Ok(Exchange::text(text)),
            None => Ok(Exchange::text(self.default_response.clone())),
        }
    }

    async fn shutdown(&self) -> Result<(), LlmError> {
        *lock(&self.shutdowns) += 1;
        if self.fail_shutdown {
            return Err(LlmError::Other("Mock shutdown failure".to_string()));
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn request<'a>(user: &'a str) -> CompletionRequest<'a> {
        CompletionRequest::new("system", &[], user, 64)
    }

    #[tokio::test]
    async fn test_mock_backend_default() {
        let backend = MockBackend::new("Test response");
        let result = backend.exchange(&request("any prompt")).await.unwrap();
        assert_eq!(result.text, "Test response");
        assert!(result.usage.is_none());
    }

    #[tokio::test]
    async fn test_mock_backend_rules_match_by_substring() {
        let mut backend = MockBackend::default();
        backend.add_response("hello", "world");
        backend.add_response("foo", "bar");

        assert_eq!(backend.exchange(&request("say hello")).await.unwrap().text, "world");
        assert_eq!(backend.exchange(&request("foo!")).await.unwrap().text, "bar");
        assert_eq!(
            backend.exchange(&request("unknown")).await.unwrap().text,
            "Default mock response"
        );
    }

    #[tokio::test]
    async fn test_mock_backend_records_calls() {
        let backend = MockBackend::new("ok");
        let shots = [Message::user("u"), Message::assistant("a")];
        let request = CompletionRequest::new("sys", &shots, "prompt", 99);
        backend.exchange(&request).await.unwrap();

        let calls = backend.calls();
        assert_eq!(calls.len(), 1);
        assert_eq!(calls[0].system, "sys");
        assert_eq!(calls[0].few_shots.len(), 2);
        assert_eq!(calls[0].user, "prompt");
        assert_eq!(calls[0].max_tokens, 99);
    }

    #[tokio::test]
    async fn test_mock_backend_error() {
        let mut backend = MockBackend::default();
        backend.add_error("bad prompt");

        let result = backend.exchange(&request("a bad prompt")).await;
        assert!(matches!(result, Err(LlmError::Communication(_))));
    }

    #[tokio::test]
    async fn test_mock_backend_clone_shares_state() {
        let backend1 = MockBackend::new("test");
        let backend2 = backend1.clone();

        backend1.exchange(&request("test")).await.unwrap();
        backend1.shutdown().await.unwrap();

        assert_eq!(backend2.call_count(), 1);
        assert_eq!(backend2.shutdown_count(), 1);
    }

    #[tokio::test]
    async fn test_mock_backend_failing_shutdown() {
        let backend = MockBackend::default().with_failing_shutdown();
        assert!(backend.shutdown().await.is_err());
    }
}
