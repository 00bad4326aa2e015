//! Blocking model client
//!
//! For callers that do not run inside an async runtime. Owns a private
//! current-thread runtime to drive the backend's exchange, and throttles with
//! a [`BlockingRateLimiter`]. Must not be constructed or dropped from inside
//! another tokio runtime.

use crate::{BlockingRateLimiter, Clock, CompletionRequest, LlmError, ModelBackend, SystemClock};
use eqnlint_domain::{CompletionProvider, Message};

/// Rate-limited client for blocking callers
pub struct BlockingClient<C: Clock = SystemClock> {
    runtime: tokio::runtime::Runtime,
    limiter: BlockingRateLimiter<C>,
    backend: Box<dyn ModelBackend>,
    max_tokens: u32,
}

impl BlockingClient<SystemClock> {
    /// Wrap a backend, throttled on the wall clock
    pub fn new(backend: Box<dyn ModelBackend>, rate: f64, max_tokens: u32) -> Result<Self, LlmError> {
        Self::with_clock(backend, rate, max_tokens, SystemClock)
    }
}

impl<C: Clock> BlockingClient<C> {
    /// Wrap a backend, throttled on a custom clock
    pub fn with_clock(
        backend: Box<dyn ModelBackend>,
        rate: f64,
        max_tokens: u32,
        clock: C,
    ) -> Result<Self, LlmError> {
        let runtime = tokio::runtime::Builder::new_current_thread()
            .enable_all()
            .build()
            .map_err(|e| LlmError::Other(format!("Failed to start runtime: {}", e)))?;

        Ok(Self {
            runtime,
            limiter: BlockingRateLimiter::with_clock(rate, clock),
            backend,
            max_tokens,
        })
    }

    /// The limiter throttling this client
    pub fn limiter(&self) -> &BlockingRateLimiter<C> {
        &self.limiter
    }

    /// Release the backend's connection handle, logging any failure
    pub fn shutdown(self) {
        if let Err(e) = self.runtime.block_on(self.backend.shutdown()) {
            tracing::warn!(backend = self.backend.name(), error = %e, "Backend teardown failed");
        }
    }
}

impl<C: Clock> CompletionProvider for BlockingClient<C> {
    type Error = LlmError;

    fn complete(&self, system: &str, user: &str, few_shots: &[Message]) -> Result<String, Self::Error> {
        self.limiter.permit();
        let request = CompletionRequest::new(system, few_shots, user, self.max_tokens);
        self.runtime
            .block_on(self.backend.exchange(&request))
            .map(|exchange| exchange.text)
    }
}
