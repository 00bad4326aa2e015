//! Usage metering for model calls

use crate::Usage;

/// Counters collected across the calls of one client
///
/// Tracks calls attempted, failures, and tokens reported by the backend.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct UsageMeter {
    /// Calls attempted
    pub calls: usize,

    /// Calls that returned an error
    pub failures: usize,

    /// Prompt tokens reported by the backend
    pub prompt_tokens: u64,

    /// Completion tokens reported by the backend
    pub completion_tokens: u64,
}

impl UsageMeter {
    /// Create an empty meter
    pub fn new() -> Self {
        Self::default()
    }

    /// Record a successful call
    pub fn record_success(&mut self, usage: Option<Usage>) {
        self.calls += 1;
        if let Some(usage) = usage {
            self.prompt_tokens += usage.prompt_tokens;
            self.completion_tokens += usage.completion_tokens;
        }
    }

    /// Record a failed call
    pub fn record_failure(&mut self) {
        self.calls += 1;
        self.failures += 1;
    }

    /// Total tokens in both directions
    pub fn total_tokens(&self) -> u64 {
        self.prompt_tokens + self.completion_tokens
    }

    /// One-line summary for logs
    pub fn summary(&self) -> String {
        format!(
            "{} call(s), {} failed, {} prompt + {} completion tokens",
            self.calls, self.failures, self.prompt_tokens, self.completion_tokens
        )
    }
}
