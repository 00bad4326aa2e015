//! Trait definitions for external interactions
//!
//! These traits define the boundaries between domain logic and infrastructure.
//! Infrastructure implementations live in other crates.

use crate::{Fragment, Message};

/// Trait for turning document text into audit fragments
///
/// Implemented by the extraction layer (eqnlint-extractor).
/// Extraction is total: any input, including the empty string, yields a
/// (possibly empty) ordered list of fragments.
///
/// # Examples
///
/// ```
/// use eqnlint_domain::{Fragment, TargetExtractor};
///
/// struct Lines;
///
/// impl TargetExtractor for Lines {
///     fn extract(&self, text: &str) -> Vec<Fragment> {
///         text.lines().map(|line| Fragment::new(line, "")).collect()
///     }
/// }
///
/// assert_eq!(Lines.extract("a\nb").len(), 2);
/// assert!(Lines.extract("").is_empty());
/// ```
pub trait TargetExtractor {
    /// Extract fragments from the full document text, in document order
    fn extract(&self, text: &str) -> Vec<Fragment>;
}

/// Trait for synchronous model completion
///
/// Implemented by the infrastructure layer (eqnlint-llm) for callers that
/// do not run inside an async runtime.
pub trait CompletionProvider {
    /// Error type for completion operations
    type Error;

    /// Send system instructions, few-shot turns and a user prompt; return the answer text
    fn complete(&self, system: &str, user: &str, few_shots: &[Message]) -> Result<String, Self::Error>;
}
