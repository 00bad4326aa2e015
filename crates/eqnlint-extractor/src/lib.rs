//! eqnlint Extractor
//!
//! Turns LaTeX source into the ordered fragments an audit inspects.
//!
//! # Overview
//!
//! Extraction is bounded pattern matching, not parsing: each
//! [`ExtractionPolicy`] is a small set of non-greedy regular expressions
//! applied over the whole document. Extraction is total (any input, including
//! the empty string, yields a possibly empty list) and deterministic.
//!
//! # Architecture
//!
//! ```text
//! LaTeX text → Extractor(policy) → Vec<Fragment { text, context, focus }>
//! ```
//!
//! Delimited policies attach the enclosing paragraph as context; the prose
//! policy strips markup first and yields paragraphs with empty context.
//!
//! # Example Usage
//!
//! ```
//! use eqnlint_domain::TargetExtractor;
//! use eqnlint_extractor::{ExtractionPolicy, Extractor};
//!
//! let extractor = Extractor::new(ExtractionPolicy::Equations);
//! let fragments = extractor.extract("$F = ma$\n\nNewton's second law.");
//!
//! assert_eq!(fragments.len(), 1);
//! assert_eq!(fragments[0].text(), "$F = ma$");
//! assert_eq!(fragments[0].context(), "$F = ma$\n\nNewton's second law.");
//! ```

#![warn(missing_docs)]

mod config;
mod context;
mod delimited;
mod error;
mod prose;


pub use config::{ExtractionPolicy, ExtractorConfig};
pub use context::enclosing_block;
pub use error::ExtractorError;

use eqnlint_domain::{Fragment, TargetExtractor};
use tracing::debug;

/// Policy-driven fragment extractor
#[derive(Debug, Clone, Default)]
pub struct Extractor {
    policy: ExtractionPolicy,
    config: ExtractorConfig,
}

impl Extractor {
    /// Extractor with default tuning
    pub fn new(policy: ExtractionPolicy) -> Self {
        Self {
            policy,
            config: ExtractorConfig::default(),
        }
    }

    /// Extractor with custom tuning
    ///
    /// # Errors
    ///
    /// Returns [`ExtractorError::Config`] if the configuration is invalid.
    pub fn with_config(policy: ExtractionPolicy, config: ExtractorConfig) -> Result<Self, ExtractorError> {
        config.validate()?;
        Ok(Self { policy, config })
    }

    /// Policy in use
    pub fn policy(&self) -> ExtractionPolicy {
        self.policy
    }

    /// Tuning in use
    pub fn config(&self) -> &ExtractorConfig {
        &self.config
    }
}

impl TargetExtractor for Extractor {
    fn extract(&self, text: &str) -> Vec<Fragment> {
        let fragments = match self.policy {
            ExtractionPolicy::Equations => delimited::equations(text, &self.config),
            ExtractionPolicy::Citations => delimited::citations(text, &self.config),
            ExtractionPolicy::CitationKeys => delimited::citation_keys(text, &self.config),
            ExtractionPolicy::Prose => prose::paragraphs(text, &self.config),
        };
        debug!(policy = %self.policy, count = fragments.len(), "Extracted fragments");
        fragments
    }
}
