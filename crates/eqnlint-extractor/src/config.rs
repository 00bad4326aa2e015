//! Configuration for the Extractor

use crate::ExtractorError;
use serde::{Deserialize, Serialize};
use std::fmt;

/// Which kind of fragment to pull out of a document
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ExtractionPolicy {
    /// Equation environments, display math and inline math
    Equations,
    /// `\cite{...}` and `\bibitem{...}` commands
    Citations,
    /// One fragment per key of any `\cite*{...}` variant
    CitationKeys,
    /// Prose paragraphs with markup and math removed
    Prose,
}

impl ExtractionPolicy {
    /// Short lowercase name
    pub fn as_str(&self) -> &'static str {
        match self {
            ExtractionPolicy::Equations => "equations",
            ExtractionPolicy::Citations => "citations",
            ExtractionPolicy::CitationKeys => "citation_keys",
            ExtractionPolicy::Prose => "prose",
        }
    }
}

impl Default for ExtractionPolicy {
    fn default() -> Self {
        ExtractionPolicy::Equations
    }
}

impl fmt::Display for ExtractionPolicy {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Configuration for the Extractor
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct ExtractorConfig {
    /// Minimum length (characters) of a prose block worth auditing
    pub prose_min_length: usize,

    /// Maximum context length (characters); 0 means unbounded
    pub max_context_chars: usize,
}

impl ExtractorConfig {
    /// Validate the configuration
    pub fn validate(&self) -> Result<(), ExtractorError> {
        if self.prose_min_length == 0 {
            return Err(ExtractorError::Config(
                "prose_min_length must be greater than 0".to_string(),
            ));
        }
        Ok(())
    }

    /// Load configuration from TOML string
    pub fn from_toml(toml_str: &str) -> Result<Self, ExtractorError> {
        let config: Self = toml::from_str(toml_str)?;
        config.validate()?;
        Ok(config)
    }

    /// Serialize configuration to TOML string
    pub fn to_toml(&self) -> Result<String, ExtractorError> {
        Ok(toml::to_string_pretty(self)?)
    }

    /// Apply the context bound to an already trimmed context
    pub(crate) fn bound_context<'a>(&self, context: &'a str) -> &'a str {
        if self.max_context_chars == 0 {
            return context;
        }
        match context.char_indices().nth(self.max_context_chars) {
            Some((cut, _)) => &context[..cut],
            None => context,
        }
    }
}

impl Default for ExtractorConfig {
    fn default() -> Self {
        Self {
            prose_min_length: 30,
            max_context_chars: 0,
        }
    }
}
