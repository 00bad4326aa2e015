//! Error types for audit runs

use std::path::PathBuf;
use thiserror::Error;

/// Errors that end an audit run
///
/// Per-fragment model failures are not errors at this level; they are
/// recorded as error-marked results and the run continues.
#[derive(Error, Debug)]
pub enum AuditError {
    /// Input file does not exist
    #[error("Input file not found: {}", path.display())]
    InputNotFound {
        /// Path that was requested
        path: PathBuf,
    },

    /// Input file exists but could not be read
    #[error("Could not read input file {}: {source}", path.display())]
    InputRead {
        /// Path that was requested
        path: PathBuf,
        /// Underlying I/O error
        #[source]
        source: std::io::Error,
    },

    /// Missing or unusable model credential
    #[error("Credential error: {0}")]
    Credential(String),

    /// Invalid settings or model selection
    #[error("Configuration error: {0}")]
    Config(String),

    /// Report could not be written
    #[error("Could not write report {}: {source}", path.display())]
    Report {
        /// Destination path
        path: PathBuf,
        /// Underlying I/O error
        #[source]
        source: std::io::Error,
    },

    /// Unclassified stage failure
    #[error(transparent)]
    Other(#[from] anyhow::Error),
}

impl From<eqnlint_llm::LlmError> for AuditError {
    fn from(e: eqnlint_llm::LlmError) -> Self {
        match e {
            eqnlint_llm::LlmError::Credential(msg) => AuditError::Credential(msg),
            eqnlint_llm::LlmError::ModelNotAvailable(model) => {
                AuditError::Config(format!("Model not available: {}", model))
            }
            other => AuditError::Other(other.into()),
        }
    }
}

impl From<eqnlint_extractor::ExtractorError> for AuditError {
    fn from(e: eqnlint_extractor::ExtractorError) -> Self {
        AuditError::Config(e.to_string())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use eqnlint_llm::LlmError;

    #[test]
    fn test_llm_credential_maps_to_credential() {
        let err: AuditError = LlmError::Credential("OPENAI_API_KEY is not set".to_string()).into();
        assert!(matches!(err, AuditError::Credential(_)));
        assert_eq!(err.to_string(), "Credential error: OPENAI_API_KEY is not set");
    }

    #[test]
    fn test_other_llm_errors_are_unclassified() {
        let err: AuditError = LlmError::Communication("down".to_string()).into();
        assert!(matches!(err, AuditError::Other(_)));
        assert_eq!(err.to_string(), "Communication error: down");
    }

    #[test]
    fn test_input_not_found_message() {
        let err = AuditError::InputNotFound {
            path: PathBuf::from("paper.tex"),
        };
        assert_eq!(err.to_string(), "Input file not found: paper.tex");
    }
}
