//! Error types for the CLI application.

use thiserror::Error;

/// Result type alias for CLI operations.
pub type Result<T> = std::result::Result<T, CliError>;

/// CLI-specific errors.
#[derive(Debug, Error)]
pub enum CliError {
    /// Configuration error
    #[error("Configuration error: {0}")]
    Config(String),

    /// Audit run error
    #[error(transparent)]
    Audit(#[from] eqnlint_audit::AuditError),

    /// I/O error
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    /// TOML parsing error
    #[error("TOML parsing error: {0}")]
    Toml(#[from] toml::de::Error),

    /// Invalid input
    #[error("Invalid input: {0}")]
    InvalidInput(String),

    /// One or more audits of a run-all failed
    #[error("{failed} of {total} audit(s) failed")]
    AuditsFailed {
        /// Number of failed audits
        failed: usize,
        /// Number of audits attempted
        total: usize,
    },
}
