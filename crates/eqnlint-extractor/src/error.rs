//! Error types for the Extractor

use thiserror::Error;

/// Errors that can occur while configuring extraction
///
/// Extraction itself is total and never fails.
#[derive(Error, Debug)]
pub enum ExtractorError {
    /// Configuration error
    #[error("Configuration error: {0}")]
    Config(String),

    /// TOML parsing or serialization error
    #[error("TOML error: {0}")]
    Toml(String),
}

impl From<toml::de::Error> for ExtractorError {
    fn from(e: toml::de::Error) -> Self {
        ExtractorError::Toml(e.to_string())
    }
}

impl From<toml::ser::Error> for ExtractorError {
    fn from(e: toml::ser::Error) -> Self {
        ExtractorError::Toml(e.to_string())
    }
}
