//! Settings for one audit run

use crate::AuditError;
use eqnlint_extractor::ExtractorConfig;
use std::path::PathBuf;

/// Default model identifier
pub const DEFAULT_MODEL: &str = "gpt-4o-mini";

/// Default call rate (calls per second)
pub const DEFAULT_RATE: f64 = 0.5;

/// Default output-length ceiling per call
pub const DEFAULT_MAX_OUTPUT_TOKENS: u32 = 1200;

/// Settings for one audit run
///
/// # Examples
///
/// ```
/// use eqnlint_audit::AuditSettings;
///
/// let settings = AuditSettings::new("paper.tex").with_model("ollama:phi").dry_run(true);
/// assert_eq!(settings.model_id, "ollama:phi");
/// assert_eq!(settings.rate, 0.5);
/// assert!(settings.dry_run);
/// ```
#[derive(Debug, Clone, PartialEq)]
pub struct AuditSettings {
    /// LaTeX file to audit
    pub file: PathBuf,

    /// Human report destination; stdout when unset
    pub output: Option<PathBuf>,

    /// JSON report destination; stdout when unset
    pub json_output: Option<PathBuf>,

    /// Extract only, never call the model
    pub dry_run: bool,

    /// Model identifier; the `ollama:` prefix selects the local server
    pub model_id: String,

    /// Maximum calls per second
    pub rate: f64,

    /// Output-length ceiling per call
    pub max_output_tokens: u32,

    /// Debug-level logging requested
    pub verbose: bool,

    /// Extraction tuning
    pub extractor: ExtractorConfig,
}

impl AuditSettings {
    /// Default settings for `file`
    pub fn new(file: impl Into<PathBuf>) -> Self {
        Self {
            file: file.into(),
            output: None,
            json_output: None,
            dry_run: false,
            model_id: DEFAULT_MODEL.to_string(),
            rate: DEFAULT_RATE,
            max_output_tokens: DEFAULT_MAX_OUTPUT_TOKENS,
            verbose: false,
            extractor: ExtractorConfig::default(),
        }
    }

    /// Set the model identifier
    pub fn with_model(mut self, model_id: impl Into<String>) -> Self {
        self.model_id = model_id.into();
        self
    }

    /// Set the call rate
    pub fn with_rate(mut self, rate: f64) -> Self {
        self.rate = rate;
        self
    }

    /// Set both report destinations
    pub fn with_outputs(mut self, output: Option<PathBuf>, json_output: Option<PathBuf>) -> Self {
        self.output = output;
        self.json_output = json_output;
        self
    }

    /// Toggle dry-run mode
    pub fn dry_run(mut self, dry_run: bool) -> Self {
        self.dry_run = dry_run;
        self
    }

    /// Validate the settings
    pub fn validate(&self) -> Result<(), AuditError> {
        if !self.rate.is_finite() || self.rate <= 0.0 {
            return Err(AuditError::Config(format!(
                "rate must be a positive number of calls per second, got {}",
                self.rate
            )));
        }
        if self.max_output_tokens == 0 {
            return Err(AuditError::Config(
                "max_output_tokens must be greater than 0".to_string(),
            ));
        }
        if self.model_id.trim().is_empty() {
            return Err(AuditError::Config("model id must not be empty".to_string()));
        }
        self.extractor.validate()?;
        Ok(())
    }
}
