//! Configuration management for the CLI.
//!
//! Precedence, lowest first: built-in defaults, `~/.eqnlint/config.toml`,
//! environment (including `.env`), command-line flags.

use crate::cli::AuditArgs;
use crate::error::{CliError, Result};
use eqnlint_audit::{AuditSettings, DEFAULT_MAX_OUTPUT_TOKENS, DEFAULT_MODEL, DEFAULT_RATE};
use eqnlint_extractor::ExtractorConfig;
use eqnlint_llm::BackendOptions;
use serde::{Deserialize, Serialize};
use std::fs;
use std::path::{Path, PathBuf};

/// CLI configuration.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct Config {
    /// Audit defaults
    #[serde(default)]
    pub settings: Settings,

    /// Backend endpoint overrides
    #[serde(default)]
    pub endpoints: Endpoints,

    /// Extraction tuning
    #[serde(default)]
    pub extractor: ExtractorConfig,
}

/// Global CLI settings.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Settings {
    /// Default model identifier
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub model: Option<String>,

    /// Default call rate (calls per second)
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub rate: Option<f64>,

    /// Default output-length ceiling
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub max_tokens: Option<u32>,

    /// Enable colored output
    #[serde(default = "default_true")]
    pub color: bool,
}

/// Backend endpoints.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct Endpoints {
    /// Local server base URL
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub ollama: Option<String>,

    /// Hosted chat-completions URL
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub openai: Option<String>,
}

impl Config {
    /// Get the configuration file path.
    pub fn path() -> Result<PathBuf> {
        let home = dirs::home_dir().ok_or_else(|| CliError::Config("Could not find home directory".into()))?;
        Ok(home.join(".eqnlint").join("config.toml"))
    }

    /// Load configuration.
    ///
    /// An explicit path must exist; the default path is optional and falls
    /// back to built-in defaults when absent.
    pub fn load(explicit: Option<&Path>) -> Result<Self> {
        match explicit {
            Some(path) => Self::load_from(path),
            None => match Self::path() {
                Ok(path) if path.exists() => Self::load_from(&path),
                _ => Ok(Self::default()),
            },
        }
    }

    /// Load configuration from a specific file.
    pub fn load_from(path: &Path) -> Result<Self> {
        if !path.exists() {
            return Err(CliError::Config(format!("Config file not found: {}", path.display())));
        }
        let contents = fs::read_to_string(path)?;
        let config: Config = toml::from_str(&contents)?;
        config
            .extractor
            .validate()
            .map_err(|e| CliError::Config(e.to_string()))?;
        Ok(config)
    }

    /// Build the settings for one audit: flags over config over defaults.
    pub fn audit_settings(&self, args: &AuditArgs) -> Result<AuditSettings> {
        let file = args
            .file
            .clone()
            .ok_or_else(|| CliError::InvalidInput("--file is required".to_string()))?;

        let mut settings = AuditSettings::new(file)
            .with_model(
                args.model
                    .clone()
                    .or_else(|| self.settings.model.clone())
                    .unwrap_or_else(|| DEFAULT_MODEL.to_string()),
            )
            .with_rate(args.rate.or(self.settings.rate).unwrap_or(DEFAULT_RATE))
            .with_outputs(args.output.clone(), args.json.clone())
            .dry_run(args.dry_run);
        settings.max_output_tokens = args
            .max_tokens
            .or(self.settings.max_tokens)
            .unwrap_or(DEFAULT_MAX_OUTPUT_TOKENS);
        settings.verbose = args.verbose;
        settings.extractor = self.extractor.clone();
        Ok(settings)
    }

    /// Backend endpoints and credential: flags over config over environment.
    pub fn backend_options(&self, args: &AuditArgs) -> BackendOptions {
        let mut options = BackendOptions::from_env();
        if let Some(url) = args.ollama_url.clone().or_else(|| self.endpoints.ollama.clone()) {
            options.ollama_url = url;
        }
        if let Some(url) = self.endpoints.openai.clone() {
            options.openai_url = url;
        }
        options
    }
}

impl Default for Settings {
    fn default() -> Self {
        Self {
            model: None,
            rate: None,
            max_tokens: None,
            color: true,
        }
    }
}

fn default_true() -> bool {
    true
}
