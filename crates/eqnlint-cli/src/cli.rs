//! CLI command definitions and argument parsing.

use clap::{Args, Parser, Subcommand};
use eqnlint_audit::AuditKind;
use std::path::PathBuf;

/// eqnlint - Audit LaTeX manuscripts with a language model.
#[derive(Debug, Parser)]
#[command(name = "eqnlint")]
#[command(version, about, long_about = None)]
pub struct Cli {
    /// Disable colored output
    #[arg(long, global = true)]
    pub no_color: bool,

    /// Configuration file path (default: ~/.eqnlint/config.toml)
    #[arg(short, long, global = true)]
    pub config: Option<PathBuf>,

    #[command(subcommand)]
    pub command: Command,
}

/// CLI commands.
#[derive(Debug, Subcommand)]
pub enum Command {
    /// Check equations for unit-system consistency
    Units(AuditArgs),

    /// Check equations for SI dimensional consistency
    Dimensions(AuditArgs),

    /// Flag undefined or possibly fabricated citations
    Citations(AuditArgs),

    /// Find undefined symbols and notation
    Opacity(AuditArgs),

    /// Review prose paragraphs for clarity
    Prose(AuditArgs),

    /// Build a symbol dictionary per equation
    Symbols(AuditArgs),

    /// Check whether cited works support their claims
    Context(AuditArgs),

    /// Run every audit on one file
    All(AllArgs),

    /// List the available audits
    List,
}

impl Command {
    /// The single audit this command runs, if any.
    pub fn audit(&self) -> Option<(AuditKind, &AuditArgs)> {
        match self {
            Command::Units(args) => Some((AuditKind::Units, args)),
            Command::Dimensions(args) => Some((AuditKind::Dimensions, args)),
            Command::Citations(args) => Some((AuditKind::Citations, args)),
            Command::Opacity(args) => Some((AuditKind::Opacity, args)),
            Command::Prose(args) => Some((AuditKind::Prose, args)),
            Command::Symbols(args) => Some((AuditKind::Symbols, args)),
            Command::Context(args) => Some((AuditKind::Context, args)),
            Command::All(_) | Command::List => None,
        }
    }
}

/// Arguments shared by every audit command.
#[derive(Debug, Clone, Args)]
pub struct AuditArgs {
    /// LaTeX file to audit
    #[arg(short, long, required_unless_present = "help_info")]
    pub file: Option<PathBuf>,

    /// Human-readable report path (default: stdout)
    #[arg(short, long)]
    pub output: Option<PathBuf>,

    /// JSON report path (default: stdout)
    #[arg(long = "json", value_name = "JSON")]
    pub json: Option<PathBuf>,

    /// Extract only; never call the model
    #[arg(long)]
    pub dry_run: bool,

    /// Model id; prefix with `ollama:` to use a local server
    #[arg(long, env = "EQNLINT_MODEL")]
    pub model: Option<String>,

    /// Maximum model calls per second
    #[arg(long)]
    pub rate: Option<f64>,

    /// Output-length ceiling per call
    #[arg(long)]
    pub max_tokens: Option<u32>,

    /// Debug logging
    #[arg(short, long)]
    pub verbose: bool,

    /// Describe the audit and exit
    #[arg(long)]
    pub help_info: bool,

    /// Base URL of the local Ollama server
    #[arg(long, env = "EQNLINT_OLLAMA_URL")]
    pub ollama_url: Option<String>,
}

/// Arguments for the run-all command.
#[derive(Debug, Clone, Args)]
pub struct AllArgs {
    #[command(flatten)]
    pub audit: AuditArgs,

    /// Audits to leave out (repeatable or comma-separated)
    #[arg(long, value_name = "AUDIT", value_delimiter = ',')]
    pub skip: Vec<AuditKind>,
}

impl AllArgs {
    /// Audits to run, in catalog order.
    pub fn selected(&self) -> Vec<AuditKind> {
        AuditKind::ALL
            .into_iter()
            .filter(|kind| !self.skip.contains(kind))
            .collect()
    }
}
