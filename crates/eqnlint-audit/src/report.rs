//! Report emitter
//!
//! Renders a run's results as a human log and a JSON record, and writes
//! each to its configured path or to stdout.

use crate::{AuditError, AuditProfile, AuditSettings};
use eqnlint_domain::{AuditResult, Fragment};
use serde::Serialize;
use std::path::Path;
use tracing::info;

/// Structured record of an audit run
#[derive(Debug, Serialize)]
pub struct AuditRecord<'a> {
    /// Catalog name of the audit
    pub audit: &'a str,
    /// False when the run was cancelled part-way
    pub complete: bool,
    /// One entry per processed fragment
    pub results: Vec<ResultRecord<'a>>,
}

/// One result inside an [`AuditRecord`]
#[derive(Debug, Serialize)]
pub struct ResultRecord<'a> {
    /// Position of the fragment in extraction order (0-based)
    pub index: usize,
    /// Fragment text, whatever the fragment kind
    pub equation: &'a str,
    /// Model answer or error message
    pub notes: &'a str,
    /// `pass`, `fail` or `warn` when the answer opened with a marker
    pub verdict: Option<&'static str>,
    /// Upper-case label following the marker
    pub label: Option<&'a str>,
    /// True when the model call failed
    pub error: bool,
}

/// Structured record of a dry run
#[derive(Debug, Serialize)]
pub struct DryRunRecord<'a> {
    /// Catalog name of the audit
    pub audit: &'a str,
    /// Always true
    pub dry_run: bool,
    /// Extracted fragment texts, in order
    pub equations: Vec<&'a str>,
}

impl<'a> AuditRecord<'a> {
    /// Build the record for `results`
    pub fn new(profile: &AuditProfile, results: &'a [AuditResult], complete: bool) -> Self {
        Self {
            audit: profile.name(),
            complete,
            results: results
                .iter()
                .map(|r| ResultRecord {
                    index: r.index(),
                    equation: r.fragment_text(),
                    notes: r.verdict_text(),
                    verdict: r.verdict().code.map(|c| c.as_str()),
                    label: r.verdict().label.as_deref(),
                    error: r.is_failed(),
                })
                .collect(),
        }
    }
}

impl<'a> DryRunRecord<'a> {
    /// Build the record for `fragments`
    pub fn new(profile: &AuditProfile, fragments: &'a [Fragment]) -> Self {
        Self {
            audit: profile.name(),
            dry_run: true,
            equations: fragments.iter().map(Fragment::text).collect(),
        }
    }
}

/// Human log of a model run
pub fn render_results(profile: &AuditProfile, results: &[AuditResult], complete: bool) -> String {
    let header = if complete {
        format!("=== {} Audit ===", profile.title)
    } else {
        format!("=== {} Audit (INCOMPLETE) ===", profile.title)
    };

    let mut lines = vec![header];
    lines.extend(results.iter().map(|r| {
        format!(
            "\n--- {} {} ---\n{}\n{}",
            profile.noun,
            r.index() + 1,
            r.fragment_text(),
            r.verdict_text()
        )
    }));
    lines.join("\n")
}

/// Human log of a dry run
pub fn render_dry_run(profile: &AuditProfile, fragments: &[Fragment]) -> String {
    let mut lines = vec![format!("=== DRY RUN: {}s ===", profile.noun)];
    lines.extend(fragments.iter().enumerate().map(|(i, f)| {
        format!("\n--- {} {} ---\n{}\n\n{}", profile.noun, i + 1, f.text(), f.context())
    }));
    lines.join("\n")
}

/// Write both renderings to their destinations
///
/// The human log goes to `settings.output` and the JSON record to
/// `settings.json_output`; an unset destination means stdout.
pub fn write_outputs<R: Serialize>(settings: &AuditSettings, text: &str, record: &R) -> Result<(), AuditError> {
    let json = serde_json::to_string_pretty(record).map_err(anyhow::Error::from)?;
    emit(settings.output.as_deref(), text)?;
    emit(settings.json_output.as_deref(), &json)?;
    Ok(())
}

fn emit(path: Option<&Path>, content: &str) -> Result<(), AuditError> {
    match path {
        Some(path) => {
            std::fs::write(path, format!("{content}\n")).map_err(|source| AuditError::Report {
                path: path.to_path_buf(),
                source,
            })?;
            info!(path = %path.display(), "Report written");
        }
        None => println!("{content}"),
    }
    Ok(())
}
