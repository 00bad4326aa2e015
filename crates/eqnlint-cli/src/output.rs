//! Output formatting for the CLI.
//!
//! Status lines go to stderr so stdout stays clean for reports.

use colored::*;
use eqnlint_audit::{AuditKind, RunOutcome, RunStatus};
use eqnlint_domain::VerdictCode;
use tabled::{
    builder::Builder,
    settings::{object::Rows, Alignment, Modify, Style},
};

/// Output formatter.
pub struct Formatter {
    color_enabled: bool,
}

impl Formatter {
    /// Create a new formatter.
    pub fn new(color_enabled: bool) -> Self {
        Self { color_enabled }
    }

    /// Table of audits with their extraction policy and summary.
    pub fn audit_table(&self, kinds: &[AuditKind]) -> String {
        let mut builder = Builder::default();
        builder.push_record(["Audit", "Extracts", "Summary"]);

        for kind in kinds {
            let profile = kind.profile();
            builder.push_record([profile.name().to_string(), profile.extraction.to_string(), profile.summary.to_string()]);
        }

        let mut table = builder.build();
        table
            .with(Style::rounded())
            .with(Modify::new(Rows::first()).with(Alignment::center()));

        table.to_string()
    }

    /// One-line summary of a finished run.
    pub fn run_summary(&self, kind: AuditKind, outcome: &RunOutcome) -> String {
        let noun = kind.profile().noun.to_lowercase();
        match outcome.status {
            RunStatus::DryRun => self.info(&format!(
                "{}: {} {}(s) extracted (dry run)",
                kind,
                outcome.fragments.len(),
                noun
            )),
            RunStatus::Cancelled => self.warning(&format!(
                "{}: cancelled after {} of {} {}(s)",
                kind,
                outcome.results.len(),
                outcome.fragments.len(),
                noun
            )),
            RunStatus::Completed => {
                let count = |code| {
                    outcome
                        .results
                        .iter()
                        .filter(|r| r.verdict().code == Some(code))
                        .count()
                };
                let errors = outcome.results.iter().filter(|r| r.is_failed()).count();
                let message = format!(
                    "{}: {} {}(s) audited ({} pass, {} warn, {} fail, {} error)",
                    kind,
                    outcome.results.len(),
                    noun,
                    count(VerdictCode::Pass),
                    count(VerdictCode::Warn),
                    count(VerdictCode::Fail),
                    errors
                );
                if errors > 0 {
                    self.warning(&message)
                } else {
                    self.success(&message)
                }
            }
        }
    }

    /// Format a success message.
    pub fn success(&self, message: &str) -> String {
        self.colorize(&format!("✓ {}", message), "green")
    }

    /// Format an error message.
    pub fn error(&self, message: &str) -> String {
        self.colorize(&format!("✗ {}", message), "red")
    }

    /// Format an info message.
    pub fn info(&self, message: &str) -> String {
        self.colorize(&format!("ℹ {}", message), "blue")
    }

    /// Format a warning message.
    pub fn warning(&self, message: &str) -> String {
        self.colorize(&format!("⚠ {}", message), "yellow")
    }

    /// Colorize text if color is enabled.
    fn colorize(&self, text: &str, color: &str) -> String {
        if !self.color_enabled {
            return text.to_string();
        }

        match color {
            "red" => text.red().to_string(),
            "green" => text.green().to_string(),
            "blue" => text.blue().to_string(),
            "yellow" => text.yellow().to_string(),
            _ => text.to_string(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use eqnlint_audit::Stage;
    use eqnlint_domain::{AuditResult, Fragment};

    fn outcome(status: RunStatus, results: Vec<AuditResult>) -> RunOutcome {
        RunOutcome {
            status,
            stages: vec![Stage::Start, Stage::Shutdown],
            fragments: vec![Fragment::new("$a$", ""), Fragment::new("$b$", ""), Fragment::new("$c$", "")],
            results,
            usage: None,
        }
    }

    #[test]
    fn test_audit_table_lists_every_audit() {
        let table = Formatter::new(false).audit_table(&AuditKind::ALL);
        for kind in AuditKind::ALL {
            assert!(table.contains(kind.name()));
        }
        assert!(table.contains("citation_keys"));
    }

    #[test]
    fn test_completed_summary_counts_verdicts() {
        let results = vec![
            AuditResult::answered(0, "$a$", "✅ CONSISTENT"),
            AuditResult::answered(1, "$b$", "❌ INCONSISTENT"),
            AuditResult::failed(2, "$c$", "down"),
        ];
        let summary = Formatter::new(false).run_summary(AuditKind::Units, &outcome(RunStatus::Completed, results));
        assert_eq!(summary, "⚠ units: 3 equation(s) audited (1 pass, 0 warn, 1 fail, 1 error)");
    }

    #[test]
    fn test_cancelled_summary() {
        let results = vec![AuditResult::answered(0, "$a$", "✅ CONSISTENT")];
        let summary = Formatter::new(false).run_summary(AuditKind::Dimensions, &outcome(RunStatus::Cancelled, results));
        assert_eq!(summary, "⚠ dimensions: cancelled after 1 of 3 equation(s)");
    }

    #[test]
    fn test_no_color_is_plain() {
        let formatter = Formatter::new(false);
        assert_eq!(formatter.success("done"), "✓ done");
        assert_eq!(formatter.error("bad"), "✗ bad");
    }
}
