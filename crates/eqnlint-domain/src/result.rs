//! Per-fragment audit results

use crate::verdict::Verdict;

/// Prefix written in front of the message of a failed model call
pub const ERROR_PREFIX: &str = "[ERROR]";

/// The model's answer for one fragment
///
/// Results are created once, appended to the run's result list in
/// extraction order, and never modified afterwards.
///
/// # Examples
///
/// ```
/// use eqnlint_domain::{AuditResult, VerdictCode};
///
/// let ok = AuditResult::answered(0, "$F = ma$", "✅ CONSISTENT: N = kg m/s^2");
/// assert!(!ok.is_failed());
/// assert_eq!(ok.verdict().code, Some(VerdictCode::Pass));
///
/// let failed = AuditResult::failed(1, "$E$", "connection refused");
/// assert!(failed.is_failed());
/// assert_eq!(failed.verdict_text(), "[ERROR] connection refused");
/// ```
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AuditResult {
    index: usize,
    fragment_text: String,
    verdict_text: String,
    verdict: Verdict,
    failed: bool,
}

impl AuditResult {
    /// Result for a fragment the model answered
    pub fn answered(index: usize, fragment_text: impl Into<String>, answer: impl Into<String>) -> Self {
        let verdict_text = answer.into();
        let verdict = Verdict::parse(&verdict_text);
        Self {
            index,
            fragment_text: fragment_text.into(),
            verdict_text,
            verdict,
            failed: false,
        }
    }

    /// Error-marked result for a fragment whose model call failed
    pub fn failed(index: usize, fragment_text: impl Into<String>, message: impl AsRef<str>) -> Self {
        Self {
            index,
            fragment_text: fragment_text.into(),
            verdict_text: format!("{} {}", ERROR_PREFIX, message.as_ref()),
            verdict: Verdict::default(),
            failed: true,
        }
    }

    /// Position of the fragment in the extracted sequence
    pub fn index(&self) -> usize {
        self.index
    }

    /// Literal text of the audited fragment
    pub fn fragment_text(&self) -> &str {
        &self.fragment_text
    }

    /// Model answer, or the error message for a failed call
    pub fn verdict_text(&self) -> &str {
        &self.verdict_text
    }

    /// Parsed verdict (empty for failed calls)
    pub fn verdict(&self) -> &Verdict {
        &self.verdict
    }

    /// Whether the model call for this fragment failed
    pub fn is_failed(&self) -> bool {
        self.failed
    }
}
