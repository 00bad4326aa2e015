//! Structured verdicts superimposed on free-form model output
//!
//! Every audit asks the model to open its answer with a marker and an
//! upper-case label, e.g. `✅ CONSISTENT: ...` or `⚠️ POSSIBLY FABRICATED: ...`.
//! Models do not always comply, so parsing is best-effort and a missing
//! verdict is never an error.

use std::fmt;

/// Categorical outcome carried by the leading marker
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum VerdictCode {
    /// ✅
    Pass,
    /// ❌
    Fail,
    /// ⚠️
    Warn,
}

impl VerdictCode {
    /// Stable lowercase name used in structured reports
    pub fn as_str(&self) -> &'static str {
        match self {
            VerdictCode::Pass => "pass",
            VerdictCode::Fail => "fail",
            VerdictCode::Warn => "warn",
        }
    }

    /// Marker glyph as written by the model
    pub fn symbol(&self) -> &'static str {
        match self {
            VerdictCode::Pass => "✅",
            VerdictCode::Fail => "❌",
            VerdictCode::Warn => "⚠️",
        }
    }
}

impl fmt::Display for VerdictCode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Parsed verdict: marker code and label, either of which may be absent
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Verdict {
    /// Marker-derived code
    pub code: Option<VerdictCode>,
    /// Upper-case label following the marker (e.g. `CONSISTENT`)
    pub label: Option<String>,
}

impl Verdict {
    /// Parse the first non-empty line of a model answer
    ///
    /// # Examples
    ///
    /// ```
    /// use eqnlint_domain::{Verdict, VerdictCode};
    ///
    /// let verdict = Verdict::parse("❌ UNDEFINED: \\cite{MissingRef} is not defined.");
    /// assert_eq!(verdict.code, Some(VerdictCode::Fail));
    /// assert_eq!(verdict.label.as_deref(), Some("UNDEFINED"));
    ///
    /// assert!(Verdict::parse("no marker here").is_empty());
    /// ```
    pub fn parse(answer: &str) -> Self {
        let Some(line) = answer.lines().map(str::trim).find(|l| !l.is_empty()) else {
            return Self::default();
        };

        let (code, rest) = match split_marker(line) {
            Some((code, rest)) => (Some(code), rest),
            None => (None, line),
        };

        // A bare label without a marker is too ambiguous to trust
        let label = code.and_then(|_| leading_label(rest));

        Self { code, label }
    }

    /// True when neither a code nor a label was found
    pub fn is_empty(&self) -> bool {
        self.code.is_none() && self.label.is_none()
    }
}

fn split_marker(line: &str) -> Option<(VerdictCode, &str)> {
    const MARKERS: [(&str, VerdictCode); 4] = [
        ("✅", VerdictCode::Pass),
        ("❌", VerdictCode::Fail),
        ("⚠️", VerdictCode::Warn),
        ("⚠", VerdictCode::Warn),
    ];

    MARKERS
        .iter()
        .find_map(|(marker, code)| line.strip_prefix(marker).map(|rest| (*code, rest)))
}

fn leading_label(rest: &str) -> Option<String> {
    let rest = rest.trim_start_matches(|c: char| c == '\u{fe0f}' || c.is_whitespace());
    let end = rest
        .char_indices()
        .find(|(_, c)| !(c.is_ascii_uppercase() || *c == ' ' || *c == '_'))
        .map(|(i, _)| i)
        .unwrap_or(rest.len());

    let label = rest[..end].trim();
    if label.is_empty() {
        None
    } else {
        Some(label.to_string())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use proptest::prelude::*;

    #[test]
    fn test_parse_pass_with_label() {
        let verdict = Verdict::parse("✅ CONSISTENT: [J] = [kg][m/s]^2 is dimensionally valid.");
        assert_eq!(verdict.code, Some(VerdictCode::Pass));
        assert_eq!(verdict.label.as_deref(), Some("CONSISTENT"));
    }

    #[test]
    fn test_parse_warn_with_variation_selector() {
        let verdict = Verdict::parse("⚠️ POSSIBLY FABRICATED: Smith et al. (2023) is not verifiable.");
        assert_eq!(verdict.code, Some(VerdictCode::Warn));
        assert_eq!(verdict.label.as_deref(), Some("POSSIBLY FABRICATED"));
    }

    #[test]
    fn test_parse_warn_without_variation_selector() {
        let verdict = Verdict::parse("⚠ NEEDS EDIT: Redundant hedging.");
        assert_eq!(verdict.code, Some(VerdictCode::Warn));
        assert_eq!(verdict.label.as_deref(), Some("NEEDS EDIT"));
    }

    #[test]
    fn test_parse_em_dash_separator() {
        let verdict = Verdict::parse("✅ DEFINED   — present in the bibliography");
        assert_eq!(verdict.label.as_deref(), Some("DEFINED"));
    }

    #[test]
    fn test_parse_skips_leading_blank_lines() {
        let verdict = Verdict::parse("\n\n  ❌ INCONSISTENT: Cannot add mass and acceleration.\nMore.");
        assert_eq!(verdict.code, Some(VerdictCode::Fail));
        assert_eq!(verdict.label.as_deref(), Some("INCONSISTENT"));
    }

    #[test]
    fn test_parse_marker_without_label() {
        let verdict = Verdict::parse("✅ looks fine");
        assert_eq!(verdict.code, Some(VerdictCode::Pass));
        assert!(verdict.label.is_none());
    }

    #[test]
    fn test_parse_without_marker() {
        assert!(Verdict::parse("{\"E\": \"energy (J)\"}").is_empty());
        assert!(Verdict::parse("CONSISTENT").is_empty());
        assert!(Verdict::parse("").is_empty());
    }

    #[test]
    fn test_code_names() {
        assert_eq!(VerdictCode::Pass.as_str(), "pass");
        assert_eq!(VerdictCode::Fail.symbol(), "❌");
        assert_eq!(VerdictCode::Warn.to_string(), "warn");
    }

    proptest! {
        #[test]
        fn prop_parse_is_total_and_labels_are_upper_case(answer in ".*") {
            let verdict = Verdict::parse(&answer);
            if let Some(label) = verdict.label {
                prop_assert!(!label.is_empty());
                prop_assert!(label.chars().all(|c| c.is_ascii_uppercase() || c == ' ' || c == '_'));
                prop_assert!(verdict.code.is_some());
            }
        }
    }
}
