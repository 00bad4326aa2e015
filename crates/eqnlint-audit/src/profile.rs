//! Audit profiles
//!
//! Every audit variant is a plain [`AuditProfile`] record: what to extract,
//! what to tell the model, and how to phrase each prompt. The catalog is
//! immutable and indexed by [`AuditKind`].

use crate::fewshots;
use eqnlint_domain::{Fragment, Message};
use eqnlint_extractor::ExtractionPolicy;
use std::fmt;
use std::str::FromStr;

/// The data that fully specifies one audit variant
#[derive(Debug)]
pub struct AuditProfile {
    /// Catalog key
    pub kind: AuditKind,
    /// Heading used in the human report (`=== {title} Audit ===`)
    pub title: &'static str,
    /// What one fragment is called in reports (`--- {noun} 1 ---`)
    pub noun: &'static str,
    /// One-line description
    pub summary: &'static str,
    /// System instructions sent with every call
    pub system_instructions: &'static str,
    /// Few-shot turns sent with every call
    pub few_shots: &'static [Message],
    /// Prompt builder
    pub prompt: fn(&Fragment) -> String,
    /// Which fragments to extract
    pub extraction: ExtractionPolicy,
}

impl AuditProfile {
    /// Build the user prompt for one fragment
    pub fn build_prompt(&self, fragment: &Fragment) -> String {
        (self.prompt)(fragment)
    }

    /// Catalog name
    pub fn name(&self) -> &'static str {
        self.kind.name()
    }

    /// The `--help-info` text for this audit
    pub fn info_block(&self) -> String {
        let name = self.name();
        format!(
            "=== Info Section ({name}) ===\n\
             Name: {name}\n\
             Summary: {summary}\n\
             \n\
             Inputs:\n\
             -f FILE (LaTeX source)\n\
             \n\
             Outputs:\n\
             -o OUTPUT (human log), --json JSON (machine-readable record)\n\
             \n\
             Steps:\n\
             1. Read the file\n\
             2. Extract {nouns} ({policy})\n\
             3. Send each with few-shot examples to the model, rate-limited\n\
             4. Emit the human log and JSON record\n",
            summary = self.summary,
            nouns = self.noun.to_lowercase() + "s",
            policy = self.extraction,
        )
    }
}

/// Audit variants
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub enum AuditKind {
    /// Unit-system consistency of equations
    Units,
    /// SI dimensional consistency of equations
    Dimensions,
    /// Citation presence in the bibliography
    Citations,
    /// Undefined symbols and notation
    Opacity,
    /// Prose clarity
    Prose,
    /// Symbol dictionary per equation
    Symbols,
    /// Whether each cited work supports its claim
    Context,
}

impl AuditKind {
    /// Every audit, in run-all order
    pub const ALL: [AuditKind; 7] = [
        AuditKind::Citations,
        AuditKind::Context,
        AuditKind::Dimensions,
        AuditKind::Opacity,
        AuditKind::Prose,
        AuditKind::Symbols,
        AuditKind::Units,
    ];

    /// Catalog name
    pub fn name(&self) -> &'static str {
        match self {
            AuditKind::Units => "units",
            AuditKind::Dimensions => "dimensions",
            AuditKind::Citations => "citations",
            AuditKind::Opacity => "opacity",
            AuditKind::Prose => "prose",
            AuditKind::Symbols => "symbols",
            AuditKind::Context => "context",
        }
    }

    /// The immutable profile for this audit
    pub fn profile(&self) -> &'static AuditProfile {
        match self {
            AuditKind::Units => &UNITS,
            AuditKind::Dimensions => &DIMENSIONS,
            AuditKind::Citations => &CITATIONS,
            AuditKind::Opacity => &OPACITY,
            AuditKind::Prose => &PROSE,
            AuditKind::Symbols => &SYMBOLS,
            AuditKind::Context => &CONTEXT,
        }
    }
}

impl fmt::Display for AuditKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

impl FromStr for AuditKind {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        AuditKind::ALL
            .into_iter()
            .find(|kind| kind.name().eq_ignore_ascii_case(s.trim()))
            .ok_or_else(|| {
                let names: Vec<_> = AuditKind::ALL.iter().map(AuditKind::name).collect();
                format!("unknown audit '{}' (expected one of: {})", s, names.join(", "))
            })
    }
}

fn units_prompt(fragment: &Fragment) -> String {
    format!("Check the units in: {}\nContext: {}", fragment.text(), fragment.context())
}

fn dimensions_prompt(fragment: &Fragment) -> String {
    format!(
        "Task: Determine SI *dimensional* consistency of both sides.\n\
         Equation:\n{}\n\
         Context:\n{}\n\
         Return exactly one of: ✅ CONSISTENT or ❌ INCONSISTENT — plus a one‑sentence reason \
         that references dimensions (e.g., [J] vs [kg·m^2·s^-2], or curvature ~ m^-2, etc.).\n",
        fragment.text(),
        fragment.context()
    )
}

fn citations_prompt(fragment: &Fragment) -> String {
    format!(
        "Check the following LaTeX citation for consistency:\n\
         Citation: {}\n\
         Context:\n\"\"\"\n{}\n\"\"\"\n\
         Respond with exactly one of:\n\
         ✅ DEFINED   — if it’s present/valid.\n\
         ❌ UNDEFINED — if missing from bibliography.\n\
         ⚠️ POSSIBLY FABRICATED — if it seems non‑existent or unverifiable.\n\
         Keep it short.",
        fragment.text(),
        fragment.context()
    )
}

fn opacity_prompt(fragment: &Fragment) -> String {
    format!(
        "Check this equation:\n{}\n\
         Context:\n{}\n\n\
         Identify any undefined symbols, acronyms, or notations missing from the context. \
         Suggest clear definitions, or mark as:\n\
         ✅ ALL SYMBOLS DEFINED if nothing is missing.\n\
         Prefer a concise verdict first, then a brief reason.",
        fragment.text(),
        fragment.context()
    )
}

fn prose_prompt(fragment: &Fragment) -> String {
    format!(
        "Text:\n{}\n\
         Task: Start with one verdict (✅ CLEAR, ⚠️ NEEDS EDIT, or ❌ UNCLEAR), \
         then provide a concise rewrite if needed.",
        fragment.text()
    )
}

fn symbols_prompt(fragment: &Fragment) -> String {
    format!(
        "Build a symbol dictionary for: {}\n\
         Context: {}\n\
         Output format: JSON dictionary with symbol as key and definition as value.",
        fragment.text(),
        fragment.context()
    )
}

fn context_prompt(fragment: &Fragment) -> String {
    format!(
        "Context:\n\"\"\"{}\"\"\"\nAudit:\nDoes \\cite{{{}}} support this claim?",
        fragment.context(),
        fragment.subject()
    )
}

static UNITS: AuditProfile = AuditProfile {
    kind: AuditKind::Units,
    title: "Units",
    noun: "Equation",
    summary: "Checks equations for unit-system consistency and non-standard units.",
    system_instructions:
        "You are auditing LaTeX equations for unit system consistency and detecting non-standard units.",
    few_shots: fewshots::UNITS,
    prompt: units_prompt,
    extraction: ExtractionPolicy::Equations,
};

static DIMENSIONS: AuditProfile = AuditProfile {
    kind: AuditKind::Dimensions,
    title: "Dimensions",
    noun: "Equation",
    summary: "Checks equations for SI dimensional consistency of both sides.",
    system_instructions: "You are auditing LaTeX equations for SI *dimensional* consistency. \
                          Be strict and concise. Prefer categorical answers with a short rationale.",
    few_shots: fewshots::DIMENSIONS,
    prompt: dimensions_prompt,
    extraction: ExtractionPolicy::Equations,
};

static CITATIONS: AuditProfile = AuditProfile {
    kind: AuditKind::Citations,
    title: "Citations",
    noun: "Citation",
    summary: "Flags citations that are undefined or possibly fabricated.",
    system_instructions: "You are an expert in LaTeX and academic citation checking. \
                          You determine whether each citation is defined in the bibliography or may be fabricated.",
    few_shots: fewshots::CITATIONS,
    prompt: citations_prompt,
    extraction: ExtractionPolicy::Citations,
};

static OPACITY: AuditProfile = AuditProfile {
    kind: AuditKind::Opacity,
    title: "Opacity",
    noun: "Equation",
    summary: "Finds symbols, acronyms and notation used without definition.",
    system_instructions:
        "You are an AI that reviews LaTeX papers for opaque or undefined symbols, acronyms, and notation.",
    few_shots: fewshots::OPACITY,
    prompt: opacity_prompt,
    extraction: ExtractionPolicy::Equations,
};

static PROSE: AuditProfile = AuditProfile {
    kind: AuditKind::Prose,
    title: "Prose",
    noun: "Paragraph",
    summary: "Reviews prose paragraphs for clarity, concision and flow.",
    system_instructions: "You review scientific prose for clarity, concision, and flow, \
                          without altering technical meaning. Keep edits minimal.",
    few_shots: fewshots::PROSE,
    prompt: prose_prompt,
    extraction: ExtractionPolicy::Prose,
};

static SYMBOLS: AuditProfile = AuditProfile {
    kind: AuditKind::Symbols,
    title: "Symbols",
    noun: "Equation",
    summary: "Builds a symbol dictionary for each equation.",
    system_instructions: "You are an expert in dimensional analysis and LaTeX math.",
    few_shots: fewshots::SYMBOLS,
    prompt: symbols_prompt,
    extraction: ExtractionPolicy::Equations,
};

static CONTEXT: AuditProfile = AuditProfile {
    kind: AuditKind::Context,
    title: "Context",
    noun: "Citation",
    summary: "Checks whether each cited work supports the claim around it.",
    system_instructions: "You are an expert scientific reviewer. Audit citations for accuracy.",
    few_shots: fewshots::CONTEXT,
    prompt: context_prompt,
    extraction: ExtractionPolicy::CitationKeys,
};
