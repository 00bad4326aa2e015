//! eqnlint Audit
//!
//! Workflow orchestration for LaTeX manuscript audits.
//!
//! # Overview
//!
//! An audit reads one LaTeX file, extracts fragments (equations, citations
//! or prose paragraphs), sends each to a language model with a fixed set of
//! instructions and few-shot examples, and writes the answers as a human log
//! and a JSON record.
//!
//! # Architecture
//!
//! ```text
//! Start → LoadInput → InitClient → ExtractTargets ─(dry run)─► Shutdown
//!                                       │
//!                                       ▼
//!            SelectPromptTemplate → InvokeModel → EmitReports → Shutdown
//!
//! any stage failure → Error → Shutdown
//! ```
//!
//! Audit variants are data: an [`AuditProfile`] names the extraction
//! policy, system instructions, few-shot turns and prompt builder. Profiles
//! live in an immutable catalog keyed by [`AuditKind`].
//!
//! ## Audits
//!
//! | Audit | Extracts | Asks |
//! |-------|----------|------|
//! | **units** | equations | Are the units from one consistent system? |
//! | **dimensions** | equations | Do both sides have the same SI dimensions? |
//! | **citations** | `\cite`, `\bibitem` | Is the citation defined? |
//! | **opacity** | equations | Are all symbols defined nearby? |
//! | **prose** | paragraphs | Is the text clear? |
//! | **symbols** | equations | What does each symbol mean? |
//! | **context** | citation keys | Does the cited work support the claim? |
//!
//! # Usage
//!
//! ## Dry Run
//!
//! ```no_run
//! use eqnlint_audit::{AuditKind, AuditMachine, AuditSettings, RunStatus};
//!
//! # async fn example() -> Result<(), eqnlint_audit::AuditError> {
//! let settings = AuditSettings::new("paper.tex").dry_run(true);
//! let outcome = AuditMachine::new(AuditKind::Citations.profile(), settings).run().await?;
//!
//! assert_eq!(outcome.status, RunStatus::DryRun);
//! assert!(outcome.results.is_empty());
//! # Ok(())
//! # }
//! ```
//!
//! ## Model Run
//!
//! ```no_run
//! use eqnlint_audit::{AuditKind, AuditMachine, AuditSettings};
//!
//! # async fn example() -> Result<(), eqnlint_audit::AuditError> {
//! let settings = AuditSettings::new("paper.tex")
//!     .with_model("ollama:llama3")
//!     .with_rate(1.0)
//!     .with_outputs(Some("units.txt".into()), Some("units.json".into()));
//!
//! let outcome = AuditMachine::new(AuditKind::Units.profile(), settings).run().await?;
//! for result in &outcome.results {
//!     println!("{}: {:?}", result.fragment_text(), result.verdict().code);
//! }
//! # Ok(())
//! # }
//! ```
//!
//! # Failure Handling
//!
//! Missing input, a missing credential or invalid settings end the run
//! before any model call. A failed model call only marks that fragment's
//! result (`[ERROR] ...`); the loop moves on. Ctrl-C cancels the run and
//! flushes partial results marked incomplete.

#![warn(missing_docs)]

mod error;
mod fewshots;
mod machine;
mod profile;
pub mod report;
mod settings;


pub use error::AuditError;
pub use machine::{AuditMachine, RunOutcome, RunStatus, Stage};
pub use profile::{AuditKind, AuditProfile};
pub use settings::{AuditSettings, DEFAULT_MAX_OUTPUT_TOKENS, DEFAULT_MODEL, DEFAULT_RATE};
