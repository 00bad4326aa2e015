//! eqnlint Domain Layer
//!
//! This crate contains the core vocabulary shared by every other eqnlint crate.
//! It has ZERO external dependencies and defines the value objects and trait
//! interfaces that the extractor, model client and audit workflow depend upon.
//!
//! ## Key Concepts
//!
//! - **Fragment**: one extracted unit of a manuscript (equation, citation, paragraph)
//!   together with its surrounding context
//! - **AuditResult**: the model's answer for one fragment, in extraction order
//! - **Verdict**: the categorical judgment (✅ / ❌ / ⚠️) superimposed on a free-form answer
//! - **Message**: a role-tagged turn used for system instructions and few-shot examples
//!
//! ## Architecture
//!
//! - No external crate dependencies
//! - Pure data and parsing only
//! - Infrastructure implementations live in other crates
//! - Trait definitions for all external interactions

#![warn(missing_docs)]
#![warn(clippy::all)]

pub mod fragment;
pub mod message;
pub mod result;
pub mod traits;
pub mod verdict;

// Re-exports for convenience
pub use fragment::Fragment;
pub use message::{Message, Role};
pub use result::{AuditResult, ERROR_PREFIX};
pub use traits::{CompletionProvider, TargetExtractor};
pub use verdict::{Verdict, VerdictCode};
