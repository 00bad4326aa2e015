//! Fragment module - the unit of audit

/// One extracted piece of a manuscript together with its surrounding text.
///
/// Fragments are produced by an extractor and are never mutated afterwards;
/// the audit workflow only reads them.
///
/// # Examples
///
/// ```
/// use eqnlint_domain::Fragment;
///
/// let fragment = Fragment::new("$F = ma$", "Newton: $F = ma$ holds.");
/// assert_eq!(fragment.text(), "$F = ma$");
/// assert_eq!(fragment.focus(), None);
/// ```
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Fragment {
    text: String,
    context: String,
    focus: Option<String>,
}

impl Fragment {
    /// Create a fragment from its literal text and its context window
    pub fn new(text: impl Into<String>, context: impl Into<String>) -> Self {
        Self {
            text: text.into(),
            context: context.into(),
            focus: None,
        }
    }

    /// Narrow the fragment to a single subject inside its text
    ///
    /// Used when one extracted span holds several audit targets, such as the
    /// individual keys of `\cite{a,b}`.
    pub fn with_focus(mut self, focus: impl Into<String>) -> Self {
        self.focus = Some(focus.into());
        self
    }

    /// The literal extracted content
    pub fn text(&self) -> &str {
        &self.text
    }

    /// The surrounding text (may be empty)
    pub fn context(&self) -> &str {
        &self.context
    }

    /// The narrower subject of this fragment, if any
    pub fn focus(&self) -> Option<&str> {
        self.focus.as_deref()
    }

    /// The focus if present, otherwise the full text
    pub fn subject(&self) -> &str {
        self.focus.as_deref().unwrap_or(&self.text)
    }
}
