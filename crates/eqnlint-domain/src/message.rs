//! Role-tagged conversation turns

use std::borrow::Cow;
use std::fmt;

/// Speaker of a conversation turn
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Role {
    /// Instructions that frame the whole exchange
    System,
    /// Turn written by the caller
    User,
    /// Turn written by the model
    Assistant,
}

impl Role {
    /// Wire name used by chat-style APIs
    pub fn as_str(&self) -> &'static str {
        match self {
            Role::System => "system",
            Role::User => "user",
            Role::Assistant => "assistant",
        }
    }

    /// Capitalised name used when turns are flattened into a single prompt
    pub fn title(&self) -> &'static str {
        match self {
            Role::System => "System",
            Role::User => "User",
            Role::Assistant => "Assistant",
        }
    }
}

impl fmt::Display for Role {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// A single role-tagged turn
///
/// Few-shot libraries are compiled in as `static` slices, so the content is
/// borrowed when possible and owned only for turns built at runtime.
///
/// # Examples
///
/// ```
/// use eqnlint_domain::{Message, Role};
///
/// static SHOTS: &[Message] = &[
///     Message::user("Check: E = mc^2"),
///     Message::assistant("✅ CONSISTENT"),
/// ];
/// assert_eq!(SHOTS[1].role, Role::Assistant);
///
/// let turn = Message::new(Role::User, format!("Check: {}", "F = ma"));
/// assert_eq!(turn.content(), "Check: F = ma");
/// ```
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Message {
    /// Speaker of the turn
    pub role: Role,
    /// Text of the turn
    pub content: Cow<'static, str>,
}

impl Message {
    /// Create a turn with owned content
    pub fn new(role: Role, content: impl Into<String>) -> Self {
        Self {
            role,
            content: Cow::Owned(content.into()),
        }
    }

    /// Static system turn
    pub const fn system(content: &'static str) -> Self {
        Self {
            role: Role::System,
            content: Cow::Borrowed(content),
        }
    }

    /// Static user turn
    pub const fn user(content: &'static str) -> Self {
        Self {
            role: Role::User,
            content: Cow::Borrowed(content),
        }
    }

    /// Static assistant turn
    pub const fn assistant(content: &'static str) -> Self {
        Self {
            role: Role::Assistant,
            content: Cow::Borrowed(content),
        }
    }

    /// Text of the turn
    pub fn content(&self) -> &str {
        &self.content
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_role_names() {
        assert_eq!(Role::System.as_str(), "system");
        assert_eq!(Role::Assistant.title(), "Assistant");
        assert_eq!(Role::User.to_string(), "user");
    }

    #[test]
    fn test_static_and_owned_messages_compare_by_content() {
        let borrowed = Message::user("hello");
        let owned = Message::new(Role::User, "hello");
        assert_eq!(borrowed, owned);
    }
}
