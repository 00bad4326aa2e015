//! Markdown code-fence stripping
//!
//! Hosted models sometimes wrap their whole answer in a fenced block.

/// Remove a Markdown code fence wrapping the whole answer
///
/// Handles a language-tagged fence (```` ```json ````) and a bare fence.
/// Text that does not start with a fence is returned trimmed and otherwise
/// unchanged.
///
/// # Examples
///
/// ```
/// use eqnlint_llm::strip_code_fence;
///
/// assert_eq!(strip_code_fence("```json\n{\"E\": \"energy\"}\n```"), "{\"E\": \"energy\"}");
/// assert_eq!(strip_code_fence("```\n✅ CONSISTENT\n```"), "✅ CONSISTENT");
/// assert_eq!(strip_code_fence("  ✅ CONSISTENT  "), "✅ CONSISTENT");
/// ```
pub fn strip_code_fence(text: &str) -> String {
    let trimmed = text.trim();
    let Some(body) = trimmed.strip_prefix("```") else {
        return trimmed.to_string();
    };

    let body = strip_language_tag(body);
    let body = body.strip_suffix("```").unwrap_or(body);
    body.trim().to_string()
}

fn strip_language_tag(body: &str) -> &str {
    let Some(newline) = body.find('\n') else {
        return body;
    };

    let tag = &body[..newline];
    let is_tag = !tag.is_empty()
        && tag
            .chars()
            .all(|c| c.is_ascii_alphanumeric() || matches!(c, '-' | '_' | '+' | '.'));

    if is_tag {
        &body[newline + 1..]
    } else {
        body
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_plain_text_is_trimmed() {
        assert_eq!(strip_code_fence("\n✅ CONSISTENT: ok\n"), "✅ CONSISTENT: ok");
    }

    #[test]
    fn test_json_fence() {
        let response = "```json\n{\"key\": \"value\"}\n```";
        assert_eq!(strip_code_fence(response), "{\"key\": \"value\"}");
    }

    #[test]
    fn test_other_language_tag() {
        let response = "```latex\nE = mc^2\n```";
        assert_eq!(strip_code_fence(response), "E = mc^2");
    }

    #[test]
    fn test_bare_fence() {
        let response = "```\n{\"key\": \"value\"}\n```";
        assert_eq!(strip_code_fence(response), "{\"key\": \"value\"}");
    }

    #[test]
    fn test_single_line_fence() {
        assert_eq!(strip_code_fence("```✅ CONSISTENT```"), "✅ CONSISTENT");
    }

    #[test]
    fn test_unterminated_fence() {
        assert_eq!(strip_code_fence("```json\n{\"a\": 1}"), "{\"a\": 1}");
    }

    #[test]
    fn test_first_line_with_spaces_is_content() {
        let response = "```\n✅ CONSISTENT: both sides in N\n```";
        assert_eq!(strip_code_fence(response), "✅ CONSISTENT: both sides in N");
    }

    #[test]
    fn test_fence_inside_text_is_kept() {
        let response = "Verdict below\n```\nx\n```";
        assert_eq!(strip_code_fence(response), response);
    }
}
