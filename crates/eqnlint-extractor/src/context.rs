//! Paragraph-window context around a match

const BLOCK_BREAK: &str = "\n\n";

fn block_start_before(text: &str, to: usize) -> usize {
    text[..to].rfind(BLOCK_BREAK).unwrap_or(0)
}

fn block_end_after(text: &str, from: usize) -> usize {
    text[from..].find(BLOCK_BREAK).map_or(text.len(), |i| from + i)
}

/// The double-newline-delimited block enclosing `text[start..end]`, trimmed
///
/// When nothing but whitespace separates the match from a block boundary,
/// that side is widened by one more block so a fragment standing alone
/// still carries its neighbouring paragraph.
///
/// `start` and `end` must lie on char boundaries with `start <= end`.
pub fn enclosing_block(text: &str, start: usize, end: usize) -> &str {
    let mut from = block_start_before(text, start);
    if from > 0 && text[from..start].trim().is_empty() {
        let neighbour_end = text[..from].trim_end().len();
        from = block_start_before(text, neighbour_end);
    }

    let mut to = block_end_after(text, end);
    if to < text.len() && text[end..to].trim().is_empty() {
        let rest = &text[to..];
        let neighbour_start = to + (rest.len() - rest.trim_start().len());
        to = block_end_after(text, neighbour_start);
    }

    text[from..to].trim()
}

#[cfg(test)]
mod tests {
    use super::*;

    fn context_of(text: &str, needle: &str) -> String {
        let start = text.find(needle).unwrap();
        enclosing_block(text, start, start + needle.len()).to_string()
    }

    #[test]
    fn test_match_inside_paragraph() {
        let text = "First para.\n\nWe have $x$ here.\n\nLast para.";
        assert_eq!(context_of(text, "$x$"), "We have $x$ here.");
    }

    #[test]
    fn test_lone_fragment_borrows_following_block() {
        let text = "$F = ma$\n\nNewton's second law.";
        assert_eq!(context_of(text, "$F = ma$"), text);
    }

    #[test]
    fn test_lone_fragment_borrows_preceding_block() {
        let text = "Intro.\n\nThe law is\n\n$F = ma$";
        assert_eq!(context_of(text, "$F = ma$"), "The law is\n\n$F = ma$");
    }

    #[test]
    fn test_display_block_borrows_both_sides() {
        let text = "A.\n\nBefore.\n\n\\[x\\]\n\nAfter.\n\nZ.";
        assert_eq!(context_of(text, "\\[x\\]"), "Before.\n\n\\[x\\]\n\nAfter.");
    }

    #[test]
    fn test_extra_blank_lines_are_skipped() {
        let text = "$x$\n\n\n\nNext block.\n\nLater.";
        assert_eq!(context_of(text, "$x$"), "$x$\n\n\n\nNext block.");
    }

    #[test]
    fn test_whole_document_without_breaks() {
        let text = "  see \\cite{a} now  ";
        assert_eq!(context_of(text, "\\cite{a}"), "see \\cite{a} now");
    }

    #[test]
    fn test_match_at_document_end() {
        let text = "Para.\n\nText $y$";
        assert_eq!(context_of(text, "$y$"), "Text $y$");
    }
}
