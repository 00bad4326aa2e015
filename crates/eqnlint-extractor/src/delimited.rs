//! Delimiter-bounded extraction for equations and citations

use crate::context::enclosing_block;
use crate::ExtractorConfig;
use eqnlint_domain::Fragment;
use regex::Regex;
use std::sync::LazyLock;

// Alternation order is the priority order: environments, then display math,
// then inline math. Leftmost-first matching means a span claimed by one
// alternative is never matched again by another.
static EQUATION_REGEX: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(concat!(
        r"(?s)\\begin\{equation\*?\}.*?\\end\{equation\*?\}",
        r"|\\\[.*?\\\]",
        r"|\$(?:[^$]|\\\$)+\$",
    ))
    .expect("equation pattern is valid")
});

static CITATION_REGEX: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"(?s)\\cite\{.*?\}|\\bibitem\{.*?\}").expect("citation pattern is valid")
});

static CITE_KEYS_REGEX: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"\\cite[a-zA-Z]*\{(.*?)\}").expect("cite-key pattern is valid"));

fn with_context(regex: &Regex, text: &str, config: &ExtractorConfig) -> Vec<Fragment> {
    regex
        .find_iter(text)
        .map(|m| {
            let context = enclosing_block(text, m.start(), m.end());
            Fragment::new(m.as_str().trim(), config.bound_context(context))
        })
        .collect()
}

/// Equation environments, `\[...\]` display math and `$...$` inline math
pub(crate) fn equations(text: &str, config: &ExtractorConfig) -> Vec<Fragment> {
    with_context(&EQUATION_REGEX, text, config)
}

/// `\cite{...}` and `\bibitem{...}` commands
pub(crate) fn citations(text: &str, config: &ExtractorConfig) -> Vec<Fragment> {
    with_context(&CITATION_REGEX, text, config)
}

/// One fragment per key of any `\cite*{...}` command
///
/// The fragment text is the whole command; the key is carried as focus.
/// Empty keys (`\cite{a,,b}`) are skipped.
pub(crate) fn citation_keys(text: &str, config: &ExtractorConfig) -> Vec<Fragment> {
    let mut fragments = Vec::new();

    for caps in CITE_KEYS_REGEX.captures_iter(text) {
        let (Some(whole), Some(keys)) = (caps.get(0), caps.get(1)) else {
            continue;
        };
        let context = config.bound_context(enclosing_block(text, whole.start(), whole.end()));
        let command = whole.as_str().trim();

        fragments.extend(
            keys.as_str()
                .split(',')
                .map(str::trim)
                .filter(|key| !key.is_empty())
                .map(|key| Fragment::new(command, context).with_focus(key)),
        );
    }

    fragments
}

#[cfg(test)]
mod tests {
    use super::*;

    fn texts(fragments: &[Fragment]) -> Vec<&str> {
        fragments.iter().map(Fragment::text).collect()
    }

    #[test]
    fn test_all_equation_forms_in_document_order() {
        let doc = "Inline $a+b$ first.\n\n\\[ c = d \\]\n\n\\begin{equation}\ne = f\n\\end{equation}\n\nand \\begin{equation*}g\\end{equation*}.";
        let fragments = equations(doc, &ExtractorConfig::default());
        assert_eq!(
            texts(&fragments),
            vec![
                "$a+b$",
                "\\[ c = d \\]",
                "\\begin{equation}\ne = f\n\\end{equation}",
                "\\begin{equation*}g\\end{equation*}",
            ]
        );
    }

    #[test]
    fn test_inline_math_inside_environment_is_not_repeated() {
        let doc = "\\begin{equation}\nx = $y$\n\\end{equation}";
        let fragments = equations(doc, &ExtractorConfig::default());
        assert_eq!(fragments.len(), 1);
    }

    #[test]
    fn test_non_greedy_matching() {
        let doc = "$a$ and $b$";
        let fragments = equations(doc, &ExtractorConfig::default());
        assert_eq!(texts(&fragments), vec!["$a$", "$b$"]);
    }

    #[test]
    fn test_unmatched_openers_produce_nothing() {
        let config = ExtractorConfig::default();
        assert!(equations("\\begin{equation} x = 1", &config).is_empty());
        assert!(equations("\\[ x = 1", &config).is_empty());
        assert!(equations("costs $5", &config).is_empty());
    }

    #[test]
    fn test_citations() {
        let doc = "As shown \\cite{Smith2020}.\n\n\\bibitem{Smith2020} J. Smith.";
        let fragments = citations(doc, &ExtractorConfig::default());
        assert_eq!(texts(&fragments), vec!["\\cite{Smith2020}", "\\bibitem{Smith2020}"]);
        assert_eq!(fragments[0].context(), "As shown \\cite{Smith2020}.");
    }

    #[test]
    fn test_citations_ignore_variants() {
        let fragments = citations("See \\citep{a}.", &ExtractorConfig::default());
        assert!(fragments.is_empty());
    }

    #[test]
    fn test_citation_keys_split_per_key() {
        let doc = "Prior work \\citep{Lee2019, Kim2021} shows this.";
        let fragments = citation_keys(doc, &ExtractorConfig::default());

        assert_eq!(fragments.len(), 2);
        assert_eq!(fragments[0].text(), "\\citep{Lee2019, Kim2021}");
        assert_eq!(fragments[0].focus(), Some("Lee2019"));
        assert_eq!(fragments[1].focus(), Some("Kim2021"));
        assert_eq!(fragments[1].context(), doc);
    }

    #[test]
    fn test_citation_keys_skip_empty_keys() {
        let fragments = citation_keys("\\cite{a,,b} \\cite{}", &ExtractorConfig::default());
        let keys: Vec<_> = fragments.iter().filter_map(Fragment::focus).collect();
        assert_eq!(keys, vec!["a", "b"]);
    }

    #[test]
    fn test_context_is_bounded() {
        let config = ExtractorConfig {
            max_context_chars: 10,
            ..ExtractorConfig::default()
        };
        let fragments = equations("A long sentence with $x$ in the middle.", &config);
        assert_eq!(fragments[0].context(), "A long sen");
    }
}
