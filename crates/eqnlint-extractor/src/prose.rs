//! Prose paragraph extraction
//!
//! Strips preamble declarations, figure and table environments, math and
//! markup commands, then keeps the blank-line separated blocks that still
//! look like sentences.

use crate::ExtractorConfig;
use eqnlint_domain::Fragment;
use regex::Regex;
use std::sync::LazyLock;

/// Preamble and environment markers, removed outright
static PREAMBLE_PATTERNS: LazyLock<Vec<Regex>> = LazyLock::new(|| {
    compile(&[
        r"\\documentclass(?:\[.*?\])?\{.*?\}",
        r"\\usepackage(?:\[.*?\])?\{.*?\}",
        r"(?s)\\title\{.*?\}",
        r"(?s)\\author\{.*?\}",
        r"(?s)\\date\{.*?\}",
        r"\\maketitle",
        r"\\tableofcontents",
        r"\\begin\{document\}|\\end\{document\}",
        r"\\begin\{abstract\}|\\end\{abstract\}",
    ])
});

/// Floating environments, removed with their bodies
static FLOAT_PATTERNS: LazyLock<Vec<Regex>> = LazyLock::new(|| {
    compile(&[
        r"(?s)\\begin\{figure\*?\}.*?\\end\{figure\*?\}",
        r"(?s)\\begin\{table\*?\}.*?\\end\{table\*?\}",
    ])
});

/// Math blocks, replaced by a space
static MATH_PATTERNS: LazyLock<Vec<Regex>> = LazyLock::new(|| {
    compile(&[
        r"(?s)\\\[.*?\\\]",
        r"(?s)\\begin\{equation\*?\}.*?\\end\{equation\*?\}",
        r"(?s)\$\$.*?\$\$",
        r"\$(?:\\\$|[^$])*\$",
    ])
});

static COMMAND_REGEX: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"\\[a-zA-Z]+\*?(?:\[[^\]]*\])?(?:\{[^}]*\})*").expect("command pattern is valid")
});

static PARAGRAPH_BREAK: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"\n\s*\n").expect("paragraph pattern is valid"));

fn compile(patterns: &[&str]) -> Vec<Regex> {
    patterns
        .iter()
        .map(|p| Regex::new(p).expect("prose pattern is valid"))
        .collect()
}

fn strip_markup(text: &str) -> String {
    let mut stripped = text.to_string();
    for pattern in PREAMBLE_PATTERNS.iter() {
        stripped = pattern.replace_all(&stripped, "").into_owned();
    }
    for pattern in FLOAT_PATTERNS.iter() {
        stripped = pattern.replace_all(&stripped, "").into_owned();
    }
    for pattern in MATH_PATTERNS.iter() {
        stripped = pattern.replace_all(&stripped, " ").into_owned();
    }
    COMMAND_REGEX.replace_all(&stripped, " ").into_owned()
}

fn looks_like_prose(block: &str, min_length: usize) -> bool {
    block.chars().count() >= min_length
        && block.contains(' ')
        && block.chars().any(|c| c.is_ascii_alphabetic())
}

/// Prose paragraphs with an empty context
pub(crate) fn paragraphs(text: &str, config: &ExtractorConfig) -> Vec<Fragment> {
    let stripped = strip_markup(text);

    PARAGRAPH_BREAK
        .split(&stripped)
        .map(str::trim)
        .filter(|block| !block.is_empty() && looks_like_prose(block, config.prose_min_length))
        .map(|block| Fragment::new(block, ""))
        .collect()
}
