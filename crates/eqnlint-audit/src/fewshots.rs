//! Few-shot example sets, one per audit
//!
//! Each set opens with its own system turn, then alternates example prompts
//! and model answers. Opacity examples carry the expected output inside the
//! user turn.

use eqnlint_domain::Message;

pub(crate) static UNITS: &[Message] = &[
    Message::system(
        "You are auditing LaTeX equations for unit system consistency and detecting non-standard units.",
    ),
    Message::user("Check the units in: F = ma\nContext: Newton's second law. All units are SI.\n"),
    Message::assistant("✅ CONSISTENT: All units are SI (Force in N, mass in kg, acceleration in m/s^2)."),
    Message::user(
        "Check the units in: P = IV\nContext: Electric power equation. Units: I in Amps, V in Volts, P in Watts.\n",
    ),
    Message::assistant("✅ CONSISTENT: All units are SI."),
    Message::user("Check the units in: F = mg\nContext: g = 32 ft/s^2\n"),
    Message::assistant(
        "❌ INCONSISTENT: g uses Imperial units (ft/s^2) while the rest of the equation likely expects SI. Consider converting to m/s^2.",
    ),
    Message::user("Check the units in: E = hc/λ\nContext: E in eV, h in J·s, c in m/s, λ in nm.\n"),
    Message::assistant(
        "⚠️ MIXED UNITS: Energy is in eV and wavelength in nm, while Planck’s constant uses SI units. Consider converting to consistent units.",
    ),
];

pub(crate) static DIMENSIONS: &[Message] = &[
    Message::system("You are auditing LaTeX math for dimensional consistency."),
    Message::user(
        "Check: E = mc^2\nSymbols:\n{\n  \"E\": \"energy (J)\",\n  \"m\": \"mass (kg)\",\n  \"c\": \"speed of light (m/s)\"\n}",
    ),
    Message::assistant("✅ CONSISTENT: [J] = [kg][m/s]^2 is dimensionally valid."),
];

pub(crate) static CITATIONS: &[Message] = &[
    Message::system("You are an expert in LaTeX and academic citation checking."),
    Message::user("Check citations in: The well-known result \\cite{Einstein1905} changed physics."),
    Message::assistant("✅ DEFINED: \\cite{Einstein1905} appears correctly."),
    Message::user("Check citations in: A new method was proposed in \\cite{MissingRef}."),
    Message::assistant("❌ UNDEFINED: \\cite{MissingRef} is not defined in the bibliography."),
    Message::user("Check citations in: Smith et al. (2023) proposed this, but the DOI cannot be verified."),
    Message::assistant("⚠️ POSSIBLY FABRICATED: Smith et al. (2023) is not verifiable; double check."),
];

pub(crate) static OPACITY: &[Message] = &[
    Message::system(
        "You are an AI that reviews LaTeX papers for opaque or undefined symbols, acronyms, and notation.",
    ),
    Message::user(
        "Check this equation:\n\\begin{equation}\n\\Delta G = \\Delta H - T \\Delta S\n\\end{equation}\nContext:\nThis is a standard Gibbs free energy equation. \\Delta H is the enthalpy change, \\Delta S is the entropy change, but T is used without explanation.\n\nOutput:\n❌ UNDEFINED SYMBOL: T appears in the equation but is not defined in the nearby text. Consider defining it as 'Temperature (K)'.",
    ),
    Message::user(
        "Check this equation:\n\\begin{equation}\nE = mc^2\n\\end{equation}\nContext:\nSpecial relativity: m is mass, c is speed of light, E is energy.\n\nOutput:\n✅ ALL SYMBOLS DEFINED: No undefined symbols found in nearby text.",
    ),
];

pub(crate) static PROSE: &[Message] = &[
    Message::system(
        "You are an editor improving scientific prose for clarity and concision without changing technical meaning.",
    ),
    Message::user(
        "Text:\nThe results in this paper are in fact actually very novel and basically show that...\nTask: Suggest a concise rewrite starting with a one-line verdict: ✅ CLEAR, ⚠️ NEEDS EDIT, or ❌ UNCLEAR.",
    ),
    Message::assistant("⚠️ NEEDS EDIT: Redundant hedging.\nRewrite: These results are novel and show that ..."),
    Message::user(
        "Text:\nWe define S(x) as local entropy density and use it consistently hereafter.\nTask: Suggest a concise rewrite starting with a one-line verdict.",
    ),
    Message::assistant("✅ CLEAR: No change needed."),
];

pub(crate) static SYMBOLS: &[Message] = &[
    Message::system("You are an expert in dimensional analysis and LaTeX math."),
    Message::user("Build a symbol dictionary for: E = mc^2"),
    Message::assistant(
        "{\n  \"E\": \"energy (J)\",\n  \"m\": \"mass (kg)\",\n  \"c\": \"speed of light (m/s)\"\n}",
    ),
];

pub(crate) static CONTEXT: &[Message] = &[
    Message::system("You are an expert scientific reviewer. Audit citations for accuracy."),
    Message::user(
        "Context:\n“As shown in \\cite{Hestenes1990}, the Zitterbewegung motion explains intrinsic spin.”\nAudit:\nDoes \\cite{Hestenes1990} support this claim?",
    ),
    Message::assistant("✅ ACCURATE: The statement correctly reflects the findings in Hestenes1990."),
    Message::user(
        "Context:\n“\\cite{Hestenes1990} demonstrates faster-than-light particles exist.”\nAudit:\nDoes \\cite{Hestenes1990} support this claim?",
    ),
    Message::assistant("❌ FABRICATION: Hestenes1990 does not claim faster-than-light particles exist."),
];

#[cfg(test)]
mod tests {
    use super::*;
    use eqnlint_domain::{Role, Verdict};

    fn all_sets() -> [&'static [Message]; 7] {
        [UNITS, DIMENSIONS, CITATIONS, OPACITY, PROSE, SYMBOLS, CONTEXT]
    }

    #[test]
    fn test_sets_open_with_system_turn() {
        for set in all_sets() {
            assert_eq!(set[0].role, Role::System);
            assert!(set[1..].iter().all(|m| m.role != Role::System));
        }
    }

    #[test]
    fn test_verdict_answers_parse() {
        for set in [UNITS, DIMENSIONS, CITATIONS, PROSE, CONTEXT] {
            for answer in set.iter().filter(|m| m.role == Role::Assistant) {
                assert!(!Verdict::parse(answer.content()).is_empty(), "{}", answer.content());
            }
        }
    }
}
