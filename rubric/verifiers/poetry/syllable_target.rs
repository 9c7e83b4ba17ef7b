use std::sync::Arc;

use serde::Deserialize;
use serde_json::json;

use crate::{
    contract::{
        fraction, poem_lines, ParameterSpec, ParameterType, ScoreResult, Verifier,
        VerifierDescriptor,
    },
    phonetics::{CmuDictionary, PronouncingDictionary},
    poetry::diagnostics::LineDiagnostic,
};

/// Options for [`SyllableTargetVerifier`].
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
#[serde(default)]
pub struct SyllableTargetConfig {
    /// Approximate syllables wanted on every line.
    pub desired_syllables: usize,
}

impl Default for SyllableTargetConfig {
    fn default() -> Self {
        Self {
            desired_syllables: 8,
        }
    }
}

/// Per-line closeness to a syllable target, averaged over the poem.
///
/// Within two syllables earns a full point, within four earns half.
#[derive(Clone)]
pub struct SyllableTargetVerifier {
    dictionary: Arc<dyn PronouncingDictionary>,
}

impl SyllableTargetVerifier {
    /// Creates a verifier over the given dictionary.
    #[must_use]
    pub fn new(dictionary: Arc<dyn PronouncingDictionary>) -> Self {
        Self { dictionary }
    }
}

impl Default for SyllableTargetVerifier {
    fn default() -> Self {
        Self::new(CmuDictionary::bundled())
    }
}

impl Verifier for SyllableTargetVerifier {
    type Config = SyllableTargetConfig;

    fn describe(&self) -> VerifierDescriptor {
        VerifierDescriptor::new(
            "syllable_verifier",
            "Checks approximate syllable counts against a desired value.",
        )
        .parameter(
            "desired_syllables",
            ParameterSpec::new(
                ParameterType::Integer,
                "Approximate number of syllables per line.",
            )
            .with_default(json!(8)),
        )
    }

    fn score_with_feedback(&self, text: &str, config: &SyllableTargetConfig) -> ScoreResult {
        let lines = poem_lines(text);
        if lines.is_empty() {
            return ScoreResult::fail("No lines to count.");
        }
        let target = config.desired_syllables;
        let mut half_points = 0;
        let mut feedback = Vec::with_capacity(lines.len());
        for (idx, line) in lines.iter().enumerate() {
            let diagnostic = LineDiagnostic::analyze(idx + 1, line, self.dictionary.as_ref());
            let (credit, label) = match diagnostic.total.abs_diff(target) {
                0..=2 => (2, "full credit"),
                3..=4 => (1, "half credit"),
                _ => (0, "no credit"),
            };
            half_points += credit;
            feedback.push(diagnostic.render(&format!("(target {target}) => {label}")));
        }
        ScoreResult::new(fraction(half_points, 2 * lines.len()), feedback)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn credits_are_averaged_across_lines() {
        let verifier = SyllableTargetVerifier::default();
        let text = "There once was a fellow named Lee\nAn old silent pond\nOne";
        let result = verifier.score_with_feedback(text, &SyllableTargetConfig::default());
        // 8 => full, 5 => half, 1 => none
        assert!((result.score - 0.5).abs() < 1e-9);
        assert!(result.feedback[0].ends_with("Total: 8 syllables (target 8) => full credit"));
        assert!(result.feedback[1].ends_with("(target 8) => half credit"));
        assert!(result.feedback[2].ends_with("(target 8) => no credit"));
    }

    #[test]
    fn empty_text_scores_zero() {
        let verifier = SyllableTargetVerifier::default();
        let result = verifier.score_with_feedback("\n  \n", &SyllableTargetConfig::default());
        assert_eq!(result.score, 0.0);
        assert_eq!(result.feedback, vec!["No lines to count."]);
    }
}
