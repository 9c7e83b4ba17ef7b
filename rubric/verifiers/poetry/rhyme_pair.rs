use std::sync::Arc;

use serde::Deserialize;
use serde_json::json;

use crate::{
    contract::{
        fraction, poem_lines, ParameterSpec, ParameterType, ScoreResult, Verifier,
        VerifierDescriptor,
    },
    phonetics::{rhyme::last_word, rhyme_tail, CmuDictionary, PronouncingDictionary},
    poetry::diagnostics::{render_rhyme_detail, LineDiagnostic, RhymeMember},
};

/// Options for [`RhymeVerifier`].
#[derive(Debug, Clone, PartialEq, Deserialize)]
#[serde(default)]
pub struct RhymeConfig {
    /// Minimum trailing-overlap ratio that earns partial credit.
    pub partial_threshold: f64,
    /// Score when only the last letters agree.
    pub fallback_credit: f64,
}

impl Default for RhymeConfig {
    fn default() -> Self {
        Self {
            partial_threshold: 0.5,
            fallback_credit: 0.5,
        }
    }
}

/// Whether the first two lines rhyme.
///
/// Identical tails score 1.0; otherwise the trailing-aligned overlap ratio
/// counts when it reaches the threshold, and a shared final letter earns
/// the fallback credit.
#[derive(Clone)]
pub struct RhymeVerifier {
    dictionary: Arc<dyn PronouncingDictionary>,
}

impl RhymeVerifier {
    /// Creates a verifier over the given dictionary.
    #[must_use]
    pub fn new(dictionary: Arc<dyn PronouncingDictionary>) -> Self {
        Self { dictionary }
    }
}

impl Default for RhymeVerifier {
    fn default() -> Self {
        Self::new(CmuDictionary::bundled())
    }
}

fn letter_fallback(first: &str, second: &str, credit: f64) -> (f64, String) {
    let a = last_word(first).chars().last();
    let b = last_word(second).chars().last();
    match (a, b) {
        (Some(x), Some(y)) if x == y => {
            let credit = credit.clamp(0.0, 1.0);
            (
                credit,
                format!("Last letters match ('{x}'), awarding fallback credit={credit}."),
            )
        }
        _ => (0.0, "No letter match; 0.0 score.".to_string()),
    }
}

impl Verifier for RhymeVerifier {
    type Config = RhymeConfig;

    fn describe(&self) -> VerifierDescriptor {
        VerifierDescriptor::new(
            "rhyme_verifier",
            "Checks if line 1 and line 2 rhyme via phoneme overlap, with a last-letter fallback.",
        )
        .parameter(
            "partial_threshold",
            ParameterSpec::new(
                ParameterType::Float,
                "Minimum fraction of overlapping phonemes required at the tail for partial rhyme.",
            )
            .with_default(json!(0.5)),
        )
        .parameter(
            "fallback_credit",
            ParameterSpec::new(
                ParameterType::Float,
                "Score assigned if phonetic overlap fails but the last letters match.",
            )
            .with_default(json!(0.5)),
        )
    }

    fn score_with_feedback(&self, text: &str, config: &RhymeConfig) -> ScoreResult {
        let dictionary = self.dictionary.as_ref();
        let lines = poem_lines(text);
        if lines.len() < 2 {
            return ScoreResult::fail("Need at least 2 lines to check rhyme.");
        }

        let mut feedback: Vec<String> = lines
            .iter()
            .enumerate()
            .map(|(idx, line)| {
                let verdict = if idx < 2 {
                    "(rhyme pair, no syllable target)"
                } else {
                    "(not compared)"
                };
                LineDiagnostic::analyze(idx + 1, line, dictionary).render(verdict)
            })
            .collect();

        let first = rhyme_tail(lines[0], dictionary);
        let second = rhyme_tail(lines[1], dictionary);
        let perfect = !first.is_empty() && first == second;
        let members = [
            RhymeMember::analyze(1, lines[0], dictionary),
            RhymeMember::analyze(2, lines[1], dictionary),
        ];
        feedback.push(render_rhyme_detail("Rhyme detail", &members, perfect));

        if first.is_empty() || second.is_empty() {
            feedback.push("Could not extract rhyme endings (maybe empty last words?).".to_string());
            return ScoreResult::new(0.0, feedback);
        }
        if perfect {
            feedback.push(format!("Perfect rhyme: both lines share '{first}'."));
            return ScoreResult::new(1.0, feedback);
        }

        let ratio = fraction(
            first.trailing_overlap(&second),
            first.units().len().min(second.units().len()),
        );
        feedback.push(format!(
            "Overlap ratio: {ratio:.2} (threshold={}).",
            config.partial_threshold
        ));
        if ratio >= config.partial_threshold {
            feedback.push("Overlap ratio meets threshold => partial rhyme credit.".to_string());
            return ScoreResult::new(ratio, feedback);
        }

        let (score, message) = letter_fallback(lines[0], lines[1], config.fallback_credit);
        feedback.push(message);
        ScoreResult::new(score, feedback)
    }
}
