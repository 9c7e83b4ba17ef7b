use once_cell::sync::Lazy;
use regex::Regex;
use serde::Deserialize;

use crate::contract::{ParameterSpec, ParameterType, ScoreResult, Verifier, VerifierDescriptor};

static BOXED: Lazy<Regex> = Lazy::new(|| {
    Regex::new(r"(?s)\\\(\s*\\boxed\s*\{\s*(.*?)\s*\}\s*\\\)").expect("boxed pattern compiles")
});

/// First `\(\boxed{...}\)` body in `text`, trimmed.
#[must_use]
pub fn extract_boxed(text: &str) -> Option<&str> {
    BOXED
        .captures(text)
        .and_then(|caps| caps.get(1))
        .map(|body| body.as_str().trim())
}

/// Options for [`BoxedAnswerVerifier`].
#[derive(Debug, Clone, Default, PartialEq, Eq, Deserialize)]
#[serde(default)]
pub struct BoxedAnswerConfig {
    /// Gold solution containing its own boxed answer.
    pub gold_solution: Option<String>,
}

/// Compares boxed answers between model output and a gold solution.
///
/// Scoring without a gold solution fails closed; a gold solution with no
/// box of its own cannot be compared and passes.
#[derive(Debug, Clone, Copy, Default)]
pub struct BoxedAnswerVerifier;

impl Verifier for BoxedAnswerVerifier {
    type Config = BoxedAnswerConfig;

    fn describe(&self) -> VerifierDescriptor {
        VerifierDescriptor::new(
            "boxed_answer_verifier",
            "Enforces that the final answer is in a LaTeX box and matches the gold solution.",
        )
        .parameter(
            "gold_solution",
            ParameterSpec::new(
                ParameterType::String,
                "Reference solution whose \\(\\boxed{...}\\) content must be matched.",
            ),
        )
    }

    fn score_with_feedback(&self, text: &str, config: &BoxedAnswerConfig) -> ScoreResult {
        let Some(gold_solution) = config.gold_solution.as_deref() else {
            return ScoreResult::fail(
                "No gold_solution provided; skipping strict comparison => score=0.0.",
            );
        };
        let Some(gold) = extract_boxed(gold_solution) else {
            return ScoreResult::pass(
                "Gold solution has no \\(\\boxed{...}\\) => no strict comparison => score=1.0.",
            );
        };
        let Some(model) = extract_boxed(text) else {
            return ScoreResult::fail("No \\(\\boxed{...}\\) found in model output => score=0.0.");
        };
        if model == gold {
            ScoreResult::pass(format!(
                "matches exactly => model: '{model}', gold: '{gold}' => score=1.0"
            ))
        } else {
            ScoreResult::fail(format!(
                "differs => model: '{model}', gold: '{gold}' => score=0.0"
            ))
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn gold(value: &str) -> BoxedAnswerConfig {
        BoxedAnswerConfig {
            gold_solution: Some(value.into()),
        }
    }

    #[test]
    fn equal_boxes_match() {
        let result = BoxedAnswerVerifier
            .score_with_feedback(r"So the answer is \(\boxed{42}\).", &gold(r"\(\boxed{ 42 }\)"));
        assert_eq!(result.score, 1.0);
        assert_eq!(
            result.feedback,
            vec!["matches exactly => model: '42', gold: '42' => score=1.0"]
        );
    }

    #[test]
    fn different_boxes_differ() {
        let result =
            BoxedAnswerVerifier.score_with_feedback(r"\(\boxed{24}\)", &gold(r"\(\boxed{42}\)"));
        assert_eq!(result.score, 0.0);
        assert!(result.feedback[0].starts_with("differs"));
    }

    #[test]
    fn missing_box_names_the_box() {
        let result = BoxedAnswerVerifier.score_with_feedback("42", &gold(r"\(\boxed{42}\)"));
        assert_eq!(result.score, 0.0);
        assert_eq!(
            result.feedback,
            vec![r"No \(\boxed{...}\) found in model output => score=0.0."]
        );
    }

    #[test]
    fn reference_policies() {
        let none = BoxedAnswerVerifier.score_with_feedback(r"\(\boxed{1}\)", &BoxedAnswerConfig::default());
        assert_eq!(none.score, 0.0);
        let unboxed = BoxedAnswerVerifier.score_with_feedback("anything", &gold("42"));
        assert_eq!(unboxed.score, 1.0);
    }

    #[test]
    fn extraction_spans_lines_and_spacing() {
        assert_eq!(extract_boxed("\\(\n \\boxed {\n x^2 + 1 \n}\n\\)"), Some("x^2 + 1"));
        assert_eq!(extract_boxed(r"\boxed{42}"), None);
    }
}
