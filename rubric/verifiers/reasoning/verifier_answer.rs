use once_cell::sync::Lazy;
use regex::Regex;
use serde::Deserialize;

use crate::contract::{ParameterSpec, ParameterType, ScoreResult, Verifier, VerifierDescriptor};

static VERIFIER_ANSWER: Lazy<Regex> = Lazy::new(|| {
    Regex::new(r"(?is)<verifier_answer>\s*(.*?)\s*</verifier_answer>")
        .expect("verifier_answer pattern compiles")
});

/// Options for [`VerifierAnswerVerifier`].
#[derive(Debug, Clone, Default, PartialEq, Eq, Deserialize)]
#[serde(default)]
pub struct VerifierAnswerConfig {
    /// Plain expected answer; when absent nothing can be compared.
    pub gold_solution: Option<String>,
}

/// Compares the first `<verifier_answer>` body against a plain gold string.
///
/// Without a gold solution there is nothing to fail against, so the text
/// scores 1.0.
#[derive(Debug, Clone, Copy, Default)]
pub struct VerifierAnswerVerifier;

impl Verifier for VerifierAnswerVerifier {
    type Config = VerifierAnswerConfig;

    fn describe(&self) -> VerifierDescriptor {
        VerifierDescriptor::new(
            "verifier_answer_verifier",
            "Checks if the final answer is within <verifier_answer>...</verifier_answer> tags \
             and matches a plain gold solution.",
        )
        .parameter(
            "gold_solution",
            ParameterSpec::new(ParameterType::String, "Expected answer, compared after trimming."),
        )
    }

    fn score_with_feedback(&self, text: &str, config: &VerifierAnswerConfig) -> ScoreResult {
        let Some(gold) = config.gold_solution.as_deref() else {
            return ScoreResult::pass("No gold_solution provided; skipping strict comparison.");
        };
        let Some(caps) = VERIFIER_ANSWER.captures(text) else {
            return ScoreResult::fail(
                "No <verifier_answer>...</verifier_answer> found in model output.",
            );
        };
        let model = caps[1].trim();
        if model == gold.trim() {
            ScoreResult::pass(format!("matches exactly => model: '{model}', gold: '{gold}'"))
        } else {
            ScoreResult::fail(format!("differs => model: '{model}', gold: '{gold}'"))
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn with_gold(gold: &str) -> VerifierAnswerConfig {
        VerifierAnswerConfig {
            gold_solution: Some(gold.into()),
        }
    }

    #[test]
    fn matching_answer_scores_one() {
        let text = "<think>...</think><answer>x</answer><Verifier_Answer>\n 42 \n</Verifier_Answer>";
        let result = VerifierAnswerVerifier.score_with_feedback(text, &with_gold(" 42"));
        assert_eq!(result.score, 1.0);
        assert_eq!(result.feedback, vec!["matches exactly => model: '42', gold: ' 42'"]);
    }

    #[test]
    fn mismatch_and_missing_tag_score_zero() {
        let differs = VerifierAnswerVerifier
            .score_with_feedback("<verifier_answer>41</verifier_answer>", &with_gold("42"));
        assert_eq!(differs.score, 0.0);
        assert!(differs.feedback[0].starts_with("differs"));

        let missing = VerifierAnswerVerifier.score_with_feedback("42", &with_gold("42"));
        assert_eq!(
            missing.feedback,
            vec!["No <verifier_answer>...</verifier_answer> found in model output."]
        );
    }

    #[test]
    fn absent_gold_does_not_penalize() {
        let result =
            VerifierAnswerVerifier.score_with_feedback("anything", &VerifierAnswerConfig::default());
        assert_eq!(result.score, 1.0);
    }

    #[test]
    fn first_tag_wins() {
        let text = "<verifier_answer>a</verifier_answer><verifier_answer>b</verifier_answer>";
        assert_eq!(VerifierAnswerVerifier.score(text, &with_gold("a")), 1.0);
    }
}
