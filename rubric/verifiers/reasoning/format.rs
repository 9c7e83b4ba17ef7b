use once_cell::sync::Lazy;
use regex::Regex;

use crate::contract::{NoParams, ScoreResult, Verifier, VerifierDescriptor};

static THINK_ANSWER: Lazy<Regex> = Lazy::new(|| {
    Regex::new(r"(?s)^\s*<think>(.*?)</think>\s*<answer>(.*?)</answer>\s*$")
        .expect("think/answer pattern compiles")
});

static THINK_ANSWER_VERIFIER: Lazy<Regex> = Lazy::new(|| {
    Regex::new(
        r"(?s)^\s*<think>(.*?)</think>\s*<answer>(.*?)</answer>\s*<verifier_answer>(.*?)</verifier_answer>\s*$",
    )
    .expect("full format pattern compiles")
});

/// Whole text must be `<think>..</think><answer>..</answer>` with both bodies non-empty.
#[derive(Debug, Clone, Copy, Default)]
pub struct ReasoningFormatVerifier;

impl Verifier for ReasoningFormatVerifier {
    type Config = NoParams;

    fn describe(&self) -> VerifierDescriptor {
        VerifierDescriptor::new(
            "reasoning_format_tag_verifier",
            "Checks if the text follows the required reasoning format with <think> and <answer> tags.",
        )
    }

    fn score_with_feedback(&self, text: &str, _config: &NoParams) -> ScoreResult {
        let Some(caps) = THINK_ANSWER.captures(text) else {
            return ScoreResult::fail(
                "Text does not conform to the required format. Ensure it follows: \
                 <think>reasoning...</think><answer>final answer...</answer>.",
            );
        };
        if caps[1].trim().is_empty() {
            return ScoreResult::fail("The <think> section is empty. It must contain reasoning steps.");
        }
        if caps[2].trim().is_empty() {
            return ScoreResult::fail("The <answer> section is empty. It must contain a final answer.");
        }
        ScoreResult::pass("Text correctly includes both <think> and <answer> tags with valid content.")
    }
}

/// Whole text must be `<think>`, `<answer>` then `<verifier_answer>`, all non-empty.
#[derive(Debug, Clone, Copy, Default)]
pub struct StrictFullFormatVerifier;

impl Verifier for StrictFullFormatVerifier {
    type Config = NoParams;

    fn describe(&self) -> VerifierDescriptor {
        VerifierDescriptor::new(
            "strict_full_format_verifier",
            "Strictly checks <think>...</think><answer>...</answer><verifier_answer>...</verifier_answer> \
             with no partial credit.",
        )
    }

    fn score_with_feedback(&self, text: &str, _config: &NoParams) -> ScoreResult {
        let Some(caps) = THINK_ANSWER_VERIFIER.captures(text) else {
            return ScoreResult::fail(
                "Does not strictly match <think>...</think><answer>...</answer>\
                 <verifier_answer>...</verifier_answer> => score=0.0.",
            );
        };
        if (1..=3).all(|idx| !caps[idx].trim().is_empty()) {
            ScoreResult::pass("Strict match for <think>, <answer>, <verifier_answer> => score=1.0.")
        } else {
            ScoreResult::fail("One or more tags are empty => score=0.0.")
        }
    }
}
