use serde::Deserialize;
use serde_json::json;

use crate::contract::{
    poem_lines, ParameterSpec, ParameterType, ScoreResult, Verifier, VerifierDescriptor,
};

/// Options for [`LineCountVerifier`].
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
#[serde(default)]
pub struct LineCountConfig {
    /// Desired number of non-blank lines.
    pub desired: usize,
}

impl Default for LineCountConfig {
    fn default() -> Self {
        Self { desired: 5 }
    }
}

/// Exact line count, with half credit when off by one.
#[derive(Debug, Clone, Copy, Default)]
pub struct LineCountVerifier;

impl Verifier for LineCountVerifier {
    type Config = LineCountConfig;

    fn describe(&self) -> VerifierDescriptor {
        VerifierDescriptor::new(
            "line_count_verifier",
            "Checks if a poem has the desired number of lines.",
        )
        .parameter(
            "desired",
            ParameterSpec::new(ParameterType::Integer, "Desired number of lines in the poem.")
                .with_default(json!(5)),
        )
    }

    fn score_with_feedback(&self, text: &str, config: &LineCountConfig) -> ScoreResult {
        let found = poem_lines(text).len();
        let desired = config.desired;
        match found.abs_diff(desired) {
            0 => ScoreResult::pass(format!("Line count matches ({found} lines).")),
            1 => ScoreResult::new(
                0.5,
                vec![format!(
                    "Line count off by one: expected {desired}, got {found}."
                )],
            ),
            _ => ScoreResult::fail(format!(
                "Line count mismatch: expected {desired}, got {found}."
            )),
        }
    }
}
