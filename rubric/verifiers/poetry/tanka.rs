use std::sync::Arc;

use serde::Deserialize;
use serde_json::json;

use crate::{
    contract::{poem_lines, ParameterSpec, ParameterType, ScoreResult, Verifier, VerifierDescriptor},
    phonetics::{CmuDictionary, PronouncingDictionary},
    poetry::pattern::score_syllable_pattern,
};

const TARGETS: [usize; 5] = [5, 7, 5, 7, 7];

/// Options for [`TankaVerifier`].
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
#[serde(default)]
pub struct TankaConfig {
    /// Allowed syllable deviation per line.
    pub tolerance: usize,
}

impl Default for TankaConfig {
    fn default() -> Self {
        Self { tolerance: 1 }
    }
}

/// Five lines of roughly 5, 7, 5, 7 and 7 syllables.
#[derive(Clone)]
pub struct TankaVerifier {
    dictionary: Arc<dyn PronouncingDictionary>,
}

impl TankaVerifier {
    /// Creates a verifier over the given dictionary.
    #[must_use]
    pub fn new(dictionary: Arc<dyn PronouncingDictionary>) -> Self {
        Self { dictionary }
    }
}

impl Default for TankaVerifier {
    fn default() -> Self {
        Self::new(CmuDictionary::bundled())
    }
}

impl Verifier for TankaVerifier {
    type Config = TankaConfig;

    fn describe(&self) -> VerifierDescriptor {
        VerifierDescriptor::new(
            "tanka_verifier",
            "Checks if text is a tanka with 5 lines ~5-7-5-7-7 syllables.",
        )
        .parameter(
            "tolerance",
            ParameterSpec::new(
                ParameterType::Integer,
                "Allowed +/- deviation from the line's expected syllable count.",
            )
            .with_default(json!(1)),
        )
    }

    fn score_with_feedback(&self, text: &str, config: &TankaConfig) -> ScoreResult {
        score_syllable_pattern(
            "tanka",
            &poem_lines(text),
            &TARGETS,
            config.tolerance,
            self.dictionary.as_ref(),
        )
    }
}
