use std::sync::Arc;

use serde::Deserialize;
use serde_json::json;

use crate::{
    contract::{poem_lines, ParameterSpec, ParameterType, ScoreResult, Verifier, VerifierDescriptor},
    phonetics::{CmuDictionary, PronouncingDictionary},
    poetry::pattern::score_syllable_pattern,
};

const TARGETS: [usize; 3] = [5, 7, 5];

/// Options for [`HaikuVerifier`].
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
#[serde(default)]
pub struct HaikuConfig {
    /// Allowed syllable deviation per line.
    pub tolerance: usize,
}

impl Default for HaikuConfig {
    fn default() -> Self {
        Self { tolerance: 1 }
    }
}

/// Three lines of roughly 5, 7 and 5 syllables.
#[derive(Clone)]
pub struct HaikuVerifier {
    dictionary: Arc<dyn PronouncingDictionary>,
}

impl HaikuVerifier {
    /// Creates a verifier over the given dictionary.
    #[must_use]
    pub fn new(dictionary: Arc<dyn PronouncingDictionary>) -> Self {
        Self { dictionary }
    }
}

impl Default for HaikuVerifier {
    fn default() -> Self {
        Self::new(CmuDictionary::bundled())
    }
}

impl Verifier for HaikuVerifier {
    type Config = HaikuConfig;

    fn describe(&self) -> VerifierDescriptor {
        VerifierDescriptor::new(
            "haiku_verifier",
            "Checks if text is a haiku with 3 lines and ~5-7-5 syllables.",
        )
        .parameter(
            "tolerance",
            ParameterSpec::new(
                ParameterType::Integer,
                "Allowed syllable deviation from 5 or 7.",
            )
            .with_default(json!(1)),
        )
    }

    fn score_with_feedback(&self, text: &str, config: &HaikuConfig) -> ScoreResult {
        score_syllable_pattern(
            "haiku",
            &poem_lines(text),
            &TARGETS,
            config.tolerance,
            self.dictionary.as_ref(),
        )
    }
}
