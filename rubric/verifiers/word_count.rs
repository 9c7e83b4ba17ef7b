use serde::Deserialize;
use serde_json::json;

use crate::contract::{ParameterSpec, ParameterType, ScoreResult, Verifier, VerifierDescriptor};

/// Options for [`WordCountVerifier`].
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
#[serde(default)]
pub struct WordCountConfig {
    /// Exact number of words required.
    pub n: usize,
    /// Whether punctuation may ride along inside a word.
    pub allow_punctuation: bool,
}

impl Default for WordCountConfig {
    fn default() -> Self {
        Self {
            n: 1,
            allow_punctuation: true,
        }
    }
}

/// Whether `answer` holds exactly `n` words.
///
/// With punctuation disallowed, ASCII punctuation is stripped first and every
/// remaining word must be alphanumeric.
#[must_use]
pub fn is_n_words(answer: &str, n: usize, allow_punctuation: bool) -> bool {
    let trimmed = answer.trim();
    if trimmed.is_empty() {
        return false;
    }
    if allow_punctuation {
        return trimmed.split_whitespace().count() == n;
    }
    let cleaned: String = trimmed.chars().filter(|c| !c.is_ascii_punctuation()).collect();
    let parts: Vec<&str> = cleaned.split_whitespace().collect();
    parts.len() == n && parts.iter().all(|part| part.chars().all(char::is_alphanumeric))
}

/// Exact word-count check.
#[derive(Debug, Clone, Copy, Default)]
pub struct WordCountVerifier;

impl Verifier for WordCountVerifier {
    type Config = WordCountConfig;

    fn describe(&self) -> VerifierDescriptor {
        VerifierDescriptor::new(
            "is_n_words_verifier",
            "Checks that the answer contains exactly n words.",
        )
        .parameter(
            "n",
            ParameterSpec::new(ParameterType::Integer, "Exact number of words required.")
                .with_default(json!(1)),
        )
        .parameter(
            "allow_punctuation",
            ParameterSpec::new(
                ParameterType::Boolean,
                "If false, punctuation is removed and every word must be alphanumeric.",
            )
            .with_default(json!(true)),
        )
    }

    fn score_with_feedback(&self, text: &str, config: &WordCountConfig) -> ScoreResult {
        let found = text.split_whitespace().count();
        if is_n_words(text, config.n, config.allow_punctuation) {
            ScoreResult::pass(format!("Answer has exactly {} word(s).", config.n))
        } else {
            ScoreResult::fail(format!(
                "Expected exactly {} word(s) (allow_punctuation={}), found {found} whitespace-separated token(s).",
                config.n, config.allow_punctuation
            ))
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn counts_with_punctuation_allowed() {
        assert!(is_n_words("Hello", 1, true));
        assert!(is_n_words("Hello!", 1, true));
        assert!(is_n_words("   Hello   ", 1, true));
        assert!(is_n_words("Spider-Man", 1, true));
        assert!(is_n_words("Hello world!", 2, true));
        assert!(!is_n_words("", 1, true));
        assert!(!is_n_words("One two three", 2, true));
    }

    #[test]
    fn strict_mode_strips_punctuation() {
        assert!(is_n_words("No,", 1, false));
        assert!(is_n_words("Spider-Man", 1, false));
        assert!(!is_n_words("!!!", 1, false));
        assert!(is_n_words("A B C D", 4, false));
    }

    #[test]
    fn verifier_reports_counts() {
        let result = WordCountVerifier.score_with_feedback("two words", &WordCountConfig::default());
        assert_eq!(result.score, 0.0);
        assert_eq!(
            result.feedback,
            vec!["Expected exactly 1 word(s) (allow_punctuation=true), found 2 whitespace-separated token(s)."]
        );
        let config = WordCountConfig {
            n: 2,
            allow_punctuation: false,
        };
        assert_eq!(WordCountVerifier.score("two words.", &config), 1.0);
    }
}
