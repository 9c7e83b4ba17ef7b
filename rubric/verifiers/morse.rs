use std::collections::HashMap;

use once_cell::sync::Lazy;
use serde::{Deserialize, Serialize};
use serde_json::json;

use crate::contract::{
    fraction, ParameterSpec, ParameterType, ScoreResult, Verifier, VerifierDescriptor,
};

const TABLE: &[(char, &str)] = &[
    ('A', ".-"),
    ('B', "-..."),
    ('C', "-.-."),
    ('D', "-.."),
    ('E', "."),
    ('F', "..-."),
    ('G', "--."),
    ('H', "...."),
    ('I', ".."),
    ('J', ".---"),
    ('K', "-.-"),
    ('L', ".-.."),
    ('M', "--"),
    ('N', "-."),
    ('O', "---"),
    ('P', ".--."),
    ('Q', "--.-"),
    ('R', ".-."),
    ('S', "..."),
    ('T', "-"),
    ('U', "..-"),
    ('V', "...-"),
    ('W', ".--"),
    ('X', "-..-"),
    ('Y', "-.--"),
    ('Z', "--.."),
    ('0', "-----"),
    ('1', ".----"),
    ('2', "..---"),
    ('3', "...--"),
    ('4', "....-"),
    ('5', "....."),
    ('6', "-...."),
    ('7', "--..."),
    ('8', "---.."),
    ('9', "----."),
    (',', "--..--"),
    ('.', ".-.-.-"),
    ('?', "..--.."),
    (';', "-.-.-."),
    (':', "---..."),
    ('\'', ".----."),
    ('-', "-....-"),
    ('/', "-..-."),
    ('(', "-.--."),
    (')', "-.--.-"),
    ('"', ".-..-."),
];

static ENCODE: Lazy<HashMap<char, &'static str>> = Lazy::new(|| TABLE.iter().copied().collect());

static DECODE: Lazy<HashMap<&'static str, char>> =
    Lazy::new(|| TABLE.iter().map(|&(c, code)| (code, c)).collect());

/// Encodes text as space-separated Morse tokens.
///
/// Whitespace becomes `/` and characters outside the table become `?`.
#[must_use]
pub fn encode(text: &str) -> String {
    text.chars()
        .flat_map(char::to_uppercase)
        .map(|c| {
            if c.is_whitespace() {
                "/"
            } else {
                ENCODE.get(&c).copied().unwrap_or("?")
            }
        })
        .collect::<Vec<_>>()
        .join(" ")
}

/// Decodes space-separated Morse tokens.
///
/// `/` becomes a space and unknown tokens become `?`.
#[must_use]
pub fn decode(code: &str) -> String {
    code.split_whitespace()
        .map(|token| {
            if token == "/" {
                ' '
            } else {
                DECODE.get(token).copied().unwrap_or('?')
            }
        })
        .collect()
}

/// Direction being verified.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum MorseMode {
    /// Candidate is Morse for plain reference text.
    #[default]
    Encode,
    /// Candidate is plain text for a Morse reference.
    Decode,
}

/// Options for [`MorseCodeVerifier`].
#[derive(Debug, Clone, Default, PartialEq, Eq, Deserialize)]
#[serde(default)]
pub struct MorseConfig {
    /// Plain text (encode) or Morse (decode) reference.
    pub original_text: String,
    /// Direction being verified.
    pub verify_mode: MorseMode,
}

/// Positional overlap between a reference and a candidate sequence.
struct Overlap {
    matches: usize,
    longest: usize,
    mismatches: Vec<(usize, String, String)>,
}

impl Overlap {
    fn compare<T: PartialEq + ToString>(reference: &[T], candidate: &[T]) -> Self {
        let mut matches = 0;
        let mut mismatches = Vec::new();
        for (idx, (r, c)) in reference.iter().zip(candidate).enumerate() {
            if r == c {
                matches += 1;
            } else {
                mismatches.push((idx, r.to_string(), c.to_string()));
            }
        }
        Self {
            matches,
            longest: reference.len().max(candidate.len()),
            mismatches,
        }
    }

    fn score(&self) -> f64 {
        fraction(self.matches, self.longest)
    }
}

/// Scores Morse encodings or decodings by positional overlap.
#[derive(Debug, Clone, Copy, Default)]
pub struct MorseCodeVerifier;

impl MorseCodeVerifier {
    fn verify_encoding(text: &str, original: &str) -> ScoreResult {
        let reference = encode(original);
        let ref_tokens: Vec<&str> = reference.split_whitespace().collect();
        let cand_tokens: Vec<&str> = text.split_whitespace().collect();
        if ref_tokens.is_empty() || cand_tokens.is_empty() {
            return ScoreResult::fail("Either reference or candidate tokens are empty.");
        }
        let overlap = Overlap::compare(&ref_tokens, &cand_tokens);
        let mut feedback: Vec<String> = overlap
            .mismatches
            .iter()
            .map(|(idx, expected, got)| {
                format!("Token mismatch at index {idx}: expected '{expected}', got '{got}'")
            })
            .collect();
        if ref_tokens.len() != cand_tokens.len() {
            feedback.push(format!(
                "Token count mismatch: reference has {}, candidate has {}.",
                ref_tokens.len(),
                cand_tokens.len()
            ));
        }
        let score = overlap.score();
        feedback.push(format!("(Encode) Reference Morse: '{reference}'"));
        feedback.push(format!("(Encode) Candidate Morse: '{text}'"));
        feedback.push(format!(
            "(Encode) Match count = {} / {}",
            overlap.matches, overlap.longest
        ));
        feedback.push(format!("(Encode) Score = {score:.2}"));
        ScoreResult::new(score, feedback)
    }

    fn verify_decoding(text: &str, original: &str) -> ScoreResult {
        let decoded = decode(original);
        let ref_chars: Vec<char> = decoded.to_uppercase().chars().collect();
        let cand_chars: Vec<char> = text.to_uppercase().chars().collect();
        if ref_chars.is_empty() || cand_chars.is_empty() {
            return ScoreResult::fail("Either reference or candidate text is empty.");
        }
        let overlap = Overlap::compare(&ref_chars, &cand_chars);
        let mut feedback: Vec<String> = overlap
            .mismatches
            .iter()
            .map(|(idx, expected, got)| {
                format!("Character mismatch at index {idx}: expected '{expected}', got '{got}'")
            })
            .collect();
        if ref_chars.len() != cand_chars.len() {
            feedback.push(format!(
                "Character count mismatch: reference has {}, candidate has {}.",
                ref_chars.len(),
                cand_chars.len()
            ));
        }
        let score = overlap.score();
        feedback.push(format!("(Decode) Original Morse: '{original}'"));
        feedback.push(format!("(Decode) Decoded as: '{decoded}'"));
        feedback.push(format!("(Decode) Candidate text: '{text}'"));
        feedback.push(format!(
            "(Decode) Match count = {} / {}",
            overlap.matches, overlap.longest
        ));
        feedback.push(format!("(Decode) Score = {score:.2}"));
        ScoreResult::new(score, feedback)
    }
}

impl Verifier for MorseCodeVerifier {
    type Config = MorseConfig;

    fn describe(&self) -> VerifierDescriptor {
        VerifierDescriptor::new(
            "morse_code_verifier",
            "Verifies correctness of Morse code in both encoding and decoding directions.",
        )
        .parameter(
            "original_text",
            ParameterSpec::new(
                ParameterType::String,
                "The reference text: plain English (encode mode) or Morse code (decode mode).",
            ),
        )
        .parameter(
            "verify_mode",
            ParameterSpec::new(
                ParameterType::String,
                "Either 'encode' (candidate is Morse) or 'decode' (candidate is plain text).",
            )
            .with_default(json!("encode")),
        )
    }

    fn score_with_feedback(&self, text: &str, config: &MorseConfig) -> ScoreResult {
        match config.verify_mode {
            MorseMode::Encode => Self::verify_encoding(text, &config.original_text),
            MorseMode::Decode => Self::verify_decoding(text, &config.original_text),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::parse_config;

    fn config(original: &str, mode: MorseMode) -> MorseConfig {
        MorseConfig {
            original_text: original.into(),
            verify_mode: mode,
        }
    }

    #[test]
    fn codec_maps_spaces_and_unknowns() {
        assert_eq!(encode("Hi there"), ".... .. / - .... . .-. .");
        assert_eq!(encode("a#"), ".- ?");
        assert_eq!(decode("... --- ... / ......."), "SOS ?");
        assert_eq!(decode(&encode("SOS 2024.")), "SOS 2024.");
    }

    #[test]
    fn one_bad_token_costs_one_fifth() {
        let result = MorseCodeVerifier.score_with_feedback(
            ".... . .-.. .-.. ..-",
            &config("HELLO", MorseMode::Encode),
        );
        assert!((result.score - 0.8).abs() < 1e-9);
        assert_eq!(
            result.feedback[0],
            "Token mismatch at index 4: expected '---', got '..-'"
        );
        assert_eq!(result.feedback.last().map(String::as_str), Some("(Encode) Score = 0.80"));
    }

    #[test]
    fn extra_tokens_count_against_the_longer_side() {
        let result = MorseCodeVerifier
            .score_with_feedback("... --- ... -", &config("SOS", MorseMode::Encode));
        assert!((result.score - 0.75).abs() < 1e-9);
        assert!(result
            .feedback
            .contains(&"Token count mismatch: reference has 3, candidate has 4.".to_string()));
    }

    #[test]
    fn decoding_compares_characters_case_insensitively() {
        let result = MorseCodeVerifier
            .score_with_feedback("sost", &config("... --- ...", MorseMode::Decode));
        assert!((result.score - 0.75).abs() < 1e-9);
        assert!(result
            .feedback
            .contains(&"Character count mismatch: reference has 3, candidate has 4.".to_string()));

        let typo = MorseCodeVerifier.score_with_feedback(
            "HELLU",
            &config(".... . .-.. .-.. ---", MorseMode::Decode),
        );
        assert!((typo.score - 0.8).abs() < 1e-9);
        assert_eq!(typo.feedback[0], "Character mismatch at index 4: expected 'O', got 'U'");
    }

    #[test]
    fn empty_sides_score_zero() {
        let result = MorseCodeVerifier.score_with_feedback("", &config("SOS", MorseMode::Encode));
        assert_eq!(result.feedback, vec!["Either reference or candidate tokens are empty."]);
        let result = MorseCodeVerifier.score_with_feedback("SOS", &config("", MorseMode::Decode));
        assert_eq!(result.feedback, vec!["Either reference or candidate text is empty."]);
    }

    #[test]
    fn unknown_mode_is_rejected_by_name() {
        let params = json!({"verify_mode": "transliterate"});
        let err = parse_config::<MorseConfig>("morse_code_verifier", params.as_object().unwrap())
            .unwrap_err();
        assert!(err.to_string().contains("transliterate"));
        let params = json!({"verify_mode": "decode", "unused": 1});
        let parsed: MorseConfig =
            parse_config("morse_code_verifier", params.as_object().unwrap()).unwrap();
        assert_eq!(parsed.verify_mode, MorseMode::Decode);
    }
}
