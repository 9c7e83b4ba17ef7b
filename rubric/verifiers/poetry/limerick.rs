use std::sync::Arc;

use serde::Deserialize;
use serde_json::json;

use crate::{
    contract::{
        fraction, poem_lines, ParameterSpec, ParameterType, ScoreResult, Verifier,
        VerifierDescriptor,
    },
    phonetics::{count_syllables, lines_rhyme, CmuDictionary, PronouncingDictionary},
    poetry::diagnostics::{range_verdict, render_rhyme_detail, LineDiagnostic, RhymeMember},
};

const TOTAL_CHECKS: usize = 4;
const A_LINES: [usize; 3] = [1, 2, 5];
const B_LINES: [usize; 2] = [3, 4];

/// Inclusive `[min, max]` syllable bounds, written as a two-element list.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Deserialize)]
pub struct SyllableRange(pub usize, pub usize);

impl SyllableRange {
    fn contains(self, count: usize) -> bool {
        (self.0..=self.1).contains(&count)
    }
}

/// Options for [`LimerickVerifier`].
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
#[serde(default)]
pub struct LimerickConfig {
    /// Number of non-blank lines required.
    pub line_count_required: usize,
    /// Bounds for lines 1, 2 and 5.
    pub long_line_range: SyllableRange,
    /// Bounds for lines 3 and 4.
    pub short_line_range: SyllableRange,
}

impl Default for LimerickConfig {
    fn default() -> Self {
        Self {
            line_count_required: 5,
            long_line_range: SyllableRange(7, 11),
            short_line_range: SyllableRange(4, 8),
        }
    }
}

impl LimerickConfig {
    fn range_for(&self, number: usize) -> Option<SyllableRange> {
        if A_LINES.contains(&number) {
            Some(self.long_line_range)
        } else if B_LINES.contains(&number) {
            Some(self.short_line_range)
        } else {
            None
        }
    }
}

/// AABBA rhyme scheme with long and short syllable ranges.
///
/// Four independent checks each carry a quarter of the score: line count,
/// A-rhyme (lines 1, 2, 5), B-rhyme (lines 3, 4) and syllable ranges. A
/// check that needs lines the poem lacks simply fails.
#[derive(Clone)]
pub struct LimerickVerifier {
    dictionary: Arc<dyn PronouncingDictionary>,
}

impl LimerickVerifier {
    /// Creates a verifier over the given dictionary.
    #[must_use]
    pub fn new(dictionary: Arc<dyn PronouncingDictionary>) -> Self {
        Self { dictionary }
    }

    fn members(&self, lines: &[&str], numbers: &[usize]) -> Vec<RhymeMember> {
        numbers
            .iter()
            .filter_map(|&n| {
                lines
                    .get(n - 1)
                    .map(|line| RhymeMember::analyze(n, line, self.dictionary.as_ref()))
            })
            .collect()
    }
}

impl Default for LimerickVerifier {
    fn default() -> Self {
        Self::new(CmuDictionary::bundled())
    }
}

impl Verifier for LimerickVerifier {
    type Config = LimerickConfig;

    fn describe(&self) -> VerifierDescriptor {
        VerifierDescriptor::new(
            "limerick_verifier",
            "Checks if a text meets a rough limerick structure (AABBA rhyme + syllable ranges).",
        )
        .parameter(
            "line_count_required",
            ParameterSpec::new(ParameterType::Integer, "Number of non-empty lines required.")
                .with_default(json!(5)),
        )
        .parameter(
            "long_line_range",
            ParameterSpec::new(
                ParameterType::Range,
                "Min/Max syllables allowed in lines 1,2,5.",
            )
            .with_default(json!([7, 11])),
        )
        .parameter(
            "short_line_range",
            ParameterSpec::new(ParameterType::Range, "Min/Max syllables allowed in lines 3,4.")
                .with_default(json!([4, 8])),
        )
    }

    fn score_with_feedback(&self, text: &str, config: &LimerickConfig) -> ScoreResult {
        let dictionary = self.dictionary.as_ref();
        let lines = poem_lines(text);
        let num_lines = lines.len();
        let mut feedback = Vec::new();
        let mut passed = 0;

        for (idx, line) in lines.iter().enumerate() {
            let diagnostic = LineDiagnostic::analyze(idx + 1, line, dictionary);
            let verdict = config.range_for(idx + 1).map_or_else(
                || "(beyond the five-line form)".to_string(),
                |range| range_verdict(diagnostic.total, range.0, range.1).1,
            );
            feedback.push(diagnostic.render(&verdict));
        }

        if num_lines == config.line_count_required {
            passed += 1;
            feedback.push(format!("Line count check passed ({num_lines} lines)."));
        } else {
            feedback.push(format!(
                "Line count check failed. Expected {}, got {num_lines}.",
                config.line_count_required
            ));
        }

        let a_ok = num_lines >= 5
            && lines_rhyme(lines[0], lines[1], dictionary)
            && lines_rhyme(lines[0], lines[4], dictionary);
        feedback.push(render_rhyme_detail(
            "A-rhyme detail",
            &self.members(&lines, &A_LINES),
            a_ok,
        ));
        if a_ok {
            passed += 1;
            feedback.push("A-rhyme check passed (lines 1,2,5).".to_string());
        } else {
            feedback.push("A-rhyme check failed (lines 1,2,5).".to_string());
        }

        let b_ok = num_lines >= 4 && lines_rhyme(lines[2], lines[3], dictionary);
        feedback.push(render_rhyme_detail(
            "B-rhyme detail",
            &self.members(&lines, &B_LINES),
            b_ok,
        ));
        if b_ok {
            passed += 1;
            feedback.push("B-rhyme check passed (lines 3,4).".to_string());
        } else {
            feedback.push("B-rhyme check failed (lines 3,4).".to_string());
        }

        if num_lines >= 5 {
            let counts: Vec<usize> = lines[..5]
                .iter()
                .map(|line| count_syllables(line, dictionary))
                .collect();
            let (long, short) = (config.long_line_range, config.short_line_range);
            let long_ok = [counts[0], counts[1], counts[4]]
                .into_iter()
                .all(|count| long.contains(count));
            let short_ok = [counts[2], counts[3]]
                .into_iter()
                .all(|count| short.contains(count));
            if long_ok && short_ok {
                passed += 1;
                feedback.push("Syllable count check passed.".to_string());
            }
            if !long_ok {
                feedback.push(format!(
                    "Lines 1,2,5 syllable check failed: (Line1={}, Line2={}, Line5={}) Expected {}-{}.",
                    counts[0], counts[1], counts[4], long.0, long.1
                ));
            }
            if !short_ok {
                feedback.push(format!(
                    "Lines 3,4 syllable check failed: (Line3={}, Line4={}) Expected {}-{}.",
                    counts[2], counts[3], short.0, short.1
                ));
            }
        } else {
            feedback.push("Not enough lines to check syllable counts properly.".to_string());
        }

        ScoreResult::new(fraction(passed, TOTAL_CHECKS), feedback)
    }
}
