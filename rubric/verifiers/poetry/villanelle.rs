use std::sync::Arc;

use serde::Deserialize;
use serde_json::json;

use crate::{
    contract::{
        fraction, poem_lines, ParameterSpec, ParameterType, ScoreResult, Verifier,
        VerifierDescriptor,
    },
    phonetics::{lines_rhyme, CmuDictionary, PronouncingDictionary},
    poetry::diagnostics::{pass_fail, render_rhyme_detail, LineDiagnostic, RhymeMember},
};

const FORM_LINES: usize = 19;
const REFRAINS: [(usize, usize); 6] = [(1, 6), (1, 12), (1, 18), (3, 9), (3, 15), (3, 19)];
const A_LINES: [usize; 13] = [1, 3, 4, 6, 7, 9, 10, 12, 13, 15, 16, 18, 19];
const B_LINES: [usize; 6] = [2, 5, 8, 11, 14, 17];

/// Options for [`VillanelleVerifier`].
#[derive(Debug, Clone, PartialEq, Deserialize)]
#[serde(default)]
pub struct VillanelleConfig {
    /// Weight of the refrain-repetition fraction.
    pub repetition_weight: f64,
    /// Weight of the rhyme-scheme fraction.
    pub rhyme_weight: f64,
    /// Weight of the line-count fraction.
    pub line_count_weight: f64,
}

impl Default for VillanelleConfig {
    fn default() -> Self {
        Self {
            repetition_weight: 0.4,
            rhyme_weight: 0.4,
            line_count_weight: 0.2,
        }
    }
}

/// Nineteen-line refrain form scored as a weighted blend.
///
/// Line-count, refrain and rhyme fractions are weighted and summed; the sum
/// is clamped into `[0, 1]` so reconfigured weights cannot escape the score
/// range. Missing lines fail every check that references them.
#[derive(Clone)]
pub struct VillanelleVerifier {
    dictionary: Arc<dyn PronouncingDictionary>,
}

impl VillanelleVerifier {
    /// Creates a verifier over the given dictionary.
    #[must_use]
    pub fn new(dictionary: Arc<dyn PronouncingDictionary>) -> Self {
        Self { dictionary }
    }

    fn rhymes_with(&self, lines: &[&str], anchor: usize, number: usize) -> bool {
        match (lines.get(anchor - 1), lines.get(number - 1)) {
            (Some(a), Some(b)) => lines_rhyme(a, b, self.dictionary.as_ref()),
            _ => false,
        }
    }

    fn role_verdict(&self, lines: &[&str], number: usize) -> String {
        let (label, anchor) = if A_LINES.contains(&number) {
            ("A", 1)
        } else if B_LINES.contains(&number) {
            ("B", 2)
        } else {
            return "(beyond the 19-line form)".to_string();
        };
        let passed = self.rhymes_with(lines, anchor, number);
        format!("({label}-rhyme with line {anchor}) => {}", pass_fail(passed))
    }

    fn group_detail(&self, label: &str, lines: &[&str], numbers: &[usize], passed: bool) -> String {
        let members: Vec<RhymeMember> = numbers
            .iter()
            .filter_map(|&n| {
                lines
                    .get(n - 1)
                    .map(|line| RhymeMember::analyze(n, line, self.dictionary.as_ref()))
            })
            .collect();
        render_rhyme_detail(label, &members, passed)
    }
}

impl Default for VillanelleVerifier {
    fn default() -> Self {
        Self::new(CmuDictionary::bundled())
    }
}

impl Verifier for VillanelleVerifier {
    type Config = VillanelleConfig;

    fn describe(&self) -> VerifierDescriptor {
        VerifierDescriptor::new(
            "villanelle_verifier",
            "Checks if a poem follows a basic 19-line villanelle structure, with partial credit: \
             line count, refrain repetition, naive A/B rhyme scheme.",
        )
        .parameter(
            "repetition_weight",
            ParameterSpec::new(
                ParameterType::Float,
                "Weight for scoring the line-repetition requirement.",
            )
            .with_default(json!(0.4)),
        )
        .parameter(
            "rhyme_weight",
            ParameterSpec::new(
                ParameterType::Float,
                "Weight for scoring the rhyme scheme requirement.",
            )
            .with_default(json!(0.4)),
        )
        .parameter(
            "line_count_weight",
            ParameterSpec::new(
                ParameterType::Float,
                "Weight for scoring the (partial) line count requirement.",
            )
            .with_default(json!(0.2)),
        )
    }

    fn score_with_feedback(&self, text: &str, config: &VillanelleConfig) -> ScoreResult {
        let lines = poem_lines(text);
        let num_lines = lines.len();
        let mut feedback = Vec::with_capacity(num_lines + 6);

        for (idx, line) in lines.iter().enumerate() {
            let diagnostic = LineDiagnostic::analyze(idx + 1, line, self.dictionary.as_ref());
            feedback.push(diagnostic.render(&self.role_verdict(&lines, idx + 1)));
        }

        let a_correct = A_LINES
            .iter()
            .filter(|&&n| self.rhymes_with(&lines, 1, n))
            .count();
        let b_correct = B_LINES
            .iter()
            .filter(|&&n| self.rhymes_with(&lines, 2, n))
            .count();
        feedback.push(self.group_detail(
            "A-rhyme detail",
            &lines,
            &A_LINES,
            a_correct == A_LINES.len(),
        ));
        feedback.push(self.group_detail(
            "B-rhyme detail",
            &lines,
            &B_LINES,
            b_correct == B_LINES.len(),
        ));

        let line_count_fraction = fraction(num_lines.min(FORM_LINES), FORM_LINES);
        feedback.push(format!(
            "Line count fraction: {line_count_fraction:.2} (found {num_lines} lines)."
        ));

        let repetitions = REFRAINS
            .iter()
            .filter(|(src, dest)| match (lines.get(src - 1), lines.get(dest - 1)) {
                (Some(a), Some(b)) => a.trim().to_lowercase() == b.trim().to_lowercase(),
                _ => false,
            })
            .count();
        let repetition_fraction = fraction(repetitions, REFRAINS.len());
        feedback.push(format!(
            "Repetition fraction: {repetition_fraction:.2} ({repetitions} matched out of {} total checks).",
            REFRAINS.len()
        ));

        let rhyme_fraction = fraction(a_correct + b_correct, A_LINES.len() + B_LINES.len());
        feedback.push(format!(
            "Rhyme fraction: {rhyme_fraction:.2} (A matches={a_correct}/{}, B matches={b_correct}/{}).",
            A_LINES.len(),
            B_LINES.len()
        ));

        let weighted = config.line_count_weight.mul_add(
            line_count_fraction,
            config
                .repetition_weight
                .mul_add(repetition_fraction, config.rhyme_weight * rhyme_fraction),
        );
        let score = weighted.clamp(0.0, 1.0);
        if (score - weighted).abs() > f64::EPSILON {
            feedback.push(format!(
                "Weighted sum {weighted:.2} clamped to {score:.2}."
            ));
        }
        ScoreResult::new(score, feedback)
    }
}
