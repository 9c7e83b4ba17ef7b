use crate::{
    contract::{fraction, ScoreResult},
    phonetics::PronouncingDictionary,
    poetry::diagnostics::{pass_fail, LineDiagnostic},
};

/// Scores a poem whose lines must hit fixed syllable targets.
///
/// The line count is a gate: any other count scores 0.0 with a single
/// feedback line. Otherwise each line within `target ± tolerance` earns an
/// equal share of the score.
pub(crate) fn score_syllable_pattern(
    form: &str,
    lines: &[&str],
    targets: &[usize],
    tolerance: usize,
    dictionary: &dyn PronouncingDictionary,
) -> ScoreResult {
    if lines.len() != targets.len() {
        return ScoreResult::fail(format!(
            "You have {} line(s), but a standard {form} needs exactly {}.",
            lines.len(),
            targets.len()
        ));
    }
    let mut correct = 0;
    let mut feedback = Vec::with_capacity(lines.len());
    for (idx, (line, &target)) in lines.iter().zip(targets).enumerate() {
        let diagnostic = LineDiagnostic::analyze(idx + 1, line, dictionary);
        let low = target.saturating_sub(tolerance);
        let high = target.saturating_add(tolerance);
        let passed = (low..=high).contains(&diagnostic.total);
        if passed {
            correct += 1;
        }
        feedback.push(diagnostic.render(&format!(
            "(expected {target}±{tolerance}) => {}",
            pass_fail(passed)
        )));
    }
    ScoreResult::new(fraction(correct, targets.len()), feedback)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::phonetics::FallbackOnly;

    #[test]
    fn gate_reports_actual_and_required_counts() {
        let result = score_syllable_pattern("sonnet", &["one line"], &[10, 10], 1, &FallbackOnly);
        assert_eq!(result.score, 0.0);
        assert_eq!(
            result.feedback,
            vec!["You have 1 line(s), but a standard sonnet needs exactly 2."]
        );
    }

    #[test]
    fn zero_tolerance_requires_exact_counts() {
        let result = score_syllable_pattern("pair", &["banana", "kiwi"], &[3, 3], 0, &FallbackOnly);
        assert!((result.score - 0.5).abs() < 1e-9);
        assert!(result.feedback[0].ends_with("Total: 3 syllables (expected 3±0) => PASS"));
        assert!(result.feedback[1].ends_with("Total: 2 syllables (expected 3±0) => FAIL"));
    }

    #[test]
    fn huge_tolerance_saturates_instead_of_overflowing() {
        let result =
            score_syllable_pattern("pair", &["banana", "kiwi"], &[3, 3], usize::MAX, &FallbackOnly);
        assert_eq!(result.score, 1.0);
    }
}
