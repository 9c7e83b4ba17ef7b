use crate::phonetics::{
    breakdown_syllables, rhyme::last_word, rhyme_tail, word_syllables, Pronunciation,
    PronouncingDictionary, RhymeTail,
};

/// Syllable analysis of one poem line, rendered as a single feedback entry.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct LineDiagnostic {
    /// 1-based line number.
    pub number: usize,
    /// Trimmed line text.
    pub text: String,
    /// Whitespace-separated words as written.
    pub words: Vec<String>,
    /// Syllables per word.
    pub syllables: Vec<usize>,
    /// Display chunks per word.
    pub breakdown: Vec<Vec<String>>,
    /// Sum of `syllables`.
    pub total: usize,
}

impl LineDiagnostic {
    /// Analyzes a line.
    #[must_use]
    pub fn analyze(number: usize, line: &str, dictionary: &dyn PronouncingDictionary) -> Self {
        let words: Vec<String> = line.split_whitespace().map(str::to_string).collect();
        let syllables: Vec<usize> = words
            .iter()
            .map(|word| word_syllables(word, dictionary))
            .collect();
        let breakdown = words.iter().map(|word| breakdown_syllables(word)).collect();
        Self {
            number,
            text: line.trim().to_string(),
            total: syllables.iter().sum(),
            words,
            syllables,
            breakdown,
        }
    }

    /// Renders the diagnostic followed by the caller's verdict.
    #[must_use]
    pub fn render(&self, verdict: &str) -> String {
        let counts = self
            .syllables
            .iter()
            .map(ToString::to_string)
            .collect::<Vec<_>>()
            .join(", ");
        let chunks = self
            .breakdown
            .iter()
            .map(|parts| parts.join("-"))
            .collect::<Vec<_>>()
            .join(", ");
        format!(
            "Line {} (\"{}\"): Words: [{}] | Syllables per word: [{}] | Syllable breakdown: [{}] | Total: {} syllables {}",
            self.number,
            self.text,
            self.words.join(", "),
            counts,
            chunks,
            self.total,
            verdict
        )
    }
}

/// Verdict text for a total checked against an inclusive range.
#[must_use]
pub fn range_verdict(total: usize, low: usize, high: usize) -> (bool, String) {
    let passed = (low..=high).contains(&total);
    (passed, format!("(expected {low}-{high}) => {}", pass_fail(passed)))
}

/// `PASS` or `FAIL`.
#[must_use]
pub const fn pass_fail(passed: bool) -> &'static str {
    if passed {
        "PASS"
    } else {
        "FAIL"
    }
}

/// Phonetic view of one line's last word.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RhymeMember {
    /// 1-based line number.
    pub number: usize,
    /// Cleaned last word.
    pub word: String,
    /// First dictionary pronunciation, if any.
    pub phones: Option<Pronunciation>,
    /// Extracted rhyme tail.
    pub tail: RhymeTail,
}

impl RhymeMember {
    /// Looks up the last word of `line`.
    #[must_use]
    pub fn analyze(number: usize, line: &str, dictionary: &dyn PronouncingDictionary) -> Self {
        let word = last_word(line);
        let phones = dictionary.pronunciations_for(&word).into_iter().next();
        Self {
            number,
            tail: rhyme_tail(line, dictionary),
            word,
            phones,
        }
    }

    fn render(&self) -> String {
        let phones = self
            .phones
            .as_ref()
            .map_or_else(|| "no dictionary entry".to_string(), |units| units.join(" "));
        format!(
            "line {} '{}' [{}] tail '{}'",
            self.number, self.word, phones, self.tail
        )
    }
}

/// Renders a rhyme block: every member's last word, units, and tail, then the outcome.
#[must_use]
pub fn render_rhyme_detail(label: &str, members: &[RhymeMember], passed: bool) -> String {
    if members.is_empty() {
        return format!("{label}: no lines available => {}", pass_fail(passed));
    }
    let body = members
        .iter()
        .map(RhymeMember::render)
        .collect::<Vec<_>>()
        .join("; ");
    format!("{label}: {body} => {}", pass_fail(passed))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::phonetics::{CmuDictionary, FallbackOnly};

    #[test]
    fn line_diagnostic_lists_words_counts_and_chunks() {
        let dict = CmuDictionary::bundled();
        let diag = LineDiagnostic::analyze(1, "  An old silent pond ", dict.as_ref());
        assert_eq!(diag.total, 5);
        assert_eq!(diag.syllables, vec![1, 1, 2, 1]);
        let rendered = diag.render("(expected 4-6) => PASS");
        assert_eq!(
            rendered,
            "Line 1 (\"An old silent pond\"): Words: [An, old, silent, pond] | \
             Syllables per word: [1, 1, 2, 1] | Syllable breakdown: [an, old, si-lent, pond] | \
             Total: 5 syllables (expected 4-6) => PASS"
        );
    }

    #[test]
    fn range_verdict_is_inclusive() {
        assert!(range_verdict(4, 4, 6).0);
        assert!(range_verdict(6, 4, 6).0);
        let (passed, text) = range_verdict(7, 4, 6);
        assert!(!passed);
        assert_eq!(text, "(expected 4-6) => FAIL");
    }

    #[test]
    fn rhyme_detail_names_words_units_and_tails() {
        let dict = CmuDictionary::bundled();
        let members = vec![
            RhymeMember::analyze(1, "I love my cat", dict.as_ref()),
            RhymeMember::analyze(2, "an orange bap", dict.as_ref()),
        ];
        let rendered = render_rhyme_detail("Rhyme detail", &members, false);
        assert_eq!(
            rendered,
            "Rhyme detail: line 1 'cat' [K AE1 T] tail 'AE1-T'; \
             line 2 'bap' [no dictionary entry] tail 'ap' => FAIL"
        );
        let empty = render_rhyme_detail("A-rhyme detail", &[], false);
        assert_eq!(empty, "A-rhyme detail: no lines available => FAIL");
        let fallback = RhymeMember::analyze(3, "Hello", &FallbackOnly);
        assert!(fallback.phones.is_none());
    }
}
