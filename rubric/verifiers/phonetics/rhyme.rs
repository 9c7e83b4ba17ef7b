use std::fmt;

use crate::phonetics::{
    lexicon::{clean_word, PronouncingDictionary},
    syllables::is_stressed_unit,
};

/// Comparable sound of a line's last word.
///
/// Phonetic tails hold the units from the last stressed vowel onward; a
/// word missing from the dictionary gets a single literal token made of its
/// last two letters.
#[derive(Debug, Clone, Default, PartialEq, Eq, Hash)]
pub struct RhymeTail {
    units: Vec<String>,
}

impl RhymeTail {
    /// Builds a tail from its tokens.
    #[must_use]
    pub fn from_units(units: Vec<String>) -> Self {
        Self { units }
    }

    /// Tokens of the tail, in order.
    #[must_use]
    pub fn units(&self) -> &[String] {
        &self.units
    }

    /// Whether no tail could be extracted.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.units.is_empty()
    }

    /// Number of tokens that agree when both tails are aligned at their ends.
    #[must_use]
    pub fn trailing_overlap(&self, other: &Self) -> usize {
        self.units
            .iter()
            .rev()
            .zip(other.units.iter().rev())
            .take_while(|(a, b)| a == b)
            .count()
    }
}

impl fmt::Display for RhymeTail {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.units.join("-"))
    }
}

/// Cleaned last word of a line (empty when the line has none).
#[must_use]
pub fn last_word(line: &str) -> String {
    line.split_whitespace().last().map(clean_word).unwrap_or_default()
}

/// Rhyme tail of a line's last word.
#[must_use]
pub fn rhyme_tail(line: &str, dictionary: &dyn PronouncingDictionary) -> RhymeTail {
    let word = last_word(line);
    if word.is_empty() {
        return RhymeTail::default();
    }
    let pronunciations = dictionary.pronunciations_for(&word);
    let Some(units) = pronunciations.first() else {
        let chars: Vec<char> = word.chars().collect();
        let literal: String = chars[chars.len().saturating_sub(2)..].iter().collect();
        return RhymeTail::from_units(vec![literal]);
    };
    let start = units
        .iter()
        .rposition(|unit| is_stressed_unit(unit))
        .unwrap_or_else(|| units.len().saturating_sub(2));
    RhymeTail::from_units(units[start..].to_vec())
}

/// Whether two lines share the same non-empty rhyme tail.
#[must_use]
pub fn lines_rhyme(first: &str, second: &str, dictionary: &dyn PronouncingDictionary) -> bool {
    let a = rhyme_tail(first, dictionary);
    !a.is_empty() && a == rhyme_tail(second, dictionary)
}
