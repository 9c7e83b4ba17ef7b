use crate::phonetics::lexicon::{clean_word, PronouncingDictionary};

const VOWELS: &[char] = &['a', 'e', 'i', 'o', 'u'];

fn is_vowel(c: char) -> bool {
    VOWELS.contains(&c)
}

/// Whether a phonetic unit carries a stress marker (i.e. is a vowel nucleus).
pub(crate) fn is_stressed_unit(unit: &str) -> bool {
    unit.chars().any(|c| c.is_ascii_digit())
}

/// Syllables in a line: the sum over its whitespace-separated words.
#[must_use]
pub fn count_syllables(line: &str, dictionary: &dyn PronouncingDictionary) -> usize {
    line.split_whitespace()
        .map(|word| word_syllables(word, dictionary))
        .sum()
}

/// Syllables in one word.
///
/// Uses the first dictionary pronunciation when there is one, otherwise
/// counts maximal runs of `a e i o u`. Any word gets a count this way,
/// including slang and invented words.
#[must_use]
pub fn word_syllables(word: &str, dictionary: &dyn PronouncingDictionary) -> usize {
    let clean = clean_word(word);
    if clean.is_empty() {
        return 0;
    }
    dictionary
        .pronunciations_for(&clean)
        .first()
        .map_or_else(
            || vowel_runs(&clean),
            |units| units.iter().filter(|unit| is_stressed_unit(unit)).count(),
        )
}

fn vowel_runs(word: &str) -> usize {
    let mut count = 0;
    let mut in_run = false;
    for c in word.chars() {
        if is_vowel(c) {
            if !in_run {
                count += 1;
            }
            in_run = true;
        } else {
            in_run = false;
        }
    }
    count
}

/// Best-effort display split of a word into syllable-like chunks.
///
/// Each chunk runs from the previous cut through the end of a vowel run;
/// trailing consonants join the final chunk and a vowel-less word stays
/// whole. This never consults a dictionary.
#[must_use]
pub fn breakdown_syllables(word: &str) -> Vec<String> {
    let chars: Vec<char> = clean_word(word).chars().collect();
    let mut chunks: Vec<String> = Vec::new();
    let mut start = 0;
    let mut i = 0;
    while i < chars.len() {
        if is_vowel(chars[i]) {
            let mut end = i;
            while end < chars.len() && is_vowel(chars[end]) {
                end += 1;
            }
            chunks.push(chars[start..end].iter().collect());
            start = end;
            i = end;
        } else {
            i += 1;
        }
    }
    if start < chars.len() {
        let rest: String = chars[start..].iter().collect();
        match chunks.last_mut() {
            Some(last) => last.push_str(&rest),
            None => chunks.push(rest),
        }
    }
    chunks
}
