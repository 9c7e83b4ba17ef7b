//! Phonetic primitives feeding the structural verifiers.

/// Pronunciation dictionaries.
pub mod lexicon;
/// Rhyme-tail extraction and comparison.
pub mod rhyme;
/// Syllable counting and display breakdown.
pub mod syllables;

pub use lexicon::{clean_word, CmuDictionary, FallbackOnly, LexiconError, Pronunciation, PronouncingDictionary};
pub use rhyme::{lines_rhyme, rhyme_tail, RhymeTail};
pub use syllables::{breakdown_syllables, count_syllables, word_syllables};
