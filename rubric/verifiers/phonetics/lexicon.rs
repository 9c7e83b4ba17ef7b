use std::{collections::HashMap, sync::Arc};

use once_cell::sync::Lazy;
use thiserror::Error;

/// One pronunciation: ARPAbet units, vowels carrying a stress digit.
pub type Pronunciation = Vec<String>;

/// Read-only pronunciation lookup.
pub trait PronouncingDictionary: Send + Sync {
    /// All known pronunciations of an already-cleaned word, most common first.
    fn pronunciations_for(&self, word: &str) -> Vec<Pronunciation>;
}

/// Errors raised while parsing CMU-format text.
#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum LexiconError {
    /// A non-comment line lacked a word or its phones.
    #[error("malformed lexicon entry on line {line}: {content:?}")]
    MalformedEntry {
        /// 1-based line number.
        line: usize,
        /// Offending line.
        content: String,
    },
}

/// Lowercases a token and keeps only its alphabetic characters.
#[must_use]
pub fn clean_word(word: &str) -> String {
    word.chars()
        .filter(|c| c.is_alphabetic())
        .flat_map(char::to_lowercase)
        .collect()
}

const BUNDLED_SOURCE: &str = include_str!("cmudict-core.dict");

static BUNDLED: Lazy<Arc<CmuDictionary>> = Lazy::new(|| {
    Arc::new(CmuDictionary::parse(BUNDLED_SOURCE).unwrap_or_else(|err| {
        tracing::error!("bundled lexicon failed to parse, using heuristics only: {err}");
        CmuDictionary::default()
    }))
});

/// Dictionary in CMU pronouncing-dictionary format.
#[derive(Debug, Clone, Default)]
pub struct CmuDictionary {
    entries: HashMap<String, Vec<Pronunciation>>,
}

impl CmuDictionary {
    /// Parses `WORD  PH PH ...` lines; `WORD(1)` marks an alternate and
    /// `;;;` starts a comment.
    pub fn parse(source: &str) -> Result<Self, LexiconError> {
        let mut entries: HashMap<String, Vec<Pronunciation>> = HashMap::new();
        for (idx, raw) in source.lines().enumerate() {
            let line = raw.trim();
            if line.is_empty() || line.starts_with(";;;") {
                continue;
            }
            let malformed = || LexiconError::MalformedEntry {
                line: idx + 1,
                content: raw.to_string(),
            };
            let (head, phones) = line.split_once(char::is_whitespace).ok_or_else(malformed)?;
            let word = head.split_once('(').map_or(head, |(base, _)| base);
            let key = clean_word(word);
            let units: Pronunciation = phones.split_whitespace().map(str::to_string).collect();
            if key.is_empty() || units.is_empty() {
                return Err(malformed());
            }
            entries.entry(key).or_default().push(units);
        }
        Ok(Self { entries })
    }

    /// Shared handle to the compiled-in core lexicon.
    #[must_use]
    pub fn bundled() -> Arc<Self> {
        Arc::clone(&BUNDLED)
    }

    /// Number of distinct words.
    #[must_use]
    pub fn len(&self) -> usize {
        self.entries.len()
    }

    /// Whether the dictionary has no entries.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}

impl PronouncingDictionary for CmuDictionary {
    fn pronunciations_for(&self, word: &str) -> Vec<Pronunciation> {
        self.entries.get(word).cloned().unwrap_or_default()
    }
}

/// Dictionary with no entries; every lookup falls through to heuristics.
#[derive(Debug, Clone, Copy, Default)]
pub struct FallbackOnly;

impl PronouncingDictionary for FallbackOnly {
    fn pronunciations_for(&self, _word: &str) -> Vec<Pronunciation> {
        Vec::new()
    }
}
