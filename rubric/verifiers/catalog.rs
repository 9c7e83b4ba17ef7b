use std::{fmt, str::FromStr, sync::Arc};

use serde::{Deserialize, Serialize};
use serde_json::{json, Map, Value};
use shared_logging::LogLevel;

use crate::{
    config::parse_config,
    contract::{ScoreResult, Verifier, VerifierDescriptor},
    error::VerifierError,
    math::BoxedAnswerVerifier,
    morse::MorseCodeVerifier,
    phonetics::{CmuDictionary, PronouncingDictionary},
    poetry::{
        HaikuVerifier, LimerickVerifier, LineCountVerifier, RhymeVerifier,
        SyllableTargetVerifier, TankaVerifier, VillanelleVerifier,
    },
    reasoning::{
        judge::AnswerJudge, ReasoningFormatVerifier, SatisfactionVerifier,
        StrictFullFormatVerifier, VerifierAnswerVerifier,
    },
    telemetry::{emit, VerifierTelemetry},
    word_count::WordCountVerifier,
};

/// Every verifier the crate ships.
///
/// Serialized as its full name; either the full name or the short key
/// deserializes.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(try_from = "String", into = "&'static str")]
pub enum VerifierKind {
    /// `haiku_verifier`
    Haiku,
    /// `tanka_verifier`
    Tanka,
    /// `limerick_verifier`
    Limerick,
    /// `villanelle_verifier`
    Villanelle,
    /// `rhyme_verifier`
    Rhyme,
    /// `line_count_verifier`
    LineCount,
    /// `syllable_verifier`
    SyllableTarget,
    /// `reasoning_format_tag_verifier`
    ReasoningFormat,
    /// `strict_full_format_verifier`
    StrictFullFormat,
    /// `verifier_answer_verifier`
    VerifierAnswer,
    /// `satisfaction_verifier`
    Satisfaction,
    /// `boxed_answer_verifier`
    BoxedAnswer,
    /// `morse_code_verifier`
    MorseCode,
    /// `is_n_words_verifier`
    WordCount,
}

impl VerifierKind {
    /// All kinds, in listing order.
    pub const ALL: [Self; 14] = [
        Self::Haiku,
        Self::Tanka,
        Self::Limerick,
        Self::Villanelle,
        Self::Rhyme,
        Self::LineCount,
        Self::SyllableTarget,
        Self::ReasoningFormat,
        Self::StrictFullFormat,
        Self::VerifierAnswer,
        Self::Satisfaction,
        Self::BoxedAnswer,
        Self::MorseCode,
        Self::WordCount,
    ];

    /// Stable verifier name.
    #[must_use]
    pub const fn name(self) -> &'static str {
        match self {
            Self::Haiku => "haiku_verifier",
            Self::Tanka => "tanka_verifier",
            Self::Limerick => "limerick_verifier",
            Self::Villanelle => "villanelle_verifier",
            Self::Rhyme => "rhyme_verifier",
            Self::LineCount => "line_count_verifier",
            Self::SyllableTarget => "syllable_verifier",
            Self::ReasoningFormat => "reasoning_format_tag_verifier",
            Self::StrictFullFormat => "strict_full_format_verifier",
            Self::VerifierAnswer => "verifier_answer_verifier",
            Self::Satisfaction => "satisfaction_verifier",
            Self::BoxedAnswer => "boxed_answer_verifier",
            Self::MorseCode => "morse_code_verifier",
            Self::WordCount => "is_n_words_verifier",
        }
    }

    /// Short key: the name without its `_verifier` suffix.
    #[must_use]
    pub fn key(self) -> &'static str {
        let name = self.name();
        name.strip_suffix("_verifier").unwrap_or(name)
    }
}

impl fmt::Display for VerifierKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

impl From<VerifierKind> for &'static str {
    fn from(kind: VerifierKind) -> Self {
        kind.name()
    }
}

impl TryFrom<String> for VerifierKind {
    type Error = VerifierError;

    fn try_from(raw: String) -> Result<Self, Self::Error> {
        raw.parse()
    }
}

impl FromStr for VerifierKind {
    type Err = VerifierError;

    fn from_str(raw: &str) -> Result<Self, Self::Err> {
        let wanted = raw.trim().to_ascii_lowercase();
        Self::ALL
            .into_iter()
            .find(|kind| kind.name() == wanted || kind.key() == wanted)
            .ok_or_else(|| VerifierError::UnknownVerifier(raw.to_string()))
    }
}

/// Shared collaborators plus name-based dispatch over untyped parameters.
#[derive(Clone)]
pub struct Catalog {
    dictionary: Arc<dyn PronouncingDictionary>,
    judge: Option<Arc<dyn AnswerJudge>>,
    telemetry: Option<VerifierTelemetry>,
}

impl Default for Catalog {
    fn default() -> Self {
        Self::new(CmuDictionary::bundled())
    }
}

impl Catalog {
    /// Creates a catalog over `dictionary` with no judge and no telemetry.
    #[must_use]
    pub fn new(dictionary: Arc<dyn PronouncingDictionary>) -> Self {
        Self {
            dictionary,
            judge: None,
            telemetry: None,
        }
    }

    /// Sets the judge used by the satisfaction verifier.
    #[must_use]
    pub fn with_judge(mut self, judge: Arc<dyn AnswerJudge>) -> Self {
        self.judge = Some(judge);
        self
    }

    /// Sets the telemetry handle.
    #[must_use]
    pub fn with_telemetry(mut self, telemetry: Option<VerifierTelemetry>) -> Self {
        self.telemetry = telemetry;
        self
    }

    /// Telemetry handle, if one was attached.
    #[must_use]
    pub const fn telemetry(&self) -> Option<&VerifierTelemetry> {
        self.telemetry.as_ref()
    }

    fn satisfaction(&self) -> SatisfactionVerifier {
        let verifier = self
            .judge
            .clone()
            .map_or_else(SatisfactionVerifier::default, SatisfactionVerifier::new);
        verifier.with_telemetry(self.telemetry.clone())
    }

    /// Self-description of one verifier.
    #[must_use]
    pub fn describe(&self, kind: VerifierKind) -> VerifierDescriptor {
        let dict = || Arc::clone(&self.dictionary);
        match kind {
            VerifierKind::Haiku => HaikuVerifier::new(dict()).describe(),
            VerifierKind::Tanka => TankaVerifier::new(dict()).describe(),
            VerifierKind::Limerick => LimerickVerifier::new(dict()).describe(),
            VerifierKind::Villanelle => VillanelleVerifier::new(dict()).describe(),
            VerifierKind::Rhyme => RhymeVerifier::new(dict()).describe(),
            VerifierKind::LineCount => LineCountVerifier.describe(),
            VerifierKind::SyllableTarget => SyllableTargetVerifier::new(dict()).describe(),
            VerifierKind::ReasoningFormat => ReasoningFormatVerifier.describe(),
            VerifierKind::StrictFullFormat => StrictFullFormatVerifier.describe(),
            VerifierKind::VerifierAnswer => VerifierAnswerVerifier.describe(),
            VerifierKind::Satisfaction => self.satisfaction().describe(),
            VerifierKind::BoxedAnswer => BoxedAnswerVerifier.describe(),
            VerifierKind::MorseCode => MorseCodeVerifier.describe(),
            VerifierKind::WordCount => WordCountVerifier.describe(),
        }
    }

    /// Self-descriptions of every verifier.
    #[must_use]
    pub fn describe_all(&self) -> Vec<VerifierDescriptor> {
        VerifierKind::ALL
            .into_iter()
            .map(|kind| self.describe(kind))
            .collect()
    }

    /// Scores `text` with `kind`, converting `params` at the boundary.
    ///
    /// Unknown parameter keys are ignored; a wrongly typed value scores 0.0
    /// with feedback naming the verifier and the value.
    #[must_use]
    pub fn score_with_feedback(
        &self,
        kind: VerifierKind,
        text: &str,
        params: &Map<String, Value>,
    ) -> ScoreResult {
        let dict = || Arc::clone(&self.dictionary);
        let result = match kind {
            VerifierKind::Haiku => self.run(kind, &HaikuVerifier::new(dict()), text, params),
            VerifierKind::Tanka => self.run(kind, &TankaVerifier::new(dict()), text, params),
            VerifierKind::Limerick => self.run(kind, &LimerickVerifier::new(dict()), text, params),
            VerifierKind::Villanelle => {
                self.run(kind, &VillanelleVerifier::new(dict()), text, params)
            }
            VerifierKind::Rhyme => self.run(kind, &RhymeVerifier::new(dict()), text, params),
            VerifierKind::LineCount => self.run(kind, &LineCountVerifier, text, params),
            VerifierKind::SyllableTarget => {
                self.run(kind, &SyllableTargetVerifier::new(dict()), text, params)
            }
            VerifierKind::ReasoningFormat => {
                self.run(kind, &ReasoningFormatVerifier, text, params)
            }
            VerifierKind::StrictFullFormat => {
                self.run(kind, &StrictFullFormatVerifier, text, params)
            }
            VerifierKind::VerifierAnswer => self.run(kind, &VerifierAnswerVerifier, text, params),
            VerifierKind::Satisfaction => self.run(kind, &self.satisfaction(), text, params),
            VerifierKind::BoxedAnswer => self.run(kind, &BoxedAnswerVerifier, text, params),
            VerifierKind::MorseCode => self.run(kind, &MorseCodeVerifier, text, params),
            VerifierKind::WordCount => self.run(kind, &WordCountVerifier, text, params),
        };
        emit(
            self.telemetry.as_ref(),
            LogLevel::Info,
            "verifier.scored",
            json!({
                "verifier": kind.name(),
                "score": result.score,
                "feedback_lines": result.feedback.len(),
            }),
        );
        result
    }

    /// Numeric score only; always equal to [`Catalog::score_with_feedback`]'s score.
    #[must_use]
    pub fn score(&self, kind: VerifierKind, text: &str, params: &Map<String, Value>) -> f64 {
        self.score_with_feedback(kind, text, params).score
    }

    /// Resolves `name` (full name or short key) and scores with it.
    pub fn score_named(
        &self,
        name: &str,
        text: &str,
        params: &Map<String, Value>,
    ) -> Result<ScoreResult, VerifierError> {
        let kind: VerifierKind = name.parse()?;
        Ok(self.score_with_feedback(kind, text, params))
    }

    fn run<V: Verifier>(
        &self,
        kind: VerifierKind,
        verifier: &V,
        text: &str,
        params: &Map<String, Value>,
    ) -> ScoreResult {
        match parse_config::<V::Config>(kind.name(), params) {
            Ok(config) => verifier.score_with_feedback(text, &config),
            Err(err) => {
                emit(
                    self.telemetry.as_ref(),
                    LogLevel::Warn,
                    "verifier.config_rejected",
                    json!({ "verifier": kind.name(), "error": err.to_string() }),
                );
                ScoreResult::fail(err.to_string())
            }
        }
    }
}
