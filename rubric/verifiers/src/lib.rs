#![deny(
    clippy::all,
    clippy::pedantic,
    clippy::nursery,
    rust_2018_idioms,
    missing_docs
)]

//! Rubric scoring core: poetic-structure checkers, tag-based answer
//! extractors, and a Morse codec verifier, all behind one scoring contract.

/// Shared scoring contract: results, descriptors, and the verifier trait.
#[path = "../contract.rs"]
pub mod contract;

/// Error types surfaced by the scoring core.
#[path = "../error.rs"]
pub mod error;

/// Boundary conversion from untyped parameter maps to typed configs.
#[path = "../config.rs"]
pub mod config;

/// File-backed settings for hosts embedding the catalog.
#[path = "../settings.rs"]
pub mod settings;

/// Telemetry handle shared across verifiers.
#[path = "../telemetry.rs"]
pub mod telemetry;

/// Pronunciation lookup, syllable estimation, and rhyme tails.
#[path = "../phonetics/main.rs"]
pub mod phonetics;

/// Structural poetry verifiers.
#[path = "../poetry/main.rs"]
pub mod poetry;

/// Tag-extraction verifiers for reasoning traces.
#[path = "../reasoning/main.rs"]
pub mod reasoning;

/// Boxed math answer verifier.
#[path = "../math.rs"]
pub mod math;

/// Morse codec and its verifier.
#[path = "../morse.rs"]
pub mod morse;

/// Exact word-count verifier.
#[path = "../word_count.rs"]
pub mod word_count;

/// Closed catalog of verifier kinds.
#[path = "../catalog.rs"]
pub mod catalog;

/// Concurrent batch scoring.
#[path = "../batch.rs"]
pub mod batch;

pub use batch::{BatchScorer, ScoringOutcome, ScoringRequest};
pub use catalog::{Catalog, VerifierKind};
pub use config::parse_config;
pub use contract::{
    fraction, poem_lines, NoParams, ParameterSpec, ParameterType, ScoreResult, Verifier,
    VerifierDescriptor,
};
pub use error::VerifierError;
pub use phonetics::{CmuDictionary, FallbackOnly, PronouncingDictionary, RhymeTail};
pub use reasoning::judge::{AnswerJudge, JudgeError, JudgeEvaluation, JudgeRequest, LoopbackJudge};
pub use settings::RubricSettings;
pub use telemetry::{VerifierTelemetry, VerifierTelemetryBuilder};
