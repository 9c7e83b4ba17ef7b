//! Structural poetry verifiers built on the phonetic primitives.

/// Per-line and rhyme diagnostics shared by every structural verifier.
pub mod diagnostics;
/// Haiku (5-7-5) checker.
pub mod haiku;
/// Limerick (AABBA) checker.
pub mod limerick;
/// Exact line-count checker.
pub mod line_count;
/// Fixed syllable-pattern scoring shared by haiku and tanka.
mod pattern;
/// Two-line rhyme checker.
pub mod rhyme_pair;
/// Per-line syllable target checker.
pub mod syllable_target;
/// Tanka (5-7-5-7-7) checker.
pub mod tanka;
/// Villanelle (19-line refrain form) checker.
pub mod villanelle;

pub use haiku::{HaikuConfig, HaikuVerifier};
pub use limerick::{LimerickConfig, LimerickVerifier, SyllableRange};
pub use line_count::{LineCountConfig, LineCountVerifier};
pub use rhyme_pair::{RhymeConfig, RhymeVerifier};
pub use syllable_target::{SyllableTargetConfig, SyllableTargetVerifier};
pub use tanka::{TankaConfig, TankaVerifier};
pub use villanelle::{VillanelleConfig, VillanelleVerifier};
