//! Verifiers that extract tagged regions from reasoning traces.

/// Strict `<think>`/`<answer>` layout checks.
pub mod format;
/// External judge collaborator and timeout handling.
pub mod judge;
/// Judge-graded answer satisfaction.
pub mod satisfaction;
/// `<verifier_answer>` comparison against a gold solution.
pub mod verifier_answer;

pub use format::{ReasoningFormatVerifier, StrictFullFormatVerifier};
pub use satisfaction::{SatisfactionConfig, SatisfactionVerifier};
pub use verifier_answer::{VerifierAnswerConfig, VerifierAnswerVerifier};
