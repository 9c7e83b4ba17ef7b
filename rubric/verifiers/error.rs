use thiserror::Error;

/// Errors raised while preparing or dispatching a verification.
///
/// None of these escape `score`/`score_with_feedback`; the boundary turns
/// them into a zero score with the error text as feedback.
#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum VerifierError {
    /// A parameter had the wrong type or an unsupported value.
    #[error("invalid configuration for {verifier}: {detail}")]
    InvalidConfig {
        /// Verifier whose configuration was rejected.
        verifier: String,
        /// Parser message naming the offending value.
        detail: String,
    },
    /// No verifier is registered under the requested name.
    #[error("unknown verifier: {0}")]
    UnknownVerifier(String),
}
