use serde::de::DeserializeOwned;
use serde_json::{Map, Value};

use crate::error::VerifierError;

/// Converts an untyped parameter map into a verifier's typed config.
///
/// Keys the config does not declare are dropped; a declared key holding a
/// value of the wrong shape is rejected with the parser's message.
pub fn parse_config<C: DeserializeOwned>(
    verifier: &str,
    params: &Map<String, Value>,
) -> Result<C, VerifierError> {
    serde_json::from_value(Value::Object(params.clone())).map_err(|err| {
        VerifierError::InvalidConfig {
            verifier: verifier.to_string(),
            detail: err.to_string(),
        }
    })
}
