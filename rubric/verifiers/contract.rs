use indexmap::IndexMap;
use serde::{de::DeserializeOwned, Deserialize, Serialize};
use serde_json::Value;

/// Score plus ordered, human-readable feedback.
///
/// `feedback` is ordered by check evaluation so that identical inputs always
/// render identical diagnostics.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ScoreResult {
    /// Score in `[0.0, 1.0]`.
    pub score: f64,
    /// Diagnostics in evaluation order.
    pub feedback: Vec<String>,
}

impl ScoreResult {
    /// Creates a result from a score and its feedback.
    #[must_use]
    pub fn new(score: f64, feedback: Vec<String>) -> Self {
        Self { score, feedback }
    }

    /// Zero score with a single explanatory line.
    #[must_use]
    pub fn fail(message: impl Into<String>) -> Self {
        Self {
            score: 0.0,
            feedback: vec![message.into()],
        }
    }

    /// Full score with a single explanatory line.
    #[must_use]
    pub fn pass(message: impl Into<String>) -> Self {
        Self {
            score: 1.0,
            feedback: vec![message.into()],
        }
    }
}

/// Declared type of a verifier parameter.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ParameterType {
    /// Whole number.
    Integer,
    /// Floating point number.
    Float,
    /// Free-form text.
    String,
    /// Boolean flag.
    Boolean,
    /// Two-element `[min, max]` list.
    Range,
}

/// Self-description of a single parameter.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ParameterSpec {
    /// Declared type.
    #[serde(rename = "type")]
    pub kind: ParameterType,
    /// Default applied when the caller omits the parameter.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub default: Option<Value>,
    /// Human-readable description.
    pub description: String,
}

impl ParameterSpec {
    /// Creates a spec without a default.
    #[must_use]
    pub fn new(kind: ParameterType, description: impl Into<String>) -> Self {
        Self {
            kind,
            default: None,
            description: description.into(),
        }
    }

    /// Sets the documented default.
    #[must_use]
    pub fn with_default(mut self, default: Value) -> Self {
        self.default = Some(default);
        self
    }
}

/// JSON-serializable self-description consumed by argument builders.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct VerifierDescriptor {
    /// Stable verifier name, e.g. `haiku_verifier`.
    pub name: String,
    /// What the verifier checks.
    pub description: String,
    /// Parameters in declaration order.
    pub parameters: IndexMap<String, ParameterSpec>,
}

impl VerifierDescriptor {
    /// Creates a descriptor with no parameters.
    #[must_use]
    pub fn new(name: impl Into<String>, description: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            description: description.into(),
            parameters: IndexMap::new(),
        }
    }

    /// Adds a parameter, keeping declaration order.
    #[must_use]
    pub fn parameter(mut self, name: impl Into<String>, spec: ParameterSpec) -> Self {
        self.parameters.insert(name.into(), spec);
        self
    }
}

/// Configuration for verifiers that take no parameters; every key is ignored.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Deserialize)]
pub struct NoParams {}

/// Uniform contract every verifier satisfies.
///
/// Implementations hold only immutable collaborators, so a single instance
/// may score from any number of threads at once.
pub trait Verifier: Send + Sync {
    /// Typed configuration with documented defaults.
    type Config: DeserializeOwned + Default + Clone + Send;

    /// Describes name, purpose, and parameters.
    fn describe(&self) -> VerifierDescriptor;

    /// Scores `text` and explains the result.
    fn score_with_feedback(&self, text: &str, config: &Self::Config) -> ScoreResult;

    /// Scores `text`; always the `score` field of [`Verifier::score_with_feedback`].
    fn score(&self, text: &str, config: &Self::Config) -> f64 {
        self.score_with_feedback(text, config).score
    }
}

/// Splits a poem into trimmed, non-blank lines.
///
/// Blank lines are dropped before any check runs, so stanza breaks never
/// count toward line totals.
#[must_use]
pub fn poem_lines(text: &str) -> Vec<&str> {
    text.lines()
        .map(str::trim)
        .filter(|line| !line.is_empty())
        .collect()
}

/// `numerator / denominator` as a score; zero when the denominator is zero.
#[must_use]
#[allow(clippy::cast_precision_loss)]
pub fn fraction(numerator: usize, denominator: usize) -> f64 {
    if denominator == 0 {
        return 0.0;
    }
    numerator as f64 / denominator as f64
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn poem_lines_drops_blank_lines() {
        let lines = poem_lines("  first line \n\n   \nsecond\r\n\nthird\n");
        assert_eq!(lines, vec!["first line", "second", "third"]);
        assert!(poem_lines("   ").is_empty());
    }

    #[test]
    fn descriptor_serializes_in_declaration_order() {
        let descriptor = VerifierDescriptor::new("demo_verifier", "Demo.")
            .parameter(
                "zeta",
                ParameterSpec::new(ParameterType::Integer, "Last alphabetically.")
                    .with_default(json!(1)),
            )
            .parameter(
                "alpha",
                ParameterSpec::new(ParameterType::String, "First alphabetically."),
            );
        let value = serde_json::to_value(&descriptor).unwrap();
        assert_eq!(value["parameters"]["zeta"]["type"], "integer");
        assert_eq!(value["parameters"]["zeta"]["default"], 1);
        assert!(value["parameters"]["alpha"].get("default").is_none());
        let rendered = serde_json::to_string(&descriptor).unwrap();
        assert!(rendered.find("zeta").unwrap() < rendered.find("alpha").unwrap());
    }
}
