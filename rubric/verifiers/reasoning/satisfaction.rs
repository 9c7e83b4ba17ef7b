use std::{sync::Arc, time::Duration};

use once_cell::sync::Lazy;
use regex::Regex;
use serde::Deserialize;
use serde_json::json;
use shared_logging::LogLevel;

use crate::{
    contract::{ParameterSpec, ParameterType, ScoreResult, Verifier, VerifierDescriptor},
    reasoning::judge::{consult, AnswerJudge, JudgeError, JudgeEvaluation, JudgeRequest},
    telemetry::{emit, VerifierTelemetry},
};

static ANSWER: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"(?is)<answer>(.*?)</answer>").expect("answer pattern compiles"));

const NAME: &str = "satisfaction_verifier";

/// Options for [`SatisfactionVerifier`].
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
#[serde(default)]
pub struct SatisfactionConfig {
    /// Question the answer responds to.
    pub question: Option<String>,
    /// Reference answer shown to the judge.
    pub gold_answer: Option<String>,
    /// Judge model identifier.
    pub model: String,
    /// Upper bound on the judge call.
    pub timeout_ms: u64,
}

impl Default for SatisfactionConfig {
    fn default() -> Self {
        Self {
            question: None,
            gold_answer: None,
            model: "llama3.1".into(),
            timeout_ms: 30_000,
        }
    }
}

/// Delegates grading of the `<answer>` body to an external judge.
///
/// Judge failures, timeouts and malformed replies all become a 0.0 score
/// with the failure named in the feedback.
#[derive(Clone, Default)]
pub struct SatisfactionVerifier {
    judge: Option<Arc<dyn AnswerJudge>>,
    telemetry: Option<VerifierTelemetry>,
}

impl SatisfactionVerifier {
    /// Creates a verifier backed by `judge`.
    #[must_use]
    pub fn new(judge: Arc<dyn AnswerJudge>) -> Self {
        Self {
            judge: Some(judge),
            telemetry: None,
        }
    }

    /// Attaches a telemetry handle.
    #[must_use]
    pub fn with_telemetry(mut self, telemetry: Option<VerifierTelemetry>) -> Self {
        self.telemetry = telemetry;
        self
    }

    fn evaluate(&self, answer: &str, config: &SatisfactionConfig) -> Result<JudgeEvaluation, JudgeError> {
        let judge = self
            .judge
            .as_deref()
            .ok_or_else(|| JudgeError::Unreachable("no judge configured".into()))?;
        let request = JudgeRequest {
            model: config.model.clone(),
            prompt: build_prompt(answer, config),
            schema: JudgeEvaluation::schema(),
        };
        let raw = consult(judge, request, Duration::from_millis(config.timeout_ms))?;
        emit(
            self.telemetry.as_ref(),
            LogLevel::Debug,
            "judge.raw_output",
            json!({ "verifier": NAME, "model": config.model, "payload": &raw }),
        );
        JudgeEvaluation::from_payload(raw)
    }
}

fn build_prompt(answer: &str, config: &SatisfactionConfig) -> String {
    let question = config.question.as_deref().unwrap_or("No question provided");
    let gold = config.gold_answer.as_deref().unwrap_or("No gold answer provided");
    format!(
        r#"You are an AI scoring engine. Return valid JSON:
{{
  "score": <float in [0.0, 1.0]>,
  "feedback": "<short explanation>"
}}

### SCORING CRITERIA
1. If the answer is correct, start from 1.0.
2. Deduct up to 0.1 if clarity, grammar, or style are significantly lacking.
3. Deduct up to 0.1 if the answer doesn't reference the key part of the question (like the numbers or statement).
4. Never reduce the score below 0.0.

### QUESTION
{question}

### REFERENCE ANSWER
{gold}

### USER'S ANSWER
{answer}

### INSTRUCTIONS
- Provide a final JSON with "score" and "feedback".
"#
    )
}

impl Verifier for SatisfactionVerifier {
    type Config = SatisfactionConfig;

    fn describe(&self) -> VerifierDescriptor {
        VerifierDescriptor::new(
            NAME,
            "Scores an <answer> for correctness, clarity, style, completeness, and partial \
             repetition of the question, using an external judge with structured output.",
        )
        .parameter(
            "question",
            ParameterSpec::new(ParameterType::String, "Question the answer responds to."),
        )
        .parameter(
            "gold_answer",
            ParameterSpec::new(ParameterType::String, "Reference answer shown to the judge."),
        )
        .parameter(
            "model",
            ParameterSpec::new(ParameterType::String, "Judge model identifier.")
                .with_default(json!("llama3.1")),
        )
        .parameter(
            "timeout_ms",
            ParameterSpec::new(ParameterType::Integer, "Judge call timeout in milliseconds.")
                .with_default(json!(30_000)),
        )
    }

    fn score_with_feedback(&self, text: &str, config: &SatisfactionConfig) -> ScoreResult {
        let answer = ANSWER
            .captures(text)
            .map(|caps| caps[1].trim().to_string())
            .unwrap_or_default();
        if answer.is_empty() {
            return ScoreResult::fail("No <answer>...</answer> found => score=0.0.");
        }
        match self.evaluate(&answer, config) {
            Ok(evaluation) => {
                let score = evaluation.score.clamp(0.0, 1.0);
                let mut feedback = vec![if (score - evaluation.score).abs() > f64::EPSILON {
                    format!(
                        "Judge score: {score:.2} (clamped from {:.2}).",
                        evaluation.score
                    )
                } else {
                    format!("Judge score: {score:.2}.")
                }];
                if !evaluation.feedback.is_empty() {
                    feedback.push(format!("Judge feedback: {}", evaluation.feedback));
                }
                ScoreResult::new(score, feedback)
            }
            Err(err) => {
                let message = format!("Error calling judge or parsing output => {err} => score=0.0.");
                emit(
                    self.telemetry.as_ref(),
                    LogLevel::Error,
                    "judge.failed",
                    json!({ "verifier": NAME, "error": err.to_string() }),
                );
                ScoreResult::fail(message)
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use async_trait::async_trait;
    use parking_lot::Mutex;
    use serde_json::Value;
    use shared_logging::MemoryLogger;

    #[derive(Default)]
    struct RecordingJudge {
        seen: Mutex<Vec<JudgeRequest>>,
    }

    #[async_trait]
    impl AnswerJudge for RecordingJudge {
        async fn judge(&self, request: JudgeRequest) -> Result<Value, JudgeError> {
            self.seen.lock().push(request);
            Ok(json!({"score": 0.9, "feedback": "Clear and correct."}))
        }
    }

    fn verifier(payload: Value) -> SatisfactionVerifier {
        SatisfactionVerifier::new(Arc::new(crate::reasoning::judge::LoopbackJudge::new(payload)))
    }

    #[test]
    fn judge_score_is_reported() {
        let judge = Arc::new(RecordingJudge::default());
        let verifier = SatisfactionVerifier::new(judge.clone());
        let config = SatisfactionConfig {
            question: Some("What is 2+2?".into()),
            gold_answer: Some("4".into()),
            ..SatisfactionConfig::default()
        };
        let result = verifier.score_with_feedback("<ANSWER> 2+2 is 4 </ANSWER>", &config);
        assert!((result.score - 0.9).abs() < 1e-9);
        assert_eq!(
            result.feedback,
            vec!["Judge score: 0.90.", "Judge feedback: Clear and correct."]
        );
        let seen = judge.seen.lock();
        assert_eq!(seen[0].model, "llama3.1");
        assert!(seen[0].prompt.contains("What is 2+2?"));
        assert!(seen[0].prompt.contains("### USER'S ANSWER\n2+2 is 4"));
    }

    #[test]
    fn out_of_range_scores_are_clamped() {
        let high = verifier(json!({"score": 3.5, "feedback": ""}));
        let result = high.score_with_feedback("<answer>4</answer>", &SatisfactionConfig::default());
        assert_eq!(result.score, 1.0);
        assert_eq!(result.feedback, vec!["Judge score: 1.00 (clamped from 3.50)."]);
        let low = verifier(json!({"score": -2.0, "feedback": "wrong"}));
        assert_eq!(low.score("<answer>5</answer>", &SatisfactionConfig::default()), 0.0);
    }

    #[test]
    fn missing_answer_skips_the_judge() {
        let judge = Arc::new(RecordingJudge::default());
        let verifier = SatisfactionVerifier::new(judge.clone());
        let result = verifier.score_with_feedback("<answer>  </answer>", &SatisfactionConfig::default());
        assert_eq!(result.feedback, vec!["No <answer>...</answer> found => score=0.0."]);
        assert!(judge.seen.lock().is_empty());
    }

    #[test]
    fn failures_degrade_to_zero_and_are_logged() {
        let memory = Arc::new(MemoryLogger::new());
        let telemetry = VerifierTelemetry::builder("verifiers")
            .sink(memory.clone())
            .build()
            .unwrap();
        let verifier = verifier(json!({"verdict": "great"})).with_telemetry(Some(telemetry));
        let result = verifier.score_with_feedback("<answer>4</answer>", &SatisfactionConfig::default());
        assert_eq!(result.score, 0.0);
        assert!(result.feedback[0].starts_with(
            "Error calling judge or parsing output => judge returned malformed output"
        ));
        assert_eq!(memory.messages(), vec!["judge.failed"]);

        let slow = SatisfactionVerifier::new(Arc::new(
            crate::reasoning::judge::LoopbackJudge::new(json!({"score": 1.0}))
                .with_delay(Duration::from_millis(500)),
        ));
        let config = SatisfactionConfig {
            timeout_ms: 10,
            ..SatisfactionConfig::default()
        };
        let result = slow.score_with_feedback("<answer>4</answer>", &config);
        assert_eq!(result.score, 0.0);
        assert!(result.feedback[0].contains("judge timed out after 10ms"));
    }

    #[test]
    fn unconfigured_judge_is_reported() {
        let result = SatisfactionVerifier::default()
            .score_with_feedback("<answer>4</answer>", &SatisfactionConfig::default());
        assert_eq!(result.score, 0.0);
        assert_eq!(
            result.feedback,
            vec!["Error calling judge or parsing output => judge unreachable: no judge configured => score=0.0."]
        );
    }
}
