use std::time::Duration;

use async_trait::async_trait;
use serde::{Deserialize, Serialize};
use serde_json::{json, Value};
use thiserror::Error;

/// Structured verdict expected back from a judge.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct JudgeEvaluation {
    /// Judge score; clamped into `[0, 1]` by the caller.
    pub score: f64,
    /// Short explanation.
    #[serde(default)]
    pub feedback: String,
}

impl JudgeEvaluation {
    /// JSON schema sent along with every request.
    #[must_use]
    pub fn schema() -> Value {
        json!({
            "title": "AnswerEvaluation",
            "type": "object",
            "properties": {
                "score": { "type": "number" },
                "feedback": { "type": "string" }
            },
            "required": ["score", "feedback"]
        })
    }

    /// Parses a judge payload, accepting either an object or JSON text.
    pub fn from_payload(payload: Value) -> Result<Self, JudgeError> {
        let evaluation: Self = match payload {
            Value::String(raw) => serde_json::from_str(raw.trim()),
            other => serde_json::from_value(other),
        }
        .map_err(|err| JudgeError::Malformed(err.to_string()))?;
        if !evaluation.score.is_finite() {
            return Err(JudgeError::Malformed(format!(
                "score {} is not a finite number",
                evaluation.score
            )));
        }
        Ok(evaluation)
    }
}

/// Prompt handed to a judge.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct JudgeRequest {
    /// Model identifier the judge should use.
    pub model: String,
    /// Full grading prompt.
    pub prompt: String,
    /// Expected output schema.
    pub schema: Value,
}

/// Failures while consulting a judge.
#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum JudgeError {
    /// The judge could not be reached or raised an error.
    #[error("judge unreachable: {0}")]
    Unreachable(String),
    /// The judge did not answer in time.
    #[error("judge timed out after {0:?}")]
    Timeout(Duration),
    /// The judge answered with something other than the expected schema.
    #[error("judge returned malformed output: {0}")]
    Malformed(String),
}

/// External semantic grader.
#[async_trait]
pub trait AnswerJudge: Send + Sync {
    /// Grades a request, returning the raw structured payload.
    async fn judge(&self, request: JudgeRequest) -> Result<Value, JudgeError>;
}

/// Judge that replays a fixed reply, optionally after a delay.
#[derive(Debug, Clone)]
pub struct LoopbackJudge {
    reply: Result<Value, JudgeError>,
    delay: Option<Duration>,
}

impl LoopbackJudge {
    /// Always answers with `payload`.
    #[must_use]
    pub fn new(payload: Value) -> Self {
        Self {
            reply: Ok(payload),
            delay: None,
        }
    }

    /// Always fails with `error`.
    #[must_use]
    pub fn failing(error: JudgeError) -> Self {
        Self {
            reply: Err(error),
            delay: None,
        }
    }

    /// Waits before replying.
    #[must_use]
    pub fn with_delay(mut self, delay: Duration) -> Self {
        self.delay = Some(delay);
        self
    }
}

#[async_trait]
impl AnswerJudge for LoopbackJudge {
    async fn judge(&self, _request: JudgeRequest) -> Result<Value, JudgeError> {
        if let Some(delay) = self.delay {
            tokio::time::sleep(delay).await;
        }
        self.reply.clone()
    }
}

/// Runs one judge call to completion or until `timeout` elapses.
///
/// The call gets its own thread and current-thread runtime so that scoring
/// stays synchronous whether or not the caller is already inside a runtime.
pub(crate) fn consult(
    judge: &dyn AnswerJudge,
    request: JudgeRequest,
    timeout: Duration,
) -> Result<Value, JudgeError> {
    std::thread::scope(|scope| {
        scope
            .spawn(move || {
                let runtime = tokio::runtime::Builder::new_current_thread()
                    .enable_time()
                    .build()
                    .map_err(|err| JudgeError::Unreachable(format!("runtime unavailable: {err}")))?;
                runtime
                    .block_on(async move {
                        tokio::time::timeout(timeout, judge.judge(request)).await
                    })
                    .map_err(|_| JudgeError::Timeout(timeout))?
            })
            .join()
            .unwrap_or_else(|_| Err(JudgeError::Unreachable("judge thread panicked".into())))
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    fn request() -> JudgeRequest {
        JudgeRequest {
            model: "llama3.1".into(),
            prompt: "grade".into(),
            schema: JudgeEvaluation::schema(),
        }
    }

    #[test]
    fn payloads_parse_from_objects_and_text() {
        let object = JudgeEvaluation::from_payload(json!({"score": 0.9, "feedback": "ok"})).unwrap();
        assert_eq!(object.score, 0.9);
        let text =
            JudgeEvaluation::from_payload(json!(" {\"score\": 1.5, \"feedback\": \"\"} ")).unwrap();
        assert_eq!(text.score, 1.5);
        assert!(matches!(
            JudgeEvaluation::from_payload(json!({"verdict": "yes"})),
            Err(JudgeError::Malformed(_))
        ));
        assert!(matches!(
            JudgeEvaluation::from_payload(json!("not json")),
            Err(JudgeError::Malformed(_))
        ));
    }

    #[test]
    fn consult_returns_loopback_reply() {
        let judge = LoopbackJudge::new(json!({"score": 1.0, "feedback": "fine"}));
        let payload = consult(&judge, request(), Duration::from_secs(1)).unwrap();
        assert_eq!(payload["feedback"], "fine");
    }

    #[test]
    fn consult_enforces_timeout() {
        let judge = LoopbackJudge::new(json!({})).with_delay(Duration::from_millis(500));
        let err = consult(&judge, request(), Duration::from_millis(20)).unwrap_err();
        assert_eq!(err, JudgeError::Timeout(Duration::from_millis(20)));
    }

    #[tokio::test]
    async fn consult_works_inside_a_runtime() {
        let judge = LoopbackJudge::failing(JudgeError::Unreachable("connection refused".into()));
        let err = consult(&judge, request(), Duration::from_secs(1)).unwrap_err();
        assert_eq!(err.to_string(), "judge unreachable: connection refused");
    }
}
