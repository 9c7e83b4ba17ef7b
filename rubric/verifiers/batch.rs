use std::sync::Arc;

use anyhow::{Context, Result};
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use serde_json::{json, Map, Value};
use shared_logging::LogLevel;
use uuid::Uuid;

use crate::{
    catalog::{Catalog, VerifierKind},
    contract::ScoreResult,
    telemetry::emit,
};

/// One text to score with one verifier.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ScoringRequest {
    /// Correlation id echoed on the outcome.
    #[serde(default = "Uuid::new_v4")]
    pub id: Uuid,
    /// Verifier to run.
    pub verifier: VerifierKind,
    /// Candidate text.
    pub text: String,
    /// Untyped parameters, converted at the catalog boundary.
    #[serde(default)]
    pub params: Map<String, Value>,
}

impl ScoringRequest {
    /// Creates a request with a fresh id and no parameters.
    #[must_use]
    pub fn new(verifier: VerifierKind, text: impl Into<String>) -> Self {
        Self {
            id: Uuid::new_v4(),
            verifier,
            text: text.into(),
            params: Map::new(),
        }
    }

    /// Adds one parameter.
    #[must_use]
    pub fn with_param(mut self, key: impl Into<String>, value: Value) -> Self {
        self.params.insert(key.into(), value);
        self
    }
}

/// Result of one [`ScoringRequest`].
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ScoringOutcome {
    /// Id of the originating request.
    pub id: Uuid,
    /// Verifier that ran.
    pub verifier: VerifierKind,
    /// Score and feedback.
    pub result: ScoreResult,
    /// Completion time.
    pub scored_at: DateTime<Utc>,
}

/// Fans requests out over the blocking pool; verifiers share no mutable state.
pub struct BatchScorer {
    catalog: Arc<Catalog>,
}

impl BatchScorer {
    /// Creates a scorer over a shared catalog.
    #[must_use]
    pub const fn new(catalog: Arc<Catalog>) -> Self {
        Self { catalog }
    }

    /// Scores every request concurrently; outcomes keep request order.
    pub async fn score_batch(&self, requests: Vec<ScoringRequest>) -> Result<Vec<ScoringOutcome>> {
        self.log(LogLevel::Info, "batch.start", requests.len());
        let handles: Vec<_> = requests
            .into_iter()
            .map(|request| {
                let catalog = Arc::clone(&self.catalog);
                tokio::task::spawn_blocking(move || {
                    emit(
                        catalog.telemetry(),
                        LogLevel::Debug,
                        "batch.request",
                        json!({ "id": request.id, "verifier": request.verifier.name() }),
                    );
                    let result =
                        catalog.score_with_feedback(request.verifier, &request.text, &request.params);
                    ScoringOutcome {
                        id: request.id,
                        verifier: request.verifier,
                        result,
                        scored_at: Utc::now(),
                    }
                })
            })
            .collect();
        let mut outcomes = Vec::with_capacity(handles.len());
        for handle in handles {
            outcomes.push(handle.await.context("scoring task failed")?);
        }
        self.log(LogLevel::Info, "batch.complete", outcomes.len());
        Ok(outcomes)
    }

    fn log(&self, level: LogLevel, message: &str, count: usize) {
        emit(self.catalog.telemetry(), level, message, json!({ "count": count }));
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::telemetry::VerifierTelemetry;
    use shared_logging::MemoryLogger;

    #[tokio::test(flavor = "multi_thread", worker_threads = 2)]
    async fn outcomes_keep_request_order() {
        let memory = Arc::new(MemoryLogger::new());
        let telemetry = VerifierTelemetry::builder("verifiers")
            .sink(memory.clone())
            .build()
            .unwrap();
        let scorer = BatchScorer::new(Arc::new(Catalog::default().with_telemetry(Some(telemetry))));
        let requests = vec![
            ScoringRequest::new(VerifierKind::WordCount, "two words").with_param("n", json!(2)),
            ScoringRequest::new(VerifierKind::LineCount, "a\nb\nc").with_param("desired", json!(3)),
            ScoringRequest::new(VerifierKind::MorseCode, "... --- ...")
                .with_param("original_text", json!("SOS")),
            ScoringRequest::new(VerifierKind::BoxedAnswer, "\\boxed{7}"),
        ];
        let ids: Vec<Uuid> = requests.iter().map(|r| r.id).collect();
        let outcomes = scorer.score_batch(requests).await.unwrap();
        assert_eq!(outcomes.iter().map(|o| o.id).collect::<Vec<_>>(), ids);
        let scores: Vec<f64> = outcomes.iter().map(|o| o.result.score).collect();
        assert_eq!(scores, vec![1.0, 1.0, 1.0, 0.0]);

        let messages = memory.messages();
        assert_eq!(messages.first().map(String::as_str), Some("batch.start"));
        assert_eq!(messages.last().map(String::as_str), Some("batch.complete"));
        assert_eq!(messages.iter().filter(|m| *m == "verifier.scored").count(), 4);
    }

    #[tokio::test]
    async fn empty_batch_is_fine() {
        let scorer = BatchScorer::new(Arc::new(Catalog::default()));
        assert!(scorer.score_batch(Vec::new()).await.unwrap().is_empty());
    }

    #[test]
    fn requests_deserialize_with_defaults() {
        let request: ScoringRequest =
            serde_json::from_value(json!({"verifier": "haiku_verifier", "text": "x"})).unwrap();
        assert_eq!(request.verifier, VerifierKind::Haiku);
        assert!(request.params.is_empty());
    }
}
