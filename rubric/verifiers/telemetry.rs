use std::{fmt, path::PathBuf, sync::Arc};

use anyhow::Result;
use serde_json::Value;
use shared_logging::{JsonLogger, LogLevel, LogRecord, LogSink};

/// Builder for verifier telemetry sinks.
pub struct VerifierTelemetryBuilder {
    module: String,
    log_path: Option<PathBuf>,
    sinks: Vec<Arc<dyn LogSink>>,
    min_level: LogLevel,
}

impl VerifierTelemetryBuilder {
    /// Creates the builder.
    #[must_use]
    pub fn new(module: impl Into<String>) -> Self {
        Self {
            module: module.into(),
            log_path: None,
            sinks: Vec::new(),
            min_level: LogLevel::Info,
        }
    }

    /// Appends JSON lines to the given file.
    #[must_use]
    pub fn log_path(mut self, path: impl Into<PathBuf>) -> Self {
        self.log_path = Some(path.into());
        self
    }

    /// Adds an extra sink (e.g. an in-memory logger).
    #[must_use]
    pub fn sink(mut self, sink: Arc<dyn LogSink>) -> Self {
        self.sinks.push(sink);
        self
    }

    /// Drops records below this level.
    #[must_use]
    pub const fn min_level(mut self, level: LogLevel) -> Self {
        self.min_level = level;
        self
    }

    /// Builds the telemetry handle.
    pub fn build(self) -> Result<VerifierTelemetry> {
        let mut sinks = self.sinks;
        if let Some(path) = self.log_path {
            sinks.push(Arc::new(JsonLogger::new(path)?));
        }
        Ok(VerifierTelemetry {
            inner: Arc::new(TelemetryInner {
                module: self.module,
                sinks,
                min_level: self.min_level,
            }),
        })
    }
}

/// Telemetry handle shared across verifiers; cloning is cheap.
#[derive(Clone)]
pub struct VerifierTelemetry {
    inner: Arc<TelemetryInner>,
}

impl fmt::Debug for VerifierTelemetry {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("VerifierTelemetry")
            .field("module", &self.inner.module)
            .field("sinks", &self.inner.sinks.len())
            .field("min_level", &self.inner.min_level)
            .finish()
    }
}

struct TelemetryInner {
    module: String,
    sinks: Vec<Arc<dyn LogSink>>,
    min_level: LogLevel,
}

impl VerifierTelemetry {
    /// Returns a builder.
    #[must_use]
    pub fn builder(module: impl Into<String>) -> VerifierTelemetryBuilder {
        VerifierTelemetryBuilder::new(module)
    }

    /// Logs structured metadata to every sink.
    ///
    /// A failing sink does not stop delivery to the others; the first
    /// failure is returned once every sink has been tried.
    pub fn log(&self, level: LogLevel, message: &str, metadata: Value) -> Result<()> {
        if level < self.inner.min_level {
            return Ok(());
        }
        let record = LogRecord::new(&self.inner.module, level, message).with_metadata(&metadata);
        let mut first_failure = None;
        for sink in &self.inner.sinks {
            if let Err(err) = sink.write(&record) {
                tracing::warn!("telemetry sink rejected {message}: {err:?}");
                first_failure.get_or_insert(err);
            }
        }
        first_failure.map_or(Ok(()), Err)
    }
}

/// Logs through an optional handle, swallowing sink failures.
///
/// Scoring must never change because a log file is unwritable.
pub(crate) fn emit(
    telemetry: Option<&VerifierTelemetry>,
    level: LogLevel,
    message: &str,
    metadata: Value,
) {
    if let Some(tel) = telemetry {
        if let Err(err) = tel.log(level, message, metadata) {
            tracing::warn!("verifier telemetry write failed: {err:?}");
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;
    use shared_logging::MemoryLogger;
    use tempfile::tempdir;

    #[test]
    fn telemetry_writes_file_and_memory() {
        let tmp = tempdir().unwrap();
        let path = tmp.path().join("verifiers.log");
        let memory = Arc::new(MemoryLogger::new());
        let telemetry = VerifierTelemetry::builder("verifiers")
            .log_path(&path)
            .sink(memory.clone())
            .build()
            .unwrap();
        telemetry
            .log(LogLevel::Info, "verifier.scored", json!({ "score": 1.0 }))
            .unwrap();
        let content = std::fs::read_to_string(&path).unwrap();
        assert!(content.contains("verifier.scored"));
        assert_eq!(memory.messages(), vec!["verifier.scored"]);
    }

    struct BrokenSink;

    impl LogSink for BrokenSink {
        fn write(&self, _record: &LogRecord) -> Result<()> {
            anyhow::bail!("disk full")
        }
    }

    #[test]
    fn failing_sink_does_not_starve_later_sinks() {
        let memory = Arc::new(MemoryLogger::new());
        let telemetry = VerifierTelemetry::builder("verifiers")
            .sink(Arc::new(BrokenSink))
            .sink(memory.clone())
            .build()
            .unwrap();
        let err = telemetry
            .log(LogLevel::Info, "verifier.scored", json!({}))
            .unwrap_err();
        assert_eq!(err.to_string(), "disk full");
        assert_eq!(memory.messages(), vec!["verifier.scored"]);
        emit(Some(&telemetry), LogLevel::Error, "judge.failed", json!({}));
        assert_eq!(memory.messages(), vec!["verifier.scored", "judge.failed"]);
    }

    #[test]
    fn records_below_min_level_are_dropped() {
        let memory = Arc::new(MemoryLogger::new());
        let telemetry = VerifierTelemetry::builder("verifiers")
            .sink(memory.clone())
            .min_level(LogLevel::Warn)
            .build()
            .unwrap();
        emit(Some(&telemetry), LogLevel::Debug, "judge.raw_output", json!({}));
        emit(Some(&telemetry), LogLevel::Error, "judge.failed", json!({}));
        assert_eq!(memory.messages(), vec!["judge.failed"]);
    }
}
