use std::{
    collections::BTreeMap,
    fs,
    path::{Path, PathBuf},
};

use anyhow::{bail, Context, Result};
use serde::Deserialize;
use serde_json::{Map, Value};
use shared_logging::LogLevel;

use crate::telemetry::VerifierTelemetry;

/// Host-level settings read from a TOML document.
///
/// ```toml
/// log_path = "logs/verifiers.jsonl"
/// min_log_level = "debug"
/// judge_timeout_ms = 5000
///
/// [defaults.haiku_verifier]
/// tolerance = 0
/// ```
#[derive(Debug, Clone, PartialEq)]
pub struct RubricSettings {
    /// JSON-lines log destination; no file logging when absent.
    pub log_path: Option<PathBuf>,
    /// Records below this level are dropped.
    pub min_log_level: LogLevel,
    /// Timeout applied to judge calls unless a call sets its own.
    pub judge_timeout_ms: Option<u64>,
    /// Per-verifier default parameters, keyed by verifier name.
    pub defaults: BTreeMap<String, Map<String, Value>>,
}

impl Default for RubricSettings {
    fn default() -> Self {
        Self {
            log_path: None,
            min_log_level: LogLevel::Info,
            judge_timeout_ms: None,
            defaults: BTreeMap::new(),
        }
    }
}

#[derive(Debug, Clone, Default, Deserialize)]
struct RubricSettingsSerde {
    #[serde(default)]
    log_path: Option<PathBuf>,
    #[serde(default)]
    min_log_level: Option<String>,
    #[serde(default)]
    judge_timeout_ms: Option<u64>,
    #[serde(default)]
    defaults: BTreeMap<String, Map<String, Value>>,
}

impl RubricSettings {
    /// Loads settings from a TOML file; a relative `log_path` is resolved
    /// against the file's directory.
    pub fn load(path: impl AsRef<Path>) -> Result<Self> {
        let path = path.as_ref();
        let raw = fs::read_to_string(path)
            .with_context(|| format!("reading rubric settings {}", path.display()))?;
        let mut settings =
            Self::from_toml_str(&raw).with_context(|| format!("parsing {}", path.display()))?;
        let source_dir = path
            .parent()
            .map(Path::to_path_buf)
            .unwrap_or_else(|| PathBuf::from("."));
        if let Some(log_path) = settings.log_path.as_mut() {
            if log_path.is_relative() {
                *log_path = source_dir.join(&*log_path);
            }
        }
        Ok(settings)
    }

    /// Parses settings from TOML text.
    pub fn from_toml_str(raw: &str) -> Result<Self> {
        let document: RubricSettingsSerde = toml::from_str(raw)?;
        let min_log_level = match document.min_log_level.as_deref() {
            None => LogLevel::Info,
            Some(name) => match LogLevel::parse(name) {
                Some(level) => level,
                None => bail!("unknown min_log_level: {name}"),
            },
        };
        if document.judge_timeout_ms == Some(0) {
            bail!("judge_timeout_ms must be positive");
        }
        Ok(Self {
            log_path: document.log_path,
            min_log_level,
            judge_timeout_ms: document.judge_timeout_ms,
            defaults: document.defaults,
        })
    }

    /// Parameters for `verifier`: configured defaults overlaid by `overrides`.
    #[must_use]
    pub fn params_for(&self, verifier: &str, overrides: &Map<String, Value>) -> Map<String, Value> {
        let mut params = self.defaults.get(verifier).cloned().unwrap_or_default();
        if verifier == "satisfaction_verifier" {
            if let Some(timeout) = self.judge_timeout_ms {
                params
                    .entry("timeout_ms")
                    .or_insert_with(|| Value::from(timeout));
            }
        }
        for (key, value) in overrides {
            params.insert(key.clone(), value.clone());
        }
        params
    }

    /// Builds telemetry from the configured log file, if any.
    pub fn telemetry(&self, module: &str) -> Result<Option<VerifierTelemetry>> {
        let Some(path) = &self.log_path else {
            return Ok(None);
        };
        let telemetry = VerifierTelemetry::builder(module)
            .log_path(path)
            .min_level(self.min_log_level)
            .build()?;
        Ok(Some(telemetry))
    }
}
