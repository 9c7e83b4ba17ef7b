use std::{
    fs::File,
    io::{self, BufRead, BufReader, Read},
    path::{Path, PathBuf},
    sync::Arc,
};

use anyhow::{bail, Context, Result};
use clap::{Parser, Subcommand};
use rubric_verifiers::{BatchScorer, Catalog, RubricSettings, ScoringRequest, VerifierKind};
use serde_json::{json, Map, Value};
use shared_logging::LogLevel;
use tokio::runtime::Runtime;

#[derive(Parser, Debug)]
#[command(name = "rubric", version, about = "Rubric scoring verifiers")]
struct Cli {
    /// TOML settings with log destination and per-verifier defaults.
    #[arg(long, global = true)]
    settings: Option<PathBuf>,
    /// Overrides the settings' minimum log level.
    #[arg(long, global = true)]
    log_level: Option<String>,
    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand, Debug)]
enum Commands {
    /// Lists every verifier name.
    List,
    /// Prints a verifier's self-description as JSON.
    Describe {
        /// Verifier name or short key.
        verifier: String,
    },
    /// Scores one text.
    Score {
        /// Verifier name or short key.
        verifier: String,
        /// Candidate text; read from stdin when omitted.
        #[arg(long)]
        text: Option<String>,
        /// Parameter as `key=value`; values parse as JSON, else as strings.
        #[arg(long = "param", value_parser = parse_param)]
        params: Vec<(String, Value)>,
    },
    /// Scores a JSON-lines file of requests concurrently.
    Batch {
        /// One `{"verifier": .., "text": .., "params": {..}}` object per line.
        input: PathBuf,
    },
}

fn main() -> Result<()> {
    let cli = Cli::parse();
    let mut settings = match &cli.settings {
        Some(path) => RubricSettings::load(path)?,
        None => RubricSettings::default(),
    };
    if let Some(name) = &cli.log_level {
        let Some(level) = LogLevel::parse(name) else {
            bail!("unknown log level: {name}");
        };
        settings.min_log_level = level;
    }
    let catalog = Catalog::default().with_telemetry(settings.telemetry("rubric.cli")?);
    match cli.command {
        Commands::List => {
            for kind in VerifierKind::ALL {
                println!("{kind}");
            }
            Ok(())
        }
        Commands::Describe { verifier } => {
            let kind: VerifierKind = verifier.parse()?;
            println!("{}", serde_json::to_string_pretty(&catalog.describe(kind))?);
            Ok(())
        }
        Commands::Score {
            verifier,
            text,
            params,
        } => {
            let kind: VerifierKind = verifier.parse()?;
            let text = match text {
                Some(text) => text,
                None => read_stdin()?,
            };
            let overrides: Map<String, Value> = params.into_iter().collect();
            let params = settings.params_for(kind.name(), &overrides);
            let result = catalog.score_with_feedback(kind, &text, &params);
            println!(
                "{}",
                serde_json::to_string_pretty(&json!({
                    "verifier": kind.name(),
                    "score": result.score,
                    "feedback": result.feedback,
                }))?
            );
            Ok(())
        }
        Commands::Batch { input } => handle_batch(&input, &settings, catalog),
    }
}

fn handle_batch(input: &Path, settings: &RubricSettings, catalog: Catalog) -> Result<()> {
    let requests = read_requests(input)?
        .into_iter()
        .map(|mut request| {
            request.params = settings.params_for(request.verifier.name(), &request.params);
            request
        })
        .collect();
    let runtime = Runtime::new()?;
    let scorer = BatchScorer::new(Arc::new(catalog));
    let outcomes = runtime.block_on(scorer.score_batch(requests))?;
    for outcome in outcomes {
        println!("{}", serde_json::to_string(&outcome)?);
    }
    Ok(())
}

fn read_requests(path: &Path) -> Result<Vec<ScoringRequest>> {
    let file =
        File::open(path).with_context(|| format!("opening batch input {}", path.display()))?;
    let mut requests = Vec::new();
    for (idx, line) in BufReader::new(file).lines().enumerate() {
        let line = line?;
        if line.trim().is_empty() {
            continue;
        }
        let request = serde_json::from_str(&line)
            .with_context(|| format!("parsing request on line {}", idx + 1))?;
        requests.push(request);
    }
    Ok(requests)
}

fn read_stdin() -> Result<String> {
    let mut buffer = String::new();
    io::stdin()
        .read_to_string(&mut buffer)
        .context("reading candidate text from stdin")?;
    Ok(buffer)
}

fn parse_param(raw: &str) -> Result<(String, Value)> {
    let Some((key, value)) = raw.split_once('=') else {
        bail!("expected key=value, got '{raw}'");
    };
    let key = key.trim();
    if key.is_empty() {
        bail!("parameter name is empty in '{raw}'");
    }
    let value = serde_json::from_str(value).unwrap_or_else(|_| Value::String(value.to_string()));
    Ok((key.to_string(), value))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn params_parse_json_then_fall_back_to_strings() {
        assert_eq!(parse_param("tolerance=2").unwrap(), ("tolerance".into(), json!(2)));
        assert_eq!(
            parse_param("long_line_range=[6,12]").unwrap().1,
            json!([6, 12])
        );
        assert_eq!(
            parse_param("original_text=HELLO WORLD").unwrap().1,
            json!("HELLO WORLD")
        );
        assert!(parse_param("novalue").is_err());
        assert!(parse_param("=3").is_err());
    }

    #[test]
    fn cli_parses_repeated_params() {
        let cli = Cli::try_parse_from([
            "rubric", "score", "haiku", "--text", "x", "--param", "tolerance=0", "--param",
            "extra=yes",
        ])
        .unwrap();
        match cli.command {
            Commands::Score { params, .. } => assert_eq!(params.len(), 2),
            other => panic!("unexpected command {other:?}"),
        }
    }

    #[test]
    fn batch_requests_skip_blank_lines() {
        let tmp = tempfile::tempdir().unwrap();
        let path = tmp.path().join("requests.jsonl");
        std::fs::write(
            &path,
            "{\"verifier\": \"line_count\", \"text\": \"a\\nb\"}\n\n{\"verifier\": \"morse_code_verifier\", \"text\": \"...\", \"params\": {\"original_text\": \"S\"}}\n",
        )
        .unwrap();
        let requests = read_requests(&path).unwrap();
        assert_eq!(requests.len(), 2);
        assert_eq!(requests[1].verifier, VerifierKind::MorseCode);
    }
}
