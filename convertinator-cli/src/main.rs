//! Convertinator driver
//!
//! Reads one submission per line on stdin:
//!   {"id": "abc", "body": "5 miles and 10 lb", "score": 3}
//!
//! After EOF writes one JSON line per reply on stdout, highest score first.
//! Logs go to stderr so stdout stays machine-readable.
//!
//! Environment:
//! - CONVERTINATOR_CONFIG / CONVERTINATOR_MIN_MATCHES: pipeline config
//! - CONVERTINATOR_RULES: JSON rule table replacing the built-in one
//! - CONVERTINATOR_LOG_DIR: write a run log of every reply
//! - CONVERTINATOR_LABEL: name used in the run log file (default "stdin")

use std::collections::HashSet;
use std::env;
use std::fs;
use std::io::{self, BufRead, Write};
use std::path::{Path, PathBuf};
use std::process::ExitCode;

use serde::{Deserialize, Serialize};
use serde_json::json;
use thiserror::Error;
use tracing::{error, info, warn};
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt, EnvFilter};

use convertinator::{ConfigError, Convertinator, PipelineConfig, RegistryError, RuleRegistry, RULES_ENV};
use convertinator_units::UNITS;

const LOG_DIR_ENV: &str = "CONVERTINATOR_LOG_DIR";
const LABEL_ENV: &str = "CONVERTINATOR_LABEL";

#[derive(Debug, Error)]
enum CliError {
    #[error(transparent)]
    Config(#[from] ConfigError),

    #[error(transparent)]
    Registry(#[from] RegistryError),

    #[error("cannot read rules file {}: {source}", .path.display())]
    RulesFile {
        path: PathBuf,
        #[source]
        source: io::Error,
    },

    #[error("i/o error: {0}")]
    Io(#[from] io::Error),

    #[error("cannot encode output: {0}")]
    Json(#[from] serde_json::Error),
}

#[derive(Debug, Clone, Deserialize)]
struct Submission {
    id: String,
    body: String,
    #[serde(default)]
    score: i64,
}

#[derive(Debug, Clone)]
struct PendingReply {
    submission: Submission,
    reply: String,
    measurements: usize,
}

#[derive(Debug, Serialize)]
struct ReplyLine<'a> {
    id: &'a str,
    reply: &'a str,
    measurements: usize,
}

#[derive(Debug, Serialize)]
struct RunLog<'a> {
    log: Vec<RunLogEntry<'a>>,
}

#[derive(Debug, Serialize)]
struct RunLogEntry<'a> {
    parent_id: &'a str,
    parent_text: &'a str,
    reply_text: &'a str,
}

/// State of one pass over the input
struct Run<'a> {
    engine: &'a Convertinator,
    seen: HashSet<String>,
    pending: Vec<PendingReply>,
}

impl<'a> Run<'a> {
    fn new(engine: &'a Convertinator) -> Self {
        Self {
            engine,
            seen: HashSet::new(),
            pending: Vec::new(),
        }
    }

    /// Handle one input line. Returns an error line for stdout if the input
    /// could not be parsed.
    fn handle_line(&mut self, line: &str) -> Option<String> {
        let line = line.trim();
        if line.is_empty() {
            return None;
        }

        let submission: Submission = match serde_json::from_str(line) {
            Ok(s) => s,
            Err(e) => {
                warn!(error = %e, "malformed submission");
                return Some(json!({ "error": format!("Parse error: {}", e) }).to_string());
            }
        };

        if !self.seen.insert(submission.id.clone()) {
            info!(id = %submission.id, "already processed, skipping");
            return None;
        }

        let processed = self.engine.process(&submission.body);
        if let Some(reply) = processed.report {
            info!(id = %submission.id, measurements = processed.measurements, "measurements found");
            self.pending.push(PendingReply {
                submission,
                reply,
                measurements: processed.measurements,
            });
        }
        None
    }

    /// Replies ordered by score, highest first; ties keep input order
    fn finish(mut self) -> Vec<PendingReply> {
        self.pending.sort_by(|a, b| b.submission.score.cmp(&a.submission.score));
        self.pending
    }
}

fn init_tracing() {
    tracing_subscriber::registry()
        .with(
            EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "convertinator=info,convertinator_cli=info".into()),
        )
        .with(tracing_subscriber::fmt::layer().with_writer(io::stderr))
        .init();
}

fn load_rules() -> Result<RuleRegistry, CliError> {
    match env::var(RULES_ENV) {
        Ok(path) => {
            let path = PathBuf::from(path);
            let json = fs::read_to_string(&path)
                .map_err(|source| CliError::RulesFile { path: path.clone(), source })?;
            let rules = RuleRegistry::from_json(&json, &UNITS)?;
            info!(path = %path.display(), rules = rules.len(), "loaded rule table");
            Ok(rules)
        }
        Err(_) => Ok(RuleRegistry::builtin(&UNITS)?),
    }
}

fn run_log_path(dir: &Path, label: &str, now: chrono::DateTime<chrono::Local>) -> PathBuf {
    dir.join(format!("runlog_{}_{}.json", label, now.format("%Y%m%d-%H%M")))
}

fn render_run_log(replies: &[PendingReply]) -> Result<String, serde_json::Error> {
    let log = RunLog {
        log: replies.iter()
            .map(|r| RunLogEntry {
                parent_id: &r.submission.id,
                parent_text: &r.submission.body,
                reply_text: &r.reply,
            })
            .collect(),
    };
    serde_json::to_string(&log)
}

fn write_replies(out: &mut impl Write, replies: &[PendingReply]) -> Result<(), CliError> {
    for r in replies {
        let line = ReplyLine {
            id: &r.submission.id,
            reply: &r.reply,
            measurements: r.measurements,
        };
        writeln!(out, "{}", serde_json::to_string(&line)?)?;
    }
    out.flush()?;
    Ok(())
}

fn run() -> Result<(), CliError> {
    let config = PipelineConfig::from_env()?;
    let rules = load_rules()?;
    info!(rules = rules.len(), min_matches = config.min_matches, "convertinator started");

    let engine = Convertinator::new(rules).with_config(config);
    let mut run = Run::new(&engine);

    let stdin = io::stdin();
    let mut reader = io::BufReader::new(stdin.lock());
    let stdout = io::stdout();
    let mut out = stdout.lock();

    loop {
        let mut line = String::new();
        match reader.read_line(&mut line) {
            Ok(0) => break,
            Ok(_) => {
                if let Some(error_line) = run.handle_line(&line) {
                    writeln!(out, "{}", error_line)?;
                }
            }
            Err(e) => {
                error!(error = %e, "error reading stdin");
                break;
            }
        }
    }

    let replies = run.finish();
    info!(replies = replies.len(), "input exhausted");
    write_replies(&mut out, &replies)?;

    if let Ok(dir) = env::var(LOG_DIR_ENV) {
        let label = env::var(LABEL_ENV).unwrap_or_else(|_| "stdin".to_string());
        let path = run_log_path(Path::new(&dir), &label, chrono::Local::now());
        fs::write(&path, render_run_log(&replies)?)?;
        info!(path = %path.display(), "run log written");
    }

    Ok(())
}

fn main() -> ExitCode {
    init_tracing();

    match run() {
        Ok(()) => ExitCode::SUCCESS,
        Err(e) => {
            error!(error = %e, "convertinator failed");
            ExitCode::FAILURE
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::TimeZone;

    fn engine() -> Convertinator {
        Convertinator::builtin().unwrap()
    }

    fn submission(id: &str, body: &str, score: i64) -> String {
        json!({ "id": id, "body": body, "score": score }).to_string()
    }

    #[test]
    fn test_replies_sorted_by_score() {
        let engine = engine();
        let mut run = Run::new(&engine);

        run.handle_line(&submission("low", "3 miles and 4 lb", 1));
        run.handle_line(&submission("none", "no units here", 50));
        run.handle_line(&submission("high", "6 feet and 7 oz", 10));
        run.handle_line(&submission("tie", "8 acres and 9 pounds", 1));

        let ids: Vec<String> = run.finish().into_iter().map(|r| r.submission.id).collect();
        assert_eq!(ids, vec!["high", "low", "tie"]);
    }

    #[test]
    fn test_repeated_id_skipped() {
        let engine = engine();
        let mut run = Run::new(&engine);

        run.handle_line(&submission("a", "3 miles and 4 lb", 0));
        run.handle_line(&submission("a", "5 miles and 6 lb", 0));

        let replies = run.finish();
        assert_eq!(replies.len(), 1);
        assert!(replies[0].reply.contains("* 3 miles ~= 4.83 km"));
    }

    #[test]
    fn test_malformed_line() {
        let engine = engine();
        let mut run = Run::new(&engine);

        assert_eq!(run.handle_line("   "), None);
        let error_line = run.handle_line("{not json").unwrap();
        let parsed: serde_json::Value = serde_json::from_str(&error_line).unwrap();
        assert!(parsed["error"].as_str().unwrap().starts_with("Parse error"));
    }

    #[test]
    fn test_score_defaults_to_zero() {
        let engine = engine();
        let mut run = Run::new(&engine);
        run.handle_line(r#"{"id": "x", "body": "2 miles and 3 lb"}"#);
        assert_eq!(run.finish()[0].submission.score, 0);
    }

    #[test]
    fn test_write_replies() {
        let engine = engine();
        let mut run = Run::new(&engine);
        run.handle_line(&submission("a", "3 miles and 4 lb", 0));

        let mut buf = Vec::new();
        write_replies(&mut buf, &run.finish()).unwrap();

        let line: serde_json::Value = serde_json::from_slice(&buf).unwrap();
        assert_eq!(line["id"], "a");
        assert_eq!(line["measurements"], 2);
        assert!(line["reply"].as_str().unwrap().contains("* 4 lb ~= 1.81 kg"));
    }

    #[test]
    fn test_run_log() {
        let engine = engine();
        let mut run = Run::new(&engine);
        run.handle_line(&submission("a", "3 miles and 4 lb", 0));

        let rendered = render_run_log(&run.finish()).unwrap();
        let parsed: serde_json::Value = serde_json::from_str(&rendered).unwrap();
        let entry = &parsed["log"][0];
        assert_eq!(entry["parent_id"], "a");
        assert_eq!(entry["parent_text"], "3 miles and 4 lb");
        assert!(entry["reply_text"].as_str().unwrap().starts_with("Hi, I'm a bot!"));
    }

    #[test]
    fn test_run_log_path() {
        let now = chrono::Local.with_ymd_and_hms(2024, 3, 9, 7, 5, 0).unwrap();
        let path = run_log_path(Path::new("/tmp/logs"), "askscience", now);
        assert_eq!(path, PathBuf::from("/tmp/logs/runlog_askscience_20240309-0705.json"));
    }
}
