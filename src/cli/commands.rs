//! CLI command implementations
//!
//! Every command builds a fresh engine from the hierarchy document and
//! replays a claims file into it. `check` goes through validation,
//! `audit` and `tree` load the file as stored history.

use chrono::Utc;
use serde::Serialize;
use serde_json::Value;

use crate::analysis::RunAnalysis;
use crate::claim::{parse_claim, Claim};
use crate::config::EngineConfig;
use crate::engine::Engine;
use crate::observability::{log_event, Event};

use super::args::{Cli, Command, ReplayArgs};
use super::errors::{CliError, CliResult};
use super::io::{read_claim_lines, read_hierarchy, write_error, write_response, write_text};

/// Entry point used by the binary
pub fn run() -> CliResult<()> {
    let cli = Cli::parse_args();
    run_command(cli.command)
}

pub fn run_command(command: Command) -> CliResult<()> {
    match command {
        Command::Check { input } => {
            let engine = load_engine(&input)?;
            let lines = read_claim_lines(&input.claims)?;
            let report = check(&engine, &lines)?;

            for rejection in &report.rejections {
                let message = format!("line {}: {}", rejection.line, rejection.reason);
                write_error(&rejection.code, &message)?;
            }
            for analysis in &report.analyses {
                write_response(serde_json::to_value(analysis)?)?;
            }

            if report.rejections.is_empty() {
                Ok(())
            } else {
                Err(CliError::claims_rejected(report.rejections.len()))
            }
        }
        Command::Audit { input } => {
            let engine = load_engine(&input)?;
            let lines = read_claim_lines(&input.claims)?;
            let analyses = audit(&engine, &lines)?;

            for analysis in &analyses {
                write_response(serde_json::to_value(analysis)?)?;
            }

            let unhealthy = analyses.iter().filter(|a| !a.healthy).count();
            if unhealthy == 0 {
                Ok(())
            } else {
                Err(CliError::unhealthy_runs(unhealthy))
            }
        }
        Command::Tree { input, run } => {
            let engine = load_engine(&input)?;
            let lines = read_claim_lines(&input.claims)?;
            let rendered = tree(&engine, &lines, &run)?;
            write_text(&rendered)
        }
    }
}

/// One claims line refused by validation
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Rejection {
    pub line: usize,
    pub code: String,
    pub reason: String,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct CheckReport {
    pub accepted: usize,
    pub rejections: Vec<Rejection>,
    /// One per run, in run creation order
    pub analyses: Vec<RunAnalysis>,
}

pub fn load_engine(input: &ReplayArgs) -> CliResult<Engine> {
    let config = match &input.config {
        Some(path) => {
            let config = EngineConfig::load(path)?;
            log_event(
                config.min_log_severity,
                Event::ConfigLoaded,
                &[("path", path.display().to_string().as_str())],
            );
            config
        }
        None => EngineConfig::default(),
    };
    let engine = Engine::with_config(&config);
    engine.register_all(&read_hierarchy(&input.hierarchy)?)?;
    Ok(engine)
}

/// Submits every line through validation, in file order.
pub fn check(engine: &Engine, lines: &[(usize, Value)]) -> CliResult<CheckReport> {
    let mut accepted = 0;
    let mut rejections = Vec::new();

    for (line, value) in lines {
        match engine.log_json(value) {
            Ok(()) => accepted += 1,
            Err(e) => rejections.push(Rejection {
                line: *line,
                code: e.code().to_string(),
                reason: e.to_string(),
            }),
        }
    }

    Ok(CheckReport {
        accepted,
        rejections,
        analyses: analyze_all(engine)?,
    })
}

/// Loads every line without validation and analyses each run.
pub fn audit(engine: &Engine, lines: &[(usize, Value)]) -> CliResult<Vec<RunAnalysis>> {
    import_lines(engine, lines)?;
    analyze_all(engine)
}

/// Loads every line without validation and renders one run's tree.
pub fn tree(engine: &Engine, lines: &[(usize, Value)], run: &str) -> CliResult<String> {
    import_lines(engine, lines)?;
    Ok(engine.render_proof_tree(run)?)
}

fn analyze_all(engine: &Engine) -> CliResult<Vec<RunAnalysis>> {
    let mut analyses = Vec::new();
    for id in engine.run_ids() {
        analyses.push(engine.analyze_run(&id)?);
    }
    Ok(analyses)
}

fn import_lines(engine: &Engine, lines: &[(usize, Value)]) -> CliResult<usize> {
    let claims = lines
        .iter()
        .map(|(line, value)| {
            decode_stored_claim(value).map_err(|e| CliError::invalid_claim(*line, e))
        })
        .collect::<CliResult<Vec<Claim>>>()?;
    Ok(engine.import_claims(claims)?)
}

/// Historical lines carry their own timestamp; lines without one are
/// stamped at load time.
fn decode_stored_claim(value: &Value) -> Result<Claim, String> {
    if value.get("timestamp").is_some() {
        return serde_json::from_value(value.clone()).map_err(|e| e.to_string());
    }
    parse_claim(value)
        .map(|claim| Claim::stamp(claim, Utc::now()))
        .map_err(|e| e.to_string())
}
