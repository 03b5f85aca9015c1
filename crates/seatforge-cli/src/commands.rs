//! Subcommand bodies, kept apart from argument parsing.

use std::fs;
use std::path::{Path, PathBuf};

use seatforge::{
    Change, ConfigError, DiffRequest, GenerateRequest, PlanInput, PlannerConfig, SeatForgeError,
    SeatPlanner,
};
use serde::de::DeserializeOwned;
use serde::Deserialize;
use serde_json::{json, Value};
use thiserror::Error;
use tracing::info;


#[derive(Debug, Error)]
pub enum CliError {
    #[error("cannot read {path}: {source}")]
    Read {
        path: PathBuf,
        source: std::io::Error,
    },

    #[error("invalid JSON in {path}: {source}")]
    Parse {
        path: PathBuf,
        source: serde_json::Error,
    },

    #[error("configuration: {0}")]
    Config(#[from] ConfigError),

    #[error(transparent)]
    Planner(#[from] SeatForgeError),

    #[error("cannot encode output: {0}")]
    Encode(#[from] serde_json::Error),
}

/// Budget overrides given on the command line.
#[derive(Debug, Clone, Copy, Default)]
pub struct RunOptions {
    pub seed: Option<u64>,
    pub max_iterations: Option<u64>,
    pub time_budget_ms: Option<u64>,
}

#[derive(Deserialize)]
#[serde(untagged)]
enum ChangesFile {
    Request(DiffRequest),
    Changes(Vec<Change>),
}

pub fn planner(config: Option<&Path>) -> Result<SeatPlanner, CliError> {
    match config {
        Some(path) => Ok(SeatPlanner::from_config_file(path)?),
        None => Ok(SeatPlanner::new(PlannerConfig::default())),
    }
}

fn read_json<T: DeserializeOwned>(path: &Path) -> Result<T, CliError> {
    let contents = fs::read_to_string(path).map_err(|source| CliError::Read {
        path: path.to_path_buf(),
        source,
    })?;
    serde_json::from_str(&contents).map_err(|source| CliError::Parse {
        path: path.to_path_buf(),
        source,
    })
}

pub fn generate(
    planner: &SeatPlanner,
    input: &Path,
    respect_locks: bool,
    options: RunOptions,
) -> Result<Value, CliError> {
    let plan_input: PlanInput = read_json(input)?;
    let termination = &planner.config().termination;
    let mut request = GenerateRequest::default()
        .with_respect_locks(respect_locks)
        .with_max_iterations(options.max_iterations.unwrap_or(termination.max_iterations))
        .with_time_budget_ms(options.time_budget_ms.unwrap_or(termination.time_budget_ms));
    request.seed = options.seed;

    info!(event = "cli_generate", input = %input.display());
    let plan = planner.generate(&plan_input, &request)?;
    Ok(serde_json::to_value(&plan)?)
}

pub fn diff(
    planner: &SeatPlanner,
    input: &Path,
    changes: &Path,
    options: RunOptions,
) -> Result<Value, CliError> {
    let plan_input: PlanInput = read_json(input)?;
    let mut request = match read_json::<ChangesFile>(changes)? {
        ChangesFile::Request(request) => request,
        ChangesFile::Changes(changes) => DiffRequest::new(changes),
    };
    if options.seed.is_some() {
        request.seed = options.seed;
    }
    if options.max_iterations.is_some() {
        request.max_iterations = options.max_iterations;
    }
    if options.time_budget_ms.is_some() {
        request.time_budget_ms = options.time_budget_ms;
    }

    info!(event = "cli_diff", input = %input.display(), changes = request.changes.len());
    let outcome = planner.diff(&plan_input, &request)?;
    Ok(json!({
        "affectedTables": outcome.affected_tables,
        "affectedGuests": outcome.affected_guests,
        "summary": outcome.plan.summary,
        "plan": outcome.plan,
    }))
}

pub fn validate(planner: &SeatPlanner, input: &Path) -> Result<Value, CliError> {
    let plan_input: PlanInput = read_json(input)?;
    let report = planner.validate(&plan_input)?;
    Ok(serde_json::to_value(&report)?)
}

pub fn render(value: &Value, pretty: bool) -> Result<String, CliError> {
    let text = if pretty {
        serde_json::to_string_pretty(value)?
    } else {
        serde_json::to_string(value)?
    };
    Ok(text)
}
