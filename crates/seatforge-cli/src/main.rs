//! `seatforge`: run the planner over JSON files.
//!
//! Results are written to stdout as JSON, logs go to stderr.

use std::path::PathBuf;
use std::process::ExitCode;

use clap::{Parser, Subcommand};

mod commands;

use commands::{CliError, RunOptions};

#[derive(Parser)]
#[command(name = "seatforge", version, about = "Seat assignment planner")]
struct Cli {
    /// Planner configuration file (TOML, or YAML by extension).
    #[arg(long, global = true)]
    config: Option<PathBuf>,

    /// Pretty-print the JSON output.
    #[arg(long, global = true)]
    pretty: bool,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Generate a full plan.
    Generate {
        /// Plan input (guests, tables, constraints, committed seats).
        #[arg(long)]
        input: PathBuf,

        /// Ignore committed seats and locked flags.
        #[arg(long)]
        ignore_locks: bool,

        #[command(flatten)]
        run: RunArgs,
    },

    /// Re-plan the committed seats after a list of changes.
    Diff {
        #[arg(long)]
        input: PathBuf,

        /// Diff request, or a bare JSON array of changes.
        #[arg(long)]
        changes: PathBuf,

        #[command(flatten)]
        run: RunArgs,
    },

    /// Score the committed seats without optimizing.
    Validate {
        #[arg(long)]
        input: PathBuf,
    },
}

#[derive(clap::Args)]
struct RunArgs {
    /// Random seed for a reproducible run.
    #[arg(long)]
    seed: Option<u64>,

    /// Iteration cap of the local search.
    #[arg(long)]
    max_iterations: Option<u64>,

    /// Wall-clock budget in milliseconds.
    #[arg(long)]
    time_budget_ms: Option<u64>,
}

impl From<RunArgs> for RunOptions {
    fn from(args: RunArgs) -> Self {
        RunOptions {
            seed: args.seed,
            max_iterations: args.max_iterations,
            time_budget_ms: args.time_budget_ms,
        }
    }
}

fn main() -> ExitCode {
    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new("warn")),
        )
        .with_writer(std::io::stderr)
        .init();

    let cli = Cli::parse();
    match run(cli) {
        Ok(output) => {
            println!("{output}");
            ExitCode::SUCCESS
        }
        Err(err) => {
            eprintln!("error: {err}");
            ExitCode::FAILURE
        }
    }
}

fn run(cli: Cli) -> Result<String, CliError> {
    let planner = commands::planner(cli.config.as_deref())?;
    let value = match cli.command {
        Commands::Generate {
            input,
            ignore_locks,
            run,
        } => commands::generate(&planner, &input, !ignore_locks, run.into())?,
        Commands::Diff {
            input,
            changes,
            run,
        } => commands::diff(&planner, &input, &changes, run.into())?,
        Commands::Validate { input } => commands::validate(&planner, &input)?,
    };
    commands::render(&value, cli.pretty)
}
