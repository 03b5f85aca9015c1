//! Colorful console output for planner runs.
//!
//! Provides a custom `tracing` layer that formats planner events with colors.
//!
//! ## Log Levels
//!
//! - **INFO**: Run and job lifecycle (`solve_start`, `diff_end`, `job_finished`, ...)
//! - **WARN**: Constraint issues and skipped input
//! - **DEBUG**: Phase boundaries, sweeps and new best scores
//! - **TRACE**: Individual move evaluations

#[cfg(test)]
mod tests;

use num_format::{Locale, ToFormattedString};
use owo_colors::OwoColorize;
use std::io::{self, Write};
use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::OnceLock;
use std::time::Instant;
use tracing::field::{Field, Visit};
use tracing::{Event, Level, Subscriber};
use tracing_subscriber::filter::LevelFilter;
use tracing_subscriber::layer::Context;
use tracing_subscriber::layer::SubscriberExt;
use tracing_subscriber::util::SubscriberInitExt;
use tracing_subscriber::{EnvFilter, Layer};

static INIT: OnceLock<()> = OnceLock::new();
static EPOCH: OnceLock<Instant> = OnceLock::new();
static RUN_START_NANOS: AtomicU64 = AtomicU64::new(0);

/// Package version for banner display.
const VERSION: &str = env!("CARGO_PKG_VERSION");

/// Initializes the planner console output.
///
/// Safe to call multiple times - only the first call has effect.
/// Prints the SeatForge banner and sets up tracing, honoring `RUST_LOG`.
pub fn init() {
    INIT.get_or_init(|| {
        print_banner();

        let filter = EnvFilter::builder()
            .with_default_directive(LevelFilter::INFO.into())
            .from_env_lossy();

        let _ = tracing_subscriber::registry()
            .with(filter)
            .with(PlannerConsoleLayer)
            .try_init();
    });
}

// Marks the start of a run for elapsed time tracking.
fn mark_run_start() {
    let epoch = EPOCH.get_or_init(Instant::now);
    let nanos = epoch.elapsed().as_nanos() as u64;
    RUN_START_NANOS.store(nanos, Ordering::Relaxed);
}

// Returns elapsed time since run start.
fn elapsed_secs() -> f64 {
    let Some(epoch) = EPOCH.get() else {
        return 0.0;
    };
    let start_nanos = RUN_START_NANOS.load(Ordering::Relaxed);
    let now_nanos = epoch.elapsed().as_nanos() as u64;
    now_nanos.saturating_sub(start_nanos) as f64 / 1_000_000_000.0
}

fn print_banner() {
    let banner = r#"
 ____             _   _____
/ ___|  ___  __ _| |_|  ___|__  _ __ __ _  ___
\___ \ / _ \/ _` | __| |_ / _ \| '__/ _` |/ _ \
 ___) |  __/ (_| | |_|  _| (_) | | | (_| |  __/
|____/ \___|\__,_|\__|_|  \___/|_|  \__, |\___|
                                    |___/
"#;

    let version_line = format!("              v{} - Seat Assignment Engine\n", VERSION);

    let mut stdout = io::stdout().lock();
    let _ = writeln!(stdout, "{}", banner.bright_cyan());
    let _ = writeln!(stdout, "{}", version_line.bright_white().bold());
    let _ = stdout.flush();
}

/// A tracing layer that formats planner events with colors.
pub struct PlannerConsoleLayer;

impl<S: Subscriber> Layer<S> for PlannerConsoleLayer {
    fn on_event(&self, event: &Event<'_>, _ctx: Context<'_, S>) {
        let metadata = event.metadata();
        if !metadata.target().starts_with("seatforge") {
            return;
        }

        let mut visitor = EventVisitor::default();
        event.record(&mut visitor);

        let output = format_event(&visitor, *metadata.level());
        if !output.is_empty() {
            let _ = writeln!(io::stdout(), "{}", output);
        }
    }
}

#[derive(Debug, Default)]
struct EventVisitor {
    event: Option<String>,
    phase: Option<String>,
    status: Option<String>,
    score: Option<String>,
    candidate: Option<String>,
    job_id: Option<String>,
    kind: Option<String>,
    code: Option<String>,
    detail: Option<String>,
    message: Option<String>,
    guests: Option<u64>,
    tables: Option<u64>,
    constraints: Option<u64>,
    changes: Option<u64>,
    time_budget_ms: Option<u64>,
    seed: Option<u64>,
    iterations: Option<u64>,
    iteration: Option<u64>,
    moves: Option<u64>,
    moves_speed: Option<u64>,
    duration_ms: Option<u64>,
    assigned: Option<u64>,
    unassigned: Option<u64>,
    affected_tables: Option<u64>,
    affected_guests: Option<u64>,
    accepted: Option<bool>,
}

impl Visit for EventVisitor {
    fn record_debug(&mut self, field: &Field, value: &dyn std::fmt::Debug) {
        let s = format!("{:?}", value).trim_matches('"').to_string();
        self.record_text(field.name(), s);
    }

    fn record_u64(&mut self, field: &Field, value: u64) {
        let slot = match field.name() {
            "guests" => &mut self.guests,
            "tables" => &mut self.tables,
            "constraints" => &mut self.constraints,
            "changes" => &mut self.changes,
            "time_budget_ms" => &mut self.time_budget_ms,
            "seed" => &mut self.seed,
            "iterations" => &mut self.iterations,
            "iteration" => &mut self.iteration,
            "moves" => &mut self.moves,
            "moves_speed" => &mut self.moves_speed,
            "duration_ms" => &mut self.duration_ms,
            "assigned" => &mut self.assigned,
            "unassigned" => &mut self.unassigned,
            "affected_tables" => &mut self.affected_tables,
            "affected_guests" => &mut self.affected_guests,
            _ => return,
        };
        *slot = Some(value);
    }

    fn record_i64(&mut self, field: &Field, value: i64) {
        self.record_u64(field, value.max(0) as u64);
    }

    fn record_bool(&mut self, field: &Field, value: bool) {
        if field.name() == "accepted" {
            self.accepted = Some(value);
        }
    }

    fn record_str(&mut self, field: &Field, value: &str) {
        self.record_text(field.name(), value.to_string());
    }
}

impl EventVisitor {
    fn record_text(&mut self, name: &str, value: String) {
        let slot = match name {
            "event" => &mut self.event,
            "phase" => &mut self.phase,
            "status" => &mut self.status,
            "score" => &mut self.score,
            "candidate" => &mut self.candidate,
            "job_id" => &mut self.job_id,
            "kind" => &mut self.kind,
            "code" => &mut self.code,
            "detail" => &mut self.detail,
            "message" => &mut self.message,
            _ => return,
        };
        *slot = Some(value);
    }
}

fn format_event(v: &EventVisitor, level: Level) -> String {
    match v.event.as_deref().unwrap_or("") {
        "solve_start" => format_run_start(v, "Planning"),
        "diff_start" => format_run_start(v, "Re-planning"),
        "solve_end" | "diff_end" => format_run_end(v),
        "phase_start" => format_phase_start(v),
        "phase_end" => format_phase_end(v),
        "new_best" => format_new_best(v),
        "move" => format_move(v, level),
        "job_submitted" | "job_finished" | "job_superseded" => format_job(v),
        "constraint_issue" => format_issue(v),
        _ if level == Level::WARN || level == Level::ERROR => format_warning(v, level),
        _ => String::new(),
    }
}

fn format_elapsed() -> String {
    format!("{:>7.3}s", elapsed_secs())
        .bright_black()
        .to_string()
}

fn count(n: u64) -> String {
    n.to_formatted_string(&Locale::en)
}

fn format_run_start(v: &EventVisitor, what: &str) -> String {
    mark_run_start();
    let mut output = format!(
        "{} {} {} │ {} guests │ {} tables",
        format_elapsed(),
        "▶".bright_green().bold(),
        what,
        count(v.guests.unwrap_or(0)).bright_yellow(),
        count(v.tables.unwrap_or(0)).bright_yellow(),
    );

    if let Some(changes) = v.changes {
        output.push_str(&format!(" │ {} changes", count(changes).bright_yellow()));
    }
    if let Some(constraints) = v.constraints.filter(|&c| c > 0) {
        output.push_str(&format!(" │ {} constraints", count(constraints).bright_yellow()));
    }
    if let Some(budget) = v.time_budget_ms.filter(|&ms| ms > 0) {
        output.push_str(&format!(
            " │ {} limit",
            format_duration_ms(budget).bright_yellow()
        ));
    }
    if let Some(seed) = v.seed {
        output.push_str(&format!(" │ seed {}", seed.bright_black()));
    }
    output
}

fn format_run_end(v: &EventVisitor) -> String {
    let score = v.score.as_deref().unwrap_or("N/A");
    let status = v.status.as_deref().unwrap_or("DONE");
    let feasible = is_feasible(score);

    let verdict = if feasible {
        "FEASIBLE".bright_green().bold().to_string()
    } else {
        "INFEASIBLE".bright_red().bold().to_string()
    };

    let mut output = format!(
        "{} {} {} │ {} │ {} │ {}",
        format_elapsed(),
        "■".bright_cyan().bold(),
        status.white().bold(),
        format_duration_ms(v.duration_ms.unwrap_or(0)).yellow(),
        format_score(score),
        verdict,
    );

    if let (Some(assigned), Some(unassigned)) = (v.assigned, v.unassigned) {
        output.push_str(&format!(" │ {} seated", count(assigned).white()));
        if unassigned > 0 {
            output.push_str(&format!(" │ {} unseated", count(unassigned).bright_red()));
        }
    }
    if let (Some(tables), Some(guests)) = (v.affected_tables, v.affected_guests) {
        output.push_str(&format!(
            " │ {} tables / {} guests affected",
            count(tables).bright_yellow(),
            count(guests).bright_yellow()
        ));
    }
    if let Some(iterations) = v.iterations {
        output.push_str(&format!(" │ {} iterations", count(iterations).white()));
    }
    if let Some(speed) = v.moves_speed.filter(|&s| s > 0) {
        output.push_str(&format!(
            " │ {} moves/s",
            count(speed).bright_magenta().bold()
        ));
    }
    output
}

fn format_phase_start(v: &EventVisitor) -> String {
    let phase = v.phase.as_deref().unwrap_or("Unknown");
    let mut output = format!(
        "{} {} {} started",
        format_elapsed(),
        "▶".bright_blue(),
        phase.white().bold()
    );
    if let (Some(guests), Some(tables)) = (v.guests, v.tables) {
        output.push_str(&format!(
            " │ {} movable guests │ {} open tables",
            count(guests),
            count(tables)
        ));
    }
    output
}

fn format_phase_end(v: &EventVisitor) -> String {
    let phase = v.phase.as_deref().unwrap_or("Unknown");
    format!(
        "{} {} {} ended │ {} │ {} iterations │ {}",
        format_elapsed(),
        "◀".bright_blue(),
        phase.white().bold(),
        v.status.as_deref().unwrap_or("-"),
        count(v.iterations.unwrap_or(0)).white(),
        format_score(v.score.as_deref().unwrap_or("N/A")),
    )
}

fn format_new_best(v: &EventVisitor) -> String {
    format!(
        "{} {} {:>10} │ {}",
        format_elapsed(),
        "★".bright_yellow(),
        count(v.iteration.unwrap_or(0)).white(),
        format_score(v.score.as_deref().unwrap_or("N/A"))
    )
}

fn format_move(v: &EventVisitor, level: Level) -> String {
    if level != Level::TRACE {
        return String::new();
    }

    let icon = if v.accepted.unwrap_or(false) {
        "✓".bright_green().to_string()
    } else {
        "✗".bright_red().to_string()
    };

    format!(
        "{} {} {:<28} │ {}",
        format_elapsed(),
        icon,
        v.candidate.as_deref().unwrap_or("").bright_black(),
        format_score(v.score.as_deref().unwrap_or("N/A")).bright_black()
    )
}

fn format_job(v: &EventVisitor) -> String {
    let event = v.event.as_deref().unwrap_or("");
    let job = v.job_id.as_deref().unwrap_or("?");
    let label = match event {
        "job_submitted" => format!("submitted ({})", v.kind.as_deref().unwrap_or("?")),
        "job_finished" => v.status.as_deref().unwrap_or("finished").to_lowercase(),
        _ => "superseded".to_string(),
    };
    format!(
        "{} {} job {} {}",
        format_elapsed(),
        "●".bright_cyan(),
        job.bright_black(),
        label.white()
    )
}

fn format_issue(v: &EventVisitor) -> String {
    format!(
        "{} {} {} {} │ {}",
        format_elapsed(),
        "!".bright_yellow().bold(),
        v.code.as_deref().unwrap_or("ISSUE").yellow(),
        v.kind.as_deref().unwrap_or(""),
        v.detail.as_deref().unwrap_or("")
    )
}

fn format_warning(v: &EventVisitor, level: Level) -> String {
    let text = v
        .message
        .as_deref()
        .or(v.event.as_deref())
        .unwrap_or("warning");
    let icon = if level == Level::ERROR {
        "✗".bright_red().bold().to_string()
    } else {
        "!".bright_yellow().bold().to_string()
    };
    format!("{} {} {}", format_elapsed(), icon, text)
}

fn format_duration_ms(ms: u64) -> String {
    if ms < 1000 {
        format!("{}ms", ms)
    } else if ms < 60_000 {
        format!("{:.2}s", ms as f64 / 1000.0)
    } else {
        let mins = ms / 60_000;
        let secs = (ms % 60_000) / 1000;
        format!("{}m {}s", mins, secs)
    }
}

// Scores print as `{hard}hard/{medium}medium/{soft}soft`.
fn is_feasible(score: &str) -> bool {
    score
        .split('/')
        .next()
        .and_then(|hard| hard.strip_suffix("hard"))
        .and_then(|hard| hard.parse::<i64>().ok())
        .is_some_and(|hard| hard >= 0)
}

fn format_score(score: &str) -> String {
    let parts: Vec<&str> = score.split('/').collect();
    let [hard, medium, soft] = parts.as_slice() else {
        return score.white().to_string();
    };
    let (Some(hard), Some(medium), Some(soft)) = (
        hard.strip_suffix("hard"),
        medium.strip_suffix("medium"),
        soft.strip_suffix("soft"),
    ) else {
        return score.white().to_string();
    };

    let hard_str = if hard.parse::<i64>().unwrap_or(0) < 0 {
        format!("{}hard", hard).bright_red().to_string()
    } else {
        format!("{}hard", hard).bright_green().to_string()
    };
    let medium_str = if medium.parse::<i64>().unwrap_or(0) < 0 {
        format!("{}medium", medium).yellow().to_string()
    } else {
        format!("{}medium", medium).bright_green().to_string()
    };
    let soft_num: f64 = soft.parse().unwrap_or(0.0);
    let soft_str = if soft_num >= 1.0 {
        format!("{}soft", soft).bright_green().to_string()
    } else {
        format!("{}soft", soft).white().to_string()
    };

    format!("{}/{}/{}", hard_str, medium_str, soft_str)
}
