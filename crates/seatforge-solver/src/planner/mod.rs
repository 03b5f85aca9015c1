//! Planner - generation, diff and validation runs over a plan input.
//!
//! A run resolves the input into a [`SeatingProblem`], compiles the
//! constraints, seeds a state from locks and prior records, fills the
//! remaining seats greedily and improves the result with local search.

mod diff;
mod outcome;

#[cfg(test)]
mod tests;

use std::sync::atomic::AtomicBool;
use std::sync::Arc;

use tracing::{debug, info, warn};

use seatforge_config::PlannerConfig;
use seatforge_core::{
    ConstraintKind, ConstraintSet, GenerateRequest, GuestId, PlanInput, SeatForgeError, SeatPin,
    SeatingProblem,
};
use seatforge_scoring::{AssignmentState, Scorer, Seat, SeatScoreDirector};

use crate::heuristic::Neighborhood;
use crate::phase::construction::GreedyFill;
use crate::phase::localsearch::{acceptor, LocalSearchPhase};
use crate::scope::SolverScope;
use crate::termination::{
    Clock, ExternalTermination, OrTermination, RunStatus, StepCountTermination, SystemClock,
    TimeTermination,
};

pub use outcome::{ConstraintReport, DiffOutcome, PlanOutcome, ValidationReport};

/// Limits and seed of one run, after request values override config.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
struct RunBudget {
    max_iterations: u64,
    time_budget_ms: u64,
    seed: u64,
}

/// Runs seat planning jobs with one configuration.
///
/// # Example
///
/// ```
/// use seatforge_core::{GenerateRequest, Guest, PlanInput, Table};
/// use seatforge_solver::Planner;
///
/// let input = PlanInput::new(
///     vec![Guest::new("ann"), Guest::new("bob")],
///     vec![Table::new("t1", 4)],
/// );
/// let outcome = Planner::default()
///     .generate(&input, &GenerateRequest::default().with_seed(7))
///     .unwrap();
///
/// assert!(outcome.summary.hard_satisfied);
/// assert_eq!(outcome.assignments.len(), 2);
/// assert!(outcome.unassigned.is_empty());
/// ```
#[derive(Debug, Clone)]
pub struct Planner {
    config: PlannerConfig,
    clock: Arc<dyn Clock>,
}

impl Default for Planner {
    fn default() -> Self {
        Self::new(PlannerConfig::default())
    }
}

impl Planner {
    pub fn new(config: PlannerConfig) -> Self {
        Self {
            config,
            clock: Arc::new(SystemClock::new()),
        }
    }

    /// Replaces the wall clock used for time budgets.
    pub fn with_clock(mut self, clock: Arc<dyn Clock>) -> Self {
        self.clock = clock;
        self
    }

    pub fn config(&self) -> &PlannerConfig {
        &self.config
    }

    pub fn generate(
        &self,
        input: &PlanInput,
        request: &GenerateRequest,
    ) -> Result<PlanOutcome, SeatForgeError> {
        self.generate_with_cancel(input, request, Arc::new(AtomicBool::new(false)))
    }

    /// Like [`generate`](Self::generate), stopping early with
    /// [`RunStatus::Cancelled`] once `cancel` is set.
    pub fn generate_with_cancel(
        &self,
        input: &PlanInput,
        request: &GenerateRequest,
        cancel: Arc<AtomicBool>,
    ) -> Result<PlanOutcome, SeatForgeError> {
        let budget = RunBudget {
            max_iterations: request.max_iterations,
            time_budget_ms: request.time_budget_ms,
            seed: request.seed.unwrap_or_else(|| self.config.seed()),
        };
        info!(
            event = "solve_start",
            guests = input.guests.len(),
            tables = input.tables.len(),
            constraints = input.constraints.len(),
            respect_locks = request.respect_locks,
            max_iterations = budget.max_iterations,
            time_budget_ms = budget.time_budget_ms,
            seed = budget.seed,
        );

        let prepared = Prepared::new(input, request.respect_locks)?;
        let state = prepared.initial_state(request.respect_locks, request.respect_locks)?;
        let scorer = Scorer::new(&prepared.problem, &prepared.constraints);
        let mut scope = self.scope(scorer, state, budget.seed);

        let unseated = scope.state().unassigned();
        GreedyFill::new(unseated, prepared.all_tables()).run(&mut scope)?;

        let neighborhood = Neighborhood::full(scope.state());
        let status = self
            .local_search(neighborhood, &budget, cancel)
            .solve(&mut scope)?;
        let outcome = prepared.outcome(scorer, scope, status);

        info!(
            event = "solve_end",
            status = outcome.termination.as_str(),
            score = %outcome.score,
            assigned = outcome.assignments.len(),
            unassigned = outcome.unassigned.len(),
            iterations = outcome.stats.iterations,
            moves_evaluated = outcome.stats.moves_evaluated,
            moves_speed = outcome.stats.speed(),
            duration_ms = outcome.stats.elapsed_ms,
        );
        Ok(outcome)
    }

    /// Scores the plan as given: prior records are kept, nobody is moved.
    pub fn validate(&self, input: &PlanInput) -> Result<ValidationReport, SeatForgeError> {
        let prepared = Prepared::new(input, true)?;
        let state = prepared.initial_state(true, true)?;
        let scorer = Scorer::new(&prepared.problem, &prepared.constraints);
        Ok(ValidationReport {
            issues: prepared.constraints.issues().to_vec(),
            score: scorer.score(&state),
            summary: scorer.summary(&state),
            unassigned: prepared.guest_ids(&state.unassigned()),
            constraints: scorer
                .analyze(&state)
                .into_iter()
                .map(ConstraintReport::from)
                .collect(),
        })
    }

    fn scope<'a>(&self, scorer: Scorer<'a>, state: AssignmentState, seed: u64) -> SolverScope<'a> {
        SolverScope::new(
            SeatScoreDirector::new(scorer, state),
            seed,
            self.clock.clone(),
            self.config.termination.poll_interval,
        )
    }

    fn local_search(
        &self,
        neighborhood: Neighborhood,
        budget: &RunBudget,
        cancel: Arc<AtomicBool>,
    ) -> LocalSearchPhase {
        let termination = OrTermination::new()
            .with(StepCountTermination::new(budget.max_iterations))
            .with(TimeTermination::millis(budget.time_budget_ms))
            .with(ExternalTermination::new(cancel));
        LocalSearchPhase::new(
            neighborhood,
            acceptor::from_config(&self.config.acceptor),
            termination,
        )
        .with_swap_probability(self.config.moves.swap_probability)
        .with_stale_sweep_after(self.config.termination.stale_sweep_after)
    }
}

/// A prior seat record resolved against the problem.
#[derive(Debug, Clone, Copy)]
struct PriorSeat {
    guest: usize,
    seat: Seat,
    locked: bool,
}

/// A plan input resolved for one run.
#[derive(Debug)]
struct Prepared {
    problem: SeatingProblem,
    constraints: ConstraintSet,
    records: Vec<PriorSeat>,
    /// Guests whose prior seat no longer exists.
    displaced: Vec<usize>,
    /// Guests whose locked record became a pin.
    locked_guests: Vec<usize>,
}

impl Prepared {
    fn new(input: &PlanInput, respect_locks: bool) -> Result<Self, SeatForgeError> {
        let problem = SeatingProblem::new(input.guests.clone(), input.tables.clone())?;

        let mut records = Vec::with_capacity(input.assignments.len());
        let mut displaced = Vec::new();
        for record in &input.assignments {
            let (Some(guest), Some(table)) = (
                problem.guest_idx(record.guest_id.as_str()),
                problem.table_idx(record.table_id.as_str()),
            ) else {
                warn!(
                    event = "stale_record",
                    guest = %record.guest_id,
                    table = %record.table_id,
                );
                continue;
            };
            if record.seat_index >= problem.capacity(table) {
                debug!(
                    event = "displaced_record",
                    guest = %record.guest_id,
                    table = %record.table_id,
                    seat = record.seat_index,
                );
                displaced.push(guest);
                continue;
            }
            records.push(PriorSeat {
                guest,
                seat: Seat::new(table, record.seat_index),
                locked: record.locked,
            });
        }

        let pins: Vec<SeatPin> = if respect_locks {
            records
                .iter()
                .filter(|r| r.locked || problem.table(r.seat.table).locked)
                .map(|r| SeatPin::new(r.guest, r.seat.table, r.seat.index))
                .collect()
        } else {
            Vec::new()
        };

        let constraints = ConstraintSet::compile(&problem, &input.constraints, &pins);
        for issue in constraints.issues() {
            warn!(
                event = "constraint_issue",
                code = %issue.code,
                kind = %issue.kind,
                index = issue.index,
                detail = %issue.detail,
            );
        }
        if !Scorer::new(&problem, &constraints).positions_complete()
            && constraints.kinds().contains(&ConstraintKind::MaxDistance)
        {
            warn!(
                event = "positions_incomplete",
                "MAX_DISTANCE rules are skipped: not every table has a position"
            );
        }

        let locked_guests = if respect_locks {
            records
                .iter()
                .filter(|r| r.locked && constraints.pins().iter().any(|p| p.guest == r.guest))
                .map(|r| r.guest)
                .collect()
        } else {
            Vec::new()
        };

        Ok(Self {
            problem,
            constraints,
            records,
            displaced,
            locked_guests,
        })
    }

    /// Pins every locked seat, then optionally replays prior records and
    /// freezes locked tables.
    fn initial_state(
        &self,
        keep_records: bool,
        lock_tables: bool,
    ) -> Result<AssignmentState, SeatForgeError> {
        let mut state = AssignmentState::new(&self.problem);
        for pin in self.constraints.pins() {
            state.pin(pin.guest, Seat::new(pin.table, pin.seat))?;
        }

        if keep_records {
            for prior in &self.records {
                if state.seat_of(prior.guest).is_some() || state.occupant(prior.seat).is_some() {
                    debug!(
                        event = "record_skipped",
                        guest = %self.problem.guest(prior.guest).id,
                        seat = %prior.seat,
                    );
                    continue;
                }
                state.place(prior.guest, prior.seat)?;
            }
        }

        if lock_tables {
            for (idx, table) in self.problem.tables().iter().enumerate() {
                if table.locked {
                    state.lock_table(idx)?;
                }
            }
        }
        Ok(state)
    }

    fn all_tables(&self) -> Vec<usize> {
        (0..self.problem.table_count()).collect()
    }

    fn guest_ids(&self, guests: &[usize]) -> Vec<GuestId> {
        guests
            .iter()
            .map(|&g| self.problem.guest(g).id.clone())
            .collect()
    }

    fn outcome(&self, scorer: Scorer<'_>, scope: SolverScope<'_>, status: RunStatus) -> PlanOutcome {
        let (state, score, stats) = scope.finish();
        PlanOutcome {
            assignments: state.records(&self.problem, &self.locked_guests),
            unassigned: self.guest_ids(&state.unassigned()),
            summary: scorer.summary(&state),
            score,
            termination: status,
            stats,
            issues: self.constraints.issues().to_vec(),
        }
    }
}
