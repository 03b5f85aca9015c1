//! Diff runs: re-optimize only what a list of changes touches.
//!
//! Changes are folded into the input first. The committed records are then
//! replayed, and the affected set is grown from the changes:
//!
//! ```text
//! added / displaced guests, unseated  ─┐
//! guests when seats were freed,         │
//! resized tables, tables of removed     ├─> greedy fill ─> tables of seated
//! guests, changed constraint targets   ─┘     affected guests ─> closure over
//!                                             SAME_TABLE / GROUP_TOGETHER
//! ```
//!
//! Local search then moves only the affected guests, onto any table that is
//! not locked. Tables they end up at join the affected tables.

use std::sync::atomic::AtomicBool;
use std::sync::Arc;

use tracing::{debug, info, warn};

use seatforge_core::{
    Change, ConstraintSet, DiffRequest, GuestId, PlanInput, SeatForgeError, SeatingProblem,
    TableId,
};
use seatforge_scoring::{AssignmentState, Scorer};

use super::{DiffOutcome, Planner, Prepared, RunBudget};
use crate::heuristic::Neighborhood;
use crate::phase::construction::GreedyFill;

impl Planner {
    pub fn diff(
        &self,
        input: &PlanInput,
        request: &DiffRequest,
    ) -> Result<DiffOutcome, SeatForgeError> {
        self.diff_with_cancel(input, request, Arc::new(AtomicBool::new(false)))
    }

    /// Re-optimizes the committed plan in `input` after `request.changes`.
    ///
    /// `input` holds the current guests, tables and constraints together
    /// with the committed seat records. Guests outside the affected set keep
    /// their seats.
    pub fn diff_with_cancel(
        &self,
        input: &PlanInput,
        request: &DiffRequest,
        cancel: Arc<AtomicBool>,
    ) -> Result<DiffOutcome, SeatForgeError> {
        let budget = RunBudget {
            max_iterations: request
                .max_iterations
                .unwrap_or(self.config.termination.max_iterations),
            time_budget_ms: request
                .time_budget_ms
                .unwrap_or(self.config.termination.time_budget_ms),
            seed: request.seed.unwrap_or_else(|| self.config.seed()),
        };
        info!(
            event = "diff_start",
            changes = request.changes.len(),
            guests = input.guests.len(),
            tables = input.tables.len(),
            respect_locks = request.respect_locks,
            seed = budget.seed,
        );

        let applied = AppliedChanges::apply(input, &request.changes);
        let prepared = Prepared::new(&applied.input, request.respect_locks)?;
        let state = prepared.initial_state(true, request.respect_locks)?;
        let problem = &prepared.problem;

        let mut affected = AffectedSet::new(problem);
        for id in &applied.added {
            affected.add_guest_id(problem, id);
        }
        for &guest in &prepared.displaced {
            affected.add_guest(guest);
        }
        if applied.frees_seats {
            for guest in state.unassigned() {
                affected.add_guest(guest);
            }
        }
        for id in applied.resized_tables.iter().chain(&applied.freed_tables) {
            affected.add_table_id(problem, id);
        }
        for constraint_id in &applied.updated_constraints {
            affected.add_constraint_targets(&applied.input, problem, constraint_id);
        }

        let scorer = Scorer::new(problem, &prepared.constraints);
        let mut scope = self.scope(scorer, state, budget.seed);

        let unseated: Vec<usize> = affected
            .guests()
            .into_iter()
            .filter(|&g| scope.state().seat_of(g).is_none())
            .collect();
        GreedyFill::new(unseated, prepared.all_tables()).run(&mut scope)?;

        affected.add_seated_tables(scope.state());
        affected.close_over_groups(&prepared.constraints, scope.state());

        let neighborhood =
            Neighborhood::new(scope.state(), affected.guests(), prepared.all_tables());
        let status = self
            .local_search(neighborhood, &budget, cancel)
            .solve(&mut scope)?;
        affected.add_seated_tables(scope.best_state().unwrap_or(scope.state()));

        let affected_tables: Vec<TableId> = affected
            .tables()
            .into_iter()
            .map(|t| problem.table(t).id.clone())
            .collect();
        let mut affected_guests = prepared.guest_ids(&affected.guests());
        affected_guests.extend(applied.removed.iter().cloned());

        let plan = prepared.outcome(scorer, scope, status);
        info!(
            event = "diff_end",
            status = plan.termination.as_str(),
            score = %plan.score,
            affected_tables = affected_tables.len(),
            affected_guests = affected_guests.len(),
            iterations = plan.stats.iterations,
            duration_ms = plan.stats.elapsed_ms,
        );

        Ok(DiffOutcome {
            affected_tables,
            affected_guests,
            plan,
        })
    }
}

/// The input after applying a change list, with what the changes touched.
#[derive(Debug)]
struct AppliedChanges {
    input: PlanInput,
    added: Vec<GuestId>,
    removed: Vec<GuestId>,
    /// Tables that held a removed guest.
    freed_tables: Vec<TableId>,
    resized_tables: Vec<TableId>,
    updated_constraints: Vec<String>,
    /// A guest left a seat or a table grew.
    frees_seats: bool,
}

fn push_unique<T: PartialEq>(items: &mut Vec<T>, item: T) {
    if !items.contains(&item) {
        items.push(item);
    }
}

impl AppliedChanges {
    fn apply(input: &PlanInput, changes: &[Change]) -> Self {
        let mut applied = Self {
            input: input.clone(),
            added: Vec::new(),
            removed: Vec::new(),
            freed_tables: Vec::new(),
            resized_tables: Vec::new(),
            updated_constraints: Vec::new(),
            frees_seats: false,
        };

        for change in changes {
            match change {
                Change::AddGuest { guest_id } => {
                    if applied.input.guests.iter().any(|g| &g.id == guest_id) {
                        push_unique(&mut applied.added, guest_id.clone());
                    } else {
                        warn!(event = "unknown_change_target", kind = "ADD_GUEST", guest = %guest_id);
                    }
                }
                Change::RemoveGuest { guest_id } => {
                    let input = &mut applied.input;
                    for record in input.assignments.iter().filter(|r| &r.guest_id == guest_id) {
                        push_unique(&mut applied.freed_tables, record.table_id.clone());
                        applied.frees_seats = true;
                    }
                    input.assignments.retain(|r| &r.guest_id != guest_id);
                    input.guests.retain(|g| &g.id != guest_id);
                    applied.added.retain(|g| g != guest_id);
                    push_unique(&mut applied.removed, guest_id.clone());
                }
                Change::TableCapacity { table_id, capacity } => {
                    match applied.input.tables.iter_mut().find(|t| &t.id == table_id) {
                        Some(table) => {
                            applied.frees_seats |= *capacity > table.capacity;
                            table.capacity = *capacity;
                            push_unique(&mut applied.resized_tables, table_id.clone());
                        }
                        None => {
                            warn!(event = "unknown_change_target", kind = "TABLE_CAPACITY", table = %table_id);
                        }
                    }
                }
                Change::ConstraintUpdate { constraint_id } => {
                    push_unique(&mut applied.updated_constraints, constraint_id.clone());
                }
            }
        }
        applied
    }
}

/// Guests and tables eligible for re-optimization, by problem index.
#[derive(Debug)]
struct AffectedSet {
    guests: Vec<bool>,
    tables: Vec<bool>,
}

impl AffectedSet {
    fn new(problem: &SeatingProblem) -> Self {
        Self {
            guests: vec![false; problem.guest_count()],
            tables: vec![false; problem.table_count()],
        }
    }

    /// Returns whether the guest was newly added.
    fn add_guest(&mut self, guest: usize) -> bool {
        !std::mem::replace(&mut self.guests[guest], true)
    }

    fn add_table(&mut self, table: usize) -> bool {
        !std::mem::replace(&mut self.tables[table], true)
    }

    fn add_guest_id(&mut self, problem: &SeatingProblem, id: &GuestId) {
        if let Some(guest) = problem.guest_idx(id.as_str()) {
            self.add_guest(guest);
        }
    }

    fn add_table_id(&mut self, problem: &SeatingProblem, id: &TableId) {
        if let Some(table) = problem.table_idx(id.as_str()) {
            self.add_table(table);
        }
    }

    // A deleted constraint has no remaining targets; its former members are
    // only affected through other changes.
    fn add_constraint_targets(
        &mut self,
        input: &PlanInput,
        problem: &SeatingProblem,
        constraint_id: &str,
    ) {
        let mut found = false;
        for entry in input
            .constraints
            .iter()
            .filter(|e| e.id.as_deref() == Some(constraint_id))
        {
            found = true;
            let refs = entry.constraint.references(problem);
            for guest in refs.guests {
                self.add_guest(guest);
            }
            for table in refs.tables {
                self.add_table(table);
            }
        }
        if !found {
            debug!(event = "constraint_removed", id = constraint_id);
        }
    }

    fn add_seated_tables(&mut self, state: &AssignmentState) {
        for guest in self.guests() {
            if let Some(table) = state.table_of(guest) {
                self.add_table(table);
            }
        }
    }

    /// Pulls in every member of a grouping rule that has a member affected
    /// or seated at an affected table, until nothing changes.
    fn close_over_groups(&mut self, constraints: &ConstraintSet, state: &AssignmentState) {
        let groups: Vec<Vec<usize>> = constraints
            .constraints()
            .iter()
            .filter(|c| c.kind().is_grouping())
            .map(|c| c.rule.guests())
            .collect();

        loop {
            let mut changed = false;
            for members in &groups {
                let touched = members.iter().any(|&g| {
                    self.guests[g] || state.table_of(g).is_some_and(|t| self.tables[t])
                });
                if !touched {
                    continue;
                }
                for &guest in members {
                    changed |= self.add_guest(guest);
                    if let Some(table) = state.table_of(guest) {
                        changed |= self.add_table(table);
                    }
                }
            }
            if !changed {
                break;
            }
        }
    }

    fn guests(&self) -> Vec<usize> {
        indices(&self.guests)
    }

    fn tables(&self) -> Vec<usize> {
        indices(&self.tables)
    }
}

fn indices(flags: &[bool]) -> Vec<usize> {
    flags
        .iter()
        .enumerate()
        .filter_map(|(i, &set)| set.then_some(i))
        .collect()
}
