//! LocalSearchPhase - randomized improvement with convergence sweeps.

use rand::Rng;
use tracing::{debug, trace};

use seatforge_core::{SeatForgeError, SeatScore};
use seatforge_scoring::{RecordingScoreDirector, ScoreDirector};

use super::Acceptor;
use crate::heuristic::{Neighborhood, SeatMove};
use crate::scope::SolverScope;
use crate::termination::{OrTermination, RunStatus, Termination};

/// Local search phase that improves the working assignment.
///
/// Each iteration samples one move from the neighborhood, applies it through
/// a [`RecordingScoreDirector`], and keeps or undoes it according to the
/// acceptor. After `stale_sweep_after` iterations without a new best score a
/// full sweep of the neighborhood is run: the first strictly improving move
/// is kept, and when there is none the phase ends as converged.
#[derive(Debug)]
pub struct LocalSearchPhase {
    neighborhood: Neighborhood,
    acceptor: Box<dyn Acceptor>,
    termination: OrTermination,
    swap_probability: f64,
    stale_sweep_after: u64,
}

impl LocalSearchPhase {
    pub fn new(
        neighborhood: Neighborhood,
        acceptor: Box<dyn Acceptor>,
        termination: OrTermination,
    ) -> Self {
        Self {
            neighborhood,
            acceptor,
            termination,
            swap_probability: 0.5,
            stale_sweep_after: 256,
        }
    }

    pub fn with_swap_probability(mut self, swap_probability: f64) -> Self {
        self.swap_probability = swap_probability;
        self
    }

    pub fn with_stale_sweep_after(mut self, iterations: u64) -> Self {
        self.stale_sweep_after = iterations.max(1);
        self
    }

    pub fn solve(&mut self, scope: &mut SolverScope<'_>) -> Result<RunStatus, SeatForgeError> {
        self.acceptor.phase_started();
        let mut current = scope.calculate_score();
        scope.update_best(current);

        debug!(
            event = "phase_start",
            phase = "Local Search",
            guests = self.neighborhood.guests().len(),
            tables = self.neighborhood.tables().len(),
            score = %current,
        );

        let mut stale = 0u64;
        let status = loop {
            if let Some(status) = self.termination.check(scope) {
                break status;
            }
            if self.neighborhood.is_empty() {
                break RunStatus::Converged;
            }

            scope.tick();
            scope.stats_mut().iterations += 1;

            if stale >= self.stale_sweep_after {
                match self.sweep(scope, &mut current)? {
                    Some(status) => break status,
                    None => {
                        stale = 0;
                        continue;
                    }
                }
            }

            let Some(candidate) = scope.sample_move(&self.neighborhood, self.swap_probability)
            else {
                stale += 1;
                self.acceptor.step_ended();
                continue;
            };
            let roll: f64 = scope.rng().random();

            match self.try_move(scope, candidate, &current, roll)? {
                Some(score) => {
                    current = score;
                    scope.stats_mut().moves_accepted += 1;
                    if scope.update_best(score) {
                        stale = 0;
                    } else {
                        stale += 1;
                    }
                }
                None => stale += 1,
            }
            self.acceptor.step_ended();
        };

        debug!(
            event = "phase_end",
            phase = "Local Search",
            status = status.as_str(),
            iterations = scope.iterations(),
            score = %scope.best_score().unwrap_or(current),
        );
        Ok(status)
    }

    // Applies the move, keeps it when accepted, undoes it otherwise.
    fn try_move(
        &mut self,
        scope: &mut SolverScope<'_>,
        candidate: SeatMove,
        current: &SeatScore,
        roll: f64,
    ) -> Result<Option<SeatScore>, SeatForgeError> {
        scope.stats_mut().moves_evaluated += 1;
        let mut recording = RecordingScoreDirector::new(scope.director_mut());
        candidate.apply(&mut recording)?;
        let score = recording.calculate_score();
        let accepted = self.acceptor.is_accepted(current, &score, roll);
        trace!(
            event = "move",
            candidate = %candidate,
            score = %score,
            accepted = accepted,
        );
        if accepted {
            recording.commit();
            Ok(Some(score))
        } else {
            recording.undo_changes();
            Ok(None)
        }
    }

    // Tries every move of the neighborhood in order. Returns `None` after
    // keeping the first strictly improving one, `Converged` when there is
    // none, or the termination status when the budget ran out mid-sweep.
    fn sweep(
        &mut self,
        scope: &mut SolverScope<'_>,
        current: &mut SeatScore,
    ) -> Result<Option<RunStatus>, SeatForgeError> {
        scope.stats_mut().sweeps += 1;
        let moves = self.neighborhood.sweep(scope.state());
        debug!(event = "sweep", moves = moves.len(), score = %current);

        for candidate in moves {
            scope.tick();
            if let Some(status) = self.termination.check(scope) {
                return Ok(Some(status));
            }
            scope.stats_mut().moves_evaluated += 1;
            let mut recording = RecordingScoreDirector::new(scope.director_mut());
            candidate.apply(&mut recording)?;
            let score = recording.calculate_score();
            if score > *current {
                recording.commit();
                *current = score;
                scope.stats_mut().moves_accepted += 1;
                scope.update_best(score);
                return Ok(None);
            }
            recording.undo_changes();
        }
        Ok(Some(RunStatus::Converged))
    }
}
