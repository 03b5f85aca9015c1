//! Solver-level scope.


use std::sync::Arc;
use std::time::Duration;

use rand::SeedableRng;
use rand_chacha::ChaCha8Rng;
use tracing::debug;

use seatforge_core::SeatScore;
use seatforge_scoring::{AssignmentState, ScoreDirector, SeatScoreDirector};

use crate::heuristic::{Neighborhood, SeatMove};
use crate::stats::RunStats;
use crate::termination::Clock;

/// Everything one run owns: the score director, the seeded random
/// generator, the clock, the best state seen and the counters.
pub struct SolverScope<'a> {
    director: SeatScoreDirector<'a>,
    rng: ChaCha8Rng,
    clock: Arc<dyn Clock>,
    start: Duration,
    poll_interval: u64,
    ticks: u64,
    best_state: Option<AssignmentState>,
    best_score: Option<SeatScore>,
    stats: RunStats,
}

impl<'a> SolverScope<'a> {
    pub fn new(
        director: SeatScoreDirector<'a>,
        seed: u64,
        clock: Arc<dyn Clock>,
        poll_interval: u64,
    ) -> Self {
        let start = clock.now();
        Self {
            director,
            rng: ChaCha8Rng::seed_from_u64(seed),
            clock,
            start,
            poll_interval: poll_interval.max(1),
            ticks: 0,
            best_state: None,
            best_score: None,
            stats: RunStats::default(),
        }
    }

    pub fn elapsed(&self) -> Duration {
        self.clock.now().saturating_sub(self.start)
    }

    pub fn director(&self) -> &SeatScoreDirector<'a> {
        &self.director
    }

    pub fn director_mut(&mut self) -> &mut SeatScoreDirector<'a> {
        &mut self.director
    }

    pub fn state(&self) -> &AssignmentState {
        self.director.state()
    }

    pub fn calculate_score(&mut self) -> SeatScore {
        self.director.calculate_score()
    }

    pub fn rng(&mut self) -> &mut ChaCha8Rng {
        &mut self.rng
    }

    /// Draws a move from `neighborhood` against the working state.
    pub fn sample_move(
        &mut self,
        neighborhood: &Neighborhood,
        swap_probability: f64,
    ) -> Option<SeatMove> {
        neighborhood.sample(self.director.state(), &mut self.rng, swap_probability)
    }

    /// Advances the poll counter by one unit of work.
    pub fn tick(&mut self) {
        self.ticks += 1;
    }

    /// Whether polled terminations should be consulted now.
    pub fn is_poll_point(&self) -> bool {
        self.ticks % self.poll_interval == 0
    }

    pub fn iterations(&self) -> u64 {
        self.stats.iterations
    }

    pub fn stats(&self) -> &RunStats {
        &self.stats
    }

    pub fn stats_mut(&mut self) -> &mut RunStats {
        &mut self.stats
    }

    pub fn best_score(&self) -> Option<SeatScore> {
        self.best_score
    }

    pub fn best_state(&self) -> Option<&AssignmentState> {
        self.best_state.as_ref()
    }

    /// Records the working state as best if it strictly improves on the
    /// best seen so far. Returns whether it did.
    pub fn update_best(&mut self, score: SeatScore) -> bool {
        let is_better = self.best_score.map_or(true, |best| score > best);
        if is_better {
            self.best_state = Some(self.director.clone_state());
            self.best_score = Some(score);
            self.stats.improvements += 1;
            debug!(
                event = "new_best",
                iteration = self.stats.iterations,
                score = %score,
            );
        }
        is_better
    }

    /// Finishes the run, returning the best state (or the working state when
    /// nothing was recorded) with its score and the final counters.
    pub fn finish(mut self) -> (AssignmentState, SeatScore, RunStats) {
        self.stats.elapsed_ms = self.elapsed().as_millis() as u64;
        let stats = self.stats;
        match (self.best_state, self.best_score) {
            (Some(state), Some(score)) => (state, score, stats),
            _ => {
                let score = self.director.calculate_score();
                (self.director.into_state(), score, stats)
            }
        }
    }
}
