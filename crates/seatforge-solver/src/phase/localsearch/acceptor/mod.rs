//! Acceptors for local search move acceptance.
//!
//! Acceptors decide whether a candidate move is kept, comparing the
//! candidate score with the current one. Both acceptors reject any move
//! that adds a hard violation.

mod hill_climbing;
mod simulated_annealing;

use std::fmt::Debug;

use seatforge_config::AcceptorConfig;
use seatforge_core::SeatScore;

pub use hill_climbing::HillClimbingAcceptor;
pub use simulated_annealing::SimulatedAnnealingAcceptor;

/// Trait for accepting or rejecting moves in local search.
pub trait Acceptor: Send + Debug {
    /// Returns true if a move leading from `current` to `candidate` should
    /// be kept. `roll` is a uniform sample in `[0, 1)` drawn from the run's
    /// generator for every candidate.
    fn is_accepted(&mut self, current: &SeatScore, candidate: &SeatScore, roll: f64) -> bool;

    /// Called when a phase starts.
    fn phase_started(&mut self) {}

    /// Called after every iteration.
    fn step_ended(&mut self) {}
}

/// Builds the acceptor described by `config`.
pub fn from_config(config: &AcceptorConfig) -> Box<dyn Acceptor> {
    match config {
        AcceptorConfig::HillClimbing => Box::new(HillClimbingAcceptor::new()),
        AcceptorConfig::SimulatedAnnealing(sa) => Box::new(SimulatedAnnealingAcceptor::new(
            sa.starting_temperature,
            sa.decay_rate,
        )),
    }
}
