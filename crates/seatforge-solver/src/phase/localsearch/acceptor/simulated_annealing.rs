//! Simulated annealing acceptor.

use seatforge_core::SeatScore;

use super::Acceptor;

/// Simulated annealing acceptor - accepts soft-worsening moves with a
/// temperature-based probability.
///
/// Improving moves are always accepted. Moves that add a hard violation or
/// unseat a guest are never accepted. A move that only lowers (or keeps) the
/// soft score by `delta` is accepted with probability
/// `min(T, 1) * exp(-delta / T)`, where the temperature `T` is multiplied by
/// `decay_rate` after every iteration.
///
/// # Example
///
/// ```
/// use seatforge_solver::phase::localsearch::SimulatedAnnealingAcceptor;
///
/// let acceptor = SimulatedAnnealingAcceptor::new(0.1, 0.998);
/// ```
#[derive(Debug, Clone)]
pub struct SimulatedAnnealingAcceptor {
    starting_temperature: f64,
    current_temperature: f64,
    decay_rate: f64,
}

impl SimulatedAnnealingAcceptor {
    pub fn new(starting_temperature: f64, decay_rate: f64) -> Self {
        Self {
            starting_temperature,
            current_temperature: starting_temperature,
            decay_rate,
        }
    }

    pub fn temperature(&self) -> f64 {
        self.current_temperature
    }

    fn acceptance_probability(&self, delta: f64) -> f64 {
        let t = self.current_temperature;
        if t <= f64::EPSILON {
            return 0.0;
        }
        t.min(1.0) * (-delta / t).exp()
    }
}

impl Default for SimulatedAnnealingAcceptor {
    fn default() -> Self {
        Self::new(0.1, 0.998)
    }
}

impl Acceptor for SimulatedAnnealingAcceptor {
    fn is_accepted(&mut self, current: &SeatScore, candidate: &SeatScore, roll: f64) -> bool {
        if candidate.hard() < current.hard() {
            return false;
        }
        if candidate > current {
            return true;
        }
        if candidate.medium() < current.medium() {
            return false;
        }
        let delta = (current.soft() - candidate.soft()).max(0.0);
        roll < self.acceptance_probability(delta)
    }

    fn phase_started(&mut self) {
        self.current_temperature = self.starting_temperature;
    }

    fn step_ended(&mut self) {
        self.current_temperature *= self.decay_rate;
    }
}
