//! Hill climbing acceptor.

use seatforge_core::SeatScore;

use super::Acceptor;

/// Hill climbing acceptor - accepts only strictly improving moves.
///
/// # Example
///
/// ```
/// use seatforge_core::SeatScore;
/// use seatforge_solver::phase::localsearch::{Acceptor, HillClimbingAcceptor};
///
/// let mut acceptor = HillClimbingAcceptor::new();
/// let current = SeatScore::of(0, 0, 0.5);
/// assert!(acceptor.is_accepted(&current, &SeatScore::of(0, 0, 0.6), 0.0));
/// assert!(!acceptor.is_accepted(&current, &current, 0.0));
/// ```
#[derive(Debug, Clone, Default)]
pub struct HillClimbingAcceptor;

impl HillClimbingAcceptor {
    pub fn new() -> Self {
        Self
    }
}

impl Acceptor for HillClimbingAcceptor {
    fn is_accepted(&mut self, current: &SeatScore, candidate: &SeatScore, _roll: f64) -> bool {
        candidate > current
    }
}
