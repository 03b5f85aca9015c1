//! Local search phase.

pub mod acceptor;
mod phase;

pub use acceptor::{Acceptor, HillClimbingAcceptor, SimulatedAnnealingAcceptor};
pub use phase::LocalSearchPhase;
