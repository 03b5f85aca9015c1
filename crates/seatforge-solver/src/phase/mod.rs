//! Solver phases.
//!
//! A run is a [`construction::GreedyFill`] that seats everyone it can,
//! followed by a [`localsearch::LocalSearchPhase`] that improves the result.

pub mod construction;
pub mod localsearch;

#[cfg(test)]
mod tests;
