//! Composite termination.

use super::{RunStatus, Termination};
use crate::scope::SolverScope;

/// Terminates when any child terminates; the first child to fire, in
/// insertion order, gives the status.
///
/// Polled children are only consulted at poll points.
#[derive(Debug, Default)]
pub struct OrTermination {
    terminations: Vec<Box<dyn Termination>>,
}

impl OrTermination {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with(mut self, termination: impl Termination + 'static) -> Self {
        self.terminations.push(Box::new(termination));
        self
    }

    pub fn len(&self) -> usize {
        self.terminations.len()
    }

    pub fn is_empty(&self) -> bool {
        self.terminations.is_empty()
    }
}

impl Termination for OrTermination {
    fn check(&self, scope: &SolverScope<'_>) -> Option<RunStatus> {
        let at_poll_point = scope.is_poll_point();
        self.terminations
            .iter()
            .filter(|t| at_poll_point || !t.is_polled())
            .find_map(|t| t.check(scope))
    }
}
