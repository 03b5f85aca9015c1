//! Time-based termination.

use std::time::Duration;

use super::{Budget, RunStatus, Termination};
use crate::scope::SolverScope;

/// Terminates after a wall-clock budget, measured on the scope's clock.
///
/// # Example
///
/// ```
/// use seatforge_solver::termination::TimeTermination;
///
/// let term = TimeTermination::millis(500);
/// ```
#[derive(Debug, Clone)]
pub struct TimeTermination {
    limit: Duration,
}

impl TimeTermination {
    pub fn new(limit: Duration) -> Self {
        Self { limit }
    }

    pub fn millis(ms: u64) -> Self {
        Self::new(Duration::from_millis(ms))
    }
}

impl Termination for TimeTermination {
    fn check(&self, scope: &SolverScope<'_>) -> Option<RunStatus> {
        (scope.elapsed() >= self.limit).then_some(RunStatus::BudgetExhausted(Budget::Time))
    }

    fn is_polled(&self) -> bool {
        true
    }
}
