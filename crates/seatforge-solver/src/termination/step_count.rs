//! Iteration-count termination.

use super::{Budget, RunStatus, Termination};
use crate::scope::SolverScope;

/// Terminates once the scope has run `limit` iterations.
#[derive(Debug, Clone)]
pub struct StepCountTermination {
    limit: u64,
}

impl StepCountTermination {
    pub fn new(limit: u64) -> Self {
        Self { limit }
    }
}

impl Termination for StepCountTermination {
    fn check(&self, scope: &SolverScope<'_>) -> Option<RunStatus> {
        (scope.iterations() >= self.limit).then_some(RunStatus::BudgetExhausted(Budget::Iterations))
    }
}
