//! Termination conditions for a run.
//!
//! Iteration limits are checked before every iteration. Wall-clock and
//! cancellation checks are "polled": they only run at poll points (every
//! `poll_interval` ticks of the scope), which keeps clock reads off the hot
//! path and makes the time budget a soft deadline.

mod clock;
mod composite;
mod external;
mod step_count;
mod time;

use std::fmt::Debug;

use serde::{Deserialize, Serialize};

use crate::scope::SolverScope;

pub use clock::{Clock, ManualClock, SystemClock};
pub use composite::OrTermination;
pub use external::ExternalTermination;
pub use step_count::StepCountTermination;
pub use time::TimeTermination;

/// Which budget ran out.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum Budget {
    Iterations,
    Time,
}

/// How a run ended.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(
    tag = "status",
    content = "budget",
    rename_all = "SCREAMING_SNAKE_CASE"
)]
pub enum RunStatus {
    /// A full neighbor sweep found no improving move.
    Converged,
    BudgetExhausted(Budget),
    /// The caller asked the run to stop.
    Cancelled,
}

impl RunStatus {
    pub fn as_str(self) -> &'static str {
        match self {
            RunStatus::Converged => "CONVERGED",
            RunStatus::BudgetExhausted(_) => "BUDGET_EXHAUSTED",
            RunStatus::Cancelled => "CANCELLED",
        }
    }

    pub fn is_cancelled(self) -> bool {
        self == RunStatus::Cancelled
    }
}

/// Trait for determining when to stop a run.
pub trait Termination: Send + Debug {
    /// Returns the reason to stop, if any.
    fn check(&self, scope: &SolverScope<'_>) -> Option<RunStatus>;

    /// Whether this termination is only checked at poll points.
    fn is_polled(&self) -> bool {
        false
    }
}
