//! External termination via AtomicBool flag.

use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;

use super::{RunStatus, Termination};
use crate::scope::SolverScope;

/// Terminates when an external flag is set, reporting the run as cancelled.
///
/// # Example
///
/// ```
/// use std::sync::atomic::{AtomicBool, Ordering};
/// use std::sync::Arc;
/// use seatforge_solver::termination::ExternalTermination;
///
/// let flag = Arc::new(AtomicBool::new(false));
/// let term = ExternalTermination::new(flag.clone());
///
/// // Later, from another thread:
/// flag.store(true, Ordering::SeqCst);
/// ```
#[derive(Debug, Clone)]
pub struct ExternalTermination {
    flag: Arc<AtomicBool>,
}

impl ExternalTermination {
    pub fn new(flag: Arc<AtomicBool>) -> Self {
        Self { flag }
    }
}

impl Termination for ExternalTermination {
    fn check(&self, _scope: &SolverScope<'_>) -> Option<RunStatus> {
        self.flag
            .load(Ordering::Relaxed)
            .then_some(RunStatus::Cancelled)
    }

    fn is_polled(&self) -> bool {
        true
    }
}
