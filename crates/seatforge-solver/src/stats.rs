//! Run statistics.

use serde::{Deserialize, Serialize};

/// Counters collected over one run.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct RunStats {
    /// Local-search iterations, sampled or not.
    pub iterations: u64,
    /// Candidate moves applied and scored.
    pub moves_evaluated: u64,
    pub moves_accepted: u64,
    /// Times a new best score was recorded.
    pub improvements: u64,
    /// Full neighbor sweeps run.
    pub sweeps: u64,
    /// Guests seated by the greedy fill.
    pub greedy_placements: u64,
    pub elapsed_ms: u64,
}

impl RunStats {
    /// Evaluated moves per second.
    pub fn speed(&self) -> u64 {
        if self.elapsed_ms == 0 {
            0
        } else {
            self.moves_evaluated * 1000 / self.elapsed_ms
        }
    }
}
