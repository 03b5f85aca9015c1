//! Full-recalculation score director.

use seatforge_core::SeatScore;

use super::ScoreDirector;
use crate::scorer::Scorer;
use crate::state::AssignmentState;

/// Owns the working assignment and rescores it from scratch on demand.
pub struct SeatScoreDirector<'a> {
    scorer: Scorer<'a>,
    state: AssignmentState,
    calculation_count: u64,
}

impl<'a> SeatScoreDirector<'a> {
    pub fn new(scorer: Scorer<'a>, state: AssignmentState) -> Self {
        Self {
            scorer,
            state,
            calculation_count: 0,
        }
    }

    pub fn scorer(&self) -> &Scorer<'a> {
        &self.scorer
    }

    /// Number of score calculations performed so far.
    pub fn calculation_count(&self) -> u64 {
        self.calculation_count
    }

    pub fn into_state(self) -> AssignmentState {
        self.state
    }
}

impl ScoreDirector for SeatScoreDirector<'_> {
    fn state(&self) -> &AssignmentState {
        &self.state
    }

    fn state_mut(&mut self) -> &mut AssignmentState {
        &mut self.state
    }

    fn calculate_score(&mut self) -> SeatScore {
        self.calculation_count += 1;
        self.scorer.score(&self.state)
    }
}
