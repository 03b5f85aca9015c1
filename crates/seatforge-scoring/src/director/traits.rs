// Score director trait definition.

use seatforge_core::{SeatScore, StateError};

use crate::state::{AssignmentState, Seat};

// The score director owns the working assignment of a run and scores it.
//
// All seat mutations go through the director so wrappers can observe them
// (see `RecordingScoreDirector`).
pub trait ScoreDirector: Send {
    // Returns the working assignment.
    fn state(&self) -> &AssignmentState;

    // Returns the working assignment for unchecked restoration.
    fn state_mut(&mut self) -> &mut AssignmentState;

    // Calculates and returns the score of the working assignment.
    fn calculate_score(&mut self) -> SeatScore;

    fn place(&mut self, guest: usize, seat: Seat) -> Result<(), StateError> {
        self.state_mut().place(guest, seat)
    }

    fn remove(&mut self, guest: usize) -> Result<Option<Seat>, StateError> {
        self.state_mut().remove(guest)
    }

    fn swap(&mut self, a: usize, b: usize) -> Result<(), StateError> {
        self.state_mut().swap(a, b)
    }

    // Clones the working assignment.
    fn clone_state(&self) -> AssignmentState {
        self.state().clone()
    }
}
