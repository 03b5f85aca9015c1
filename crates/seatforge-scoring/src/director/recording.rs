// Recording score director for move undo.
//
// The `RecordingScoreDirector` wraps an existing score director and records
// the first position each touched guest held before a mutation:
//
// ```text
// let mut recording = RecordingScoreDirector::new(&mut inner);
// recording.swap(a, b)?;               // records a and b
// let score = recording.calculate_score();
// recording.undo_changes();            // restores a and b
// ```

use seatforge_core::{SeatScore, StateError};

use super::ScoreDirector;
use crate::state::{AssignmentState, Seat};

/// Score director wrapper with an undo log of guest positions.
///
/// # Example
///
/// ```
/// use seatforge_core::{ConstraintSet, Guest, SeatingProblem, Table};
/// use seatforge_scoring::{
///     AssignmentState, RecordingScoreDirector, ScoreDirector, Scorer, Seat, SeatScoreDirector,
/// };
///
/// let problem = SeatingProblem::new(
///     vec![Guest::new("g1"), Guest::new("g2")],
///     vec![Table::new("t1", 1), Table::new("t2", 1)],
/// ).unwrap();
/// let constraints = ConstraintSet::compile(&problem, &[], &[]);
/// let mut state = AssignmentState::new(&problem);
/// state.place(0, Seat::new(0, 0)).unwrap();
///
/// let mut director = SeatScoreDirector::new(Scorer::new(&problem, &constraints), state);
/// let before = director.calculate_score();
///
/// let mut recording = RecordingScoreDirector::new(&mut director);
/// recording.place(1, Seat::new(1, 0)).unwrap();
/// assert!(recording.calculate_score() > before);
///
/// recording.undo_changes();
/// assert_eq!(director.state().seat_of(1), None);
/// ```
pub struct RecordingScoreDirector<'a> {
    inner: &'a mut dyn ScoreDirector,
    undo_log: Vec<(usize, Option<Seat>)>,
}

impl<'a> RecordingScoreDirector<'a> {
    pub fn new(inner: &'a mut dyn ScoreDirector) -> Self {
        Self {
            inner,
            undo_log: Vec::with_capacity(4),
        }
    }

    fn record(&mut self, guest: usize) {
        if self.undo_log.iter().any(|&(g, _)| g == guest) {
            return;
        }
        let seat = self.inner.state().seat_of(guest);
        self.undo_log.push((guest, seat));
    }

    /// Puts every touched guest back where it was before the first
    /// recorded mutation.
    pub fn undo_changes(&mut self) {
        let log = std::mem::take(&mut self.undo_log);
        self.inner.state_mut().restore(&log);
    }

    /// Forgets the recorded positions, keeping the changes.
    pub fn commit(&mut self) {
        self.undo_log.clear();
    }

    pub fn change_count(&self) -> usize {
        self.undo_log.len()
    }

    pub fn is_empty(&self) -> bool {
        self.undo_log.is_empty()
    }
}

impl ScoreDirector for RecordingScoreDirector<'_> {
    fn state(&self) -> &AssignmentState {
        self.inner.state()
    }

    fn state_mut(&mut self) -> &mut AssignmentState {
        self.inner.state_mut()
    }

    fn calculate_score(&mut self) -> SeatScore {
        self.inner.calculate_score()
    }

    fn place(&mut self, guest: usize, seat: Seat) -> Result<(), StateError> {
        self.record(guest);
        if let Some(occupant) = self.inner.state().occupant(seat) {
            self.record(occupant);
        }
        self.inner.place(guest, seat)
    }

    fn remove(&mut self, guest: usize) -> Result<Option<Seat>, StateError> {
        self.record(guest);
        self.inner.remove(guest)
    }

    fn swap(&mut self, a: usize, b: usize) -> Result<(), StateError> {
        self.record(a);
        self.record(b);
        self.inner.swap(a, b)
    }
}
