//! Assignment state and scoring for SeatForge.
//!
//! - [`AssignmentState`] - the working guest/seat mapping with lock checks
//! - [`Scorer`] - hard/medium/soft evaluation of a state against a
//!   compiled [`ConstraintSet`](seatforge_core::ConstraintSet)
//! - [`ScoreDirector`] - owner of the working state, with an undo-logging
//!   wrapper for move evaluation

pub mod director;
pub mod scorer;
pub mod state;

pub use director::{RecordingScoreDirector, ScoreDirector, SeatScoreDirector};
pub use scorer::{ConstraintAnalysis, Evaluation, Scorer};
pub use state::{AssignmentState, Seat};
