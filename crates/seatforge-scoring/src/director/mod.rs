//! Score director implementations.
//!
//! - [`SeatScoreDirector`] - Full recalculation over an owned assignment
//! - [`RecordingScoreDirector`] - Undo tracking wrapper used to evaluate moves

mod simple;
mod traits;

pub mod recording;


pub use recording::RecordingScoreDirector;
pub use simple::SeatScoreDirector;
pub use traits::ScoreDirector;
