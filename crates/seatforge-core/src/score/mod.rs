//! Score types for ranking candidate seatings.

mod seat_score;


pub use seat_score::SeatScore;
