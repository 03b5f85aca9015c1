//! SeatScore - Three-level score for seat assignments

use std::cmp::Ordering;
use std::fmt;

use serde::{Deserialize, Serialize};

/// A score with hard, medium and soft levels.
///
/// - `hard` is the negated hard violation count.
/// - `medium` is the negated number of unseated guests.
/// - `soft` is the normalized weighted soft satisfaction in `[0, 1]`.
///
/// Comparison order: hard > medium > soft. Soft values are compared with
/// [`f64::total_cmp`], which makes the ordering total.
///
/// # Examples
///
/// ```
/// use seatforge_core::SeatScore;
///
/// let crowded = SeatScore::of(0, 0, 0.4);
/// let unseated = SeatScore::of(0, -1, 1.0);
///
/// // Seating everyone wins over soft satisfaction
/// assert!(crowded > unseated);
/// assert!(SeatScore::of(-1, 0, 1.0) < unseated);
/// ```
#[derive(Clone, Copy, Default, Serialize, Deserialize)]
pub struct SeatScore {
    hard: i64,
    medium: i64,
    soft: f64,
}

impl SeatScore {
    /// The perfect score: nothing violated, everyone seated, fully satisfied.
    pub const OPTIMAL: SeatScore = SeatScore {
        hard: 0,
        medium: 0,
        soft: 1.0,
    };

    #[inline]
    pub const fn of(hard: i64, medium: i64, soft: f64) -> Self {
        SeatScore { hard, medium, soft }
    }

    #[inline]
    pub const fn hard(&self) -> i64 {
        self.hard
    }

    #[inline]
    pub const fn medium(&self) -> i64 {
        self.medium
    }

    #[inline]
    pub const fn soft(&self) -> f64 {
        self.soft
    }

    /// Number of hard violations behind this score.
    #[inline]
    pub fn hard_violations(&self) -> u64 {
        self.hard.unsigned_abs()
    }

    /// Number of unseated guests behind this score.
    #[inline]
    pub fn unassigned(&self) -> u64 {
        self.medium.unsigned_abs()
    }

    #[inline]
    pub fn is_feasible(&self) -> bool {
        self.hard >= 0
    }
}

impl PartialEq for SeatScore {
    fn eq(&self, other: &Self) -> bool {
        self.cmp(other) == Ordering::Equal
    }
}

impl Eq for SeatScore {}

impl PartialOrd for SeatScore {
    fn partial_cmp(&self, other: &Self) -> Option<Ordering> {
        Some(self.cmp(other))
    }
}

impl Ord for SeatScore {
    fn cmp(&self, other: &Self) -> Ordering {
        self.hard
            .cmp(&other.hard)
            .then(self.medium.cmp(&other.medium))
            .then(self.soft.total_cmp(&other.soft))
    }
}

impl fmt::Debug for SeatScore {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "SeatScore({}, {}, {})", self.hard, self.medium, self.soft)
    }
}

impl fmt::Display for SeatScore {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "{}hard/{}medium/{:.4}soft",
            self.hard, self.medium, self.soft
        )
    }
}
