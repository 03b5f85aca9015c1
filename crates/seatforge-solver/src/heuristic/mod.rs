//! Candidate moves and the neighborhood they are drawn from.

#[cfg(test)]
mod tests;

use std::fmt;

use rand::Rng;

use seatforge_core::StateError;
use seatforge_scoring::{AssignmentState, ScoreDirector, Seat};

/// A change to the working assignment.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SeatMove {
    /// Moves a guest (seated or not) onto an empty seat.
    Relocate { guest: usize, to: Seat },
    /// Exchanges the seats of two guests, one of which may be unseated.
    Swap { left: usize, right: usize },
}

impl SeatMove {
    pub fn apply(&self, director: &mut dyn ScoreDirector) -> Result<(), StateError> {
        match *self {
            SeatMove::Relocate { guest, to } => director.place(guest, to),
            SeatMove::Swap { left, right } => director.swap(left, right),
        }
    }
}

impl fmt::Display for SeatMove {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            SeatMove::Relocate { guest, to } => write!(f, "relocate #{guest} -> {to}"),
            SeatMove::Swap { left, right } => write!(f, "swap #{left} <-> #{right}"),
        }
    }
}

/// The guests allowed to move and the tables they may move to.
///
/// A full run uses every movable guest and every unlocked table; a diff run
/// restricts both to the affected set.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Neighborhood {
    guests: Vec<usize>,
    tables: Vec<usize>,
}

impl Neighborhood {
    /// Keeps the guests and tables that the state lets move.
    pub fn new(
        state: &AssignmentState,
        guests: impl IntoIterator<Item = usize>,
        tables: impl IntoIterator<Item = usize>,
    ) -> Self {
        Self {
            guests: guests.into_iter().filter(|&g| state.is_movable(g)).collect(),
            tables: tables
                .into_iter()
                .filter(|&t| !state.is_table_locked(t))
                .collect(),
        }
    }

    /// Every guest and every table of the state.
    pub fn full(state: &AssignmentState) -> Self {
        Self::new(state, 0..state.guest_count(), 0..state.table_count())
    }

    pub fn guests(&self) -> &[usize] {
        &self.guests
    }

    pub fn tables(&self) -> &[usize] {
        &self.tables
    }

    pub fn is_empty(&self) -> bool {
        self.guests.is_empty() || self.tables.is_empty()
    }

    fn is_open(&self, table: usize) -> bool {
        self.tables.contains(&table)
    }

    /// Draws one random move, or `None` when the draw leads nowhere.
    pub fn sample<R: Rng>(
        &self,
        state: &AssignmentState,
        rng: &mut R,
        swap_probability: f64,
    ) -> Option<SeatMove> {
        if self.is_empty() {
            return None;
        }
        if self.guests.len() >= 2 && rng.random_bool(swap_probability) {
            let left = self.guests[rng.random_range(0..self.guests.len())];
            let right = self.guests[rng.random_range(0..self.guests.len())];
            return self.swap(state, left, right);
        }
        let guest = self.guests[rng.random_range(0..self.guests.len())];
        let table = self.tables[rng.random_range(0..self.tables.len())];
        self.relocate(state, guest, table)
    }

    fn swap(&self, state: &AssignmentState, left: usize, right: usize) -> Option<SeatMove> {
        if left == right {
            return None;
        }
        match (state.seat_of(left), state.seat_of(right)) {
            (None, None) => None,
            (Some(a), Some(b)) if a.table == b.table => None,
            (a, b) => {
                let reachable = a.map_or(true, |s| self.is_open(s.table))
                    && b.map_or(true, |s| self.is_open(s.table));
                reachable.then_some(SeatMove::Swap { left, right })
            }
        }
    }

    fn relocate(&self, state: &AssignmentState, guest: usize, table: usize) -> Option<SeatMove> {
        match state.table_of(guest) {
            Some(current) if current == table || !self.is_open(current) => return None,
            _ => {}
        }
        state
            .first_free_seat(table)
            .map(|to| SeatMove::Relocate { guest, to })
    }

    /// Every move of the neighborhood in a fixed order: relocations of each
    /// guest to each other open table, then swaps of each guest with every
    /// later guest.
    pub fn sweep(&self, state: &AssignmentState) -> Vec<SeatMove> {
        let mut moves = Vec::new();
        for &guest in &self.guests {
            for &table in &self.tables {
                moves.extend(self.relocate(state, guest, table));
            }
        }
        for (i, &left) in self.guests.iter().enumerate() {
            for &right in &self.guests[i + 1..] {
                moves.extend(self.swap(state, left, right));
            }
        }
        moves
    }
}
