//! The mutable working seat assignment of one run.
//!
//! [`AssignmentState`] keeps two mirrored views, seat → guest and
//! guest → seat, and only changes them through checked operations, so the
//! "one guest per seat, one seat per guest" invariant holds after every
//! successful call. Locked tables and pinned seats are enforced here.

#[cfg(test)]
mod tests;

use std::fmt;

use seatforge_core::{SeatAssignment, SeatingProblem, StateError};

/// A seat, identified by table index and seat index.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct Seat {
    pub table: usize,
    pub index: u32,
}

impl Seat {
    pub const fn new(table: usize, index: u32) -> Self {
        Self { table, index }
    }
}

impl fmt::Display for Seat {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "#{}:{}", self.table, self.index)
    }
}

/// Guest-to-seat mapping with table and seat locks.
///
/// # Examples
///
/// ```
/// use seatforge_core::{Guest, SeatingProblem, Table};
/// use seatforge_scoring::{AssignmentState, Seat};
///
/// let problem = SeatingProblem::new(
///     vec![Guest::new("g1"), Guest::new("g2")],
///     vec![Table::new("t1", 2)],
/// ).unwrap();
/// let mut state = AssignmentState::new(&problem);
///
/// state.place(0, Seat::new(0, 0)).unwrap();
/// state.place(1, Seat::new(0, 1)).unwrap();
/// state.swap(0, 1).unwrap();
///
/// assert_eq!(state.seat_of(0), Some(Seat::new(0, 1)));
/// assert!(state.place(0, Seat::new(0, 0)).is_err());
/// ```
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AssignmentState {
    seats: Vec<Vec<Option<usize>>>,
    positions: Vec<Option<Seat>>,
    table_locked: Vec<bool>,
    pinned: Vec<bool>,
}

impl AssignmentState {
    /// Creates an empty state shaped after `problem`.
    pub fn new(problem: &SeatingProblem) -> Self {
        Self {
            seats: problem
                .tables()
                .iter()
                .map(|t| vec![None; t.capacity as usize])
                .collect(),
            positions: vec![None; problem.guest_count()],
            table_locked: vec![false; problem.table_count()],
            pinned: vec![false; problem.guest_count()],
        }
    }

    pub fn guest_count(&self) -> usize {
        self.positions.len()
    }

    pub fn table_count(&self) -> usize {
        self.seats.len()
    }

    pub fn capacity(&self, table: usize) -> u32 {
        self.seats.get(table).map_or(0, |s| s.len() as u32)
    }

    pub fn seat_of(&self, guest: usize) -> Option<Seat> {
        self.positions.get(guest).copied().flatten()
    }

    pub fn table_of(&self, guest: usize) -> Option<usize> {
        self.seat_of(guest).map(|s| s.table)
    }

    pub fn occupant(&self, seat: Seat) -> Option<usize> {
        self.seats
            .get(seat.table)
            .and_then(|t| t.get(seat.index as usize))
            .copied()
            .flatten()
    }

    pub fn is_table_locked(&self, table: usize) -> bool {
        self.table_locked.get(table).copied().unwrap_or(false)
    }

    pub fn is_pinned(&self, guest: usize) -> bool {
        self.pinned.get(guest).copied().unwrap_or(false)
    }

    /// Whether the guest may change seats: not pinned and not seated at a
    /// locked table.
    pub fn is_movable(&self, guest: usize) -> bool {
        !self.is_pinned(guest)
            && self
                .table_of(guest)
                .map_or(true, |t| !self.is_table_locked(t))
    }

    /// Occupants of `table` in seat order.
    pub fn occupants(&self, table: usize) -> impl Iterator<Item = usize> + '_ {
        self.seats
            .get(table)
            .into_iter()
            .flat_map(|seats| seats.iter().flatten().copied())
    }

    pub fn occupied_count(&self, table: usize) -> usize {
        self.occupants(table).count()
    }

    /// Empty seats of `table` in seat order. Locked tables have none.
    pub fn free_seats(&self, table: usize) -> impl Iterator<Item = Seat> + '_ {
        let locked = self.is_table_locked(table);
        self.seats
            .get(table)
            .into_iter()
            .flat_map(|seats| seats.iter().enumerate())
            .filter(move |(_, occupant)| !locked && occupant.is_none())
            .map(move |(index, _)| Seat::new(table, index as u32))
    }

    pub fn first_free_seat(&self, table: usize) -> Option<Seat> {
        self.free_seats(table).next()
    }

    /// Unseated guests in input order.
    pub fn unassigned(&self) -> Vec<usize> {
        self.positions
            .iter()
            .enumerate()
            .filter(|(_, seat)| seat.is_none())
            .map(|(guest, _)| guest)
            .collect()
    }

    pub fn assigned_count(&self) -> usize {
        self.positions.iter().flatten().count()
    }

    fn check_guest(&self, guest: usize) -> Result<(), StateError> {
        if guest < self.positions.len() {
            Ok(())
        } else {
            Err(StateError::UnknownGuest(guest))
        }
    }

    fn check_seat(&self, seat: Seat) -> Result<(), StateError> {
        let seats = self
            .seats
            .get(seat.table)
            .ok_or(StateError::UnknownTable(seat.table))?;
        if (seat.index as usize) < seats.len() {
            Ok(())
        } else {
            Err(StateError::SeatOutOfRange {
                table: seat.table,
                seat: seat.index,
                capacity: seats.len() as u32,
            })
        }
    }

    /// Fails unless the guest currently seated at `seat` may leave it.
    fn check_leave(&self, guest: usize, seat: Seat) -> Result<(), StateError> {
        if self.is_table_locked(seat.table) {
            return Err(StateError::TableLocked { table: seat.table });
        }
        if self.is_pinned(guest) {
            return Err(StateError::SeatLocked {
                table: seat.table,
                seat: seat.index,
            });
        }
        Ok(())
    }

    /// Seats `guest` at `seat`, moving it from its current seat if any.
    ///
    /// Placing a guest on the seat it already holds is a no-op.
    ///
    /// # Errors
    ///
    /// - [`StateError::SeatOccupied`] when another guest holds the seat
    /// - [`StateError::TableLocked`] when the target or the current table is locked
    /// - [`StateError::SeatLocked`] when the guest is pinned elsewhere
    pub fn place(&mut self, guest: usize, seat: Seat) -> Result<(), StateError> {
        self.check_guest(guest)?;
        self.check_seat(seat)?;
        match self.occupant(seat) {
            Some(occupant) if occupant == guest => return Ok(()),
            Some(occupant) => {
                return Err(StateError::SeatOccupied {
                    table: seat.table,
                    seat: seat.index,
                    occupant,
                })
            }
            None => {}
        }
        if self.is_table_locked(seat.table) {
            return Err(StateError::TableLocked { table: seat.table });
        }
        if let Some(current) = self.seat_of(guest) {
            self.check_leave(guest, current)?;
        }
        self.vacate(guest);
        self.occupy(guest, seat);
        Ok(())
    }

    /// Unseats `guest`, returning the seat it held.
    ///
    /// No-op for an unseated guest.
    pub fn remove(&mut self, guest: usize) -> Result<Option<Seat>, StateError> {
        self.check_guest(guest)?;
        let Some(seat) = self.seat_of(guest) else {
            return Ok(None);
        };
        self.check_leave(guest, seat)?;
        self.vacate(guest);
        Ok(Some(seat))
    }

    /// Exchanges the seats of two guests atomically.
    ///
    /// When only one of them is seated the other takes its seat and the
    /// first becomes unseated. Nothing changes when either check fails.
    pub fn swap(&mut self, a: usize, b: usize) -> Result<(), StateError> {
        self.check_guest(a)?;
        self.check_guest(b)?;
        if a == b {
            return Ok(());
        }
        let seat_a = self.seat_of(a);
        let seat_b = self.seat_of(b);
        for (guest, seat) in [(a, seat_a), (b, seat_b)] {
            if let Some(seat) = seat {
                self.check_leave(guest, seat)?;
            }
        }
        self.vacate(a);
        self.vacate(b);
        if let Some(seat) = seat_b {
            self.occupy(a, seat);
        }
        if let Some(seat) = seat_a {
            self.occupy(b, seat);
        }
        Ok(())
    }

    /// Seats `guest` at `seat` and pins it there for the rest of the run.
    pub fn pin(&mut self, guest: usize, seat: Seat) -> Result<(), StateError> {
        self.place(guest, seat)?;
        self.pinned[guest] = true;
        Ok(())
    }

    /// Freezes the current contents of `table`.
    pub fn lock_table(&mut self, table: usize) -> Result<(), StateError> {
        let locked = self
            .table_locked
            .get_mut(table)
            .ok_or(StateError::UnknownTable(table))?;
        *locked = true;
        Ok(())
    }

    /// Puts guests back on previously held positions without lock checks.
    ///
    /// Every listed guest is unseated first, then reseated, so positions
    /// recorded before a sequence of mutations can be replayed in any order.
    pub fn restore(&mut self, positions: &[(usize, Option<Seat>)]) {
        for &(guest, _) in positions {
            self.vacate(guest);
        }
        for &(guest, seat) in positions {
            if let Some(seat) = seat {
                self.occupy(guest, seat);
            }
        }
    }

    fn vacate(&mut self, guest: usize) {
        if let Some(seat) = self.positions[guest].take() {
            self.seats[seat.table][seat.index as usize] = None;
        }
    }

    fn occupy(&mut self, guest: usize, seat: Seat) {
        self.seats[seat.table][seat.index as usize] = Some(guest);
        self.positions[guest] = Some(seat);
    }

    /// Checks that both views agree.
    pub fn is_consistent(&self) -> bool {
        let mirrored = self.seats.iter().enumerate().all(|(table, seats)| {
            seats.iter().enumerate().all(|(index, occupant)| match occupant {
                Some(guest) => self.positions.get(*guest).copied().flatten()
                    == Some(Seat::new(table, index as u32)),
                None => true,
            })
        });
        mirrored
            && self
                .positions
                .iter()
                .enumerate()
                .all(|(guest, seat)| seat.map_or(true, |s| self.occupant(s) == Some(guest)))
    }

    /// Flat seat records, ordered by table then seat index.
    ///
    /// `locked` marks the guests in `locked_guests`.
    pub fn records(
        &self,
        problem: &SeatingProblem,
        locked_guests: &[usize],
    ) -> Vec<SeatAssignment> {
        let mut records = Vec::with_capacity(self.assigned_count());
        for (table, seats) in self.seats.iter().enumerate() {
            for (index, occupant) in seats.iter().enumerate() {
                if let Some(guest) = *occupant {
                    records.push(SeatAssignment {
                        table_id: problem.table(table).id.clone(),
                        guest_id: problem.guest(guest).id.clone(),
                        seat_index: index as u32,
                        locked: locked_guests.contains(&guest),
                    });
                }
            }
        }
        records
    }
}
