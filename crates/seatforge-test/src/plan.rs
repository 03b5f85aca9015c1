//! Guest/table generators and a builder for [`PlanInput`].

use seatforge_core::{
    Constraint, ConstraintEntry, Guest, GuestId, PlanInput, SeatAssignment, SeatingProblem, Table,
    TableId,
};

/// Id of the `n`-th generated guest (1-based).
pub fn guest_id(n: usize) -> GuestId {
    GuestId::new(format!("g{n}"))
}

/// Id of the `n`-th generated table (1-based).
pub fn table_id(n: usize) -> TableId {
    TableId::new(format!("t{n}"))
}

/// `n` guests named `g1..=gn` with no group or tags.
pub fn guests(n: usize) -> Vec<Guest> {
    (1..=n)
        .map(|i| Guest::new(guest_id(i)).with_name(format!("Guest {i}")))
        .collect()
}

/// One table per capacity, named `t1..`.
pub fn tables(capacities: &[u32]) -> Vec<Table> {
    capacities
        .iter()
        .enumerate()
        .map(|(i, &capacity)| Table::new(table_id(i + 1), capacity))
        .collect()
}

/// Indexed problem over generated guests and tables.
pub fn problem(guest_count: usize, capacities: &[u32]) -> SeatingProblem {
    SeatingProblem::new(guests(guest_count), tables(capacities))
        .expect("generated ids are unique and capacities positive")
}

/// Fluent builder for [`PlanInput`].
#[derive(Debug, Clone, Default)]
pub struct PlanInputBuilder {
    input: PlanInput,
}

impl PlanInputBuilder {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn guests(mut self, guests: Vec<Guest>) -> Self {
        self.input.guests.extend(guests);
        self
    }

    pub fn guest(mut self, guest: Guest) -> Self {
        self.input.guests.push(guest);
        self
    }

    pub fn tables(mut self, tables: Vec<Table>) -> Self {
        self.input.tables.extend(tables);
        self
    }

    pub fn table(mut self, table: Table) -> Self {
        self.input.tables.push(table);
        self
    }

    pub fn seat(mut self, table: &str, guest: &str, seat_index: u32) -> Self {
        self.input
            .assignments
            .push(SeatAssignment::new(table, guest, seat_index));
        self
    }

    pub fn locked_seat(mut self, table: &str, guest: &str, seat_index: u32) -> Self {
        self.input
            .assignments
            .push(SeatAssignment::new(table, guest, seat_index).locked());
        self
    }

    pub fn assignments(mut self, assignments: Vec<SeatAssignment>) -> Self {
        self.input.assignments = assignments;
        self
    }

    pub fn constraint(mut self, constraint: Constraint) -> Self {
        self.input.constraints.push(constraint.into());
        self
    }

    pub fn constraint_with_id(mut self, id: &str, constraint: Constraint) -> Self {
        self.input
            .constraints
            .push(ConstraintEntry::new(id, constraint));
        self
    }

    pub fn build(self) -> PlanInput {
        self.input
    }
}
