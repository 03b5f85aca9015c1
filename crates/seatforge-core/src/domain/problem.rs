use std::collections::HashMap;

use super::{Guest, GuestId, Table, TableId};
use crate::error::{Result, SeatForgeError};

/// Index-addressed view over the guests and tables of one run.
///
/// Guests and tables keep their input order; every engine structure refers
/// to them by position in that order, which keeps iteration deterministic.
#[derive(Debug, Clone)]
pub struct SeatingProblem {
    guests: Vec<Guest>,
    tables: Vec<Table>,
    guest_index: HashMap<GuestId, usize>,
    table_index: HashMap<TableId, usize>,
}

impl SeatingProblem {
    /// Builds the problem view.
    ///
    /// # Errors
    ///
    /// Returns [`SeatForgeError::InvalidInput`] for duplicate ids or a table
    /// without seats.
    pub fn new(guests: Vec<Guest>, tables: Vec<Table>) -> Result<Self> {
        let mut guest_index = HashMap::with_capacity(guests.len());
        for (idx, guest) in guests.iter().enumerate() {
            if guest_index.insert(guest.id.clone(), idx).is_some() {
                return Err(SeatForgeError::InvalidInput(format!(
                    "duplicate guest id {}",
                    guest.id
                )));
            }
        }

        let mut table_index = HashMap::with_capacity(tables.len());
        for (idx, table) in tables.iter().enumerate() {
            if table.capacity == 0 {
                return Err(SeatForgeError::InvalidInput(format!(
                    "table {} must have a positive capacity",
                    table.id
                )));
            }
            if table_index.insert(table.id.clone(), idx).is_some() {
                return Err(SeatForgeError::InvalidInput(format!(
                    "duplicate table id {}",
                    table.id
                )));
            }
        }

        Ok(Self {
            guests,
            tables,
            guest_index,
            table_index,
        })
    }

    pub fn guests(&self) -> &[Guest] {
        &self.guests
    }

    pub fn tables(&self) -> &[Table] {
        &self.tables
    }

    pub fn guest(&self, idx: usize) -> &Guest {
        &self.guests[idx]
    }

    pub fn table(&self, idx: usize) -> &Table {
        &self.tables[idx]
    }

    pub fn guest_count(&self) -> usize {
        self.guests.len()
    }

    pub fn table_count(&self) -> usize {
        self.tables.len()
    }

    pub fn guest_idx(&self, id: &str) -> Option<usize> {
        self.guest_index.get(id).copied()
    }

    pub fn table_idx(&self, id: &str) -> Option<usize> {
        self.table_index.get(id).copied()
    }

    pub fn capacity(&self, table: usize) -> u32 {
        self.tables[table].capacity
    }

    pub fn total_capacity(&self) -> u64 {
        self.tables.iter().map(|t| u64::from(t.capacity)).sum()
    }

    /// Guests carrying the given group label, in input order.
    pub fn group_members(&self, group: &str) -> Vec<usize> {
        self.guests
            .iter()
            .enumerate()
            .filter(|(_, g)| g.group.as_deref() == Some(group))
            .map(|(idx, _)| idx)
            .collect()
    }
}
