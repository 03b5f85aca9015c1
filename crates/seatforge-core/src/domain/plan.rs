use serde::{Deserialize, Serialize};

use super::{Guest, GuestId, Table, TableId};
use crate::constraint::ConstraintEntry;

/// One persisted seat record, `(tableId, seatIndex) -> guestId`.
///
/// This is also the shape handed back to the persistence collaborator,
/// which replaces the whole plan with the returned list.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SeatAssignment {
    pub table_id: TableId,
    pub guest_id: GuestId,
    pub seat_index: u32,
    #[serde(default)]
    pub locked: bool,
}

impl SeatAssignment {
    pub fn new(table_id: impl Into<TableId>, guest_id: impl Into<GuestId>, seat_index: u32) -> Self {
        Self {
            table_id: table_id.into(),
            guest_id: guest_id.into(),
            seat_index,
            locked: false,
        }
    }

    pub fn locked(mut self) -> Self {
        self.locked = true;
        self
    }
}

/// Current project data supplied by the surrounding application.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PlanInput {
    pub guests: Vec<Guest>,
    pub tables: Vec<Table>,
    #[serde(default)]
    pub assignments: Vec<SeatAssignment>,
    #[serde(default)]
    pub constraints: Vec<ConstraintEntry>,
}

impl PlanInput {
    pub fn new(guests: Vec<Guest>, tables: Vec<Table>) -> Self {
        Self {
            guests,
            tables,
            assignments: Vec::new(),
            constraints: Vec::new(),
        }
    }

    pub fn with_assignments(mut self, assignments: Vec<SeatAssignment>) -> Self {
        self.assignments = assignments;
        self
    }

    pub fn with_constraint(mut self, entry: impl Into<ConstraintEntry>) -> Self {
        self.constraints.push(entry.into());
        self
    }
}
