//! Reference plans.
//!
//! Each function returns the input of one well-known situation; the
//! expected outcome is documented on the function.

use seatforge_core::{Change, Constraint, PlanInput, SeatLock};

use crate::plan::{guests, tables, PlanInputBuilder};

/// Ten unconstrained guests, tables of capacity 8, 6 and 8.
///
/// Everyone gets seated, no hard violation, soft score 1.
pub fn unconstrained() -> PlanInput {
    PlanInputBuilder::new()
        .guests(guests(10))
        .tables(tables(&[8, 6, 8]))
        .build()
}

/// [`unconstrained`] with `g1` locked to seat 0 of `t1`.
///
/// `g1` ends at `(t1, 0)` whatever the budget.
pub fn locked_seat() -> PlanInput {
    PlanInputBuilder::new()
        .guests(guests(10))
        .tables(tables(&[8, 6, 8]))
        .constraint_with_id(
            "lock-g1",
            Constraint::LockSeat {
                assignments: vec![SeatLock::new("g1", "t1", 0)],
            },
        )
        .build()
}

/// Two guests who should not share a table and one table of capacity 2.
///
/// Hard-satisfied, soft score below 1, one `AVOID_SAME_TABLE` violation.
pub fn forced_neighbors() -> PlanInput {
    PlanInputBuilder::new()
        .guests(guests(2))
        .tables(tables(&[2]))
        .constraint_with_id(
            "avoid-g1-g2",
            Constraint::AvoidSameTable {
                hard: false,
                weight: 10.0,
                pairs: vec![("g1".into(), "g2".into())],
            },
        )
        .build()
}

/// Adds an eleventh guest to a committed `unconstrained` plan.
///
/// `committed` is the plan produced for [`unconstrained`]; the returned
/// input carries those records and the new guest, with the change list.
pub fn added_guest(committed: &PlanInput) -> (PlanInput, Vec<Change>) {
    let mut input = committed.clone();
    input.guests.extend(guests(11).into_iter().skip(10));
    let changes = vec![Change::AddGuest {
        guest_id: "g11".into(),
    }];
    (input, changes)
}
