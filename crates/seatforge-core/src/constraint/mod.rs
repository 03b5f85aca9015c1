//! Constraint model.
//!
//! Constraints arrive as a closed set of tagged variants ([`Constraint`]),
//! are validated against the guest/table universe of a run and compiled into
//! index-based [`Rule`]s inside a [`ConstraintSet`]. Invalid entries are
//! excluded with a [`ConstraintIssue`] instead of failing the run.

mod compile;
mod issue;


use std::fmt;

use serde::{Deserialize, Serialize};

use crate::domain::{GuestId, TableId};

pub use compile::{Anchor, CompiledConstraint, ConstraintSet, References, Rule, SeatPin};
pub use issue::{ConstraintIssue, IssueCode};

/// Weight carried by the always-hard kinds.
pub const FIXED_HARD_WEIGHT: f64 = 10.0;

fn default_weight() -> f64 {
    1.0
}

/// A seating rule as supplied by the caller.
///
/// `hard` rules count toward the hard violation total; soft rules contribute
/// `weight` to the normalized soft score. `TABLE_CAPACITY` and `LOCK_SEAT`
/// are always hard with a fixed weight.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(
    tag = "type",
    rename_all = "SCREAMING_SNAKE_CASE",
    rename_all_fields = "camelCase"
)]
pub enum Constraint {
    SameTable {
        #[serde(default)]
        hard: bool,
        #[serde(default = "default_weight")]
        weight: f64,
        members: Vec<GuestId>,
    },
    AvoidSameTable {
        #[serde(default)]
        hard: bool,
        #[serde(default = "default_weight")]
        weight: f64,
        pairs: Vec<(GuestId, GuestId)>,
    },
    /// Without a `tableId` the rule covers every table.
    TableCapacity {
        #[serde(default, skip_serializing_if = "Option::is_none")]
        table_id: Option<TableId>,
    },
    VipFront {
        #[serde(default)]
        hard: bool,
        #[serde(default = "default_weight")]
        weight: f64,
        guests: Vec<GuestId>,
        priority_zone: String,
    },
    GroupTogether {
        #[serde(default)]
        hard: bool,
        #[serde(default = "default_weight")]
        weight: f64,
        group: String,
    },
    DistributeGroup {
        #[serde(default)]
        hard: bool,
        #[serde(default = "default_weight")]
        weight: f64,
        group: String,
        #[serde(default, skip_serializing_if = "Option::is_none")]
        min_per_table: Option<u32>,
    },
    LockSeat {
        assignments: Vec<SeatLock>,
    },
    ZonePreference {
        #[serde(default)]
        hard: bool,
        #[serde(default = "default_weight")]
        weight: f64,
        guest: GuestId,
        zones: Vec<String>,
    },
    MaxDistance {
        #[serde(default)]
        hard: bool,
        #[serde(default = "default_weight")]
        weight: f64,
        guest: GuestId,
        anchor: DistanceAnchor,
        max: f64,
    },
}

impl Constraint {
    pub fn kind(&self) -> ConstraintKind {
        match self {
            Constraint::SameTable { .. } => ConstraintKind::SameTable,
            Constraint::AvoidSameTable { .. } => ConstraintKind::AvoidSameTable,
            Constraint::TableCapacity { .. } => ConstraintKind::TableCapacity,
            Constraint::VipFront { .. } => ConstraintKind::VipFront,
            Constraint::GroupTogether { .. } => ConstraintKind::GroupTogether,
            Constraint::DistributeGroup { .. } => ConstraintKind::DistributeGroup,
            Constraint::LockSeat { .. } => ConstraintKind::LockSeat,
            Constraint::ZonePreference { .. } => ConstraintKind::ZonePreference,
            Constraint::MaxDistance { .. } => ConstraintKind::MaxDistance,
        }
    }

    pub fn is_hard(&self) -> bool {
        match self {
            Constraint::TableCapacity { .. } | Constraint::LockSeat { .. } => true,
            Constraint::SameTable { hard, .. }
            | Constraint::AvoidSameTable { hard, .. }
            | Constraint::VipFront { hard, .. }
            | Constraint::GroupTogether { hard, .. }
            | Constraint::DistributeGroup { hard, .. }
            | Constraint::ZonePreference { hard, .. }
            | Constraint::MaxDistance { hard, .. } => *hard,
        }
    }

    pub fn weight(&self) -> f64 {
        match self {
            Constraint::TableCapacity { .. } | Constraint::LockSeat { .. } => FIXED_HARD_WEIGHT,
            Constraint::SameTable { weight, .. }
            | Constraint::AvoidSameTable { weight, .. }
            | Constraint::VipFront { weight, .. }
            | Constraint::GroupTogether { weight, .. }
            | Constraint::DistributeGroup { weight, .. }
            | Constraint::ZonePreference { weight, .. }
            | Constraint::MaxDistance { weight, .. } => *weight,
        }
    }
}

/// A constraint as stored by the caller, optionally carrying an id so
/// incremental changes can refer to it.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ConstraintEntry {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub id: Option<String>,
    #[serde(flatten)]
    pub constraint: Constraint,
}

impl ConstraintEntry {
    pub fn new(id: impl Into<String>, constraint: Constraint) -> Self {
        Self {
            id: Some(id.into()),
            constraint,
        }
    }
}

impl From<Constraint> for ConstraintEntry {
    fn from(constraint: Constraint) -> Self {
        Self {
            id: None,
            constraint,
        }
    }
}

/// Pins one guest to one seat.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SeatLock {
    pub guest_id: GuestId,
    pub table_id: TableId,
    pub seat_no: u32,
}

impl SeatLock {
    pub fn new(guest_id: impl Into<GuestId>, table_id: impl Into<TableId>, seat_no: u32) -> Self {
        Self {
            guest_id: guest_id.into(),
            table_id: table_id.into(),
            seat_no,
        }
    }
}

/// Reference point of a `MAX_DISTANCE` rule: another guest's table or a
/// fixed table.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub enum DistanceAnchor {
    Guest(GuestId),
    Table(TableId),
}

/// Fieldless constraint discriminant, used for dispatch and diagnostics.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum ConstraintKind {
    SameTable,
    AvoidSameTable,
    TableCapacity,
    VipFront,
    GroupTogether,
    DistributeGroup,
    LockSeat,
    ZonePreference,
    MaxDistance,
}

impl ConstraintKind {
    pub const COUNT: usize = 9;

    /// All kinds in declaration order.
    pub const ALL: [ConstraintKind; Self::COUNT] = [
        ConstraintKind::SameTable,
        ConstraintKind::AvoidSameTable,
        ConstraintKind::TableCapacity,
        ConstraintKind::VipFront,
        ConstraintKind::GroupTogether,
        ConstraintKind::DistributeGroup,
        ConstraintKind::LockSeat,
        ConstraintKind::ZonePreference,
        ConstraintKind::MaxDistance,
    ];

    /// Position in [`ConstraintKind::ALL`].
    pub fn index(self) -> usize {
        self as usize
    }

    pub fn as_str(self) -> &'static str {
        match self {
            ConstraintKind::SameTable => "SAME_TABLE",
            ConstraintKind::AvoidSameTable => "AVOID_SAME_TABLE",
            ConstraintKind::TableCapacity => "TABLE_CAPACITY",
            ConstraintKind::VipFront => "VIP_FRONT",
            ConstraintKind::GroupTogether => "GROUP_TOGETHER",
            ConstraintKind::DistributeGroup => "DISTRIBUTE_GROUP",
            ConstraintKind::LockSeat => "LOCK_SEAT",
            ConstraintKind::ZonePreference => "ZONE_PREFERENCE",
            ConstraintKind::MaxDistance => "MAX_DISTANCE",
        }
    }

    /// Whether a rule of this kind keeps guests of one group at one table.
    pub fn is_grouping(self) -> bool {
        matches!(self, ConstraintKind::SameTable | ConstraintKind::GroupTogether)
    }
}

impl fmt::Display for ConstraintKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}
