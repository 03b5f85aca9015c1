//! SeatForge - Seat assignment optimization in Rust
//!
//! Describe guests, tables and constraints as a [`PlanInput`], then ask a
//! [`SeatPlanner`] for a plan, a re-plan after edits, or a validation report.
//!
//! # Example
//!
//! ```rust
//! use seatforge::prelude::*;
//!
//! let input: PlanInput = serde_json::from_str(r#"{
//!     "guests": [{"id": "g1", "fullName": "Ada"}, {"id": "g2", "fullName": "Grace"}],
//!     "tables": [{"id": "t1", "capacity": 2}]
//! }"#).unwrap();
//!
//! let planner = SeatPlanner::default();
//! let plan = planner.generate(&input, &GenerateRequest::default()).unwrap();
//! assert_eq!(plan.assignments.len(), 2);
//! assert!(plan.summary.hard_satisfied);
//! ```

// Domain and wire types
pub use seatforge_core::{
    Anchor, Change, Constraint, ConstraintKind, ConstraintSet, DiffRequest, DiffResponse,
    GenerateRequest, GenerateResponse, GenerateSummary, Guest, GuestId, PlanInput,
    SeatAssignment, SeatForgeError, SeatLock, SeatScore, SeatingProblem, Strategy, Table, TableId,
    TablePos, TableShape, Violation,
};

// Configuration
pub use seatforge_config::{AcceptorConfig, ConfigError, PlannerConfig};

// Score analysis
pub use seatforge_scoring::{AssignmentState, ConstraintAnalysis, Scorer};

// Engine
pub use seatforge_solver::{
    ConstraintReport, DiffOutcome, JobController, JobInfo, JobSnapshot, JobStatus, PlanOutcome,
    Planner, RunStats, RunStatus, ValidationReport,
};

mod planner;
pub use planner::SeatPlanner;

#[cfg(feature = "console")]
pub use seatforge_console as console;

pub mod prelude {
    pub use super::SeatPlanner;
    pub use super::{
        Change, Constraint, ConstraintKind, DiffRequest, GenerateRequest, Guest, GuestId,
        PlanInput, SeatAssignment, Table, TableId,
    };
    pub use super::{DiffOutcome, PlanOutcome, PlannerConfig, RunStatus, ValidationReport};
}
