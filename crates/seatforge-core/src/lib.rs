//! SeatForge Core - Core types for seat assignment
//!
//! This crate provides the fundamental abstractions for SeatForge:
//! - Domain types for guests, tables and seat records
//! - The constraint model and its validation against a guest/table universe
//! - Score types for ranking candidate seatings
//! - Request/response shapes exchanged with the surrounding application

pub mod constraint;
pub mod domain;
pub mod error;
pub mod request;
pub mod score;

pub use constraint::{
    Anchor, CompiledConstraint, Constraint, ConstraintEntry, ConstraintIssue, ConstraintKind,
    ConstraintSet, DistanceAnchor, IssueCode, References, Rule, SeatLock, SeatPin,
};
pub use domain::{
    Guest, GuestId, PlanInput, SeatAssignment, SeatingProblem, Table, TableId, TablePos,
    TableShape,
};
pub use error::{SeatForgeError, StateError};
pub use request::{
    Change, DiffRequest, DiffResponse, GenerateRequest, GenerateResponse, GenerateSummary,
    Strategy, Violation,
};
pub use score::SeatScore;
