//! SeatForge Solver Engine
//!
//! This crate provides the seat planning engine including:
//! - Planner: generation, diff and validation runs
//! - Phases (greedy construction, local search)
//! - Relocation and swap moves over a restricted neighborhood
//! - Termination conditions over an injectable clock
//! - Job controller for background runs

pub mod heuristic;
pub mod manager;
pub mod phase;
pub mod planner;
pub mod scope;
pub mod termination;

mod stats;

pub use heuristic::{Neighborhood, SeatMove};
pub use manager::{JobController, JobInfo, JobKind, JobOutput, JobSnapshot, JobStatus};
pub use phase::{
    construction::GreedyFill,
    localsearch::{Acceptor, HillClimbingAcceptor, LocalSearchPhase, SimulatedAnnealingAcceptor},
};
pub use planner::{ConstraintReport, DiffOutcome, PlanOutcome, Planner, ValidationReport};
pub use scope::SolverScope;
pub use stats::RunStats;
pub use termination::{
    Budget, Clock, ExternalTermination, ManualClock, OrTermination, RunStatus,
    StepCountTermination, SystemClock, Termination, TimeTermination,
};
