//! Error types for SeatForge

use thiserror::Error;

/// Main error type for SeatForge operations
#[derive(Debug, Error)]
pub enum SeatForgeError {
    /// An assignment-state invariant was violated during a run.
    ///
    /// The optimizer never proposes such a mutation, so this always
    /// indicates an engine fault and aborts the run.
    #[error("Assignment state fault: {0}")]
    State(#[from] StateError),

    /// Input data that cannot be planned at all (duplicate ids, zero capacity).
    #[error("Invalid input: {0}")]
    InvalidInput(String),

    /// Error in planner configuration
    #[error("Configuration error: {0}")]
    Config(String),

    /// Job bookkeeping error (unknown job, job already joined)
    #[error("Job error: {0}")]
    Job(String),

    /// Internal error (should not occur in normal operation)
    #[error("Internal error: {0}")]
    Internal(String),
}

impl SeatForgeError {
    /// Stable machine-readable code.
    pub fn code(&self) -> &'static str {
        match self {
            SeatForgeError::State(e) => e.code(),
            SeatForgeError::InvalidInput(_) => "INVALID_INPUT",
            SeatForgeError::Config(_) => "CONFIG",
            SeatForgeError::Job(_) => "JOB",
            SeatForgeError::Internal(_) => "INTERNAL",
        }
    }
}

/// Rejected mutation of the working seat assignment.
///
/// Indices refer to positions in the run's [`SeatingProblem`](crate::SeatingProblem).
#[derive(Debug, Clone, Copy, PartialEq, Eq, Error)]
pub enum StateError {
    #[error("seat {seat} of table #{table} is occupied by guest #{occupant}")]
    SeatOccupied {
        table: usize,
        seat: u32,
        occupant: usize,
    },

    #[error("table #{table} is locked")]
    TableLocked { table: usize },

    #[error("seat {seat} of table #{table} is locked")]
    SeatLocked { table: usize, seat: u32 },

    #[error("seat {seat} is out of range for table #{table} with capacity {capacity}")]
    SeatOutOfRange {
        table: usize,
        seat: u32,
        capacity: u32,
    },

    #[error("unknown guest #{0}")]
    UnknownGuest(usize),

    #[error("unknown table #{0}")]
    UnknownTable(usize),
}

impl StateError {
    /// Stable machine-readable code.
    pub fn code(&self) -> &'static str {
        match self {
            StateError::SeatOccupied { .. } => "SEAT_OCCUPIED",
            StateError::TableLocked { .. } => "TABLE_LOCKED",
            StateError::SeatLocked { .. } => "SEAT_LOCKED",
            StateError::SeatOutOfRange { .. } => "SEAT_OUT_OF_RANGE",
            StateError::UnknownGuest(_) => "UNKNOWN_GUEST",
            StateError::UnknownTable(_) => "UNKNOWN_TABLE",
        }
    }
}

/// Result type alias for SeatForge operations
pub type Result<T> = std::result::Result<T, SeatForgeError>;
