//! Results handed back to callers.

use serde::{Deserialize, Serialize};

use seatforge_core::{
    ConstraintIssue, ConstraintKind, DiffResponse, GenerateResponse, GenerateSummary, GuestId,
    SeatAssignment, SeatScore, TableId,
};
use seatforge_scoring::ConstraintAnalysis;

use crate::stats::RunStats;
use crate::termination::RunStatus;

/// Result of one generation or diff run.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PlanOutcome {
    /// Final seat records, ordered by table then seat index.
    pub assignments: Vec<SeatAssignment>,
    /// Guests left without a seat, in input order.
    pub unassigned: Vec<GuestId>,
    pub summary: GenerateSummary,
    pub score: SeatScore,
    pub termination: RunStatus,
    pub stats: RunStats,
    /// Constraint entries left out of scoring, and why.
    pub issues: Vec<ConstraintIssue>,
}

impl PlanOutcome {
    pub fn response(&self, job_id: impl Into<String>) -> GenerateResponse {
        GenerateResponse {
            job_id: job_id.into(),
            summary: Some(self.summary.clone()),
        }
    }

    /// Whether the caller cut the run short.
    pub fn is_cancelled(&self) -> bool {
        self.termination.is_cancelled()
    }
}

/// Result of a diff run: the new plan plus what it touched.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct DiffOutcome {
    /// Tables whose seating may have changed, in input order.
    pub affected_tables: Vec<TableId>,
    /// Guests whose seat may have changed, in input order, followed by the
    /// removed guests.
    pub affected_guests: Vec<GuestId>,
    pub plan: PlanOutcome,
}

impl DiffOutcome {
    pub fn response(&self) -> DiffResponse {
        DiffResponse {
            affected_tables: self.affected_tables.clone(),
            affected_guests: self.affected_guests.clone(),
            summary: self.plan.summary.clone(),
        }
    }
}

/// Score breakdown line of one constraint.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ConstraintReport {
    /// Position of the source entry, absent for synthesized rules.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub index: Option<usize>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub id: Option<String>,
    #[serde(rename = "type")]
    pub kind: ConstraintKind,
    pub hard: bool,
    pub weight: f64,
    pub satisfaction: f64,
    pub violations: u32,
    pub applicable: bool,
}

impl From<ConstraintAnalysis> for ConstraintReport {
    fn from(analysis: ConstraintAnalysis) -> Self {
        Self {
            index: analysis.index,
            id: analysis.id,
            kind: analysis.kind,
            hard: analysis.hard,
            weight: analysis.weight,
            satisfaction: analysis.evaluation.satisfaction,
            violations: analysis.evaluation.violations,
            applicable: analysis.evaluation.applicable,
        }
    }
}

/// Assessment of a plan as given, without optimizing it.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ValidationReport {
    pub issues: Vec<ConstraintIssue>,
    pub score: SeatScore,
    pub summary: GenerateSummary,
    pub unassigned: Vec<GuestId>,
    pub constraints: Vec<ConstraintReport>,
}
