//! Request and response shapes exchanged with the surrounding application.
//!
//! Wire names are camelCase; variant tags are SCREAMING_SNAKE_CASE.

use serde::{Deserialize, Serialize};

use crate::constraint::ConstraintKind;
use crate::domain::{GuestId, TableId};

/// Default iteration cap of one run.
pub const DEFAULT_MAX_ITERATIONS: u64 = 3000;

/// Default wall-clock budget of one run, in milliseconds.
pub const DEFAULT_TIME_BUDGET_MS: u64 = 500;

/// Search strategy requested by the caller.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Strategy {
    /// Greedy construction followed by seeded local search.
    #[default]
    #[serde(rename = "heuristic-v1")]
    HeuristicV1,
}

fn default_true() -> bool {
    true
}

fn default_max_iterations() -> u64 {
    DEFAULT_MAX_ITERATIONS
}

fn default_time_budget_ms() -> u64 {
    DEFAULT_TIME_BUDGET_MS
}

/// Parameters of a full plan generation.
///
/// # Examples
///
/// ```
/// use seatforge_core::GenerateRequest;
///
/// let request: GenerateRequest = serde_json::from_str(r#"{"respectLocks": false}"#).unwrap();
/// assert!(!request.respect_locks);
/// assert_eq!(request.max_iterations, 3000);
/// assert_eq!(request.time_budget_ms, 500);
/// ```
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct GenerateRequest {
    #[serde(default)]
    pub strategy: Strategy,
    #[serde(default = "default_true")]
    pub respect_locks: bool,
    #[serde(default = "default_max_iterations")]
    pub max_iterations: u64,
    #[serde(default = "default_time_budget_ms")]
    pub time_budget_ms: u64,
    /// Random seed; the configured seed applies when absent.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub seed: Option<u64>,
}

impl Default for GenerateRequest {
    fn default() -> Self {
        Self {
            strategy: Strategy::HeuristicV1,
            respect_locks: true,
            max_iterations: DEFAULT_MAX_ITERATIONS,
            time_budget_ms: DEFAULT_TIME_BUDGET_MS,
            seed: None,
        }
    }
}

impl GenerateRequest {
    pub fn with_respect_locks(mut self, respect_locks: bool) -> Self {
        self.respect_locks = respect_locks;
        self
    }

    pub fn with_max_iterations(mut self, max_iterations: u64) -> Self {
        self.max_iterations = max_iterations;
        self
    }

    pub fn with_time_budget_ms(mut self, time_budget_ms: u64) -> Self {
        self.time_budget_ms = time_budget_ms;
        self
    }

    pub fn with_seed(mut self, seed: u64) -> Self {
        self.seed = Some(seed);
        self
    }
}

/// One incremental edit applied since the last committed plan.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(
    tag = "kind",
    rename_all = "SCREAMING_SNAKE_CASE",
    rename_all_fields = "camelCase"
)]
pub enum Change {
    /// The guest is present in the current guest list but has no seat yet.
    AddGuest { guest_id: GuestId },
    /// The guest leaves the plan; its seat is freed.
    RemoveGuest { guest_id: GuestId },
    TableCapacity { table_id: TableId, capacity: u32 },
    /// The constraint with this id was added, edited or deleted.
    ConstraintUpdate { constraint_id: String },
}

/// Parameters of an incremental re-optimization.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct DiffRequest {
    pub changes: Vec<Change>,
    #[serde(default = "default_true")]
    pub respect_locks: bool,
    /// Iteration cap; the configured one applies when absent.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub max_iterations: Option<u64>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub time_budget_ms: Option<u64>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub seed: Option<u64>,
}

impl DiffRequest {
    pub fn new(changes: Vec<Change>) -> Self {
        Self {
            changes,
            respect_locks: true,
            ..Self::default()
        }
    }

    pub fn with_seed(mut self, seed: u64) -> Self {
        self.seed = Some(seed);
        self
    }
}

/// Violation count of one constraint kind.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct Violation {
    #[serde(rename = "type")]
    pub kind: ConstraintKind,
    pub count: u32,
}

/// Externally observable result of a run.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct GenerateSummary {
    pub hard_satisfied: bool,
    /// Weighted soft satisfaction in `[0, 1]`.
    pub soft_score: f64,
    pub violations: Vec<Violation>,
}

impl GenerateSummary {
    /// Violation count reported for `kind`, zero when the kind is inactive.
    pub fn violations_of(&self, kind: ConstraintKind) -> u32 {
        self.violations
            .iter()
            .find(|v| v.kind == kind)
            .map_or(0, |v| v.count)
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct GenerateResponse {
    pub job_id: String,
    /// Present once the job has finished.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub summary: Option<GenerateSummary>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct DiffResponse {
    pub affected_tables: Vec<TableId>,
    pub affected_guests: Vec<GuestId>,
    pub summary: GenerateSummary,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_generate_request_defaults() {
        let request: GenerateRequest = serde_json::from_str("{}").unwrap();
        assert_eq!(request, GenerateRequest::default());
        assert_eq!(request.strategy, Strategy::HeuristicV1);
        assert!(request.respect_locks);

        let json = serde_json::to_value(GenerateRequest::default().with_seed(7)).unwrap();
        assert_eq!(json["strategy"], "heuristic-v1");
        assert_eq!(json["timeBudgetMs"], 500);
        assert_eq!(json["seed"], 7);
    }

    #[test]
    fn test_unknown_strategy_is_rejected() {
        let result = serde_json::from_str::<GenerateRequest>(r#"{"strategy": "exact"}"#);
        assert!(result.is_err());
    }

    #[test]
    fn test_change_wire_shape() {
        let json = r#"{"changes": [
            {"kind": "ADD_GUEST", "guestId": "g11"},
            {"kind": "REMOVE_GUEST", "guestId": "g2"},
            {"kind": "TABLE_CAPACITY", "tableId": "t1", "capacity": 4},
            {"kind": "CONSTRAINT_UPDATE", "constraintId": "c9"}
        ], "respectLocks": true}"#;
        let request: DiffRequest = serde_json::from_str(json).unwrap();

        assert_eq!(
            request.changes,
            vec![
                Change::AddGuest {
                    guest_id: "g11".into()
                },
                Change::RemoveGuest {
                    guest_id: "g2".into()
                },
                Change::TableCapacity {
                    table_id: "t1".into(),
                    capacity: 4
                },
                Change::ConstraintUpdate {
                    constraint_id: "c9".into()
                },
            ]
        );
        assert!(request.respect_locks);
        assert!(request.max_iterations.is_none());
        assert!(request.seed.is_none());
    }

    #[test]
    fn test_summary_wire_shape() {
        let summary = GenerateSummary {
            hard_satisfied: true,
            soft_score: 0.5,
            violations: vec![Violation {
                kind: ConstraintKind::AvoidSameTable,
                count: 1,
            }],
        };
        let json = serde_json::to_value(&summary).unwrap();
        assert_eq!(json["hardSatisfied"], true);
        assert_eq!(json["violations"][0]["type"], "AVOID_SAME_TABLE");
        assert_eq!(json["violations"][0]["count"], 1);
        assert_eq!(summary.violations_of(ConstraintKind::AvoidSameTable), 1);
        assert_eq!(summary.violations_of(ConstraintKind::SameTable), 0);

        let response = GenerateResponse {
            job_id: "j1".into(),
            summary: None,
        };
        let json = serde_json::to_string(&response).unwrap();
        assert_eq!(json, r#"{"jobId":"j1"}"#);
    }
}
