//! Scoring of a seat assignment against a compiled constraint set.
//!
//! The [`Scorer`] recomputes every rule on each call. Hard rules add their
//! violation counts to the hard level, unseated guests count on the medium
//! level, and applicable soft rules contribute `weight * satisfaction` to
//! the normalized soft level.

mod evaluators;


use seatforge_core::{
    ConstraintKind, ConstraintSet, GenerateSummary, SeatScore, SeatingProblem, Violation,
};

use crate::state::AssignmentState;

pub use evaluators::Evaluation;
use evaluators::{evaluate, EvalContext};

/// Breakdown of one compiled constraint.
#[derive(Debug, Clone, PartialEq)]
pub struct ConstraintAnalysis {
    /// Position of the source entry, `None` when synthesized.
    pub index: Option<usize>,
    pub id: Option<String>,
    pub kind: ConstraintKind,
    pub hard: bool,
    pub weight: f64,
    pub evaluation: Evaluation,
}

/// Evaluates states of one run.
#[derive(Debug, Clone, Copy)]
pub struct Scorer<'a> {
    problem: &'a SeatingProblem,
    constraints: &'a ConstraintSet,
    positions_complete: bool,
}

impl<'a> Scorer<'a> {
    pub fn new(problem: &'a SeatingProblem, constraints: &'a ConstraintSet) -> Self {
        Self {
            problem,
            constraints,
            positions_complete: problem.tables().iter().all(|t| t.pos.is_some()),
        }
    }

    pub fn problem(&self) -> &'a SeatingProblem {
        self.problem
    }

    pub fn constraints(&self) -> &'a ConstraintSet {
        self.constraints
    }

    /// Whether distance rules can be evaluated in this run.
    pub fn positions_complete(&self) -> bool {
        self.positions_complete
    }

    fn context<'s>(&self, state: &'s AssignmentState) -> EvalContext<'s>
    where
        'a: 's,
    {
        EvalContext {
            problem: self.problem,
            state,
            positions_complete: self.positions_complete,
        }
    }

    pub fn score(&self, state: &AssignmentState) -> SeatScore {
        let ctx = self.context(state);
        let mut hard = 0i64;
        let mut satisfied = 0.0;
        let mut total = 0.0;
        for c in self.constraints.constraints() {
            let eval = evaluate(&c.rule, &ctx);
            if !eval.applicable {
                continue;
            }
            if c.hard {
                hard += i64::from(eval.violations);
            } else {
                satisfied += c.weight * eval.satisfaction;
                total += c.weight;
            }
        }
        let soft = if total > 0.0 {
            (satisfied / total).clamp(0.0, 1.0)
        } else {
            1.0
        };
        let unassigned = (state.guest_count() - state.assigned_count()) as i64;
        SeatScore::of(-hard, -unassigned, soft)
    }

    /// Per-constraint breakdown in compiled order.
    pub fn analyze(&self, state: &AssignmentState) -> Vec<ConstraintAnalysis> {
        let ctx = self.context(state);
        self.constraints
            .constraints()
            .iter()
            .map(|c| ConstraintAnalysis {
                index: c.index,
                id: c.id.clone(),
                kind: c.kind(),
                hard: c.hard,
                weight: c.weight,
                evaluation: evaluate(&c.rule, &ctx),
            })
            .collect()
    }

    /// Violation counts per active constraint kind, in kind order.
    pub fn violations(&self, state: &AssignmentState) -> Vec<Violation> {
        let ctx = self.context(state);
        let mut counts = [0u32; ConstraintKind::COUNT];
        for c in self.constraints.constraints() {
            let eval = evaluate(&c.rule, &ctx);
            counts[c.kind().index()] += eval.violations;
        }
        self.constraints
            .kinds()
            .into_iter()
            .map(|kind| Violation {
                kind,
                count: counts[kind.index()],
            })
            .collect()
    }

    pub fn summary(&self, state: &AssignmentState) -> GenerateSummary {
        let score = self.score(state);
        GenerateSummary {
            hard_satisfied: score.hard() == 0,
            soft_score: score.soft(),
            violations: self.violations(state),
        }
    }
}
