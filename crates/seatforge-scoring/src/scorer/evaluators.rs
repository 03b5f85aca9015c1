// Per-kind satisfaction checks.
//
// `EVALUATORS` is indexed by `ConstraintKind::index()`, so supporting a new
// kind means adding one function and one table slot.

use std::collections::HashMap;

use seatforge_core::{Anchor, ConstraintKind, Rule, SeatingProblem};

use crate::state::{AssignmentState, Seat};

/// Outcome of checking one rule against a state.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Evaluation {
    /// Degree of satisfaction in `[0, 1]`.
    pub satisfaction: f64,
    pub violations: u32,
    /// `false` when the rule cannot be evaluated for this run.
    pub applicable: bool,
}

impl Evaluation {
    pub const SATISFIED: Evaluation = Evaluation {
        satisfaction: 1.0,
        violations: 0,
        applicable: true,
    };

    pub const NOT_APPLICABLE: Evaluation = Evaluation {
        satisfaction: 1.0,
        violations: 0,
        applicable: false,
    };

    fn binary(violations: u32) -> Self {
        Self {
            satisfaction: if violations == 0 { 1.0 } else { 0.0 },
            violations,
            applicable: true,
        }
    }

    fn fraction(satisfied: usize, total: usize, violations: u32) -> Self {
        Self {
            satisfaction: if total == 0 {
                1.0
            } else {
                satisfied as f64 / total as f64
            },
            violations,
            applicable: true,
        }
    }
}

/// What an evaluator may look at.
pub(crate) struct EvalContext<'a> {
    pub problem: &'a SeatingProblem,
    pub state: &'a AssignmentState,
    /// Every table carries a position.
    pub positions_complete: bool,
}

type Evaluator = fn(&Rule, &EvalContext<'_>) -> Evaluation;

pub(crate) static EVALUATORS: [Evaluator; ConstraintKind::COUNT] = [
    same_table,
    avoid_same_table,
    table_capacity,
    vip_front,
    group_together,
    distribute_group,
    lock_seat,
    zone_preference,
    max_distance,
];

pub(crate) fn evaluate(rule: &Rule, ctx: &EvalContext<'_>) -> Evaluation {
    EVALUATORS[rule.kind().index()](rule, ctx)
}

// Seated members per table, and the number of seated members.
fn table_counts(members: &[usize], state: &AssignmentState) -> (HashMap<usize, usize>, usize) {
    let mut counts = HashMap::new();
    let mut seated = 0;
    for &guest in members {
        if let Some(table) = state.table_of(guest) {
            *counts.entry(table).or_insert(0) += 1;
            seated += 1;
        }
    }
    (counts, seated)
}

fn same_table(rule: &Rule, ctx: &EvalContext<'_>) -> Evaluation {
    let Rule::SameTable { members } = rule else {
        return Evaluation::NOT_APPLICABLE;
    };
    let (counts, _) = table_counts(members, ctx.state);
    let largest = counts.values().copied().max().unwrap_or(0);
    Evaluation::binary((members.len() - largest) as u32)
}

fn avoid_same_table(rule: &Rule, ctx: &EvalContext<'_>) -> Evaluation {
    let Rule::AvoidSameTable { pairs } = rule else {
        return Evaluation::NOT_APPLICABLE;
    };
    let together = pairs
        .iter()
        .filter(|&&(a, b)| match (ctx.state.table_of(a), ctx.state.table_of(b)) {
            (Some(ta), Some(tb)) => ta == tb,
            _ => false,
        })
        .count();
    Evaluation::fraction(pairs.len() - together, pairs.len(), together as u32)
}

fn table_capacity(rule: &Rule, ctx: &EvalContext<'_>) -> Evaluation {
    let Rule::TableCapacity { tables } = rule else {
        return Evaluation::NOT_APPLICABLE;
    };
    let mut over = 0;
    for &table in tables {
        let capacity = ctx.problem.capacity(table) as usize;
        over += ctx
            .state
            .occupants(table)
            .filter(|&guest| {
                ctx.state
                    .seat_of(guest)
                    .is_some_and(|seat| seat.index as usize >= capacity)
            })
            .count() as u32;
    }
    Evaluation::binary(over)
}

fn vip_front(rule: &Rule, ctx: &EvalContext<'_>) -> Evaluation {
    let Rule::VipFront { guests, zone } = rule else {
        return Evaluation::NOT_APPLICABLE;
    };
    let misplaced = guests
        .iter()
        .filter(|&&guest| {
            !ctx.state
                .table_of(guest)
                .is_some_and(|table| ctx.problem.table(table).zone_is(zone))
        })
        .count();
    Evaluation::binary(misplaced as u32)
}

fn group_together(rule: &Rule, ctx: &EvalContext<'_>) -> Evaluation {
    let Rule::GroupTogether { members } = rule else {
        return Evaluation::NOT_APPLICABLE;
    };
    let (counts, seated) = table_counts(members, ctx.state);
    let largest = counts.values().copied().max().unwrap_or(0);
    Evaluation::fraction(largest, seated, (seated - largest) as u32)
}

// With `min_per_table`, every table holding members must hold at least that
// many. Without it, seated members should occupy as many distinct tables as
// they can.
fn distribute_group(rule: &Rule, ctx: &EvalContext<'_>) -> Evaluation {
    let Rule::DistributeGroup {
        members,
        min_per_table,
    } = rule
    else {
        return Evaluation::NOT_APPLICABLE;
    };
    let (counts, seated) = table_counts(members, ctx.state);
    match min_per_table {
        Some(min) => {
            let thin = counts
                .values()
                .filter(|&&count| count < *min as usize)
                .count();
            Evaluation::binary(thin as u32)
        }
        None => {
            let reachable = seated.min(ctx.state.table_count());
            let spread = counts.len();
            Evaluation::fraction(spread, reachable, (reachable - spread) as u32)
        }
    }
}

fn lock_seat(rule: &Rule, ctx: &EvalContext<'_>) -> Evaluation {
    let Rule::LockSeat { pins } = rule else {
        return Evaluation::NOT_APPLICABLE;
    };
    let broken = pins
        .iter()
        .filter(|pin| {
            ctx.state.occupant(Seat::new(pin.table, pin.seat)) != Some(pin.guest)
        })
        .count();
    Evaluation::binary(broken as u32)
}

fn zone_preference(rule: &Rule, ctx: &EvalContext<'_>) -> Evaluation {
    let Rule::ZonePreference { guest, zones } = rule else {
        return Evaluation::NOT_APPLICABLE;
    };
    let satisfied = ctx.state.table_of(*guest).is_some_and(|table| {
        zones
            .iter()
            .any(|zone| ctx.problem.table(table).zone_is(zone))
    });
    Evaluation::binary(u32::from(!satisfied))
}

fn max_distance(rule: &Rule, ctx: &EvalContext<'_>) -> Evaluation {
    let Rule::MaxDistance { guest, anchor, max } = rule else {
        return Evaluation::NOT_APPLICABLE;
    };
    if !ctx.positions_complete {
        return Evaluation::NOT_APPLICABLE;
    }
    let reference = match *anchor {
        Anchor::Guest(other) => ctx.state.table_of(other),
        Anchor::Table(table) => Some(table),
    };
    let within = match (ctx.state.table_of(*guest), reference) {
        (Some(from), Some(to)) => {
            match (&ctx.problem.table(from).pos, &ctx.problem.table(to).pos) {
                (Some(a), Some(b)) => a.distance(b) <= *max,
                _ => false,
            }
        }
        _ => false,
    };
    Evaluation::binary(u32::from(!within))
}
