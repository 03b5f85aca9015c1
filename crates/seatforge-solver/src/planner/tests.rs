use std::collections::HashSet;
use std::sync::atomic::AtomicBool;
use std::sync::Arc;
use std::time::Duration;

use seatforge_config::{AcceptorConfig, PlannerConfig};
use seatforge_core::{
    Change, Constraint, ConstraintKind, DiffRequest, GenerateRequest, Guest, IssueCode, PlanInput,
    SeatAssignment, Table,
};
use seatforge_test::{guests, scenario, tables, PlanInputBuilder};

use super::*;
use crate::termination::{Budget, ManualClock};

fn planner() -> Planner {
    Planner::default().with_clock(Arc::new(ManualClock::new()))
}

fn request(seed: u64) -> GenerateRequest {
    GenerateRequest::default().with_seed(seed)
}

fn seat(assignments: &[SeatAssignment], guest: &str) -> Option<(String, u32)> {
    assignments
        .iter()
        .find(|r| r.guest_id.as_str() == guest)
        .map(|r| (r.table_id.as_str().to_string(), r.seat_index))
}

fn table_of(assignments: &[SeatAssignment], guest: &str) -> Option<String> {
    seat(assignments, guest).map(|(table, _)| table)
}

fn assert_consistent(assignments: &[SeatAssignment]) {
    let mut seats = HashSet::new();
    let mut guests = HashSet::new();
    for record in assignments {
        assert!(
            seats.insert((record.table_id.clone(), record.seat_index)),
            "seat used twice: {record:?}"
        );
        assert!(
            guests.insert(record.guest_id.clone()),
            "guest seated twice: {record:?}"
        );
    }
}

#[test]
fn test_unconstrained_plan_seats_everyone() {
    let outcome = planner()
        .generate(&scenario::unconstrained(), &request(1))
        .unwrap();

    assert_eq!(outcome.assignments.len(), 10);
    assert!(outcome.unassigned.is_empty());
    assert!(outcome.summary.hard_satisfied);
    assert_eq!(outcome.summary.soft_score, 1.0);
    assert_eq!(outcome.termination, RunStatus::Converged);
    assert_consistent(&outcome.assignments);
}

#[test]
fn test_lock_seat_constraint_holds() {
    for respect_locks in [true, false] {
        let outcome = planner()
            .generate(
                &scenario::locked_seat(),
                &request(5).with_respect_locks(respect_locks),
            )
            .unwrap();
        assert_eq!(
            seat(&outcome.assignments, "g1"),
            Some(("t1".to_string(), 0))
        );
        assert!(outcome.summary.hard_satisfied);
        assert_eq!(outcome.summary.violations_of(ConstraintKind::LockSeat), 0);
    }
}

#[test]
fn test_forced_neighbors_reported() {
    let outcome = planner()
        .generate(&scenario::forced_neighbors(), &request(1))
        .unwrap();

    assert_eq!(outcome.assignments.len(), 2);
    assert!(outcome.summary.hard_satisfied);
    assert!(outcome.summary.soft_score < 1.0);
    assert_eq!(
        outcome.summary.violations_of(ConstraintKind::AvoidSameTable),
        1
    );
}

#[test]
fn test_overflow_guests_stay_unassigned() {
    let input = PlanInputBuilder::new()
        .guests(guests(5))
        .tables(tables(&[2, 2]))
        .build();
    let outcome = planner().generate(&input, &request(1)).unwrap();

    assert_eq!(outcome.assignments.len(), 4);
    assert_eq!(outcome.unassigned.len(), 1);
    assert_eq!(outcome.score.unassigned(), 1);
    assert!(outcome.summary.hard_satisfied);
    assert!(outcome.assignments.iter().all(|r| r.seat_index < 2));
    assert_consistent(&outcome.assignments);
}

#[test]
fn test_search_joins_split_pair() {
    let input = PlanInputBuilder::new()
        .guests(guests(4))
        .tables(tables(&[2, 2]))
        .constraint(Constraint::SameTable {
            hard: false,
            weight: 1.0,
            members: vec!["g1".into(), "g3".into()],
        })
        .build();
    let outcome = planner().generate(&input, &request(9)).unwrap();

    assert_eq!(outcome.summary.soft_score, 1.0);
    assert_eq!(
        table_of(&outcome.assignments, "g1"),
        table_of(&outcome.assignments, "g3")
    );
    assert!(outcome.stats.improvements >= 2);
}

fn grouped_input() -> PlanInput {
    let mut people = guests(12);
    for (i, guest) in people.iter_mut().enumerate() {
        guest.group = Some(if i % 2 == 0 { "east" } else { "west" }.to_string());
    }
    PlanInputBuilder::new()
        .guests(people)
        .tables(vec![
            Table::new("t1", 4).with_zone("front"),
            Table::new("t2", 4),
            Table::new("t3", 6),
        ])
        .constraint(Constraint::GroupTogether {
            hard: false,
            weight: 2.0,
            group: "east".into(),
        })
        .constraint(Constraint::AvoidSameTable {
            hard: false,
            weight: 1.0,
            pairs: vec![("g1".into(), "g2".into()), ("g3".into(), "g5".into())],
        })
        .constraint(Constraint::VipFront {
            hard: false,
            weight: 1.0,
            guests: vec!["g12".into()],
            priority_zone: "front".into(),
        })
        .build()
}

#[test]
fn test_same_seed_same_plan() {
    let input = grouped_input();
    let first = planner().generate(&input, &request(17)).unwrap();
    let second = planner().generate(&input, &request(17)).unwrap();

    assert_eq!(first.assignments, second.assignments);
    assert_eq!(first.summary, second.summary);
    assert_eq!(first.stats.iterations, second.stats.iterations);
    assert_consistent(&first.assignments);
}

#[test]
fn test_hill_climbing_config() {
    let config = PlannerConfig::default().with_acceptor(AcceptorConfig::HillClimbing);
    let planner = Planner::new(config).with_clock(Arc::new(ManualClock::new()));
    let outcome = planner.generate(&grouped_input(), &request(3)).unwrap();

    assert!(outcome.summary.hard_satisfied);
    assert_eq!(outcome.assignments.len(), 12);
    assert_consistent(&outcome.assignments);
}

#[test]
fn test_locked_record_kept_and_flagged() {
    let input = PlanInputBuilder::new()
        .guests(guests(6))
        .tables(tables(&[4, 4]))
        .locked_seat("t2", "g3", 1)
        .build();

    let outcome = planner().generate(&input, &request(2)).unwrap();
    assert_eq!(seat(&outcome.assignments, "g3"), Some(("t2".into(), 1)));
    let locked: Vec<&str> = outcome
        .assignments
        .iter()
        .filter(|r| r.locked)
        .map(|r| r.guest_id.as_str())
        .collect();
    assert_eq!(locked, vec!["g3"]);

    let fresh = planner()
        .generate(&input, &request(2).with_respect_locks(false))
        .unwrap();
    assert!(fresh.assignments.iter().all(|r| !r.locked));
    assert_eq!(fresh.assignments.len(), 6);
}

#[test]
fn test_locked_table_is_frozen() {
    let input = PlanInputBuilder::new()
        .guests(guests(4))
        .tables(vec![Table::new("t1", 4).locked(), Table::new("t2", 4)])
        .seat("t1", "g1", 0)
        .build();

    let outcome = planner().generate(&input, &request(4)).unwrap();
    let at_t1: Vec<&str> = outcome
        .assignments
        .iter()
        .filter(|r| r.table_id.as_str() == "t1")
        .map(|r| r.guest_id.as_str())
        .collect();
    assert_eq!(at_t1, vec!["g1"]);
    assert_eq!(seat(&outcome.assignments, "g1"), Some(("t1".into(), 0)));
    assert!(outcome.unassigned.is_empty());

    let fresh = planner()
        .generate(&input, &request(4).with_respect_locks(false))
        .unwrap();
    assert!(fresh.unassigned.is_empty());
    assert_eq!(fresh.assignments.len(), 4);
}

#[test]
fn test_fully_locked_plan_is_stable() {
    let first = planner()
        .generate(&grouped_input(), &request(8))
        .unwrap();
    let mut input = grouped_input();
    input.assignments = first
        .assignments
        .iter()
        .cloned()
        .map(SeatAssignment::locked)
        .collect();

    let second = planner().generate(&input, &request(21)).unwrap();
    let third = planner().generate(&input, &request(99)).unwrap();

    assert_eq!(second.assignments, input.assignments);
    assert_eq!(second.assignments, third.assignments);
    assert_eq!(second.summary, third.summary);
    assert_eq!(second.summary, first.summary);
}

#[test]
fn test_zone_preference_guides_fill() {
    let input = PlanInputBuilder::new()
        .guests(guests(3))
        .tables(vec![Table::new("t1", 4), Table::new("t2", 4).with_zone("front")])
        .constraint(Constraint::ZonePreference {
            hard: false,
            weight: 1.0,
            guest: "g2".into(),
            zones: vec!["front".into()],
        })
        .build();

    let outcome = planner()
        .generate(&input, &request(1).with_max_iterations(0))
        .unwrap();
    assert_eq!(table_of(&outcome.assignments, "g2"), Some("t2".into()));
    assert_eq!(table_of(&outcome.assignments, "g1"), Some("t1".into()));
    assert_eq!(outcome.summary.soft_score, 1.0);
    assert_eq!(
        outcome.termination,
        RunStatus::BudgetExhausted(Budget::Iterations)
    );
    assert_eq!(outcome.stats.greedy_placements, 3);
}

#[test]
fn test_time_budget_uses_injected_clock() {
    let clock = ManualClock::new().with_tick(Duration::from_millis(10));
    let planner = Planner::default().with_clock(Arc::new(clock));
    let outcome = planner
        .generate(
            &grouped_input(),
            &request(1).with_time_budget_ms(5).with_max_iterations(1_000_000),
        )
        .unwrap();

    assert_eq!(
        outcome.termination,
        RunStatus::BudgetExhausted(Budget::Time)
    );
    assert_eq!(outcome.stats.iterations, 0);
    assert_eq!(outcome.assignments.len(), 12);
}

#[test]
fn test_cancelled_run_returns_best_state() {
    let cancel = Arc::new(AtomicBool::new(true));
    let outcome = planner()
        .generate_with_cancel(&grouped_input(), &request(1), cancel)
        .unwrap();

    assert!(outcome.is_cancelled());
    assert_eq!(outcome.assignments.len(), 12);
    assert!(outcome.summary.hard_satisfied);
}

#[test]
fn test_invalid_reference_is_skipped() {
    let input = PlanInputBuilder::new()
        .guests(guests(2))
        .tables(tables(&[2]))
        .constraint_with_id(
            "ghost",
            Constraint::SameTable {
                hard: true,
                weight: 1.0,
                members: vec!["g1".into(), "g99".into()],
            },
        )
        .build();
    let outcome = planner().generate(&input, &request(1)).unwrap();

    assert_eq!(outcome.issues.len(), 1);
    assert_eq!(outcome.issues[0].code, IssueCode::InvalidConstraintReference);
    assert_eq!(outcome.issues[0].id.as_deref(), Some("ghost"));
    assert!(outcome.summary.hard_satisfied);
    assert_eq!(outcome.summary.violations_of(ConstraintKind::SameTable), 0);
}

#[test]
fn test_duplicate_ids_are_rejected() {
    let input = PlanInput::new(
        vec![Guest::new("g1"), Guest::new("g1")],
        tables(&[2]),
    );
    assert!(planner().generate(&input, &request(1)).is_err());
}

#[test]
fn test_validate_scores_without_moving() {
    let input = PlanInputBuilder::new()
        .guests(guests(3))
        .tables(tables(&[2, 2]))
        .seat("t1", "g1", 0)
        .seat("t1", "g2", 1)
        .constraint(Constraint::AvoidSameTable {
            hard: false,
            weight: 1.0,
            pairs: vec![("g1".into(), "g2".into())],
        })
        .build();
    let report = planner().validate(&input).unwrap();

    assert!(report.summary.hard_satisfied);
    assert_eq!(report.summary.soft_score, 0.0);
    assert_eq!(
        report.summary.violations_of(ConstraintKind::AvoidSameTable),
        1
    );
    assert_eq!(report.unassigned, vec!["g3".into()]);
    assert_eq!(report.score.unassigned(), 1);
    assert_eq!(report.constraints.len(), 2);
    assert_eq!(report.constraints[0].kind, ConstraintKind::TableCapacity);
    assert_eq!(report.constraints[0].index, None);
    assert_eq!(report.constraints[1].index, Some(0));
}

fn committed_unconstrained() -> PlanInput {
    let input = scenario::unconstrained();
    let outcome = planner().generate(&input, &request(1)).unwrap();
    input.with_assignments(outcome.assignments)
}

#[test]
fn test_diff_added_guest_touches_one_table() {
    let committed = committed_unconstrained();
    let (input, changes) = scenario::added_guest(&committed);
    let outcome = planner()
        .diff(&input, &DiffRequest::new(changes).with_seed(1))
        .unwrap();

    assert_eq!(outcome.affected_guests, vec!["g11".into()]);
    let landed = table_of(&outcome.plan.assignments, "g11").unwrap();
    assert_eq!(outcome.affected_tables.len(), 1);
    assert_eq!(outcome.affected_tables[0].as_str(), landed);
    for record in &committed.assignments {
        assert_eq!(
            seat(&outcome.plan.assignments, record.guest_id.as_str()),
            Some((record.table_id.as_str().to_string(), record.seat_index))
        );
    }
    let response = outcome.response();
    assert!(response.summary.hard_satisfied);
    assert_eq!(response.summary.soft_score, 1.0);
}

#[test]
fn test_diff_removed_guest() {
    let committed = committed_unconstrained();
    let former = table_of(&committed.assignments, "g3").unwrap();
    let changes = vec![Change::RemoveGuest {
        guest_id: "g3".into(),
    }];
    let outcome = planner()
        .diff(&committed, &DiffRequest::new(changes).with_seed(1))
        .unwrap();

    assert_eq!(outcome.affected_guests, vec!["g3".into()]);
    assert_eq!(outcome.affected_tables, vec![former.as_str().into()]);
    assert_eq!(outcome.plan.assignments.len(), 9);
    assert_eq!(seat(&outcome.plan.assignments, "g3"), None);
    for record in committed.assignments.iter().filter(|r| r.guest_id.as_str() != "g3") {
        assert!(outcome.plan.assignments.contains(record));
    }
}

#[test]
fn test_diff_shrunk_table_reseats_displaced() {
    let committed = PlanInputBuilder::new()
        .guests(guests(6))
        .tables(tables(&[4, 4]))
        .seat("t1", "g1", 0)
        .seat("t1", "g2", 1)
        .seat("t1", "g3", 2)
        .seat("t1", "g4", 3)
        .seat("t2", "g5", 0)
        .seat("t2", "g6", 1)
        .build();
    let changes = vec![Change::TableCapacity {
        table_id: "t1".into(),
        capacity: 2,
    }];
    let outcome = planner()
        .diff(&committed, &DiffRequest::new(changes).with_seed(1))
        .unwrap();

    assert_eq!(outcome.affected_guests, vec!["g3".into(), "g4".into()]);
    assert_eq!(outcome.affected_tables, vec!["t1".into(), "t2".into()]);
    assert_eq!(seat(&outcome.plan.assignments, "g1"), Some(("t1".into(), 0)));
    assert_eq!(seat(&outcome.plan.assignments, "g5"), Some(("t2".into(), 0)));
    assert_eq!(table_of(&outcome.plan.assignments, "g3"), Some("t2".into()));
    assert_eq!(table_of(&outcome.plan.assignments, "g4"), Some("t2".into()));
    assert!(outcome.plan.unassigned.is_empty());
    assert_consistent(&outcome.plan.assignments);
}

#[test]
fn test_diff_pulls_in_group_members() {
    let committed = PlanInputBuilder::new()
        .guests(guests(3))
        .tables(tables(&[2, 2]))
        .seat("t1", "g1", 0)
        .seat("t2", "g2", 0)
        .constraint(Constraint::SameTable {
            hard: false,
            weight: 1.0,
            members: vec!["g1".into(), "g3".into()],
        })
        .build();
    let changes = vec![Change::AddGuest {
        guest_id: "g3".into(),
    }];
    let outcome = planner()
        .diff(&committed, &DiffRequest::new(changes).with_seed(1))
        .unwrap();

    assert_eq!(outcome.affected_guests, vec!["g1".into(), "g3".into()]);
    assert_eq!(outcome.affected_tables, vec!["t1".into()]);
    assert_eq!(seat(&outcome.plan.assignments, "g2"), Some(("t2".into(), 0)));
    assert_eq!(outcome.plan.summary.soft_score, 1.0);
}

#[test]
fn test_diff_constraint_update_moves_guest() {
    let committed = PlanInputBuilder::new()
        .guests(guests(2))
        .tables(vec![Table::new("t1", 2), Table::new("t2", 2).with_zone("front")])
        .seat("t1", "g1", 0)
        .seat("t1", "g2", 1)
        .constraint_with_id(
            "front-g2",
            Constraint::ZonePreference {
                hard: false,
                weight: 1.0,
                guest: "g2".into(),
                zones: vec!["front".into()],
            },
        )
        .build();
    let changes = vec![Change::ConstraintUpdate {
        constraint_id: "front-g2".into(),
    }];
    let outcome = planner()
        .diff(&committed, &DiffRequest::new(changes).with_seed(1))
        .unwrap();

    assert_eq!(outcome.affected_guests, vec!["g2".into()]);
    assert_eq!(outcome.affected_tables, vec!["t1".into(), "t2".into()]);
    assert_eq!(seat(&outcome.plan.assignments, "g1"), Some(("t1".into(), 0)));
    assert_eq!(table_of(&outcome.plan.assignments, "g2"), Some("t2".into()));
    assert_eq!(outcome.plan.summary.soft_score, 1.0);
}

#[test]
fn test_diff_avoid_update_separates_shared_table() {
    let committed = PlanInputBuilder::new()
        .guests(guests(3))
        .tables(tables(&[4, 4]))
        .seat("t1", "g1", 0)
        .seat("t1", "g2", 1)
        .seat("t2", "g3", 0)
        .constraint_with_id(
            "apart",
            Constraint::AvoidSameTable {
                hard: false,
                weight: 1.0,
                pairs: vec![("g1".into(), "g2".into())],
            },
        )
        .build();
    let changes = vec![Change::ConstraintUpdate {
        constraint_id: "apart".into(),
    }];
    let outcome = planner()
        .diff(&committed, &DiffRequest::new(changes).with_seed(1))
        .unwrap();

    assert_eq!(outcome.plan.summary.soft_score, 1.0);
    assert_ne!(
        table_of(&outcome.plan.assignments, "g1"),
        table_of(&outcome.plan.assignments, "g2")
    );
    assert_eq!(seat(&outcome.plan.assignments, "g3"), Some(("t2".into(), 0)));
    assert_eq!(outcome.affected_guests, vec!["g1".into(), "g2".into()]);
    assert_eq!(outcome.affected_tables, vec!["t1".into(), "t2".into()]);
    assert_consistent(&outcome.plan.assignments);
}

#[test]
fn test_diff_leaves_unseated_guests_without_freed_seats() {
    let committed = PlanInputBuilder::new()
        .guests(guests(3))
        .tables(tables(&[2]))
        .seat("t1", "g1", 0)
        .seat("t1", "g2", 1)
        .build();

    let unrelated = vec![Change::ConstraintUpdate {
        constraint_id: "gone".into(),
    }];
    let outcome = planner()
        .diff(&committed, &DiffRequest::new(unrelated).with_seed(1))
        .unwrap();
    assert!(outcome.affected_guests.is_empty());
    assert!(outcome.affected_tables.is_empty());
    assert_eq!(outcome.plan.unassigned, vec!["g3".into()]);

    let grown = vec![Change::TableCapacity {
        table_id: "t1".into(),
        capacity: 3,
    }];
    let outcome = planner()
        .diff(&committed, &DiffRequest::new(grown).with_seed(1))
        .unwrap();
    assert_eq!(outcome.affected_guests, vec!["g3".into()]);
    assert_eq!(seat(&outcome.plan.assignments, "g3"), Some(("t1".into(), 2)));
    assert!(outcome.plan.unassigned.is_empty());
}

#[test]
fn test_diff_respects_locked_records() {
    let committed = PlanInputBuilder::new()
        .guests(guests(3))
        .tables(tables(&[2, 2]))
        .locked_seat("t1", "g1", 0)
        .constraint_with_id(
            "apart",
            Constraint::AvoidSameTable {
                hard: false,
                weight: 1.0,
                pairs: vec![("g1".into(), "g2".into())],
            },
        )
        .build();
    let changes = vec![
        Change::AddGuest {
            guest_id: "g2".into(),
        },
        Change::ConstraintUpdate {
            constraint_id: "apart".into(),
        },
    ];
    let outcome = planner()
        .diff(&committed, &DiffRequest::new(changes).with_seed(1))
        .unwrap();

    let g1 = outcome
        .plan
        .assignments
        .iter()
        .find(|r| r.guest_id.as_str() == "g1")
        .unwrap();
    assert_eq!((g1.table_id.as_str(), g1.seat_index, g1.locked), ("t1", 0, true));
    assert_eq!(table_of(&outcome.plan.assignments, "g2"), Some("t2".into()));
}

#[test]
fn test_outcome_wire_shape() {
    let outcome = planner()
        .generate(&scenario::unconstrained(), &request(1))
        .unwrap();
    let json = serde_json::to_value(&outcome).unwrap();

    assert_eq!(json["termination"]["status"], "CONVERGED");
    assert_eq!(json["summary"]["hardSatisfied"], true);
    assert_eq!(json["assignments"][0]["tableId"], "t1");
    assert!(json["stats"]["iterations"].is_u64());

    let response = serde_json::to_value(outcome.response("job-1")).unwrap();
    assert_eq!(response["jobId"], "job-1");
    assert_eq!(response["summary"]["softScore"], 1.0);
}
