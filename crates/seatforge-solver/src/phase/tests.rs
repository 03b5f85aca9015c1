use std::sync::Arc;

use seatforge_core::{Constraint, ConstraintEntry, ConstraintSet, Guest, SeatingProblem, Table};
use seatforge_scoring::{AssignmentState, Scorer, Seat, SeatScoreDirector};
use seatforge_test::{guests, problem};

use super::construction::GreedyFill;
use super::localsearch::{HillClimbingAcceptor, LocalSearchPhase, SimulatedAnnealingAcceptor};
use crate::heuristic::Neighborhood;
use crate::scope::SolverScope;
use crate::termination::{Budget, ManualClock, OrTermination, RunStatus, StepCountTermination};

fn scope<'a>(scorer: Scorer<'a>, state: AssignmentState) -> SolverScope<'a> {
    SolverScope::new(
        SeatScoreDirector::new(scorer, state),
        5,
        Arc::new(ManualClock::new()),
        16,
    )
}

fn steps(limit: u64) -> OrTermination {
    OrTermination::new().with(StepCountTermination::new(limit))
}

#[test]
fn test_fill_in_input_order() {
    let problem = problem(5, &[2, 2]);
    let constraints = ConstraintSet::compile(&problem, &[], &[]);
    let mut scope = scope(
        Scorer::new(&problem, &constraints),
        AssignmentState::new(&problem),
    );

    let placed = GreedyFill::new((0..5).collect(), vec![0, 1])
        .run(&mut scope)
        .unwrap();
    assert_eq!(placed, vec![0, 1, 2, 3]);
    assert_eq!(scope.state().seat_of(0), Some(Seat::new(0, 0)));
    assert_eq!(scope.state().seat_of(2), Some(Seat::new(1, 0)));
    assert_eq!(scope.state().seat_of(4), None);
    assert_eq!(scope.stats().greedy_placements, 4);
}

#[test]
fn test_fill_prefers_vip_zone() {
    let problem = SeatingProblem::new(
        guests(2),
        vec![Table::new("t1", 2), Table::new("t2", 2).with_zone("stage")],
    )
    .unwrap();
    let entries = vec![ConstraintEntry::from(Constraint::VipFront {
        hard: false,
        weight: 1.0,
        guests: vec!["g2".into()],
        priority_zone: "stage".into(),
    })];
    let constraints = ConstraintSet::compile(&problem, &entries, &[]);
    let mut scope = scope(
        Scorer::new(&problem, &constraints),
        AssignmentState::new(&problem),
    );

    GreedyFill::new(vec![0, 1], vec![0, 1]).run(&mut scope).unwrap();
    assert_eq!(scope.state().table_of(0), Some(0));
    assert_eq!(scope.state().table_of(1), Some(1));
}

#[test]
fn test_fill_skips_locked_tables() {
    let problem = SeatingProblem::new(
        vec![Guest::new("a"), Guest::new("b")],
        vec![Table::new("t1", 2), Table::new("t2", 2)],
    )
    .unwrap();
    let constraints = ConstraintSet::compile(&problem, &[], &[]);
    let mut state = AssignmentState::new(&problem);
    state.lock_table(0).unwrap();
    let mut scope = scope(Scorer::new(&problem, &constraints), state);

    GreedyFill::new(vec![0, 1], vec![0, 1]).run(&mut scope).unwrap();
    assert_eq!(scope.state().occupied_count(0), 0);
    assert_eq!(scope.state().occupied_count(1), 2);
}

#[test]
fn test_empty_neighborhood_converges() {
    let problem = problem(1, &[1]);
    let constraints = ConstraintSet::compile(&problem, &[], &[]);
    let mut state = AssignmentState::new(&problem);
    state.pin(0, Seat::new(0, 0)).unwrap();
    let neighborhood = Neighborhood::full(&state);
    let mut scope = scope(Scorer::new(&problem, &constraints), state);

    let status = LocalSearchPhase::new(
        neighborhood,
        Box::new(HillClimbingAcceptor::new()),
        steps(100),
    )
    .solve(&mut scope)
    .unwrap();
    assert_eq!(status, RunStatus::Converged);
    assert_eq!(scope.iterations(), 0);
}

#[test]
fn test_step_budget_stops_search() {
    let problem = problem(6, &[3, 3, 3]);
    let constraints = ConstraintSet::compile(&problem, &[], &[]);
    let mut state = AssignmentState::new(&problem);
    for guest in 0..6 {
        state.place(guest, Seat::new(guest / 3, (guest % 3) as u32)).unwrap();
    }
    let neighborhood = Neighborhood::full(&state);
    let mut scope = scope(Scorer::new(&problem, &constraints), state);

    let status = LocalSearchPhase::new(
        neighborhood,
        Box::new(SimulatedAnnealingAcceptor::default()),
        steps(10),
    )
    .with_stale_sweep_after(1_000)
    .solve(&mut scope)
    .unwrap();
    assert_eq!(status, RunStatus::BudgetExhausted(Budget::Iterations));
    assert_eq!(scope.iterations(), 10);
    assert!(scope.state().is_consistent());
}

#[test]
fn test_sweep_reaches_optimum_and_converges() {
    let problem = problem(4, &[2, 2]);
    let entries = vec![ConstraintEntry::from(Constraint::SameTable {
        hard: true,
        weight: 1.0,
        members: vec!["g1".into(), "g3".into()],
    })];
    let constraints = ConstraintSet::compile(&problem, &entries, &[]);
    let mut state = AssignmentState::new(&problem);
    for guest in 0..4 {
        state.place(guest, Seat::new(guest / 2, (guest % 2) as u32)).unwrap();
    }
    let neighborhood = Neighborhood::full(&state);
    let scorer = Scorer::new(&problem, &constraints);
    let mut scope = scope(scorer, state);
    assert!(!scope.calculate_score().is_feasible());

    let status = LocalSearchPhase::new(
        neighborhood,
        Box::new(HillClimbingAcceptor::new()),
        steps(10_000),
    )
    .with_swap_probability(0.0)
    .with_stale_sweep_after(1)
    .solve(&mut scope)
    .unwrap();

    assert_eq!(status, RunStatus::Converged);
    assert!(scope.stats().sweeps >= 1);
    let (state, score, _) = scope.finish();
    assert!(score.is_feasible());
    assert_eq!(state.table_of(0), state.table_of(2));
}

#[test]
fn test_pinned_guest_never_moves() {
    let problem = problem(4, &[2, 2]);
    let entries = vec![ConstraintEntry::from(Constraint::AvoidSameTable {
        hard: false,
        weight: 1.0,
        pairs: vec![("g1".into(), "g2".into())],
    })];
    let constraints = ConstraintSet::compile(&problem, &entries, &[]);
    let mut state = AssignmentState::new(&problem);
    state.pin(0, Seat::new(0, 0)).unwrap();
    state.place(1, Seat::new(0, 1)).unwrap();
    state.place(2, Seat::new(1, 0)).unwrap();
    state.place(3, Seat::new(1, 1)).unwrap();
    let neighborhood = Neighborhood::full(&state);
    let mut scope = scope(Scorer::new(&problem, &constraints), state);

    LocalSearchPhase::new(
        neighborhood,
        Box::new(SimulatedAnnealingAcceptor::default()),
        steps(500),
    )
    .solve(&mut scope)
    .unwrap();

    assert_eq!(scope.state().seat_of(0), Some(Seat::new(0, 0)));
    let (best, score, _) = scope.finish();
    assert_eq!(best.seat_of(0), Some(Seat::new(0, 0)));
    assert_ne!(best.table_of(1), Some(0));
    assert_eq!(score.soft(), 1.0);
}
