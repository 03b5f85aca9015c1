//! Tests for the working seat assignment.

use super::*;
use seatforge_test::problem;

fn state(guests: usize, capacities: &[u32]) -> (SeatingProblem, AssignmentState) {
    let problem = problem(guests, capacities);
    let state = AssignmentState::new(&problem);
    (problem, state)
}

#[test]
fn test_new_state_is_empty() {
    let (_, state) = state(3, &[2, 4]);
    assert_eq!(state.guest_count(), 3);
    assert_eq!(state.table_count(), 2);
    assert_eq!(state.capacity(1), 4);
    assert_eq!(state.unassigned(), vec![0, 1, 2]);
    assert_eq!(state.free_seats(0).count(), 2);
    assert!(state.is_consistent());
}

#[test]
fn test_place_and_move() {
    let (_, mut state) = state(2, &[2, 2]);
    state.place(0, Seat::new(0, 1)).unwrap();
    assert_eq!(state.seat_of(0), Some(Seat::new(0, 1)));
    assert_eq!(state.occupant(Seat::new(0, 1)), Some(0));

    state.place(0, Seat::new(1, 0)).unwrap();
    assert_eq!(state.occupant(Seat::new(0, 1)), None);
    assert_eq!(state.table_of(0), Some(1));
    assert_eq!(state.first_free_seat(1), Some(Seat::new(1, 1)));

    // Placing on the held seat changes nothing.
    state.place(0, Seat::new(1, 0)).unwrap();
    assert_eq!(state.assigned_count(), 1);
    assert!(state.is_consistent());
}

#[test]
fn test_place_on_occupied_seat_fails() {
    let (_, mut state) = state(2, &[2]);
    state.place(0, Seat::new(0, 0)).unwrap();
    let err = state.place(1, Seat::new(0, 0)).unwrap_err();
    assert_eq!(
        err,
        StateError::SeatOccupied {
            table: 0,
            seat: 0,
            occupant: 0
        }
    );
    assert_eq!(err.code(), "SEAT_OCCUPIED");
    assert_eq!(state.seat_of(1), None);
}

#[test]
fn test_place_out_of_range() {
    let (_, mut state) = state(1, &[2]);
    assert!(matches!(
        state.place(0, Seat::new(0, 2)),
        Err(StateError::SeatOutOfRange { capacity: 2, .. })
    ));
    assert_eq!(
        state.place(0, Seat::new(3, 0)),
        Err(StateError::UnknownTable(3))
    );
    assert_eq!(
        state.place(5, Seat::new(0, 0)),
        Err(StateError::UnknownGuest(5))
    );
}

#[test]
fn test_locked_table_is_frozen() {
    let (_, mut state) = state(3, &[2, 2]);
    state.place(0, Seat::new(0, 0)).unwrap();
    state.place(1, Seat::new(1, 0)).unwrap();
    state.lock_table(0).unwrap();

    assert_eq!(
        state.place(2, Seat::new(0, 1)),
        Err(StateError::TableLocked { table: 0 })
    );
    assert_eq!(state.remove(0), Err(StateError::TableLocked { table: 0 }));
    assert_eq!(state.swap(0, 1), Err(StateError::TableLocked { table: 0 }));
    assert_eq!(
        state.place(0, Seat::new(1, 1)),
        Err(StateError::TableLocked { table: 0 })
    );
    // The current occupant "placed" on its own seat is accepted.
    state.place(0, Seat::new(0, 0)).unwrap();

    assert_eq!(state.free_seats(0).count(), 0);
    assert!(!state.is_movable(0));
    assert!(state.is_movable(1));
    assert!(state.is_movable(2));
}

#[test]
fn test_pinned_guest_stays() {
    let (_, mut state) = state(2, &[2]);
    state.pin(0, Seat::new(0, 0)).unwrap();
    assert!(state.is_pinned(0));
    assert!(!state.is_movable(0));

    assert_eq!(
        state.remove(0),
        Err(StateError::SeatLocked { table: 0, seat: 0 })
    );
    assert_eq!(
        state.place(0, Seat::new(0, 1)),
        Err(StateError::SeatLocked { table: 0, seat: 0 })
    );
    state.place(1, Seat::new(0, 1)).unwrap();
    assert!(state.swap(1, 0).is_err());
    assert_eq!(state.seat_of(0), Some(Seat::new(0, 0)));
}

#[test]
fn test_remove() {
    let (_, mut state) = state(2, &[2]);
    assert_eq!(state.remove(1), Ok(None));
    state.place(1, Seat::new(0, 1)).unwrap();
    assert_eq!(state.remove(1), Ok(Some(Seat::new(0, 1))));
    assert_eq!(state.occupant(Seat::new(0, 1)), None);
    assert_eq!(state.unassigned(), vec![0, 1]);
}

#[test]
fn test_swap_both_seated() {
    let (_, mut state) = state(2, &[1, 1]);
    state.place(0, Seat::new(0, 0)).unwrap();
    state.place(1, Seat::new(1, 0)).unwrap();
    state.swap(0, 1).unwrap();
    assert_eq!(state.seat_of(0), Some(Seat::new(1, 0)));
    assert_eq!(state.seat_of(1), Some(Seat::new(0, 0)));
    assert!(state.is_consistent());
}

#[test]
fn test_swap_with_unseated_guest() {
    let (_, mut state) = state(2, &[1]);
    state.place(0, Seat::new(0, 0)).unwrap();
    state.swap(1, 0).unwrap();
    assert_eq!(state.seat_of(1), Some(Seat::new(0, 0)));
    assert_eq!(state.seat_of(0), None);
    assert_eq!(state.unassigned(), vec![0]);
    assert!(state.is_consistent());

    state.swap(0, 0).unwrap();
    assert_eq!(state.seat_of(1), Some(Seat::new(0, 0)));
}

#[test]
fn test_restore_replays_old_positions() {
    let (_, mut state) = state(3, &[2, 1]);
    state.place(0, Seat::new(0, 0)).unwrap();
    state.place(1, Seat::new(0, 1)).unwrap();
    let before = state.clone();

    let saved = [(0, state.seat_of(0)), (1, state.seat_of(1)), (2, None)];
    state.swap(0, 1).unwrap();
    state.place(2, Seat::new(1, 0)).unwrap();
    state.remove(0).unwrap();

    state.restore(&saved);
    assert_eq!(state, before);
}

#[test]
fn test_invariant_holds_under_mixed_operations() {
    let (_, mut state) = state(6, &[3, 2]);
    for guest in 0..5 {
        let seat = (0..2)
            .find_map(|t| state.first_free_seat(t))
            .unwrap();
        state.place(guest, seat).unwrap();
    }
    state.swap(0, 4).unwrap();
    state.swap(5, 2).unwrap();
    state.remove(3).unwrap();
    state.place(2, Seat::new(1, 1)).unwrap_err();
    state.place(0, Seat::new(0, 2)).unwrap_err();

    assert!(state.is_consistent());
    let mut seen_guests = std::collections::HashSet::new();
    let mut seen_seats = std::collections::HashSet::new();
    for guest in 0..state.guest_count() {
        if let Some(seat) = state.seat_of(guest) {
            assert!(seen_guests.insert(guest));
            assert!(seen_seats.insert(seat));
        }
    }
    assert_eq!(state.unassigned(), vec![2, 3]);
}

#[test]
fn test_records() {
    let (problem, mut state) = state(3, &[2, 2]);
    state.place(2, Seat::new(0, 1)).unwrap();
    state.place(0, Seat::new(1, 0)).unwrap();

    let records = state.records(&problem, &[0]);
    assert_eq!(records.len(), 2);
    assert_eq!(records[0], SeatAssignment::new("t1", "g3", 1));
    assert_eq!(records[1], SeatAssignment::new("t2", "g1", 0).locked());
}
