use rand::SeedableRng;
use rand_chacha::ChaCha8Rng;
use seatforge_test::problem;

use super::*;

fn seated(guests: usize, capacities: &[u32], placements: &[(usize, usize, u32)]) -> AssignmentState {
    let problem = problem(guests, capacities);
    let mut state = AssignmentState::new(&problem);
    for &(guest, table, index) in placements {
        state.place(guest, Seat::new(table, index)).unwrap();
    }
    state
}

#[test]
fn test_neighborhood_skips_locked() {
    let mut state = seated(3, &[2, 2], &[(0, 0, 0), (1, 1, 0)]);
    state.lock_table(0).unwrap();

    let hood = Neighborhood::full(&state);
    assert_eq!(hood.guests(), &[1, 2]);
    assert_eq!(hood.tables(), &[1]);
}

#[test]
fn test_sweep_order_and_filters() {
    let state = seated(3, &[2, 1], &[(0, 0, 0), (1, 0, 1)]);
    let hood = Neighborhood::full(&state);
    let moves = hood.sweep(&state);

    assert_eq!(
        moves,
        vec![
            SeatMove::Relocate {
                guest: 0,
                to: Seat::new(1, 0)
            },
            SeatMove::Relocate {
                guest: 1,
                to: Seat::new(1, 0)
            },
            SeatMove::Relocate {
                guest: 2,
                to: Seat::new(1, 0)
            },
            // 0 and 1 share a table, so only swaps with the unseated guest.
            SeatMove::Swap { left: 0, right: 2 },
            SeatMove::Swap { left: 1, right: 2 },
        ]
    );
}

#[test]
fn test_restricted_neighborhood() {
    let state = seated(3, &[2, 2], &[(0, 0, 0), (1, 1, 0)]);
    let hood = Neighborhood::new(&state, [2], [1]);
    assert_eq!(
        hood.sweep(&state),
        vec![SeatMove::Relocate {
            guest: 2,
            to: Seat::new(1, 1)
        }]
    );

    // A swap touching a closed table is not offered.
    let hood = Neighborhood::new(&state, [0, 1], [1]);
    assert!(hood.sweep(&state).is_empty());
}

#[test]
fn test_sampling_is_deterministic() {
    let state = seated(6, &[3, 3, 3], &[(0, 0, 0), (1, 1, 0), (2, 2, 0)]);
    let hood = Neighborhood::full(&state);

    let draw = |seed: u64| {
        let mut rng = ChaCha8Rng::seed_from_u64(seed);
        (0..50)
            .map(|_| hood.sample(&state, &mut rng, 0.5))
            .collect::<Vec<_>>()
    };
    assert_eq!(draw(7), draw(7));
    assert!(draw(7).iter().flatten().count() > 0);
}

#[test]
fn test_empty_neighborhood_samples_nothing() {
    let state = seated(1, &[1], &[(0, 0, 0)]);
    let hood = Neighborhood::new(&state, [], [0]);
    let mut rng = ChaCha8Rng::seed_from_u64(1);
    assert!(hood.is_empty());
    assert_eq!(hood.sample(&state, &mut rng, 0.5), None);
}

#[test]
fn test_apply_through_director() {
    use seatforge_core::ConstraintSet;
    use seatforge_scoring::{Scorer, SeatScoreDirector};

    let problem = problem(2, &[1, 1]);
    let set = ConstraintSet::compile(&problem, &[], &[]);
    let mut state = AssignmentState::new(&problem);
    state.place(0, Seat::new(0, 0)).unwrap();
    let mut director = SeatScoreDirector::new(Scorer::new(&problem, &set), state);

    SeatMove::Swap { left: 0, right: 1 }.apply(&mut director).unwrap();
    assert_eq!(director.state().seat_of(1), Some(Seat::new(0, 0)));

    SeatMove::Relocate {
        guest: 1,
        to: Seat::new(1, 0),
    }
    .apply(&mut director)
    .unwrap();
    assert_eq!(director.state().table_of(1), Some(1));
    assert_eq!(
        SeatMove::Swap { left: 0, right: 1 }.to_string(),
        "swap #0 <-> #1"
    );
}
