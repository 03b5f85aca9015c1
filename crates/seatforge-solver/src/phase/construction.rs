//! Greedy seat fill.

use tracing::debug;

use seatforge_core::SeatForgeError;
use seatforge_scoring::{ScoreDirector, Seat};

use crate::scope::SolverScope;

/// Seats guests one by one, in the given order, on the first free seat of
/// the first table that has one.
///
/// Tables whose zone matches one of the guest's preferred zones (from
/// `ZONE_PREFERENCE` and `VIP_FRONT` rules) are tried first. Guests that find
/// no free seat stay unseated.
#[derive(Debug, Clone)]
pub struct GreedyFill {
    guests: Vec<usize>,
    tables: Vec<usize>,
}

impl GreedyFill {
    pub fn new(guests: Vec<usize>, tables: Vec<usize>) -> Self {
        Self { guests, tables }
    }

    /// Runs the fill and returns the guests it seated.
    pub fn run(&self, scope: &mut SolverScope<'_>) -> Result<Vec<usize>, SeatForgeError> {
        let scorer = *scope.director().scorer();
        let problem = scorer.problem();
        let constraints = scorer.constraints();
        let mut placed = Vec::new();

        for &guest in &self.guests {
            if scope.state().seat_of(guest).is_some() {
                continue;
            }
            let zones = constraints.preferred_zones(guest);
            let state = scope.state();
            let preferred = self
                .tables
                .iter()
                .filter(|&&t| zones.iter().any(|zone| problem.table(t).zone_is(zone)))
                .find_map(|&t| state.first_free_seat(t));
            let seat: Option<Seat> =
                preferred.or_else(|| self.tables.iter().find_map(|&t| state.first_free_seat(t)));

            let Some(seat) = seat else {
                debug!(
                    event = "greedy_unseated",
                    guest = %problem.guest(guest).id,
                );
                continue;
            };
            scope.director_mut().place(guest, seat)?;
            placed.push(guest);
        }

        scope.stats_mut().greedy_placements += placed.len() as u64;
        Ok(placed)
    }
}
