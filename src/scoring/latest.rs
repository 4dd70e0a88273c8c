//! Latest feasible departure tables.
//!
//! # Algorithm
//!
//! For a fixed flight set, destination `d` and deadline `T`:
//!
//! 1. Sort flights by departure descending (ties: arrival descending).
//! 2. `L[d] = T`, `L[c] = UNREACHABLE` for every other city.
//! 3. Scan flights once; for `o → x` leaving at `dep` and landing at
//!    `arr`, if `L[x]` is reachable, `L[x] >= arr` and `dep > L[o]`,
//!    set `L[o] = dep`.
//!
//! Every connection out of `x` usable by a flight landing at `arr`
//! departs at or after `arr > dep`, so it has already been scanned when
//! the flight is reached. One pass therefore yields the true maximum.
//!
//! # Complexity
//! O(F log F) for the sort (shared), O(N + F) per table.

use rayon::prelude::*;
use serde::Serialize;

use crate::models::{Flight, Minutes, UNREACHABLE};

/// Flights ordered latest-departure first. Read-only once built, so one
/// board is shared by every table computation.
#[derive(Debug, Clone)]
pub struct DepartureBoard {
    flights: Vec<Flight>,
}

impl DepartureBoard {
    /// Sorts `flights` latest-departure first.
    pub fn new(flights: impl IntoIterator<Item = Flight>) -> Self {
        let mut flights: Vec<Flight> = flights.into_iter().collect();
        flights.sort_by(|a, b| {
            b.departure
                .cmp(&a.departure)
                .then_with(|| b.arrival.cmp(&a.arrival))
        });
        Self { flights }
    }

    /// Flights in scan order.
    pub fn flights(&self) -> &[Flight] {
        &self.flights
    }

    /// Number of flights.
    pub fn len(&self) -> usize {
        self.flights.len()
    }

    pub fn is_empty(&self) -> bool {
        self.flights.is_empty()
    }

    /// Computes the table for one destination and deadline.
    ///
    /// All flight city indices must be below `city_count`.
    pub fn latest_departures(
        &self,
        city_count: usize,
        destination: usize,
        deadline: Minutes,
    ) -> LatestDepartureTable {
        let mut latest = vec![UNREACHABLE; city_count];
        latest[destination] = deadline;
        for f in &self.flights {
            let onward = latest[f.destination];
            if onward != UNREACHABLE && onward >= f.arrival && f.departure > latest[f.origin] {
                latest[f.origin] = f.departure;
            }
        }
        LatestDepartureTable {
            destination,
            deadline,
            latest,
        }
    }
}

/// Latest feasible departure from every city towards one destination.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct LatestDepartureTable {
    destination: usize,
    deadline: Minutes,
    latest: Vec<Minutes>,
}

impl LatestDepartureTable {
    pub fn destination(&self) -> usize {
        self.destination
    }

    pub fn deadline(&self) -> Minutes {
        self.deadline
    }

    /// Latest departure from `source`, or `None` if unreachable.
    pub fn get(&self, source: usize) -> Option<Minutes> {
        match self.latest[source] {
            UNREACHABLE => None,
            t => Some(t),
        }
    }

    /// Raw value including the [`UNREACHABLE`] sentinel. Suitable for
    /// direct comparison: the sentinel orders below every valid time.
    #[inline]
    pub fn raw(&self, source: usize) -> Minutes {
        self.latest[source]
    }

    /// Number of cities covered.
    pub fn len(&self) -> usize {
        self.latest.len()
    }

    pub fn is_empty(&self) -> bool {
        self.latest.is_empty()
    }
}

/// Tables for every destination and every deadline of one flight set.
#[derive(Debug, Clone, Serialize)]
pub struct DepartureProfile {
    deadlines: Vec<Minutes>,
    /// Indexed `[destination][deadline index]`.
    tables: Vec<Vec<LatestDepartureTable>>,
}

impl DepartureProfile {
    /// Computes all tables, one rayon task per destination.
    pub fn compute(board: &DepartureBoard, city_count: usize, deadlines: &[Minutes]) -> Self {
        let tables = (0..city_count)
            .into_par_iter()
            .map(|dest| {
                deadlines
                    .iter()
                    .map(|&t| board.latest_departures(city_count, dest, t))
                    .collect()
            })
            .collect();
        Self {
            deadlines: deadlines.to_vec(),
            tables,
        }
    }

    pub fn deadlines(&self) -> &[Minutes] {
        &self.deadlines
    }

    /// Number of destinations covered.
    pub fn city_count(&self) -> usize {
        self.tables.len()
    }

    /// Table for a destination and deadline index.
    pub fn table(&self, destination: usize, deadline_idx: usize) -> &LatestDepartureTable {
        &self.tables[destination][deadline_idx]
    }

    /// All tables towards one destination, in deadline order.
    pub fn tables_to(&self, destination: usize) -> &[LatestDepartureTable] {
        &self.tables[destination]
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rand::rngs::StdRng;
    use rand::{Rng, SeedableRng};

    fn chain() -> DepartureBoard {
        // 0 → 1 → 2 with a later, too-late direct alternative 0 → 2.
        DepartureBoard::new(vec![
            Flight::new(0, 360, 1, 420),
            Flight::new(1, 430, 2, 500),
            Flight::new(1, 600, 2, 670),
            Flight::new(0, 650, 2, 720),
        ])
    }

    #[test]
    fn test_board_is_sorted_latest_first() {
        let board = DepartureBoard::new(vec![
            Flight::new(0, 360, 1, 420),
            Flight::new(1, 400, 0, 460),
            Flight::new(2, 400, 0, 480),
        ]);
        let deps: Vec<(Minutes, Minutes)> = board
            .flights()
            .iter()
            .map(|f| (f.departure, f.arrival))
            .collect();
        assert_eq!(deps, vec![(400, 480), (400, 460), (360, 420)]);
    }

    #[test]
    fn test_destination_entry_is_deadline() {
        let t = chain().latest_departures(3, 2, 660);
        assert_eq!(t.get(2), Some(660));
        assert_eq!(t.deadline(), 660);
        assert_eq!(t.destination(), 2);
    }

    #[test]
    fn test_connections_and_deadline() {
        let board = chain();
        // Deadline 11:00 (660): only 1→2 at 430 lands in time; 0 departs 360.
        let t = board.latest_departures(3, 2, 660);
        assert_eq!(t.get(1), Some(430));
        assert_eq!(t.get(0), Some(360));

        // Deadline 12:00 (720): direct 0→2 at 650 and 1→2 at 600.
        let t = board.latest_departures(3, 2, 720);
        assert_eq!(t.get(0), Some(650));
        assert_eq!(t.get(1), Some(600));

        // Nothing flies into city 0.
        let t = board.latest_departures(3, 0, 720);
        assert_eq!(t.get(1), None);
        assert_eq!(t.raw(1), UNREACHABLE);
        assert_eq!(t.get(0), Some(720));
    }

    #[test]
    fn test_missed_connection() {
        // Arrives at 1 at 500, onward leg leaves at 430.
        let board = DepartureBoard::new(vec![
            Flight::new(0, 400, 1, 500),
            Flight::new(1, 430, 2, 500),
        ]);
        let t = board.latest_departures(3, 2, 1260);
        assert_eq!(t.get(1), Some(430));
        assert_eq!(t.get(0), None);
    }

    #[test]
    fn test_empty_board() {
        let t = DepartureBoard::new(Vec::new()).latest_departures(4, 1, 900);
        assert_eq!(t.len(), 4);
        assert_eq!(t.get(1), Some(900));
        assert!((0..4).filter(|&c| c != 1).all(|c| t.get(c).is_none()));
    }

    /// Exhaustive relaxation until fixpoint; slow but obviously correct.
    fn brute_force(flights: &[Flight], n: usize, dest: usize, deadline: Minutes) -> Vec<Minutes> {
        let mut latest = vec![UNREACHABLE; n];
        latest[dest] = deadline;
        loop {
            let mut changed = false;
            for f in flights {
                let onward = latest[f.destination];
                if onward != UNREACHABLE && onward >= f.arrival && f.departure > latest[f.origin] {
                    latest[f.origin] = f.departure;
                    changed = true;
                }
            }
            if !changed {
                return latest;
            }
        }
    }

    #[test]
    fn test_single_pass_matches_fixpoint() {
        let mut rng = StdRng::seed_from_u64(7);
        let n = 6;
        for _ in 0..50 {
            let flights: Vec<Flight> = (0..40)
                .map(|_| {
                    let a = rng.random_range(0..n);
                    let mut b = rng.random_range(0..n);
                    if a == b {
                        b = (b + 1) % n;
                    }
                    let dep = 360 + 5 * rng.random_range(0..150);
                    let dur = 5 * rng.random_range(8..30);
                    Flight::new(a, dep, b, dep + dur)
                })
                .collect();
            let board = DepartureBoard::new(flights.clone());
            for dest in 0..n {
                for deadline in [660, 900, 1260] {
                    let table = board.latest_departures(n, dest, deadline);
                    let expected = brute_force(&flights, n, dest, deadline);
                    let got: Vec<Minutes> = (0..n).map(|c| table.raw(c)).collect();
                    assert_eq!(got, expected);
                }
            }
        }
    }

    #[test]
    fn test_profile_shape() {
        let profile = DepartureProfile::compute(&chain(), 3, &[660, 720]);
        assert_eq!(profile.city_count(), 3);
        assert_eq!(profile.deadlines(), &[660, 720]);
        assert_eq!(profile.tables_to(2).len(), 2);
        assert_eq!(profile.table(2, 1).get(0), Some(650));
        for dest in 0..3 {
            for (k, &deadline) in profile.deadlines().iter().enumerate() {
                assert_eq!(profile.table(dest, k).get(dest), Some(deadline));
            }
        }
    }
}
