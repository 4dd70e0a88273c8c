//! Flight and per-plane schedule models.

use serde::{Deserialize, Serialize};

use super::{format_hhmm, Minutes};

/// A directed, time-stamped flight between two cities.
///
/// City indices are 0-based. Times are minutes since midnight.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct Flight {
    /// Origin city index.
    pub origin: usize,
    /// Destination city index.
    pub destination: usize,
    /// Departure time.
    pub departure: Minutes,
    /// Arrival time.
    pub arrival: Minutes,
}

impl Flight {
    /// Creates a new flight.
    pub fn new(origin: usize, departure: Minutes, destination: usize, arrival: Minutes) -> Self {
        Self {
            origin,
            destination,
            departure,
            arrival,
        }
    }

    /// Declared duration (arrival - departure).
    #[inline]
    pub fn duration(&self) -> Minutes {
        self.arrival - self.departure
    }

    /// Route label with 1-based indices, e.g. `1→2`.
    pub fn route_label(&self) -> String {
        format!("{}→{}", self.origin + 1, self.destination + 1)
    }
}

impl std::fmt::Display for Flight {
    /// Same layout as one flight record in the text formats.
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(
            f,
            "{} {} {} {}",
            self.origin + 1,
            format_hhmm(self.departure),
            self.destination + 1,
            format_hhmm(self.arrival)
        )
    }
}

/// Ordered flights flown by one plane.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct PlaneSchedule {
    /// Flights in flying order.
    pub flights: Vec<Flight>,
}

impl PlaneSchedule {
    /// Creates an empty plane schedule.
    pub fn new() -> Self {
        Self::default()
    }

    /// Builder-style flight append.
    pub fn with_flight(mut self, flight: Flight) -> Self {
        self.flights.push(flight);
        self
    }

    /// Appends a flight.
    pub fn push(&mut self, flight: Flight) {
        self.flights.push(flight);
    }

    /// Number of flights.
    pub fn len(&self) -> usize {
        self.flights.len()
    }

    /// Whether the plane stays on the ground all day.
    pub fn is_empty(&self) -> bool {
        self.flights.is_empty()
    }

    /// Total minutes in the air.
    pub fn airborne_minutes(&self) -> Minutes {
        self.flights.iter().map(Flight::duration).sum()
    }
}
