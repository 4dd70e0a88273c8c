//! Submission (candidate solution) model.
//!
//! A submission assigns flights to a fixed number of plane slots. For
//! scoring, the plane structure is irrelevant: all flights are pooled
//! into one timetable.

use serde::{Deserialize, Serialize};

use super::{Flight, Minutes, PlaneSchedule};

/// A candidate schedule: one [`PlaneSchedule`] per plane slot.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Submission {
    /// Plane schedules in slot order. Unused slots are empty.
    pub planes: Vec<PlaneSchedule>,
}

impl Submission {
    /// Creates an empty submission.
    pub fn new() -> Self {
        Self::default()
    }

    /// Creates a submission from plane schedules.
    pub fn from_planes(planes: Vec<PlaneSchedule>) -> Self {
        Self { planes }
    }

    /// Adds a plane schedule.
    pub fn add_plane(&mut self, plane: PlaneSchedule) {
        self.planes.push(plane);
    }

    /// Number of plane slots.
    pub fn plane_count(&self) -> usize {
        self.planes.len()
    }

    /// Number of slots with at least one flight.
    pub fn planes_in_use(&self) -> usize {
        self.planes.iter().filter(|p| !p.is_empty()).count()
    }

    /// All flights across planes, in slot then flying order.
    pub fn flights(&self) -> impl Iterator<Item = &Flight> + '_ {
        self.planes.iter().flat_map(|p| p.flights.iter())
    }

    /// Total number of flights.
    pub fn flight_count(&self) -> usize {
        self.planes.iter().map(PlaneSchedule::len).sum()
    }

    /// Latest arrival across all planes, if any flight exists.
    pub fn last_arrival(&self) -> Option<Minutes> {
        self.flights().map(|f| f.arrival).max()
    }
}
