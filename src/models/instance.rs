//! Problem instance model.

use serde::{Deserialize, Serialize};

use super::{City, Flight};

/// A parsed problem instance.
///
/// Holds the cities, the spatial radius used for the eligibility
/// threshold, the baseline (reference) schedule, and the number of plane
/// slots a submission must fill.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Instance {
    /// Spatial radius R.
    pub radius: i64,
    /// Cities, indexed by `City::index`.
    pub cities: Vec<City>,
    /// Baseline schedule flights.
    pub baseline: Vec<Flight>,
    /// Plane-count bound K.
    pub plane_count: usize,
}

impl Instance {
    /// Creates a new instance.
    pub fn new(radius: i64, cities: Vec<City>, baseline: Vec<Flight>, plane_count: usize) -> Self {
        Self {
            radius,
            cities,
            baseline,
            plane_count,
        }
    }

    /// Number of cities N.
    #[inline]
    pub fn city_count(&self) -> usize {
        self.cities.len()
    }

    /// Demand weight of a city.
    #[inline]
    pub fn weight(&self, city: usize) -> u64 {
        self.cities[city].weight
    }

    /// Whether `city` is a valid 0-based index.
    #[inline]
    pub fn has_city(&self, city: usize) -> bool {
        city < self.cities.len()
    }
}
