//! Travel-time model and city-pair matrices.
//!
//! Flight duration is a pure function of Euclidean distance, rounded up
//! to the grid step:
//!
//! ```text
//! duration = step * ceil((speed_numerator * d / speed_denominator + overhead) / step - epsilon)
//! ```
//!
//! The same model must be used by whoever synthesizes the baseline
//! schedule; any disagreement shows up as a duration violation.

use serde::Serialize;

use crate::config::TravelParams;
use crate::models::{City, Minutes};

/// Distance → grid-rounded flight duration.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct DurationModel {
    params: TravelParams,
    step: Minutes,
}

impl Default for DurationModel {
    fn default() -> Self {
        Self::new(TravelParams::default(), 5)
    }
}

impl DurationModel {
    /// Creates a model rounding onto a `step`-minute grid.
    pub fn new(params: TravelParams, step: Minutes) -> Self {
        Self { params, step }
    }

    /// Grid step in minutes.
    pub fn step(&self) -> Minutes {
        self.step
    }

    /// Duration for a distance.
    ///
    /// # Examples
    ///
    /// ```
    /// use u_flightjudge::duration::DurationModel;
    ///
    /// let model = DurationModel::default();
    /// // 60 * 1000 / 800 + 40 = 115, already on the grid
    /// assert_eq!(model.duration_for_distance(1000.0), 115);
    /// assert_eq!(model.duration_for_distance(1001.0), 120);
    /// ```
    pub fn duration_for_distance(&self, distance: f64) -> Minutes {
        let p = &self.params;
        let step = f64::from(self.step);
        let raw = p.speed_numerator * distance / p.speed_denominator + p.overhead;
        let minutes = (raw / step - p.epsilon).ceil() * step;
        // Saturates: no valid flight can match a duration past the clock range.
        if minutes.is_nan() || minutes >= f64::from(Minutes::MAX) {
            Minutes::MAX
        } else {
            minutes.max(0.0) as Minutes
        }
    }

    /// Duration between two cities.
    #[inline]
    pub fn duration(&self, from: &City, to: &City) -> Minutes {
        self.duration_for_distance(from.distance_to(to))
    }
}

/// Dense N×N matrix indexed by (from, to) city indices.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct CityMatrix<T> {
    size: usize,
    cells: Vec<T>,
}

impl<T: Copy> CityMatrix<T> {
    /// Builds a matrix by evaluating `f(from, to)` for every pair.
    pub fn from_fn(size: usize, mut f: impl FnMut(usize, usize) -> T) -> Self {
        let mut cells = Vec::with_capacity(size * size);
        for from in 0..size {
            for to in 0..size {
                cells.push(f(from, to));
            }
        }
        Self { size, cells }
    }

    /// Number of cities on each side.
    #[inline]
    pub fn size(&self) -> usize {
        self.size
    }

    /// Value for (from, to). Panics if either index is out of range.
    #[inline]
    pub fn get(&self, from: usize, to: usize) -> T {
        assert!(from < self.size && to < self.size, "city index out of range");
        self.cells[from * self.size + to]
    }

    /// One row: values from `from` to every city.
    pub fn row(&self, from: usize) -> &[T] {
        &self.cells[from * self.size..(from + 1) * self.size]
    }
}

pub type DistanceMatrix = CityMatrix<f64>;
pub type DurationMatrix = CityMatrix<Minutes>;

/// Distance and duration matrices for one instance.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct TravelMatrices {
    pub distance: DistanceMatrix,
    pub duration: DurationMatrix,
}

impl TravelMatrices {
    /// Computes both matrices for `cities` (indexed by position).
    pub fn build(cities: &[City], model: &DurationModel) -> Self {
        let n = cities.len();
        let distance = CityMatrix::from_fn(n, |a, b| cities[a].distance_to(&cities[b]));
        let duration = CityMatrix::from_fn(n, |a, b| model.duration_for_distance(distance.get(a, b)));
        Self { distance, duration }
    }
}
