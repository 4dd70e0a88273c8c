//! City model.
//!
//! Cities are the nodes of the flight network. Each has a fixed planar
//! position and a demand weight; the product of two weights is the value
//! at stake for travel between them.

use serde::{Deserialize, Serialize};

/// A city with position and demand weight.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct City {
    /// 0-based index, stable for the lifetime of the instance.
    pub index: usize,
    /// X coordinate.
    pub x: i64,
    /// Y coordinate.
    pub y: i64,
    /// Demand weight (positive).
    pub weight: u64,
}

impl City {
    /// Creates a new city.
    pub fn new(index: usize, x: i64, y: i64, weight: u64) -> Self {
        Self {
            index,
            x,
            y,
            weight,
        }
    }

    /// Euclidean distance to another city.
    #[inline]
    pub fn distance_to(&self, other: &City) -> f64 {
        let dx = self.x as f64 - other.x as f64;
        let dy = self.y as f64 - other.y as f64;
        dx.hypot(dy)
    }

    /// 1-based label as used in the text formats.
    #[inline]
    pub fn label(&self) -> usize {
        self.index + 1
    }
}
