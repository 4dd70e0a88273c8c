//! Demand scoring.
//!
//! A schedule serves a (source, destination, deadline) triple by its
//! latest departure from the source that still reaches the destination
//! by the deadline. The submission is compared against the baseline
//! triple by triple, and each triple's weight product goes to whichever
//! schedule departs later.
//!
//! # Modules
//!
//! - **`latest`**: [`DepartureBoard`], [`LatestDepartureTable`] and
//!   [`DepartureProfile`], the single-pass latest departure computation
//! - **`score`**: [`DemandScorer`] and [`ScoreResult`], exact aggregation
//! - **`sample`**: [`sample_comparisons`], weighted sample rows for reports
//!
//! # Reference
//! The backward scan over departure-sorted flights follows the profile
//! variant of Dibbelt et al. (2018), "Connection Scan Algorithm".

mod latest;
mod sample;
mod score;

pub use latest::{DepartureBoard, DepartureProfile, LatestDepartureTable};
pub use sample::{sample_comparisons, ComparisonSample};
pub use score::{DemandScorer, ScoreResult, Scoring, Side};
