//! Comparison sampler.
//!
//! Draws a handful of (source, destination, deadline) triples and shows
//! how each schedule serves them. Cities are drawn proportionally to
//! their weight, so the rows reflect where the value lies. Only eligible
//! pairs are kept, matching what the score counts.

use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};
use serde::Serialize;

use super::latest::DepartureProfile;
use super::score::Side;
use crate::duration::CityMatrix;
use crate::models::{format_hhmm, Instance, Minutes, UNREACHABLE};

/// Upper bound on draws, so instances with few eligible pairs terminate.
const MAX_DRAWS: usize = 20_000;

/// Mixed into the seed so sampler streams differ from other seeded uses.
const SEED_SALT: u64 = 0x9e37_79b9;

/// One sampled comparison row.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ComparisonSample {
    pub source: usize,
    pub destination: usize,
    pub deadline: Minutes,
    /// Latest baseline departure, `None` if unreachable.
    pub baseline: Option<Minutes>,
    /// Latest submission departure, `None` if unreachable.
    pub submission: Option<Minutes>,
    pub winner: Side,
}

impl std::fmt::Display for ComparisonSample {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let show = |t: Option<Minutes>| format_hhmm(t.unwrap_or(UNREACHABLE));
        let mark = |side: Side| if self.winner == side { "*" } else { " " };
        write!(
            f,
            "{:>3}→{:<3} by {}  baseline {}{}  submission {}{}",
            self.source + 1,
            self.destination + 1,
            format_hhmm(self.deadline),
            show(self.baseline),
            mark(Side::Baseline),
            show(self.submission),
            mark(Side::Submission),
        )
    }
}

/// Weighted city picker over prefix sums.
#[derive(Debug, Clone)]
struct WeightedPicker {
    prefix: Vec<u128>,
}

impl WeightedPicker {
    fn new(weights: impl IntoIterator<Item = u64>) -> Self {
        let mut sum = 0u128;
        let prefix = weights
            .into_iter()
            .map(|w| {
                sum += u128::from(w);
                sum
            })
            .collect();
        Self { prefix }
    }

    fn pick(&self, rng: &mut impl Rng) -> Option<usize> {
        let total = *self.prefix.last()?;
        if total == 0 {
            return None;
        }
        let r = rng.random_range(0..total);
        Some(self.prefix.partition_point(|&p| p <= r))
    }
}

/// Draws up to `count` comparison rows with a deterministic seed.
pub fn sample_comparisons(
    instance: &Instance,
    eligible: &CityMatrix<bool>,
    baseline: &DepartureProfile,
    submission: &DepartureProfile,
    count: usize,
    seed: u64,
) -> Vec<ComparisonSample> {
    let deadlines = baseline.deadlines();
    if deadlines.is_empty() {
        return Vec::new();
    }
    let picker = WeightedPicker::new(instance.cities.iter().map(|c| c.weight));
    let mut rng = StdRng::seed_from_u64(seed ^ SEED_SALT);
    let mut rows = Vec::with_capacity(count.min(MAX_DRAWS));

    for _ in 0..MAX_DRAWS {
        if rows.len() >= count {
            break;
        }
        let (Some(src), Some(dst)) = (picker.pick(&mut rng), picker.pick(&mut rng)) else {
            break;
        };
        if !eligible.get(src, dst) {
            continue;
        }
        let k = rng.random_range(0..deadlines.len());
        let b = baseline.table(dst, k);
        let s = submission.table(dst, k);
        rows.push(ComparisonSample {
            source: src,
            destination: dst,
            deadline: deadlines[k],
            baseline: b.get(src),
            submission: s.get(src),
            winner: Side::winner(b.raw(src), s.raw(src)),
        });
    }
    rows
}
