//! Demand capture scoring.
//!
//! Compares the latest feasible departures of the baseline and the
//! candidate schedule for every destination, deadline checkpoint and
//! eligible source, and credits the weight product of the pair to the
//! schedule that serves it better.
//!
//! # Metrics
//!
//! | Metric | Definition |
//! |--------|-----------|
//! | Eligible pair | `src != dst` and `dist(src, dst) >= fraction * R` |
//! | Candidate captured | Σ w_src·w_dst where candidate departs strictly later |
//! | Baseline captured | Σ w_src·w_dst over the remaining (ties included) |
//! | Score | ⌊scale · candidate / (candidate + baseline)⌋, 0 if empty |
//!
//! Sums are exact. With weights near 10^7, 47 cities and 21 checkpoints
//! the totals already approach `i64::MAX`, so [`BigUint`] is used for
//! every accumulation.

use log::debug;
use num_bigint::BigUint;
use num_traits::{ToPrimitive, Zero};
use rayon::prelude::*;
use serde::Serialize;

use super::latest::{DepartureBoard, DepartureProfile};
use crate::duration::{CityMatrix, DistanceMatrix};
use crate::models::{Flight, Instance, Minutes};

/// Which schedule serves a (source, destination, deadline) triple better.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
pub enum Side {
    /// Reference schedule from the instance.
    Baseline,
    /// Submitted schedule.
    Submission,
}

impl Side {
    /// Later departure wins. Ties, including both unreachable, go to the baseline.
    #[inline]
    pub fn winner(baseline: Minutes, submission: Minutes) -> Self {
        if submission > baseline {
            Side::Submission
        } else {
            Side::Baseline
        }
    }
}

/// Exact score of a submission against the baseline.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ScoreResult {
    /// Value captured by the baseline schedule.
    pub baseline_captured: BigUint,
    /// Value captured by the submission.
    pub submission_captured: BigUint,
    /// Normalized score in `[0, scale]`.
    pub score: u64,
}

impl ScoreResult {
    /// Builds a result from captured values.
    pub fn from_captured(baseline: BigUint, submission: BigUint, scale: u64) -> Self {
        let total = &baseline + &submission;
        let score = if total.is_zero() {
            0
        } else {
            (BigUint::from(scale) * &submission / &total)
                .to_u64()
                .unwrap_or(0)
        };
        Self {
            baseline_captured: baseline,
            submission_captured: submission,
            score,
        }
    }

    /// Baseline plus submission captured value.
    pub fn total(&self) -> BigUint {
        &self.baseline_captured + &self.submission_captured
    }

    /// Submission share in percent, truncated to two decimals.
    pub fn share_percent(&self) -> f64 {
        let total = self.total();
        if total.is_zero() {
            return 0.0;
        }
        let ten_thousandths = BigUint::from(1_000_000u32) * &self.submission_captured / total;
        ten_thousandths.to_f64().unwrap_or(0.0) / 10_000.0
    }

    /// Captured values divided by `divisor` (display units), baseline first.
    pub fn scaled(&self, divisor: u64) -> (BigUint, BigUint) {
        let d = BigUint::from(divisor.max(1));
        (&self.baseline_captured / &d, &self.submission_captured / &d)
    }
}

/// Output of one scoring run.
#[derive(Debug, Clone)]
pub struct Scoring {
    pub result: ScoreResult,
    pub baseline: DepartureProfile,
    pub submission: DepartureProfile,
}

/// Scores flight sets against an instance's baseline.
#[derive(Debug, Clone)]
pub struct DemandScorer<'a> {
    instance: &'a Instance,
    deadlines: &'a [Minutes],
    eligible: CityMatrix<bool>,
    scale: u64,
}

impl<'a> DemandScorer<'a> {
    /// Creates a scorer. `eligibility_fraction` is the share of the radius
    /// a pair must be apart to count.
    pub fn new(
        instance: &'a Instance,
        distances: &DistanceMatrix,
        deadlines: &'a [Minutes],
        eligibility_fraction: f64,
        scale: u64,
    ) -> Self {
        let threshold = eligibility_fraction * instance.radius as f64;
        let eligible = CityMatrix::from_fn(instance.city_count(), |src, dst| {
            src != dst && distances.get(src, dst) >= threshold
        });
        Self {
            instance,
            deadlines,
            eligible,
            scale,
        }
    }

    /// Whether (source, destination) counts toward the score.
    #[inline]
    pub fn is_eligible(&self, source: usize, destination: usize) -> bool {
        self.eligible.get(source, destination)
    }

    /// Eligibility of every ordered pair.
    pub fn eligibility(&self) -> &CityMatrix<bool> {
        &self.eligible
    }

    /// Number of eligible ordered pairs.
    pub fn eligible_pair_count(&self) -> usize {
        let n = self.instance.city_count();
        (0..n)
            .map(|src| (0..n).filter(|&dst| self.is_eligible(src, dst)).count())
            .sum()
    }

    /// Scores `submission` flights against the instance baseline.
    ///
    /// Every flight must reference cities of the instance.
    pub fn score<'f>(&self, submission: impl IntoIterator<Item = &'f Flight>) -> Scoring {
        let n = self.instance.city_count();
        let baseline_board = DepartureBoard::new(self.instance.baseline.iter().copied());
        let submission_board = DepartureBoard::new(submission.into_iter().copied());
        debug!(
            "scoring {} baseline vs {} submission flights over {} deadlines",
            baseline_board.len(),
            submission_board.len(),
            self.deadlines.len()
        );

        let baseline = DepartureProfile::compute(&baseline_board, n, self.deadlines);
        let submission = DepartureProfile::compute(&submission_board, n, self.deadlines);
        let result = self.aggregate(&baseline, &submission);
        debug!(
            "captured: baseline {} submission {} score {}",
            result.baseline_captured, result.submission_captured, result.score
        );

        Scoring {
            result,
            baseline,
            submission,
        }
    }

    /// Credits each eligible triple to its winner and sums exactly.
    pub fn aggregate(
        &self,
        baseline: &DepartureProfile,
        submission: &DepartureProfile,
    ) -> ScoreResult {
        let n = self.instance.city_count();
        let (base, cand) = (0..n)
            .into_par_iter()
            .map(|dst| {
                // Wins per source across all deadlines; weights are applied
                // once per source below.
                let mut wins = vec![[0u64; 2]; n];
                for (b, s) in baseline.tables_to(dst).iter().zip(submission.tables_to(dst)) {
                    for (src, w) in wins.iter_mut().enumerate() {
                        if !self.is_eligible(src, dst) {
                            continue;
                        }
                        match Side::winner(b.raw(src), s.raw(src)) {
                            Side::Baseline => w[0] += 1,
                            Side::Submission => w[1] += 1,
                        }
                    }
                }
                let w_dst = BigUint::from(self.instance.weight(dst));
                let mut base = BigUint::zero();
                let mut cand = BigUint::zero();
                for (src, [b, s]) in wins.into_iter().enumerate() {
                    if b == 0 && s == 0 {
                        continue;
                    }
                    let pair = BigUint::from(self.instance.weight(src)) * &w_dst;
                    base += &pair * b;
                    cand += &pair * s;
                }
                (base, cand)
            })
            .reduce(
                || (BigUint::zero(), BigUint::zero()),
                |(b1, c1), (b2, c2)| (b1 + b2, c1 + c2),
            );
        ScoreResult::from_captured(base, cand, self.scale)
    }
}
