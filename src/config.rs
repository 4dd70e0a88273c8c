//! Judge configuration.
//!
//! Every constant of the contest rules lives here. [`JudgeConfig::default`]
//! reproduces the official rules; a JSON document can override any subset
//! of fields (missing fields keep their defaults).
//!
//! ```
//! use u_flightjudge::config::JudgeConfig;
//!
//! let config = JudgeConfig::from_json_str(r#"{ "sample_size": 8 }"#).unwrap();
//! assert_eq!(config.sample_size, 8);
//! assert_eq!(config.deadlines().len(), 21);
//! ```

use std::path::Path;

use serde::{Deserialize, Serialize};

use crate::duration::DurationModel;
use crate::error::JudgeError;
use crate::models::{Minutes, OperatingWindow};

/// Parameters of the travel-time formula.
///
/// `raw = speed_numerator * distance / speed_denominator + overhead`,
/// then rounded up to the grid step.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct TravelParams {
    pub speed_numerator: f64,
    pub speed_denominator: f64,
    /// Fixed minutes added to every flight.
    pub overhead: f64,
    /// Subtracted before rounding so grid-exact values do not round up.
    pub epsilon: f64,
}

impl Default for TravelParams {
    fn default() -> Self {
        Self {
            speed_numerator: 60.0,
            speed_denominator: 800.0,
            overhead: 40.0,
            epsilon: 1e-12,
        }
    }
}

/// Deadline checkpoints `first, first + interval, ..., <= last`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct CheckpointPlan {
    pub first: Minutes,
    pub last: Minutes,
    pub interval: Minutes,
}

impl Default for CheckpointPlan {
    /// Every half hour from 11:00 through 21:00.
    fn default() -> Self {
        Self {
            first: 11 * 60,
            last: 21 * 60,
            interval: 30,
        }
    }
}

/// Full judge configuration.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct JudgeConfig {
    pub window: OperatingWindow,
    pub travel: TravelParams,
    pub checkpoints: CheckpointPlan,
    /// A pair is eligible iff distance >= fraction * R.
    pub eligibility_fraction: f64,
    /// Score for a submission that captures all value.
    pub score_scale: u64,
    /// Rows drawn by the comparison sampler.
    pub sample_size: usize,
    pub sample_seed: u64,
}

impl Default for JudgeConfig {
    fn default() -> Self {
        Self {
            window: OperatingWindow::default(),
            travel: TravelParams::default(),
            checkpoints: CheckpointPlan::default(),
            eligibility_fraction: 0.25,
            score_scale: 1_000_000,
            sample_size: 32,
            sample_seed: 0,
        }
    }
}

impl JudgeConfig {
    /// Parses and validates a JSON configuration.
    pub fn from_json_str(json: &str) -> Result<Self, JudgeError> {
        let config: Self = serde_json::from_str(json)?;
        config.validate()?;
        Ok(config)
    }

    /// Reads, parses and validates a JSON configuration file.
    pub fn from_path(path: impl AsRef<Path>) -> Result<Self, JudgeError> {
        let path = path.as_ref();
        let text = std::fs::read_to_string(path).map_err(|source| JudgeError::Io {
            path: path.to_path_buf(),
            source,
        })?;
        Self::from_json_str(&text)
    }

    /// Sets the sampler size.
    pub fn with_sample_size(mut self, sample_size: usize) -> Self {
        self.sample_size = sample_size;
        self
    }

    /// Sets the sampler seed.
    pub fn with_sample_seed(mut self, seed: u64) -> Self {
        self.sample_seed = seed;
        self
    }

    /// Checks value ranges. Collects every problem into one error.
    pub fn validate(&self) -> Result<(), JudgeError> {
        let mut problems = Vec::new();
        let w = &self.window;
        if w.step <= 0 {
            problems.push(format!("window.step must be positive, got {}", w.step));
        }
        if w.start < 0 || w.start >= w.end {
            problems.push(format!(
                "window must satisfy 0 <= start < end, got {}..{}",
                w.start, w.end
            ));
        }
        let t = &self.travel;
        if !(t.speed_numerator > 0.0 && t.speed_numerator.is_finite()) {
            problems.push("travel.speed_numerator must be positive".to_string());
        }
        if !(t.speed_denominator > 0.0 && t.speed_denominator.is_finite()) {
            problems.push("travel.speed_denominator must be positive".to_string());
        }
        if !(t.overhead > 0.0 && t.overhead.is_finite()) {
            problems.push("travel.overhead must be positive".to_string());
        }
        if !(t.epsilon >= 0.0 && t.epsilon < 1.0) {
            problems.push("travel.epsilon must lie in [0, 1)".to_string());
        }
        let c = &self.checkpoints;
        if c.interval <= 0 {
            problems.push(format!(
                "checkpoints.interval must be positive, got {}",
                c.interval
            ));
        }
        if c.first < 0 {
            problems.push(format!("checkpoints.first must be >= 0, got {}", c.first));
        }
        if c.first > c.last {
            problems.push("checkpoints.first must not exceed checkpoints.last".to_string());
        }
        if !(self.eligibility_fraction >= 0.0 && self.eligibility_fraction.is_finite()) {
            problems.push("eligibility_fraction must be a non-negative number".to_string());
        }
        if self.score_scale == 0 {
            problems.push("score_scale must be positive".to_string());
        }

        if problems.is_empty() {
            Ok(())
        } else {
            Err(JudgeError::InvalidConfig(problems.join("; ")))
        }
    }

    /// Duration model on this configuration's grid.
    pub fn duration_model(&self) -> DurationModel {
        DurationModel::new(self.travel, self.window.step)
    }

    /// Deadline checkpoints in ascending order.
    pub fn deadlines(&self) -> Vec<Minutes> {
        let c = &self.checkpoints;
        if c.interval <= 0 {
            return Vec::new();
        }
        (c.first..=c.last).step_by(c.interval as usize).collect()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_matches_contest_rules() {
        let config = JudgeConfig::default();
        assert!(config.validate().is_ok());
        assert_eq!(config.window, OperatingWindow::new(360, 1260, 5));
        let deadlines = config.deadlines();
        assert_eq!(deadlines.len(), 21);
        assert_eq!(deadlines.first(), Some(&660));
        assert_eq!(deadlines.last(), Some(&1260));
        assert!(deadlines.windows(2).all(|w| w[1] - w[0] == 30));
    }

    #[test]
    fn test_partial_json_keeps_defaults() {
        let config =
            JudgeConfig::from_json_str(r#"{ "sample_seed": 7, "travel": { "overhead": 30.0 } }"#)
                .unwrap();
        assert_eq!(config.sample_seed, 7);
        assert_eq!(config.travel.overhead, 30.0);
        assert_eq!(config.travel.speed_denominator, 800.0);
        assert_eq!(config.score_scale, 1_000_000);
    }

    #[test]
    fn test_json_round_trip() {
        let config = JudgeConfig::default().with_sample_size(4).with_sample_seed(9);
        let json = serde_json::to_string(&config).unwrap();
        assert_eq!(JudgeConfig::from_json_str(&json).unwrap(), config);
    }

    #[test]
    fn test_invalid_values_are_all_reported() {
        let err = JudgeConfig::from_json_str(
            r#"{ "window": { "start": 360, "end": 1260, "step": 0 }, "score_scale": 0 }"#,
        )
        .unwrap_err();
        let msg = err.to_string();
        assert!(msg.contains("window.step"));
        assert!(msg.contains("score_scale"));
    }

    #[test]
    fn test_negative_checkpoint_is_rejected() {
        let err = JudgeConfig::from_json_str(r#"{ "checkpoints": { "first": -1 } }"#).unwrap_err();
        assert!(matches!(err, JudgeError::InvalidConfig(_)));
        assert!(err.to_string().contains("checkpoints.first must be >= 0, got -1"));
    }

    #[test]
    fn test_malformed_json() {
        let err = JudgeConfig::from_json_str("{ not json").unwrap_err();
        assert!(matches!(err, JudgeError::ConfigFormat(_)));
    }

    #[test]
    fn test_missing_file() {
        let err = JudgeConfig::from_path("/definitely/not/here.json").unwrap_err();
        assert!(matches!(err, JudgeError::Io { .. }));
    }
}
