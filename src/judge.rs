//! End-to-end judging.
//!
//! [`Judge`] wires the stages together:
//!
//! 1. parse the instance (fatal on failure)
//! 2. build distance and duration matrices
//! 3. audit the baseline (warnings only)
//! 4. validate the submission
//! 5. score the readable flights and draw comparison samples
//!
//! An invalid submission still gets scored so the report can show what
//! it would have captured, but its reported score is 0.

use log::{debug, info};
use serde::Serialize;

use crate::config::JudgeConfig;
use crate::duration::TravelMatrices;
use crate::error::JudgeError;
use crate::models::{format_hhmm, Minutes, PlaneSchedule};
use crate::parser::parse_instance;
use crate::scoring::{sample_comparisons, ComparisonSample, DemandScorer};
use crate::validation::{audit_baseline, validate_submission, Violation};

/// Divisor applied to captured values for compact display.
pub const DISPLAY_DIVISOR: u64 = 10_000_000_000;

/// Everything a judging run produces.
#[derive(Debug, Clone, Serialize)]
pub struct JudgeReport {
    pub valid: bool,
    /// Normalized score; 0 when the submission is invalid.
    pub score: u64,
    /// Submission share of captured value in percent, two decimals.
    /// For an invalid submission this is what the readable flights would
    /// have captured; the summary leaves it out.
    pub share_percent: f64,
    /// Exact captured values as decimal strings.
    pub baseline_captured: String,
    pub submission_captured: String,
    /// Captured values divided by [`DISPLAY_DIVISOR`], baseline first.
    pub display_captured: (String, String),
    pub violations: Vec<Violation>,
    pub warnings: Vec<String>,
    pub baseline_warnings: Vec<String>,
    /// Submission as read, including invalid plane schedules.
    pub planes: Vec<PlaneSchedule>,
    pub planes_in_use: usize,
    pub flight_count: usize,
    /// Total minutes flown across all planes.
    pub airborne_minutes: Minutes,
    pub last_arrival: Option<Minutes>,
    pub samples: Vec<ComparisonSample>,
}

impl JudgeReport {
    /// Human-readable multi-line summary.
    pub fn summary(&self) -> String {
        let mut out = String::new();
        if self.valid {
            out.push_str(&format!("Score: {}\n", group_digits(&self.score.to_string())));
        } else {
            out.push_str("Score: 0 (invalid output)\n");
            for v in &self.violations {
                out.push_str(&format!("  error: {}\n", v.message));
            }
        }
        for w in self.baseline_warnings.iter().chain(&self.warnings) {
            out.push_str(&format!("  warning: {w}\n"));
        }
        if self.valid {
            out.push_str(&format!(
                "Captured: baseline {} / submission {} ({:.2}%)\n",
                group_digits(&self.baseline_captured),
                group_digits(&self.submission_captured),
                self.share_percent
            ));
        }
        out.push_str(&format!(
            "Planes: {} of {} used, flights: {}, airborne {} min",
            self.planes_in_use,
            self.planes.len(),
            self.flight_count,
            self.airborne_minutes
        ));
        if let Some(t) = self.last_arrival {
            out.push_str(&format!(", last arrival {}", format_hhmm(t)));
        }
        out.push('\n');
        if !self.samples.is_empty() {
            out.push_str("Sampled comparisons (* = winner):\n");
            for s in &self.samples {
                out.push_str(&format!("  {s}\n"));
            }
        }
        out
    }
}

/// Inserts `,` every three digits from the right.
fn group_digits(digits: &str) -> String {
    let len = digits.len();
    let mut out = String::with_capacity(len + len / 3);
    for (i, ch) in digits.chars().enumerate() {
        if i > 0 && (len - i) % 3 == 0 {
            out.push(',');
        }
        out.push(ch);
    }
    out
}

/// Judge bound to one configuration.
#[derive(Debug, Clone, Default)]
pub struct Judge {
    config: JudgeConfig,
}

impl Judge {
    /// Creates a judge after validating `config`.
    pub fn new(config: JudgeConfig) -> Result<Self, JudgeError> {
        config.validate()?;
        Ok(Self { config })
    }

    pub fn config(&self) -> &JudgeConfig {
        &self.config
    }

    /// Judges `output` against the instance in `input`.
    ///
    /// Returns `Err` only when the instance itself cannot be read.
    pub fn judge(&self, input: &str, output: &str) -> Result<JudgeReport, JudgeError> {
        let instance = parse_instance(input)?;
        let matrices = TravelMatrices::build(&instance.cities, &self.config.duration_model());
        let window = self.config.window;

        let baseline_warnings = audit_baseline(&instance, &matrices.duration, window);
        if !baseline_warnings.is_empty() {
            debug!("baseline audit: {} findings", baseline_warnings.len());
        }

        let validation = validate_submission(output, &instance, &matrices.duration, window);
        let valid = validation.is_valid();

        let deadlines = self.config.deadlines();
        let scorer = DemandScorer::new(
            &instance,
            &matrices.distance,
            &deadlines,
            self.config.eligibility_fraction,
            self.config.score_scale,
        );
        let scoring = scorer.score(validation.submission.flights());
        let samples = sample_comparisons(
            &instance,
            scorer.eligibility(),
            &scoring.baseline,
            &scoring.submission,
            self.config.sample_size,
            self.config.sample_seed,
        );

        let result = scoring.result;
        let (base_display, sub_display) = result.scaled(DISPLAY_DIVISOR);
        let score = if valid { result.score } else { 0 };
        info!(
            "judged: valid={valid} score={score} ({} violations, {} eligible pairs)",
            validation.violations.len(),
            scorer.eligible_pair_count()
        );

        let submission = validation.submission;
        Ok(JudgeReport {
            valid,
            score,
            share_percent: result.share_percent(),
            baseline_captured: result.baseline_captured.to_string(),
            submission_captured: result.submission_captured.to_string(),
            display_captured: (base_display.to_string(), sub_display.to_string()),
            violations: validation.violations,
            warnings: validation.warnings,
            baseline_warnings,
            planes_in_use: submission.planes_in_use(),
            flight_count: submission.flight_count(),
            airborne_minutes: submission.planes.iter().map(PlaneSchedule::airborne_minutes).sum(),
            last_arrival: submission.last_arrival(),
            planes: submission.planes,
            samples,
        })
    }
}

/// Judges with the default contest configuration.
///
/// # Examples
///
/// ```
/// let input = "2 1000\n0 0 10\n1000 0 20\n1\n1 06:00 2 07:55\n1\n";
/// let output = "1\n2 06:00 1 07:55\n";
/// let report = u_flightjudge::judge(input, output).unwrap();
/// assert!(report.valid);
/// assert_eq!(report.score, 500_000);
/// ```
pub fn judge(input: &str, output: &str) -> Result<JudgeReport, JudgeError> {
    Judge::default().judge(input, output)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::validation::ViolationKind;

    const INPUT: &str = "2 1000\n0 0 10\n1000 0 20\n1\n1 06:00 2 07:55\n1\n";

    #[test]
    fn test_worked_example() {
        let report = judge(INPUT, "1\n2 06:00 1 07:55\n").unwrap();
        assert!(report.valid);
        assert_eq!(report.score, 500_000);
        assert_eq!(report.share_percent, 50.0);
        assert_eq!(report.baseline_captured, report.submission_captured);
        assert_eq!(report.baseline_captured, "4200");
        assert_eq!(report.display_captured, ("0".to_string(), "0".to_string()));
        assert!(report.violations.is_empty());
        assert!(report.baseline_warnings.is_empty());
        assert_eq!(report.planes.len(), 1);
        assert_eq!(report.planes[0].len(), 1);
    }

    #[test]
    fn test_invalid_submission_scores_zero_and_keeps_planes() {
        // Wrong arrival: expected 07:55.
        let report = judge(INPUT, "1\n2 06:00 1 08:00\n").unwrap();
        assert!(!report.valid);
        assert_eq!(report.score, 0);
        assert_eq!(report.violations.len(), 1);
        assert_eq!(report.violations[0].kind, ViolationKind::DurationMismatch);
        assert_eq!(report.planes.len(), 1);
        assert_eq!(report.planes[0].len(), 1);
        // The partial schedule is still evaluated for display.
        assert_eq!(report.share_percent, 50.0);
    }

    #[test]
    fn test_malformed_instance_is_fatal() {
        let err = judge("2 1000\n0 0 10\n", "0\n").unwrap_err();
        assert!(matches!(err, JudgeError::MalformedInput(_)));
    }

    #[test]
    fn test_empty_output_is_invalid() {
        let report = judge(INPUT, "").unwrap();
        assert!(!report.valid);
        assert_eq!(report.score, 0);
        assert_eq!(report.violations[0].kind, ViolationKind::UnexpectedEnd);
    }

    #[test]
    fn test_extra_tokens_warn_only() {
        let report = judge(INPUT, "1\n2 06:00 1 07:55\nextra\n").unwrap();
        assert!(report.valid);
        assert_eq!(report.warnings, vec!["Output has 1 extra tokens. Ignored."]);
    }

    #[test]
    fn test_invalid_config_is_rejected() {
        let mut config = JudgeConfig::default();
        config.window.step = 0;
        assert!(matches!(
            Judge::new(config),
            Err(JudgeError::InvalidConfig(_))
        ));
    }

    #[test]
    fn test_sample_size_from_config() {
        let judge = Judge::new(JudgeConfig::default().with_sample_size(4)).unwrap();
        let report = judge.judge(INPUT, "1\n2 06:00 1 07:55\n").unwrap();
        assert!(report.samples.len() <= 4);
        assert!(!report.samples.is_empty());
    }

    #[test]
    fn test_report_serializes() {
        let report = judge(INPUT, "1\n2 06:00 1 07:55\n").unwrap();
        let json = serde_json::to_value(&report).unwrap();
        assert_eq!(json["score"], 500_000);
        assert_eq!(json["valid"], true);
        assert_eq!(json["baseline_captured"], "4200");
    }

    #[test]
    fn test_summary() {
        let report = judge(INPUT, "1\n2 06:00 1 07:55\n").unwrap();
        let summary = report.summary();
        assert!(summary.starts_with("Score: 500,000\n"));
        assert!(summary.contains("Captured: baseline 4,200 / submission 4,200 (50.00%)"));
        assert!(summary.contains(
            "Planes: 1 of 1 used, flights: 1, airborne 115 min, last arrival 07:55\n"
        ));
    }

    #[test]
    fn test_invalid_summary_omits_captured_share() {
        let report = judge(INPUT, "1\n2 06:00 1 08:00\n").unwrap();
        let summary = report.summary();
        assert!(summary.starts_with("Score: 0 (invalid output)\n"));
        assert!(summary.contains("error: Invalid duration"));
        assert!(!summary.contains("Captured"));
        assert!(!summary.contains('%'));
    }

    #[test]
    fn test_idle_fleet_counts() {
        let report = judge(INPUT, "0\n").unwrap();
        assert!(report.valid);
        assert_eq!(report.score, 0);
        assert_eq!(report.planes_in_use, 0);
        assert_eq!(report.flight_count, 0);
        assert_eq!(report.airborne_minutes, 0);
        assert_eq!(report.last_arrival, None);
        assert!(report.summary().contains("Planes: 0 of 1 used, flights: 0, airborne 0 min\n"));
    }

    #[test]
    fn test_far_city_is_malformed_not_a_crash() {
        let err = judge("2 1000\n0 0 10\n100000000000 0 20\n0\n1\n", "0\n").unwrap_err();
        assert!(matches!(err, JudgeError::MalformedInput(_)));
    }

    #[test]
    fn test_non_positive_radius_is_malformed() {
        let err = judge("2 -1000\n0 0 10\n10 0 20\n0\n1\n", "0\n").unwrap_err();
        assert_eq!(err.messages(), vec!["R must be positive, got -1000."]);
    }

    #[test]
    fn test_group_digits() {
        assert_eq!(group_digits("0"), "0");
        assert_eq!(group_digits("999"), "999");
        assert_eq!(group_digits("1000"), "1,000");
        assert_eq!(group_digits("1234567"), "1,234,567");
    }
}
