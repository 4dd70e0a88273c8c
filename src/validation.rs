//! Submission validation.
//!
//! Reads a candidate schedule for exactly K planes and checks it against
//! the instance. Detects:
//! - Malformed or missing tokens
//! - Negative flight counts
//! - City indices out of range, or origin equal to destination
//! - Times off the grid or outside the operating window
//! - Arrival before departure
//! - Declared durations that differ from the duration model
//! - Broken connections (next origin differs from previous destination)
//! - Time-order violations between consecutive flights of one plane
//!
//! All problems are collected into a [`Diagnostics`] value instead of
//! stopping at the first one, except that an input ending mid-record
//! stops validation there.

use log::{debug, warn};
use serde::{Deserialize, Serialize};

use crate::duration::DurationMatrix;
use crate::models::{
    format_hhmm, Flight, Instance, Minutes, OperatingWindow, PlaneSchedule, Submission,
};
use crate::parser::{read_flight, EndOfInput, RawFlight, TokenStream};

/// Validation result.
pub type ValidationResult = Result<Submission, Vec<Violation>>;

/// A problem found while reading or checking a document.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Violation {
    /// Problem category.
    pub kind: ViolationKind,
    /// 1-based plane slot, when the problem belongs to one.
    pub plane: Option<usize>,
    /// 1-based flight position, when the problem belongs to one.
    pub flight: Option<usize>,
    /// Human-readable description.
    pub message: String,
}

/// Categories of violations.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum ViolationKind {
    /// The token stream ended before a required field.
    UnexpectedEnd,
    /// An integer field holds something else.
    NotAnInteger,
    /// A time field is not `HH:MM`.
    BadTimeFormat,
    /// A count is negative.
    NegativeCount,
    /// A city weight is zero or negative.
    NonPositiveWeight,
    /// A radius or coordinate lies outside its allowed range.
    OutOfRange,
    /// A city index is outside `1..=N`.
    CityOutOfRange,
    /// Origin and destination are the same city.
    SameCity,
    /// A time lies outside the operating window.
    OutsideWindow,
    /// A time inside the window is not on a step boundary.
    OffGrid,
    /// Arrival precedes departure.
    ArrivalBeforeDeparture,
    /// Declared duration differs from the duration model.
    DurationMismatch,
    /// Next flight does not leave from the previous destination.
    Disconnected,
    /// Next flight departs before the previous one arrives.
    TimeOrder,
}

impl Violation {
    /// Creates a violation with no location.
    pub fn new(kind: ViolationKind, message: impl Into<String>) -> Self {
        Self {
            kind,
            plane: None,
            flight: None,
            message: message.into(),
        }
    }

    /// Attaches a 1-based plane slot.
    pub fn at_plane(mut self, plane: usize) -> Self {
        self.plane = Some(plane);
        self
    }

    /// Attaches a 1-based flight position.
    pub fn at_flight(mut self, flight: usize) -> Self {
        self.flight = Some(flight);
        self
    }
}

impl std::fmt::Display for Violation {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(&self.message)
    }
}

/// Ordered collector for violations and non-fatal warnings.
#[derive(Debug, Clone, Default)]
pub struct Diagnostics {
    violations: Vec<Violation>,
    warnings: Vec<String>,
}

impl Diagnostics {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn push(&mut self, violation: Violation) {
        self.violations.push(violation);
    }

    pub fn warn(&mut self, message: impl Into<String>) {
        self.warnings.push(message.into());
    }

    /// Whether no violation was recorded. Warnings do not count.
    pub fn is_clean(&self) -> bool {
        self.violations.is_empty()
    }

    /// Number of violations.
    pub fn len(&self) -> usize {
        self.violations.len()
    }

    pub fn is_empty(&self) -> bool {
        self.violations.is_empty() && self.warnings.is_empty()
    }

    pub fn violations(&self) -> &[Violation] {
        &self.violations
    }

    pub fn warnings(&self) -> &[String] {
        &self.warnings
    }

    /// Violation messages in recording order.
    pub fn messages(&self) -> Vec<String> {
        self.violations.iter().map(|v| v.message.clone()).collect()
    }

    pub fn into_parts(self) -> (Vec<Violation>, Vec<String>) {
        (self.violations, self.warnings)
    }
}

/// Outcome of validating a submission.
///
/// `submission` holds whatever could be read, even when invalid, so a
/// presentation layer can still show the offending schedule. Flights
/// with out-of-range city indices are left out of it.
#[derive(Debug, Clone)]
pub struct Validation {
    pub submission: Submission,
    pub violations: Vec<Violation>,
    pub warnings: Vec<String>,
}

impl Validation {
    /// Whether the submission has no violations.
    pub fn is_valid(&self) -> bool {
        self.violations.is_empty()
    }

    /// Converts into a [`ValidationResult`], dropping warnings.
    pub fn into_result(self) -> ValidationResult {
        if self.violations.is_empty() {
            Ok(self.submission)
        } else {
            Err(self.violations)
        }
    }
}

/// Checks submissions against one instance.
#[derive(Debug, Clone, Copy)]
pub struct SubmissionValidator<'a> {
    instance: &'a Instance,
    durations: &'a DurationMatrix,
    window: OperatingWindow,
}

/// Position of a flight record, rendered into messages.
#[derive(Debug, Clone, Copy)]
struct Location {
    plane: Option<usize>,
    flight: usize,
}

impl std::fmt::Display for Location {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self.plane {
            Some(plane) => write!(f, "(plane {plane} flight {})", self.flight),
            None => write!(f, "(flight {})", self.flight),
        }
    }
}

/// Where the previous flight of the current plane left off.
#[derive(Debug, Clone, Copy)]
struct Leg {
    destination: i64,
    arrival: Minutes,
}

impl<'a> SubmissionValidator<'a> {
    pub fn new(
        instance: &'a Instance,
        durations: &'a DurationMatrix,
        window: OperatingWindow,
    ) -> Self {
        Self {
            instance,
            durations,
            window,
        }
    }

    /// Reads and checks a submission text.
    pub fn validate(&self, text: &str) -> Validation {
        let mut ts = TokenStream::new(text, "Output");
        let mut diag = Diagnostics::new();
        let mut planes = Vec::new();

        // `Err` means the stream ended; the violation is already recorded.
        let _ = self.read_planes(&mut ts, &mut diag, &mut planes);

        if diag.is_clean() && ts.remaining() > 0 {
            let msg = format!("Output has {} extra tokens. Ignored.", ts.remaining());
            warn!("{msg}");
            diag.warn(msg);
        }
        debug!(
            "validated {} planes: {} violations",
            planes.len(),
            diag.len()
        );

        let (violations, warnings) = diag.into_parts();
        Validation {
            submission: Submission::from_planes(planes),
            violations,
            warnings,
        }
    }

    fn read_planes(
        &self,
        ts: &mut TokenStream<'_>,
        diag: &mut Diagnostics,
        planes: &mut Vec<PlaneSchedule>,
    ) -> Result<(), EndOfInput> {
        for i in 1..=self.instance.plane_count {
            let Some(count) = ts.read_int::<i64>(&format!("c_{i}"), diag)? else {
                // Without a count the rest of the layout is unknown.
                return Ok(());
            };
            if count < 0 {
                diag.push(
                    Violation::new(
                        ViolationKind::NegativeCount,
                        format!("c_{i} must be >= 0, got {count}."),
                    )
                    .at_plane(i),
                );
            }

            let count = usize::try_from(count).unwrap_or(0);
            let mut plane = PlaneSchedule::new();
            let read = self.read_flights(ts, i, count, &mut plane, diag);
            // Kept even when the stream ended so the partial plane stays visible.
            planes.push(plane);
            read?;
        }
        Ok(())
    }

    fn read_flights(
        &self,
        ts: &mut TokenStream<'_>,
        plane_no: usize,
        count: usize,
        plane: &mut PlaneSchedule,
        diag: &mut Diagnostics,
    ) -> Result<(), EndOfInput> {
        let mut prev: Option<Leg> = None;
        for j in 1..=count {
            let labels = [
                format!("a_{plane_no},{j}"),
                format!("s_{plane_no},{j}"),
                format!("b_{plane_no},{j}"),
                format!("t_{plane_no},{j}"),
            ];
            let Some(raw) = read_flight(ts, labels, diag)? else {
                break;
            };
            let loc = Location {
                plane: Some(plane_no),
                flight: j,
            };
            if let Some(flight) = self.check_flight(loc, &raw, prev, diag) {
                plane.push(flight);
            }
            prev = Some(Leg {
                destination: raw.destination,
                arrival: raw.arrival,
            });
        }
        Ok(())
    }

    /// Runs every per-flight and connection check. Returns the flight
    /// when both city indices are usable.
    fn check_flight(
        &self,
        at: Location,
        raw: &RawFlight,
        prev: Option<Leg>,
        diag: &mut Diagnostics,
    ) -> Option<Flight> {
        let report = |diag: &mut Diagnostics, kind: ViolationKind, message: String| {
            let mut v = Violation::new(kind, message).at_flight(at.flight);
            v.plane = at.plane;
            diag.push(v);
        };

        let origin = self.city_index(raw.origin);
        let destination = self.city_index(raw.destination);
        if origin.is_none() {
            report(
                diag,
                ViolationKind::CityOutOfRange,
                format!("City index out of range: a={} {at}", raw.origin),
            );
        }
        if destination.is_none() {
            report(
                diag,
                ViolationKind::CityOutOfRange,
                format!("City index out of range: b={} {at}", raw.destination),
            );
        }
        if raw.origin == raw.destination {
            report(diag, ViolationKind::SameCity, format!("a == b {at}"));
        }

        for (name, time) in [("Departure", raw.departure), ("Arrival", raw.arrival)] {
            if !self.window.contains(time) {
                report(
                    diag,
                    ViolationKind::OutsideWindow,
                    format!(
                        "{name} time {} is outside {} {at}",
                        format_hhmm(time),
                        self.window.label()
                    ),
                );
            } else if !self.window.is_aligned(time) {
                report(
                    diag,
                    ViolationKind::OffGrid,
                    format!(
                        "{name} time {} is not on the {}-minute grid {at}",
                        format_hhmm(time),
                        self.window.step
                    ),
                );
            }
        }

        if raw.arrival < raw.departure {
            report(
                diag,
                ViolationKind::ArrivalBeforeDeparture,
                format!("Arrival time is earlier than departure time {at}"),
            );
        }

        if let (Some(a), Some(b)) = (origin, destination) {
            if a != b {
                let expected = self.durations.get(a, b);
                let got = raw.arrival - raw.departure;
                if got != expected {
                    report(
                        diag,
                        ViolationKind::DurationMismatch,
                        format!("Invalid duration {at}: got {got}min, expected {expected}min"),
                    );
                }
            }
        }

        if let Some(prev) = prev {
            if prev.destination != raw.origin {
                report(
                    diag,
                    ViolationKind::Disconnected,
                    format!(
                        "Connection city mismatch: previous b={} != next a={} {at}",
                        prev.destination, raw.origin
                    ),
                );
            }
            if prev.arrival > raw.departure {
                report(
                    diag,
                    ViolationKind::TimeOrder,
                    format!(
                        "Time order violation: previous arrival {} > departure {} {at}",
                        format_hhmm(prev.arrival),
                        format_hhmm(raw.departure)
                    ),
                );
            }
        }

        Some(Flight::new(origin?, raw.departure, destination?, raw.arrival))
    }

    /// Converts a 1-based index to 0-based if it names a city.
    fn city_index(&self, one_based: i64) -> Option<usize> {
        let idx = usize::try_from(one_based.checked_sub(1)?).ok()?;
        self.instance.has_city(idx).then_some(idx)
    }
}

/// Validates `text` against `instance` using the given duration matrix.
pub fn validate_submission(
    text: &str,
    instance: &Instance,
    durations: &DurationMatrix,
    window: OperatingWindow,
) -> Validation {
    SubmissionValidator::new(instance, durations, window).validate(text)
}

/// Applies the per-flight checks to the baseline schedule.
///
/// The baseline is trusted input, so findings are returned as warnings
/// for the caller to surface rather than as violations.
pub fn audit_baseline(
    instance: &Instance,
    durations: &DurationMatrix,
    window: OperatingWindow,
) -> Vec<String> {
    let validator = SubmissionValidator::new(instance, durations, window);
    let mut diag = Diagnostics::new();
    for (j, f) in instance.baseline.iter().enumerate() {
        let raw = RawFlight {
            origin: f.origin as i64 + 1,
            departure: f.departure,
            destination: f.destination as i64 + 1,
            arrival: f.arrival,
        };
        let loc = Location {
            plane: None,
            flight: j + 1,
        };
        validator.check_flight(loc, &raw, None, &mut diag);
    }
    diag.violations()
        .iter()
        .map(|v| format!("Baseline: {}", v.message))
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::duration::{DurationModel, TravelMatrices};
    use crate::models::City;

    fn sample_instance(plane_count: usize) -> Instance {
        Instance::new(
            1000,
            vec![
                City::new(0, 0, 0, 10),
                City::new(1, 1000, 0, 20),
                City::new(2, 0, 800, 30),
            ],
            vec![Flight::new(0, 360, 1, 475)],
            plane_count,
        )
    }

    fn run(inst: &Instance, text: &str) -> Validation {
        let m = TravelMatrices::build(&inst.cities, &DurationModel::default());
        validate_submission(text, inst, &m.duration, OperatingWindow::default())
    }

    fn kinds(v: &Validation) -> Vec<ViolationKind> {
        v.violations.iter().map(|x| x.kind.clone()).collect()
    }

    #[test]
    fn test_valid_submission() {
        // 1→2 takes 115, 2→3: distance hypot(1000, 800) ≈ 1280.6 → 140
        let inst = sample_instance(2);
        let v = run(&inst, "2\n1 06:00 2 07:55\n2 08:00 3 10:20\n0\n");
        assert!(v.is_valid(), "{:?}", v.violations);
        assert!(v.warnings.is_empty());
        let s = v.into_result().unwrap();
        assert_eq!(s.plane_count(), 2);
        assert_eq!(s.flight_count(), 2);
        assert_eq!(s.planes[0].flights[1], Flight::new(1, 480, 2, 620));
    }

    #[test]
    fn test_empty_planes_are_valid() {
        let inst = sample_instance(3);
        let v = run(&inst, "0 0 0");
        assert!(v.is_valid());
        assert_eq!(v.submission.plane_count(), 3);
        assert_eq!(v.submission.flight_count(), 0);
    }

    #[test]
    fn test_trailing_tokens_warn_only() {
        let inst = sample_instance(1);
        let v = run(&inst, "0 junk junk");
        assert!(v.is_valid());
        assert_eq!(v.warnings, vec!["Output has 2 extra tokens. Ignored."]);
    }

    #[test]
    fn test_missing_plane_count() {
        let inst = sample_instance(2);
        let v = run(&inst, "0");
        assert_eq!(kinds(&v), vec![ViolationKind::UnexpectedEnd]);
        assert_eq!(v.violations[0].message, "Output ended early while reading c_2.");
    }

    #[test]
    fn test_end_mid_record_halts() {
        let inst = sample_instance(2);
        let v = run(&inst, "2\n1 06:00 2 07:55\n2 08:00");
        assert_eq!(kinds(&v), vec![ViolationKind::UnexpectedEnd]);
        assert_eq!(v.violations[0].message, "Output ended early while reading b_1,2.");
        // The first flight is still available for display.
        assert_eq!(v.submission.flight_count(), 1);
    }

    #[test]
    fn test_negative_count() {
        let inst = sample_instance(2);
        let v = run(&inst, "-1 0");
        assert_eq!(kinds(&v), vec![ViolationKind::NegativeCount]);
        assert_eq!(v.violations[0].plane, Some(1));
    }

    #[test]
    fn test_malformed_time_names_field() {
        let inst = sample_instance(1);
        let v = run(&inst, "1\n1 25:99 2 07:55\n");
        assert_eq!(kinds(&v), vec![ViolationKind::BadTimeFormat]);
        assert_eq!(v.violations[0].message, "s_1,1 is not HH:MM: 25:99");
    }

    #[test]
    fn test_malformed_field_skips_to_next_plane() {
        let inst = sample_instance(2);
        let v = run(&inst, "2\nx 06:00 2 07:55\n2 08:00 3 10:20\n1\n1 06:00 2 07:55\n");
        // The second record of plane 1 is read as plane 2's count.
        assert!(!v.is_valid());
        assert_eq!(v.violations[0].kind, ViolationKind::NotAnInteger);
        assert_eq!(v.violations[0].message, "a_1,1 is not an integer: x");
    }

    #[test]
    fn test_out_of_range_and_same_city() {
        let inst = sample_instance(1);
        let v = run(&inst, "2\n0 06:00 4 07:55\n2 08:00 2 08:40\n");
        let k = kinds(&v);
        assert!(k.contains(&ViolationKind::CityOutOfRange));
        assert!(k.contains(&ViolationKind::SameCity));
        assert_eq!(
            k.iter().filter(|x| **x == ViolationKind::CityOutOfRange).count(),
            2
        );
        // Only the second flight has usable indices.
        assert_eq!(v.submission.flight_count(), 1);
    }

    #[test]
    fn test_window_and_grid() {
        let inst = sample_instance(1);
        let v = run(&inst, "1\n1 05:55 2 07:50\n");
        assert_eq!(kinds(&v), vec![ViolationKind::OutsideWindow]);

        let v = run(&inst, "1\n1 06:01 2 07:56\n");
        assert_eq!(kinds(&v), vec![ViolationKind::OffGrid, ViolationKind::OffGrid]);

        let v = run(&inst, "1\n1 19:30 2 21:25\n");
        assert_eq!(kinds(&v), vec![ViolationKind::OutsideWindow]);
        assert!(v.violations[0].message.starts_with("Arrival time 21:25 is outside 06:00-21:00"));
    }

    #[test]
    fn test_arrival_before_departure() {
        let inst = sample_instance(1);
        let v = run(&inst, "1\n1 08:00 2 07:00\n");
        let k = kinds(&v);
        assert!(k.contains(&ViolationKind::ArrivalBeforeDeparture));
        assert!(k.contains(&ViolationKind::DurationMismatch));
    }

    #[test]
    fn test_duration_mismatch_message() {
        let inst = sample_instance(1);
        let v = run(&inst, "1\n1 06:00 2 08:00\n");
        assert_eq!(kinds(&v), vec![ViolationKind::DurationMismatch]);
        assert_eq!(
            v.violations[0].message,
            "Invalid duration (plane 1 flight 1): got 120min, expected 115min"
        );
    }

    #[test]
    fn test_connection_checks() {
        let inst = sample_instance(1);
        // Second flight leaves from city 1 although the plane is at city 2,
        // and departs before the first one lands.
        let v = run(&inst, "2\n1 06:00 2 07:55\n1 07:50 2 09:45\n");
        assert_eq!(
            kinds(&v),
            vec![ViolationKind::Disconnected, ViolationKind::TimeOrder]
        );
        assert_eq!(v.violations[0].flight, Some(2));
    }

    #[test]
    fn test_zero_turnaround_is_allowed() {
        let inst = sample_instance(1);
        let v = run(&inst, "2\n1 06:00 2 07:55\n2 07:55 1 09:50\n");
        assert!(v.is_valid());
    }

    #[test]
    fn test_violations_collected_across_planes() {
        let inst = sample_instance(2);
        let v = run(&inst, "1\n1 06:00 2 08:00\n1\n2 06:00 2 06:40\n");
        assert_eq!(v.violations.len(), 2);
        assert_eq!(v.violations[0].plane, Some(1));
        assert_eq!(v.violations[1].plane, Some(2));
        assert!(v.warnings.is_empty());
    }

    #[test]
    fn test_baseline_audit() {
        let inst = sample_instance(1);
        let m = TravelMatrices::build(&inst.cities, &DurationModel::default());
        assert!(audit_baseline(&inst, &m.duration, OperatingWindow::default()).is_empty());

        let mut bad = inst.clone();
        bad.baseline.push(Flight::new(1, 400, 0, 500));
        let warnings = audit_baseline(&bad, &m.duration, OperatingWindow::default());
        assert_eq!(
            warnings,
            vec!["Baseline: Invalid duration (flight 2): got 100min, expected 115min"]
        );
    }
}
