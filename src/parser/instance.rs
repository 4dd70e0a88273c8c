//! Instance reader.
//!
//! Layout (whitespace-delimited):
//!
//! ```text
//! N R
//! x_1 y_1 w_1
//! ...
//! M
//! a_1 HH:MM b_1 HH:MM
//! ...
//! K
//! ```
//!
//! City indices in flight records are 1-based in the text and 0-based in
//! the parsed [`Instance`].

use log::debug;

use super::{read_flight, EndOfInput, TokenStream};
use crate::error::JudgeError;
use crate::models::{City, Flight, Instance};
use crate::validation::{Diagnostics, Violation, ViolationKind};

/// Largest accepted absolute coordinate. Keeps every pairwise distance,
/// and so every flight duration, far inside the clock's integer range.
const MAX_COORDINATE: i64 = 1_000_000_000;

/// Parses an instance. Every field problem is reported at once.
///
/// # Examples
///
/// ```
/// use u_flightjudge::parser::parse_instance;
///
/// let inst = parse_instance("2 1000\n0 0 10\n1000 0 20\n1\n1 06:00 2 07:55\n1\n").unwrap();
/// assert_eq!(inst.city_count(), 2);
/// assert_eq!(inst.baseline[0].destination, 1);
/// assert_eq!(inst.plane_count, 1);
/// ```
pub fn parse_instance(text: &str) -> Result<Instance, JudgeError> {
    let mut ts = TokenStream::new(text, "Input");
    let mut diag = Diagnostics::new();

    // An early end of input is already recorded in `diag`.
    let parsed = read_instance(&mut ts, &mut diag).unwrap_or(None);

    match parsed {
        Some(instance) if diag.is_clean() => {
            if ts.remaining() > 0 {
                debug!("ignoring {} trailing input tokens", ts.remaining());
            }
            debug!(
                "parsed instance: {} cities, {} baseline flights, K = {}",
                instance.city_count(),
                instance.baseline.len(),
                instance.plane_count
            );
            Ok(instance)
        }
        _ => {
            if diag.is_clean() {
                // Unreachable in practice: every `None` path records a violation.
                diag.push(Violation::new(
                    ViolationKind::UnexpectedEnd,
                    "Input is incomplete.",
                ));
            }
            Err(JudgeError::MalformedInput(diag.messages()))
        }
    }
}

fn read_count(
    ts: &mut TokenStream<'_>,
    label: &str,
    diag: &mut Diagnostics,
) -> Result<Option<usize>, EndOfInput> {
    Ok(match ts.read_int::<i64>(label, diag)? {
        Some(v) if v >= 0 => Some(v as usize),
        Some(v) => {
            diag.push(Violation::new(
                ViolationKind::NegativeCount,
                format!("{label} must be >= 0, got {v}."),
            ));
            None
        }
        None => None,
    })
}

fn read_instance(
    ts: &mut TokenStream<'_>,
    diag: &mut Diagnostics,
) -> Result<Option<Instance>, EndOfInput> {
    let n = read_count(ts, "N", diag)?;
    let radius = match ts.read_int::<i64>("R", diag)? {
        Some(r) if r <= 0 => {
            diag.push(Violation::new(
                ViolationKind::OutOfRange,
                format!("R must be positive, got {r}."),
            ));
            None
        }
        r => r,
    };
    let Some(n) = n else {
        return Ok(None);
    };

    let mut cities = Vec::new();
    for i in 0..n {
        let x = ts.read_int::<i64>(&format!("x_{}", i + 1), diag)?;
        let y = ts.read_int::<i64>(&format!("y_{}", i + 1), diag)?;
        let w = ts.read_int::<i64>(&format!("w_{}", i + 1), diag)?;
        let (Some(x), Some(y), Some(w)) = (x, y, w) else {
            continue;
        };
        let mut ok = true;
        for (name, v) in [("x", x), ("y", y)] {
            if v.unsigned_abs() > MAX_COORDINATE as u64 {
                diag.push(Violation::new(
                    ViolationKind::OutOfRange,
                    format!(
                        "{name}_{} must lie within ±{MAX_COORDINATE}, got {v}.",
                        i + 1
                    ),
                ));
                ok = false;
            }
        }
        if !ok {
            continue;
        }
        if w <= 0 {
            diag.push(Violation::new(
                ViolationKind::NonPositiveWeight,
                format!("w_{} must be positive, got {w}.", i + 1),
            ));
            continue;
        }
        cities.push(City::new(i, x, y, w as u64));
    }

    let Some(m) = read_count(ts, "M", diag)? else {
        return Ok(None);
    };

    let mut baseline = Vec::new();
    for j in 1..=m {
        let labels = [
            format!("a_{j}"),
            format!("s_{j}"),
            format!("b_{j}"),
            format!("t_{j}"),
        ];
        let Some(raw) = read_flight(ts, labels, diag)? else {
            continue;
        };
        let in_range = |c: i64| c >= 1 && (c as u64) <= n as u64;
        let mut ok = true;
        for (name, c) in [("a", raw.origin), ("b", raw.destination)] {
            if !in_range(c) {
                diag.push(
                    Violation::new(
                        ViolationKind::CityOutOfRange,
                        format!("Baseline flight {j}: city index out of range: {name}={c}"),
                    )
                    .at_flight(j),
                );
                ok = false;
            }
        }
        if ok {
            baseline.push(Flight::new(
                (raw.origin - 1) as usize,
                raw.departure,
                (raw.destination - 1) as usize,
                raw.arrival,
            ));
        }
    }

    let plane_count = read_count(ts, "K", diag)?;

    Ok(match (radius, plane_count) {
        (Some(radius), Some(k)) => Some(Instance::new(radius, cities, baseline, k)),
        _ => None,
    })
}
