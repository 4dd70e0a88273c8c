//! Time grid and operating window.
//!
//! All times are whole minutes since midnight. A time is a *grid time*
//! iff it lies inside the operating window (both ends inclusive) and is
//! a whole number of steps after the window start.
//!
//! # Text Format
//! Times are written `HH:MM` with exactly two digits on each side.
//! Minutes above 59 are rejected at parse time; hours are not bounded
//! here because the window check reports them with better context.

use serde::{Deserialize, Serialize};

/// Minutes since midnight.
pub type Minutes = i32;

/// Sentinel for "no feasible departure". Lies below every valid time.
pub const UNREACHABLE: Minutes = -1;

/// Daily operating window [start, end] on a fixed step.
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq)]
#[serde(default)]
pub struct OperatingWindow {
    /// First allowed time (inclusive).
    pub start: Minutes,
    /// Last allowed time (inclusive).
    pub end: Minutes,
    /// Grid step in minutes.
    pub step: Minutes,
}

impl Default for OperatingWindow {
    /// 06:00 to 21:00 on a five-minute grid.
    fn default() -> Self {
        Self {
            start: 6 * 60,
            end: 21 * 60,
            step: 5,
        }
    }
}

impl OperatingWindow {
    /// Creates a new operating window.
    pub fn new(start: Minutes, end: Minutes, step: Minutes) -> Self {
        Self { start, end, step }
    }

    /// Length of the window in minutes.
    #[inline]
    pub fn span(&self) -> Minutes {
        self.end - self.start
    }

    /// Whether `time` falls inside the window.
    #[inline]
    pub fn contains(&self, time: Minutes) -> bool {
        time >= self.start && time <= self.end
    }

    /// Whether `time` sits on a step boundary relative to the window start.
    #[inline]
    pub fn is_aligned(&self, time: Minutes) -> bool {
        self.step > 0 && (time - self.start).rem_euclid(self.step) == 0
    }

    /// Whether `time` is a valid grid time.
    #[inline]
    pub fn is_grid_time(&self, time: Minutes) -> bool {
        self.contains(time) && self.is_aligned(time)
    }

    /// Human-readable `HH:MM-HH:MM` form, used in violation messages.
    pub fn label(&self) -> String {
        format!("{}-{}", format_hhmm(self.start), format_hhmm(self.end))
    }
}

/// Parses an `HH:MM` token.
///
/// Returns `None` unless the token is exactly two ASCII digits, a colon,
/// and two ASCII digits with minutes in `00..=59`.
///
/// # Examples
///
/// ```
/// use u_flightjudge::models::parse_hhmm;
///
/// assert_eq!(parse_hhmm("07:55"), Some(475));
/// assert_eq!(parse_hhmm("7:55"), None);
/// assert_eq!(parse_hhmm("25:99"), None);
/// ```
pub fn parse_hhmm(token: &str) -> Option<Minutes> {
    let bytes = token.as_bytes();
    if bytes.len() != 5 || bytes[2] != b':' {
        return None;
    }
    let digits = [bytes[0], bytes[1], bytes[3], bytes[4]];
    if !digits.iter().all(u8::is_ascii_digit) {
        return None;
    }
    let value = |hi: u8, lo: u8| Minutes::from(hi - b'0') * 10 + Minutes::from(lo - b'0');
    let hours = value(digits[0], digits[1]);
    let minutes = value(digits[2], digits[3]);
    if minutes >= 60 {
        return None;
    }
    Some(hours * 60 + minutes)
}

/// Formats minutes as `HH:MM`; negative values (unreachable) render as `---`.
pub fn format_hhmm(time: Minutes) -> String {
    if time < 0 {
        return "---".to_string();
    }
    format!("{:02}:{:02}", time / 60, time % 60)
}
