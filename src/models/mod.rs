//! Flight-network domain models.
//!
//! Provides the data types for representing a judging problem and its
//! candidate solution.
//!
//! # Domain Mapping
//!
//! | u-flightjudge | Meaning |
//! |---------------|---------|
//! | City | Airport with demand weight |
//! | Flight | One leg flown by one plane |
//! | PlaneSchedule | Day plan for one plane slot |
//! | Submission | Candidate timetable (K plane slots) |
//! | Instance | Cities + baseline timetable + K |

mod city;
mod clock;
mod flight;
mod instance;
mod schedule;

pub use city::City;
pub use clock::{format_hhmm, parse_hhmm, Minutes, OperatingWindow, UNREACHABLE};
pub use flight::{Flight, PlaneSchedule};
pub use instance::Instance;
pub use schedule::Submission;
