//! Flight-schedule judge.
//!
//! Reads a contest instance (cities, a baseline timetable, a fleet size),
//! checks a submitted timetable against the operating rules, and scores
//! it by how much passenger demand it serves better than the baseline.
//!
//! # Modules
//!
//! - **`models`**: Domain types: `City`, `Flight`, `PlaneSchedule`,
//!   `Submission`, `Instance`, `OperatingWindow`
//! - **`parser`**: Whitespace token reader and the instance parser
//! - **`duration`**: Flight duration model and per-pair matrices
//! - **`validation`**: Submission checks with categorised violations
//! - **`scoring`**: Latest-departure tables and demand capture scoring
//! - **`judge`**: End-to-end run producing a `JudgeReport`
//! - **`config`**: Contest constants, overridable from JSON
//!
//! # Example
//!
//! ```
//! use u_flightjudge::{Judge, JudgeConfig};
//!
//! let input = "2 1000\n0 0 10\n1000 0 20\n1\n1 06:00 2 07:55\n1\n";
//! let judge = Judge::new(JudgeConfig::default().with_sample_size(0)).unwrap();
//! let report = judge.judge(input, "1\n2 06:00 1 07:55\n").unwrap();
//! assert_eq!(report.score, 500_000);
//! assert!(report.samples.is_empty());
//! ```
//!
//! # References
//!
//! - Dibbelt, Pajor, Strasser, Wagner (2018), "Connection Scan Algorithm"
//! - Barnhart, Belobaba, Odoni (2003), "Applications of Operations
//!   Research in the Air Transport Industry"

pub mod config;
pub mod duration;
pub mod error;
pub mod judge;
pub mod models;
pub mod parser;
pub mod scoring;
pub mod validation;

pub use config::JudgeConfig;
pub use error::JudgeError;
pub use judge::{judge, Judge, JudgeReport};
