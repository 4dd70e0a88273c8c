//! Strict whitespace tokenizer shared by the instance and submission readers.
//!
//! Reads never guess: a missing token ends the read with [`EndOfInput`],
//! an unreadable token is recorded in the [`Diagnostics`] collector and
//! yields `Ok(None)` so the caller decides whether the layout can still
//! be followed.

mod instance;

pub use instance::parse_instance;

use std::str::FromStr;

use crate::models::{parse_hhmm, Minutes};
use crate::validation::{Diagnostics, Violation, ViolationKind};

/// The token stream ran out before a required field.
///
/// The matching violation has already been recorded when this is returned.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct EndOfInput;

/// Cursor over whitespace-delimited tokens.
#[derive(Debug, Clone)]
pub struct TokenStream<'a> {
    tokens: Vec<&'a str>,
    pos: usize,
    /// Document name used in messages ("Input", "Output").
    source: &'static str,
}

impl<'a> TokenStream<'a> {
    /// Tokenizes `text`. A leading UTF-8 byte-order mark is ignored.
    pub fn new(text: &'a str, source: &'static str) -> Self {
        let text = text.strip_prefix('\u{feff}').unwrap_or(text);
        Self {
            tokens: text.split_whitespace().collect(),
            pos: 0,
            source,
        }
    }

    /// Next raw token.
    pub fn next_token(&mut self) -> Option<&'a str> {
        let tok = self.tokens.get(self.pos).copied();
        if tok.is_some() {
            self.pos += 1;
        }
        tok
    }

    /// Tokens not yet consumed.
    pub fn remaining(&self) -> usize {
        self.tokens.len() - self.pos
    }

    /// Total token count.
    pub fn len(&self) -> usize {
        self.tokens.len()
    }

    /// Whether the text contained no tokens at all.
    pub fn is_empty(&self) -> bool {
        self.tokens.is_empty()
    }

    fn require(&mut self, label: &str, diag: &mut Diagnostics) -> Result<&'a str, EndOfInput> {
        match self.next_token() {
            Some(tok) => Ok(tok),
            None => {
                diag.push(Violation::new(
                    ViolationKind::UnexpectedEnd,
                    format!("{} ended early while reading {label}.", self.source),
                ));
                Err(EndOfInput)
            }
        }
    }

    /// Reads an integer field.
    pub fn read_int<T: FromStr>(
        &mut self,
        label: &str,
        diag: &mut Diagnostics,
    ) -> Result<Option<T>, EndOfInput> {
        let tok = self.require(label, diag)?;
        match tok.parse::<T>() {
            Ok(v) => Ok(Some(v)),
            Err(_) => {
                diag.push(Violation::new(
                    ViolationKind::NotAnInteger,
                    format!("{label} is not an integer: {tok}"),
                ));
                Ok(None)
            }
        }
    }

    /// Reads an `HH:MM` field.
    pub fn read_time(
        &mut self,
        label: &str,
        diag: &mut Diagnostics,
    ) -> Result<Option<Minutes>, EndOfInput> {
        let tok = self.require(label, diag)?;
        match parse_hhmm(tok) {
            Some(t) => Ok(Some(t)),
            None => {
                diag.push(Violation::new(
                    ViolationKind::BadTimeFormat,
                    format!("{label} is not HH:MM: {tok}"),
                ));
                Ok(None)
            }
        }
    }
}

/// One `origin HH:MM destination HH:MM` record with 1-based indices as read.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub(crate) struct RawFlight {
    pub origin: i64,
    pub departure: Minutes,
    pub destination: i64,
    pub arrival: Minutes,
}

/// Reads one flight record. All four tokens are consumed even when an
/// early one is malformed, so the caller stays aligned on the record grid.
pub(crate) fn read_flight(
    ts: &mut TokenStream<'_>,
    labels: [String; 4],
    diag: &mut Diagnostics,
) -> Result<Option<RawFlight>, EndOfInput> {
    let [a, s, b, t] = labels;
    let origin = ts.read_int::<i64>(&a, diag)?;
    let departure = ts.read_time(&s, diag)?;
    let destination = ts.read_int::<i64>(&b, diag)?;
    let arrival = ts.read_time(&t, diag)?;
    Ok(match (origin, departure, destination, arrival) {
        (Some(origin), Some(departure), Some(destination), Some(arrival)) => Some(RawFlight {
            origin,
            departure,
            destination,
            arrival,
        }),
        _ => None,
    })
}
