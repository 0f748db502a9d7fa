//! Input validation for the values typed into the wizard.
//!
//! [`parse`] classifies a single raw text value; [`check_complete`] walks an
//! aggregate in the order the wizard collects fields and reports the first
//! one that is missing or malformed.

use crate::error::IncompleteInputError;
use crate::game::result::GameResult;
use crate::model::player::PlayerRecord;
use crate::model::seat::Seat;
use core::fmt;
use serde::{Deserialize, Serialize};
use tracing::trace;

/// A field of a player record.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum FieldKind {
    Name,
    Pool,
    Mountain,
    Exchange { against: Seat },
}

impl fmt::Display for FieldKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            FieldKind::Name => f.write_str("name"),
            FieldKind::Pool => f.write_str("pool"),
            FieldKind::Mountain => f.write_str("mountain"),
            FieldKind::Exchange { against } => write!(f, "whists against {against}"),
        }
    }
}

/// Classification of one raw value.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Parsed {
    Valid(u32),
    Empty,
    Invalid,
}

impl Parsed {
    pub const fn value(self) -> Option<u32> {
        match self {
            Parsed::Valid(value) => Some(value),
            Parsed::Empty | Parsed::Invalid => None,
        }
    }

    pub const fn is_valid(self) -> bool {
        matches!(self, Parsed::Valid(_))
    }

    /// Why this value cannot be used, if it cannot.
    pub const fn problem(self) -> Option<Problem> {
        match self {
            Parsed::Valid(_) => None,
            Parsed::Empty => Some(Problem::Missing),
            Parsed::Invalid => Some(Problem::Malformed),
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Problem {
    Missing,
    Malformed,
}

impl fmt::Display for Problem {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Problem::Missing => f.write_str("missing"),
            Problem::Malformed => f.write_str("not a non-negative whole number"),
        }
    }
}

/// Parses a raw numeric field.
///
/// Surrounding whitespace is ignored. What remains must be decimal digits,
/// optionally preceded by a single `+`. Blank text is [`Parsed::Empty`], never
/// zero; negative numbers and values beyond `u32` are [`Parsed::Invalid`].
pub fn parse(text: &str, kind: FieldKind) -> Parsed {
    let trimmed = text.trim();
    let parsed = if trimmed.is_empty() {
        Parsed::Empty
    } else {
        let digits = trimmed.strip_prefix('+').unwrap_or(trimmed);
        if digits.is_empty() || !digits.bytes().all(|b| b.is_ascii_digit()) {
            Parsed::Invalid
        } else {
            digits.parse::<u32>().map_or(Parsed::Invalid, Parsed::Valid)
        }
    };
    trace!(%kind, raw = text, ?parsed, "parsed field");
    parsed
}

/// Outcome of [`validate`], suitable for enabling a "next" action.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ValidationOutcome {
    Complete,
    Incomplete(IncompleteInputError),
}

impl ValidationOutcome {
    pub const fn is_complete(&self) -> bool {
        matches!(self, ValidationOutcome::Complete)
    }

    pub fn into_result(self) -> Result<(), IncompleteInputError> {
        match self {
            ValidationOutcome::Complete => Ok(()),
            ValidationOutcome::Incomplete(err) => Err(err),
        }
    }
}

impl From<Result<(), IncompleteInputError>> for ValidationOutcome {
    fn from(value: Result<(), IncompleteInputError>) -> Self {
        match value {
            Ok(()) => ValidationOutcome::Complete,
            Err(err) => ValidationOutcome::Incomplete(err),
        }
    }
}

pub fn validate(game: &GameResult) -> ValidationOutcome {
    check_complete(game).into()
}

pub fn is_aggregate_complete(game: &GameResult) -> bool {
    check_complete(game).is_ok()
}

/// Names of every seat first, then each seat's numbers in seat order.
pub fn check_complete(game: &GameResult) -> Result<(), IncompleteInputError> {
    check_names(game)?;
    for player in game.players() {
        check_record(player)?;
    }
    Ok(())
}

pub fn check_names(game: &GameResult) -> Result<(), IncompleteInputError> {
    match game.players().find(|player| player.name().trim().is_empty()) {
        Some(player) => Err(IncompleteInputError {
            seat: player.seat(),
            field: FieldKind::Name,
            problem: Problem::Missing,
        }),
        None => Ok(()),
    }
}

/// Checks pool, mountain and every exchange of one seat.
pub fn check_seat(game: &GameResult, seat: Seat) -> Result<(), IncompleteInputError> {
    match game.player(seat) {
        Ok(player) => check_record(player),
        // An inactive seat has nothing to enter.
        Err(_) => Ok(()),
    }
}

fn check_record(player: &PlayerRecord) -> Result<(), IncompleteInputError> {
    player.numbers().map(drop)
}
