//! Error taxonomy shared by the engine.
//!
//! Every failure is returned as a value from the call that detects it; the
//! engine never recovers internally and never substitutes a default for a
//! missing or malformed number.

use crate::model::seat::Seat;
use crate::model::validate::{FieldKind, Problem};
use thiserror::Error;

/// Unsupported table shape. Indicates a host bug rather than bad user input.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ConfigurationError {
    #[error("{0} players are not supported (expected 3 or 4)")]
    UnsupportedPlayerCount(usize),
    #[error("{seat} is not seated in a {players}-player game")]
    InactiveSeat { seat: Seat, players: u8 },
    #[error("active seats {seats:?} do not form a supported table")]
    UnsupportedTable { seats: Vec<Seat> },
}

/// A mutator addressed an opponent outside the active topology.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
#[error("{owner} has no exchange cell against {against}")]
pub struct InvalidSeatError {
    pub owner: Seat,
    pub against: Seat,
}

/// The first field that keeps an aggregate from being complete.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Error)]
#[error("{seat}: {field} is {problem}")]
pub struct IncompleteInputError {
    pub seat: Seat,
    pub field: FieldKind,
    pub problem: Problem,
}

/// Errors surfaced by the mutators of [`crate::game::result::GameResult`].
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum RecordError {
    #[error(transparent)]
    Configuration(#[from] ConfigurationError),
    #[error(transparent)]
    InvalidSeat(#[from] InvalidSeatError),
}

/// Errors surfaced by [`crate::game::resolver::resolve`].
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ResolveError {
    #[error("incomplete input: {0}")]
    Incomplete(#[from] IncompleteInputError),
    #[error(transparent)]
    Configuration(#[from] ConfigurationError),
}

impl ResolveError {
    pub fn incomplete(&self) -> Option<&IncompleteInputError> {
        match self {
            ResolveError::Incomplete(err) => Some(err),
            ResolveError::Configuration(_) => None,
        }
    }
}
