//! Game sheets: the numbers of one finished game, written down as YAML or
//! JSON so the wizard can be driven without a terminal.
//!
//! ```yaml
//! players: 3
//! seats:
//!   north: { name: dariya, pool: 56, mountain: 22, whists: { east: 24, south: 32 } }
//!   east:  { name: kolya, pool: "22", mountain: 22, whists: { north: 100, south: 32 } }
//!   south: { name: fedya, pool: 12, mountain: 34, whists: { north: 72, east: 56 } }
//! ```
//!
//! Numbers may be given as integers or as raw text; text is validated by the
//! engine like anything a user types. Fields left out of the sheet are not
//! touched.

use pref_core::RecordError;
use pref_core::game::GameResult;
use pref_core::model::{Entry, Seat};
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use std::fs;
use std::path::{Path, PathBuf};
use thiserror::Error;

#[derive(Debug, Clone, Default, Deserialize, Serialize, PartialEq)]
pub struct GameSheet {
    /// Table size; when absent the configured player count applies.
    #[serde(default)]
    pub players: Option<usize>,
    #[serde(default)]
    pub seats: BTreeMap<Seat, SeatSheet>,
}

#[derive(Debug, Clone, Default, Deserialize, Serialize, PartialEq)]
pub struct SeatSheet {
    #[serde(default)]
    pub name: Option<String>,
    #[serde(default)]
    pub pool: Option<Entry>,
    #[serde(default)]
    pub mountain: Option<Entry>,
    #[serde(default)]
    pub whists: BTreeMap<Seat, Entry>,
}

impl GameSheet {
    pub fn from_path(path: impl AsRef<Path>) -> Result<Self, SheetError> {
        let path = path.as_ref();
        let text = fs::read_to_string(path).map_err(|source| SheetError::Read {
            source,
            path: path.to_path_buf(),
        })?;
        text.parse().map_err(|source| match source {
            SheetError::Parse { source, .. } => SheetError::Parse {
                source,
                path: Some(path.to_path_buf()),
            },
            other => other,
        })
    }

    /// Copies the names the sheet gives into the game.
    pub fn fill_names(&self, game: &mut GameResult) -> Result<(), SheetError> {
        for (&seat, sheet) in &self.seats {
            if let Some(name) = &sheet.name {
                game.set_name(seat, name.as_str())
                    .map_err(|source| SheetError::Seat { seat, source })?;
            }
        }
        Ok(())
    }

    /// Copies pool, mountain and whists of one seat into the game. Seats the
    /// sheet does not mention are left untouched.
    pub fn fill_seat(&self, game: &mut GameResult, seat: Seat) -> Result<(), SheetError> {
        let Some(sheet) = self.seats.get(&seat) else {
            return Ok(());
        };
        let seat_error = |source: RecordError| SheetError::Seat { seat, source };
        if let Some(pool) = &sheet.pool {
            game.set_pool(seat, pool.clone()).map_err(seat_error)?;
        }
        if let Some(mountain) = &sheet.mountain {
            game.set_mountain(seat, mountain.clone()).map_err(seat_error)?;
        }
        for (&against, entry) in &sheet.whists {
            game.set_exchange(seat, against, entry.clone()).map_err(seat_error)?;
        }
        Ok(())
    }

    /// Copies the whole sheet into the game.
    pub fn fill(&self, game: &mut GameResult) -> Result<(), SheetError> {
        self.fill_names(game)?;
        for &seat in self.seats.keys() {
            self.fill_seat(game, seat)?;
        }
        Ok(())
    }
}

impl std::str::FromStr for GameSheet {
    type Err = SheetError;

    /// Parses YAML; JSON documents are accepted as well.
    fn from_str(text: &str) -> Result<Self, Self::Err> {
        serde_yaml::from_str(text).map_err(|source| SheetError::Parse { source, path: None })
    }
}

#[derive(Debug, Error)]
pub enum SheetError {
    #[error("failed to read game sheet {path:?}: {source}")]
    Read {
        #[source]
        source: std::io::Error,
        path: PathBuf,
    },
    #[error("failed to parse game sheet: {source}")]
    Parse {
        #[source]
        source: serde_yaml::Error,
        path: Option<PathBuf>,
    },
    #[error("game sheet entry for {seat}: {source}")]
    Seat {
        seat: Seat,
        #[source]
        source: RecordError,
    },
}
