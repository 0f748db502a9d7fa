use core::fmt;
use serde::{Deserialize, Serialize};
use std::str::FromStr;

/// A compass seat at the table. The declaration order is the fixed seat
/// precedence used to break ties on the scoreboard.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[repr(u8)]
pub enum Seat {
    #[serde(alias = "north", alias = "N")]
    North = 0,
    #[serde(alias = "east", alias = "E")]
    East = 1,
    #[serde(alias = "south", alias = "S")]
    South = 2,
    #[serde(alias = "west", alias = "W")]
    West = 3,
}

impl Seat {
    pub const LOOP: [Seat; 4] = [Seat::North, Seat::East, Seat::South, Seat::West];

    pub const fn from_index(index: usize) -> Option<Self> {
        match index {
            0 => Some(Seat::North),
            1 => Some(Seat::East),
            2 => Some(Seat::South),
            3 => Some(Seat::West),
            _ => None,
        }
    }

    pub const fn index(self) -> usize {
        self as usize
    }

    pub const fn letter(self) -> char {
        match self {
            Seat::North => 'N',
            Seat::East => 'E',
            Seat::South => 'S',
            Seat::West => 'W',
        }
    }

    pub const fn as_str(self) -> &'static str {
        match self {
            Seat::North => "North",
            Seat::East => "East",
            Seat::South => "South",
            Seat::West => "West",
        }
    }
}

impl fmt::Display for Seat {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.pad(self.as_str())
    }
}

#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
#[error("unknown seat '{0}'")]
pub struct UnknownSeat(pub String);

impl FromStr for Seat {
    type Err = UnknownSeat;

    fn from_str(value: &str) -> Result<Self, Self::Err> {
        match value.trim().to_ascii_lowercase().as_str() {
            "n" | "north" => Ok(Seat::North),
            "e" | "east" => Ok(Seat::East),
            "s" | "south" => Ok(Seat::South),
            "w" | "west" => Ok(Seat::West),
            _ => Err(UnknownSeat(value.to_string())),
        }
    }
}
