use crate::error::ConfigurationError;
use crate::model::seat::Seat;
use serde::{Deserialize, Serialize};

/// Which seats take part in a game and who plays against whom.
///
/// A three-player table always leaves West empty; a four-player table uses
/// every seat. Every active seat is an opponent of every other active seat.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(try_from = "u8", into = "u8")]
pub struct Topology {
    players: u8,
}

impl Topology {
    pub const THREE_PLAYERS: [Seat; 3] = [Seat::North, Seat::East, Seat::South];
    pub const FOUR_PLAYERS: [Seat; 4] = Seat::LOOP;
    pub const EMPTY_SEAT_IN_THREE: Seat = Seat::West;

    pub fn for_players(count: usize) -> Result<Self, ConfigurationError> {
        match count {
            3 | 4 => Ok(Self {
                players: count as u8,
            }),
            other => Err(ConfigurationError::UnsupportedPlayerCount(other)),
        }
    }

    /// Recovers the topology from a set of occupied seats.
    pub fn from_seats<I>(seats: I) -> Result<Self, ConfigurationError>
    where
        I: IntoIterator<Item = Seat>,
    {
        let mut seats: Vec<Seat> = seats.into_iter().collect();
        seats.sort();
        seats.dedup();
        if seats.as_slice() == Self::THREE_PLAYERS.as_slice() {
            Ok(Self { players: 3 })
        } else if seats.as_slice() == Self::FOUR_PLAYERS.as_slice() {
            Ok(Self { players: 4 })
        } else {
            Err(ConfigurationError::UnsupportedTable { seats })
        }
    }

    pub const fn player_count(self) -> u8 {
        self.players
    }

    pub fn seats(self) -> &'static [Seat] {
        if self.players == 3 {
            &Self::THREE_PLAYERS
        } else {
            &Self::FOUR_PLAYERS
        }
    }

    pub fn is_active(self, seat: Seat) -> bool {
        self.seats().contains(&seat)
    }

    pub fn ensure_active(self, seat: Seat) -> Result<(), ConfigurationError> {
        if self.is_active(seat) {
            Ok(())
        } else {
            Err(ConfigurationError::InactiveSeat {
                seat,
                players: self.players,
            })
        }
    }

    /// Opponents of `seat` in seat order.
    pub fn opponents(
        self,
        seat: Seat,
    ) -> Result<impl Iterator<Item = Seat> + Clone + 'static, ConfigurationError> {
        self.ensure_active(seat)?;
        Ok(self.seats().iter().copied().filter(move |other| *other != seat))
    }

    pub fn is_opponent(self, seat: Seat, other: Seat) -> bool {
        seat != other && self.is_active(seat) && self.is_active(other)
    }
}

impl TryFrom<u8> for Topology {
    type Error = ConfigurationError;

    fn try_from(value: u8) -> Result<Self, Self::Error> {
        Self::for_players(value as usize)
    }
}

impl From<Topology> for u8 {
    fn from(value: Topology) -> Self {
        value.players
    }
}
