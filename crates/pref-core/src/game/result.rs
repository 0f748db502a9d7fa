use crate::error::{ConfigurationError, RecordError};
use crate::game::scoreboard::Scoreboard;
use crate::model::entry::Entry;
use crate::model::player::PlayerRecord;
use crate::model::seat::Seat;
use crate::model::topology::Topology;
use crate::model::validate::FieldKind;
use serde::Serialize;
use std::collections::BTreeMap;
use tracing::{debug, trace};

/// Everything recorded for one game: a record per active seat and, once
/// resolved, the final scoreboard.
///
/// Any change to the inputs discards a previously stored scoreboard.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct GameResult {
    topology: Topology,
    players: BTreeMap<Seat, PlayerRecord>,
    final_scores: Option<Scoreboard>,
}

impl GameResult {
    pub fn new(player_count: usize) -> Result<Self, ConfigurationError> {
        Self::with_topology(Topology::for_players(player_count)?)
    }

    pub fn with_topology(topology: Topology) -> Result<Self, ConfigurationError> {
        let players = topology
            .seats()
            .iter()
            .map(|&seat| PlayerRecord::new(seat, topology).map(|record| (seat, record)))
            .collect::<Result<_, _>>()?;
        Ok(Self {
            topology,
            players,
            final_scores: None,
        })
    }

    pub fn topology(&self) -> Topology {
        self.topology
    }

    pub fn player_count(&self) -> usize {
        self.players.len()
    }

    /// Records in seat order.
    pub fn players(&self) -> impl Iterator<Item = &PlayerRecord> + '_ {
        self.players.values()
    }

    pub fn player(&self, seat: Seat) -> Result<&PlayerRecord, ConfigurationError> {
        self.players
            .get(&seat)
            .ok_or(ConfigurationError::InactiveSeat {
                seat,
                players: self.topology.player_count(),
            })
    }

    fn player_mut(&mut self, seat: Seat) -> Result<&mut PlayerRecord, ConfigurationError> {
        let players = self.topology.player_count();
        let record = self
            .players
            .get_mut(&seat)
            .ok_or(ConfigurationError::InactiveSeat { seat, players })?;
        self.final_scores = None;
        Ok(record)
    }

    pub fn set_name(&mut self, seat: Seat, name: impl Into<String>) -> Result<(), RecordError> {
        let name = name.into();
        trace!(%seat, %name, "set name");
        self.player_mut(seat)?.set_name(name);
        Ok(())
    }

    pub fn set_pool(&mut self, seat: Seat, pool: impl Into<Entry>) -> Result<(), RecordError> {
        let pool = pool.into();
        trace!(%seat, %pool, "set pool");
        self.player_mut(seat)?.set_pool(pool);
        Ok(())
    }

    pub fn set_mountain(
        &mut self,
        seat: Seat,
        mountain: impl Into<Entry>,
    ) -> Result<(), RecordError> {
        let mountain = mountain.into();
        trace!(%seat, %mountain, "set mountain");
        self.player_mut(seat)?.set_mountain(mountain);
        Ok(())
    }

    /// Records the whists `seat` wrote against `against`.
    pub fn set_exchange(
        &mut self,
        seat: Seat,
        against: Seat,
        value: impl Into<Entry>,
    ) -> Result<(), RecordError> {
        let value = value.into();
        trace!(%seat, %against, %value, "set exchange");
        self.player_mut(seat)?.set_exchange(against, value)?;
        Ok(())
    }

    /// Replaces valid text in every record with its number.
    pub fn promote(&mut self) {
        for record in self.players.values_mut() {
            record.promote();
        }
    }

    pub fn final_scores(&self) -> Option<&Scoreboard> {
        self.final_scores.as_ref()
    }

    pub fn is_resolved(&self) -> bool {
        self.final_scores.is_some()
    }

    pub(crate) fn store_final_scores(&mut self, scores: Scoreboard) {
        self.final_scores = Some(scores);
    }

    /// Highest pool entered so far; unparsed pools are ignored.
    pub fn max_pool(&self) -> u32 {
        self.players
            .values()
            .filter_map(|record| record.pool().parsed(FieldKind::Pool).value())
            .max()
            .unwrap_or(0)
    }

    /// Clears every record and the scoreboard, keeping the table size.
    pub fn reset(&mut self) {
        debug!(players = self.player_count(), "resetting game result");
        for record in self.players.values_mut() {
            record.clear();
        }
        self.final_scores = None;
    }

    /// Switches to another table size. Names of seats that stay at the table
    /// are kept; all numbers are cleared.
    pub fn change_player_count(&mut self, player_count: usize) -> Result<(), ConfigurationError> {
        let topology = Topology::for_players(player_count)?;
        let mut next = Self::with_topology(topology)?;
        for (seat, record) in next.players.iter_mut() {
            if let Some(previous) = self.players.get(seat) {
                record.set_name(previous.name());
            }
        }
        debug!(
            from = self.player_count(),
            to = player_count,
            "changed number of players"
        );
        *self = next;
        Ok(())
    }
}
