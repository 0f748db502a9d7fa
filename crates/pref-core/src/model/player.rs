use crate::error::{ConfigurationError, IncompleteInputError, InvalidSeatError};
use crate::model::entry::Entry;
use crate::model::seat::Seat;
use crate::model::topology::Topology;
use crate::model::validate::{FieldKind, Parsed, Problem};
use serde::Serialize;
use std::collections::BTreeMap;

/// Raw inputs entered for one seat.
///
/// The exchange map is created with one blank cell per opponent and never
/// gains or loses keys afterwards.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct PlayerRecord {
    seat: Seat,
    name: String,
    pool: Entry,
    mountain: Entry,
    exchanges: BTreeMap<Seat, Entry>,
}

impl PlayerRecord {
    pub fn new(seat: Seat, topology: Topology) -> Result<Self, ConfigurationError> {
        let exchanges = topology
            .opponents(seat)?
            .map(|against| (against, Entry::blank()))
            .collect();
        Ok(Self {
            seat,
            name: String::new(),
            pool: Entry::blank(),
            mountain: Entry::blank(),
            exchanges,
        })
    }

    pub fn seat(&self) -> Seat {
        self.seat
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    /// Capitalised first letter of the name, or an empty string.
    pub fn initial(&self) -> String {
        self.name
            .trim()
            .chars()
            .next()
            .map(|c| c.to_uppercase().collect())
            .unwrap_or_default()
    }

    pub fn set_name(&mut self, name: impl Into<String>) {
        self.name = name.into();
    }

    pub fn pool(&self) -> &Entry {
        &self.pool
    }

    pub fn set_pool(&mut self, pool: impl Into<Entry>) {
        self.pool = pool.into();
    }

    pub fn mountain(&self) -> &Entry {
        &self.mountain
    }

    pub fn set_mountain(&mut self, mountain: impl Into<Entry>) {
        self.mountain = mountain.into();
    }

    pub fn exchange(&self, against: Seat) -> Option<&Entry> {
        self.exchanges.get(&against)
    }

    /// Exchange cells in opponent seat order.
    pub fn exchanges(&self) -> impl Iterator<Item = (Seat, &Entry)> + '_ {
        self.exchanges.iter().map(|(seat, entry)| (*seat, entry))
    }

    pub fn set_exchange(
        &mut self,
        against: Seat,
        value: impl Into<Entry>,
    ) -> Result<(), InvalidSeatError> {
        match self.exchanges.get_mut(&against) {
            Some(cell) => {
                *cell = value.into();
                Ok(())
            }
            None => Err(InvalidSeatError {
                owner: self.seat,
                against,
            }),
        }
    }

    /// Parsed pool, mountain and exchanges, checked in that order.
    pub fn numbers(&self) -> Result<PlayerNumbers, IncompleteInputError> {
        let pool = self.require(FieldKind::Pool, &self.pool)?;
        let mountain = self.require(FieldKind::Mountain, &self.mountain)?;
        let mut exchanges = BTreeMap::new();
        for (against, entry) in self.exchanges() {
            let value = self.require(FieldKind::Exchange { against }, entry)?;
            exchanges.insert(against, value);
        }
        Ok(PlayerNumbers {
            pool,
            mountain,
            exchanges,
        })
    }

    fn require(&self, field: FieldKind, entry: &Entry) -> Result<u32, IncompleteInputError> {
        match entry.parsed(field) {
            Parsed::Valid(value) => Ok(value),
            other => Err(IncompleteInputError {
                seat: self.seat,
                field,
                problem: other.problem().unwrap_or(Problem::Malformed),
            }),
        }
    }

    /// Converts every valid text field to its number in place.
    pub fn promote(&mut self) {
        self.pool.promote(FieldKind::Pool);
        self.mountain.promote(FieldKind::Mountain);
        for (against, entry) in self.exchanges.iter_mut() {
            entry.promote(FieldKind::Exchange { against: *against });
        }
    }

    pub fn clear(&mut self) {
        self.name.clear();
        self.pool = Entry::blank();
        self.mountain = Entry::blank();
        for entry in self.exchanges.values_mut() {
            *entry = Entry::blank();
        }
    }
}

/// Validated numbers of one record.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PlayerNumbers {
    pub pool: u32,
    pub mountain: u32,
    pub exchanges: BTreeMap<Seat, u32>,
}

impl PlayerNumbers {
    pub fn against(&self, seat: Seat) -> i64 {
        self.exchanges.get(&seat).copied().map_or(0, i64::from)
    }
}
