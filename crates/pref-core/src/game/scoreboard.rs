use crate::model::seat::Seat;
use serde::{Deserialize, Serialize};
use std::cmp::Reverse;

/// One row of the final scoreboard.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Standing {
    pub seat: Seat,
    /// 1-based position; no two seats share a rank.
    pub rank: usize,
    pub name: String,
    pub pool: u32,
    pub mountain: u32,
    pub net_exchange: i64,
    pub total: i64,
}

/// Final standings ordered by total, highest first. Equal totals keep the
/// fixed seat order North, East, South, West.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Scoreboard {
    standings: Vec<Standing>,
}

impl Scoreboard {
    /// Ranks the given rows. `rank` values on the input are overwritten.
    pub fn ranked(mut standings: Vec<Standing>) -> Self {
        standings.sort_by_key(|row| (Reverse(row.total), row.seat));
        for (position, row) in standings.iter_mut().enumerate() {
            row.rank = position + 1;
        }
        Self { standings }
    }

    pub fn standings(&self) -> &[Standing] {
        &self.standings
    }

    pub fn get(&self, seat: Seat) -> Option<&Standing> {
        self.standings.iter().find(|row| row.seat == seat)
    }

    pub fn score(&self, seat: Seat) -> Option<i64> {
        self.get(seat).map(|row| row.total)
    }

    pub fn rank(&self, seat: Seat) -> Option<usize> {
        self.get(seat).map(|row| row.rank)
    }

    pub fn leader(&self) -> Option<Seat> {
        self.standings.first().map(|row| row.seat)
    }

    /// Seats from first to last place.
    pub fn order(&self) -> Vec<Seat> {
        self.standings.iter().map(|row| row.seat).collect()
    }

    pub fn sum(&self) -> i64 {
        self.standings.iter().map(|row| row.total).sum()
    }

    pub fn to_json(&self) -> serde_json::Result<String> {
        serde_json::to_string_pretty(self)
    }
}
