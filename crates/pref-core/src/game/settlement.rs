//! Whist settlement.
//!
//! Converts pools and mountains into a common mountain scale, shares the
//! mountain surplus out as whists (ten whists per mountain point) and adds the
//! pairwise whist balances. The result is what players actually pay each other
//! at the end of a game, as opposed to the raw totals of the resolver.
//!
//! All arithmetic is done on integers. The average mountain is kept in
//! hundredths and rounded half up, and mountains are converted to whists
//! truncating toward zero.

use crate::error::ResolveError;
use crate::game::resolver::validated_numbers;
use crate::game::result::GameResult;
use crate::model::seat::Seat;
use core::fmt;
use serde::{Deserialize, Serialize};
use std::cmp::Reverse;
use std::collections::BTreeMap;
use std::str::FromStr;
use tracing::debug;

const WHISTS_PER_MOUNTAIN: i64 = 10;
const ADJUSTMENT_WHISTS: i64 = 3;

/// Rule family; decides how many mountain points one pool point is worth.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Variant {
    #[default]
    Leningrad,
    Sochi,
}

impl Variant {
    pub const fn pool_ratio(self) -> i64 {
        match self {
            Variant::Leningrad => 2,
            Variant::Sochi => 1,
        }
    }

    pub const fn as_str(self) -> &'static str {
        match self {
            Variant::Leningrad => "leningrad",
            Variant::Sochi => "sochi",
        }
    }
}

impl fmt::Display for Variant {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
#[error("unknown rule variant '{0}' (expected leningrad or sochi)")]
pub struct UnknownVariant(pub String);

impl FromStr for Variant {
    type Err = UnknownVariant;

    fn from_str(value: &str) -> Result<Self, Self::Err> {
        match value.trim().to_ascii_lowercase().as_str() {
            "leningrad" | "leningradka" => Ok(Variant::Leningrad),
            "sochi" | "sochinka" => Ok(Variant::Sochi),
            _ => Err(UnknownVariant(value.to_string())),
        }
    }
}

/// Settlement options.
///
/// `mountain_adjustment` names the seat that absorbs the remainder when the
/// mountain surplus does not divide evenly between the players; `None`
/// leaves the remainder in the (fractional) average.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct Rules {
    pub variant: Variant,
    pub mountain_adjustment: Option<Seat>,
}

impl Default for Rules {
    fn default() -> Self {
        Self {
            variant: Variant::Leningrad,
            mountain_adjustment: Some(Seat::East),
        }
    }
}

/// A fixed-point number with two decimals.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct Hundredths(pub i64);

impl fmt::Display for Hundredths {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let sign = if self.0 < 0 { "-" } else { "" };
        let abs = self.0.unsigned_abs();
        write!(f, "{sign}{}.{:02}", abs / 100, abs % 100)
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SeatSettlement {
    pub seat: Seat,
    pub rank: usize,
    pub name: String,
    /// Mountain after converting the pool gap to the best pool.
    pub new_mountain: i64,
    pub mountain_fix: i64,
    /// Share of the mountain surplus, in whists.
    pub final_mountain: i64,
    /// Extra whists this seat is credited against each opponent.
    pub whist_fixes: BTreeMap<Seat, i64>,
    /// Whist balance against each opponent.
    pub balances: BTreeMap<Seat, i64>,
    pub total_balance: i64,
    pub final_score: i64,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Settlement {
    pub rules: Rules,
    pub max_pool: u32,
    pub min_mountain: i64,
    pub average_mountain: Hundredths,
    seats: Vec<SeatSettlement>,
}

impl Settlement {
    /// Seats from the best final score to the worst.
    pub fn seats(&self) -> &[SeatSettlement] {
        &self.seats
    }

    pub fn get(&self, seat: Seat) -> Option<&SeatSettlement> {
        self.seats.iter().find(|row| row.seat == seat)
    }

    pub fn final_score(&self, seat: Seat) -> Option<i64> {
        self.get(seat).map(|row| row.final_score)
    }

    pub fn to_json(&self) -> serde_json::Result<String> {
        serde_json::to_string_pretty(self)
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Shift {
    Down,
    Up,
}

/// Which way the adjustment seat's mountain moves for a given remainder.
fn shift_for(players: i64, remainder: i64) -> Option<Shift> {
    match (players, remainder) {
        (_, 1) => Some(Shift::Down),
        (4, 3) | (3, 2) => Some(Shift::Up),
        _ => None,
    }
}

/// Settles the game under `rules`. Does not touch the stored scoreboard.
pub fn settle(game: &GameResult, rules: Rules) -> Result<Settlement, ResolveError> {
    let numbers = validated_numbers(game)?;
    if let Some(seat) = rules.mountain_adjustment {
        game.topology().ensure_active(seat)?;
    }

    let players = numbers.len() as i64;
    let max_pool = numbers.values().map(|own| own.pool).max().unwrap_or(0);
    let ratio = rules.variant.pool_ratio();

    let new_mountain: BTreeMap<Seat, i64> = numbers
        .iter()
        .map(|(&seat, own)| {
            let gap = i64::from(own.pool) - i64::from(max_pool);
            (seat, i64::from(own.mountain) - ratio * gap)
        })
        .collect();
    let min_mountain = new_mountain.values().copied().min().unwrap_or(0);
    let sum: i64 = new_mountain.values().sum();
    let surplus = sum - min_mountain * players;

    let mut mountain_fix: BTreeMap<Seat, i64> = numbers.keys().map(|&seat| (seat, 0)).collect();
    let mut whist_fixes: BTreeMap<Seat, BTreeMap<Seat, i64>> =
        numbers.keys().map(|&seat| (seat, BTreeMap::new())).collect();

    if let Some(adjust) = rules.mountain_adjustment {
        let remainder = surplus.rem_euclid(players);
        let shift = shift_for(players, remainder);
        debug!(%adjust, remainder, ?shift, "mountain adjustment");
        match shift {
            Some(Shift::Down) => {
                mountain_fix.insert(adjust, -1);
                for (&seat, fixes) in whist_fixes.iter_mut() {
                    if seat != adjust {
                        fixes.insert(adjust, ADJUSTMENT_WHISTS);
                    }
                }
            }
            Some(Shift::Up) => {
                mountain_fix.insert(adjust, 1);
                if let Some(fixes) = whist_fixes.get_mut(&adjust) {
                    for &seat in numbers.keys().filter(|&&seat| seat != adjust) {
                        fixes.insert(seat, ADJUSTMENT_WHISTS);
                    }
                }
            }
            None => {}
        }
    }

    let total_fix: i64 = mountain_fix.values().sum();
    let average = Hundredths(((surplus + total_fix) * 200 + players).div_euclid(2 * players));

    let credited = |seat: Seat, against: Seat| -> i64 {
        let written = numbers.get(&seat).map_or(0, |own| own.against(against));
        let fix = whist_fixes
            .get(&seat)
            .and_then(|fixes| fixes.get(&against))
            .copied()
            .unwrap_or(0);
        written + fix
    };

    let mut seats: Vec<SeatSettlement> = numbers
        .keys()
        .map(|&seat| {
            let fix = mountain_fix.get(&seat).copied().unwrap_or(0);
            let new = new_mountain.get(&seat).copied().unwrap_or(0);
            let excess = (new + fix - min_mountain) * 100;
            let final_mountain = (average.0 - excess) * WHISTS_PER_MOUNTAIN / 100;

            let balances: BTreeMap<Seat, i64> = numbers
                .keys()
                .filter(|&&other| other != seat)
                .map(|&other| (other, credited(seat, other) - credited(other, seat)))
                .collect();
            let total_balance = balances.values().sum();

            SeatSettlement {
                seat,
                rank: 0,
                name: game
                    .player(seat)
                    .map(|record| record.name().to_string())
                    .unwrap_or_default(),
                new_mountain: new,
                mountain_fix: fix,
                final_mountain,
                whist_fixes: whist_fixes.get(&seat).cloned().unwrap_or_default(),
                balances,
                total_balance,
                final_score: final_mountain + total_balance,
            }
        })
        .collect();

    seats.sort_by_key(|row| (Reverse(row.final_score), row.seat));
    for (position, row) in seats.iter_mut().enumerate() {
        row.rank = position + 1;
    }

    debug!(
        variant = %rules.variant,
        max_pool,
        min_mountain,
        average = %average,
        "settled game"
    );

    Ok(Settlement {
        rules,
        max_pool,
        min_mountain,
        average_mountain: average,
        seats,
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn variant_ratios() {
        assert_eq!(Variant::Leningrad.pool_ratio(), 2);
        assert_eq!(Variant::Sochi.pool_ratio(), 1);
        assert_eq!("Sochi".parse::<Variant>().unwrap(), Variant::Sochi);
        assert!("rostov".parse::<Variant>().is_err());
    }

    #[test]
    fn hundredths_display() {
        assert_eq!(Hundredths(1333).to_string(), "13.33");
        assert_eq!(Hundredths(4750).to_string(), "47.50");
        assert_eq!(Hundredths(-5).to_string(), "-0.05");
    }

    #[test]
    fn shift_table() {
        assert_eq!(shift_for(4, 1), Some(Shift::Down));
        assert_eq!(shift_for(4, 2), None);
        assert_eq!(shift_for(4, 3), Some(Shift::Up));
        assert_eq!(shift_for(3, 1), Some(Shift::Down));
        assert_eq!(shift_for(3, 2), Some(Shift::Up));
        assert_eq!(shift_for(3, 0), None);
    }

    fn even_game() -> GameResult {
        let mut game = GameResult::new(3).unwrap();
        for seat in game.topology().seats().to_vec() {
            game.set_name(seat, seat.as_str()).unwrap();
            game.set_pool(seat, 10u32).unwrap();
            game.set_mountain(seat, 4u32).unwrap();
            for against in game.topology().opponents(seat).unwrap() {
                game.set_exchange(seat, against, 0u32).unwrap();
            }
        }
        game
    }

    #[test]
    fn adjustment_seat_must_be_seated() {
        let rules = Rules {
            variant: Variant::Leningrad,
            mountain_adjustment: Some(Seat::West),
        };
        assert!(matches!(
            settle(&even_game(), rules),
            Err(ResolveError::Configuration(_))
        ));
    }

    #[test]
    fn even_game_settles_to_zero() {
        let settlement = settle(&even_game(), Rules::default()).unwrap();
        assert_eq!(settlement.average_mountain, Hundredths(0));
        assert_eq!(settlement.min_mountain, 4);
        for row in settlement.seats() {
            assert_eq!(row.final_score, 0);
            assert_eq!(row.mountain_fix, 0);
        }
        let order: Vec<Seat> = settlement.seats().iter().map(|row| row.seat).collect();
        assert_eq!(order, vec![Seat::North, Seat::East, Seat::South]);
    }
}
