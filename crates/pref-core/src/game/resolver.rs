use crate::error::{ConfigurationError, ResolveError};
use crate::game::result::GameResult;
use crate::game::scoreboard::{Scoreboard, Standing};
use crate::model::player::PlayerNumbers;
use crate::model::seat::Seat;
use crate::model::topology::Topology;
use crate::model::validate::check_complete;
use std::collections::BTreeMap;
use tracing::debug;

/// Computes the final scoreboard and stores it on the game.
///
/// For every seat the total is `pool - mountain + net exchange`, where the
/// net exchange sums, over each opponent, what the seat wrote against the
/// opponent minus what the opponent wrote against the seat. Entries are not
/// required to mirror each other.
pub fn resolve(game: &mut GameResult) -> Result<Scoreboard, ResolveError> {
    let board = compute(game)?;
    game.store_final_scores(board.clone());
    Ok(board)
}

/// Same as [`resolve`] without storing the result.
pub fn compute(game: &GameResult) -> Result<Scoreboard, ResolveError> {
    let numbers = validated_numbers(game)?;

    let rows = numbers
        .iter()
        .map(|(&seat, own)| {
            let net_exchange = net_exchange(seat, &numbers);
            let total = i64::from(own.pool) - i64::from(own.mountain) + net_exchange;
            let name = game
                .player(seat)
                .map(|record| record.name().to_string())
                .unwrap_or_default();
            Standing {
                seat,
                rank: 0,
                name,
                pool: own.pool,
                mountain: own.mountain,
                net_exchange,
                total,
            }
        })
        .collect();

    let board = Scoreboard::ranked(rows);
    debug!(
        players = game.player_count(),
        leader = ?board.leader(),
        "resolved final scores"
    );
    Ok(board)
}

/// Checks table shape and completeness, then returns every seat's numbers.
pub(crate) fn validated_numbers(
    game: &GameResult,
) -> Result<BTreeMap<Seat, PlayerNumbers>, ResolveError> {
    let seated = Topology::from_seats(game.players().map(|record| record.seat()))?;
    if seated != game.topology() {
        return Err(ConfigurationError::UnsupportedTable {
            seats: game.players().map(|record| record.seat()).collect(),
        }
        .into());
    }
    check_complete(game)?;

    let mut numbers = BTreeMap::new();
    for record in game.players() {
        numbers.insert(record.seat(), record.numbers()?);
    }
    Ok(numbers)
}

fn net_exchange(seat: Seat, numbers: &BTreeMap<Seat, PlayerNumbers>) -> i64 {
    let Some(own) = numbers.get(&seat) else {
        return 0;
    };
    own.exchanges
        .iter()
        .map(|(&against, &written)| {
            let received = numbers
                .get(&against)
                .map_or(0, |other| other.against(seat));
            i64::from(written) - received
        })
        .sum()
}

#[cfg(test)]
mod tests {
    use super::{compute, resolve};
    use crate::error::{IncompleteInputError, ResolveError};
    use crate::game::result::GameResult;
    use crate::model::seat::Seat;
    use crate::model::validate::{FieldKind, Problem};

    fn sample() -> GameResult {
        let mut game = GameResult::new(3).unwrap();
        let rows = [
            (Seat::North, "dariya", 56, 22, [(Seat::East, 24), (Seat::South, 32)]),
            (Seat::East, "kolya", 22, 22, [(Seat::North, 100), (Seat::South, 32)]),
            (Seat::South, "fedya", 12, 34, [(Seat::North, 72), (Seat::East, 56)]),
        ];
        for (seat, name, pool, mountain, whists) in rows {
            game.set_name(seat, name).unwrap();
            game.set_pool(seat, pool as u32).unwrap();
            game.set_mountain(seat, mountain as u32).unwrap();
            for (against, value) in whists {
                game.set_exchange(seat, against, value as u32).unwrap();
            }
        }
        game
    }

    #[test]
    fn reproduces_three_player_fixture() {
        let mut game = sample();
        let board = resolve(&mut game).unwrap();

        let north = board.get(Seat::North).unwrap();
        assert_eq!(north.net_exchange, -116);
        assert_eq!(north.total, -82);

        let east = board.get(Seat::East).unwrap();
        assert_eq!(east.net_exchange, 100 + 32 - 24 - 56);
        assert_eq!(east.total, 52);

        let south = board.get(Seat::South).unwrap();
        assert_eq!(south.net_exchange, 72 + 56 - 32 - 32);
        assert_eq!(south.total, 12 - 34 + 64);

        assert_eq!(board.order(), vec![Seat::East, Seat::South, Seat::North]);
        assert_eq!(game.final_scores(), Some(&board));
    }

    #[test]
    fn net_exchange_cancels_across_table() {
        let board = compute(&sample()).unwrap();
        let net: i64 = board.standings().iter().map(|row| row.net_exchange).sum();
        assert_eq!(net, 0);
    }

    #[test]
    fn missing_mountain_is_reported_not_zeroed() {
        let mut game = sample();
        game.set_mountain(Seat::East, "  ").unwrap();
        let err = resolve(&mut game).unwrap_err();
        assert_eq!(
            err,
            ResolveError::Incomplete(IncompleteInputError {
                seat: Seat::East,
                field: FieldKind::Mountain,
                problem: Problem::Missing,
            })
        );
        assert!(game.final_scores().is_none());
    }

    #[test]
    fn resolving_twice_is_identical() {
        let mut game = sample();
        let first = resolve(&mut game).unwrap();
        let second = resolve(&mut game).unwrap();
        assert_eq!(first, second);
        assert_eq!(first.to_json().unwrap(), second.to_json().unwrap());
    }

    #[test]
    fn text_and_number_entries_resolve_alike() {
        let numeric = compute(&sample()).unwrap();
        let mut game = sample();
        game.set_pool(Seat::North, " 56\n").unwrap();
        game.set_exchange(Seat::South, Seat::East, "+56").unwrap();
        assert_eq!(compute(&game).unwrap(), numeric);
    }

    #[test]
    fn mutation_clears_stored_scores() {
        let mut game = sample();
        resolve(&mut game).unwrap();
        assert!(game.is_resolved());
        game.set_pool(Seat::North, 57u32).unwrap();
        assert!(!game.is_resolved());
    }
}
