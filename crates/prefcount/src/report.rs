use clap::ValueEnum;
use pref_core::game::{GameResult, Rules, Scoreboard, Settlement};
use pref_core::model::Seat;
use serde::Serialize;
use std::fmt::Write;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, ValueEnum)]
pub enum OutputFormat {
    #[default]
    Text,
    Json,
}

/// Everything printed once a game has been scored.
#[derive(Debug, Clone, Serialize)]
pub struct Report {
    pub players: usize,
    pub rules: Rules,
    pub scoreboard: Scoreboard,
    pub settlement: Settlement,
    #[serde(skip)]
    initials: Vec<(Seat, String)>,
}

impl Report {
    pub fn new(game: &GameResult, scoreboard: Scoreboard, settlement: Settlement) -> Self {
        Self {
            players: game.player_count(),
            rules: settlement.rules,
            scoreboard,
            settlement,
            initials: game
                .players()
                .map(|record| (record.seat(), record.initial()))
                .collect(),
        }
    }

    pub fn render(&self, format: OutputFormat) -> serde_json::Result<String> {
        match format {
            OutputFormat::Text => Ok(self.to_text()),
            OutputFormat::Json => serde_json::to_string_pretty(self),
        }
    }

    fn initial(&self, seat: Seat) -> String {
        self.initials
            .iter()
            .find(|(owner, _)| *owner == seat)
            .map(|(_, initial)| initial.clone())
            .filter(|initial| !initial.is_empty())
            .unwrap_or_else(|| seat.letter().to_string())
    }

    pub fn to_text(&self) -> String {
        let mut out = String::new();
        let adjustment = self
            .rules
            .mountain_adjustment
            .map_or_else(|| "off".to_string(), |seat| seat.to_string());

        let _ = writeln!(
            out,
            "Final scores ({} players, {}, adjustment {adjustment})",
            self.players, self.rules.variant
        );
        let _ = writeln!(
            out,
            "{:>2}  {:<6} {:<12} {:>6} {:>9} {:>7} {:>7}",
            "#", "seat", "name", "pool", "mountain", "whists", "total"
        );
        for row in self.scoreboard.standings() {
            let _ = writeln!(
                out,
                "{:>2}  {:<6} {:<12} {:>6} {:>9} {:>7} {:>7}",
                row.rank, row.seat, row.name, row.pool, row.mountain, row.net_exchange, row.total
            );
        }

        let settlement = &self.settlement;
        let _ = writeln!(out);
        let _ = writeln!(
            out,
            "Settlement (max pool {}, min mountain {}, average {})",
            settlement.max_pool, settlement.min_mountain, settlement.average_mountain
        );
        for row in settlement.seats() {
            let balances: Vec<String> = row
                .balances
                .iter()
                .map(|(&other, balance)| format!("{}:{balance:+}", self.initial(other)))
                .collect();
            let fix = if row.mountain_fix == 0 {
                String::new()
            } else {
                format!(" (fix {:+})", row.mountain_fix)
            };
            let _ = writeln!(
                out,
                "{:>2}  {:<6} {:<12} mountain {:>6}{fix}  whists {:>5} [{}]  final {:>6}",
                row.rank,
                row.seat,
                row.name,
                row.final_mountain,
                row.total_balance,
                balances.join(" "),
                row.final_score
            );
        }
        out
    }
}
