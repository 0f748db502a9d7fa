//! The score-entry wizard.
//!
//! Steps run in a fixed order that depends on the table size:
//! preferences, player names, one data step per seated player, final scores.
//! A step can only be left forward once the aggregate holds everything that
//! step asks for; the refusal carries the engine's seat and field diagnostic.

use crate::sheet::{GameSheet, SheetError};
use core::fmt;
use pref_core::game::{GameResult, Rules, Scoreboard, Settlement, resolve, settle};
use pref_core::model::{Seat, check_names, check_seat};
use pref_core::{ConfigurationError, IncompleteInputError, ResolveError};
use thiserror::Error;
use tracing::info;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Step {
    Preferences,
    Names,
    PlayerData(Seat),
    FinalScores,
}

impl fmt::Display for Step {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Step::Preferences => f.write_str("preferences"),
            Step::Names => f.write_str("player names"),
            Step::PlayerData(seat) => write!(f, "{seat} score card"),
            Step::FinalScores => f.write_str("final scores"),
        }
    }
}

#[derive(Debug, Error)]
pub enum WizardError {
    #[error("cannot leave {step}: {source}")]
    Incomplete {
        step: Step,
        #[source]
        source: IncompleteInputError,
    },
    #[error(transparent)]
    Configuration(#[from] ConfigurationError),
    #[error(transparent)]
    Resolve(#[from] ResolveError),
    #[error(transparent)]
    Sheet(#[from] SheetError),
    #[error("{0} can only be changed on the preferences step")]
    Locked(&'static str),
    #[error("already at the first step")]
    AtFirstStep,
    #[error("the wizard is finished")]
    Finished,
}

impl WizardError {
    pub fn incomplete(&self) -> Option<&IncompleteInputError> {
        match self {
            WizardError::Incomplete { source, .. } => Some(source),
            WizardError::Resolve(err) => err.incomplete(),
            _ => None,
        }
    }
}

#[derive(Debug, Clone)]
pub struct Wizard {
    game: GameResult,
    rules: Rules,
    step: Step,
    settlement: Option<Settlement>,
}

impl Wizard {
    pub fn new(players: usize, rules: Rules) -> Result<Self, WizardError> {
        Ok(Self {
            game: GameResult::new(players)?,
            rules,
            step: Step::Preferences,
            settlement: None,
        })
    }

    pub fn step(&self) -> Step {
        self.step
    }

    pub fn game(&self) -> &GameResult {
        &self.game
    }

    /// Mutable access to the aggregate for the current step's inputs.
    pub fn game_mut(&mut self) -> &mut GameResult {
        &mut self.game
    }

    pub fn rules(&self) -> Rules {
        self.rules
    }

    pub fn scoreboard(&self) -> Option<&Scoreboard> {
        self.game.final_scores()
    }

    pub fn settlement(&self) -> Option<&Settlement> {
        self.settlement.as_ref()
    }

    /// Every step for the current table, in order.
    pub fn steps(&self) -> Vec<Step> {
        let mut steps = vec![Step::Preferences, Step::Names];
        steps.extend(self.game.topology().seats().iter().map(|&seat| Step::PlayerData(seat)));
        steps.push(Step::FinalScores);
        steps
    }

    /// Changes the table size. Names of seats that remain are kept.
    pub fn set_player_count(&mut self, players: usize) -> Result<(), WizardError> {
        if self.step != Step::Preferences {
            return Err(WizardError::Locked("number of players"));
        }
        if players != self.game.player_count() {
            self.game.change_player_count(players)?;
        }
        Ok(())
    }

    pub fn set_rules(&mut self, rules: Rules) -> Result<(), WizardError> {
        if self.step != Step::Preferences {
            return Err(WizardError::Locked("rules"));
        }
        self.rules = rules;
        Ok(())
    }

    /// Checks the current step and moves to the next one.
    pub fn advance(&mut self) -> Result<Step, WizardError> {
        let next = match self.step {
            Step::Preferences => {
                if let Some(seat) = self.rules.mountain_adjustment {
                    self.game.topology().ensure_active(seat)?;
                }
                Step::Names
            }
            Step::Names => {
                check_names(&self.game).map_err(|source| self.refuse(source))?;
                self.data_step(0)
            }
            Step::PlayerData(seat) => {
                check_seat(&self.game, seat).map_err(|source| self.refuse(source))?;
                let position = self.position(seat);
                self.data_step(position + 1)
            }
            Step::FinalScores => return Err(WizardError::Finished),
        };

        if next == Step::FinalScores {
            resolve(&mut self.game)?;
            self.settlement = Some(settle(&self.game, self.rules)?);
        }

        info!(from = %self.step, to = %next, "wizard step");
        self.step = next;
        Ok(next)
    }

    /// Moves to the previous step. Inputs are kept.
    pub fn back(&mut self) -> Result<Step, WizardError> {
        let previous = match self.step {
            Step::Preferences => return Err(WizardError::AtFirstStep),
            Step::Names => Step::Preferences,
            Step::PlayerData(seat) => match self.position(seat) {
                0 => Step::Names,
                position => self.data_step(position - 1),
            },
            Step::FinalScores => {
                self.settlement = None;
                let last = self.game.player_count().saturating_sub(1);
                self.data_step(last)
            }
        };
        info!(from = %self.step, to = %previous, "wizard step back");
        self.step = previous;
        Ok(previous)
    }

    /// Starts over with the same table and rules.
    pub fn reset(&mut self) {
        self.game.reset();
        self.settlement = None;
        self.step = Step::Preferences;
    }

    /// Walks every step, filling each one from `sheet` just before leaving it.
    pub fn run_sheet(&mut self, sheet: &GameSheet) -> Result<&Settlement, WizardError> {
        while self.step != Step::FinalScores {
            match self.step {
                Step::Preferences => {
                    if let Some(players) = sheet.players {
                        self.set_player_count(players)?;
                    }
                }
                Step::Names => sheet.fill_names(&mut self.game)?,
                Step::PlayerData(seat) => sheet.fill_seat(&mut self.game, seat)?,
                Step::FinalScores => {}
            }
            self.advance()?;
        }
        self.settlement.as_ref().ok_or(WizardError::Finished)
    }

    fn position(&self, seat: Seat) -> usize {
        self.game
            .topology()
            .seats()
            .iter()
            .position(|&other| other == seat)
            .unwrap_or(0)
    }

    fn data_step(&self, position: usize) -> Step {
        match self.game.topology().seats().get(position) {
            Some(&seat) => Step::PlayerData(seat),
            None => Step::FinalScores,
        }
    }

    fn refuse(&self, source: IncompleteInputError) -> WizardError {
        info!(step = %self.step, %source, "wizard step refused");
        WizardError::Incomplete {
            step: self.step,
            source,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use pref_core::game::Variant;
    use pref_core::model::{FieldKind, Problem};

    fn plain() -> Rules {
        Rules {
            variant: Variant::Leningrad,
            mountain_adjustment: None,
        }
    }

    fn fill_names(wizard: &mut Wizard) {
        for (seat, name) in [
            (Seat::North, "dariya"),
            (Seat::East, "kolya"),
            (Seat::South, "fedya"),
        ] {
            wizard.game_mut().set_name(seat, name).unwrap();
        }
    }

    fn fill_seat(
        wizard: &mut Wizard,
        seat: Seat,
        pool: u32,
        mountain: u32,
        whists: [(Seat, u32); 2],
    ) {
        let game = wizard.game_mut();
        game.set_pool(seat, pool).unwrap();
        game.set_mountain(seat, mountain).unwrap();
        for (against, value) in whists {
            game.set_exchange(seat, against, value).unwrap();
        }
    }

    #[test]
    fn three_player_steps_skip_west() {
        let wizard = Wizard::new(3, plain()).unwrap();
        assert_eq!(
            wizard.steps(),
            vec![
                Step::Preferences,
                Step::Names,
                Step::PlayerData(Seat::North),
                Step::PlayerData(Seat::East),
                Step::PlayerData(Seat::South),
                Step::FinalScores,
            ]
        );
    }

    #[test]
    fn names_step_refuses_blank_name() {
        let mut wizard = Wizard::new(3, plain()).unwrap();
        assert_eq!(wizard.advance().unwrap(), Step::Names);
        wizard.game_mut().set_name(Seat::North, "dariya").unwrap();

        let err = wizard.advance().unwrap_err();
        assert_eq!(
            err.incomplete(),
            Some(&IncompleteInputError {
                seat: Seat::East,
                field: FieldKind::Name,
                problem: Problem::Missing,
            })
        );
        assert_eq!(wizard.step(), Step::Names);
    }

    #[test]
    fn walks_to_final_scores() {
        let mut wizard = Wizard::new(3, plain()).unwrap();
        wizard.advance().unwrap();
        fill_names(&mut wizard);
        assert_eq!(wizard.advance().unwrap(), Step::PlayerData(Seat::North));

        fill_seat(&mut wizard, Seat::North, 56, 22, [(Seat::East, 24), (Seat::South, 32)]);
        assert_eq!(wizard.advance().unwrap(), Step::PlayerData(Seat::East));

        fill_seat(&mut wizard, Seat::East, 22, 22, [(Seat::North, 100), (Seat::South, 32)]);
        wizard.game_mut().set_mountain(Seat::East, "22x").unwrap();
        let err = wizard.advance().unwrap_err();
        assert!(matches!(
            err,
            WizardError::Incomplete {
                step: Step::PlayerData(Seat::East),
                source: IncompleteInputError {
                    field: FieldKind::Mountain,
                    problem: Problem::Malformed,
                    ..
                },
            }
        ));
        wizard.game_mut().set_mountain(Seat::East, "22").unwrap();
        assert_eq!(wizard.advance().unwrap(), Step::PlayerData(Seat::South));

        fill_seat(&mut wizard, Seat::South, 12, 34, [(Seat::North, 72), (Seat::East, 56)]);
        assert_eq!(wizard.advance().unwrap(), Step::FinalScores);

        let board = wizard.scoreboard().expect("resolved");
        assert_eq!(board.order(), vec![Seat::East, Seat::South, Seat::North]);
        assert_eq!(wizard.settlement().unwrap().final_score(Seat::North), Some(444));
        assert!(matches!(wizard.advance(), Err(WizardError::Finished)));
    }

    #[test]
    fn back_walks_the_same_path() {
        let mut wizard = Wizard::new(4, plain()).unwrap();
        assert!(matches!(wizard.back(), Err(WizardError::AtFirstStep)));
        wizard.advance().unwrap();
        for seat in Seat::LOOP {
            wizard.game_mut().set_name(seat, seat.as_str()).unwrap();
        }
        wizard.advance().unwrap();
        assert_eq!(wizard.back().unwrap(), Step::Names);
        assert_eq!(wizard.back().unwrap(), Step::Preferences);
        assert_eq!(wizard.game().player(Seat::West).unwrap().name(), "West");
    }

    #[test]
    fn player_count_is_locked_after_preferences() {
        let mut wizard = Wizard::new(4, plain()).unwrap();
        wizard.game_mut().set_name(Seat::North, "grisha").unwrap();
        wizard.set_player_count(3).unwrap();
        assert_eq!(wizard.game().player_count(), 3);
        assert_eq!(wizard.game().player(Seat::North).unwrap().name(), "grisha");

        wizard.advance().unwrap();
        assert!(matches!(
            wizard.set_player_count(4),
            Err(WizardError::Locked(_))
        ));
        assert!(wizard.set_rules(Rules::default()).is_err());
    }

    #[test]
    fn adjustment_seat_must_sit_at_table() {
        let rules = Rules {
            variant: Variant::Sochi,
            mountain_adjustment: Some(Seat::West),
        };
        let mut wizard = Wizard::new(3, rules).unwrap();
        assert!(matches!(
            wizard.advance(),
            Err(WizardError::Configuration(ConfigurationError::InactiveSeat { .. }))
        ));
        wizard.set_player_count(4).unwrap();
        assert_eq!(wizard.advance().unwrap(), Step::Names);
    }

    #[test]
    fn runs_a_sheet_and_stops_at_first_gap() {
        let sheet: GameSheet = r#"
seats:
  north: { name: dariya, pool: 56, mountain: 22, whists: { east: 24, south: 32 } }
  east:  { name: kolya, pool: 22, whists: { north: 100, south: 32 } }
  south: { name: fedya, pool: 12, mountain: 34, whists: { north: 72, east: 56 } }
"#
        .parse()
        .unwrap();
        let mut wizard = Wizard::new(3, plain()).unwrap();
        let err = wizard.run_sheet(&sheet).unwrap_err();
        assert_eq!(wizard.step(), Step::PlayerData(Seat::East));
        assert_eq!(
            err.incomplete().map(|gap| (gap.seat, gap.field)),
            Some((Seat::East, FieldKind::Mountain))
        );

        wizard.game_mut().set_mountain(Seat::East, 22u32).unwrap();
        let settlement = wizard.run_sheet(&sheet).unwrap();
        assert_eq!(settlement.final_score(Seat::East), Some(-68));
    }

    #[test]
    fn reset_returns_to_preferences() {
        let mut wizard = Wizard::new(3, plain()).unwrap();
        wizard.advance().unwrap();
        fill_names(&mut wizard);
        wizard.reset();
        assert_eq!(wizard.step(), Step::Preferences);
        assert_eq!(wizard.game().player(Seat::North).unwrap().name(), "");
    }
}
