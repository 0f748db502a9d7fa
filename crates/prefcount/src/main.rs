use std::path::PathBuf;

use anyhow::Context;
use clap::Parser;
use pref_core::AppInfo;
use pref_core::game::{GameResult, Variant};
use pref_core::model::{Seat, check_complete};
use tracing::info;

use prefcount::config::{AppConfig, DEFAULT_CONFIG_PATH};
use prefcount::logging::init_logging;
use prefcount::report::{OutputFormat, Report};
use prefcount::sheet::GameSheet;
use prefcount::wizard::Wizard;

/// Final score calculator for Preference.
#[derive(Debug, Parser)]
#[command(
    name = "prefcount",
    author,
    version,
    about = "Resolves the final scores of a Preference game sheet"
)]
struct Cli {
    /// Game sheet (YAML or JSON) with names, pools, mountains and whists.
    #[arg(value_name = "SHEET")]
    sheet: PathBuf,

    /// Path to the YAML configuration file. Defaults apply when the default
    /// file does not exist.
    #[arg(short, long, value_name = "FILE")]
    config: Option<PathBuf>,

    /// Override the number of players (3 or 4).
    #[arg(long, value_name = "COUNT")]
    players: Option<usize>,

    /// Override the rule variant (leningrad or sochi).
    #[arg(long, value_name = "VARIANT")]
    variant: Option<Variant>,

    /// Leave an uneven mountain surplus in the average.
    #[arg(long, conflicts_with = "adjust_seat")]
    no_adjustment: bool,

    /// Seat that absorbs an uneven mountain surplus.
    #[arg(long, value_name = "SEAT")]
    adjust_seat: Option<Seat>,

    /// Output format.
    #[arg(long, value_enum, default_value_t = OutputFormat::Text)]
    format: OutputFormat,

    /// Exit after validating the configuration and the sheet.
    #[arg(long)]
    validate_only: bool,
}

fn main() -> anyhow::Result<()> {
    let cli = Cli::parse();
    let mut config = match &cli.config {
        Some(path) => AppConfig::from_path(path)?,
        None => AppConfig::from_path_or_default(DEFAULT_CONFIG_PATH)?,
    };

    let mut sheet = GameSheet::from_path(&cli.sheet)?;
    if let Some(players) = sheet.players {
        config.players = players;
    }

    if let Some(players) = cli.players {
        config.players = players;
    }

    if let Some(variant) = cli.variant {
        config.rules.variant = variant;
    }

    if let Some(seat) = cli.adjust_seat {
        config.rules.mountain_adjustment.enabled = true;
        config.rules.mountain_adjustment.seat = seat;
    }

    if cli.no_adjustment {
        config.rules.mountain_adjustment.enabled = false;
    }

    config.validate()?;

    let _logging_guard = init_logging(&config.logging)?;
    info!(
        app = AppInfo::name(),
        version = AppInfo::version(),
        sheet = %cli.sheet.display(),
        players = config.players,
        variant = %config.rules.variant,
        "loaded game sheet"
    );

    if cli.validate_only {
        let mut game = GameResult::new(config.players)?;
        sheet.fill(&mut game)?;
        if let Err(gap) = check_complete(&game) {
            anyhow::bail!("sheet '{}' is incomplete: {gap}", cli.sheet.display());
        }
        println!(
            "Sheet '{}' is complete ({} players).",
            cli.sheet.display(),
            config.players
        );
        return Ok(());
    }

    sheet.players = Some(config.players);
    let mut wizard = Wizard::new(config.players, config.rules())?;
    let settlement = wizard
        .run_sheet(&sheet)
        .with_context(|| format!("scoring {}", cli.sheet.display()))?
        .clone();
    let scoreboard = wizard
        .scoreboard()
        .cloned()
        .context("game resolved without a scoreboard")?;

    let report = Report::new(wizard.game(), scoreboard, settlement);
    print!("{}", report.render(cli.format)?);
    Ok(())
}
