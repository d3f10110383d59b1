//! Command execution and text rendering.

use std::fs;
use std::io::Write;
use std::path::{Path, PathBuf};

use hangartrack_core::{
    HangarReading, LED_COUNT, Stage, SystemClock, TimeSource, TrackerConfig, VaultReading, Zone,
    format_remaining,
};
use hangartrack_engine::{EngineError, Readings, StageStatus, Tracker};
use hangartrack_storage::{SqliteStorage, Storage};
use tracing::{debug, info};

use crate::args::{BoardAction, Cli, Commands, ShipAction, SupervisorAction, SyncAction};
use crate::error::CliError;

/// Reads an optional JSON config file; absent means all defaults.
pub fn load_config(path: Option<&Path>) -> Result<TrackerConfig, CliError> {
    let Some(path) = path else {
        return Ok(TrackerConfig::default());
    };
    let config_error = |reason: String| CliError::Config {
        path: path.to_path_buf(),
        reason,
    };
    let text = fs::read_to_string(path).map_err(|e| config_error(e.to_string()))?;
    let config: TrackerConfig =
        serde_json::from_str(&text).map_err(|e| config_error(e.to_string()))?;
    debug!(path = %path.display(), "config loaded");
    Ok(config)
}

pub fn dispatch(cli: Cli) -> Result<(), CliError> {
    let config = load_config(cli.config.as_deref())?;
    let storage = SqliteStorage::open(&cli.db.to_string_lossy()).map_err(EngineError::from)?;
    let mut tracker = Tracker::open(config, storage, SystemClock)?;
    info!(db = %cli.db.display(), "tracker opened");
    run(&mut tracker, cli.command, &mut std::io::stdout().lock())
}

pub fn run<S, C, W>(
    tracker: &mut Tracker<S, C>,
    command: Commands,
    out: &mut W,
) -> Result<(), CliError>
where
    S: Storage,
    C: TimeSource,
    W: Write,
{
    match command {
        Commands::Status => write_status(tracker, out)?,
        Commands::Watch(args) => {
            let mut polls = 0u64;
            loop {
                writeln!(out, "{}", watch_line(&tracker.tick()))?;
                out.flush()?;
                polls += 1;
                if args.ticks.is_some_and(|limit| polls >= limit) {
                    break;
                }
                std::thread::sleep(tracker.config().poll_interval());
            }
        }
        Commands::Hangar { action } => {
            match action {
                SyncAction::Sync => {
                    tracker.sync_hangar()?;
                }
                SyncAction::Reset => tracker.reset_hangar_sync()?,
            }
            writeln!(out, "{}", hangar_line(&tracker.hangar()))?;
        }
        Commands::Vault { action } => {
            match action {
                SyncAction::Sync => tracker.sync_vault()?,
                SyncAction::Reset => tracker.reset_vault()?,
            }
            writeln!(out, "{}", vault_line(&tracker.vault()))?;
        }
        Commands::Board { action } => match action {
            BoardAction::Toggle { id } => {
                if !tracker.toggle_board(id)? {
                    return Err(unknown("board", id));
                }
                let collected = tracker.boards().get(id).is_some_and(|b| b.collected);
                writeln!(out, "board {id}: {}", collected_label(collected))?;
            }
            BoardAction::Start { id } => {
                if tracker.start_board_timer(id)?.is_none() {
                    return Err(unknown("board", id));
                }
                let left = tracker.board_remaining(id).unwrap_or(0);
                writeln!(out, "board {id}: timer {}", format_remaining(left))?;
            }
            BoardAction::Reset { id } => {
                if !tracker.reset_board_timer(id)? {
                    return Err(unknown("board", id));
                }
                writeln!(out, "board {id}: timer cleared")?;
            }
            BoardAction::ResetAll(confirm) => {
                if !confirm.yes {
                    return Err(CliError::NotConfirmed("resetting all compboards"));
                }
                tracker.reset_boards()?;
                writeln!(out, "all compboards reset")?;
            }
        },
        Commands::Ship { action } => match action {
            ShipAction::List => {
                for ship in tracker.ships().iter() {
                    let mark = check_mark(ship.claimed);
                    writeln!(out, "[{mark}] {}", ship.def.id)?;
                }
                let ships = tracker.ships();
                writeln!(out, "{}/{} claimed", ships.claimed_count(), ships.total())?;
            }
            ShipAction::Toggle { id } => {
                if !tracker.toggle_ship(&id)? {
                    return Err(unknown("ship variant", &id));
                }
                let claimed = tracker.ships().get(&id).is_some_and(|s| s.claimed);
                writeln!(out, "{id}: {}", if claimed { "claimed" } else { "unclaimed" })?;
            }
            ShipAction::ResetAll(confirm) => {
                if !confirm.yes {
                    return Err(CliError::NotConfirmed("resetting all claimed ships"));
                }
                tracker.reset_ships()?;
                writeln!(out, "all ship claims reset")?;
            }
        },
        Commands::Supervisor { action } => match action {
            SupervisorAction::Toggle { id } => {
                if !tracker.toggle_supervisor(&id)? {
                    return Err(unknown("printer", &id));
                }
                let collected = tracker.supervisor().is_collected(&id);
                writeln!(out, "{id}: {}", collected_label(collected))?;
            }
            SupervisorAction::Start { id } => {
                if tracker.start_supervisor_cooldown(&id)?.is_none() {
                    return Err(unknown("printer", &id));
                }
                let left = tracker.supervisor_remaining(&id).unwrap_or(0);
                writeln!(out, "{id}: cooldown {}", format_remaining(left))?;
            }
            SupervisorAction::Reset { id } => {
                if !tracker.reset_supervisor_cooldown(&id)? {
                    return Err(unknown("printer", &id));
                }
                writeln!(out, "{id}: cooldown cleared")?;
            }
        },
        Commands::Export(args) => {
            let doc = tracker.export()?;
            let path = args
                .out
                .unwrap_or_else(|| PathBuf::from(tracker.export_file_name()));
            fs::write(&path, doc)?;
            writeln!(out, "exported to {}", path.display())?;
        }
        Commands::Import(args) => {
            let text = fs::read_to_string(&args.file)?;
            let written = tracker.import(&text)?;
            writeln!(out, "restored {written} records from {}", args.file.display())?;
        }
        Commands::ResetAll(confirm) => {
            if !confirm.yes {
                return Err(CliError::NotConfirmed("resetting all progress"));
            }
            tracker.reset_all(true)?;
            writeln!(out, "all progress erased")?;
        }
    }
    Ok(())
}

fn unknown(kind: &'static str, id: impl ToString) -> CliError {
    CliError::UnknownItem {
        kind,
        id: id.to_string(),
    }
}

fn collected_label(collected: bool) -> &'static str {
    if collected {
        "collected"
    } else {
        "not collected"
    }
}

fn check_mark(done: bool) -> &'static str {
    if done { "x" } else { " " }
}

fn leds(lit: u8) -> String {
    (0..LED_COUNT)
        .map(|i| if i < lit { '●' } else { '○' })
        .collect()
}

pub fn hangar_line(r: &HangarReading) -> String {
    let (state, verb) = if r.is_green() {
        ("OPEN", "closes")
    } else {
        ("CLOSED", "opens")
    };
    let sync = if r.synced {
        "synced"
    } else {
        "default calibration"
    };
    format!(
        "hangar {state} {} left, {verb} at {} [{}] ({sync})",
        format_remaining(r.remaining_ms),
        r.changes_at_label(),
        leds(r.leds_lit),
    )
}

pub fn vault_line(r: &VaultReading) -> String {
    match r.is_open {
        None => "vault unknown (sync when the door opens)".to_string(),
        Some(open) => format!(
            "vault {} {} left ({:.0}% of phase)",
            if open { "OPEN" } else { "CLOSED" },
            format_remaining(r.remaining_ms),
            r.progress * 100.0,
        ),
    }
}

pub fn watch_line(readings: &Readings) -> String {
    format!(
        "{} | {} | stages {}/{}{}",
        hangar_line(&readings.hangar),
        vault_line(&readings.vault),
        readings.stages.completed(),
        readings.stages.total(),
        if readings.stages.blocked {
            " (waiting for hangar)"
        } else {
            ""
        },
    )
}

fn write_status<S, C, W>(tracker: &Tracker<S, C>, out: &mut W) -> Result<(), CliError>
where
    S: Storage,
    C: TimeSource,
    W: Write,
{
    let readings = tracker.tick();
    writeln!(out, "{}", hangar_line(&readings.hangar))?;
    writeln!(out, "{}", vault_line(&readings.vault))?;

    writeln!(out)?;
    writeln!(
        out,
        "stages {}/{} ({}%)",
        readings.stages.completed(),
        readings.stages.total(),
        readings.stages.percent()
    )?;
    for (stage, status) in readings.stages.iter() {
        let mark = match status {
            StageStatus::Done => "x",
            StageStatus::Blocked => "!",
            StageStatus::Pending => " ",
        };
        writeln!(out, "  [{mark}] {}. {}", stage.number(), stage.title())?;
        writeln!(out, "        {}", stage.description())?;
    }

    writeln!(out)?;
    writeln!(out, "supervisor cards")?;
    for printer in tracker.supervisor().printers() {
        let mark = check_mark(tracker.supervisor().is_collected(&printer.id));
        let cooldown = tracker
            .supervisor_remaining(&printer.id)
            .map(|ms| format!(" cooldown {}", format_remaining(ms)))
            .unwrap_or_default();
        writeln!(out, "  [{mark}] {} {}{cooldown}", printer.id, printer.label)?;
    }

    writeln!(out)?;
    writeln!(
        out,
        "compboards {}/{}",
        tracker.boards().collected_count(),
        tracker.boards().total()
    )?;
    for zone in Zone::ALL {
        let done = if tracker.boards().zone_done(zone) {
            " (done)"
        } else {
            ""
        };
        writeln!(out, "  {}{done}", zone.display_name())?;
        for board in tracker.boards().by_zone(zone) {
            let mark = check_mark(board.collected);
            let cards = if board.def.keycards.is_empty() {
                "no keycard".to_string()
            } else {
                board
                    .def
                    .keycards
                    .iter()
                    .map(|k| k.as_str())
                    .collect::<Vec<_>>()
                    .join("+")
            };
            let timer = tracker
                .board_remaining(board.id())
                .map(|ms| format!(" timer {}", format_remaining(ms)))
                .unwrap_or_default();
            writeln!(
                out,
                "    [{mark}] {} {} ({cards}){timer}",
                board.def.label, board.def.location
            )?;
        }
    }

    writeln!(out)?;
    writeln!(
        out,
        "ships {}/{} claimed",
        tracker.ships().claimed_count(),
        tracker.ships().total()
    )?;
    if readings.stages.status(Stage::ExecutiveHangar) == StageStatus::Blocked {
        writeln!(out, "all compboards collected; waiting for the hangar to open")?;
    }
    Ok(())
}
