//! Command-line definitions.

use std::path::PathBuf;

use clap::{ArgAction, Args, Parser, Subcommand};
use hangartrack_core::BoardId;

use crate::logging::LogFormat;

/// Track keycards, compboards, door cycles and ship claims for the
/// executive hangar.
#[derive(Parser, Debug)]
#[command(name = "hangartrack", author, version, about)]
#[command(propagate_version = true)]
pub struct Cli {
    #[command(subcommand)]
    pub command: Commands,

    /// Progress database.
    #[arg(long, global = true, env = "HANGARTRACK_DB", default_value = "hangartrack.db")]
    pub db: PathBuf,

    /// JSON file overriding calibration, durations or the catalog.
    #[arg(long, global = true, env = "HANGARTRACK_CONFIG")]
    pub config: Option<PathBuf>,

    /// Increase verbosity (-v info, -vv debug, -vvv trace).
    #[arg(short, long, action = ArgAction::Count, global = true)]
    pub verbose: u8,

    /// Log line format.
    #[arg(long, global = true, default_value = "human", env = "HANGARTRACK_LOG_FORMAT")]
    pub log_format: LogFormat,
}

#[derive(Subcommand, Debug)]
pub enum Commands {
    /// Print every tracker reading once.
    Status,

    /// Reprint door and stage readings every poll interval.
    Watch(WatchArgs),

    /// Executive hangar door calibration.
    Hangar {
        #[command(subcommand)]
        action: SyncAction,
    },

    /// Vault timer door calibration.
    Vault {
        #[command(subcommand)]
        action: SyncAction,
    },

    /// Compboard collection and respawn timers.
    Board {
        #[command(subcommand)]
        action: BoardAction,
    },

    /// Ship variant claims.
    Ship {
        #[command(subcommand)]
        action: ShipAction,
    },

    /// Supervisor keycards and printer cooldowns.
    Supervisor {
        #[command(subcommand)]
        action: SupervisorAction,
    },

    /// Write all progress to a JSON backup.
    Export(ExportArgs),

    /// Restore progress from a JSON backup.
    Import(ImportArgs),

    /// Erase all progress.
    ResetAll(ConfirmArgs),
}

#[derive(Args, Debug)]
pub struct WatchArgs {
    /// Stop after this many polls.
    #[arg(long)]
    pub ticks: Option<u64>,
}

#[derive(Subcommand, Debug)]
pub enum SyncAction {
    /// Mark this instant as the door opening.
    Sync,
    /// Forget the calibration.
    Reset,
}

#[derive(Subcommand, Debug)]
pub enum BoardAction {
    /// Flip a board's collected flag.
    Toggle { id: BoardId },
    /// Start a board's respawn timer.
    Start { id: BoardId },
    /// Clear a board's respawn timer.
    Reset { id: BoardId },
    /// Uncollect every board and clear every timer.
    ResetAll(ConfirmArgs),
}

#[derive(Subcommand, Debug)]
pub enum ShipAction {
    /// List every variant and its claim state.
    List,
    /// Flip a variant's claimed flag, e.g. "Corsair-stealth".
    Toggle { id: String },
    /// Unclaim every variant.
    ResetAll(ConfirmArgs),
}

#[derive(Subcommand, Debug)]
pub enum SupervisorAction {
    /// Flip a printer's collected flag.
    Toggle { id: String },
    /// Start a printer's cooldown.
    Start { id: String },
    /// Clear a printer's cooldown.
    Reset { id: String },
}

#[derive(Args, Debug)]
pub struct ExportArgs {
    /// Output file. Defaults to a dated name in the current directory.
    #[arg(short, long)]
    pub out: Option<PathBuf>,
}

#[derive(Args, Debug)]
pub struct ImportArgs {
    pub file: PathBuf,
}

#[derive(Args, Debug)]
pub struct ConfirmArgs {
    /// Confirm the irreversible reset.
    #[arg(long)]
    pub yes: bool,
}
