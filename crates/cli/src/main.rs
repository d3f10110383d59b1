//! `hangartrack`: terminal front-end for the executive hangar tracker.

mod args;
mod commands;
mod error;
mod logging;

use clap::Parser;

use crate::args::Cli;
use crate::error::ExitCode;
use crate::logging::init_logging;

fn main() {
    let cli = Cli::parse();
    init_logging(cli.log_format, cli.verbose);

    match commands::dispatch(cli) {
        Ok(()) => std::process::exit(ExitCode::SUCCESS),
        Err(e) => {
            eprintln!("error: {e}");
            std::process::exit(e.exit_code());
        }
    }
}
