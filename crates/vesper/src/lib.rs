//! The `vesper` command line: `lint` and `format` over Vesper source
//! trees.

use std::process::ExitCode;

use anyhow::Result;

use crate::args::{Args, Command};

pub mod args;
mod commands;
mod emitter;
pub mod logging;
mod resolve;

#[derive(Copy, Clone, Debug, PartialEq, Eq)]
pub enum ExitStatus {
    /// Nothing to complain about.
    Success,
    /// Error-severity diagnostics were emitted, or `format --check` found
    /// files that need reformatting.
    Failure,
    /// The tool itself failed.
    Error,
}

impl From<ExitStatus> for ExitCode {
    fn from(status: ExitStatus) -> Self {
        match status {
            ExitStatus::Success => ExitCode::from(0),
            ExitStatus::Failure => ExitCode::from(1),
            ExitStatus::Error => ExitCode::from(2),
        }
    }
}

pub fn run(args: Args) -> Result<ExitStatus> {
    logging::set_up_logging(args.log_level_args.log_level())?;

    match args.command {
        Command::Lint(command) => commands::lint::lint(&command),
        Command::Format(command) => commands::format::format(&command),
    }
}
