use std::io::Write;
use std::process::ExitCode;

use clap::Parser;
use colored::Colorize;

use vesper::args::Args;
use vesper::{run, ExitStatus};

pub fn main() -> ExitCode {
    let args = Args::parse();

    match run(args) {
        Ok(status) => status.into(),
        Err(err) => {
            {
                // Use `writeln` instead of `eprintln` to avoid panicking
                // when the stderr pipe is broken.
                let mut stderr = std::io::stderr().lock();

                // This communicates that vesper itself failed, as opposed
                // to reporting diagnostics about the input.
                writeln!(stderr, "{}", "vesper failed".red().bold()).ok();
                for cause in err.chain() {
                    writeln!(stderr, "  {} {cause}", "Cause:".bold()).ok();
                }
            }
            ExitStatus::Error.into()
        }
    }
}
