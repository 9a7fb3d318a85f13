use std::path::PathBuf;

use clap::{command, Parser};

use crate::logging::LogLevel;

#[derive(Debug, Parser)]
#[command(
    author,
    name = "vesper",
    about = "Vesper: a formatter and linter for Vesper source files.",
    after_help = "For help with a specific command, see: `vesper help <command>`."
)]
#[command(version)]
pub struct Args {
    #[command(subcommand)]
    pub command: Command,
    #[clap(flatten)]
    pub log_level_args: LogLevelArgs,
}

#[derive(Debug, clap::Subcommand)]
pub enum Command {
    /// Lint the given files or directories.
    Lint(LintCommand),
    /// Format the given files or directories.
    Format(FormatCommand),
}

#[derive(Clone, Debug, clap::Parser)]
pub struct LintCommand {
    /// List of files or directories to lint [default: .]
    pub files: Vec<PathBuf>,
    /// Path to a `vesper.toml` configuration file.
    #[arg(long)]
    pub config: Option<PathBuf>,
    /// Output serialization format for diagnostics.
    #[arg(long, value_enum, default_value = "text")]
    pub output_format: OutputFormat,
}

#[derive(Clone, Debug, clap::Parser)]
pub struct FormatCommand {
    /// List of files or directories to format [default: .]
    pub files: Vec<PathBuf>,
    /// Path to a `vesper.toml` configuration file.
    #[arg(long)]
    pub config: Option<PathBuf>,
    /// Write formatted output back to the files instead of stdout.
    #[arg(short, long)]
    pub write: bool,
    /// Exit non-zero if any file would be reformatted, without writing.
    #[arg(long, conflicts_with = "write")]
    pub check: bool,
    /// Dump the formatting token stream instead of printing.
    #[arg(long, hide = true)]
    pub dump_token_stream: bool,
    /// Dump the parsed syntax tree instead of printing.
    #[arg(long, hide = true)]
    pub dump_ast: bool,
}

#[derive(Copy, Clone, Debug, PartialEq, Eq, clap::ValueEnum)]
pub enum OutputFormat {
    Text,
    Json,
}

#[derive(Debug, Default, clap::Args)]
pub struct LogLevelArgs {
    /// Enable verbose logging.
    #[arg(short, long, global = true, group = "verbosity")]
    pub verbose: bool,
    /// Print diagnostics, but nothing else.
    #[arg(short, long, global = true, group = "verbosity")]
    pub quiet: bool,
    /// Disable all logging (but still exit with status code "1" upon
    /// detecting diagnostics).
    #[arg(short, long, global = true, group = "verbosity")]
    pub silent: bool,
}

impl LogLevelArgs {
    pub fn log_level(&self) -> LogLevel {
        if self.silent {
            LogLevel::Silent
        } else if self.quiet {
            LogLevel::Quiet
        } else if self.verbose {
            LogLevel::Verbose
        } else {
            LogLevel::Default
        }
    }
}

#[cfg(test)]
mod tests {
    use clap::Parser;

    use super::{Args, Command};

    #[test]
    fn parses_lint_invocation() {
        let args = Args::parse_from(["vesper", "lint", "src", "--output-format", "json"]);
        let Command::Lint(command) = args.command else {
            panic!("expected a lint command");
        };
        assert_eq!(command.files.len(), 1);
    }

    #[test]
    fn format_write_and_check_conflict() {
        assert!(Args::try_parse_from(["vesper", "format", "--write", "--check"]).is_err());
    }
}
