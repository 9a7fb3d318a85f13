use std::io::Write;
use std::path::PathBuf;

use anyhow::{Context, Result};
use log::debug;
use rayon::prelude::*;

use vesper_diagnostics::Diagnostic;
use vesper_formatter::{build_token_stream, display_token_stream};
use vesper_linter::format_source;

use crate::args::FormatCommand;
use crate::commands::{has_errors, read_source};
use crate::emitter::TextEmitter;
use crate::resolve::{resolve_files, resolve_settings};
use crate::{warn_user, ExitStatus};

#[derive(Debug, Copy, Clone, PartialEq, Eq)]
enum FormatMode {
    /// Print the formatted contents to stdout.
    Print,
    /// Write the formatted contents back to the file.
    Write,
    /// Report files that are not formatted, but do not write.
    Check,
}

impl FormatMode {
    fn from_cli(cli: &FormatCommand) -> Self {
        if cli.check {
            FormatMode::Check
        } else if cli.write {
            FormatMode::Write
        } else {
            FormatMode::Print
        }
    }
}

struct FormatOutcome {
    path: PathBuf,
    diagnostics: Vec<Diagnostic>,
    /// The formatted text, when formatting succeeded.
    code: Option<String>,
    changed: bool,
}

pub(crate) fn format(command: &FormatCommand) -> Result<ExitStatus> {
    let (settings, config_path, config_diagnostics) =
        resolve_settings(command.config.as_deref())?;
    let mode = FormatMode::from_cli(command);

    let files = resolve_files(&command.files);
    if files.is_empty() {
        warn_user!("no Vesper files found under the given path(s)");
    }
    debug!("formatting {} file(s)", files.len());

    if command.dump_token_stream || command.dump_ast {
        return dump(command, &files, &settings);
    }

    let outcomes: Vec<FormatOutcome> = files
        .par_iter()
        .map(|path| {
            let source = match read_source(path) {
                Ok(source) => source,
                Err(diagnostic) => {
                    return FormatOutcome {
                        path: path.clone(),
                        diagnostics: vec![diagnostic],
                        code: None,
                        changed: false,
                    };
                }
            };
            match format_source(&source, &settings) {
                Ok(formatted) => {
                    let changed = formatted.code != source;
                    FormatOutcome {
                        path: path.clone(),
                        diagnostics: formatted.diagnostics,
                        code: Some(formatted.code),
                        changed,
                    }
                }
                Err(diagnostic) => FormatOutcome {
                    path: path.clone(),
                    diagnostics: vec![diagnostic],
                    code: None,
                    changed: false,
                },
            }
        })
        .collect();

    // Diagnostics go to stderr so stdout stays parseable output.
    let stderr = std::io::stderr();
    let mut stderr = stderr.lock();
    if !config_diagnostics.is_empty() {
        let config_path = config_path.unwrap_or_else(|| PathBuf::from("vesper.toml"));
        TextEmitter::emit(&mut stderr, &config_path, &config_diagnostics)?;
    }
    for outcome in &outcomes {
        TextEmitter::emit(&mut stderr, &outcome.path, &outcome.diagnostics)?;
    }

    let mut unformatted = 0usize;
    let stdout = std::io::stdout();
    let mut stdout = stdout.lock();
    for outcome in &outcomes {
        let Some(code) = &outcome.code else {
            continue;
        };
        match mode {
            FormatMode::Print => stdout.write_all(code.as_bytes())?,
            FormatMode::Write => {
                if outcome.changed {
                    std::fs::write(&outcome.path, code).with_context(|| {
                        format!("failed to write `{}`", outcome.path.display())
                    })?;
                }
            }
            FormatMode::Check => {
                if outcome.changed {
                    writeln!(stdout, "would reformat: {}", outcome.path.display())?;
                    unformatted += 1;
                }
            }
        }
    }

    let results: Vec<(PathBuf, Vec<Diagnostic>)> = outcomes
        .into_iter()
        .map(|outcome| (outcome.path, outcome.diagnostics))
        .collect();
    let failed = has_errors(&results)
        || config_diagnostics.iter().any(Diagnostic::is_error)
        || unformatted > 0;
    if failed {
        Ok(ExitStatus::Failure)
    } else {
        Ok(ExitStatus::Success)
    }
}

/// `--dump-ast` / `--dump-token-stream`: print the intermediate stages
/// instead of formatted code.
fn dump(
    command: &FormatCommand,
    files: &[PathBuf],
    settings: &vesper_linter::Settings,
) -> Result<ExitStatus> {
    let stdout = std::io::stdout();
    let mut stdout = stdout.lock();
    for path in files {
        let source = match read_source(path) {
            Ok(source) => source,
            Err(diagnostic) => {
                TextEmitter::emit(&mut std::io::stderr().lock(), path, &[diagnostic])?;
                continue;
            }
        };
        let parsed = match vesper_parser::parse(&source) {
            Ok(parsed) => parsed,
            Err(error) => {
                writeln!(stdout, "{}: parse error: {error}", path.display())?;
                continue;
            }
        };
        if command.dump_ast {
            writeln!(stdout, "{:?}", parsed.root)?;
        }
        if command.dump_token_stream {
            match build_token_stream(&parsed.root, &settings.format) {
                Ok(stream) => write!(stdout, "{}", display_token_stream(&stream))?,
                Err(error) => writeln!(stdout, "{}: {error}", path.display())?,
            }
        }
    }
    Ok(ExitStatus::Success)
}
