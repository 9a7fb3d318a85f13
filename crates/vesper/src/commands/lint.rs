use std::io::Write;
use std::path::PathBuf;

use anyhow::Result;
use log::debug;
use rayon::prelude::*;

use vesper_diagnostics::Diagnostic;
use vesper_linter::lint_source;

use crate::args::{LintCommand, OutputFormat};
use crate::commands::{has_errors, read_source};
use crate::emitter::{JsonEmitter, TextEmitter};
use crate::resolve::{resolve_files, resolve_settings};
use crate::{warn_user, ExitStatus};

pub(crate) fn lint(command: &LintCommand) -> Result<ExitStatus> {
    let (settings, config_path, config_diagnostics) =
        resolve_settings(command.config.as_deref())?;

    let files = resolve_files(&command.files);
    if files.is_empty() {
        warn_user!("no Vesper files found under the given path(s)");
    }
    debug!("linting {} file(s)", files.len());

    let mut results: Vec<(PathBuf, Vec<Diagnostic>)> = files
        .par_iter()
        .map(|path| {
            let diagnostics = match read_source(path) {
                Ok(source) => lint_source(&source, &settings),
                Err(diagnostic) => vec![diagnostic],
            };
            (path.clone(), diagnostics)
        })
        .collect();

    if !config_diagnostics.is_empty() {
        let config_path = config_path.unwrap_or_else(|| PathBuf::from("vesper.toml"));
        results.insert(0, (config_path, config_diagnostics));
    }

    let stdout = std::io::stdout();
    let mut writer = stdout.lock();
    match command.output_format {
        OutputFormat::Text => {
            for (path, diagnostics) in &results {
                TextEmitter::emit(&mut writer, path, diagnostics)?;
            }
            let count: usize = results.iter().map(|(_, d)| d.len()).sum();
            if count > 0 {
                writeln!(writer, "Found {count} diagnostic(s).")?;
            }
        }
        OutputFormat::Json => JsonEmitter::emit(&mut writer, &results)?,
    }

    if has_errors(&results) {
        Ok(ExitStatus::Failure)
    } else {
        Ok(ExitStatus::Success)
    }
}
