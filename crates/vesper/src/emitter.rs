use std::io::Write;
use std::path::Path;

use anyhow::Result;
use colored::Colorize;
use serde_json::json;

use vesper_diagnostics::Diagnostic;

/// Write diagnostics as human-readable lines:
/// `path:row:col: severity: message [rule]`, with notes indented below.
pub(crate) struct TextEmitter;

impl TextEmitter {
    pub(crate) fn emit(
        writer: &mut dyn Write,
        path: &Path,
        diagnostics: &[Diagnostic],
    ) -> Result<()> {
        for diagnostic in diagnostics {
            writeln!(
                writer,
                "{path}{sep}{row}{sep}{col}{sep} {severity}{sep} {body} {name}",
                path = path.display().to_string().bold(),
                sep = ":".cyan(),
                row = diagnostic.location.row,
                col = diagnostic.location.column,
                severity = severity_label(diagnostic),
                body = diagnostic.kind.body,
                name = format!("[{}]", diagnostic.kind.name).dimmed(),
            )?;
            for note in &diagnostic.notes {
                writeln!(
                    writer,
                    "  {label}{sep} {message} ({location})",
                    label = "note".cyan().bold(),
                    sep = ":".cyan(),
                    message = note.message,
                    location = note.location,
                )?;
            }
        }
        Ok(())
    }
}

fn severity_label(diagnostic: &Diagnostic) -> colored::ColoredString {
    match diagnostic.severity {
        vesper_diagnostics::Severity::Error => "error".red().bold(),
        vesper_diagnostics::Severity::Warning => "warning".yellow().bold(),
        vesper_diagnostics::Severity::Note => "note".cyan().bold(),
    }
}

/// Write diagnostics as a JSON array, one object per diagnostic.
pub(crate) struct JsonEmitter;

impl JsonEmitter {
    pub(crate) fn emit(
        writer: &mut dyn Write,
        diagnostics: &[(std::path::PathBuf, Vec<Diagnostic>)],
    ) -> Result<()> {
        let entries: Vec<_> = diagnostics
            .iter()
            .flat_map(|(path, file_diagnostics)| {
                file_diagnostics.iter().map(move |diagnostic| {
                    json!({
                        "path": path.display().to_string(),
                        "row": diagnostic.location.row.get(),
                        "column": diagnostic.location.column.get(),
                        "severity": diagnostic.severity.as_str(),
                        "rule": diagnostic.kind.name,
                        "message": diagnostic.kind.body,
                        "range": diagnostic.range.map(|(start, end)| {
                            json!({
                                "start": { "row": start.row.get(), "column": start.column.get() },
                                "end": { "row": end.row.get(), "column": end.column.get() },
                            })
                        }),
                        "notes": diagnostic.notes.iter().map(|note| {
                            json!({
                                "message": note.message,
                                "row": note.location.row.get(),
                                "column": note.location.column.get(),
                            })
                        }).collect::<Vec<_>>(),
                    })
                })
            })
            .collect();
        serde_json::to_writer_pretty(&mut *writer, &entries)?;
        writeln!(writer)?;
        Ok(())
    }
}
