pub(crate) mod format;
pub(crate) mod lint;

use std::path::{Path, PathBuf};

use vesper_diagnostics::{Diagnostic, DiagnosticKind, Severity};
use vesper_source_file::SourceLocation;

/// An unreadable input surfaces as a single error diagnostic for the
/// file; it never takes the rest of the batch down.
pub(crate) fn io_error_diagnostic(error: &std::io::Error) -> Diagnostic {
    Diagnostic::new(
        DiagnosticKind {
            name: "io-error",
            body: error.to_string(),
        },
        Severity::Error,
        SourceLocation::default(),
    )
}

pub(crate) fn read_source(path: &Path) -> Result<String, Diagnostic> {
    std::fs::read_to_string(path).map_err(|error| io_error_diagnostic(&error))
}

pub(crate) fn has_errors(results: &[(PathBuf, Vec<Diagnostic>)]) -> bool {
    results
        .iter()
        .any(|(_, diagnostics)| diagnostics.iter().any(Diagnostic::is_error))
}
