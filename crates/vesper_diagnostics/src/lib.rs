//! Diagnostics reported by the Vesper linter and formatter.

use std::fmt;

use vesper_source_file::SourceLocation;

/// How serious a diagnostic is.
///
/// `Error` diagnostics make the process exit non-zero; notes only ever
/// appear attached to a parent diagnostic.
#[derive(Debug, Copy, Clone, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub enum Severity {
    Note,
    Warning,
    Error,
}

impl Severity {
    pub const fn as_str(self) -> &'static str {
        match self {
            Severity::Note => "note",
            Severity::Warning => "warning",
            Severity::Error => "error",
        }
    }
}

impl fmt::Display for Severity {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// The rule-independent payload of a diagnostic.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DiagnosticKind {
    /// The stable name of the originating rule, e.g. `missing-documentation`.
    pub name: &'static str,
    /// The user-facing message.
    pub body: String,
}

/// A secondary message attached to a diagnostic, with its own location.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Note {
    pub message: String,
    pub location: SourceLocation,
}

/// A message with a severity, a primary location, an optional highlighted
/// range, and any number of attached notes.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Diagnostic {
    pub kind: DiagnosticKind,
    pub severity: Severity,
    pub location: SourceLocation,
    pub range: Option<(SourceLocation, SourceLocation)>,
    pub notes: Vec<Note>,
}

impl Diagnostic {
    pub fn new(kind: DiagnosticKind, severity: Severity, location: SourceLocation) -> Self {
        Self {
            kind,
            severity,
            location,
            range: None,
            notes: Vec::new(),
        }
    }

    #[must_use]
    pub fn with_range(mut self, start: SourceLocation, end: SourceLocation) -> Self {
        self.range = Some((start, end));
        self
    }

    #[must_use]
    pub fn with_note(mut self, message: impl Into<String>, location: SourceLocation) -> Self {
        self.notes.push(Note {
            message: message.into(),
            location,
        });
        self
    }

    pub const fn is_error(&self) -> bool {
        matches!(self.severity, Severity::Error)
    }
}

#[cfg(test)]
mod tests {
    use super::{Diagnostic, DiagnosticKind, Severity};
    use vesper_source_file::SourceLocation;

    #[test]
    fn severity_ordering() {
        assert!(Severity::Error > Severity::Warning);
        assert!(Severity::Warning > Severity::Note);
    }

    #[test]
    fn notes_preserve_order() {
        let location = SourceLocation::default();
        let diagnostic = Diagnostic::new(
            DiagnosticKind {
                name: "ambiguous-trailing-closure",
                body: "ambiguous".to_string(),
            },
            Severity::Warning,
            location,
        )
        .with_note("first overload", location)
        .with_note("second overload", location);

        let messages: Vec<_> = diagnostic
            .notes
            .iter()
            .map(|note| note.message.as_str())
            .collect();
        assert_eq!(messages, ["first overload", "second overload"]);
        assert!(!diagnostic.is_error());
    }
}
