//! The Vesper lint and format pipeline.
//!
//! [`lint_source`] runs every enabled rule over a file and collects
//! diagnostics; [`format_source`] applies the rewriting rules and
//! pretty-prints the result. Both are pure: all state lives on the stack
//! for the duration of one file, so files can be processed from as many
//! threads as the driver likes.

use std::panic::AssertUnwindSafe;

use log::error;

use vesper_diagnostics::{Diagnostic, DiagnosticKind, Severity};
use vesper_formatter::format_tree;
use vesper_parser::ParseError;
use vesper_source_file::LineIndex;

use crate::checkers::ast::check_ast;
use crate::checkers::whitespace::check_whitespace;
use crate::context::FileContext;
use crate::registry::Rule;
use crate::rewriter::{apply_rewrites, internal_error};

mod checkers;
mod context;
mod helpers;
pub mod registry;
mod rewriter;
mod rules;
pub mod settings;
mod violation;

pub use crate::settings::{Options, Settings};

/// The outcome of formatting one file.
#[derive(Debug)]
pub struct FormattedSource {
    pub code: String,
    /// Diagnostics emitted by the rewriting rules.
    pub diagnostics: Vec<Diagnostic>,
}

/// Run the lint pipeline over one file.
///
/// A parse failure aborts the file with a single error diagnostic;
/// nothing else aborts. Diagnostics come back in emission order: AST
/// rules in node-visit order, then the whitespace comparison.
pub fn lint_source(source: &str, settings: &Settings) -> Vec<Diagnostic> {
    let parsed = match vesper_parser::parse(source) {
        Ok(parsed) => parsed,
        Err(parse_error) => return vec![parse_error_diagnostic(&parse_error, source)],
    };

    let mut diagnostics = Vec::new();

    let walk = std::panic::catch_unwind(AssertUnwindSafe(|| {
        let context = FileContext::new(&parsed.root);
        check_ast(&parsed.root, source, &parsed.line_index, settings, &context)
    }));
    match walk {
        Ok(ast_diagnostics) => diagnostics.extend(ast_diagnostics),
        Err(_) => {
            error!("a lint rule panicked; the AST pass was abandoned");
            diagnostics.push(internal_error(
                "a lint rule failed internally; results for this file are incomplete".to_string(),
            ));
        }
    }

    if settings.rules.any_enabled(Rule::is_whitespace) {
        match format_tree(&parsed.root, &settings.format) {
            Ok(formatted) => {
                diagnostics.extend(check_whitespace(source, &formatted, settings));
            }
            Err(format_error) => diagnostics.push(internal_error(format_error.to_string())),
        }
    }

    diagnostics
}

/// Format one file: rewriting rules first, then the printer.
pub fn format_source(source: &str, settings: &Settings) -> Result<FormattedSource, Diagnostic> {
    let parsed = vesper_parser::parse(source)
        .map_err(|parse_error| parse_error_diagnostic(&parse_error, source))?;

    let (mut tree, diagnostics) =
        apply_rewrites(parsed.root, source, &parsed.line_index, settings);
    // Rewrites synthesize tokens; restore unique identities for the
    // stream builder's directive maps.
    tree.reindex();

    let code = format_tree(&tree, &settings.format)
        .map_err(|format_error| internal_error(format_error.to_string()))?;
    Ok(FormattedSource { code, diagnostics })
}

fn parse_error_diagnostic(parse_error: &ParseError, source: &str) -> Diagnostic {
    let line_index = LineIndex::from_source_text(source);
    Diagnostic::new(
        DiagnosticKind {
            name: "parse-error",
            body: parse_error.message.clone(),
        },
        Severity::Error,
        line_index.source_location(parse_error.offset, source),
    )
}

#[cfg(test)]
pub(crate) mod test_helpers {
    use vesper_diagnostics::Diagnostic;

    use crate::settings::Settings;

    pub(crate) fn lint(source: &str, settings: &Settings) -> Vec<Diagnostic> {
        crate::lint_source(source, settings)
    }

    pub(crate) fn format(source: &str, settings: &Settings) -> (String, Vec<Diagnostic>) {
        let formatted = crate::format_source(source, settings).expect("source should format");
        (formatted.code, formatted.diagnostics)
    }
}
