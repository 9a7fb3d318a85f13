//! Driver for the rewriting rules.
//!
//! Each enabled rewrite rule runs as a whole-tree pass, in registration
//! order. A rule must never take the pipeline down: a panic inside a pass
//! is caught, reported as an internal-error diagnostic, and the pass
//! yields no rewrite.

use std::panic::AssertUnwindSafe;

use log::error;

use vesper_diagnostics::{Diagnostic, DiagnosticKind, Severity};
use vesper_source_file::LineIndex;
use vesper_syntax::SyntaxNode;

use crate::registry::Rule;
use crate::rules::style;
use crate::settings::Settings;
use crate::violation::{diagnostic_kind, Violation};

/// The rewrite passes, in the order they run.
const REWRITES: &[Rule] = &[
    Rule::RedundantParentheses,
    Rule::ShorthandTypeNames,
    Rule::PreferWhereClause,
];

pub(crate) struct RewriteContext<'a> {
    source: &'a str,
    line_index: &'a LineIndex,
    pub(crate) diagnostics: Vec<Diagnostic>,
}

impl RewriteContext<'_> {
    pub(crate) fn report<V: Violation>(&mut self, violation: &V, offset: u32) {
        let location = self.line_index.source_location(offset, self.source);
        self.diagnostics.push(Diagnostic::new(
            diagnostic_kind(violation),
            violation.severity(),
            location,
        ));
    }
}

/// Run every enabled rewrite pass over `root`, collecting diagnostics.
pub(crate) fn apply_rewrites(
    root: SyntaxNode,
    source: &str,
    line_index: &LineIndex,
    settings: &Settings,
) -> (SyntaxNode, Vec<Diagnostic>) {
    let mut tree = root;
    let mut diagnostics = Vec::new();

    for rule in REWRITES {
        if !settings.rules.enabled(*rule) {
            continue;
        }
        let mut context = RewriteContext {
            source,
            line_index,
            diagnostics: Vec::new(),
        };
        let pass = AssertUnwindSafe(|| match rule {
            Rule::RedundantParentheses => {
                style::rules::rewrite_redundant_parentheses(&tree, &mut context)
            }
            Rule::ShorthandTypeNames => {
                style::rules::rewrite_shorthand_type_names(&tree, &mut context)
            }
            Rule::PreferWhereClause => {
                style::rules::rewrite_prefer_where_clause(&tree, &mut context)
            }
            _ => unreachable!("not a rewrite rule"),
        });
        match std::panic::catch_unwind(pass) {
            Ok(rewritten) => {
                tree = rewritten;
                diagnostics.append(&mut context.diagnostics);
            }
            Err(_) => {
                error!("rewrite rule `{rule}` panicked; its rewrite was discarded");
                diagnostics.push(internal_error(format!(
                    "rule `{rule}` failed internally and was skipped"
                )));
            }
        }
    }

    (tree, diagnostics)
}

pub(crate) fn internal_error(body: String) -> Diagnostic {
    Diagnostic::new(
        DiagnosticKind {
            name: "internal-error",
            body,
        },
        Severity::Error,
        vesper_source_file::SourceLocation::default(),
    )
}
