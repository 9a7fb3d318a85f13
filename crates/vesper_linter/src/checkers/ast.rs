//! The [`Checker`]: one traversal of the AST that feeds every enabled
//! lint rule.
//!
//! Rules are plain functions taking the checker and the node; for each
//! node kind the interested rules run in registration order, then the
//! children are visited. Rules push diagnostics through
//! [`Checker::report`]; everything else on the checker is read-only.

use vesper_diagnostics::Diagnostic;
use vesper_source_file::{LineIndex, SourceLocation};
use vesper_syntax::{SyntaxKind, SyntaxNode, Token};

use crate::context::FileContext;
use crate::registry::Rule;
use crate::rules::{documentation, naming, style};
use crate::settings::Settings;
use crate::violation::{diagnostic_kind, Violation};

pub(crate) fn check_ast(
    root: &SyntaxNode,
    source: &str,
    line_index: &LineIndex,
    settings: &Settings,
    context: &FileContext,
) -> Vec<Diagnostic> {
    let mut checker = Checker {
        settings,
        context,
        source,
        line_index,
        diagnostics: Vec::new(),
    };
    checker.visit(root);
    checker.diagnostics
}

pub(crate) struct Checker<'a> {
    settings: &'a Settings,
    context: &'a FileContext<'a>,
    source: &'a str,
    line_index: &'a LineIndex,
    pub(crate) diagnostics: Vec<Diagnostic>,
}

impl Checker<'_> {
    /// Is the rule enabled, taking the test-file suppression into account?
    pub(crate) fn enabled(&self, rule: Rule) -> bool {
        self.settings.rules.enabled(rule)
            && (rule.applies_to_test_code() || !self.context.is_test_file())
    }

    pub(crate) fn location(&self, offset: u32) -> SourceLocation {
        self.line_index.source_location(offset, self.source)
    }

    pub(crate) fn report<V: Violation>(&mut self, violation: &V, token: &Token) {
        let diagnostic = Diagnostic::new(
            diagnostic_kind(violation),
            violation.severity(),
            self.location(token.offset),
        );
        self.diagnostics.push(diagnostic);
    }

    pub(crate) fn report_with_notes<V: Violation>(
        &mut self,
        violation: &V,
        token: &Token,
        notes: impl IntoIterator<Item = (String, u32)>,
    ) {
        let mut diagnostic = Diagnostic::new(
            diagnostic_kind(violation),
            violation.severity(),
            self.location(token.offset),
        );
        for (message, offset) in notes {
            diagnostic = diagnostic.with_note(message, self.location(offset));
        }
        self.diagnostics.push(diagnostic);
    }

    fn visit(&mut self, node: &SyntaxNode) {
        match node.kind() {
            SyntaxKind::SourceFile | SyntaxKind::MemberBlock => {
                if self.enabled(Rule::AmbiguousTrailingClosure) {
                    style::rules::ambiguous_trailing_closure(self, node);
                }
            }
            SyntaxKind::FunctionDecl => {
                if self.enabled(Rule::MissingDocumentation) {
                    documentation::rules::missing_documentation(self, node);
                }
                if self.enabled(Rule::DocCommentConsistency) {
                    documentation::rules::doc_comment_consistency(self, node);
                }
                if self.enabled(Rule::LowerCamelCase) {
                    naming::rules::lower_camel_case(self, node);
                }
                if self.enabled(Rule::LeadingUnderscore) {
                    naming::rules::leading_underscore(self, node);
                }
            }
            SyntaxKind::VariableDecl => {
                if self.enabled(Rule::MissingDocumentation) {
                    documentation::rules::missing_documentation(self, node);
                }
                if self.enabled(Rule::LowerCamelCase) {
                    naming::rules::lower_camel_case(self, node);
                }
                if self.enabled(Rule::LeadingUnderscore) {
                    naming::rules::leading_underscore(self, node);
                }
            }
            SyntaxKind::EnumCaseDecl => {
                if self.enabled(Rule::LowerCamelCase) {
                    naming::rules::lower_camel_case(self, node);
                }
                if self.enabled(Rule::LeadingUnderscore) {
                    naming::rules::leading_underscore(self, node);
                }
                if self.enabled(Rule::ShorthandTypeNames) {
                    style::rules::shorthand_type_names(self, node);
                }
            }
            SyntaxKind::StructDecl | SyntaxKind::EnumDecl => {
                if self.enabled(Rule::MissingDocumentation) {
                    documentation::rules::missing_documentation(self, node);
                }
                if self.enabled(Rule::LeadingUnderscore) {
                    naming::rules::leading_underscore(self, node);
                }
            }
            SyntaxKind::Parameter => {
                if self.enabled(Rule::LeadingUnderscore) {
                    naming::rules::leading_underscore(self, node);
                }
            }
            SyntaxKind::CallExpr => {
                if self.enabled(Rule::DuplicateTrailingClosure) {
                    style::rules::duplicate_trailing_closure(self, node);
                }
            }
            SyntaxKind::IfStmt | SyntaxKind::GuardStmt => {
                if self.enabled(Rule::RedundantParentheses) {
                    style::rules::redundant_parentheses(self, node);
                }
            }
            SyntaxKind::ForInStmt => {
                if self.enabled(Rule::PreferWhereClause) {
                    style::rules::prefer_where_clause(self, node);
                }
            }
            SyntaxKind::TypeAnnotation
            | SyntaxKind::ReturnClause
            | SyntaxKind::GenericWhereClause => {
                if self.enabled(Rule::ShorthandTypeNames) {
                    style::rules::shorthand_type_names(self, node);
                }
            }
            _ => {}
        }

        for child in node.child_nodes() {
            self.visit(child);
        }
    }
}
