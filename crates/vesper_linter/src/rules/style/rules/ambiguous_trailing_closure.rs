use rustc_hash::FxHashMap;

use vesper_syntax::{SyntaxKind, SyntaxNode, Token};

use crate::checkers::ast::Checker;
use crate::helpers::{declared_name, is_function_typed, parameters};
use crate::registry::Rule;
use crate::violation::Violation;

pub(crate) struct AmbiguousTrailingClosure {
    name: String,
}

impl Violation for AmbiguousTrailingClosure {
    const RULE: Rule = Rule::AmbiguousTrailingClosure;

    fn message(&self) -> String {
        format!(
            "overloads of '{}' differ only by their closure parameter, which is ambiguous at a \
             trailing-closure call site",
            self.name
        )
    }
}

/// Does this function take exactly one parameter, of function type?
fn sole_parameter_is_closure(function: &SyntaxNode) -> bool {
    let mut all = parameters(function);
    let Some(first) = all.next() else {
        return false;
    };
    all.next().is_none() && is_function_typed(first)
}

/// Within one declaration scope, functions that share a base name and
/// whose only parameter is a closure cannot be told apart when called
/// with a trailing closure.
pub(crate) fn ambiguous_trailing_closure(checker: &mut Checker, scope: &SyntaxNode) {
    let mut by_name: FxHashMap<&str, Vec<&Token>> = FxHashMap::default();
    for function in scope.children_of_kind(SyntaxKind::FunctionDecl) {
        if !sole_parameter_is_closure(function) {
            continue;
        }
        if let Some(name) = declared_name(function) {
            by_name.entry(name.text.as_str()).or_default().push(name);
        }
    }

    let mut groups: Vec<_> = by_name.into_iter().collect();
    groups.sort_by_key(|(_, tokens)| tokens.first().map_or(u32::MAX, |token| token.offset));
    for (name, tokens) in groups {
        let [primary, rest @ ..] = tokens.as_slice() else {
            continue;
        };
        let primary: &Token = primary;
        if rest.is_empty() {
            continue;
        }
        checker.report_with_notes(
            &AmbiguousTrailingClosure {
                name: name.to_string(),
            },
            primary,
            rest.iter()
                .map(|token| ("ambiguous overload declared here".to_string(), token.offset))
                .collect::<Vec<_>>(),
        );
    }
}
