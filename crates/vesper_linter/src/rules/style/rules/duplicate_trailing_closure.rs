use vesper_syntax::{SyntaxKind, SyntaxNode};

use crate::checkers::ast::Checker;
use crate::registry::Rule;
use crate::violation::Violation;

pub(crate) struct DuplicateTrailingClosure;

impl Violation for DuplicateTrailingClosure {
    const RULE: Rule = Rule::DuplicateTrailingClosure;

    fn message(&self) -> String {
        "this call mixes a trailing closure with closure arguments; pass at most one closure \
         outside the argument list"
            .to_string()
    }
}

/// A call that passes a closure in its argument list and another as a
/// trailing closure reads ambiguously.
pub(crate) fn duplicate_trailing_closure(checker: &mut Checker, call: &SyntaxNode) {
    let Some(trailing) = call.first_child_of_kind(SyntaxKind::ClosureExpr) else {
        return;
    };
    let Some(arguments) = call.first_child_of_kind(SyntaxKind::ArgumentClause) else {
        return;
    };
    let has_closure_argument = arguments
        .children_of_kind(SyntaxKind::Argument)
        .filter_map(|argument| argument.child_nodes().next())
        .any(|expr| expr.kind() == SyntaxKind::ClosureExpr);
    if !has_closure_argument {
        return;
    }
    if let Some(brace) = trailing.first_token() {
        checker.report(&DuplicateTrailingClosure, brace);
    }
}

#[cfg(test)]
mod tests {
    use crate::registry::Rule;
    use crate::settings::Settings;
    use crate::test_helpers::lint;

    #[test]
    fn trailing_plus_closure_argument_warns() {
        let diagnostics = lint(
            "animate(onComplete: { finish() }) { step() }",
            &Settings::for_rule(Rule::DuplicateTrailingClosure),
        );
        assert_eq!(diagnostics.len(), 1);
    }

    #[test]
    fn single_trailing_closure_is_fine() {
        let diagnostics = lint(
            "animate(duration: 2) { step() }",
            &Settings::for_rule(Rule::DuplicateTrailingClosure),
        );
        assert!(diagnostics.is_empty());
    }

    #[test]
    fn closure_argument_alone_is_fine() {
        let diagnostics = lint(
            "animate(onComplete: { finish() })",
            &Settings::for_rule(Rule::DuplicateTrailingClosure),
        );
        assert!(diagnostics.is_empty());
    }
}
