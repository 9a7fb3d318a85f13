use vesper_syntax::{SyntaxElement, SyntaxKind, SyntaxNode, TriviaPiece};

use crate::checkers::ast::Checker;
use crate::registry::Rule;
use crate::rewriter::RewriteContext;
use crate::violation::Violation;

pub(crate) struct RedundantParentheses;

impl Violation for RedundantParentheses {
    const RULE: Rule = Rule::RedundantParentheses;

    fn message(&self) -> String {
        "remove parentheses around this expression".to_string()
    }
}

/// The condition of an `if` or `guard`, if it is wrapped in parentheses
/// that can be dropped.
///
/// A parenthesized call with a trailing closure keeps its parentheses:
/// without them the closure would parse as the statement's body.
fn redundant_condition(statement: &SyntaxNode) -> Option<(&SyntaxNode, &SyntaxNode)> {
    let condition = statement.child_nodes().next()?;
    if condition.kind() != SyntaxKind::TupleExpr {
        return None;
    }
    let mut elements = condition.children_of_kind(SyntaxKind::ListElement);
    let element = elements.next()?;
    if elements.next().is_some() {
        return None;
    }
    let inner = element.child_nodes().next()?;
    if element.child_nodes().nth(1).is_some() {
        return None;
    }
    if inner.kind() == SyntaxKind::CallExpr
        && inner.first_child_of_kind(SyntaxKind::ClosureExpr).is_some()
    {
        return None;
    }
    Some((condition, inner))
}

pub(crate) fn redundant_parentheses(checker: &mut Checker, statement: &SyntaxNode) {
    if let Some((condition, _)) = redundant_condition(statement) {
        if let Some(paren) = condition.first_token() {
            checker.report(&RedundantParentheses, paren);
        }
    }
}

/// Rewrite `if (expr) { … }` to `if expr { … }`, preserving any comments
/// that sat on the parentheses.
pub(crate) fn rewrite_redundant_parentheses(
    root: &SyntaxNode,
    context: &mut RewriteContext,
) -> SyntaxNode {
    let children = root
        .children
        .iter()
        .map(|child| match child {
            SyntaxElement::Node(node) => {
                SyntaxElement::Node(rewrite_redundant_parentheses(node, context))
            }
            SyntaxElement::Token(token) => SyntaxElement::Token(token.clone()),
        })
        .collect();
    let node = SyntaxNode::new(root.kind(), children);

    if !matches!(node.kind(), SyntaxKind::IfStmt | SyntaxKind::GuardStmt) {
        return node;
    }
    let Some((condition, inner)) = redundant_condition(&node) else {
        return node;
    };

    let open_paren = condition.first_token().cloned();
    let close_paren = condition.last_token().cloned();
    let mut unwrapped = inner.clone();

    // Comments attached to the parentheses move onto the expression.
    if let Some(open_paren) = open_paren {
        context.report(&RedundantParentheses, open_paren.offset);
        if let Some(first) = unwrapped.first_token_mut() {
            let mut leading: Vec<TriviaPiece> = Vec::new();
            leading.extend(open_paren.leading.iter().filter(|piece| piece.is_comment()).cloned());
            leading.extend(open_paren.trailing.iter().filter(|piece| piece.is_comment()).cloned());
            leading.append(&mut first.leading);
            first.leading = leading;
        }
    }
    if let Some(close_paren) = close_paren {
        if let Some(last) = unwrapped.last_token_mut() {
            last.trailing.extend(
                close_paren
                    .leading
                    .iter()
                    .chain(&close_paren.trailing)
                    .filter(|piece| piece.is_comment())
                    .cloned(),
            );
        }
    }

    let kind = node.kind;
    let children = node
        .children
        .into_iter()
        .map(|child| match child {
            SyntaxElement::Node(inner_node) if inner_node.kind() == SyntaxKind::TupleExpr => {
                SyntaxElement::Node(std::mem::replace(
                    &mut unwrapped,
                    SyntaxNode::new(SyntaxKind::TupleExpr, Vec::new()),
                ))
            }
            other => other,
        })
        .collect();
    SyntaxNode::new(kind, children)
}

#[cfg(test)]
mod tests {
    use crate::registry::Rule;
    use crate::settings::Settings;
    use crate::test_helpers::{format, lint};

    #[test]
    fn unwraps_if_conditions() {
        let (code, diagnostics) = format(
            "if(a){b()}",
            &Settings::for_rule(Rule::RedundantParentheses),
        );
        assert_eq!(code, "if a {\n  b()\n}\n");
        assert_eq!(diagnostics.len(), 1);
        assert_eq!(
            diagnostics[0].kind.body,
            "remove parentheses around this expression"
        );
    }

    #[test]
    fn unwraps_guard_conditions() {
        let (code, diagnostics) = format(
            "guard (ready) else { return }",
            &Settings::for_rule(Rule::RedundantParentheses),
        );
        assert_eq!(code, "guard ready else {\n  return\n}\n");
        assert_eq!(diagnostics.len(), 1);
    }

    #[test]
    fn keeps_parentheses_around_trailing_closure_calls() {
        let (code, diagnostics) = format(
            "if (hasItems { true }) { run() }",
            &Settings::for_rule(Rule::RedundantParentheses),
        );
        assert!(code.starts_with("if (hasItems { true })"));
        assert!(diagnostics.is_empty());
    }

    #[test]
    fn keeps_real_tuples() {
        let (_, diagnostics) = format(
            "if (a, b) == pair { run() }",
            &Settings::for_rule(Rule::RedundantParentheses),
        );
        assert!(diagnostics.is_empty());
    }

    #[test]
    fn lint_reports_without_rewriting() {
        let diagnostics = lint(
            "if(a){b()}",
            &Settings::for_rule(Rule::RedundantParentheses),
        );
        assert_eq!(diagnostics.len(), 1);
    }

    #[test]
    fn nested_conditions_are_rewritten() {
        let (code, diagnostics) = format(
            "if (a) { if (b) { c() } }",
            &Settings::for_rule(Rule::RedundantParentheses),
        );
        assert_eq!(code, "if a {\n  if b {\n    c()\n  }\n}\n");
        assert_eq!(diagnostics.len(), 2);
    }
}
