use vesper_syntax::{SyntaxElement, SyntaxKind, SyntaxNode, Token, TokenKind};

use crate::checkers::ast::Checker;
use crate::registry::Rule;
use crate::rewriter::RewriteContext;
use crate::violation::Violation;

#[derive(Debug, Copy, Clone, PartialEq, Eq)]
enum Filter {
    If,
    Guard,
}

pub(crate) struct PreferWhereClause {
    filter: Filter,
}

impl Violation for PreferWhereClause {
    const RULE: Rule = Rule::PreferWhereClause;

    fn message(&self) -> String {
        match self.filter {
            Filter::If => {
                "replace this 'if' statement with a 'where' clause on the 'for' loop".to_string()
            }
            Filter::Guard => {
                "replace this 'guard' statement with a 'where' clause on the 'for' loop"
                    .to_string()
            }
        }
    }
}

fn has_comments(token: &Token) -> bool {
    token.leading.iter().chain(&token.trailing).any(|piece| piece.is_comment())
}

fn tokens_are_comment_free<'a>(tokens: impl IntoIterator<Item = Option<&'a Token>>) -> bool {
    tokens.into_iter().flatten().all(|token| !has_comments(token))
}

struct Candidate<'a> {
    filter: Filter,
    /// The `if` or `guard` keyword, for the diagnostic and as the anchor
    /// of the synthesized `where`.
    keyword: &'a Token,
    condition: &'a SyntaxNode,
}

/// A `for` body whose first action is a filter that a `where` clause can
/// express: either the body is a single `if` (without `else`), or it
/// starts with `guard … else { continue }`.
///
/// Loops that already have a `where` clause are left alone; the rewrite
/// does not fold a second condition into an existing clause. Shapes whose
/// discarded tokens carry comments are also left alone, so no comment is
/// ever dropped.
fn where_candidate(for_stmt: &SyntaxNode) -> Option<Candidate<'_>> {
    if for_stmt.first_child_of_kind(SyntaxKind::WhereClause).is_some() {
        return None;
    }
    let body = for_stmt.first_child_of_kind(SyntaxKind::CodeBlock)?;
    let statements: Vec<&SyntaxNode> = body.child_nodes().collect();

    let first = statements.first()?;
    match first.kind() {
        SyntaxKind::IfStmt if statements.len() == 1 => {
            let if_stmt = *first;
            if if_stmt.first_token_of_kind(TokenKind::Else).is_some() {
                return None;
            }
            let keyword = if_stmt.first_token_of_kind(TokenKind::If)?;
            let condition = if_stmt.child_nodes().next()?;
            if !tokens_are_comment_free([
                Some(keyword),
                body.first_token_of_kind(TokenKind::LeftBrace),
                body.child_tokens().rfind(|t| t.kind == TokenKind::RightBrace),
            ]) {
                return None;
            }
            Some(Candidate {
                filter: Filter::If,
                keyword,
                condition,
            })
        }
        SyntaxKind::GuardStmt => {
            let guard_stmt = *first;
            let else_body = guard_stmt.first_child_of_kind(SyntaxKind::CodeBlock)?;
            let mut else_statements = else_body.child_nodes();
            let only = else_statements.next()?;
            if else_statements.next().is_some() || only.kind() != SyntaxKind::ContinueStmt {
                return None;
            }
            let keyword = guard_stmt.first_token_of_kind(TokenKind::Guard)?;
            let condition = guard_stmt.child_nodes().next()?;
            if !tokens_are_comment_free([
                Some(keyword),
                guard_stmt.first_token_of_kind(TokenKind::Else),
                else_body.first_token_of_kind(TokenKind::LeftBrace),
                else_body.child_tokens().rfind(|t| t.kind == TokenKind::RightBrace),
                only.first_token_of_kind(TokenKind::Continue),
            ]) {
                return None;
            }
            Some(Candidate {
                filter: Filter::Guard,
                keyword,
                condition,
            })
        }
        _ => None,
    }
}

pub(crate) fn prefer_where_clause(checker: &mut Checker, for_stmt: &SyntaxNode) {
    if let Some(candidate) = where_candidate(for_stmt) {
        checker.report(
            &PreferWhereClause {
                filter: candidate.filter,
            },
            candidate.keyword,
        );
    }
}

/// Rewrite `for x in xs { if cond { body } }` (and the `guard`/`continue`
/// shape) into `for x in xs where cond { body }`.
pub(crate) fn rewrite_prefer_where_clause(
    root: &SyntaxNode,
    context: &mut RewriteContext,
) -> SyntaxNode {
    let children: Vec<SyntaxElement> = root
        .children
        .iter()
        .map(|child| match child {
            SyntaxElement::Node(node) => {
                SyntaxElement::Node(rewrite_prefer_where_clause(node, context))
            }
            SyntaxElement::Token(token) => SyntaxElement::Token(token.clone()),
        })
        .collect();
    let node = SyntaxNode::new(root.kind, children);

    if node.kind() != SyntaxKind::ForInStmt {
        return node;
    }
    let Some(candidate) = where_candidate(&node) else {
        return node;
    };

    context.report(
        &PreferWhereClause {
            filter: candidate.filter,
        },
        candidate.keyword.offset,
    );

    let where_keyword = Token::synthesized(TokenKind::Where, candidate.keyword);
    let where_clause = SyntaxNode::new(
        SyntaxKind::WhereClause,
        vec![
            SyntaxElement::Token(where_keyword),
            SyntaxElement::Node(candidate.condition.clone()),
        ],
    );
    let filter = candidate.filter;

    let body = node
        .first_child_of_kind(SyntaxKind::CodeBlock)
        .expect("candidate implies a body");
    let new_body = match filter {
        // The filtered work moves up: the `if` body becomes the loop body.
        Filter::If => {
            let if_stmt = body
                .child_nodes()
                .next()
                .expect("candidate implies a statement");
            if_stmt
                .first_child_of_kind(SyntaxKind::CodeBlock)
                .expect("candidate implies an if body")
                .clone()
        }
        // The guard disappears; the rest of the body stays where it was.
        Filter::Guard => {
            let children = body
                .children
                .iter()
                .enumerate()
                .filter_map(|(index, child)| {
                    // Child 1 is the guard statement (child 0 is `{`).
                    if index == 1 && matches!(child, SyntaxElement::Node(_)) {
                        None
                    } else {
                        Some(child.clone())
                    }
                })
                .collect();
            SyntaxNode::new(SyntaxKind::CodeBlock, children)
        }
    };

    let children = node
        .children
        .into_iter()
        .flat_map(|child| match child {
            SyntaxElement::Node(child_node) if child_node.kind() == SyntaxKind::CodeBlock => {
                vec![
                    SyntaxElement::Node(where_clause.clone()),
                    SyntaxElement::Node(new_body.clone()),
                ]
            }
            other => vec![other],
        })
        .collect();
    SyntaxNode::new(SyntaxKind::ForInStmt, children)
}

#[cfg(test)]
mod tests {
    use indoc::indoc;

    use crate::registry::Rule;
    use crate::settings::Settings;
    use crate::test_helpers::{format, lint};

    #[test]
    fn folds_a_filtering_if_into_where() {
        let (code, diagnostics) = format(
            "for x in xs { if x > 0 { use(x) } }",
            &Settings::for_rule(Rule::PreferWhereClause),
        );
        assert_eq!(code, "for x in xs where x > 0 {\n  use(x)\n}\n");
        assert_eq!(diagnostics.len(), 1);
        assert!(diagnostics[0].kind.body.contains("'where'"));
    }

    #[test]
    fn folds_a_guard_continue_into_where() {
        let (code, diagnostics) = format(
            "for x in xs { guard x > 0 else { continue }\nuse(x) }",
            &Settings::for_rule(Rule::PreferWhereClause),
        );
        assert_eq!(code, "for x in xs where x > 0 {\n  use(x)\n}\n");
        assert_eq!(diagnostics.len(), 1);
    }

    #[test]
    fn existing_where_clauses_are_not_extended() {
        let source = "for x in xs where x > 0 { if x < 10 { use(x) } }";
        let (code, diagnostics) =
            format(source, &Settings::for_rule(Rule::PreferWhereClause));
        assert_eq!(
            code,
            "for x in xs where x > 0 {\n  if x < 10 {\n    use(x)\n  }\n}\n"
        );
        assert!(diagnostics.is_empty());
    }

    #[test]
    fn if_with_else_is_not_a_filter() {
        let (_, diagnostics) = format(
            "for x in xs { if x > 0 { use(x) } else { skip(x) } }",
            &Settings::for_rule(Rule::PreferWhereClause),
        );
        assert!(diagnostics.is_empty());
    }

    #[test]
    fn extra_statements_defeat_the_if_shape() {
        let (_, diagnostics) = format(
            "for x in xs { if x > 0 { use(x) }\nfinish(x) }",
            &Settings::for_rule(Rule::PreferWhereClause),
        );
        assert!(diagnostics.is_empty());
    }

    #[test]
    fn comments_on_discarded_tokens_block_the_rewrite() {
        let (code, diagnostics) = format(
            indoc! {"
                for x in xs {
                  // only the positive ones
                  if x > 0 { use(x) }
                }
            "},
            &Settings::for_rule(Rule::PreferWhereClause),
        );
        assert!(code.contains("// only the positive ones"));
        assert!(diagnostics.is_empty());
    }

    #[test]
    fn lint_mode_reports_without_rewriting() {
        let diagnostics = lint(
            "for x in xs { if x > 0 { use(x) } }",
            &Settings::for_rule(Rule::PreferWhereClause),
        );
        assert_eq!(diagnostics.len(), 1);
    }
}
