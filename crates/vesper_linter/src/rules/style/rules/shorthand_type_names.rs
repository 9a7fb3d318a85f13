use vesper_syntax::{SyntaxElement, SyntaxKind, SyntaxNode, Token, TokenKind};

use crate::checkers::ast::Checker;
use crate::registry::Rule;
use crate::rewriter::RewriteContext;
use crate::violation::Violation;

#[derive(Debug, Copy, Clone, PartialEq, Eq)]
enum Shorthand {
    Array,
    Dictionary,
    Optional,
}

pub(crate) struct ShorthandTypeNames {
    form: Shorthand,
}

impl Violation for ShorthandTypeNames {
    const RULE: Rule = Rule::ShorthandTypeNames;

    fn message(&self) -> String {
        match self.form {
            Shorthand::Array => "use array type shorthand form".to_string(),
            Shorthand::Dictionary => "use dictionary type shorthand form".to_string(),
            Shorthand::Optional => "use optional type shorthand form".to_string(),
        }
    }
}

/// `Array<T>`, `Dictionary<K, V>`, or `Optional<T>` spelled the long way.
fn shorthand_candidate(ty: &SyntaxNode) -> Option<(Shorthand, Vec<&SyntaxNode>)> {
    let name = ty.first_token_of_kind(TokenKind::Identifier)?;
    let clause = ty.first_child_of_kind(SyntaxKind::GenericArgumentClause)?;
    let arguments: Vec<&SyntaxNode> = clause
        .children_of_kind(SyntaxKind::ListElement)
        .filter_map(|element| element.child_nodes().next())
        .collect();
    let form = match (name.text.as_str(), arguments.len()) {
        ("Array", 1) => Shorthand::Array,
        ("Dictionary", 2) => Shorthand::Dictionary,
        ("Optional", 1) => Shorthand::Optional,
        _ => return None,
    };
    Some((form, arguments))
}

fn scan(checker: &mut Checker, node: &SyntaxNode, shorthand_allowed: bool) {
    if node.kind() == SyntaxKind::NamedType && shorthand_allowed {
        if let Some((form, _)) = shorthand_candidate(node) {
            if let Some(name) = node.first_token_of_kind(TokenKind::Identifier) {
                checker.report(&ShorthandTypeNames { form }, name);
            }
        }
    }
    let mut child_nodes = node.child_nodes();
    if node.kind() == SyntaxKind::MemberType {
        // The base of a member type must stay in its long form:
        // `Array<T>.Index` has no `[T].Index` equivalent.
        if let Some(base) = child_nodes.next() {
            scan(checker, base, false);
        }
    }
    for child in child_nodes {
        scan(checker, child, true);
    }
}

pub(crate) fn shorthand_type_names(checker: &mut Checker, node: &SyntaxNode) {
    for child in node.child_nodes() {
        scan(checker, child, true);
    }
}

pub(crate) fn rewrite_shorthand_type_names(
    root: &SyntaxNode,
    context: &mut RewriteContext,
) -> SyntaxNode {
    transform(root, context, true)
}

fn transform(node: &SyntaxNode, context: &mut RewriteContext, shorthand_allowed: bool) -> SyntaxNode {
    let mut member_base = node.kind() == SyntaxKind::MemberType;
    let children: Vec<SyntaxElement> = node
        .children
        .iter()
        .map(|child| match child {
            SyntaxElement::Node(child_node) => {
                let allowed = !std::mem::take(&mut member_base);
                SyntaxElement::Node(transform(child_node, context, allowed))
            }
            SyntaxElement::Token(token) => SyntaxElement::Token(token.clone()),
        })
        .collect();
    let node = SyntaxNode::new(node.kind, children);

    if node.kind() != SyntaxKind::NamedType || !shorthand_allowed {
        return node;
    }
    let Some((form, arguments)) = shorthand_candidate(&node) else {
        return node;
    };
    let arguments: Vec<SyntaxNode> = arguments.into_iter().cloned().collect();
    let Some(name) = node.first_token_of_kind(TokenKind::Identifier) else {
        return node;
    };
    let Some(clause) = node.first_child_of_kind(SyntaxKind::GenericArgumentClause) else {
        return node;
    };
    let closing = clause
        .child_tokens()
        .rfind(|token| token.kind == TokenKind::Greater);

    context.report(&ShorthandTypeNames { form }, name.offset);

    let leading = name.leading.clone();
    let trailing = closing.map(|token| token.trailing.clone()).unwrap_or_default();

    match form {
        Shorthand::Array => {
            let open = Token::synthesized(TokenKind::LeftSquare, name).with_leading(leading);
            let close = Token::synthesized(TokenKind::RightSquare, name).with_trailing(trailing);
            SyntaxNode::new(
                SyntaxKind::ArrayType,
                vec![
                    SyntaxElement::Token(open),
                    SyntaxElement::Node(arguments[0].clone()),
                    SyntaxElement::Token(close),
                ],
            )
        }
        Shorthand::Dictionary => {
            let open = Token::synthesized(TokenKind::LeftSquare, name).with_leading(leading);
            let colon = Token::synthesized(TokenKind::Colon, name);
            let close = Token::synthesized(TokenKind::RightSquare, name).with_trailing(trailing);
            SyntaxNode::new(
                SyntaxKind::DictionaryType,
                vec![
                    SyntaxElement::Token(open),
                    SyntaxElement::Node(arguments[0].clone()),
                    SyntaxElement::Token(colon),
                    SyntaxElement::Node(arguments[1].clone()),
                    SyntaxElement::Token(close),
                ],
            )
        }
        Shorthand::Optional => {
            let mut inner = arguments[0].clone();
            if let Some(first) = inner.first_token_mut() {
                let mut merged = leading;
                merged.append(&mut first.leading);
                first.leading = merged;
            }
            let question = Token::synthesized(TokenKind::Question, name).with_trailing(trailing);
            SyntaxNode::new(
                SyntaxKind::OptionalType,
                vec![SyntaxElement::Node(inner), SyntaxElement::Token(question)],
            )
        }
    }
}

#[cfg(test)]
mod tests {
    use crate::registry::Rule;
    use crate::settings::Settings;
    use crate::test_helpers::{format, lint};

    fn rewrite(source: &str) -> (String, Vec<String>) {
        let (code, diagnostics) = format(source, &Settings::for_rule(Rule::ShorthandTypeNames));
        (
            code,
            diagnostics
                .into_iter()
                .map(|diagnostic| diagnostic.kind.body)
                .collect(),
        )
    }

    #[test]
    fn array_shorthand() {
        let (code, messages) = rewrite("let a:Array<Int> = []");
        assert_eq!(code, "let a: [Int] = []\n");
        assert_eq!(messages, ["use array type shorthand form"]);
    }

    #[test]
    fn dictionary_shorthand() {
        let (code, messages) = rewrite("let d: Dictionary<String, Int> = empty");
        assert_eq!(code, "let d: [String: Int] = empty\n");
        assert_eq!(messages, ["use dictionary type shorthand form"]);
    }

    #[test]
    fn optional_shorthand() {
        let (code, messages) = rewrite("let o: Optional<Int> = nil");
        assert_eq!(code, "let o: Int? = nil\n");
        assert_eq!(messages, ["use optional type shorthand form"]);
    }

    #[test]
    fn nested_long_forms_collapse() {
        let (code, messages) = rewrite("let a: Array<Array<Int>> = []");
        assert_eq!(code, "let a: [[Int]] = []\n");
        assert_eq!(messages.len(), 2);
    }

    #[test]
    fn member_type_bases_keep_the_long_form() {
        let (code, messages) = rewrite("let i: Array<Int>.Index = zero");
        assert_eq!(code, "let i: Array<Int>.Index = zero\n");
        assert!(messages.is_empty(), "{messages:?}");
    }

    #[test]
    fn generic_arguments_of_member_bases_still_collapse() {
        let (code, messages) = rewrite("let i: Array<Optional<Int>>.Index = zero");
        assert_eq!(code, "let i: Array<Int?>.Index = zero\n");
        assert_eq!(messages, ["use optional type shorthand form"]);
    }

    #[test]
    fn lint_reports_each_long_form() {
        let diagnostics = lint(
            "let a: Array<Int> = []\nlet d: Dictionary<Int, Int> = empty",
            &Settings::for_rule(Rule::ShorthandTypeNames),
        );
        assert_eq!(diagnostics.len(), 2);
    }

    #[test]
    fn other_generics_are_untouched() {
        let (code, messages) = rewrite("let s: Set<Int> = empty");
        assert_eq!(code, "let s: Set<Int> = empty\n");
        assert!(messages.is_empty(), "{messages:?}");
    }

    #[test]
    fn function_parameters_and_returns_collapse() {
        let (code, messages) =
            rewrite("func f(xs: Array<Int>) -> Optional<Int> { return xs.first }");
        assert_eq!(code, "func f(xs: [Int]) -> Int? {\n  return xs.first\n}\n");
        assert_eq!(messages.len(), 2);
    }
}
