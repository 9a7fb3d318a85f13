use vesper_syntax::{SyntaxNode, TokenKind};

use crate::checkers::ast::Checker;
use crate::helpers::{declared_name, has_modifier};
use crate::registry::Rule;
use crate::violation::Violation;

pub(crate) struct MissingDocumentation {
    name: String,
}

impl Violation for MissingDocumentation {
    const RULE: Rule = Rule::MissingDocumentation;

    fn message(&self) -> String {
        format!(
            "add a documentation comment for the public declaration '{}'",
            self.name
        )
    }
}

/// Public declarations must carry a doc comment. Overrides inherit the
/// documentation of the declaration they replace, so they are exempt.
pub(crate) fn missing_documentation(checker: &mut Checker, node: &SyntaxNode) {
    if !has_modifier(node, TokenKind::Public) || has_modifier(node, TokenKind::Override) {
        return;
    }
    let Some(first) = node.first_token() else {
        return;
    };
    if first.has_doc_comment() {
        return;
    }
    let Some(name) = declared_name(node) else {
        return;
    };
    checker.report(
        &MissingDocumentation {
            name: name.text.clone(),
        },
        name,
    );
}
