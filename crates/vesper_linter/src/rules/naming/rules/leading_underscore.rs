use vesper_syntax::{SyntaxKind, SyntaxNode};

use crate::checkers::ast::Checker;
use crate::helpers::{declared_name, parameter_name};
use crate::registry::Rule;
use crate::violation::Violation;

pub(crate) struct LeadingUnderscore {
    name: String,
}

impl Violation for LeadingUnderscore {
    const RULE: Rule = Rule::LeadingUnderscore;

    fn message(&self) -> String {
        format!("remove the leading underscore from '{}'", self.name)
    }
}

/// Declared names do not start with an underscore. A bare `_` is the
/// discard pattern and is fine.
pub(crate) fn leading_underscore(checker: &mut Checker, node: &SyntaxNode) {
    let name = if node.kind() == SyntaxKind::Parameter {
        parameter_name(node)
    } else {
        declared_name(node)
    };
    let Some(name) = name else {
        return;
    };
    if name.text.len() > 1 && name.text.starts_with('_') {
        checker.report(
            &LeadingUnderscore {
                name: name.text.clone(),
            },
            name,
        );
    }
}
