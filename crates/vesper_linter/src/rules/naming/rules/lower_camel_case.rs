use vesper_syntax::SyntaxNode;

use crate::checkers::ast::Checker;
use crate::helpers::declared_name;
use crate::registry::Rule;
use crate::violation::Violation;

pub(crate) struct LowerCamelCase {
    name: String,
}

impl Violation for LowerCamelCase {
    const RULE: Rule = Rule::LowerCamelCase;

    fn message(&self) -> String {
        format!("rename '{}' using lower-camel-case", self.name)
    }
}

fn is_lower_camel_case(name: &str) -> bool {
    let mut chars = name.chars();
    let Some(first) = chars.next() else {
        return true;
    };
    if first.is_uppercase() {
        return false;
    }
    // A leading underscore is the concern of another rule; underscores
    // anywhere else break camel case.
    !name.trim_start_matches('_').contains('_')
}

/// Bindings, functions, and enum cases are spelled in lower camel case.
pub(crate) fn lower_camel_case(checker: &mut Checker, node: &SyntaxNode) {
    let Some(name) = declared_name(node) else {
        return;
    };
    if is_lower_camel_case(&name.text) {
        return;
    }
    checker.report(
        &LowerCamelCase {
            name: name.text.clone(),
        },
        name,
    );
}
