use itertools::Itertools;
use vesper_syntax::SyntaxNode;

use crate::checkers::ast::Checker;
use crate::helpers::{declared_name, meaningful_return_type, parameter_name, parameters};
use crate::registry::Rule;
use crate::violation::Violation;

pub(crate) enum DocCommentConsistency {
    ParameterMismatch { name: String, declared: Vec<String> },
    UseSingularParameter,
    UsePluralParameters,
    MissingReturns { name: String },
    SpuriousReturns { name: String },
}

impl Violation for DocCommentConsistency {
    const RULE: Rule = Rule::DocCommentConsistency;

    fn message(&self) -> String {
        match self {
            DocCommentConsistency::ParameterMismatch { name, declared } => {
                if declared.is_empty() {
                    format!("remove the parameter documentation of '{name}'; it takes none")
                } else {
                    format!(
                        "change the doc comment of '{name}' to match its declared parameters ({})",
                        declared.iter().join(", ")
                    )
                }
            }
            DocCommentConsistency::UseSingularParameter => {
                "use the singular 'Parameter' tag to document a single parameter".to_string()
            }
            DocCommentConsistency::UsePluralParameters => {
                "use the plural 'Parameters:' section to document multiple parameters".to_string()
            }
            DocCommentConsistency::MissingReturns { name } => {
                format!("add a 'Returns:' tag documenting the return value of '{name}'")
            }
            DocCommentConsistency::SpuriousReturns { name } => {
                format!("remove the 'Returns:' tag; '{name}' does not return a value")
            }
        }
    }
}

/// What a doc comment says about a function's signature.
#[derive(Debug, Default, PartialEq, Eq)]
struct DocSignature {
    /// Parameters documented with the singular `- Parameter x:` tag.
    singular: Vec<String>,
    /// Parameters documented inside a `- Parameters:` section.
    plural: Vec<String>,
    documents_return: bool,
}

impl DocSignature {
    fn names(&self) -> impl Iterator<Item = &str> {
        self.singular
            .iter()
            .chain(&self.plural)
            .map(String::as_str)
    }
}

/// Strip comment markers and leading asterisks, leaving the content.
fn content_lines(doc: &str) -> Vec<String> {
    let mut lines = Vec::new();
    for raw in doc.lines() {
        let mut line = raw.trim();
        for marker in ["///", "/**", "*/", "//"] {
            line = line.strip_prefix(marker).unwrap_or(line);
            line = line.strip_suffix(marker).unwrap_or(line);
        }
        line = line.strip_prefix('*').unwrap_or(line);
        lines.push(line.trim().to_string());
    }
    lines
}

fn parse_doc(doc: &str) -> DocSignature {
    let mut signature = DocSignature::default();
    let mut in_parameters_section = false;
    for line in content_lines(doc) {
        if let Some(rest) = line.strip_prefix("- Parameter ") {
            in_parameters_section = false;
            if let Some((name, _)) = rest.split_once(':') {
                signature.singular.push(name.trim().to_string());
            }
        } else if line.strip_prefix("- Parameters:").is_some() {
            in_parameters_section = true;
        } else if line.starts_with("- Returns:") {
            in_parameters_section = false;
            signature.documents_return = true;
        } else if let Some(rest) = line.strip_prefix("- ") {
            if in_parameters_section {
                if let Some((name, _)) = rest.split_once(':') {
                    signature.plural.push(name.trim().to_string());
                }
            }
        } else if !line.is_empty() && !line.starts_with('-') {
            // Prose paragraphs end a parameters section.
            in_parameters_section = false;
        }
    }
    signature
}

/// Validate the structure of a function's doc comment against its
/// signature: documented parameter names, singular versus plural tag
/// usage, and the presence of a `Returns:` tag.
pub(crate) fn doc_comment_consistency(checker: &mut Checker, function: &SyntaxNode) {
    let Some(first) = function.first_token() else {
        return;
    };
    let Some(doc) = first.doc_comment_text() else {
        return;
    };
    let Some(name) = declared_name(function) else {
        return;
    };
    let signature = parse_doc(&doc);

    let declared: Vec<&str> = parameters(function)
        .filter_map(|parameter| parameter_name(parameter).map(|token| token.text.as_str()))
        .collect();
    let documented: Vec<&str> = signature.names().collect();

    if !documented.is_empty() && documented != declared {
        checker.report(
            &DocCommentConsistency::ParameterMismatch {
                name: name.text.clone(),
                declared: declared.iter().map(ToString::to_string).collect(),
            },
            name,
        );
    }

    if signature.plural.len() == 1 && signature.singular.is_empty() {
        checker.report(&DocCommentConsistency::UseSingularParameter, name);
    }
    if signature.singular.len() > 1 {
        checker.report(&DocCommentConsistency::UsePluralParameters, name);
    }

    let returns_value = meaningful_return_type(function).is_some();
    if returns_value && !signature.documents_return {
        checker.report(
            &DocCommentConsistency::MissingReturns {
                name: name.text.clone(),
            },
            name,
        );
    }
    if !returns_value && signature.documents_return {
        checker.report(
            &DocCommentConsistency::SpuriousReturns {
                name: name.text.clone(),
            },
            name,
        );
    }
}

#[cfg(test)]
mod tests {
    use indoc::indoc;

    use crate::registry::Rule;
    use crate::settings::Settings;
    use crate::test_helpers::lint;

    fn check(source: &str) -> Vec<String> {
        lint(source, &Settings::for_rule(Rule::DocCommentConsistency))
            .into_iter()
            .map(|diagnostic| diagnostic.kind.body)
            .collect()
    }

    #[test]
    fn consistent_doc_comment_passes() {
        let messages = check(indoc! {"
            /// Adds.
            ///
            /// - Parameter value: the addend.
            /// - Returns: the sum.
            func add(value: Int) -> Int { return value }
        "});
        assert!(messages.is_empty(), "{messages:?}");
    }

    #[test]
    fn parameter_name_mismatch() {
        let messages = check(indoc! {"
            /// - Parameter amount: the addend.
            func add(value: Int) {}
        "});
        assert_eq!(messages.len(), 1);
        assert!(messages[0].contains("match its declared parameters"));
    }

    #[test]
    fn plural_section_for_one_parameter() {
        let messages = check(indoc! {"
            /// - Parameters:
            ///   - value: the addend.
            func add(value: Int) {}
        "});
        assert_eq!(messages.len(), 1);
        assert!(messages[0].contains("singular"));
    }

    #[test]
    fn repeated_singular_tags_for_many_parameters() {
        let messages = check(indoc! {"
            /// - Parameter a: first.
            /// - Parameter b: second.
            func add(a: Int, b: Int) {}
        "});
        assert_eq!(messages.len(), 1);
        assert!(messages[0].contains("plural"));
    }

    #[test]
    fn plural_section_documents_many_parameters() {
        let messages = check(indoc! {"
            /// - Parameters:
            ///   - a: first.
            ///   - b: second.
            func add(a: Int, b: Int) {}
        "});
        assert!(messages.is_empty(), "{messages:?}");
    }

    #[test]
    fn missing_returns_tag() {
        let messages = check(indoc! {"
            /// Computes.
            func compute() -> Int { return one }
        "});
        assert_eq!(messages.len(), 1);
        assert!(messages[0].contains("add a 'Returns:'"));
    }

    #[test]
    fn spurious_returns_tag() {
        let messages = check(indoc! {"
            /// - Returns: nothing.
            func run() {}
        "});
        assert_eq!(messages.len(), 1);
        assert!(messages[0].contains("remove the 'Returns:'"));
    }

    #[test]
    fn undocumented_functions_are_ignored() {
        assert!(check("func f(a: Int) -> Int { return a }").is_empty());
    }
}
