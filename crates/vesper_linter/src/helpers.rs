//! Small AST queries shared across rules.

use vesper_syntax::{SyntaxKind, SyntaxNode, Token, TokenKind};

/// The name a declaration introduces: its first identifier child.
pub(crate) fn declared_name(node: &SyntaxNode) -> Option<&Token> {
    node.first_token_of_kind(TokenKind::Identifier)
}

pub(crate) fn has_modifier(node: &SyntaxNode, keyword: TokenKind) -> bool {
    node.children_of_kind(SyntaxKind::DeclModifier)
        .any(|modifier| modifier.first_token_of_kind(keyword).is_some())
}

/// The binding name of a parameter. `label name: T` binds `name`,
/// `name: T` binds `name`.
pub(crate) fn parameter_name(parameter: &SyntaxNode) -> Option<&Token> {
    let mut identifiers = parameter
        .child_tokens()
        .filter(|token| token.kind == TokenKind::Identifier);
    let first = identifiers.next();
    identifiers.next().or(first)
}

pub(crate) fn parameters(function: &SyntaxNode) -> impl Iterator<Item = &SyntaxNode> {
    function
        .first_child_of_kind(SyntaxKind::ParameterClause)
        .into_iter()
        .flat_map(|clause| clause.children_of_kind(SyntaxKind::Parameter))
}

/// Is this parameter's declared type a function type?
pub(crate) fn is_function_typed(parameter: &SyntaxNode) -> bool {
    parameter
        .first_child_of_kind(SyntaxKind::TypeAnnotation)
        .and_then(|annotation| annotation.child_nodes().next())
        .is_some_and(|ty| ty.kind() == SyntaxKind::FunctionType)
}

/// The declared return type, unless it is spelled `Void` or `()`.
pub(crate) fn meaningful_return_type(function: &SyntaxNode) -> Option<&SyntaxNode> {
    let ty = function
        .first_child_of_kind(SyntaxKind::ReturnClause)?
        .child_nodes()
        .next()?;
    let is_void = match ty.kind() {
        SyntaxKind::NamedType => ty
            .first_token_of_kind(TokenKind::Identifier)
            .is_some_and(|name| name.text == "Void"),
        SyntaxKind::TupleType => ty.child_nodes().next().is_none(),
        _ => false,
    };
    if is_void {
        None
    } else {
        Some(ty)
    }
}

#[cfg(test)]
mod tests {
    use vesper_parser::parse;
    use vesper_syntax::{SyntaxKind, TokenKind};

    use super::{
        declared_name, has_modifier, is_function_typed, meaningful_return_type, parameter_name,
        parameters,
    };

    fn first_function(source: &str) -> vesper_syntax::SyntaxNode {
        parse(source)
            .unwrap()
            .root
            .first_child_of_kind(SyntaxKind::FunctionDecl)
            .unwrap()
            .clone()
    }

    #[test]
    fn names_and_modifiers() {
        let function = first_function("public override func reload() {}");
        assert_eq!(declared_name(&function).unwrap().text, "reload");
        assert!(has_modifier(&function, TokenKind::Public));
        assert!(has_modifier(&function, TokenKind::Override));
        assert!(!has_modifier(&function, TokenKind::Static));
    }

    #[test]
    fn parameter_binding_names() {
        let function = first_function("func f(with value: Int, other: Int) {}");
        let names: Vec<_> = parameters(&function)
            .filter_map(|parameter| parameter_name(parameter).map(|token| token.text.clone()))
            .collect();
        assert_eq!(names, ["value", "other"]);
    }

    #[test]
    fn function_typed_parameters() {
        let function = first_function("func f(body: (Int) -> Bool) {}");
        assert!(parameters(&function).all(|parameter| is_function_typed(parameter)));
        let plain = first_function("func g(x: Int) {}");
        assert!(parameters(&plain).all(|parameter| !is_function_typed(parameter)));
    }

    #[test]
    fn void_returns_are_not_meaningful() {
        assert!(meaningful_return_type(&first_function("func f() -> Void {}")).is_none());
        assert!(meaningful_return_type(&first_function("func f() -> () {}")).is_none());
        assert!(meaningful_return_type(&first_function("func f() -> Int { return x }")).is_some());
        assert!(meaningful_return_type(&first_function("func f() {}")).is_none());
    }
}
