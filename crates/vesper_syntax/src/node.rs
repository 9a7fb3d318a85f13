use std::fmt;

use crate::kind::SyntaxKind;
use crate::token::{Token, TokenIndex, TokenKind};

/// A child of a [`SyntaxNode`]: either a nested node or a terminal token.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum SyntaxElement {
    Node(SyntaxNode),
    Token(Token),
}

impl SyntaxElement {
    pub const fn as_node(&self) -> Option<&SyntaxNode> {
        match self {
            SyntaxElement::Node(node) => Some(node),
            SyntaxElement::Token(_) => None,
        }
    }

    pub const fn as_token(&self) -> Option<&Token> {
        match self {
            SyntaxElement::Token(token) => Some(token),
            SyntaxElement::Node(_) => None,
        }
    }
}

impl From<SyntaxNode> for SyntaxElement {
    fn from(node: SyntaxNode) -> Self {
        SyntaxElement::Node(node)
    }
}

impl From<Token> for SyntaxElement {
    fn from(token: Token) -> Self {
        SyntaxElement::Token(token)
    }
}

/// An untyped node: a kind plus an ordered sequence of children.
///
/// The tree is immutable while lint rules run; rewrite passes build new
/// nodes from the pieces of old ones.
#[derive(Clone, PartialEq, Eq)]
pub struct SyntaxNode {
    pub kind: SyntaxKind,
    pub children: Vec<SyntaxElement>,
}

impl SyntaxNode {
    pub fn new(kind: SyntaxKind, children: Vec<SyntaxElement>) -> Self {
        Self { kind, children }
    }

    pub fn kind(&self) -> SyntaxKind {
        self.kind
    }

    /// The direct child nodes, skipping tokens.
    pub fn child_nodes(&self) -> impl DoubleEndedIterator<Item = &SyntaxNode> {
        self.children.iter().filter_map(SyntaxElement::as_node)
    }

    /// The direct child tokens, skipping nodes.
    pub fn child_tokens(&self) -> impl DoubleEndedIterator<Item = &Token> {
        self.children.iter().filter_map(SyntaxElement::as_token)
    }

    pub fn first_child_of_kind(&self, kind: SyntaxKind) -> Option<&SyntaxNode> {
        self.child_nodes().find(|node| node.kind == kind)
    }

    pub fn children_of_kind(&self, kind: SyntaxKind) -> impl Iterator<Item = &SyntaxNode> {
        self.child_nodes().filter(move |node| node.kind == kind)
    }

    pub fn first_token_of_kind(&self, kind: TokenKind) -> Option<&Token> {
        self.child_tokens().find(|token| token.kind == kind)
    }

    /// The first terminal token in this subtree, in source order.
    pub fn first_token(&self) -> Option<&Token> {
        for child in &self.children {
            match child {
                SyntaxElement::Token(token) => return Some(token),
                SyntaxElement::Node(node) => {
                    if let Some(token) = node.first_token() {
                        return Some(token);
                    }
                }
            }
        }
        None
    }

    /// The last terminal token in this subtree, in source order.
    pub fn last_token(&self) -> Option<&Token> {
        for child in self.children.iter().rev() {
            match child {
                SyntaxElement::Token(token) => return Some(token),
                SyntaxElement::Node(node) => {
                    if let Some(token) = node.last_token() {
                        return Some(token);
                    }
                }
            }
        }
        None
    }

    pub fn first_token_mut(&mut self) -> Option<&mut Token> {
        for child in &mut self.children {
            match child {
                SyntaxElement::Token(token) => return Some(token),
                SyntaxElement::Node(node) => {
                    if let Some(token) = node.first_token_mut() {
                        return Some(token);
                    }
                }
            }
        }
        None
    }

    pub fn last_token_mut(&mut self) -> Option<&mut Token> {
        for child in self.children.iter_mut().rev() {
            match child {
                SyntaxElement::Token(token) => return Some(token),
                SyntaxElement::Node(node) => {
                    if let Some(token) = node.last_token_mut() {
                        return Some(token);
                    }
                }
            }
        }
        None
    }

    /// Every terminal token in this subtree, in source order.
    pub fn tokens(&self) -> Tokens<'_> {
        Tokens {
            stack: vec![self.children.iter()],
        }
    }

    /// Every node in this subtree, preorder, including `self`.
    pub fn descendants(&self) -> Descendants<'_> {
        Descendants { stack: vec![self] }
    }

    /// Apply `f` to every token in the subtree, in source order.
    pub fn for_each_token_mut(&mut self, f: &mut impl FnMut(&mut Token)) {
        for child in &mut self.children {
            match child {
                SyntaxElement::Token(token) => f(token),
                SyntaxElement::Node(node) => node.for_each_token_mut(f),
            }
        }
    }

    /// Reassign token indices in source order, making them unique again
    /// after a rewrite pass has synthesized or duplicated tokens.
    pub fn reindex(&mut self) {
        let mut next = 0u32;
        self.for_each_token_mut(&mut |token| {
            token.index = TokenIndex::new(next);
            next += 1;
        });
    }

    /// The source text this subtree stands for, trivia included.
    pub fn text(&self) -> String {
        let mut out = String::new();
        for token in self.tokens() {
            for piece in &token.leading {
                piece.write_to(&mut out);
            }
            out.push_str(&token.text);
            for piece in &token.trailing {
                piece.write_to(&mut out);
            }
        }
        out
    }
}

impl fmt::Debug for SyntaxNode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        fn debug(node: &SyntaxNode, f: &mut fmt::Formatter<'_>, depth: usize) -> fmt::Result {
            writeln!(f, "{:indent$}{:?}", "", node.kind, indent = depth * 2)?;
            for child in &node.children {
                match child {
                    SyntaxElement::Node(node) => debug(node, f, depth + 1)?,
                    SyntaxElement::Token(token) => writeln!(
                        f,
                        "{:indent$}{:?} {:?}",
                        "",
                        token.kind,
                        token.text,
                        indent = (depth + 1) * 2
                    )?,
                }
            }
            Ok(())
        }
        debug(self, f, 0)
    }
}

/// Iterator over the terminal tokens of a subtree.
pub struct Tokens<'a> {
    stack: Vec<std::slice::Iter<'a, SyntaxElement>>,
}

impl<'a> Iterator for Tokens<'a> {
    type Item = &'a Token;

    fn next(&mut self) -> Option<Self::Item> {
        while let Some(iter) = self.stack.last_mut() {
            match iter.next() {
                Some(SyntaxElement::Token(token)) => return Some(token),
                Some(SyntaxElement::Node(node)) => self.stack.push(node.children.iter()),
                None => {
                    self.stack.pop();
                }
            }
        }
        None
    }
}

/// Preorder iterator over the nodes of a subtree.
pub struct Descendants<'a> {
    stack: Vec<&'a SyntaxNode>,
}

impl<'a> Iterator for Descendants<'a> {
    type Item = &'a SyntaxNode;

    fn next(&mut self) -> Option<Self::Item> {
        let node = self.stack.pop()?;
        for child in node.children.iter().rev() {
            if let SyntaxElement::Node(child) = child {
                self.stack.push(child);
            }
        }
        Some(node)
    }
}

#[cfg(test)]
mod tests {
    use super::{SyntaxElement, SyntaxNode};
    use crate::kind::SyntaxKind;
    use crate::token::{Token, TokenKind};

    fn sample() -> SyntaxNode {
        SyntaxNode::new(
            SyntaxKind::VariableDecl,
            vec![
                SyntaxElement::Token(Token::new(TokenKind::Let, "let")),
                SyntaxElement::Token(Token::new(TokenKind::Identifier, "x")),
                SyntaxElement::Node(SyntaxNode::new(
                    SyntaxKind::Initializer,
                    vec![
                        SyntaxElement::Token(Token::new(TokenKind::Equal, "=")),
                        SyntaxElement::Node(SyntaxNode::new(
                            SyntaxKind::LiteralExpr,
                            vec![SyntaxElement::Token(Token::new(
                                TokenKind::IntegerLiteral,
                                "1",
                            ))],
                        )),
                    ],
                )),
            ],
        )
    }

    #[test]
    fn token_order() {
        let node = sample();
        let texts: Vec<_> = node.tokens().map(|token| token.text.as_str()).collect();
        assert_eq!(texts, ["let", "x", "=", "1"]);
        assert_eq!(node.first_token().unwrap().text, "let");
        assert_eq!(node.last_token().unwrap().text, "1");
    }

    #[test]
    fn descendants_are_preorder() {
        let node = sample();
        let kinds: Vec<_> = node.descendants().map(SyntaxNode::kind).collect();
        assert_eq!(
            kinds,
            [
                SyntaxKind::VariableDecl,
                SyntaxKind::Initializer,
                SyntaxKind::LiteralExpr
            ]
        );
    }

    #[test]
    fn reindex_assigns_source_order() {
        let mut node = sample();
        node.reindex();
        let indices: Vec<_> = node.tokens().map(|token| token.index.get()).collect();
        assert_eq!(indices, [0, 1, 2, 3]);
    }

    #[test]
    fn text_round_trips() {
        let node = sample();
        assert_eq!(node.text(), "letx=1");
    }
}
