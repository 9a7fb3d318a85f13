//! Lexer and parser for Vesper source text.
//!
//! The lexer attaches every scrap of whitespace and every comment to a
//! token, so the resulting tree reproduces the input byte for byte (see
//! [`vesper_syntax::SyntaxNode::text`]). The parser is a plain recursive
//! descent over the token stream.

use thiserror::Error;

use vesper_source_file::LineIndex;
use vesper_syntax::SyntaxNode;

mod lexer;
mod parser;

pub use crate::lexer::lex;

/// A lexical or syntactic error, positioned by byte offset.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
#[error("{message}")]
pub struct ParseError {
    pub message: String,
    pub offset: u32,
}

impl ParseError {
    pub(crate) fn new(message: impl Into<String>, offset: u32) -> Self {
        Self {
            message: message.into(),
            offset,
        }
    }
}

/// A parsed source file: the tree plus the line index for the text it was
/// parsed from.
#[derive(Debug)]
pub struct Parse {
    pub root: SyntaxNode,
    pub line_index: LineIndex,
}

/// Parse `source` into a syntax tree with full trivia.
pub fn parse(source: &str) -> Result<Parse, ParseError> {
    let tokens = lexer::lex(source)?;
    let root = parser::Parser::new(tokens).parse_source_file()?;
    Ok(Parse {
        root,
        line_index: LineIndex::from_source_text(source),
    })
}
