//! The Vesper syntax tree.
//!
//! Trees are fully concrete: every terminal token owns the whitespace and
//! comment trivia around it, so a tree round-trips to the exact source text
//! it was parsed from. Nodes are untyped (a [`SyntaxKind`] plus an ordered
//! list of children); consumers match on the kind and pick children out by
//! position or kind.

mod kind;
mod node;
mod token;
mod trivia;

pub use crate::kind::SyntaxKind;
pub use crate::node::{SyntaxElement, SyntaxNode};
pub use crate::token::{Token, TokenIndex, TokenKind};
pub use crate::trivia::{CommentKind, TriviaPiece};
