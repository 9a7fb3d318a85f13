use std::fmt;

/// The kind of a comment, including whether it documents a declaration.
#[derive(Debug, Copy, Clone, PartialEq, Eq, Hash)]
pub enum CommentKind {
    /// `// ...`
    Line,
    /// `/// ...`
    DocLine,
    /// `/* ... */`
    Block,
    /// `/** ... */`
    DocBlock,
}

impl CommentKind {
    pub const fn is_doc(self) -> bool {
        matches!(self, CommentKind::DocLine | CommentKind::DocBlock)
    }
}

/// A single piece of trivia: a comment or a run of one whitespace character.
///
/// Runs are maximal: the lexer never produces two adjacent pieces of the
/// same kind.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum TriviaPiece {
    LineComment(String),
    DocLineComment(String),
    BlockComment(String),
    DocBlockComment(String),
    Spaces(u32),
    Tabs(u32),
    Newlines(u32),
    CarriageReturns(u32),
    CarriageReturnLineFeeds(u32),
}

impl TriviaPiece {
    pub const fn is_newline(&self) -> bool {
        matches!(
            self,
            TriviaPiece::Newlines(_)
                | TriviaPiece::CarriageReturns(_)
                | TriviaPiece::CarriageReturnLineFeeds(_)
        )
    }

    pub const fn is_spaces_or_tabs(&self) -> bool {
        matches!(self, TriviaPiece::Spaces(_) | TriviaPiece::Tabs(_))
    }

    pub const fn is_comment(&self) -> bool {
        self.comment_kind().is_some()
    }

    pub const fn is_doc_comment(&self) -> bool {
        matches!(
            self,
            TriviaPiece::DocLineComment(_) | TriviaPiece::DocBlockComment(_)
        )
    }

    /// The number of line breaks this piece contributes.
    pub const fn newline_count(&self) -> u32 {
        match self {
            TriviaPiece::Newlines(n)
            | TriviaPiece::CarriageReturns(n)
            | TriviaPiece::CarriageReturnLineFeeds(n) => *n,
            _ => 0,
        }
    }

    pub const fn comment_kind(&self) -> Option<CommentKind> {
        match self {
            TriviaPiece::LineComment(_) => Some(CommentKind::Line),
            TriviaPiece::DocLineComment(_) => Some(CommentKind::DocLine),
            TriviaPiece::BlockComment(_) => Some(CommentKind::Block),
            TriviaPiece::DocBlockComment(_) => Some(CommentKind::DocBlock),
            _ => None,
        }
    }

    pub fn comment_text(&self) -> Option<&str> {
        match self {
            TriviaPiece::LineComment(text)
            | TriviaPiece::DocLineComment(text)
            | TriviaPiece::BlockComment(text)
            | TriviaPiece::DocBlockComment(text) => Some(text),
            _ => None,
        }
    }

    /// The source text this piece stands for.
    pub fn write_to(&self, out: &mut String) {
        match self {
            TriviaPiece::LineComment(text)
            | TriviaPiece::DocLineComment(text)
            | TriviaPiece::BlockComment(text)
            | TriviaPiece::DocBlockComment(text) => out.push_str(text),
            TriviaPiece::Spaces(n) => out.extend(std::iter::repeat(' ').take(*n as usize)),
            TriviaPiece::Tabs(n) => out.extend(std::iter::repeat('\t').take(*n as usize)),
            TriviaPiece::Newlines(n) => out.extend(std::iter::repeat('\n').take(*n as usize)),
            TriviaPiece::CarriageReturns(n) => {
                out.extend(std::iter::repeat('\r').take(*n as usize));
            }
            TriviaPiece::CarriageReturnLineFeeds(n) => {
                for _ in 0..*n {
                    out.push_str("\r\n");
                }
            }
        }
    }
}

impl fmt::Display for TriviaPiece {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let mut text = String::new();
        self.write_to(&mut text);
        f.write_str(&text)
    }
}
