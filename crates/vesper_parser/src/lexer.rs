use vesper_syntax::{Token, TokenIndex, TokenKind, TriviaPiece};

use crate::ParseError;

/// Tokenize `source`, attaching leading and trailing trivia to every token.
///
/// The returned stream always ends with an [`TokenKind::Eof`] token whose
/// leading trivia holds whatever followed the last real token.
pub fn lex(source: &str) -> Result<Vec<Token>, ParseError> {
    Lexer::new(source).run()
}

struct Lexer<'a> {
    source: &'a str,
    pos: usize,
    next_index: u32,
}

impl<'a> Lexer<'a> {
    fn new(source: &'a str) -> Self {
        Self {
            source,
            pos: 0,
            next_index: 0,
        }
    }

    fn run(mut self) -> Result<Vec<Token>, ParseError> {
        let mut tokens = Vec::new();
        loop {
            let leading = self.trivia(TriviaMode::Leading)?;
            let offset = self.offset();
            let (kind, text) = self.next_token()?;
            let trailing = if kind == TokenKind::Eof {
                Vec::new()
            } else {
                self.trivia(TriviaMode::Trailing)?
            };

            let index = TokenIndex::new(self.next_index);
            self.next_index += 1;
            tokens.push(Token {
                kind,
                text,
                offset,
                index,
                leading,
                trailing,
            });

            if kind == TokenKind::Eof {
                return Ok(tokens);
            }
        }
    }

    fn offset(&self) -> u32 {
        u32::try_from(self.pos).expect("file larger than 4GiB")
    }

    fn peek(&self) -> Option<char> {
        self.source[self.pos..].chars().next()
    }

    fn peek_second(&self) -> Option<char> {
        let mut chars = self.source[self.pos..].chars();
        chars.next();
        chars.next()
    }

    fn bump(&mut self) -> Option<char> {
        let c = self.peek()?;
        self.pos += c.len_utf8();
        Some(c)
    }

    fn eat(&mut self, c: char) -> bool {
        if self.peek() == Some(c) {
            self.pos += c.len_utf8();
            true
        } else {
            false
        }
    }

    /// Count a run of `c`, consuming it.
    fn run_of(&mut self, c: char) -> u32 {
        let mut count = 0;
        while self.eat(c) {
            count += 1;
        }
        count
    }

    fn trivia(&mut self, mode: TriviaMode) -> Result<Vec<TriviaPiece>, ParseError> {
        let mut pieces = Vec::new();
        loop {
            match self.peek() {
                Some(' ') => pieces.push(TriviaPiece::Spaces(self.run_of(' '))),
                Some('\t') => pieces.push(TriviaPiece::Tabs(self.run_of('\t'))),
                Some('\n') if mode == TriviaMode::Leading => {
                    pieces.push(TriviaPiece::Newlines(self.run_of('\n')));
                }
                Some('\r') if mode == TriviaMode::Leading => {
                    if self.peek_second() == Some('\n') {
                        let mut count = 0;
                        while self.peek() == Some('\r') && self.peek_second() == Some('\n') {
                            self.pos += 2;
                            count += 1;
                        }
                        pieces.push(TriviaPiece::CarriageReturnLineFeeds(count));
                    } else {
                        pieces.push(TriviaPiece::CarriageReturns(self.run_of('\r')));
                    }
                }
                Some('/') if self.peek_second() == Some('/') => {
                    pieces.push(self.line_comment());
                }
                Some('/') if self.peek_second() == Some('*') => {
                    pieces.push(self.block_comment()?);
                }
                _ => return Ok(pieces),
            }
        }
    }

    fn line_comment(&mut self) -> TriviaPiece {
        let start = self.pos;
        while let Some(c) = self.peek() {
            if c == '\n' || c == '\r' {
                break;
            }
            self.bump();
        }
        let text = self.source[start..self.pos].to_string();
        if text.starts_with("///") && !text.starts_with("////") {
            TriviaPiece::DocLineComment(text)
        } else {
            TriviaPiece::LineComment(text)
        }
    }

    /// Block comments nest: `/* a /* b */ c */` is one comment.
    fn block_comment(&mut self) -> Result<TriviaPiece, ParseError> {
        let start = self.pos;
        self.pos += 2;
        let mut depth = 1u32;
        while depth > 0 {
            match self.peek() {
                Some('/') if self.peek_second() == Some('*') => {
                    self.pos += 2;
                    depth += 1;
                }
                Some('*') if self.peek_second() == Some('/') => {
                    self.pos += 2;
                    depth -= 1;
                }
                Some(_) => {
                    self.bump();
                }
                None => {
                    return Err(ParseError::new(
                        "unterminated block comment",
                        u32::try_from(start).unwrap_or(u32::MAX),
                    ));
                }
            }
        }
        let text = self.source[start..self.pos].to_string();
        if text.starts_with("/**") && text.len() > "/**/".len() {
            Ok(TriviaPiece::DocBlockComment(text))
        } else {
            Ok(TriviaPiece::BlockComment(text))
        }
    }

    fn next_token(&mut self) -> Result<(TokenKind, String), ParseError> {
        let start = self.pos;
        let Some(c) = self.peek() else {
            return Ok((TokenKind::Eof, String::new()));
        };

        if unicode_ident::is_xid_start(c) || c == '_' {
            self.bump();
            while let Some(c) = self.peek() {
                if unicode_ident::is_xid_continue(c) {
                    self.bump();
                } else {
                    break;
                }
            }
            let text = &self.source[start..self.pos];
            return Ok((keyword_kind(text), text.to_string()));
        }

        if c.is_ascii_digit() {
            return Ok(self.number(start));
        }

        if c == '"' {
            return self.string(start);
        }

        self.bump();
        let kind = match c {
            '(' => TokenKind::LeftParen,
            ')' => TokenKind::RightParen,
            '{' => TokenKind::LeftBrace,
            '}' => TokenKind::RightBrace,
            '[' => TokenKind::LeftSquare,
            ']' => TokenKind::RightSquare,
            ',' => TokenKind::Comma,
            ':' => TokenKind::Colon,
            '.' => TokenKind::Dot,
            '@' => TokenKind::At,
            '?' => TokenKind::Question,
            '+' => TokenKind::Plus,
            '*' => TokenKind::Star,
            '/' => TokenKind::Slash,
            '%' => TokenKind::Percent,
            '-' => {
                if self.eat('>') {
                    TokenKind::Arrow
                } else {
                    TokenKind::Minus
                }
            }
            '=' => {
                if self.eat('=') {
                    TokenKind::EqualEqual
                } else {
                    TokenKind::Equal
                }
            }
            '!' => {
                if self.eat('=') {
                    TokenKind::NotEqual
                } else {
                    TokenKind::Bang
                }
            }
            '<' => {
                if self.eat('=') {
                    TokenKind::LessEqual
                } else {
                    TokenKind::Less
                }
            }
            '>' => {
                if self.eat('=') {
                    TokenKind::GreaterEqual
                } else {
                    TokenKind::Greater
                }
            }
            '&' => {
                if self.eat('&') {
                    TokenKind::AmpAmp
                } else {
                    return Err(ParseError::new(
                        "unexpected character `&`",
                        u32::try_from(start).unwrap_or(u32::MAX),
                    ));
                }
            }
            '|' => {
                if self.eat('|') {
                    TokenKind::PipePipe
                } else {
                    return Err(ParseError::new(
                        "unexpected character `|`",
                        u32::try_from(start).unwrap_or(u32::MAX),
                    ));
                }
            }
            _ => {
                return Err(ParseError::new(
                    format!("unexpected character `{c}`"),
                    u32::try_from(start).unwrap_or(u32::MAX),
                ));
            }
        };
        Ok((kind, self.source[start..self.pos].to_string()))
    }

    fn number(&mut self, start: usize) -> (TokenKind, String) {
        let mut kind = TokenKind::IntegerLiteral;
        while matches!(self.peek(), Some(c) if c.is_ascii_digit() || c == '_') {
            self.bump();
        }
        if self.peek() == Some('.') && matches!(self.peek_second(), Some(c) if c.is_ascii_digit()) {
            kind = TokenKind::FloatLiteral;
            self.bump();
            while matches!(self.peek(), Some(c) if c.is_ascii_digit() || c == '_') {
                self.bump();
            }
        }
        (kind, self.source[start..self.pos].to_string())
    }

    fn string(&mut self, start: usize) -> Result<(TokenKind, String), ParseError> {
        self.bump();
        loop {
            match self.peek() {
                Some('"') => {
                    self.bump();
                    return Ok((
                        TokenKind::StringLiteral,
                        self.source[start..self.pos].to_string(),
                    ));
                }
                Some('\\') => {
                    self.bump();
                    self.bump();
                }
                Some('\n' | '\r') | None => {
                    return Err(ParseError::new(
                        "unterminated string literal",
                        u32::try_from(start).unwrap_or(u32::MAX),
                    ));
                }
                Some(_) => {
                    self.bump();
                }
            }
        }
    }
}

#[derive(Copy, Clone, PartialEq, Eq)]
enum TriviaMode {
    Leading,
    /// Stops at the first line break; the break belongs to the next token.
    Trailing,
}

fn keyword_kind(text: &str) -> TokenKind {
    match text {
        "let" => TokenKind::Let,
        "var" => TokenKind::Var,
        "func" => TokenKind::Func,
        "if" => TokenKind::If,
        "else" => TokenKind::Else,
        "guard" => TokenKind::Guard,
        "for" => TokenKind::For,
        "in" => TokenKind::In,
        "where" => TokenKind::Where,
        "return" => TokenKind::Return,
        "break" => TokenKind::Break,
        "continue" => TokenKind::Continue,
        "import" => TokenKind::Import,
        "struct" => TokenKind::Struct,
        "enum" => TokenKind::Enum,
        "case" => TokenKind::Case,
        "extension" => TokenKind::Extension,
        "public" => TokenKind::Public,
        "private" => TokenKind::Private,
        "internal" => TokenKind::Internal,
        "static" => TokenKind::Static,
        "override" => TokenKind::Override,
        "true" => TokenKind::True,
        "false" => TokenKind::False,
        "nil" => TokenKind::Nil,
        _ => TokenKind::Identifier,
    }
}

#[cfg(test)]
mod tests {
    use vesper_syntax::{TokenKind, TriviaPiece};

    use super::lex;

    #[test]
    fn keywords_and_identifiers() {
        let tokens = lex("let letter = lettuce").unwrap();
        let kinds: Vec<_> = tokens.iter().map(|t| t.kind).collect();
        assert_eq!(
            kinds,
            [
                TokenKind::Let,
                TokenKind::Identifier,
                TokenKind::Equal,
                TokenKind::Identifier,
                TokenKind::Eof
            ]
        );
    }

    #[test]
    fn trailing_trivia_stops_at_newline() {
        let tokens = lex("let x = 1 // one\nlet y = 2").unwrap();
        let one = &tokens[3];
        assert_eq!(one.text, "1");
        assert_eq!(
            one.trailing,
            [
                TriviaPiece::Spaces(1),
                TriviaPiece::LineComment("// one".to_string())
            ]
        );
        let second_let = &tokens[4];
        assert_eq!(second_let.leading, [TriviaPiece::Newlines(1)]);
    }

    #[test]
    fn doc_comments_are_distinguished() {
        let tokens = lex("/// doc\n// plain\n//// not doc\nlet x = 1").unwrap();
        let leading = &tokens[0].leading;
        assert!(matches!(leading[0], TriviaPiece::DocLineComment(_)));
        assert!(matches!(leading[2], TriviaPiece::LineComment(_)));
        assert!(matches!(leading[4], TriviaPiece::LineComment(_)));
    }

    #[test]
    fn block_comments_nest() {
        let tokens = lex("/* a /* b */ c */ let x = 1").unwrap();
        assert_eq!(
            tokens[0].leading[0],
            TriviaPiece::BlockComment("/* a /* b */ c */".to_string())
        );
    }

    #[test]
    fn blank_lines_become_newline_runs() {
        let tokens = lex("let x = 1\n\n\nlet y = 2").unwrap();
        assert_eq!(tokens[4].leading, [TriviaPiece::Newlines(3)]);
    }

    #[test]
    fn crlf_runs() {
        let tokens = lex("let x = 1\r\n\r\nlet y = 2").unwrap();
        assert_eq!(tokens[4].leading, [TriviaPiece::CarriageReturnLineFeeds(2)]);
    }

    #[test]
    fn operators() {
        let tokens = lex("a -> b >= c != d && e").unwrap();
        let kinds: Vec<_> = tokens.iter().map(|t| t.kind).collect();
        assert_eq!(
            kinds,
            [
                TokenKind::Identifier,
                TokenKind::Arrow,
                TokenKind::Identifier,
                TokenKind::GreaterEqual,
                TokenKind::Identifier,
                TokenKind::NotEqual,
                TokenKind::Identifier,
                TokenKind::AmpAmp,
                TokenKind::Identifier,
                TokenKind::Eof
            ]
        );
    }

    #[test]
    fn unterminated_string() {
        let error = lex("let s = \"oops\nlet t = 1").unwrap_err();
        assert_eq!(error.message, "unterminated string literal");
        assert_eq!(error.offset, 8);
    }

    #[test]
    fn eof_owns_final_trivia() {
        let tokens = lex("let x = 1\n// done\n").unwrap();
        let eof = tokens.last().unwrap();
        assert_eq!(eof.kind, TokenKind::Eof);
        assert_eq!(
            eof.leading,
            [
                TriviaPiece::Newlines(1),
                TriviaPiece::LineComment("// done".to_string()),
                TriviaPiece::Newlines(1)
            ]
        );
    }
}
