use rustc_hash::FxHashMap;

use vesper_syntax::{
    CommentKind, SyntaxKind, SyntaxNode, Token, TokenKind, TriviaPiece,
};

use crate::options::FormatOptions;
use crate::tokens::{FormatToken, GroupKind};
use crate::FormatError;

/// Translate a syntax tree into the printer's token stream.
///
/// The tree is walked twice. The first walk registers directives to emit
/// before and after individual tokens, keyed by token identity; the second
/// walk runs over the terminal tokens in source order and interleaves the
/// registered directives with translated trivia.
pub fn build_token_stream(
    root: &SyntaxNode,
    options: &FormatOptions,
) -> Result<Vec<FormatToken>, FormatError> {
    let mut builder = TokenStreamBuilder {
        options,
        before: FxHashMap::default(),
        after: FxHashMap::default(),
        stream: Vec::new(),
        depth: 0,
    };
    builder.visit(root);

    let mut first = true;
    for token in root.tokens() {
        builder.emit_token(token, first)?;
        first = false;
    }
    if builder.depth != 0 {
        return Err(FormatError::UnbalancedGroups);
    }
    Ok(builder.stream)
}

struct TokenStreamBuilder<'a> {
    options: &'a FormatOptions,
    before: FxHashMap<u32, Vec<FormatToken>>,
    after: FxHashMap<u32, Vec<FormatToken>>,
    stream: Vec<FormatToken>,
    /// Count of unmatched `open`s, checked against every `close`.
    depth: u32,
}

impl TokenStreamBuilder<'_> {
    fn indent(&self) -> u16 {
        self.options.indent_width()
    }

    /// Register directives to emit immediately before `token`.
    ///
    /// Registrations append: a parent node's directives come before its
    /// children's, which nests `open`s correctly on a shared token.
    fn before(&mut self, token: &Token, directives: impl IntoIterator<Item = FormatToken>) {
        self.before
            .entry(token.index.get())
            .or_default()
            .extend(directives);
    }

    /// Register directives to emit immediately after `token`.
    ///
    /// Registrations prepend: a child node's directives come before its
    /// parent's, which nests `close`s correctly on a shared token.
    fn after(&mut self, token: &Token, directives: impl IntoIterator<Item = FormatToken>) {
        let slot = self.after.entry(token.index.get()).or_default();
        let mut group: Vec<FormatToken> = directives.into_iter().collect();
        group.append(slot);
        *slot = group;
    }

    fn open(kind: GroupKind, indent: u16) -> FormatToken {
        FormatToken::Open { kind, indent }
    }

    /// Wrap a whole node in a group.
    fn group(&mut self, node: &SyntaxNode, kind: GroupKind, indent: u16) {
        let (Some(first), Some(last)) = (node.first_token(), node.last_token()) else {
            return;
        };
        self.before(first, [Self::open(kind, indent)]);
        self.after(last, [FormatToken::Close]);
    }

    // === First walk: directive registration ==============================

    fn visit(&mut self, node: &SyntaxNode) {
        self.register(node);
        for child in node.child_nodes() {
            self.visit(child);
        }
    }

    fn register(&mut self, node: &SyntaxNode) {
        match node.kind() {
            SyntaxKind::SourceFile => self.register_statements(node),
            SyntaxKind::CodeBlock | SyntaxKind::MemberBlock => self.register_block(node),
            SyntaxKind::ClosureExpr => self.register_closure(node),

            SyntaxKind::ImportDecl => {
                if let Some(keyword) = node.first_token_of_kind(TokenKind::Import) {
                    self.after(keyword, [FormatToken::Break(1)]);
                }
            }
            SyntaxKind::VariableDecl => self.register_variable_decl(node),
            SyntaxKind::FunctionDecl => self.register_braced_decl(node, TokenKind::Func),
            SyntaxKind::StructDecl => self.register_braced_decl(node, TokenKind::Struct),
            SyntaxKind::EnumDecl => self.register_braced_decl(node, TokenKind::Enum),
            SyntaxKind::ExtensionDecl => self.register_braced_decl(node, TokenKind::Extension),
            SyntaxKind::EnumCaseDecl => {
                self.group(node, GroupKind::Inconsistent, self.indent());
                if let Some(keyword) = node.first_token_of_kind(TokenKind::Case) {
                    self.after(keyword, [FormatToken::Break(1)]);
                }
            }
            SyntaxKind::Attribute | SyntaxKind::DeclModifier => {
                if let Some(last) = node.last_token() {
                    self.after(last, [FormatToken::Break(1)]);
                }
            }
            SyntaxKind::Initializer => {
                if let Some(equal) = node.first_token_of_kind(TokenKind::Equal) {
                    self.before(equal, [FormatToken::Break(1)]);
                    self.after(equal, [FormatToken::Break(1)]);
                }
            }
            SyntaxKind::TypeAnnotation => {
                if let Some(colon) = node.first_token_of_kind(TokenKind::Colon) {
                    self.after(colon, [FormatToken::Break(1)]);
                }
            }
            SyntaxKind::ReturnClause | SyntaxKind::FunctionType => {
                if let Some(arrow) = node.first_token_of_kind(TokenKind::Arrow) {
                    self.before(arrow, [FormatToken::Break(1)]);
                    self.after(arrow, [FormatToken::Break(1)]);
                }
            }
            SyntaxKind::GenericWhereClause | SyntaxKind::WhereClause => {
                if let Some(keyword) = node.first_token_of_kind(TokenKind::Where) {
                    self.before(keyword, [FormatToken::Break(1)]);
                    self.after(keyword, [FormatToken::Break(1)]);
                }
            }
            SyntaxKind::Parameter => {
                self.register_list_element(node);
                let mut identifiers = node
                    .child_tokens()
                    .filter(|token| token.kind == TokenKind::Identifier);
                if let (Some(label), Some(_name)) = (identifiers.next(), identifiers.next()) {
                    self.after(label, [FormatToken::Break(1)]);
                }
            }
            SyntaxKind::GenericParameter | SyntaxKind::ListElement => {
                self.register_list_element(node);
            }
            SyntaxKind::ParameterClause => {
                self.register_delimited(node, TokenKind::LeftParen, TokenKind::RightParen, None);
            }
            SyntaxKind::GenericParameterClause | SyntaxKind::GenericArgumentClause => {
                self.register_delimited(node, TokenKind::Less, TokenKind::Greater, None);
            }
            SyntaxKind::TupleType => {
                self.register_delimited(node, TokenKind::LeftParen, TokenKind::RightParen, None);
            }

            SyntaxKind::IfStmt => self.register_if_stmt(node),
            SyntaxKind::GuardStmt => self.register_guard_stmt(node),
            SyntaxKind::ForInStmt => self.register_for_in_stmt(node),
            SyntaxKind::ReturnStmt => {
                self.group(node, GroupKind::Inconsistent, self.indent());
                if node.child_nodes().next().is_some() {
                    if let Some(keyword) = node.first_token_of_kind(TokenKind::Return) {
                        self.after(keyword, [FormatToken::Break(1)]);
                    }
                }
            }
            SyntaxKind::BreakStmt | SyntaxKind::ContinueStmt => {}

            SyntaxKind::CallExpr => {
                // The space before a trailing closure never forces a wrap;
                // whether the closure is multiline is the closure's business.
                if let Some(closure) = node.first_child_of_kind(SyntaxKind::ClosureExpr) {
                    if let Some(open_brace) = closure.first_token() {
                        self.before(open_brace, [FormatToken::Break(1)]);
                    }
                }
            }
            SyntaxKind::ArgumentClause => {
                // A consistent group around the clause makes both delimiter
                // breaks fire together once the arguments wrap, putting the
                // closing parenthesis on its own line.
                if node.child_nodes().next().is_some() {
                    self.group(node, GroupKind::Consistent, 0);
                }
                let kind = if self.options.line_break_before_each_argument {
                    GroupKind::Consistent
                } else {
                    GroupKind::Inconsistent
                };
                self.register_delimited(
                    node,
                    TokenKind::LeftParen,
                    TokenKind::RightParen,
                    Some(kind),
                );
            }
            // The break after an argument label's colon comes from the
            // list-element registration, which spaces direct child colons.
            SyntaxKind::Argument => self.register_list_element(node),
            SyntaxKind::TupleExpr => {
                self.group(node, GroupKind::Consistent, 0);
                self.register_delimited(node, TokenKind::LeftParen, TokenKind::RightParen, None);
            }
            SyntaxKind::ArrayExpr => {
                self.group(node, GroupKind::Consistent, 0);
                self.register_delimited(node, TokenKind::LeftSquare, TokenKind::RightSquare, None);
            }
            SyntaxKind::BinaryExpr => {
                if let Some(operator) = node
                    .child_tokens()
                    .find(|token| token.kind.is_binary_operator() || token.kind == TokenKind::Equal)
                {
                    self.before(operator, [FormatToken::Break(1)]);
                    self.after(operator, [FormatToken::Break(1)]);
                }
            }
            SyntaxKind::MemberExpr => {
                if let Some(dot) = node.first_token_of_kind(TokenKind::Dot) {
                    self.before(dot, [FormatToken::Break(0)]);
                }
            }
            SyntaxKind::DictionaryType => {
                if let Some(colon) = node.first_token_of_kind(TokenKind::Colon) {
                    self.after(colon, [FormatToken::Break(1)]);
                }
            }

            SyntaxKind::IdentifierExpr
            | SyntaxKind::LiteralExpr
            | SyntaxKind::PrefixExpr
            | SyntaxKind::ClosureSignature
            | SyntaxKind::NamedType
            | SyntaxKind::MemberType
            | SyntaxKind::OptionalType
            | SyntaxKind::ArrayType => {}
        }
    }

    /// A mandatory newline after every statement or member of `node`.
    fn register_statements(&mut self, node: &SyntaxNode) {
        for child in node.child_nodes() {
            if let Some(last) = child.last_token() {
                self.after(last, [FormatToken::Newline]);
            }
        }
    }

    fn register_block(&mut self, node: &SyntaxNode) {
        let open_brace = node.first_token_of_kind(TokenKind::LeftBrace);
        let close_brace = node
            .child_tokens()
            .rfind(|token| token.kind == TokenKind::RightBrace);
        let (Some(open_brace), Some(close_brace)) = (open_brace, close_brace) else {
            return;
        };
        // Empty blocks print as `{}`.
        if node.child_nodes().next().is_none() {
            return;
        }
        self.after(
            open_brace,
            [
                Self::open(GroupKind::Consistent, self.indent()),
                FormatToken::Newline,
            ],
        );
        self.before(close_brace, [FormatToken::Close]);
        self.register_statements(node);
    }

    /// Closures stay on one line while they hold at most one statement;
    /// larger bodies get the block treatment.
    fn register_closure(&mut self, node: &SyntaxNode) {
        let open_brace = node.first_token_of_kind(TokenKind::LeftBrace);
        let close_brace = node
            .child_tokens()
            .rfind(|token| token.kind == TokenKind::RightBrace);
        let (Some(open_brace), Some(close_brace)) = (open_brace, close_brace) else {
            return;
        };

        let signature = node.first_child_of_kind(SyntaxKind::ClosureSignature);
        if let Some(signature) = signature {
            for comma in signature
                .child_tokens()
                .filter(|token| token.kind == TokenKind::Comma)
            {
                self.after(comma, [FormatToken::Break(1)]);
            }
            if let Some(keyword) = signature.first_token_of_kind(TokenKind::In) {
                self.before(keyword, [FormatToken::Break(1)]);
            }
        }

        let statements = node
            .child_nodes()
            .filter(|child| child.kind() != SyntaxKind::ClosureSignature)
            .count();
        if statements == 0 && signature.is_none() {
            return;
        }

        if statements > 1 {
            // The signature stays on the opening line: `xs.map { x in`.
            match signature {
                Some(signature) => {
                    self.after(open_brace, [FormatToken::Break(1)]);
                    if let Some(keyword) = signature.first_token_of_kind(TokenKind::In) {
                        self.after(
                            keyword,
                            [
                                Self::open(GroupKind::Consistent, self.indent()),
                                FormatToken::Newline,
                            ],
                        );
                    }
                }
                None => {
                    self.after(
                        open_brace,
                        [
                            Self::open(GroupKind::Consistent, self.indent()),
                            FormatToken::Newline,
                        ],
                    );
                }
            }
            for child in node.child_nodes() {
                if child.kind() == SyntaxKind::ClosureSignature {
                    continue;
                }
                if let Some(last) = child.last_token() {
                    self.after(last, [FormatToken::Newline]);
                }
            }
            self.before(close_brace, [FormatToken::Close]);
        } else {
            self.after(
                open_brace,
                [
                    Self::open(GroupKind::Consistent, self.indent()),
                    FormatToken::Break(1),
                ],
            );
            if let Some(signature) = signature {
                if let Some(keyword) = signature.first_token_of_kind(TokenKind::In) {
                    self.after(keyword, [FormatToken::Break(1)]);
                }
            }
            // The break sits inside the group: if the closure wraps, the
            // brace drops to its own line at the enclosing indentation.
            self.before(close_brace, [FormatToken::Break(1), FormatToken::Close]);
        }
    }

    fn register_variable_decl(&mut self, node: &SyntaxNode) {
        self.group(node, GroupKind::Inconsistent, self.indent());
        if let Some(keyword) = node
            .child_tokens()
            .find(|token| matches!(token.kind, TokenKind::Let | TokenKind::Var))
        {
            self.after(keyword, [FormatToken::Break(1)]);
        }
    }

    /// Declarations of the shape `keyword name ... { body }`: an
    /// inconsistent group around the header that closes just before the
    /// brace, so the body never affects the header's fit.
    fn register_braced_decl(&mut self, node: &SyntaxNode, keyword: TokenKind) {
        if let Some(first) = node.first_token() {
            self.before(first, [Self::open(GroupKind::Inconsistent, self.indent())]);
        }
        if let Some(keyword) = node.first_token_of_kind(keyword) {
            self.after(keyword, [FormatToken::Break(1)]);
        }
        let body = node.child_nodes().find(|child| {
            matches!(child.kind(), SyntaxKind::CodeBlock | SyntaxKind::MemberBlock)
        });
        if let Some(open_brace) = body.and_then(|body| body.first_token()) {
            self.before(open_brace, [FormatToken::Break(1), FormatToken::Close]);
        }
    }

    fn register_if_stmt(&mut self, node: &SyntaxNode) {
        if let Some(keyword) = node.first_token_of_kind(TokenKind::If) {
            self.before(keyword, [Self::open(GroupKind::Inconsistent, 3)]);
            self.after(keyword, [FormatToken::Break(1)]);
        }
        if let Some(then_block) = node.first_child_of_kind(SyntaxKind::CodeBlock) {
            if let Some(open_brace) = then_block.first_token() {
                self.before(open_brace, [FormatToken::Break(1), FormatToken::Close]);
            }
        }
        if let Some(else_keyword) = node.first_token_of_kind(TokenKind::Else) {
            self.before(else_keyword, [FormatToken::Break(1)]);
            self.after(else_keyword, [FormatToken::Break(1)]);
        }
    }

    fn register_guard_stmt(&mut self, node: &SyntaxNode) {
        if let Some(keyword) = node.first_token_of_kind(TokenKind::Guard) {
            self.before(keyword, [Self::open(GroupKind::Inconsistent, self.indent())]);
            self.after(keyword, [FormatToken::Break(1)]);
        }
        if let Some(else_keyword) = node.first_token_of_kind(TokenKind::Else) {
            self.before(else_keyword, [FormatToken::Break(1)]);
            self.after(else_keyword, [FormatToken::Break(1), FormatToken::Close]);
        }
    }

    fn register_for_in_stmt(&mut self, node: &SyntaxNode) {
        if let Some(keyword) = node.first_token_of_kind(TokenKind::For) {
            self.before(keyword, [Self::open(GroupKind::Inconsistent, self.indent())]);
            self.after(keyword, [FormatToken::Break(1)]);
        }
        if let Some(keyword) = node.first_token_of_kind(TokenKind::In) {
            self.before(keyword, [FormatToken::Break(1)]);
            self.after(keyword, [FormatToken::Break(1)]);
        }
        if let Some(body) = node.first_child_of_kind(SyntaxKind::CodeBlock) {
            if let Some(open_brace) = body.first_token() {
                self.before(open_brace, [FormatToken::Break(1), FormatToken::Close]);
            }
        }
    }

    /// The tuple-like delimited list shape: a zero-width break after the
    /// left delimiter, a group around the elements, and a symmetric break
    /// before the right delimiter. Empty lists print tight.
    fn register_delimited(
        &mut self,
        node: &SyntaxNode,
        left: TokenKind,
        right: TokenKind,
        kind: Option<GroupKind>,
    ) {
        if node.child_nodes().next().is_none() {
            return;
        }
        let open_delimiter = node.first_token_of_kind(left);
        let close_delimiter = node.child_tokens().rfind(|token| token.kind == right);
        let (Some(open_delimiter), Some(close_delimiter)) = (open_delimiter, close_delimiter)
        else {
            return;
        };
        self.after(
            open_delimiter,
            [
                FormatToken::Break(0),
                Self::open(kind.unwrap_or(GroupKind::Consistent), self.indent()),
            ],
        );
        self.before(close_delimiter, [FormatToken::Close, FormatToken::Break(0)]);
    }

    /// One element of a comma-separated list: its own group, so that the
    /// breaks inside one element (around a label's colon, say) decide
    /// separately from the list's all-or-nothing breaks. The separating
    /// break is emitted outside the group, after the trailing comma, and
    /// the group adds no indentation: an element's continuation lines
    /// align with the element itself.
    fn register_list_element(&mut self, node: &SyntaxNode) {
        let (Some(first), Some(last)) = (node.first_token(), node.last_token()) else {
            return;
        };
        self.before(first, [Self::open(GroupKind::Inconsistent, 0)]);
        if last.kind == TokenKind::Comma {
            self.after(last, [FormatToken::Close, FormatToken::Break(1)]);
        } else {
            self.after(last, [FormatToken::Close]);
        }
        // `==` requirements in generic where clauses space both sides; the
        // colon of a conformance requirement is handled like an annotation.
        for token in node.child_tokens() {
            match token.kind {
                TokenKind::EqualEqual => {
                    self.before(token, [FormatToken::Break(1)]);
                    self.after(token, [FormatToken::Break(1)]);
                }
                TokenKind::Colon => {
                    self.after(token, [FormatToken::Break(1)]);
                }
                _ => {}
            }
        }
    }

    // === Second walk: token emission =====================================

    fn emit_token(&mut self, token: &Token, is_first: bool) -> Result<(), FormatError> {
        self.translate_trivia(&token.leading, is_first);
        if let Some(directives) = self.before.remove(&token.index.get()) {
            for directive in directives {
                self.append(directive)?;
            }
        }
        if token.kind != TokenKind::Eof {
            self.append(FormatToken::Syntax(token.text.clone()))?;
        }
        self.translate_trailing_trivia(&token.trailing)?;
        if let Some(directives) = self.after.remove(&token.index.get()) {
            for directive in directives {
                self.append(directive)?;
            }
        }
        Ok(())
    }

    /// Translate leading trivia into comment and blank-line directives.
    ///
    /// Single line breaks are structural (the directives recreate them);
    /// runs of `n > 1` keep `n - 1` blank lines, capped by the
    /// configuration. One break is absorbed as the terminator of whatever
    /// came before.
    fn translate_trivia(&mut self, pieces: &[TriviaPiece], is_first_token: bool) {
        let mut index = 0;
        while index < pieces.len() {
            let piece = &pieces[index];
            match piece {
                TriviaPiece::LineComment(text) | TriviaPiece::DocLineComment(text) => {
                    let kind = piece.comment_kind().unwrap_or(CommentKind::Line);
                    self.append_comment(kind, text.clone(), false);
                    // A doc line directly above another doc line keeps its
                    // break suppressed so the two merge into one comment.
                    let merges_with_next = kind == CommentKind::DocLine
                        && pieces.get(index + 1).is_some_and(|next| {
                            next.is_newline() && next.newline_count() == 1
                        })
                        && pieces
                            .get(index + 2)
                            .is_some_and(|next| next.comment_kind() == Some(kind));
                    if merges_with_next {
                        index += 1;
                    } else {
                        self.append_or_ignore(FormatToken::Newline);
                    }
                }
                TriviaPiece::BlockComment(text) | TriviaPiece::DocBlockComment(text) => {
                    let kind = piece.comment_kind().unwrap_or(CommentKind::Block);
                    let next = pieces.get(index + 1);
                    let trailing_space = next.is_some_and(TriviaPiece::is_spaces_or_tabs);
                    self.append_comment(kind, text.clone(), trailing_space);
                    if next.is_some_and(TriviaPiece::is_newline) {
                        self.append_or_ignore(FormatToken::Newline);
                    }
                }
                piece if piece.is_newline() => {
                    let mut total = 0u32;
                    while let Some(run) = pieces.get(index) {
                        if !run.is_newline() {
                            break;
                        }
                        total += run.newline_count();
                        index += 1;
                    }
                    index -= 1;
                    if total > 1
                        && self.options.respects_existing_line_breaks
                        && !(is_first_token && self.stream.is_empty())
                    {
                        let blank_lines = (total - 1).min(self.options.maximum_blank_lines);
                        if blank_lines > 0 {
                            self.append_or_ignore(FormatToken::Newlines(
                                u16::try_from(blank_lines).unwrap_or(u16::MAX),
                            ));
                        }
                    }
                }
                // Spaces and tabs in isolation are structural whitespace
                // and are regenerated by the printer.
                _ => {}
            }
            index += 1;
        }
    }

    /// Trailing trivia holds at most spaces and comments; a comment gets a
    /// single space of separation from its token.
    fn translate_trailing_trivia(&mut self, pieces: &[TriviaPiece]) -> Result<(), FormatError> {
        for (index, piece) in pieces.iter().enumerate() {
            match piece {
                TriviaPiece::LineComment(text) | TriviaPiece::DocLineComment(text) => {
                    let kind = piece.comment_kind().unwrap_or(CommentKind::Line);
                    self.append(FormatToken::Break(1))?;
                    self.append_comment(kind, text.clone(), false);
                    self.append_or_ignore(FormatToken::Newline);
                }
                TriviaPiece::BlockComment(text) | TriviaPiece::DocBlockComment(text) => {
                    let kind = piece.comment_kind().unwrap_or(CommentKind::Block);
                    let trailing_space = pieces
                        .get(index + 1)
                        .is_some_and(TriviaPiece::is_spaces_or_tabs);
                    self.append(FormatToken::Break(1))?;
                    self.append_comment(kind, text.clone(), trailing_space);
                }
                _ => {}
            }
        }
        Ok(())
    }

    /// Append a comment, merging adjacent doc-line comments into one token
    /// so the printer never splits them.
    fn append_comment(&mut self, kind: CommentKind, text: String, trailing_space: bool) {
        if kind == CommentKind::DocLine {
            if let Some(FormatToken::Comment {
                kind: CommentKind::DocLine,
                text: previous,
                ..
            }) = self.stream.last_mut()
            {
                previous.push('\n');
                previous.push_str(&text);
                return;
            }
        }
        self.stream.push(FormatToken::Comment {
            kind,
            text,
            trailing_space,
        });
    }

    fn append(&mut self, token: FormatToken) -> Result<(), FormatError> {
        match &token {
            FormatToken::Open { .. } => self.depth += 1,
            FormatToken::Close => {
                if self.depth == 0 {
                    return Err(FormatError::UnbalancedGroups);
                }
                self.depth -= 1;
            }
            FormatToken::Newline => {
                // Two structural newlines in a row collapse; intentional
                // blank lines always travel as `Newlines`.
                if matches!(self.stream.last(), Some(FormatToken::Newline)) {
                    return Ok(());
                }
            }
            _ => {}
        }
        self.stream.push(token);
        Ok(())
    }

    /// Append a directive that is never mismatched (no open/close).
    fn append_or_ignore(&mut self, token: FormatToken) {
        let _ = self.append(token);
    }
}

#[cfg(test)]
mod tests {
    use vesper_parser::parse;

    use super::build_token_stream;
    use crate::options::FormatOptions;
    use crate::tokens::{FormatToken, GroupKind};

    fn stream_of(source: &str) -> Vec<FormatToken> {
        let parsed = parse(source).unwrap();
        build_token_stream(&parsed.root, &FormatOptions::default()).unwrap()
    }

    #[test]
    fn groups_balance() {
        let stream = stream_of("public func f(a: Int, b: Int) -> Int { return a + b }");
        let mut depth = 0i64;
        for token in &stream {
            match token {
                FormatToken::Open { .. } => depth += 1,
                FormatToken::Close => {
                    depth -= 1;
                    assert!(depth >= 0);
                }
                _ => {}
            }
        }
        assert_eq!(depth, 0);
    }

    #[test]
    fn variable_decl_stream_shape() {
        let stream = stream_of("let x = 1");
        assert_eq!(
            stream,
            vec![
                FormatToken::Open {
                    kind: GroupKind::Inconsistent,
                    indent: 2
                },
                FormatToken::Syntax("let".to_string()),
                FormatToken::Break(1),
                FormatToken::Syntax("x".to_string()),
                FormatToken::Break(1),
                FormatToken::Syntax("=".to_string()),
                FormatToken::Break(1),
                FormatToken::Syntax("1".to_string()),
                FormatToken::Close,
                FormatToken::Newline,
            ]
        );
    }

    #[test]
    fn adjacent_doc_lines_merge() {
        let stream = stream_of("/// A.\n/// B.\nlet x = 1");
        let comments: Vec<_> = stream
            .iter()
            .filter_map(|token| match token {
                FormatToken::Comment { text, .. } => Some(text.as_str()),
                _ => None,
            })
            .collect();
        assert_eq!(comments, ["/// A.\n/// B."]);
    }

    #[test]
    fn doc_lines_split_by_blank_line_stay_separate() {
        let stream = stream_of("/// A.\n\n/// B.\nlet x = 1");
        let comments = stream
            .iter()
            .filter(|token| matches!(token, FormatToken::Comment { .. }))
            .count();
        assert_eq!(comments, 2);
    }

    #[test]
    fn blank_lines_are_capped() {
        let stream = stream_of("let x = 1\n\n\n\nlet y = 2");
        assert!(stream.contains(&FormatToken::Newlines(1)));
        assert!(!stream.contains(&FormatToken::Newlines(2)));
        assert!(!stream.contains(&FormatToken::Newlines(3)));
    }

    #[test]
    fn leading_blank_lines_are_dropped() {
        let stream = stream_of("\n\n\nlet x = 1");
        assert!(!stream
            .iter()
            .any(|token| matches!(token, FormatToken::Newlines(_))));
    }

    #[test]
    fn empty_blocks_stay_tight() {
        let stream = stream_of("public func f() {}");
        assert!(!stream.contains(&FormatToken::Newline) || stream.last() == Some(&FormatToken::Newline));
        let syntax: Vec<_> = stream
            .iter()
            .filter_map(|token| match token {
                FormatToken::Syntax(text) => Some(text.as_str()),
                _ => None,
            })
            .collect();
        assert_eq!(syntax, ["public", "func", "f", "(", ")", "{", "}"]);
    }
}
