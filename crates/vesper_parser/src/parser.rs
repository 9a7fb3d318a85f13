use vesper_syntax::{SyntaxElement, SyntaxKind, SyntaxNode, Token, TokenKind};

use crate::ParseError;

/// Recursive-descent parser over the lexed token stream.
pub(crate) struct Parser {
    tokens: Vec<Token>,
    pos: usize,
    /// Whether a `{` after an expression may be parsed as a trailing
    /// closure. Cleared in condition and sequence position, where the brace
    /// has to be the statement body; restored inside any bracketed context.
    closures_allowed: bool,
}

impl Parser {
    pub(crate) fn new(tokens: Vec<Token>) -> Self {
        Self {
            tokens,
            pos: 0,
            closures_allowed: true,
        }
    }

    fn peek(&self) -> TokenKind {
        self.tokens[self.pos].kind
    }

    fn nth(&self, n: usize) -> TokenKind {
        self.tokens
            .get(self.pos + n)
            .map_or(TokenKind::Eof, |token| token.kind)
    }

    fn at(&self, kind: TokenKind) -> bool {
        self.peek() == kind
    }

    fn current_offset(&self) -> u32 {
        self.tokens[self.pos].offset
    }

    fn bump(&mut self) -> Token {
        let token = self.tokens[self.pos].clone();
        if self.pos + 1 < self.tokens.len() {
            self.pos += 1;
        }
        token
    }

    fn expect(&mut self, kind: TokenKind) -> Result<Token, ParseError> {
        if self.at(kind) {
            Ok(self.bump())
        } else {
            let found = &self.tokens[self.pos];
            let expected = kind
                .fixed_text()
                .map_or_else(|| format!("{kind:?}"), |text| format!("`{text}`"));
            let found_text = if found.kind == TokenKind::Eof {
                "end of file".to_string()
            } else {
                format!("`{}`", found.text)
            };
            Err(ParseError::new(
                format!("expected {expected}, found {found_text}"),
                found.offset,
            ))
        }
    }

    fn error(&self, message: impl Into<String>) -> ParseError {
        ParseError::new(message, self.current_offset())
    }

    pub(crate) fn parse_source_file(mut self) -> Result<SyntaxNode, ParseError> {
        let mut children = Vec::new();
        while !self.at(TokenKind::Eof) {
            children.push(SyntaxElement::Node(self.parse_item()?));
        }
        children.push(SyntaxElement::Token(self.bump()));
        Ok(SyntaxNode::new(SyntaxKind::SourceFile, children))
    }

    // === Declarations =====================================================

    fn at_decl_start(&self) -> bool {
        match self.peek() {
            TokenKind::At
            | TokenKind::Let
            | TokenKind::Var
            | TokenKind::Func
            | TokenKind::Struct
            | TokenKind::Enum
            | TokenKind::Case
            | TokenKind::Extension
            | TokenKind::Import => true,
            kind if kind.is_modifier() => true,
            _ => false,
        }
    }

    fn parse_item(&mut self) -> Result<SyntaxNode, ParseError> {
        if self.at_decl_start() {
            self.parse_decl()
        } else {
            self.parse_stmt()
        }
    }

    fn parse_decl(&mut self) -> Result<SyntaxNode, ParseError> {
        let mut prefix = Vec::new();
        while self.at(TokenKind::At) {
            let at = self.bump();
            let name = self.expect(TokenKind::Identifier)?;
            prefix.push(SyntaxElement::Node(SyntaxNode::new(
                SyntaxKind::Attribute,
                vec![SyntaxElement::Token(at), SyntaxElement::Token(name)],
            )));
        }
        while self.peek().is_modifier() {
            let modifier = self.bump();
            prefix.push(SyntaxElement::Node(SyntaxNode::new(
                SyntaxKind::DeclModifier,
                vec![SyntaxElement::Token(modifier)],
            )));
        }

        match self.peek() {
            TokenKind::Let | TokenKind::Var => self.parse_variable_decl(prefix),
            TokenKind::Func => self.parse_function_decl(prefix),
            TokenKind::Struct | TokenKind::Enum => self.parse_nominal_decl(prefix),
            TokenKind::Extension => self.parse_extension_decl(prefix),
            TokenKind::Case => self.parse_enum_case_decl(prefix),
            TokenKind::Import => self.parse_import_decl(prefix),
            _ => Err(self.error("expected a declaration")),
        }
    }

    fn parse_variable_decl(
        &mut self,
        mut children: Vec<SyntaxElement>,
    ) -> Result<SyntaxNode, ParseError> {
        children.push(SyntaxElement::Token(self.bump()));
        children.push(SyntaxElement::Token(self.expect(TokenKind::Identifier)?));
        if self.at(TokenKind::Colon) {
            children.push(SyntaxElement::Node(self.parse_type_annotation()?));
        }
        if self.at(TokenKind::Equal) {
            let equal = self.bump();
            let value = self.parse_expr()?;
            children.push(SyntaxElement::Node(SyntaxNode::new(
                SyntaxKind::Initializer,
                vec![SyntaxElement::Token(equal), SyntaxElement::Node(value)],
            )));
        }
        Ok(SyntaxNode::new(SyntaxKind::VariableDecl, children))
    }

    fn parse_function_decl(
        &mut self,
        mut children: Vec<SyntaxElement>,
    ) -> Result<SyntaxNode, ParseError> {
        children.push(SyntaxElement::Token(self.expect(TokenKind::Func)?));
        children.push(SyntaxElement::Token(self.expect(TokenKind::Identifier)?));
        if self.at(TokenKind::Less) {
            children.push(SyntaxElement::Node(self.parse_generic_parameter_clause()?));
        }
        children.push(SyntaxElement::Node(self.parse_parameter_clause()?));
        if self.at(TokenKind::Arrow) {
            let arrow = self.bump();
            let result = self.parse_type()?;
            children.push(SyntaxElement::Node(SyntaxNode::new(
                SyntaxKind::ReturnClause,
                vec![SyntaxElement::Token(arrow), SyntaxElement::Node(result)],
            )));
        }
        if self.at(TokenKind::Where) {
            children.push(SyntaxElement::Node(self.parse_generic_where_clause()?));
        }
        children.push(SyntaxElement::Node(self.parse_code_block()?));
        Ok(SyntaxNode::new(SyntaxKind::FunctionDecl, children))
    }

    fn parse_nominal_decl(
        &mut self,
        mut children: Vec<SyntaxElement>,
    ) -> Result<SyntaxNode, ParseError> {
        let keyword = self.bump();
        let kind = if keyword.kind == TokenKind::Struct {
            SyntaxKind::StructDecl
        } else {
            SyntaxKind::EnumDecl
        };
        children.push(SyntaxElement::Token(keyword));
        children.push(SyntaxElement::Token(self.expect(TokenKind::Identifier)?));
        if self.at(TokenKind::Less) {
            children.push(SyntaxElement::Node(self.parse_generic_parameter_clause()?));
        }
        children.push(SyntaxElement::Node(self.parse_member_block()?));
        Ok(SyntaxNode::new(kind, children))
    }

    fn parse_extension_decl(
        &mut self,
        mut children: Vec<SyntaxElement>,
    ) -> Result<SyntaxNode, ParseError> {
        children.push(SyntaxElement::Token(self.expect(TokenKind::Extension)?));
        children.push(SyntaxElement::Node(self.parse_type()?));
        children.push(SyntaxElement::Node(self.parse_member_block()?));
        Ok(SyntaxNode::new(SyntaxKind::ExtensionDecl, children))
    }

    fn parse_enum_case_decl(
        &mut self,
        mut children: Vec<SyntaxElement>,
    ) -> Result<SyntaxNode, ParseError> {
        children.push(SyntaxElement::Token(self.expect(TokenKind::Case)?));
        children.push(SyntaxElement::Token(self.expect(TokenKind::Identifier)?));
        if self.at(TokenKind::LeftParen) {
            children.push(SyntaxElement::Node(self.parse_tuple_type()?));
        }
        Ok(SyntaxNode::new(SyntaxKind::EnumCaseDecl, children))
    }

    fn parse_import_decl(
        &mut self,
        mut children: Vec<SyntaxElement>,
    ) -> Result<SyntaxNode, ParseError> {
        children.push(SyntaxElement::Token(self.expect(TokenKind::Import)?));
        children.push(SyntaxElement::Token(self.expect(TokenKind::Identifier)?));
        while self.at(TokenKind::Dot) {
            children.push(SyntaxElement::Token(self.bump()));
            children.push(SyntaxElement::Token(self.expect(TokenKind::Identifier)?));
        }
        Ok(SyntaxNode::new(SyntaxKind::ImportDecl, children))
    }

    fn parse_type_annotation(&mut self) -> Result<SyntaxNode, ParseError> {
        let colon = self.expect(TokenKind::Colon)?;
        let ty = self.parse_type()?;
        Ok(SyntaxNode::new(
            SyntaxKind::TypeAnnotation,
            vec![SyntaxElement::Token(colon), SyntaxElement::Node(ty)],
        ))
    }

    fn parse_parameter_clause(&mut self) -> Result<SyntaxNode, ParseError> {
        let mut children = vec![SyntaxElement::Token(self.expect(TokenKind::LeftParen)?)];
        while !self.at(TokenKind::RightParen) {
            let mut parameter = Vec::new();
            parameter.push(SyntaxElement::Token(self.expect(TokenKind::Identifier)?));
            if self.at(TokenKind::Identifier) {
                // The first identifier was an argument label.
                parameter.push(SyntaxElement::Token(self.bump()));
            }
            parameter.push(SyntaxElement::Node(self.parse_type_annotation()?));
            if self.at(TokenKind::Comma) {
                parameter.push(SyntaxElement::Token(self.bump()));
            }
            children.push(SyntaxElement::Node(SyntaxNode::new(
                SyntaxKind::Parameter,
                parameter,
            )));
        }
        children.push(SyntaxElement::Token(self.expect(TokenKind::RightParen)?));
        Ok(SyntaxNode::new(SyntaxKind::ParameterClause, children))
    }

    fn parse_generic_parameter_clause(&mut self) -> Result<SyntaxNode, ParseError> {
        let mut children = vec![SyntaxElement::Token(self.expect(TokenKind::Less)?)];
        while !self.at(TokenKind::Greater) {
            let mut parameter = vec![SyntaxElement::Token(self.expect(TokenKind::Identifier)?)];
            if self.at(TokenKind::Colon) {
                parameter.push(SyntaxElement::Node(self.parse_type_annotation()?));
            }
            if self.at(TokenKind::Comma) {
                parameter.push(SyntaxElement::Token(self.bump()));
            }
            children.push(SyntaxElement::Node(SyntaxNode::new(
                SyntaxKind::GenericParameter,
                parameter,
            )));
        }
        children.push(SyntaxElement::Token(self.expect(TokenKind::Greater)?));
        Ok(SyntaxNode::new(SyntaxKind::GenericParameterClause, children))
    }

    fn parse_generic_where_clause(&mut self) -> Result<SyntaxNode, ParseError> {
        let mut children = vec![SyntaxElement::Token(self.expect(TokenKind::Where)?)];
        loop {
            let mut requirement = vec![SyntaxElement::Node(self.parse_type()?)];
            match self.peek() {
                TokenKind::Colon | TokenKind::EqualEqual => {
                    requirement.push(SyntaxElement::Token(self.bump()));
                    requirement.push(SyntaxElement::Node(self.parse_type()?));
                }
                _ => return Err(self.error("expected `:` or `==` in where clause")),
            }
            let has_comma = self.at(TokenKind::Comma);
            if has_comma {
                requirement.push(SyntaxElement::Token(self.bump()));
            }
            children.push(SyntaxElement::Node(SyntaxNode::new(
                SyntaxKind::ListElement,
                requirement,
            )));
            if !has_comma {
                break;
            }
        }
        Ok(SyntaxNode::new(SyntaxKind::GenericWhereClause, children))
    }

    // === Statements =======================================================

    fn parse_stmt(&mut self) -> Result<SyntaxNode, ParseError> {
        match self.peek() {
            TokenKind::If => self.parse_if_stmt(),
            TokenKind::Guard => self.parse_guard_stmt(),
            TokenKind::For => self.parse_for_in_stmt(),
            TokenKind::Return => self.parse_return_stmt(),
            TokenKind::Break => Ok(SyntaxNode::new(
                SyntaxKind::BreakStmt,
                vec![SyntaxElement::Token(self.bump())],
            )),
            TokenKind::Continue => Ok(SyntaxNode::new(
                SyntaxKind::ContinueStmt,
                vec![SyntaxElement::Token(self.bump())],
            )),
            _ => self.parse_expr(),
        }
    }

    fn parse_if_stmt(&mut self) -> Result<SyntaxNode, ParseError> {
        let mut children = vec![SyntaxElement::Token(self.expect(TokenKind::If)?)];
        children.push(SyntaxElement::Node(self.parse_condition()?));
        children.push(SyntaxElement::Node(self.parse_code_block()?));
        if self.at(TokenKind::Else) {
            children.push(SyntaxElement::Token(self.bump()));
            if self.at(TokenKind::If) {
                children.push(SyntaxElement::Node(self.parse_if_stmt()?));
            } else {
                children.push(SyntaxElement::Node(self.parse_code_block()?));
            }
        }
        Ok(SyntaxNode::new(SyntaxKind::IfStmt, children))
    }

    fn parse_guard_stmt(&mut self) -> Result<SyntaxNode, ParseError> {
        let mut children = vec![SyntaxElement::Token(self.expect(TokenKind::Guard)?)];
        children.push(SyntaxElement::Node(self.parse_condition()?));
        children.push(SyntaxElement::Token(self.expect(TokenKind::Else)?));
        children.push(SyntaxElement::Node(self.parse_code_block()?));
        Ok(SyntaxNode::new(SyntaxKind::GuardStmt, children))
    }

    fn parse_for_in_stmt(&mut self) -> Result<SyntaxNode, ParseError> {
        let mut children = vec![SyntaxElement::Token(self.expect(TokenKind::For)?)];
        children.push(SyntaxElement::Token(self.expect(TokenKind::Identifier)?));
        children.push(SyntaxElement::Token(self.expect(TokenKind::In)?));
        children.push(SyntaxElement::Node(self.parse_condition()?));
        if self.at(TokenKind::Where) {
            let where_keyword = self.bump();
            let condition = self.parse_condition()?;
            children.push(SyntaxElement::Node(SyntaxNode::new(
                SyntaxKind::WhereClause,
                vec![
                    SyntaxElement::Token(where_keyword),
                    SyntaxElement::Node(condition),
                ],
            )));
        }
        children.push(SyntaxElement::Node(self.parse_code_block()?));
        Ok(SyntaxNode::new(SyntaxKind::ForInStmt, children))
    }

    fn parse_return_stmt(&mut self) -> Result<SyntaxNode, ParseError> {
        let mut children = vec![SyntaxElement::Token(self.expect(TokenKind::Return)?)];
        if self.can_start_expr() {
            children.push(SyntaxElement::Node(self.parse_expr()?));
        }
        Ok(SyntaxNode::new(SyntaxKind::ReturnStmt, children))
    }

    fn parse_code_block(&mut self) -> Result<SyntaxNode, ParseError> {
        let saved = self.closures_allowed;
        self.closures_allowed = true;
        let mut children = vec![SyntaxElement::Token(self.expect(TokenKind::LeftBrace)?)];
        while !self.at(TokenKind::RightBrace) {
            if self.at(TokenKind::Eof) {
                return Err(self.error("expected `}`"));
            }
            children.push(SyntaxElement::Node(self.parse_item()?));
        }
        children.push(SyntaxElement::Token(self.bump()));
        self.closures_allowed = saved;
        Ok(SyntaxNode::new(SyntaxKind::CodeBlock, children))
    }

    fn parse_member_block(&mut self) -> Result<SyntaxNode, ParseError> {
        let saved = self.closures_allowed;
        self.closures_allowed = true;
        let mut children = vec![SyntaxElement::Token(self.expect(TokenKind::LeftBrace)?)];
        while !self.at(TokenKind::RightBrace) {
            if self.at(TokenKind::Eof) {
                return Err(self.error("expected `}`"));
            }
            children.push(SyntaxElement::Node(self.parse_item()?));
        }
        children.push(SyntaxElement::Token(self.bump()));
        self.closures_allowed = saved;
        Ok(SyntaxNode::new(SyntaxKind::MemberBlock, children))
    }

    /// An expression in condition or sequence position, where a bare `{`
    /// always belongs to the following block.
    fn parse_condition(&mut self) -> Result<SyntaxNode, ParseError> {
        let saved = self.closures_allowed;
        self.closures_allowed = false;
        let condition = self.parse_expr();
        self.closures_allowed = saved;
        condition
    }

    // === Expressions ======================================================

    fn can_start_expr(&self) -> bool {
        matches!(
            self.peek(),
            TokenKind::Identifier
                | TokenKind::IntegerLiteral
                | TokenKind::FloatLiteral
                | TokenKind::StringLiteral
                | TokenKind::True
                | TokenKind::False
                | TokenKind::Nil
                | TokenKind::LeftParen
                | TokenKind::LeftSquare
                | TokenKind::Bang
                | TokenKind::Minus
        ) || (self.at(TokenKind::LeftBrace) && self.closures_allowed)
    }

    fn parse_expr(&mut self) -> Result<SyntaxNode, ParseError> {
        self.parse_binary_expr(0)
    }

    fn parse_binary_expr(&mut self, min_power: u8) -> Result<SyntaxNode, ParseError> {
        let mut lhs = self.parse_prefix_expr()?;
        loop {
            let power = match self.peek() {
                TokenKind::Equal => 1,
                TokenKind::PipePipe => 2,
                TokenKind::AmpAmp => 3,
                TokenKind::EqualEqual
                | TokenKind::NotEqual
                | TokenKind::Less
                | TokenKind::LessEqual
                | TokenKind::Greater
                | TokenKind::GreaterEqual => 4,
                TokenKind::Plus | TokenKind::Minus => 5,
                TokenKind::Star | TokenKind::Slash | TokenKind::Percent => 6,
                _ => break,
            };
            if power < min_power {
                break;
            }
            let operator = self.bump();
            // `=` is right-associative; everything else binds left.
            let next_min = if operator.kind == TokenKind::Equal {
                power
            } else {
                power + 1
            };
            let rhs = self.parse_binary_expr(next_min)?;
            lhs = SyntaxNode::new(
                SyntaxKind::BinaryExpr,
                vec![
                    SyntaxElement::Node(lhs),
                    SyntaxElement::Token(operator),
                    SyntaxElement::Node(rhs),
                ],
            );
        }
        Ok(lhs)
    }

    fn parse_prefix_expr(&mut self) -> Result<SyntaxNode, ParseError> {
        if matches!(self.peek(), TokenKind::Bang | TokenKind::Minus) {
            let operator = self.bump();
            let operand = self.parse_prefix_expr()?;
            return Ok(SyntaxNode::new(
                SyntaxKind::PrefixExpr,
                vec![SyntaxElement::Token(operator), SyntaxElement::Node(operand)],
            ));
        }
        self.parse_postfix_expr()
    }

    fn parse_postfix_expr(&mut self) -> Result<SyntaxNode, ParseError> {
        let mut expr = self.parse_primary_expr()?;
        loop {
            match self.peek() {
                TokenKind::Dot => {
                    let dot = self.bump();
                    let name = self.expect(TokenKind::Identifier)?;
                    expr = SyntaxNode::new(
                        SyntaxKind::MemberExpr,
                        vec![
                            SyntaxElement::Node(expr),
                            SyntaxElement::Token(dot),
                            SyntaxElement::Token(name),
                        ],
                    );
                }
                TokenKind::LeftParen => {
                    let arguments = self.parse_argument_clause()?;
                    let mut children =
                        vec![SyntaxElement::Node(expr), SyntaxElement::Node(arguments)];
                    if self.at(TokenKind::LeftBrace) && self.closures_allowed {
                        children.push(SyntaxElement::Node(self.parse_closure_expr()?));
                    }
                    expr = SyntaxNode::new(SyntaxKind::CallExpr, children);
                }
                TokenKind::LeftBrace if self.closures_allowed => {
                    let closure = self.parse_closure_expr()?;
                    expr = SyntaxNode::new(
                        SyntaxKind::CallExpr,
                        vec![SyntaxElement::Node(expr), SyntaxElement::Node(closure)],
                    );
                }
                _ => return Ok(expr),
            }
        }
    }

    fn parse_argument_clause(&mut self) -> Result<SyntaxNode, ParseError> {
        let saved = self.closures_allowed;
        self.closures_allowed = true;
        let mut children = vec![SyntaxElement::Token(self.expect(TokenKind::LeftParen)?)];
        while !self.at(TokenKind::RightParen) {
            let mut argument = Vec::new();
            if self.at(TokenKind::Identifier) && self.nth(1) == TokenKind::Colon {
                argument.push(SyntaxElement::Token(self.bump()));
                argument.push(SyntaxElement::Token(self.bump()));
            }
            argument.push(SyntaxElement::Node(self.parse_expr()?));
            if self.at(TokenKind::Comma) {
                argument.push(SyntaxElement::Token(self.bump()));
            }
            children.push(SyntaxElement::Node(SyntaxNode::new(
                SyntaxKind::Argument,
                argument,
            )));
        }
        children.push(SyntaxElement::Token(self.expect(TokenKind::RightParen)?));
        self.closures_allowed = saved;
        Ok(SyntaxNode::new(SyntaxKind::ArgumentClause, children))
    }

    fn parse_closure_expr(&mut self) -> Result<SyntaxNode, ParseError> {
        let saved = self.closures_allowed;
        self.closures_allowed = true;
        let mut children = vec![SyntaxElement::Token(self.expect(TokenKind::LeftBrace)?)];

        // `{ a, b in ... }`: detect the signature by scanning ahead for
        // `in` over a run of identifiers and commas.
        let mut lookahead = 0;
        while matches!(self.nth(lookahead), TokenKind::Identifier | TokenKind::Comma) {
            lookahead += 1;
        }
        if lookahead > 0 && self.nth(lookahead) == TokenKind::In {
            let mut signature = Vec::new();
            for _ in 0..lookahead {
                signature.push(SyntaxElement::Token(self.bump()));
            }
            signature.push(SyntaxElement::Token(self.bump()));
            children.push(SyntaxElement::Node(SyntaxNode::new(
                SyntaxKind::ClosureSignature,
                signature,
            )));
        }

        while !self.at(TokenKind::RightBrace) {
            if self.at(TokenKind::Eof) {
                return Err(self.error("expected `}`"));
            }
            children.push(SyntaxElement::Node(self.parse_item()?));
        }
        children.push(SyntaxElement::Token(self.bump()));
        self.closures_allowed = saved;
        Ok(SyntaxNode::new(SyntaxKind::ClosureExpr, children))
    }

    fn parse_primary_expr(&mut self) -> Result<SyntaxNode, ParseError> {
        match self.peek() {
            TokenKind::Identifier => Ok(SyntaxNode::new(
                SyntaxKind::IdentifierExpr,
                vec![SyntaxElement::Token(self.bump())],
            )),
            TokenKind::IntegerLiteral
            | TokenKind::FloatLiteral
            | TokenKind::StringLiteral
            | TokenKind::True
            | TokenKind::False
            | TokenKind::Nil => Ok(SyntaxNode::new(
                SyntaxKind::LiteralExpr,
                vec![SyntaxElement::Token(self.bump())],
            )),
            TokenKind::LeftParen => self.parse_tuple_expr(),
            TokenKind::LeftSquare => self.parse_array_expr(),
            TokenKind::LeftBrace if self.closures_allowed => self.parse_closure_expr(),
            _ => Err(self.error(format!(
                "expected an expression, found `{}`",
                self.tokens[self.pos].text
            ))),
        }
    }

    fn parse_tuple_expr(&mut self) -> Result<SyntaxNode, ParseError> {
        let saved = self.closures_allowed;
        self.closures_allowed = true;
        let mut children = vec![SyntaxElement::Token(self.expect(TokenKind::LeftParen)?)];
        while !self.at(TokenKind::RightParen) {
            let mut element = vec![SyntaxElement::Node(self.parse_expr()?)];
            if self.at(TokenKind::Comma) {
                element.push(SyntaxElement::Token(self.bump()));
            }
            children.push(SyntaxElement::Node(SyntaxNode::new(
                SyntaxKind::ListElement,
                element,
            )));
        }
        children.push(SyntaxElement::Token(self.expect(TokenKind::RightParen)?));
        self.closures_allowed = saved;
        Ok(SyntaxNode::new(SyntaxKind::TupleExpr, children))
    }

    fn parse_array_expr(&mut self) -> Result<SyntaxNode, ParseError> {
        let saved = self.closures_allowed;
        self.closures_allowed = true;
        let mut children = vec![SyntaxElement::Token(self.expect(TokenKind::LeftSquare)?)];
        while !self.at(TokenKind::RightSquare) {
            let mut element = vec![SyntaxElement::Node(self.parse_expr()?)];
            if self.at(TokenKind::Comma) {
                element.push(SyntaxElement::Token(self.bump()));
            }
            children.push(SyntaxElement::Node(SyntaxNode::new(
                SyntaxKind::ListElement,
                element,
            )));
        }
        children.push(SyntaxElement::Token(self.expect(TokenKind::RightSquare)?));
        self.closures_allowed = saved;
        Ok(SyntaxNode::new(SyntaxKind::ArrayExpr, children))
    }

    // === Types ============================================================

    fn parse_type(&mut self) -> Result<SyntaxNode, ParseError> {
        let mut ty = match self.peek() {
            TokenKind::Identifier => {
                let name = self.bump();
                let mut children = vec![SyntaxElement::Token(name)];
                if self.at(TokenKind::Less) {
                    children.push(SyntaxElement::Node(self.parse_generic_argument_clause()?));
                }
                SyntaxNode::new(SyntaxKind::NamedType, children)
            }
            TokenKind::LeftParen => self.parse_tuple_type()?,
            TokenKind::LeftSquare => self.parse_collection_type()?,
            _ => return Err(self.error("expected a type")),
        };

        loop {
            match self.peek() {
                TokenKind::Question => {
                    let question = self.bump();
                    ty = SyntaxNode::new(
                        SyntaxKind::OptionalType,
                        vec![SyntaxElement::Node(ty), SyntaxElement::Token(question)],
                    );
                }
                TokenKind::Dot => {
                    let dot = self.bump();
                    let name = self.expect(TokenKind::Identifier)?;
                    let mut children = vec![
                        SyntaxElement::Node(ty),
                        SyntaxElement::Token(dot),
                        SyntaxElement::Token(name),
                    ];
                    if self.at(TokenKind::Less) {
                        children.push(SyntaxElement::Node(self.parse_generic_argument_clause()?));
                    }
                    ty = SyntaxNode::new(SyntaxKind::MemberType, children);
                }
                TokenKind::Arrow => {
                    let arrow = self.bump();
                    let result = self.parse_type()?;
                    ty = SyntaxNode::new(
                        SyntaxKind::FunctionType,
                        vec![
                            SyntaxElement::Node(ty),
                            SyntaxElement::Token(arrow),
                            SyntaxElement::Node(result),
                        ],
                    );
                }
                _ => return Ok(ty),
            }
        }
    }

    fn parse_tuple_type(&mut self) -> Result<SyntaxNode, ParseError> {
        let mut children = vec![SyntaxElement::Token(self.expect(TokenKind::LeftParen)?)];
        while !self.at(TokenKind::RightParen) {
            let mut element = vec![SyntaxElement::Node(self.parse_type()?)];
            if self.at(TokenKind::Comma) {
                element.push(SyntaxElement::Token(self.bump()));
            }
            children.push(SyntaxElement::Node(SyntaxNode::new(
                SyntaxKind::ListElement,
                element,
            )));
        }
        children.push(SyntaxElement::Token(self.expect(TokenKind::RightParen)?));
        Ok(SyntaxNode::new(SyntaxKind::TupleType, children))
    }

    /// `[Element]` or `[Key: Value]`.
    fn parse_collection_type(&mut self) -> Result<SyntaxNode, ParseError> {
        let open = self.expect(TokenKind::LeftSquare)?;
        let first = self.parse_type()?;
        if self.at(TokenKind::Colon) {
            let colon = self.bump();
            let value = self.parse_type()?;
            let close = self.expect(TokenKind::RightSquare)?;
            return Ok(SyntaxNode::new(
                SyntaxKind::DictionaryType,
                vec![
                    SyntaxElement::Token(open),
                    SyntaxElement::Node(first),
                    SyntaxElement::Token(colon),
                    SyntaxElement::Node(value),
                    SyntaxElement::Token(close),
                ],
            ));
        }
        let close = self.expect(TokenKind::RightSquare)?;
        Ok(SyntaxNode::new(
            SyntaxKind::ArrayType,
            vec![
                SyntaxElement::Token(open),
                SyntaxElement::Node(first),
                SyntaxElement::Token(close),
            ],
        ))
    }

    fn parse_generic_argument_clause(&mut self) -> Result<SyntaxNode, ParseError> {
        let mut children = vec![SyntaxElement::Token(self.expect(TokenKind::Less)?)];
        while !self.at(TokenKind::Greater) {
            let mut element = vec![SyntaxElement::Node(self.parse_type()?)];
            if self.at(TokenKind::Comma) {
                element.push(SyntaxElement::Token(self.bump()));
            }
            children.push(SyntaxElement::Node(SyntaxNode::new(
                SyntaxKind::ListElement,
                element,
            )));
        }
        children.push(SyntaxElement::Token(self.expect(TokenKind::Greater)?));
        Ok(SyntaxNode::new(SyntaxKind::GenericArgumentClause, children))
    }
}

#[cfg(test)]
mod tests {
    use vesper_syntax::{SyntaxKind, SyntaxNode};

    use crate::parse;

    fn kinds_of(source: &str) -> Vec<SyntaxKind> {
        parse(source)
            .unwrap()
            .root
            .descendants()
            .map(SyntaxNode::kind)
            .collect()
    }

    #[test]
    fn variable_decl_shape() {
        let kinds = kinds_of("let a: Array<Int> = []");
        assert_eq!(
            kinds,
            [
                SyntaxKind::SourceFile,
                SyntaxKind::VariableDecl,
                SyntaxKind::TypeAnnotation,
                SyntaxKind::NamedType,
                SyntaxKind::GenericArgumentClause,
                SyntaxKind::ListElement,
                SyntaxKind::NamedType,
                SyntaxKind::Initializer,
                SyntaxKind::ArrayExpr,
            ]
        );
    }

    #[test]
    fn parenthesized_condition_keeps_closure() {
        let parsed = parse("if (hasItems { true }) { run() }").unwrap();
        let if_stmt = parsed.root.first_child_of_kind(SyntaxKind::IfStmt).unwrap();
        let tuple = if_stmt.first_child_of_kind(SyntaxKind::TupleExpr).unwrap();
        let element = tuple.first_child_of_kind(SyntaxKind::ListElement).unwrap();
        let call = element.first_child_of_kind(SyntaxKind::CallExpr).unwrap();
        assert!(call.first_child_of_kind(SyntaxKind::ClosureExpr).is_some());
    }

    #[test]
    fn bare_condition_brace_is_the_body() {
        let parsed = parse("if ready { run() }").unwrap();
        let if_stmt = parsed.root.first_child_of_kind(SyntaxKind::IfStmt).unwrap();
        let condition = if_stmt.child_nodes().next().unwrap();
        assert_eq!(condition.kind(), SyntaxKind::IdentifierExpr);
        assert!(if_stmt.first_child_of_kind(SyntaxKind::CodeBlock).is_some());
    }

    #[test]
    fn trailing_closure_after_call() {
        let parsed = parse("items.map(transform: id) { x in x }").unwrap();
        let call = parsed.root.first_child_of_kind(SyntaxKind::CallExpr).unwrap();
        assert!(call.first_child_of_kind(SyntaxKind::ArgumentClause).is_some());
        let closure = call.first_child_of_kind(SyntaxKind::ClosureExpr).unwrap();
        assert!(closure
            .first_child_of_kind(SyntaxKind::ClosureSignature)
            .is_some());
    }

    #[test]
    fn for_in_with_where_clause() {
        let parsed = parse("for x in xs where x > 0 { use(x) }").unwrap();
        let for_stmt = parsed
            .root
            .first_child_of_kind(SyntaxKind::ForInStmt)
            .unwrap();
        assert!(for_stmt
            .first_child_of_kind(SyntaxKind::WhereClause)
            .is_some());
    }

    #[test]
    fn function_decl_with_generics_and_where() {
        let source = "public func id<T: Equatable>(value: T) -> T where T == T { return value }";
        let parsed = parse(source).unwrap();
        let function = parsed
            .root
            .first_child_of_kind(SyntaxKind::FunctionDecl)
            .unwrap();
        assert!(function
            .first_child_of_kind(SyntaxKind::GenericParameterClause)
            .is_some());
        assert!(function
            .first_child_of_kind(SyntaxKind::ReturnClause)
            .is_some());
        assert!(function
            .first_child_of_kind(SyntaxKind::GenericWhereClause)
            .is_some());
    }

    #[test]
    fn member_types_keep_their_base() {
        let parsed = parse("let i: Array<Int>.Index = zero").unwrap();
        let decl = parsed
            .root
            .first_child_of_kind(SyntaxKind::VariableDecl)
            .unwrap();
        let annotation = decl
            .first_child_of_kind(SyntaxKind::TypeAnnotation)
            .unwrap();
        let member = annotation
            .first_child_of_kind(SyntaxKind::MemberType)
            .unwrap();
        assert!(member.first_child_of_kind(SyntaxKind::NamedType).is_some());
    }

    #[test]
    fn enum_with_cases() {
        let source = "enum Shape { case circle(Double) case square }";
        let parsed = parse(source).unwrap();
        let decl = parsed.root.first_child_of_kind(SyntaxKind::EnumDecl).unwrap();
        let block = decl.first_child_of_kind(SyntaxKind::MemberBlock).unwrap();
        assert_eq!(block.children_of_kind(SyntaxKind::EnumCaseDecl).count(), 2);
    }

    #[test]
    fn assignment_is_right_associative() {
        let parsed = parse("a = b = c").unwrap();
        let outer = parsed
            .root
            .first_child_of_kind(SyntaxKind::BinaryExpr)
            .unwrap();
        let rhs = outer.child_nodes().nth(1).unwrap();
        assert_eq!(rhs.kind(), SyntaxKind::BinaryExpr);
    }
}
