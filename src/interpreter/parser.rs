use std::rc::Rc;
use tracing::debug;
use crate::interpreter::ast::{BindingMode, BlockStatement, CommentStatement, Expr, FunctionLiteral, Identifier, IfExpression, LetStatement, LoopStatement, ObjectProperty, Program, Stmt, TypeNode};
use crate::interpreter::error::ParseError;
use crate::interpreter::token::{Token, TokenPos, TokenType};


#[derive(Clone, Copy, Debug, PartialEq, Eq, PartialOrd, Ord)]
pub enum Precedence {
    Lowest,
    Equals,
    LessGreater,
    Sum,
    Product,
    Prefix,
    Call,
    Index,
    Member,
}

impl From<TokenType> for Precedence {
    fn from(token_type: TokenType) -> Self {
        match token_type {
            TokenType::Equal | TokenType::NotEqual => Precedence::Equals,
            TokenType::Less | TokenType::Greater
            | TokenType::LessEqual | TokenType::GreaterEqual
            | TokenType::InstanceOf => Precedence::LessGreater,
            TokenType::Plus | TokenType::Minus => Precedence::Sum,
            TokenType::Multiply | TokenType::Divide => Precedence::Product,
            TokenType::ParenthesisLeft => Precedence::Call,
            TokenType::SquareBracketLeft => Precedence::Index,
            TokenType::Dot => Precedence::Member,
            _ => Precedence::Lowest,
        }
    }
}

/// Pratt parser over a token sequence.
///
/// Comment tokens are invisible to lookahead and are only picked up where a
/// statement may begin, where they become [`Stmt::Comment`].
pub struct Parser {
    tokens: Vec<Token>,
    position: usize,

    errors: Vec<ParseError>,
    panic_mode: bool,
}

impl Parser {
    pub fn new(mut tokens: Vec<Token>) -> Parser {
        if tokens.last().map(|token| token.token_type()) != Some(TokenType::Eof) {
            let pos = tokens.last().map(|token| token.pos()).unwrap_or_else(TokenPos::begin);
            tokens.push(Token::eof(pos));
        }

        Parser {
            tokens,
            position: 0,

            errors: Vec::new(),
            panic_mode: false,
        }
    }

    pub fn errors(&self) -> &[ParseError] {
        &self.errors
    }

    pub fn had_error(&self) -> bool {
        !self.errors.is_empty()
    }

    /// Parses the whole token sequence. The flag is `true` when no diagnostic was recorded.
    pub fn parse_program(&mut self) -> (Program, bool) {
        let mut statements = Vec::new();

        while !self.current_is(TokenType::Eof) {
            if let Some(statement) = self.parse_statement() {
                statements.push(statement);
            }

            if self.panic_mode {
                self.synchronize();
            }

            self.next_statement_token();
        }

        debug!(statements = statements.len(), errors = self.errors.len(), "Parsed program");
        (Program { statements }, !self.had_error())
    }

    // Statement parsing

    fn parse_statement(&mut self) -> Option<Stmt> {
        match self.current().token_type() {
            TokenType::Imm | TokenType::Mut => self.parse_let_statement().map(Stmt::Let),
            TokenType::Return => self.parse_return_statement(),
            TokenType::LineComment | TokenType::BlockComment =>
                Some(Stmt::Comment(CommentStatement::from_token(self.current().clone()))),
            TokenType::Ellipsis => self.parse_derive_statement(),
            TokenType::Loop => self.parse_loop_statement(),
            TokenType::Break => {
                let token = self.current().clone();
                self.skip_semicolon();
                Some(Stmt::Break(token))
            },
            TokenType::Continue => {
                let token = self.current().clone();
                self.skip_semicolon();
                Some(Stmt::Continue(token))
            },
            _ => self.parse_expression_statement(),
        }
    }

    /// `imm|mut NAME (: type)? (= expr)? ;?`
    fn parse_let_statement(&mut self) -> Option<LetStatement> {
        let token = self.current().clone();
        let mode = if token.token_type() == TokenType::Mut { BindingMode::Mutable } else { BindingMode::Immutable };

        if !self.expect_peek(TokenType::Identifier) {
            return None;
        }

        let mut name = Identifier::new(self.current().clone());

        if self.peek_is(TokenType::Colon) {
            self.next_token();
            self.next_token();
            name.type_annotation = Some(self.parse_type()?);
        }

        if !self.peek_is(TokenType::Assign) {
            self.skip_semicolon();
            return Some(LetStatement { token, mode, name, value: None });
        }

        self.next_token();
        self.next_token();

        let value = self.parse_expression(Precedence::Lowest)?;
        self.skip_semicolon();

        Some(LetStatement { token, mode, name, value: Some(value) })
    }

    fn parse_return_statement(&mut self) -> Option<Stmt> {
        let token = self.current().clone();

        if self.peek_is(TokenType::Semicolon) || self.peek_is(TokenType::BracketRight) || self.peek_is(TokenType::Eof) {
            self.skip_semicolon();
            return Some(Stmt::Return { token, value: None });
        }

        self.next_token();
        let value = self.parse_expression(Precedence::Lowest)?;
        self.skip_semicolon();

        Some(Stmt::Return { token, value: Some(value) })
    }

    fn parse_derive_statement(&mut self) -> Option<Stmt> {
        let token = self.current().clone();
        self.next_token();

        let expr = self.parse_expression(Precedence::Lowest)?;
        self.skip_semicolon();

        Some(Stmt::Derive { token, expr })
    }

    /// `loop (imm|mut NAME = expr) body`
    fn parse_loop_statement(&mut self) -> Option<Stmt> {
        let token = self.current().clone();

        if !self.expect_peek(TokenType::ParenthesisLeft) {
            return None;
        }

        if !self.peek_is(TokenType::Imm) && !self.peek_is(TokenType::Mut) {
            self.peek_error(TokenType::Mut);
            return None;
        }

        self.next_token();
        let binding = self.parse_let_statement()?;

        if !self.expect_peek(TokenType::ParenthesisRight) {
            return None;
        }

        self.next_token();
        let body = self.parse_block_statement();

        Some(Stmt::Loop(LoopStatement { token, binding, body }))
    }

    fn parse_expression_statement(&mut self) -> Option<Stmt> {
        let token = self.current().clone();
        let expr = self.parse_expression(Precedence::Lowest)?;

        if self.peek_is(TokenType::Assign) {
            self.next_token();
            let token = self.current().clone();
            self.next_token();

            let value = self.parse_expression(Precedence::Lowest)?;
            self.skip_semicolon();

            return Some(Stmt::Assign { token, target: expr, value });
        }

        self.skip_semicolon();
        Some(Stmt::Expression { token, expr })
    }

    /// Parses `{ ... }` when the current token is a brace, otherwise exactly one statement.
    fn parse_block_statement(&mut self) -> BlockStatement {
        let token = self.current().clone();
        let mut statements = Vec::new();

        if !self.current_is(TokenType::BracketLeft) {
            if let Some(statement) = self.parse_statement() {
                statements.push(statement);
            }

            return BlockStatement { token, statements };
        }

        self.next_statement_token();

        while !self.current_is(TokenType::BracketRight) && !self.current_is(TokenType::Eof) {
            if let Some(statement) = self.parse_statement() {
                statements.push(statement);
            }

            if self.panic_mode {
                self.synchronize();
            }

            self.next_statement_token();
        }

        if self.current_is(TokenType::Eof) {
            self.current_error(TokenType::BracketRight);
        }

        BlockStatement { token, statements }
    }

    // Expression parsing

    pub fn parse_expression(&mut self, precedence: Precedence) -> Option<Expr> {
        let mut left = self.parse_prefix()?;

        while !self.peek_is(TokenType::Semicolon) && precedence < self.peek_precedence() {
            left = match self.peek().token_type() {
                TokenType::Plus | TokenType::Minus
                | TokenType::Multiply | TokenType::Divide
                | TokenType::Equal | TokenType::NotEqual
                | TokenType::Less | TokenType::Greater
                | TokenType::LessEqual | TokenType::GreaterEqual
                | TokenType::InstanceOf => {
                    self.next_token();
                    self.parse_infix_expression(left)?
                },
                TokenType::ParenthesisLeft => {
                    self.next_token();
                    self.parse_call_expression(left)?
                },
                TokenType::SquareBracketLeft => {
                    self.next_token();
                    self.parse_index_expression(left)?
                },
                TokenType::Dot => {
                    self.next_token();
                    self.parse_dot_expression(left)?
                },
                _ => return Some(left),
            };
        }

        Some(left)
    }

    fn parse_prefix(&mut self) -> Option<Expr> {
        let token = self.current().clone();

        match token.token_type() {
            TokenType::Identifier => Some(Expr::Identifier(Identifier::new(token))),
            TokenType::Int | TokenType::Hexadecimal | TokenType::Octal | TokenType::Binary => self.parse_integer_literal(),
            TokenType::Float => match token.source().parse::<f64>() {
                Ok(value) => Some(Expr::Float { token, value }),
                Err(_) => self.invalid_number("float"),
            },
            TokenType::Imaginary => match token.source().trim_end_matches('i').parse::<f64>() {
                Ok(imaginary) => Some(Expr::Complex { token, imaginary }),
                Err(_) => self.invalid_number("imaginary number"),
            },
            TokenType::String => {
                let value = token.source().to_owned();
                Some(Expr::String { token, value })
            },
            TokenType::Type => {
                let name = token.source().to_owned();
                Some(Expr::Type { token, name })
            },
            TokenType::True | TokenType::False => {
                let value = token.token_type() == TokenType::True;
                Some(Expr::Boolean { token, value })
            },
            TokenType::Not | TokenType::Minus | TokenType::Increment | TokenType::Ellipsis => self.parse_prefix_expression(),
            TokenType::ParenthesisLeft => self.parse_grouped_expression(),
            TokenType::If => self.parse_if_expression(),
            TokenType::SquareBracketLeft => self.parse_array_literal(),
            TokenType::BracketLeft => self.parse_hash_literal(),
            TokenType::Err => {
                self.error(ParseError::IllegalToken { pos: token.pos(), literal: token.source().to_owned() });
                None
            },
            token_type => {
                self.error(ParseError::NoPrefixRule { pos: token.pos(), token_type });
                None
            },
        }
    }

    fn parse_integer_literal(&mut self) -> Option<Expr> {
        let token = self.current().clone();
        let source = token.source();

        let parsed = match token.token_type() {
            TokenType::Hexadecimal => i64::from_str_radix(&source[2..], 16),
            TokenType::Octal => i64::from_str_radix(&source[2..], 8),
            TokenType::Binary => i64::from_str_radix(&source[2..], 2),
            _ => source.parse::<i64>(),
        };

        match parsed {
            Ok(value) => Some(Expr::Integer { token, value }),
            Err(_) => self.invalid_number("integer"),
        }
    }

    fn parse_prefix_expression(&mut self) -> Option<Expr> {
        let token = self.current().clone();
        let operator = token.token_type();

        self.next_token();
        let right = self.parse_expression(Precedence::Prefix)?;

        Some(Expr::Prefix { token, operator, right: Box::new(right) })
    }

    fn parse_infix_expression(&mut self, left: Expr) -> Option<Expr> {
        let token = self.current().clone();
        let operator = token.token_type();
        let precedence = Precedence::from(operator);

        self.next_token();
        let right = self.parse_expression(precedence)?;

        Some(Expr::Infix { token, left: Box::new(left), operator, right: Box::new(right) })
    }

    /// A parenthesis opens an arrow function when it is followed by `)`, by
    /// `name:` or `name,`, or by `name)` and then `=>` or a return type
    /// ending in `=>`. Anything else is a grouping.
    fn parse_grouped_expression(&mut self) -> Option<Expr> {
        let is_function = self.peek_is(TokenType::ParenthesisRight)
            || (self.peek_is(TokenType::Identifier) && match self.peek_2().token_type() {
                TokenType::Colon | TokenType::Comma => true,
                TokenType::ParenthesisRight => match self.peek_n(3).token_type() {
                    TokenType::Arrow => true,
                    TokenType::Colon => self.arrow_follows(4),
                    _ => false,
                },
                _ => false,
            });

        if is_function {
            return self.parse_function_literal();
        }

        self.next_token();
        let expr = self.parse_expression(Precedence::Lowest)?;

        if !self.expect_peek(TokenType::ParenthesisRight) {
            return None;
        }

        Some(expr)
    }

    /// Whether an `=>` appears at bracket depth 0 starting `offset` tokens ahead,
    /// before a `,`, `;`, unbalanced closing bracket or the end of input.
    fn arrow_follows(&self, offset: usize) -> bool {
        let mut depth = 0usize;
        let mut n = offset;

        loop {
            match self.peek_n(n).token_type() {
                TokenType::Arrow if depth == 0 => return true,
                TokenType::ParenthesisLeft | TokenType::SquareBracketLeft | TokenType::BracketLeft => depth += 1,
                TokenType::ParenthesisRight | TokenType::SquareBracketRight | TokenType::BracketRight => {
                    if depth == 0 {
                        return false;
                    }

                    depth -= 1;
                },
                TokenType::Comma | TokenType::Semicolon if depth == 0 => return false,
                TokenType::Eof => return false,
                _ => {},
            }

            n += 1;
        }
    }

    /// `(a: T, b) : R => { body }`
    fn parse_function_literal(&mut self) -> Option<Expr> {
        let token = self.current().clone();
        let parameters = self.parse_parameters()?;

        let return_type = if self.peek_is(TokenType::Colon) {
            self.next_token();
            self.next_token();
            Some(self.parse_type()?)
        } else {
            None
        };

        if !self.expect_peek(TokenType::Arrow) || !self.expect_peek(TokenType::BracketLeft) {
            return None;
        }

        let body = self.parse_block_statement();

        Some(Expr::Function(Rc::new(FunctionLiteral { token, parameters, return_type, body })))
    }

    /// Parses a parameter list starting at `(` and ending on `)`.
    fn parse_parameters(&mut self) -> Option<Vec<Identifier>> {
        let mut parameters = Vec::new();

        while !self.peek_is(TokenType::ParenthesisRight) {
            if !self.expect_peek(TokenType::Identifier) {
                return None;
            }

            let mut parameter = Identifier::new(self.current().clone());

            if self.peek_is(TokenType::Colon) {
                self.next_token();
                self.next_token();
                parameter.type_annotation = Some(self.parse_type()?);
            }

            parameters.push(parameter);

            if !self.peek_is(TokenType::Comma) {
                break;
            }

            self.next_token();
        }

        if !self.expect_peek(TokenType::ParenthesisRight) {
            return None;
        }

        Some(parameters)
    }

    /// `if (cond) block (else block)?`
    fn parse_if_expression(&mut self) -> Option<Expr> {
        let token = self.current().clone();

        if !self.expect_peek(TokenType::ParenthesisLeft) {
            return None;
        }

        self.next_token();
        let condition = self.parse_expression(Precedence::Lowest)?;

        if !self.expect_peek(TokenType::ParenthesisRight) {
            return None;
        }

        self.next_token();
        let consequence = self.parse_block_statement();

        let alternative = if self.peek_is(TokenType::Else) {
            self.next_token();
            self.next_token();
            Some(self.parse_block_statement())
        } else {
            None
        };

        Some(Expr::If(IfExpression { token, condition: Box::new(condition), consequence, alternative }))
    }

    fn parse_array_literal(&mut self) -> Option<Expr> {
        let token = self.current().clone();
        let elements = self.parse_expression_list(TokenType::SquareBracketRight)?;

        Some(Expr::Array { token, elements })
    }

    /// `{ key: value, ... }`; a bare identifier key is taken as a string.
    fn parse_hash_literal(&mut self) -> Option<Expr> {
        let token = self.current().clone();
        let mut pairs = Vec::new();

        while !self.peek_is(TokenType::BracketRight) {
            self.next_token();

            let key = if self.current_is(TokenType::Identifier) {
                let token = self.current().clone();
                let value = token.source().to_owned();
                Expr::String { token, value }
            } else {
                self.parse_expression(Precedence::Lowest)?
            };

            if !self.expect_peek(TokenType::Colon) {
                return None;
            }

            self.next_token();
            let value = self.parse_expression(Precedence::Lowest)?;
            pairs.push((key, value));

            if !self.peek_is(TokenType::BracketRight) && !self.expect_peek(TokenType::Comma) {
                return None;
            }
        }

        if !self.expect_peek(TokenType::BracketRight) {
            return None;
        }

        Some(Expr::Hash { token, pairs })
    }

    fn parse_call_expression(&mut self, function: Expr) -> Option<Expr> {
        let token = self.current().clone();
        let arguments = self.parse_expression_list(TokenType::ParenthesisRight)?;

        Some(Expr::Call { token, function: Box::new(function), arguments })
    }

    fn parse_index_expression(&mut self, left: Expr) -> Option<Expr> {
        let token = self.current().clone();

        self.next_token();
        let index = self.parse_expression(Precedence::Lowest)?;

        if !self.expect_peek(TokenType::SquareBracketRight) {
            return None;
        }

        Some(Expr::Index { token, left: Box::new(left), index: Box::new(index) })
    }

    fn parse_dot_expression(&mut self, left: Expr) -> Option<Expr> {
        let token = self.current().clone();

        // Type names are ordinary words after a dot.
        if !self.peek_is(TokenType::Identifier) && !self.peek_is(TokenType::Type) {
            let got = self.peek().clone();
            self.error(ParseError::Expected { pos: got.pos(), expected: "property name", got: got.token_type() });
            return None;
        }

        self.next_token();
        let name = Identifier::new(self.current().clone());

        Some(Expr::Dot { token, left: Box::new(left), name })
    }

    /// Comma separated expressions up to `end`. A trailing comma is accepted.
    fn parse_expression_list(&mut self, end: TokenType) -> Option<Vec<Expr>> {
        let mut list = Vec::new();

        while !self.peek_is(end) {
            self.next_token();
            list.push(self.parse_expression(Precedence::Lowest)?);

            if !self.peek_is(TokenType::Comma) {
                break;
            }

            self.next_token();
        }

        if !self.expect_peek(end) {
            return None;
        }

        Some(list)
    }

    // Type annotations

    fn parse_type(&mut self) -> Option<TypeNode> {
        let token = self.current().clone();

        let mut type_node = match token.token_type() {
            TokenType::Type | TokenType::Identifier => {
                let name = token.source().to_owned();
                TypeNode::Simple { token, name }
            },
            TokenType::ParenthesisLeft => {
                let parameters = self.parse_parameters()?;

                if !self.expect_peek(TokenType::Arrow) {
                    return None;
                }

                self.next_token();
                let return_type = self.parse_type()?;

                TypeNode::Function { token, parameters, return_type: Box::new(return_type) }
            },
            TokenType::BracketLeft if self.peek_is(TokenType::SquareBracketLeft) => self.parse_map_type()?,
            TokenType::BracketLeft => self.parse_object_type()?,
            _ => {
                self.error(ParseError::Expected { pos: token.pos(), expected: "type", got: token.token_type() });
                return None;
            },
        };

        while self.peek_is(TokenType::SquareBracketLeft) && self.peek_2().token_type() == TokenType::SquareBracketRight {
            self.next_token();
            self.next_token();

            let token = self.current().clone();
            type_node = TypeNode::Array { token, element: Box::new(type_node) };
        }

        Some(type_node)
    }

    /// `{[key: K]: V}`
    fn parse_map_type(&mut self) -> Option<TypeNode> {
        let token = self.current().clone();

        self.next_token();

        if !self.expect_peek(TokenType::Identifier) || !self.expect_peek(TokenType::Colon) {
            return None;
        }

        self.next_token();
        let key = self.parse_type()?;

        if !self.expect_peek(TokenType::SquareBracketRight) || !self.expect_peek(TokenType::Colon) {
            return None;
        }

        self.next_token();
        let value = self.parse_type()?;

        if !self.expect_peek(TokenType::BracketRight) {
            return None;
        }

        Some(TypeNode::Map { token, key: Box::new(key), value: Box::new(value) })
    }

    /// `{a: T, b: U}`
    fn parse_object_type(&mut self) -> Option<TypeNode> {
        let token = self.current().clone();
        let mut properties = Vec::new();

        while !self.peek_is(TokenType::BracketRight) {
            if !self.expect_peek(TokenType::Identifier) {
                return None;
            }

            let name = self.current().clone();

            if !self.expect_peek(TokenType::Colon) {
                return None;
            }

            self.next_token();
            let property_type = self.parse_type()?;
            properties.push(ObjectProperty { name, property_type });

            if !self.peek_is(TokenType::Comma) {
                break;
            }

            self.next_token();
        }

        if !self.expect_peek(TokenType::BracketRight) {
            return None;
        }

        Some(TypeNode::Object { token, properties })
    }

    // Token navigation

    fn token_at(&self, index: usize) -> &Token {
        &self.tokens[index.min(self.tokens.len() - 1)]
    }

    /// Index of the first non-comment token after `index`.
    fn next_index(&self, index: usize) -> usize {
        let last = self.tokens.len() - 1;
        let mut next = (index + 1).min(last);

        while next < last && matches!(self.tokens[next].token_type(), TokenType::LineComment | TokenType::BlockComment) {
            next += 1;
        }

        next
    }

    fn current(&self) -> &Token {
        self.token_at(self.position)
    }

    fn peek(&self) -> &Token {
        self.peek_n(1)
    }

    fn peek_2(&self) -> &Token {
        self.peek_n(2)
    }

    fn peek_n(&self, n: usize) -> &Token {
        let mut index = self.position;

        for _ in 0..n {
            index = self.next_index(index);
        }

        self.token_at(index)
    }

    fn next_token(&mut self) {
        self.position = self.next_index(self.position);
    }

    /// Advances by exactly one token, stopping on comments.
    fn next_statement_token(&mut self) {
        self.position = (self.position + 1).min(self.tokens.len() - 1);
    }

    #[inline]
    fn current_is(&self, token_type: TokenType) -> bool {
        self.current().token_type() == token_type
    }

    #[inline]
    fn peek_is(&self, token_type: TokenType) -> bool {
        self.peek().token_type() == token_type
    }

    fn peek_precedence(&self) -> Precedence {
        Precedence::from(self.peek().token_type())
    }

    fn expect_peek(&mut self, token_type: TokenType) -> bool {
        if self.peek_is(token_type) {
            self.next_token();
            true
        } else {
            self.peek_error(token_type);
            false
        }
    }

    fn skip_semicolon(&mut self) {
        if self.peek_is(TokenType::Semicolon) {
            self.next_token();
        }
    }

    // Error handling

    fn synchronize(&mut self) {
        self.panic_mode = false;

        while !self.current_is(TokenType::Eof) && !self.current_is(TokenType::Semicolon) {
            match self.peek().token_type() {
                TokenType::Imm | TokenType::Mut | TokenType::Return | TokenType::Loop
                | TokenType::Break | TokenType::Continue | TokenType::BracketRight => return,
                _ => {},
            }

            self.next_token();
        }
    }

    fn peek_error(&mut self, expected: TokenType) {
        let got = self.peek();
        let error = ParseError::UnexpectedToken { pos: got.pos(), expected, got: got.token_type() };
        self.error(error);
    }

    fn current_error(&mut self, expected: TokenType) {
        let got = self.current();
        let error = ParseError::UnexpectedToken { pos: got.pos(), expected, got: got.token_type() };
        self.error(error);
    }

    fn invalid_number<T>(&mut self, kind: &'static str) -> Option<T> {
        let token = self.current();
        let error = ParseError::InvalidNumber { pos: token.pos(), literal: token.source().to_owned(), kind };
        self.error(error);
        None
    }

    fn error(&mut self, error: ParseError) {
        if self.panic_mode {
            return;
        }

        self.panic_mode = true;
        debug!(%error, "Parse error");
        self.errors.push(error);
    }
}
