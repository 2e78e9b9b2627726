use tracing::{debug, trace};
use crate::interpreter::token::{OPERATORS, RESERVED_WORDS, Token, TokenPos, TokenType, TYPE_NAMES};
use crate::util;


/// Escape sequences recognised inside string literals.
const STRING_ESCAPES: [(&str, char); 4] = [
    ("\\r", '\r'),
    ("\\n", '\n'),
    ("\\t", '\t'),
    ("\\\"", '"'),
];

const INTERPOLATION_OPEN: &str = "${";

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
enum LexerMode {
    Root,
    /// Inside `${ ... }`; a `}` that closes no inner brace ends the mode.
    Interpolation,
}

/// Turns source text into a flat token sequence, always terminated by [`TokenType::Eof`].
///
/// Lexing never fails: unrecognised input is reported through [`TokenType::Err`] tokens
/// and left for the parser to diagnose.
pub struct Lexer<'source> {
    input: &'source str,
    index: usize,
    pos: TokenPos,

    tokens: Vec<Token>,
}

impl<'source> Lexer<'source> {
    pub fn new(source: &'source str) -> Lexer<'source> {
        Lexer {
            input: source,
            index: 0,
            pos: TokenPos::begin(),

            tokens: Vec::new(),
        }
    }

    pub fn tokenize(mut self) -> Vec<Token> {
        self.tokenize_normal(LexerMode::Root);

        let eof = Token::eof(self.pos);
        trace!(pos = %eof.pos(), "EOF");
        self.tokens.push(eof);

        debug!(count = self.tokens.len(), "Tokenized source");
        self.tokens
    }

    /// Scans tokens until the input is exhausted or, in interpolation mode, until
    /// the closing `}` is consumed. Returns the position of that brace.
    fn tokenize_normal(&mut self, mode: LexerMode) -> Option<TokenPos> {
        let mut depth = 0usize;

        loop {
            self.skip_whitespace();

            if self.is_eof() {
                return None;
            }

            let start = self.pos;

            if let Some((literal, token_type)) = self.match_operator() {
                self.advance(literal.len());

                match token_type {
                    TokenType::DoubleQuote => self.scan_string(start),
                    TokenType::LineComment => self.scan_line_comment(start),
                    TokenType::BlockComment => self.scan_block_comment(start),
                    TokenType::BracketLeft => {
                        depth += 1;
                        self.push(token_type, literal, start);
                    },
                    TokenType::BracketRight if depth == 0 && mode == LexerMode::Interpolation => {
                        return Some(start);
                    },
                    TokenType::BracketRight => {
                        depth = depth.saturating_sub(1);
                        self.push(token_type, literal, start);
                    },
                    _ => self.push(token_type, literal, start),
                }

                continue;
            }

            if self.scan_identifier(start) || self.scan_number(start) {
                continue;
            }

            self.scan_unknown(start);
        }
    }

    fn scan_string(&mut self, quote: TokenPos) {
        let mut text = String::new();
        let mut start = self.pos;

        loop {
            let rest = self.rest();

            if rest.is_empty() {
                // Unterminated literal
                self.push(TokenType::Err, format!("\"{}", text), quote);
                return;
            }

            if rest.starts_with(INTERPOLATION_OPEN) {
                let open = self.pos;
                self.advance(INTERPOLATION_OPEN.len());

                self.push(TokenType::String, std::mem::take(&mut text), start);
                self.push(TokenType::Plus, "+", open);

                let close = match self.tokenize_normal(LexerMode::Interpolation) {
                    Some(close) => close,
                    None => self.pos,
                };
                self.push(TokenType::Plus, "+", close);

                start = self.pos;
                continue;
            }

            if let Some((escape, c)) = STRING_ESCAPES.iter().find(|(escape, _)| rest.starts_with(escape)) {
                text.push(*c);
                self.advance(escape.len());
                continue;
            }

            if rest.starts_with('"') {
                self.advance(1);
                self.push(TokenType::String, text, start);
                return;
            }

            if let Some(c) = rest.chars().next() {
                text.push(c);
                self.advance(c.len_utf8());
            }
        }
    }

    fn scan_line_comment(&mut self, start: TokenPos) {
        let length = self.rest().find(['\r', '\n']).unwrap_or(self.rest().len());
        let text = &self.rest()[..length];
        self.advance(length);

        // Runs of line comments form a single token.
        if let Some(previous) = self.tokens.last_mut() {
            if previous.token_type() == TokenType::LineComment {
                previous.append_line(text);
                return;
            }
        }

        self.push(TokenType::LineComment, text, start);
    }

    fn scan_block_comment(&mut self, start: TokenPos) {
        let rest = self.rest();
        let (length, skip) = match rest.find("*/") {
            Some(length) => (length, 2),
            None => (rest.len(), 0),
        };
        let text = &self.rest()[..length];

        self.advance(length + skip);
        self.push(TokenType::BlockComment, text, start);
    }

    fn scan_identifier(&mut self, start: TokenPos) -> bool {
        let rest = self.rest();

        match rest.chars().next() {
            Some(c) if util::is_alphabetic(c) => {},
            _ => return false,
        }

        let length = rest.char_indices()
            .find(|(_, c)| !util::is_alphanumeric(*c))
            .map(|(i, _)| i)
            .unwrap_or(rest.len());
        let name = &self.rest()[..length];

        let token_type = if let Some(token_type) = RESERVED_WORDS.get(name) {
            *token_type
        } else if TYPE_NAMES.contains(&name) {
            TokenType::Type
        } else {
            TokenType::Identifier
        };

        self.advance(length);
        self.push(token_type, name, start);
        true
    }

    fn scan_number(&mut self, start: TokenPos) -> bool {
        let rest = self.rest();

        let prefixed = |prefix: &str, digit: fn(u8) -> bool| {
            rest.strip_prefix(prefix)
                .map(|digits| util::prefix_len(digits, digit))
                .filter(|length| *length > 0)
                .map(|length| length + prefix.len())
        };

        let (length, token_type) = if let Some(length) = prefixed("0x", |b| b.is_ascii_hexdigit()) {
            (length, TokenType::Hexadecimal)
        } else if let Some(length) = prefixed("0o", |b| (b'0'..=b'7').contains(&b)) {
            (length, TokenType::Octal)
        } else if let Some(length) = prefixed("0b", |b| b == b'0' || b == b'1') {
            (length, TokenType::Binary)
        } else {
            let integer = util::prefix_len(rest, |b| b.is_ascii_digit());

            if integer == 0 {
                return false;
            }

            let fraction = match rest[integer..].strip_prefix('.') {
                Some(after_dot) => match util::prefix_len(after_dot, |b| b.is_ascii_digit()) {
                    0 => 0,
                    digits => digits + 1,
                },
                None => 0,
            };
            let mantissa = integer + fraction;

            if rest[mantissa..].starts_with('i') {
                (mantissa + 1, TokenType::Imaginary)
            } else if fraction > 0 {
                (mantissa, TokenType::Float)
            } else {
                (mantissa, TokenType::Int)
            }
        };

        let literal = &self.rest()[..length];
        self.advance(length);
        self.push(token_type, literal, start);
        true
    }

    /// Consumes a maximal run of non-whitespace as a single error token.
    fn scan_unknown(&mut self, start: TokenPos) {
        let rest = self.rest();
        let length = rest.char_indices()
            .find(|(_, c)| util::is_blank(*c) || *c == '\n')
            .map(|(i, _)| i)
            .unwrap_or(rest.len());
        let literal = &self.rest()[..length];

        self.advance(length);
        self.push(TokenType::Err, literal, start);
    }

    fn match_operator(&self) -> Option<(&'static str, TokenType)> {
        let rest = self.rest();

        OPERATORS.iter()
            .find(|(literal, _)| rest.starts_with(literal))
            .copied()
    }

    fn skip_whitespace(&mut self) {
        while let Some(c) = self.rest().chars().next() {
            if !util::is_blank(c) && c != '\n' {
                break;
            }

            self.advance(1);
        }
    }

    fn push(&mut self, token_type: TokenType, source: impl Into<String>, pos: TokenPos) {
        let token = Token::new(token_type, source, pos);
        trace!(pos = %token.pos(), token_type = %token.token_type(), source = token.source(), "Scanned token");
        self.tokens.push(token);
    }

    /// Moves `length` bytes forward, keeping the line and display column in step.
    fn advance(&mut self, length: usize) {
        let end = (self.index + length).min(self.input.len());

        for c in self.input[self.index..end].chars() {
            if c == '\n' {
                self.pos.line += 1;
                self.pos.column = 1;
            } else {
                self.pos.column += util::display_width(c);
            }
        }

        self.index = end;
    }

    fn rest(&self) -> &'source str {
        &self.input[self.index..]
    }

    fn is_eof(&self) -> bool {
        self.index >= self.input.len()
    }
}
