use std::fmt::{Display, Formatter};
use lazy_static::lazy_static;
use rustc_hash::FxHashMap;

#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub struct TokenPos {
    pub line: i32,
    pub column: i32,
}

impl TokenPos {
    pub fn new(line: i32, column: i32) -> TokenPos {
        TokenPos { line, column }
    }

    pub fn begin() -> TokenPos {
        TokenPos::new(1, 1)
    }
}

impl Display for TokenPos {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        write!(f, "[line {} column {}]", self.line, self.column)
    }
}

#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
#[repr(u8)]
pub enum TokenType {
    Err,
    Eof,

    // Comments
    LineComment, BlockComment, CommentClose,

    ParenthesisLeft, ParenthesisRight,
    BracketLeft, BracketRight,
    SquareBracketLeft, SquareBracketRight,
    Dot, Range, Ellipsis,
    Comma, Semicolon, Colon,
    DoubleQuote, SingleQuote,

    Assign, Equal,
    Not, NotEqual,
    Greater, GreaterEqual,
    Less, LessEqual,
    Spaceship, Arrow,

    Plus, PlusAssign, Increment,
    Minus, MinusAssign, Decrement,
    Multiply, Divide,

    And, ShortcircuitAnd,
    Or, ShortcircuitOr,
    Tilde, Question,

    Identifier,
    Type,
    Int, Float, Imaginary,
    Hexadecimal, Octal, Binary,
    String,

    // Keywords
    True, False,
    If, Else,
    Loop, Break, Continue,
    Return,
    Share, Const, Imm, Mut,
    InstanceOf,
}

impl TokenType {
    pub fn name(&self) -> &'static str {
        match self {
            TokenType::Err => "ERR",
            TokenType::Eof => "EOF",
            TokenType::LineComment => "//",
            TokenType::BlockComment => "/*",
            TokenType::CommentClose => "*/",
            TokenType::ParenthesisLeft => "(",
            TokenType::ParenthesisRight => ")",
            TokenType::BracketLeft => "{",
            TokenType::BracketRight => "}",
            TokenType::SquareBracketLeft => "[",
            TokenType::SquareBracketRight => "]",
            TokenType::Dot => ".",
            TokenType::Range => "..",
            TokenType::Ellipsis => "...",
            TokenType::Comma => ",",
            TokenType::Semicolon => ";",
            TokenType::Colon => ":",
            TokenType::DoubleQuote => "\"",
            TokenType::SingleQuote => "'",
            TokenType::Assign => "=",
            TokenType::Equal => "==",
            TokenType::Not => "!",
            TokenType::NotEqual => "!=",
            TokenType::Greater => ">",
            TokenType::GreaterEqual => ">=",
            TokenType::Less => "<",
            TokenType::LessEqual => "<=",
            TokenType::Spaceship => "<=>",
            TokenType::Arrow => "=>",
            TokenType::Plus => "+",
            TokenType::PlusAssign => "+=",
            TokenType::Increment => "++",
            TokenType::Minus => "-",
            TokenType::MinusAssign => "-=",
            TokenType::Decrement => "--",
            TokenType::Multiply => "*",
            TokenType::Divide => "/",
            TokenType::And => "&",
            TokenType::ShortcircuitAnd => "&&",
            TokenType::Or => "|",
            TokenType::ShortcircuitOr => "||",
            TokenType::Tilde => "~",
            TokenType::Question => "?",
            TokenType::Identifier => "IDENT",
            TokenType::Type => "TYPE",
            TokenType::Int => "INT",
            TokenType::Float => "FLOAT",
            TokenType::Imaginary => "IMAG",
            TokenType::Hexadecimal => "HEX",
            TokenType::Octal => "OCTAL",
            TokenType::Binary => "BINARY",
            TokenType::String => "STRING",
            TokenType::True => "true",
            TokenType::False => "false",
            TokenType::If => "if",
            TokenType::Else => "else",
            TokenType::Loop => "loop",
            TokenType::Break => "break",
            TokenType::Continue => "continue",
            TokenType::Return => "return",
            TokenType::Share => "share",
            TokenType::Const => "const",
            TokenType::Imm => "imm",
            TokenType::Mut => "mut",
            TokenType::InstanceOf => "instanceof",
        }
    }
}

impl Display for TokenType {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.name())
    }
}

lazy_static! {
    /// Punctuation recognised outside of string literals, longest spelling first
    /// so that the first prefix match is also the longest one.
    pub static ref OPERATORS: Vec<(&'static str, TokenType)> = {
        let mut operators = vec![
            ("...", TokenType::Ellipsis),
            ("<=>", TokenType::Spaceship),
            ("==", TokenType::Equal),
            ("!=", TokenType::NotEqual),
            ("<=", TokenType::LessEqual),
            (">=", TokenType::GreaterEqual),
            ("=>", TokenType::Arrow),
            ("++", TokenType::Increment),
            ("--", TokenType::Decrement),
            ("+=", TokenType::PlusAssign),
            ("-=", TokenType::MinusAssign),
            ("&&", TokenType::ShortcircuitAnd),
            ("||", TokenType::ShortcircuitOr),
            ("..", TokenType::Range),
            ("//", TokenType::LineComment),
            ("/*", TokenType::BlockComment),
            ("*/", TokenType::CommentClose),
            ("=", TokenType::Assign),
            ("+", TokenType::Plus),
            ("-", TokenType::Minus),
            ("!", TokenType::Not),
            ("*", TokenType::Multiply),
            ("/", TokenType::Divide),
            ("|", TokenType::Or),
            ("&", TokenType::And),
            ("~", TokenType::Tilde),
            ("?", TokenType::Question),
            ("<", TokenType::Less),
            (">", TokenType::Greater),
            (".", TokenType::Dot),
            (",", TokenType::Comma),
            (";", TokenType::Semicolon),
            (":", TokenType::Colon),
            ("(", TokenType::ParenthesisLeft),
            (")", TokenType::ParenthesisRight),
            ("{", TokenType::BracketLeft),
            ("}", TokenType::BracketRight),
            ("[", TokenType::SquareBracketLeft),
            ("]", TokenType::SquareBracketRight),
            ("\"", TokenType::DoubleQuote),
            ("'", TokenType::SingleQuote),
        ];
        operators.sort_by(|(a, _), (b, _)| b.len().cmp(&a.len()));
        operators
    };

    pub static ref RESERVED_WORDS: FxHashMap<&'static str, TokenType> = [
        ("true", TokenType::True),
        ("false", TokenType::False),
        ("if", TokenType::If),
        ("else", TokenType::Else),
        ("loop", TokenType::Loop),
        ("break", TokenType::Break),
        ("continue", TokenType::Continue),
        ("return", TokenType::Return),
        ("share", TokenType::Share),
        ("const", TokenType::Const),
        ("imm", TokenType::Imm),
        ("mut", TokenType::Mut),
        ("instanceof", TokenType::InstanceOf),
    ].into_iter().collect();

    pub static ref TYPE_NAMES: Vec<&'static str> = vec![
        "string", "array", "object", "number", "boolean", "void", "any",
    ];
}

#[derive(Clone, Debug, PartialEq, Eq)]
pub struct Token {
    token_type: TokenType,
    source: String,
    pos: TokenPos,
}

impl Token {
    pub fn new(token_type: TokenType, source: impl Into<String>, pos: TokenPos) -> Token {
        Token {
            token_type,
            source: source.into(),
            pos,
        }
    }

    pub fn eof(pos: TokenPos) -> Token {
        Token::new(TokenType::Eof, "", pos)
    }

    pub fn token_type(&self) -> TokenType { self.token_type }
    pub fn source(&self) -> &str { &self.source }
    pub fn pos(&self) -> TokenPos { self.pos }

    pub(crate) fn append_line(&mut self, line: &str) {
        self.source.push('\n');
        self.source.push_str(line);
    }
}

impl Display for Token {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        match self.token_type {
            TokenType::Eof => f.write_str("Eof"),
            TokenType::String => write!(f, "`\"{}\"`", self.source),
            _ => write!(f, "`{}`", self.source),
        }
    }
}
