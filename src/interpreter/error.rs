use thiserror::Error;
use crate::interpreter::object::{HashError, ObjectType};
use crate::interpreter::token::{TokenPos, TokenType};

#[derive(Debug, Clone, PartialEq, Error)]
pub enum ParseError {
    #[error("{pos} expected next token to be {expected}, got {got} instead")]
    UnexpectedToken {
        pos: TokenPos,
        expected: TokenType,
        got: TokenType,
    },
    #[error("{pos} no prefix parse function for {token_type} found")]
    NoPrefixRule {
        pos: TokenPos,
        token_type: TokenType,
    },
    #[error("{pos} could not parse {literal:?} as {kind}")]
    InvalidNumber {
        pos: TokenPos,
        literal: String,
        kind: &'static str,
    },
    #[error("{pos} expected {expected}, got {got} instead")]
    Expected {
        pos: TokenPos,
        expected: &'static str,
        got: TokenType,
    },
    #[error("{pos} illegal token {literal:?}")]
    IllegalToken {
        pos: TokenPos,
        literal: String,
    },
}

impl ParseError {
    pub fn pos(&self) -> TokenPos {
        match self {
            ParseError::UnexpectedToken { pos, .. }
            | ParseError::NoPrefixRule { pos, .. }
            | ParseError::InvalidNumber { pos, .. }
            | ParseError::Expected { pos, .. }
            | ParseError::IllegalToken { pos, .. } => *pos,
        }
    }
}

/// Failure raised while evaluating; carried through the program as an error object.
#[derive(Debug, Clone, PartialEq, Error)]
pub enum RuntimeError {
    #[error("identifier not found: {0}")]
    IdentifierNotFound(String),
    #[error("unknown operator: {operator}{right}")]
    UnknownPrefixOperator {
        operator: TokenType,
        right: ObjectType,
    },
    #[error("unknown operator: {left} {operator} {right}")]
    UnknownInfixOperator {
        left: ObjectType,
        operator: TokenType,
        right: ObjectType,
    },
    #[error("type mismatch: {left} {operator} {right}")]
    TypeMismatch {
        left: ObjectType,
        operator: TokenType,
        right: ObjectType,
    },
    #[error("division by zero")]
    DivisionByZero,
    #[error("not a function: {0}")]
    NotAFunction(ObjectType),
    #[error("not a hash: {0}")]
    NotAHash(ObjectType),
    #[error("index operator not supported: {0}")]
    IndexNotSupported(ObjectType),
    #[error("unusable as hash key: {0}")]
    UnusableAsHashKey(ObjectType),
    #[error("assignment target not assignable: {0}")]
    NotAssignable(ObjectType),
    #[error("invalid assignment target: {0}")]
    InvalidAssignmentTarget(String),
    #[error("array index is not integer: {0}")]
    ArrayIndexNotInteger(ObjectType),
    #[error("index out of range: {index} (length {length})")]
    IndexOutOfRange {
        index: i64,
        length: usize,
    },
    #[error("derive operator (...) requires a hash or class, got {0}")]
    DeriveRequiresHash(ObjectType),
    #[error("right-hand side of instanceof must be a function or type, got {0}")]
    InvalidInstanceOf(ObjectType),
    #[error("wrong number of arguments to `{name}`: got {got}, want {want}")]
    WrongArgumentCount {
        name: &'static str,
        got: usize,
        want: usize,
    },
    #[error("argument to `{name}` not supported, got {got}")]
    UnsupportedArgument {
        name: &'static str,
        got: ObjectType,
    },
}

impl From<HashError> for RuntimeError {
    fn from(error: HashError) -> Self {
        match error {
            HashError::Unhashable(object_type) => RuntimeError::UnusableAsHashKey(object_type),
        }
    }
}
