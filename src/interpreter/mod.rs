pub mod token;
pub mod lexer;
pub mod ast;
pub mod parser;
pub mod error;
pub mod object;
pub mod environment;
pub mod evaluator;
pub mod builtins;
