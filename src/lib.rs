pub mod util;
pub mod interpreter;

use std::path::PathBuf;
use std::rc::Rc;
use clap::Parser as ClapParser;
use thiserror::Error;
use tracing::debug;
use crate::interpreter::ast::Program;
use crate::interpreter::builtins::default_builtins;
use crate::interpreter::environment::Environment;
use crate::interpreter::error::{ParseError, RuntimeError};
use crate::interpreter::evaluator::{Evaluator, Node};
use crate::interpreter::lexer::Lexer;
use crate::interpreter::object::Object;
use crate::interpreter::parser::Parser;
use crate::interpreter::token::Token;

#[derive(ClapParser, Debug)]
#[clap(author, version, about, long_about = None)]
pub struct Config {
    #[clap(default_value = "main.mx", help = "Main input file")]
    pub input: PathBuf,

    #[clap(short, long, help = "Print verbose log output")]
    pub verbose: bool,
    #[clap(long, help = "Print the token stream instead of evaluating")]
    pub tokens: bool,
    #[clap(long, help = "Print the parsed program instead of evaluating")]
    pub ast: bool,
}

#[derive(Debug, Error)]
pub enum RunError {
    #[error(transparent)]
    Io(#[from] std::io::Error),
    #[error("{0} syntax error(s)")]
    Syntax(usize),
    #[error("{0}")]
    Runtime(RuntimeError),
}

pub fn tokenize(source: &str) -> Vec<Token> {
    Lexer::new(source).tokenize()
}

/// Parses `source`. The program is returned even when diagnostics were
/// recorded; `ok` is `false` in that case.
pub fn parse(source: &str) -> (Program, bool, Vec<String>) {
    let mut parser = Parser::new(tokenize(source));
    let (program, ok) = parser.parse_program();
    let diagnostics = parser.errors().iter().map(ParseError::to_string).collect();

    (program, ok, diagnostics)
}

/// Evaluates a program, statement or expression in `env` with the default builtins.
pub fn evaluate<'a>(node: impl Into<Node<'a>>, env: &Rc<Environment>) -> Option<Object> {
    Evaluator::new(default_builtins()).evaluate(node.into(), env)
}

pub fn run(config: &Config) -> Result<(), RunError> {
    let source = std::fs::read_to_string(&config.input)?;
    debug!(input = %config.input.display(), "Read source");

    if config.tokens {
        for token in tokenize(&source) {
            println!("{} {} {:?}", token.pos(), token.token_type(), token.source());
        }

        return Ok(());
    }

    let (program, ok, diagnostics) = parse(&source);

    if !ok {
        for diagnostic in &diagnostics {
            eprintln!("{}", diagnostic);
        }

        return Err(RunError::Syntax(diagnostics.len()));
    }

    if config.ast {
        print!("{}", program);
        return Ok(());
    }

    match evaluate(&program, &Environment::new_global()) {
        Some(Object::Error(error)) => Err(RunError::Runtime(error)),
        Some(result) => {
            println!("{}", result.inspect());
            Ok(())
        },
        None => Ok(()),
    }
}
