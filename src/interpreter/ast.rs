use std::fmt::{Display, Formatter};

pub mod expression;
pub mod statement;
pub mod types;

pub use expression::{Expr, FunctionLiteral, Identifier, IfExpression};
pub use statement::{BindingMode, BlockStatement, CommentStatement, CommentStyle, LetStatement, LoopStatement, Stmt};
pub use types::{ObjectProperty, TypeNode};

/// Root of a parsed source file.
#[derive(Clone, Debug, PartialEq, Default)]
pub struct Program {
    pub statements: Vec<Stmt>,
}

impl Display for Program {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        for statement in &self.statements {
            writeln!(f, "{}", statement)?;
        }

        Ok(())
    }
}

pub(crate) fn join<T: Display>(items: &[T], separator: &str) -> String {
    items.iter()
        .map(|item| item.to_string())
        .collect::<Vec<String>>().join(separator)
}
