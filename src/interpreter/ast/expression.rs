use std::fmt::{Display, Formatter};
use std::rc::Rc;
use crate::interpreter::ast::{join, BlockStatement, TypeNode};
use crate::interpreter::token::{Token, TokenType};

#[derive(Clone, Debug, PartialEq)]
pub struct Identifier {
    pub token: Token,
    pub name: String,
    pub type_annotation: Option<TypeNode>,
}

impl Identifier {
    pub fn new(token: Token) -> Identifier {
        Identifier {
            name: token.source().to_owned(),
            token,
            type_annotation: None,
        }
    }
}

impl Display for Identifier {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        match &self.type_annotation {
            Some(type_annotation) => write!(f, "{}: {}", self.name, type_annotation),
            None => f.write_str(&self.name),
        }
    }
}

/// Shared between the tree and every function object created from it.
#[derive(Clone, Debug, PartialEq)]
pub struct FunctionLiteral {
    pub token: Token,
    pub parameters: Vec<Identifier>,
    pub return_type: Option<TypeNode>,
    pub body: BlockStatement,
}

impl Display for FunctionLiteral {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        write!(f, "({})", join(&self.parameters, ", "))?;

        if let Some(return_type) = &self.return_type {
            write!(f, ": {}", return_type)?;
        }

        write!(f, " => {}", self.body)
    }
}

#[derive(Clone, Debug, PartialEq)]
pub struct IfExpression {
    pub token: Token,
    pub condition: Box<Expr>,
    pub consequence: BlockStatement,
    pub alternative: Option<BlockStatement>,
}

#[derive(Clone, Debug, PartialEq)]
pub enum Expr {
    Identifier(Identifier),

    Boolean {
        token: Token,
        value: bool,
    },
    Integer {
        token: Token,
        value: i64,
    },
    Float {
        token: Token,
        value: f64,
    },
    /// Purely imaginary literal such as `2.5i`.
    Complex {
        token: Token,
        imaginary: f64,
    },
    String {
        token: Token,
        value: String,
    },
    Array {
        token: Token,
        elements: Vec<Expr>,
    },
    Hash {
        token: Token,
        pairs: Vec<(Expr, Expr)>,
    },
    Function(Rc<FunctionLiteral>),
    Type {
        token: Token,
        name: String,
    },

    Prefix {
        token: Token,
        operator: TokenType,
        right: Box<Expr>,
    },
    Infix {
        token: Token,
        left: Box<Expr>,
        operator: TokenType,
        right: Box<Expr>,
    },
    If(IfExpression),
    Index {
        token: Token,
        left: Box<Expr>,
        index: Box<Expr>,
    },
    Dot {
        token: Token,
        left: Box<Expr>,
        name: Identifier,
    },
    Call {
        token: Token,
        function: Box<Expr>,
        arguments: Vec<Expr>,
    },
}

impl Expr {
    pub fn token(&self) -> &Token {
        match self {
            Expr::Identifier(identifier) => &identifier.token,
            Expr::Function(literal) => &literal.token,
            Expr::If(if_expression) => &if_expression.token,

            Expr::Boolean { token, .. }
            | Expr::Integer { token, .. }
            | Expr::Float { token, .. }
            | Expr::Complex { token, .. }
            | Expr::String { token, .. }
            | Expr::Array { token, .. }
            | Expr::Hash { token, .. }
            | Expr::Type { token, .. }
            | Expr::Prefix { token, .. }
            | Expr::Infix { token, .. }
            | Expr::Index { token, .. }
            | Expr::Dot { token, .. }
            | Expr::Call { token, .. } => token,
        }
    }
}

impl Display for Expr {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        match self {
            Expr::Identifier(identifier) => write!(f, "{}", identifier),
            Expr::Boolean { value, .. } => write!(f, "{}", value),
            Expr::Integer { token, .. }
            | Expr::Float { token, .. }
            | Expr::Complex { token, .. } => f.write_str(token.source()),
            Expr::String { value, .. } => write!(f, "{:?}", value),
            Expr::Array { elements, .. } => write!(f, "[{}]", join(elements, ", ")),
            Expr::Hash { pairs, .. } => write!(f, "{{{}}}", pairs.iter()
                .map(|(key, value)| format!("{}: {}", key, value))
                .collect::<Vec<String>>().join(", ")),
            Expr::Function(literal) => write!(f, "{}", literal),
            Expr::Type { name, .. } => f.write_str(name),

            Expr::Prefix { operator, right, .. } => write!(f, "({}{})", operator, right),
            Expr::Infix { left, operator, right, .. } => write!(f, "({} {} {})", left, operator, right),
            Expr::If(IfExpression { condition, consequence, alternative, .. }) => {
                write!(f, "if ({}) {}", condition, consequence)?;

                if let Some(alternative) = alternative {
                    write!(f, " else {}", alternative)?;
                }

                Ok(())
            },
            Expr::Index { left, index, .. } => write!(f, "({}[{}])", left, index),
            Expr::Dot { left, name, .. } => write!(f, "{}.{}", left, name.name),
            Expr::Call { function, arguments, .. } => write!(f, "{}({})", function, join(arguments, ", ")),
        }
    }
}
