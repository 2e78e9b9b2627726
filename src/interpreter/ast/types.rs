use std::fmt::{Display, Formatter};
use crate::interpreter::ast::{join, Identifier};
use crate::interpreter::token::Token;

/// Declared type annotation. Parsed and kept on the tree, never enforced.
#[derive(Clone, Debug, PartialEq)]
pub enum TypeNode {
    Simple {
        token: Token,
        name: String,
    },
    Array {
        token: Token,
        element: Box<TypeNode>,
    },
    /// `{[key: K]: V}`
    Map {
        token: Token,
        key: Box<TypeNode>,
        value: Box<TypeNode>,
    },
    /// `{a: T, b: U}`
    Object {
        token: Token,
        properties: Vec<ObjectProperty>,
    },
    Function {
        token: Token,
        parameters: Vec<Identifier>,
        return_type: Box<TypeNode>,
    },
}

#[derive(Clone, Debug, PartialEq)]
pub struct ObjectProperty {
    pub name: Token,
    pub property_type: TypeNode,
}

impl TypeNode {
    pub fn token(&self) -> &Token {
        match self {
            TypeNode::Simple { token, .. } => token,
            TypeNode::Array { token, .. } => token,
            TypeNode::Map { token, .. } => token,
            TypeNode::Object { token, .. } => token,
            TypeNode::Function { token, .. } => token,
        }
    }
}

impl Display for ObjectProperty {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}: {}", self.name.source(), self.property_type)
    }
}

impl Display for TypeNode {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        match self {
            TypeNode::Simple { name, .. } => f.write_str(name),
            TypeNode::Array { element, .. } => write!(f, "{}[]", element),
            TypeNode::Map { key, value, .. } => write!(f, "{{[key: {}]: {}}}", key, value),
            TypeNode::Object { properties, .. } => write!(f, "{{{}}}", join(properties, ", ")),
            TypeNode::Function { parameters, return_type, .. } =>
                write!(f, "({}) => {}", join(parameters, ", "), return_type),
        }
    }
}
