use std::cell::RefCell;
use std::fmt::{Debug, Display, Formatter};
use std::rc::Rc;
use crate::interpreter::ast::FunctionLiteral;
use crate::interpreter::environment::Environment;
use crate::interpreter::error::RuntimeError;

pub mod class;
pub mod hash;
pub mod number;

pub use class::{Class, UNNAMED_CLASS};
pub use hash::{Hash, HashError, HashKey, HashPair};
pub use number::Complex;

#[cfg(test)]
mod tests;

pub const TRUE: Object = Object::Boolean(true);
pub const FALSE: Object = Object::Boolean(false);
pub const NULL: Object = Object::Null;

#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum ObjectType {
    Null,
    Undefined,
    Boolean,
    Integer,
    Float,
    Complex,
    String,
    Array,
    Hash,
    Function,
    Builtin,
    Class,
    Type,
    Error,
    ReturnValue,
    Break,
    Continue,
}

impl ObjectType {
    pub fn name(&self) -> &'static str {
        match self {
            ObjectType::Null => "NULL",
            ObjectType::Undefined => "UNDEFINED",
            ObjectType::Boolean => "BOOLEAN",
            ObjectType::Integer => "INTEGER",
            ObjectType::Float => "FLOAT",
            ObjectType::Complex => "COMPLEX",
            ObjectType::String => "STRING",
            ObjectType::Array => "ARRAY",
            ObjectType::Hash => "HASH",
            ObjectType::Function => "FUNCTION",
            ObjectType::Builtin => "BUILTIN",
            ObjectType::Class => "CLASS",
            ObjectType::Type => "TYPE",
            ObjectType::Error => "ERROR",
            ObjectType::ReturnValue => "RETURN_VALUE",
            ObjectType::Break => "BREAK",
            ObjectType::Continue => "CONTINUE",
        }
    }

    /// Whether a value of this type satisfies the type name used on the right of `instanceof`.
    pub fn matches_type_name(&self, type_name: &str) -> bool {
        match type_name {
            "any" => true,
            "number" => matches!(self, ObjectType::Integer | ObjectType::Float | ObjectType::Complex),
            "object" => matches!(self, ObjectType::Hash | ObjectType::Class),
            "string" => *self == ObjectType::String,
            "array" => *self == ObjectType::Array,
            "boolean" => *self == ObjectType::Boolean,
            "void" => matches!(self, ObjectType::Null | ObjectType::Undefined),
            other => self.name().eq_ignore_ascii_case(other),
        }
    }
}

impl Display for ObjectType {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.name())
    }
}

pub type BuiltinFunction = fn(&[Object]) -> Object;

#[derive(Clone, Copy)]
pub struct Builtin {
    pub name: &'static str,
    pub function: BuiltinFunction,
}

/// User function: the shared literal, its defining environment and a generated name
/// that instances returned from it are named after.
pub struct Function {
    pub literal: Rc<FunctionLiteral>,
    pub env: Rc<Environment>,
    pub name: String,
}

#[derive(Clone)]
pub enum Object {
    Null,
    Undefined,
    Boolean(bool),
    Integer(i64),
    Float(f64),
    Complex(Complex),
    String(String),
    Array(Rc<RefCell<Vec<Object>>>),
    Hash(Rc<RefCell<Hash>>),
    Function(Rc<Function>),
    Builtin(Builtin),
    Class(Rc<RefCell<Class>>),
    Type(String),

    Error(RuntimeError),
    ReturnValue(Box<Object>),
    Break,
    Continue,
}

impl Object {
    pub fn from_bool(value: bool) -> Object {
        if value { TRUE } else { FALSE }
    }

    pub fn new_array(elements: Vec<Object>) -> Object {
        Object::Array(Rc::new(RefCell::new(elements)))
    }

    pub fn new_hash(hash: Hash) -> Object {
        Object::Hash(Rc::new(RefCell::new(hash)))
    }

    pub fn object_type(&self) -> ObjectType {
        match self {
            Object::Null => ObjectType::Null,
            Object::Undefined => ObjectType::Undefined,
            Object::Boolean(_) => ObjectType::Boolean,
            Object::Integer(_) => ObjectType::Integer,
            Object::Float(_) => ObjectType::Float,
            Object::Complex(_) => ObjectType::Complex,
            Object::String(_) => ObjectType::String,
            Object::Array(_) => ObjectType::Array,
            Object::Hash(_) => ObjectType::Hash,
            Object::Function(_) => ObjectType::Function,
            Object::Builtin(_) => ObjectType::Builtin,
            Object::Class(_) => ObjectType::Class,
            Object::Type(_) => ObjectType::Type,
            Object::Error(_) => ObjectType::Error,
            Object::ReturnValue(_) => ObjectType::ReturnValue,
            Object::Break => ObjectType::Break,
            Object::Continue => ObjectType::Continue,
        }
    }

    pub fn is_error(&self) -> bool {
        matches!(self, Object::Error(_))
    }

    /// Only `false` and `null` are falsy.
    pub fn is_truthy(&self) -> bool {
        !matches!(self, Object::Null | Object::Boolean(false))
    }

    /// Hash key of a hashable value: Integer, Float, Complex, Boolean or String.
    pub fn hash_key(&self) -> Result<HashKey, HashError> {
        let digest = match self {
            Object::Integer(value) => *value as u64,
            Object::Float(value) => value.to_bits(),
            Object::Complex(value) => {
                let mut bytes = [0u8; 16];
                bytes[..8].copy_from_slice(&value.real.to_le_bytes());
                bytes[8..].copy_from_slice(&value.imaginary.to_le_bytes());
                hash::digest_bytes(&bytes)
            },
            Object::Boolean(value) => u64::from(*value),
            Object::String(value) => return Ok(HashKey::of_str(value)),
            other => return Err(HashError::Unhashable(other.object_type())),
        };

        Ok(HashKey { object_type: self.object_type(), digest })
    }

    /// Reference identity for containers and callables, value identity for the
    /// rest. Used by `==` and `!=` once no typed comparison applies.
    pub fn is_identical(&self, other: &Object) -> bool {
        match (self, other) {
            (Object::Null, Object::Null) | (Object::Undefined, Object::Undefined) => true,
            (Object::Boolean(a), Object::Boolean(b)) => a == b,
            (Object::Integer(a), Object::Integer(b)) => a == b,
            (Object::Float(a), Object::Float(b)) => a == b,
            (Object::Complex(a), Object::Complex(b)) => a == b,
            (Object::String(a), Object::String(b)) => a == b,
            (Object::Type(a), Object::Type(b)) => a == b,
            (Object::Array(a), Object::Array(b)) => Rc::ptr_eq(a, b),
            (Object::Hash(a), Object::Hash(b)) => Rc::ptr_eq(a, b),
            (Object::Class(a), Object::Class(b)) => Rc::ptr_eq(a, b),
            (Object::Function(a), Object::Function(b)) => Rc::ptr_eq(a, b),
            (Object::Builtin(a), Object::Builtin(b)) => a.name == b.name,
            _ => false,
        }
    }

    pub fn inspect(&self) -> String {
        self.render(&mut Vec::new())
    }

    /// `seen` holds the containers currently being rendered; revisiting one
    /// prints a placeholder instead of recursing.
    pub(crate) fn render(&self, seen: &mut Vec<*const ()>) -> String {
        match self {
            Object::Null => String::from("null"),
            Object::Undefined => String::from("undefined"),
            Object::Boolean(value) => value.to_string(),
            Object::Integer(value) => value.to_string(),
            Object::Float(value) => value.to_string(),
            Object::Complex(value) => value.to_string(),
            Object::String(value) => value.clone(),
            Object::Array(elements) => render_once(seen, Rc::as_ptr(elements) as *const (), |seen| {
                format!("[{}]", elements.borrow().iter()
                    .map(|element| element.render(seen))
                    .collect::<Vec<String>>().join(", "))
            }).unwrap_or_else(|| String::from("[...]")),
            Object::Hash(hash) => render_once(seen, Rc::as_ptr(hash) as *const (), |seen| hash.borrow().render(seen))
                .unwrap_or_else(|| String::from("{...}")),
            Object::Function(function) => format!("{} {}", function.name, function.literal),
            Object::Builtin(builtin) => format!("builtin function {}", builtin.name),
            Object::Class(class) => render_once(seen, Rc::as_ptr(class) as *const (), |seen| class.borrow().render(seen))
                .unwrap_or_else(|| format!("{}{{...}}", class.borrow().name())),
            Object::Type(name) => name.clone(),
            Object::Error(error) => format!("ERROR: {}", error),
            Object::ReturnValue(value) => value.render(seen),
            Object::Break => String::from("break"),
            Object::Continue => String::from("continue"),
        }
    }
}

fn render_once(seen: &mut Vec<*const ()>, container: *const (), render: impl FnOnce(&mut Vec<*const ()>) -> String) -> Option<String> {
    if seen.contains(&container) {
        return None;
    }

    seen.push(container);
    let result = render(seen);
    seen.pop();

    Some(result)
}

impl From<RuntimeError> for Object {
    fn from(error: RuntimeError) -> Self {
        Object::Error(error)
    }
}

impl Display for Object {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        f.write_str(&self.inspect())
    }
}

// Functions capture environments that may contain themselves.
impl Debug for Object {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        match self {
            Object::Function(function) => write!(f, "Function({})", function.name),
            Object::Error(error) => write!(f, "Error({:?})", error),
            other => write!(f, "{}({})", other.object_type(), other.inspect()),
        }
    }
}

impl PartialEq for Object {
    fn eq(&self, other: &Object) -> bool {
        match (self, other) {
            (Object::Error(a), Object::Error(b)) => a == b,
            (Object::ReturnValue(a), Object::ReturnValue(b)) => a == b,
            (Object::Break, Object::Break) | (Object::Continue, Object::Continue) => true,
            _ => self.is_identical(other),
        }
    }
}
