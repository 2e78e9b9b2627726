use std::rc::Rc;
use std::sync::atomic::{AtomicUsize, Ordering};
use tracing::{debug, trace};
use crate::interpreter::ast::{BlockStatement, Expr, FunctionLiteral, IfExpression, LetStatement, LoopStatement, Program, Stmt};
use crate::interpreter::builtins::Builtins;
use crate::interpreter::environment::Environment;
use crate::interpreter::error::RuntimeError;
use crate::interpreter::object::{Complex, Function, Hash, Object, NULL};
use crate::interpreter::token::TokenType;

#[cfg(test)]
mod tests;

/// Anything the evaluator accepts.
#[derive(Clone, Copy, Debug)]
pub enum Node<'a> {
    Program(&'a Program),
    Statement(&'a Stmt),
    Expression(&'a Expr),
}

impl<'a> From<&'a Program> for Node<'a> {
    fn from(program: &'a Program) -> Self {
        Node::Program(program)
    }
}

impl<'a> From<&'a Stmt> for Node<'a> {
    fn from(statement: &'a Stmt) -> Self {
        Node::Statement(statement)
    }
}

impl<'a> From<&'a Expr> for Node<'a> {
    fn from(expr: &'a Expr) -> Self {
        Node::Expression(expr)
    }
}

/// Shared by every evaluator so function names stay unique across separate
/// evaluations against the same environment.
static FUNCTION_COUNTER: AtomicUsize = AtomicUsize::new(0);

fn next_function_name() -> String {
    format!("function-{}", FUNCTION_COUNTER.fetch_add(1, Ordering::Relaxed) + 1)
}

fn error(error: RuntimeError) -> Object {
    trace!(%error, "Runtime error");
    Object::Error(error)
}

/// Tree-walking evaluator.
///
/// Statements that produce nothing (declarations, comments, loops) evaluate
/// to `None`. Runtime failures are ordinary [`Object::Error`] values that stop
/// evaluation of the enclosing blocks.
pub struct Evaluator {
    builtins: Builtins,
}

impl Evaluator {
    pub fn new(builtins: Builtins) -> Evaluator {
        Evaluator { builtins }
    }

    pub fn evaluate(&mut self, node: Node<'_>, env: &Rc<Environment>) -> Option<Object> {
        match node {
            Node::Program(program) => self.eval_program(program, env),
            Node::Statement(statement) => self.eval_statement(statement, env),
            Node::Expression(expr) => Some(self.eval_expression(expr, env)),
        }
    }

    pub fn eval_program(&mut self, program: &Program, env: &Rc<Environment>) -> Option<Object> {
        let mut result = None;

        for statement in &program.statements {
            result = self.eval_statement(statement, env);

            match result {
                Some(Object::ReturnValue(value)) => return Some(*value),
                Some(Object::Error(_)) => return result,
                _ => {},
            }
        }

        result
    }

    // Statements

    pub fn eval_statement(&mut self, statement: &Stmt, env: &Rc<Environment>) -> Option<Object> {
        match statement {
            Stmt::Let(statement) => self.eval_let_statement(statement, env),
            Stmt::Return { value, .. } => {
                let value = match value {
                    Some(value) => self.eval_expression(value, env),
                    None => NULL,
                };

                if value.is_error() {
                    return Some(value);
                }

                Some(Object::ReturnValue(Box::new(value)))
            },
            Stmt::Expression { expr, .. } => Some(self.eval_expression(expr, env)),
            Stmt::Block(block) => self.eval_block_statement(block, env),
            Stmt::Assign { target, value, .. } => Some(self.eval_assignment(target, value, env)),
            Stmt::Derive { expr, .. } => Some(self.eval_derive(expr, env)),
            Stmt::Comment(_) => None,
            Stmt::Loop(statement) => self.eval_loop_statement(statement, env),
            Stmt::Break(_) => Some(Object::Break),
            Stmt::Continue(_) => Some(Object::Continue),
        }
    }

    fn eval_let_statement(&mut self, statement: &LetStatement, env: &Rc<Environment>) -> Option<Object> {
        let value = match &statement.value {
            Some(value) => self.eval_expression(value, env),
            None => Object::Undefined,
        };

        if value.is_error() {
            return Some(value);
        }

        env.set(&statement.name.name, value);
        None
    }

    /// Runs statements in order, stopping at the first error, return, break or continue.
    pub fn eval_block_statement(&mut self, block: &BlockStatement, env: &Rc<Environment>) -> Option<Object> {
        let mut result = None;

        for statement in &block.statements {
            result = self.eval_statement(statement, env);

            if let Some(Object::Error(_) | Object::ReturnValue(_) | Object::Break | Object::Continue) = result {
                return result;
            }
        }

        result
    }

    fn eval_loop_statement(&mut self, statement: &LoopStatement, env: &Rc<Environment>) -> Option<Object> {
        let iterable = match &statement.binding.value {
            Some(value) => self.eval_expression(value, env),
            None => Object::Undefined,
        };

        let entries: Vec<(Object, Object)> = match &iterable {
            Object::Error(_) => return Some(iterable),
            Object::Hash(hash) => hash.borrow().iter()
                .map(|pair| (pair.key.clone(), pair.value.clone()))
                .collect(),
            Object::Class(class) => class.borrow().hash.iter()
                .map(|pair| (pair.key.clone(), pair.value.clone()))
                .collect(),
            Object::Array(elements) => elements.borrow().iter().enumerate()
                .map(|(index, value)| (Object::Integer(index as i64), value.clone()))
                .collect(),
            _ => return None,
        };

        for (index, (key, value)) in entries.into_iter().enumerate() {
            let loop_env = Environment::new_with_parent(env);
            let mut record = Hash::new();
            record.set_str("k", key);
            record.set_str("v", value);
            record.set_str("i", Object::Integer(index as i64));
            loop_env.set(&statement.binding.name.name, Object::new_hash(record));

            match self.eval_block_statement(&statement.body, &loop_env) {
                Some(Object::Break) => break,
                Some(result @ (Object::ReturnValue(_) | Object::Error(_))) => return Some(result),
                _ => {},
            }
        }

        None
    }

    fn eval_assignment(&mut self, target: &Expr, value: &Expr, env: &Rc<Environment>) -> Object {
        let value = self.eval_expression(value, env);

        if value.is_error() {
            return value;
        }

        match target {
            Expr::Identifier(identifier) => {
                if env.assign(&identifier.name, value.clone()) {
                    value
                } else {
                    error(RuntimeError::IdentifierNotFound(identifier.name.clone()))
                }
            },
            Expr::Dot { left, name, .. } => {
                let left = self.eval_expression(left, env);

                match &left {
                    Object::Error(_) => left,
                    Object::Hash(hash) => {
                        hash.borrow_mut().set_str(&name.name, value.clone());
                        value
                    },
                    Object::Class(class) => {
                        class.borrow_mut().hash.set_str(&name.name, value.clone());
                        value
                    },
                    other => error(RuntimeError::NotAssignable(other.object_type())),
                }
            },
            Expr::Index { left, index, .. } => {
                let left = self.eval_expression(left, env);

                if left.is_error() {
                    return left;
                }

                let index = self.eval_expression(index, env);

                if index.is_error() {
                    return index;
                }

                self.eval_index_assignment(left, index, value)
            },
            other => error(RuntimeError::InvalidAssignmentTarget(other.to_string())),
        }
    }

    fn eval_index_assignment(&mut self, left: Object, index: Object, value: Object) -> Object {
        match &left {
            Object::Array(elements) => {
                let position = match index {
                    Object::Integer(position) => position,
                    other => return error(RuntimeError::ArrayIndexNotInteger(other.object_type())),
                };

                let mut elements = elements.borrow_mut();
                let length = elements.len();

                match usize::try_from(position).ok().filter(|position| *position < length) {
                    Some(position) => {
                        elements[position] = value.clone();
                        value
                    },
                    None => error(RuntimeError::IndexOutOfRange { index: position, length }),
                }
            },
            Object::Hash(hash) => match hash.borrow_mut().set(index, value.clone()) {
                Ok(()) => value,
                Err(hash_error) => error(hash_error.into()),
            },
            Object::Class(class) => match class.borrow_mut().hash.set(index, value.clone()) {
                Ok(()) => value,
                Err(hash_error) => error(hash_error.into()),
            },
            other => error(RuntimeError::NotAssignable(other.object_type())),
        }
    }

    /// `...expr` copies the members of a hash or class into the current scope.
    #[tracing::instrument(level = "trace", skip_all)]
    fn eval_derive(&mut self, expr: &Expr, env: &Rc<Environment>) -> Object {
        let source = self.eval_expression(expr, env);

        match &source {
            Object::Error(_) => {},
            Object::Hash(hash) => {
                let hash = hash.borrow().clone();
                env.derive_from_hash(&hash);
            },
            Object::Class(class) => {
                // Snapshot first: deriving from `this` borrows the same class.
                let class = class.borrow().clone();
                trace!(from = class.name(), "Deriving from class");
                env.derive_from_class(&class);
            },
            other => return error(RuntimeError::DeriveRequiresHash(other.object_type())),
        }

        source
    }

    // Expressions

    pub fn eval_expression(&mut self, expr: &Expr, env: &Rc<Environment>) -> Object {
        match expr {
            Expr::Identifier(identifier) => self.eval_identifier(&identifier.name, env),
            Expr::Boolean { value, .. } => Object::from_bool(*value),
            Expr::Integer { value, .. } => Object::Integer(*value),
            Expr::Float { value, .. } => Object::Float(*value),
            Expr::Complex { imaginary, .. } => Object::Complex(Complex::new(0.0, *imaginary)),
            Expr::String { value, .. } => Object::String(value.clone()),
            Expr::Type { name, .. } => Object::Type(name.clone()),
            Expr::Array { elements, .. } => match self.eval_expressions(elements, env) {
                Ok(elements) => Object::new_array(elements),
                Err(error) => error,
            },
            Expr::Hash { pairs, .. } => self.eval_hash_literal(pairs, env),
            Expr::Function(literal) => self.eval_function_literal(literal, env),

            Expr::Prefix { operator, right, .. } => {
                let right = self.eval_expression(right, env);

                if right.is_error() {
                    return right;
                }

                eval_prefix_expression(*operator, right)
            },
            Expr::Infix { left, operator, right, .. } => {
                let left = self.eval_expression(left, env);

                if left.is_error() {
                    return left;
                }

                let right = self.eval_expression(right, env);

                if right.is_error() {
                    return right;
                }

                eval_infix_expression(*operator, left, right)
            },
            Expr::If(if_expression) => self.eval_if_expression(if_expression, env),
            Expr::Index { left, index, .. } => {
                let left = self.eval_expression(left, env);

                if left.is_error() {
                    return left;
                }

                let index = self.eval_expression(index, env);

                if index.is_error() {
                    return index;
                }

                eval_index_expression(&left, &index)
            },
            Expr::Dot { left, name, .. } => {
                let left = self.eval_expression(left, env);

                match &left {
                    Object::Error(_) => left,
                    Object::Hash(hash) => hash.borrow().get_str(&name.name).cloned().unwrap_or(Object::Undefined),
                    Object::Class(class) => class.borrow().hash.get_str(&name.name).cloned().unwrap_or(Object::Undefined),
                    other => error(RuntimeError::NotAHash(other.object_type())),
                }
            },
            Expr::Call { function, arguments, .. } => {
                let function = self.eval_expression(function, env);

                if function.is_error() {
                    return function;
                }

                match self.eval_expressions(arguments, env) {
                    Ok(arguments) => self.apply_function(function, arguments),
                    Err(error) => error,
                }
            },
        }
    }

    fn eval_identifier(&self, name: &str, env: &Rc<Environment>) -> Object {
        if let Some(value) = env.get(name) {
            return value;
        }

        match self.builtins.get(name) {
            Some(builtin) => Object::Builtin(*builtin),
            None => error(RuntimeError::IdentifierNotFound(name.to_owned())),
        }
    }

    /// Evaluates left to right, stopping at the first error.
    fn eval_expressions(&mut self, exprs: &[Expr], env: &Rc<Environment>) -> Result<Vec<Object>, Object> {
        let mut result = Vec::with_capacity(exprs.len());

        for expr in exprs {
            let value = self.eval_expression(expr, env);

            if value.is_error() {
                return Err(value);
            }

            result.push(value);
        }

        Ok(result)
    }

    fn eval_hash_literal(&mut self, pairs: &[(Expr, Expr)], env: &Rc<Environment>) -> Object {
        let mut hash = Hash::new();

        for (key, value) in pairs {
            let key = self.eval_expression(key, env);

            if key.is_error() {
                return key;
            }

            let value = self.eval_expression(value, env);

            if value.is_error() {
                return value;
            }

            if let Err(hash_error) = hash.set(key, value) {
                return error(hash_error.into());
            }
        }

        Object::new_hash(hash)
    }

    fn eval_function_literal(&self, literal: &Rc<FunctionLiteral>, env: &Rc<Environment>) -> Object {
        Object::Function(Rc::new(Function {
            literal: Rc::clone(literal),
            env: Rc::clone(env),
            name: next_function_name(),
        }))
    }

    fn eval_if_expression(&mut self, if_expression: &IfExpression, env: &Rc<Environment>) -> Object {
        let condition = self.eval_expression(&if_expression.condition, env);

        if condition.is_error() {
            return condition;
        }

        let branch = if condition.is_truthy() {
            Some(&if_expression.consequence)
        } else {
            if_expression.alternative.as_ref()
        };

        branch.and_then(|block| self.eval_block_statement(block, env))
            .unwrap_or(NULL)
    }

    #[tracing::instrument(level = "trace", skip_all, fields(callee = %function.object_type(), arguments = arguments.len()))]
    pub fn apply_function(&mut self, function: Object, arguments: Vec<Object>) -> Object {
        match function {
            Object::Function(function) => {
                let call_env = Environment::new_with_parent(&function.env);
                let mut arguments = arguments.into_iter();

                for parameter in &function.literal.parameters {
                    call_env.set(&parameter.name, arguments.next().unwrap_or(Object::Undefined));
                }

                let result = match self.eval_block_statement(&function.literal.body, &call_env) {
                    Some(Object::ReturnValue(value)) => *value,
                    Some(Object::Break | Object::Continue) | None => NULL,
                    Some(result) => result,
                };

                if let Object::Class(class) = &result {
                    if class.borrow_mut().set_own_name(&function.name) {
                        debug!(name = %function.name, "Named class");
                    }
                }

                result
            },
            Object::Builtin(builtin) => (builtin.function)(&arguments),
            other => error(RuntimeError::NotAFunction(other.object_type())),
        }
    }
}

fn eval_prefix_expression(operator: TokenType, right: Object) -> Object {
    match (operator, &right) {
        (TokenType::Not, _) => Object::from_bool(!right.is_truthy()),
        (TokenType::Minus, Object::Integer(value)) => Object::Integer(value.wrapping_neg()),
        (TokenType::Minus, Object::Float(value)) => Object::Float(-value),
        (TokenType::Minus, Object::Complex(value)) => Object::Complex(-*value),
        _ => error(RuntimeError::UnknownPrefixOperator { operator, right: right.object_type() }),
    }
}

fn eval_infix_expression(operator: TokenType, left: Object, right: Object) -> Object {
    let left_type = left.object_type();
    let right_type = right.object_type();
    let unknown = move || error(RuntimeError::UnknownInfixOperator { left: left_type, operator, right: right_type });

    let typed = match (&left, &right) {
        (Object::Integer(l), Object::Integer(r)) => Some(eval_integer_infix(operator, *l, *r)),
        (Object::Float(l), Object::Float(r)) => Some(eval_float_infix(operator, *l, *r)),
        (Object::Integer(l), Object::Float(r)) => Some(eval_float_infix(operator, *l as f64, *r)),
        (Object::Float(l), Object::Integer(r)) => Some(eval_float_infix(operator, *l, *r as f64)),
        (Object::Complex(l), Object::Complex(r)) => Some(eval_complex_infix(operator, *l, *r)),
        (Object::Complex(l), Object::Integer(r)) => Some(eval_complex_infix(operator, *l, Complex::from(*r))),
        (Object::Complex(l), Object::Float(r)) => Some(eval_complex_infix(operator, *l, Complex::from(*r))),
        (Object::Integer(l), Object::Complex(r)) => Some(eval_complex_infix(operator, Complex::from(*l), *r)),
        (Object::Float(l), Object::Complex(r)) => Some(eval_complex_infix(operator, Complex::from(*l), *r)),
        (Object::String(l), Object::String(r)) => Some(eval_string_infix(operator, l, r)),
        _ => None,
    };

    if let Some(result) = typed {
        return result.unwrap_or_else(unknown);
    }

    match operator {
        TokenType::InstanceOf => eval_instance_of(&left, &right),
        TokenType::Plus if is_concatenable(&left, &right) => Object::String(format!("{}{}", left.inspect(), right.inspect())),
        TokenType::Equal => Object::from_bool(left.is_identical(&right)),
        TokenType::NotEqual => Object::from_bool(!left.is_identical(&right)),
        _ if left_type != right_type => error(RuntimeError::TypeMismatch { left: left_type, operator, right: right_type }),
        _ => unknown(),
    }
}

fn is_scalar(object: &Object) -> bool {
    matches!(object, Object::Null | Object::Undefined | Object::Boolean(_)
        | Object::Integer(_) | Object::Float(_) | Object::Complex(_) | Object::Type(_))
}

/// A string on one side and a scalar on the other.
fn is_concatenable(left: &Object, right: &Object) -> bool {
    match (left, right) {
        (Object::String(_), other) | (other, Object::String(_)) => is_scalar(other),
        _ => false,
    }
}

fn eval_integer_infix(operator: TokenType, left: i64, right: i64) -> Option<Object> {
    Some(match operator {
        TokenType::Plus => Object::Integer(left.wrapping_add(right)),
        TokenType::Minus => Object::Integer(left.wrapping_sub(right)),
        TokenType::Multiply => Object::Integer(left.wrapping_mul(right)),
        TokenType::Divide if right == 0 => error(RuntimeError::DivisionByZero),
        TokenType::Divide => Object::Integer(left.wrapping_div(right)),
        _ => return compare(operator, &left, &right),
    })
}

fn eval_float_infix(operator: TokenType, left: f64, right: f64) -> Option<Object> {
    Some(match operator {
        TokenType::Plus => Object::Float(left + right),
        TokenType::Minus => Object::Float(left - right),
        TokenType::Multiply => Object::Float(left * right),
        TokenType::Divide => Object::Float(left / right),
        _ => return compare(operator, &left, &right),
    })
}

fn eval_complex_infix(operator: TokenType, left: Complex, right: Complex) -> Option<Object> {
    Some(match operator {
        TokenType::Plus => Object::Complex(left + right),
        TokenType::Minus => Object::Complex(left - right),
        TokenType::Multiply => Object::Complex(left * right),
        TokenType::Divide => Object::Complex(left / right),
        TokenType::Equal => Object::from_bool(left == right),
        TokenType::NotEqual => Object::from_bool(left != right),
        _ => return None,
    })
}

fn eval_string_infix(operator: TokenType, left: &str, right: &str) -> Option<Object> {
    match operator {
        TokenType::Plus => Some(Object::String(format!("{}{}", left, right))),
        _ => compare(operator, left, right),
    }
}

fn compare<T: PartialOrd + ?Sized>(operator: TokenType, left: &T, right: &T) -> Option<Object> {
    let result = match operator {
        TokenType::Less => left < right,
        TokenType::Greater => left > right,
        TokenType::LessEqual => left <= right,
        TokenType::GreaterEqual => left >= right,
        TokenType::Equal => left == right,
        TokenType::NotEqual => left != right,
        _ => return None,
    };

    Some(Object::from_bool(result))
}

fn eval_instance_of(left: &Object, right: &Object) -> Object {
    match (left, right) {
        (Object::Class(class), Object::Function(function)) => Object::from_bool(class.borrow().instance_of(&function.name)),
        (_, Object::Type(type_name)) => Object::from_bool(left.object_type().matches_type_name(type_name)),
        (_, Object::Function(_)) => Object::from_bool(false),
        _ => error(RuntimeError::InvalidInstanceOf(right.object_type())),
    }
}

fn eval_index_expression(left: &Object, index: &Object) -> Object {
    match (left, index) {
        (Object::Array(elements), Object::Integer(position)) => {
            let elements = elements.borrow();

            usize::try_from(*position).ok()
                .and_then(|position| elements.get(position))
                .cloned()
                .unwrap_or(NULL)
        },
        (Object::Hash(hash), _) => lookup(&hash.borrow(), index),
        (Object::Class(class), _) => lookup(&class.borrow().hash, index),
        _ => error(RuntimeError::IndexNotSupported(left.object_type())),
    }
}

/// Missing keys read as `undefined`.
fn lookup(hash: &Hash, key: &Object) -> Object {
    match hash.get(key) {
        Ok(value) => value.cloned().unwrap_or(Object::Undefined),
        Err(hash_error) => error(hash_error.into()),
    }
}
