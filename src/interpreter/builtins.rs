use rustc_hash::FxHashMap;
use crate::interpreter::error::RuntimeError;
use crate::interpreter::object::{Builtin, Object, NULL};

#[cfg(test)]
mod tests;

/// Host functions looked up after the environment chain misses.
pub type Builtins = FxHashMap<&'static str, Builtin>;

/// The table the command line driver evaluates with.
pub fn default_builtins() -> Builtins {
    let mut builtins = Builtins::default();

    for builtin in [
        Builtin { name: "puts", function: puts },
        Builtin { name: "len", function: len },
        Builtin { name: "keys", function: keys },
        Builtin { name: "delete", function: delete },
    ] {
        builtins.insert(builtin.name, builtin);
    }

    builtins
}

fn check_arguments(name: &'static str, arguments: &[Object], want: usize) -> Result<(), Object> {
    if arguments.len() != want {
        return Err(Object::Error(RuntimeError::WrongArgumentCount { name, got: arguments.len(), want }));
    }

    Ok(())
}

fn puts(arguments: &[Object]) -> Object {
    for argument in arguments {
        println!("{}", argument.inspect());
    }

    NULL
}

fn len(arguments: &[Object]) -> Object {
    if let Err(error) = check_arguments("len", arguments, 1) {
        return error;
    }

    let length = match &arguments[0] {
        Object::String(value) => value.chars().count(),
        Object::Array(elements) => elements.borrow().len(),
        Object::Hash(hash) => hash.borrow().len(),
        Object::Class(class) => class.borrow().hash.len(),
        other => return Object::Error(RuntimeError::UnsupportedArgument { name: "len", got: other.object_type() }),
    };

    Object::Integer(length as i64)
}

fn keys(arguments: &[Object]) -> Object {
    if let Err(error) = check_arguments("keys", arguments, 1) {
        return error;
    }

    let keys = match &arguments[0] {
        Object::Hash(hash) => hash.borrow().keys().cloned().collect(),
        Object::Class(class) => class.borrow().hash.keys().cloned().collect(),
        other => return Object::Error(RuntimeError::UnsupportedArgument { name: "keys", got: other.object_type() }),
    };

    Object::new_array(keys)
}

fn delete(arguments: &[Object]) -> Object {
    if let Err(error) = check_arguments("delete", arguments, 2) {
        return error;
    }

    let result = match &arguments[0] {
        Object::Hash(hash) => hash.borrow_mut().delete(&arguments[1]),
        Object::Class(class) => class.borrow_mut().hash.delete(&arguments[1]),
        other => return Object::Error(RuntimeError::UnsupportedArgument { name: "delete", got: other.object_type() }),
    };

    match result {
        Ok(deleted) => Object::from_bool(deleted),
        Err(error) => Object::Error(error.into()),
    }
}
