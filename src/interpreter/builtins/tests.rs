use pretty_assertions::assert_eq;
use super::*;
use crate::interpreter::object::{Hash, ObjectType, FALSE, TRUE};

fn call(name: &str, arguments: &[Object]) -> Object {
    let builtins = default_builtins();
    let builtin = builtins.get(name).unwrap_or_else(|| panic!("missing builtin {}", name));
    (builtin.function)(arguments)
}

fn hash_of(entries: &[(&str, i64)]) -> Object {
    let mut hash = Hash::new();

    for (key, value) in entries {
        hash.set_str(key, Object::Integer(*value));
    }

    Object::new_hash(hash)
}

#[test]
pub fn test_len() {
    assert_eq!(Object::Integer(5), call("len", &[Object::String("héllo".to_owned())]));
    assert_eq!(Object::Integer(2), call("len", &[Object::new_array(vec![NULL, NULL])]));
    assert_eq!(Object::Integer(1), call("len", &[hash_of(&[("a", 1)])]));
    assert_eq!(Object::Error(RuntimeError::UnsupportedArgument { name: "len", got: ObjectType::Integer }),
               call("len", &[Object::Integer(1)]));
    assert_eq!(Object::Error(RuntimeError::WrongArgumentCount { name: "len", got: 0, want: 1 }),
               call("len", &[]));
}

#[test]
pub fn test_keys_follow_insertion_order() {
    let keys = call("keys", &[hash_of(&[("z", 1), ("a", 2)])]);
    assert_eq!("[z, a]", keys.inspect());
}

#[test]
pub fn test_delete() {
    let hash = hash_of(&[("a", 1), ("b", 2)]);

    assert_eq!(TRUE, call("delete", &[hash.clone(), Object::String("a".to_owned())]));
    assert_eq!(FALSE, call("delete", &[hash.clone(), Object::String("a".to_owned())]));
    assert_eq!("{b: 2}", hash.inspect());
    assert_eq!(Object::Error(RuntimeError::UnusableAsHashKey(ObjectType::Null)), call("delete", &[hash, NULL]));
}

#[test]
pub fn test_puts_returns_null() {
    assert_eq!(NULL, call("puts", &[]));
}
