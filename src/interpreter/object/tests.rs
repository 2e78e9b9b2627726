use pretty_assertions::assert_eq;
use super::*;

fn string(value: &str) -> Object {
    Object::String(value.to_owned())
}

mod hashes {
    use super::*;
    use pretty_assertions::assert_eq;

    #[test]
    pub fn test_insertion_order_survives_reset() {
        let mut hash = Hash::new();
        hash.set(string("b"), Object::Integer(1)).unwrap();
        hash.set(Object::Integer(7), Object::Integer(2)).unwrap();
        hash.set(string("a"), Object::Integer(3)).unwrap();
        hash.set(string("b"), Object::Integer(4)).unwrap();

        assert_eq!(3, hash.len());
        assert_eq!(vec![string("b"), Object::Integer(7), string("a")], hash.keys().cloned().collect::<Vec<Object>>());
        assert_eq!(Some(&Object::Integer(4)), hash.get(&string("b")).unwrap());
        assert_eq!("{b: 4, 7: 2, a: 3}", hash.to_string());
    }

    #[test]
    pub fn test_delete() {
        let mut hash = Hash::new();
        hash.set(string("x"), Object::Integer(1)).unwrap();
        hash.set(string("y"), Object::Integer(2)).unwrap();

        assert_eq!(Ok(true), hash.delete(&string("x")));
        assert_eq!(Ok(false), hash.delete(&string("x")));
        assert_eq!(vec![string("y")], hash.keys().cloned().collect::<Vec<Object>>());
        assert_eq!(Ok(None), hash.get(&string("x")));
    }

    #[test]
    pub fn test_keys_are_typed() {
        let mut hash = Hash::new();
        hash.set(Object::Integer(1), string("int")).unwrap();
        hash.set(TRUE, string("bool")).unwrap();
        hash.set(Object::Float(1.0), string("float")).unwrap();

        assert_eq!(3, hash.len());
        assert_eq!(Some(&string("bool")), hash.get(&TRUE).unwrap());
        assert_eq!(Some(&string("int")), hash.get(&Object::Integer(1)).unwrap());
    }

    #[test]
    pub fn test_unhashable_keys() {
        let mut hash = Hash::new();

        assert_eq!(Err(HashError::Unhashable(ObjectType::Array)), hash.set(Object::new_array(vec![]), NULL));
        assert_eq!(Err(HashError::Unhashable(ObjectType::Null)), hash.get(&NULL).map(|value| value.cloned()));
        assert!(hash.is_empty());
    }

    #[test]
    pub fn test_merge_copies_string_keys_only() {
        let mut source = Hash::new();
        source.set(string("a"), Object::Integer(1)).unwrap();
        source.set(Object::Integer(2), Object::Integer(2)).unwrap();

        let mut target = Hash::new();
        target.set(string("a"), Object::Integer(0)).unwrap();
        target.set(string("z"), Object::Integer(9)).unwrap();
        target.merge(&source);

        assert_eq!("{a: 1, z: 9}", target.to_string());
    }

    #[test]
    pub fn test_range_stops_early() {
        let mut hash = Hash::new();

        for name in ["a", "b", "c"] {
            hash.set_str(name, NULL);
        }

        let mut visited = Vec::new();
        hash.range(|key, _| {
            visited.push(key.inspect());
            key.inspect() != "b"
        });

        assert_eq!(vec!["a", "b"], visited);
    }
}

mod classes {
    use super::*;
    use pretty_assertions::assert_eq;

    #[test]
    pub fn test_name_is_write_once() {
        let mut class = Class::new();
        assert_eq!(UNNAMED_CLASS, class.name());

        assert!(class.set_own_name("function-1"));
        assert!(!class.set_own_name("function-2"));
        assert_eq!("function-1", class.name());
    }

    #[test]
    pub fn test_derive_accumulates_ancestors() {
        let mut a = Class::new();
        a.set_own_name("A");
        a.hash.set_str("x", Object::Integer(1));

        let mut b = Class::new();
        b.derive_from(&a);
        b.set_own_name("B");
        b.hash.set_str("y", Object::Integer(2));

        let mut c = Class::new();
        c.derive_from(&b);
        c.set_own_name("C");

        assert!(c.instance_of("A"));
        assert!(c.instance_of("B"));
        assert!(c.instance_of("C"));
        assert!(!c.instance_of("D"));
        assert_eq!("{x: 1, y: 2}", c.hash.to_string());
        assert_eq!("C{x: 1, y: 2} from (A,B)", c.to_string());
    }

    #[test]
    pub fn test_unnamed_source_adds_no_ancestor() {
        let mut c = Class::new();
        c.derive_from(&Class::new());

        assert!(c.ancestors().is_empty());
    }
}

mod objects {
    use super::*;
    use pretty_assertions::assert_eq;

    #[test]
    pub fn test_truthiness() {
        assert!(!FALSE.is_truthy());
        assert!(!NULL.is_truthy());
        assert!(TRUE.is_truthy());
        assert!(Object::Integer(0).is_truthy());
        assert!(string("").is_truthy());
        assert!(Object::Undefined.is_truthy());
    }

    #[test]
    pub fn test_type_names() {
        assert!(ObjectType::Float.matches_type_name("number"));
        assert!(ObjectType::Class.matches_type_name("object"));
        assert!(ObjectType::Array.matches_type_name("any"));
        assert!(!ObjectType::String.matches_type_name("number"));
    }

    #[test]
    pub fn test_inspect() {
        assert_eq!("[1, hello, null]", Object::new_array(vec![Object::Integer(1), string("hello"), NULL]).inspect());
        assert_eq!("2.5", Object::Float(2.5).inspect());
        assert_eq!("undefined", Object::Undefined.inspect());
        assert_eq!("ERROR: identifier not found: x",
                   Object::from(RuntimeError::IdentifierNotFound("x".to_owned())).inspect());
    }

    #[test]
    pub fn test_inspect_cycles() {
        let hash = Object::new_hash(Hash::new());

        if let Object::Hash(inner) = &hash {
            inner.borrow_mut().set_str("me", hash.clone());
            inner.borrow_mut().set_str("list", Object::new_array(vec![hash.clone()]));
        }

        assert_eq!("{me: {...}, list: [{...}]}", hash.inspect());

        let class = Rc::new(RefCell::new(Class::new()));
        class.borrow_mut().set_own_name("Node");
        class.borrow_mut().hash.set_str("me", Object::Class(Rc::clone(&class)));

        assert_eq!("Node{me: Node{...}} from ()", Object::Class(class).inspect());
    }

    #[test]
    pub fn test_shared_values_render_in_full() {
        let shared = Object::new_array(vec![Object::Integer(1)]);
        assert_eq!("[[1], [1]]", Object::new_array(vec![shared.clone(), shared]).inspect());
    }
}
