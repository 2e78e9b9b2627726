use pretty_assertions::assert_eq;
use super::*;

mod lookup {
    use super::*;
    use pretty_assertions::assert_eq;

    #[test]
    pub fn test_inner_scope_shadows_outer() {
        let global = Environment::new_global();
        global.set("a", Object::Integer(1));

        let inner = Environment::new_with_parent(&global);
        assert_eq!(Some(Object::Integer(1)), inner.get("a"));

        inner.set("a", Object::Integer(2));
        assert_eq!(Some(Object::Integer(2)), inner.get("a"));
        assert_eq!(Some(Object::Integer(1)), global.get("a"));
        assert_eq!(None, inner.get("b"));
    }

    #[test]
    pub fn test_this_is_the_own_class() {
        let global = Environment::new_global();
        let inner = Environment::new_with_parent(&global);

        match (inner.get(THIS), global.get(THIS)) {
            (Some(Object::Class(inner_this)), Some(Object::Class(global_this))) => {
                assert!(Rc::ptr_eq(&inner_this, &inner.this()));
                assert!(!Rc::ptr_eq(&inner_this, &global_this));
            },
            other => panic!("expected classes, got {:?}", other),
        }
    }

    #[test]
    pub fn test_lookup_walks_every_scope() {
        let global = Environment::new_global();
        global.set("a", Object::Integer(1));
        let middle = Environment::new_with_parent(&global);
        let inner = Environment::new_with_parent(&middle);

        assert_eq!(Some(Object::Integer(1)), inner.get("a"));
        assert!(!inner.binds("a"));
        assert!(global.binds("a"));
    }
}

mod mutation {
    use super::*;
    use pretty_assertions::assert_eq;

    #[test]
    pub fn test_assign_writes_to_owning_scope() {
        let global = Environment::new_global();
        global.set("count", Object::Integer(0));
        let inner = Environment::new_with_parent(&global);

        assert!(inner.assign("count", Object::Integer(5)));
        assert_eq!(Some(Object::Integer(5)), global.get("count"));
        assert!(!inner.this().borrow().hash.contains_str("count"));
        assert!(!inner.assign("missing", Object::Null));
    }

    #[test]
    pub fn test_derive_from_class() {
        let mut base = Class::new();
        base.set_own_name("Base");
        base.hash.set_str("v", Object::Integer(1));

        let env = Environment::new_global();
        env.derive_from_class(&base);

        assert_eq!(Some(Object::Integer(1)), env.get("v"));
        assert!(env.this().borrow().instance_of("Base"));
    }
}
