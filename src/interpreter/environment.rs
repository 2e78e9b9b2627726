use std::cell::RefCell;
use std::fmt::{Debug, Formatter};
use std::rc::Rc;
use crate::interpreter::object::{Class, Hash, Object};

#[cfg(test)]
mod tests;

pub const THIS: &str = "this";

/// A lexical scope. Its bindings live in its own [`Class`], which is what `this`
/// resolves to inside the scope.
///
/// Closures keep their defining scope alive, so the outer link is a strong reference.
pub struct Environment {
    this: Rc<RefCell<Class>>,
    outer: Option<Rc<Environment>>,
}

impl Environment {
    pub fn new_global() -> Rc<Environment> {
        Rc::new(Environment {
            this: Rc::new(RefCell::new(Class::new())),
            outer: None,
        })
    }

    pub fn new_with_parent(outer: &Rc<Environment>) -> Rc<Environment> {
        Rc::new(Environment {
            this: Rc::new(RefCell::new(Class::new())),
            outer: Some(Rc::clone(outer)),
        })
    }

    pub fn this(&self) -> Rc<RefCell<Class>> {
        Rc::clone(&self.this)
    }

    /// Looks `name` up through the scope chain. `this` always resolves to the
    /// innermost scope's own class.
    pub fn get(&self, name: &str) -> Option<Object> {
        if name == THIS {
            return Some(Object::Class(self.this()));
        }

        let found = self.this.borrow().hash.get_str(name).cloned();
        found.or_else(|| self.outer.as_ref().and_then(|outer| outer.get(name)))
    }

    /// Whether this scope itself binds `name`, ignoring outer scopes.
    pub fn binds(&self, name: &str) -> bool {
        self.this.borrow().hash.contains_str(name)
    }

    /// Binds `name` in this scope, shadowing any outer binding.
    pub fn set(&self, name: &str, value: Object) -> Object {
        self.this.borrow_mut().hash.set_str(name, value.clone());
        value
    }

    /// Rebinds `name` in the nearest scope that already binds it. Returns `false`
    /// when no scope does.
    pub fn assign(&self, name: &str, value: Object) -> bool {
        if self.binds(name) {
            self.this.borrow_mut().hash.set_str(name, value);
            return true;
        }

        match &self.outer {
            Some(outer) => outer.assign(name, value),
            None => false,
        }
    }

    /// Copies the string-keyed entries of `hash` into this scope.
    pub fn derive_from_hash(&self, hash: &Hash) {
        self.this.borrow_mut().hash.merge(hash);
    }

    /// Copies the members and ancestry of `class` into this scope.
    pub fn derive_from_class(&self, class: &Class) {
        self.this.borrow_mut().derive_from(class);
    }
}

impl Debug for Environment {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Environment")
            .field("bindings", &self.this.borrow().hash.len())
            .field("has_outer", &self.outer.is_some())
            .finish()
    }
}
