use std::collections::BTreeSet;
use std::fmt::{Display, Formatter};
use crate::interpreter::object::Hash;

pub const UNNAMED_CLASS: &str = "$unnamed";

/// A scope's own bindings, doubling as an object value (`this`).
///
/// The name is assigned once, by the first function call that returns the
/// class. Ancestors accumulate through derivation and are never removed.
#[derive(Clone, Debug)]
pub struct Class {
    pub hash: Hash,
    name: String,
    ancestors: BTreeSet<String>,
}

impl Class {
    pub fn new() -> Class {
        Class {
            hash: Hash::new(),
            name: UNNAMED_CLASS.to_owned(),
            ancestors: BTreeSet::new(),
        }
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn is_named(&self) -> bool {
        self.name != UNNAMED_CLASS
    }

    pub fn ancestors(&self) -> &BTreeSet<String> {
        &self.ancestors
    }

    /// Names this class unless it already carries a name. Returns whether the name was set.
    pub fn set_own_name(&mut self, name: &str) -> bool {
        if self.is_named() {
            return false;
        }

        self.name = name.to_owned();
        true
    }

    pub fn instance_of(&self, name: &str) -> bool {
        self.name == name || self.ancestors.contains(name)
    }

    /// Copies the string-keyed members of `other` and inherits its ancestry.
    pub fn derive_from(&mut self, other: &Class) {
        self.hash.merge(&other.hash);
        self.ancestors.extend(other.ancestors.iter().cloned());

        if other.is_named() {
            self.ancestors.insert(other.name.clone());
        }
    }
}

impl Default for Class {
    fn default() -> Self {
        Class::new()
    }
}

impl Class {
    pub(crate) fn render(&self, seen: &mut Vec<*const ()>) -> String {
        format!("{}{} from ({})", self.name, self.hash.render(seen), self.ancestors.iter()
            .map(String::as_str)
            .collect::<Vec<&str>>().join(","))
    }
}

impl Display for Class {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        f.write_str(&self.render(&mut Vec::new()))
    }
}
