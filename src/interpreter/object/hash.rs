use std::fmt::{Display, Formatter};
use std::hash::Hasher;
use rustc_hash::{FxHashMap, FxHasher};
use thiserror::Error;
use crate::interpreter::object::{Object, ObjectType};

/// Identity of a hashable value: its type tag plus a 64-bit digest.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub struct HashKey {
    pub object_type: ObjectType,
    pub digest: u64,
}

impl HashKey {
    pub fn of_str(value: &str) -> HashKey {
        HashKey { object_type: ObjectType::String, digest: digest_bytes(value.as_bytes()) }
    }
}

pub(crate) fn digest_bytes(bytes: &[u8]) -> u64 {
    let mut hasher = FxHasher::default();
    hasher.write(bytes);
    hasher.finish()
}

#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum HashError {
    #[error("unusable as hash key: {0}")]
    Unhashable(ObjectType),
}

#[derive(Clone, Debug)]
pub struct HashPair {
    pub key: Object,
    pub value: Object,
}

/// Insertion-ordered map from hashable objects to objects.
///
/// Re-setting an existing key replaces its value in place; iteration always
/// follows first-insertion order.
#[derive(Clone, Debug, Default)]
pub struct Hash {
    pairs: FxHashMap<HashKey, HashPair>,
    order: Vec<HashKey>,
}

impl Hash {
    pub fn new() -> Hash {
        Hash::default()
    }

    pub fn len(&self) -> usize {
        self.order.len()
    }

    pub fn is_empty(&self) -> bool {
        self.order.is_empty()
    }

    pub fn set(&mut self, key: Object, value: Object) -> Result<(), HashError> {
        let hash_key = key.hash_key()?;
        self.insert(hash_key, HashPair { key, value });
        Ok(())
    }

    pub fn get(&self, key: &Object) -> Result<Option<&Object>, HashError> {
        let hash_key = key.hash_key()?;
        Ok(self.pairs.get(&hash_key).map(|pair| &pair.value))
    }

    /// Removes `key`, returning whether it was present.
    pub fn delete(&mut self, key: &Object) -> Result<bool, HashError> {
        let hash_key = key.hash_key()?;

        if self.pairs.remove(&hash_key).is_none() {
            return Ok(false);
        }

        self.order.retain(|key| *key != hash_key);
        Ok(true)
    }

    pub fn get_str(&self, name: &str) -> Option<&Object> {
        self.pairs.get(&HashKey::of_str(name)).map(|pair| &pair.value)
    }

    pub fn set_str(&mut self, name: &str, value: Object) {
        self.insert(HashKey::of_str(name), HashPair { key: Object::String(name.to_owned()), value });
    }

    pub fn contains_str(&self, name: &str) -> bool {
        self.pairs.contains_key(&HashKey::of_str(name))
    }

    /// Copies every string-keyed entry of `other` into this hash.
    pub fn merge(&mut self, other: &Hash) {
        for pair in other.iter() {
            if let Object::String(_) = pair.key {
                if let Ok(hash_key) = pair.key.hash_key() {
                    self.insert(hash_key, pair.clone());
                }
            }
        }
    }

    /// Visits entries in insertion order until `visit` returns `false`.
    pub fn range(&self, mut visit: impl FnMut(&Object, &Object) -> bool) {
        for pair in self.iter() {
            if !visit(&pair.key, &pair.value) {
                break;
            }
        }
    }

    pub fn iter(&self) -> impl Iterator<Item = &HashPair> {
        self.order.iter().filter_map(|key| self.pairs.get(key))
    }

    pub fn keys(&self) -> impl Iterator<Item = &Object> {
        self.iter().map(|pair| &pair.key)
    }

    fn insert(&mut self, hash_key: HashKey, pair: HashPair) {
        if self.pairs.insert(hash_key, pair).is_none() {
            self.order.push(hash_key);
        }
    }
}

impl Hash {
    pub(crate) fn render(&self, seen: &mut Vec<*const ()>) -> String {
        format!("{{{}}}", self.iter()
            .map(|pair| format!("{}: {}", pair.key.render(seen), pair.value.render(seen)))
            .collect::<Vec<String>>().join(", "))
    }
}

impl Display for Hash {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        f.write_str(&self.render(&mut Vec::new()))
    }
}
