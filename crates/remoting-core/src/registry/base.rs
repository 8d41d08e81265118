//! Insertion-ordered registry.

use std::collections::HashMap;
use std::fmt::Display;
use std::hash::Hash;

use remoting_protocols::RegistryError;

/// Registry keyed by `K` that remembers registration order.
///
/// Mounting routes in the order they were bound keeps the served surface
/// deterministic, which a plain hash map would not.
pub struct OrderedRegistry<K, V> {
    entries: Vec<(K, V)>,
    index: HashMap<K, usize>,
}

impl<K, V> OrderedRegistry<K, V>
where
    K: Eq + Hash + Clone + Display,
{
    pub fn new() -> Self {
        Self {
            entries: Vec::new(),
            index: HashMap::new(),
        }
    }

    /// Register an item.
    ///
    /// Returns an error if the key is already taken; the registry is left
    /// unchanged in that case.
    pub fn register(&mut self, key: K, value: V) -> Result<(), RegistryError> {
        if self.index.contains_key(&key) {
            return Err(RegistryError::DuplicateRoute(key.to_string()));
        }
        self.index.insert(key.clone(), self.entries.len());
        self.entries.push((key, value));
        Ok(())
    }

    pub fn get(&self, key: &K) -> Option<&V> {
        self.index.get(key).map(|&i| &self.entries[i].1)
    }

    /// Like [`get`](Self::get), but a miss is an error.
    pub fn resolve(&self, key: &K) -> Result<&V, RegistryError> {
        self.get(key)
            .ok_or_else(|| RegistryError::NotFound(key.to_string()))
    }

    pub fn contains(&self, key: &K) -> bool {
        self.index.contains_key(key)
    }

    pub fn keys(&self) -> impl Iterator<Item = &K> + '_ {
        self.entries.iter().map(|(k, _)| k)
    }

    /// Iterate in registration order.
    pub fn iter(&self) -> impl Iterator<Item = (&K, &V)> + '_ {
        self.entries.iter().map(|(k, v)| (k, v))
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// Fail with the first key of `other` that is already present here.
    pub fn check_disjoint(&self, other: &Self) -> Result<(), RegistryError> {
        match other.keys().find(|k| self.contains(k)) {
            Some(key) => Err(RegistryError::DuplicateRoute(key.to_string())),
            None => Ok(()),
        }
    }

    /// Append every entry of `other`, keeping its order.
    pub fn merge(&mut self, other: Self) -> Result<(), RegistryError> {
        self.check_disjoint(&other)?;
        for (key, value) in other.entries {
            self.register(key, value)?;
        }
        Ok(())
    }
}

impl<K, V> Default for OrderedRegistry<K, V>
where
    K: Eq + Hash + Clone + Display,
{
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
#[path = "base_tests.rs"]
mod tests;
