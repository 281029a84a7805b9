//! Two-generation cache for per-pass measurements.
//!
//! Entries used during a pass are kept in `current`. `collect()` at the end of
//! a full pass moves `current` into `previous` and drops whatever was left in
//! `previous`, so an entry survives exactly as long as some pass keeps
//! touching it.

use std::collections::HashMap;
use std::hash::Hash;

#[derive(Debug, Clone)]
pub struct GenerationalCache<K, V> {
    current: HashMap<K, V>,
    previous: HashMap<K, V>,
}

impl<K, V> Default for GenerationalCache<K, V> {
    fn default() -> Self {
        Self {
            current: HashMap::new(),
            previous: HashMap::new(),
        }
    }
}

impl<K: Eq + Hash + Clone, V> GenerationalCache<K, V> {
    pub fn new() -> Self {
        Self::default()
    }

    /// Look up `key`, promoting a hit from the previous generation.
    pub fn get(&mut self, key: &K) -> Option<&V> {
        if !self.current.contains_key(key) {
            let value = self.previous.remove(key)?;
            self.current.insert(key.clone(), value);
        }
        self.current.get(key)
    }

    pub fn insert(&mut self, key: K, value: V) {
        self.previous.remove(&key);
        self.current.insert(key, value);
    }

    /// Swap generations. Returns the number of entries evicted.
    pub fn collect(&mut self) -> usize {
        let evicted = self.previous.len();
        self.previous = std::mem::take(&mut self.current);
        evicted
    }

    pub fn len(&self) -> usize {
        self.current.len() + self.previous.len()
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    pub fn clear(&mut self) {
        self.current.clear();
        self.previous.clear();
    }
}
