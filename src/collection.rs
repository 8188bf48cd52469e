//! Ordered, uniquely keyed storage for the document set.
//!
//! The display/merge order and the key→value map live in one type so the
//! two can never drift apart: every key in `order` has exactly one entry in
//! `entries` and vice versa.

use std::collections::HashMap;

#[derive(Debug)]
pub(crate) struct OrderedMap<V> {
    order: Vec<String>,
    entries: HashMap<String, V>,
}

impl<V> OrderedMap<V> {
    pub(crate) fn new() -> Self {
        Self {
            order: Vec::new(),
            entries: HashMap::new(),
        }
    }

    pub(crate) fn len(&self) -> usize {
        self.order.len()
    }

    pub(crate) fn is_empty(&self) -> bool {
        self.order.is_empty()
    }

    pub(crate) fn contains(&self, key: &str) -> bool {
        self.entries.contains_key(key)
    }

    pub(crate) fn get(&self, key: &str) -> Option<&V> {
        self.entries.get(key)
    }

    pub(crate) fn get_mut(&mut self, key: &str) -> Option<&mut V> {
        self.entries.get_mut(key)
    }

    pub(crate) fn position(&self, key: &str) -> Option<usize> {
        self.order.iter().position(|k| k == key)
    }

    /// Append `value` under `key`. Hands the value back if the key is taken.
    pub(crate) fn push(&mut self, key: String, value: V) -> Result<&V, V> {
        if self.entries.contains_key(&key) {
            return Err(value);
        }

        self.order.push(key.clone());
        let value = self.entries.entry(key).or_insert(value);
        Ok(value)
    }

    pub(crate) fn remove(&mut self, key: &str) -> Option<V> {
        let value = self.entries.remove(key)?;
        self.order.retain(|k| k != key);
        self.debug_check();
        Some(value)
    }

    /// Move `key` to `index` (clamped to the last slot), keeping the
    /// relative order of everything else. Returns the final index.
    pub(crate) fn move_to(&mut self, key: &str, index: usize) -> Option<usize> {
        let current = self.position(key)?;
        let target = index.min(self.order.len() - 1);

        let key = self.order.remove(current);
        self.order.insert(target, key);
        self.debug_check();
        Some(target)
    }

    pub(crate) fn keys(&self) -> &[String] {
        &self.order
    }

    /// Values in order.
    pub(crate) fn values(&self) -> impl Iterator<Item = &V> {
        self.order.iter().filter_map(|key| self.entries.get(key))
    }

    fn debug_check(&self) {
        debug_assert_eq!(self.order.len(), self.entries.len());
        debug_assert!(self.order.iter().all(|k| self.entries.contains_key(k)));
    }
}

impl<V> Default for OrderedMap<V> {
    fn default() -> Self {
        Self::new()
    }
}
